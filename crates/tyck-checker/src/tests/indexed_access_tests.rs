use super::*;
use crate::context::CheckerOptions;
use crate::state::Checker;
use tyck_binder::{FileId, KeywordTypeKind, NodeArena, Program, ProgramBuilder, SymbolId};

fn literal_union(ast: &mut NodeArena, a: &str, b: &str) -> NodeIndex {
    let a = ast.string_lit(a);
    let a = ast.literal_type(a);
    let b = ast.string_lit(b);
    let b = ast.literal_type(b);
    ast.union_type(vec![a, b])
}

/// `interface Pair { first: "x" | "y"; second: "y" | "z" }`, `let p: Pair`,
/// `let t: [string, number]` and the element accesses `p["frist"]`,
/// `p["other"]` and `t[2]`.
struct Fixture {
    program: Program,
    file: FileId,
    misspelled: NodeIndex,
    missing: NodeIndex,
    out_of_bounds: NodeIndex,
}

fn fixture() -> Fixture {
    let mut misspelled = NodeIndex::NONE;
    let mut missing = NodeIndex::NONE;
    let mut out_of_bounds = NodeIndex::NONE;
    let mut builder = ProgramBuilder::new();
    let file = builder.add_file("access.ts", |ast| {
        let first_type = literal_union(ast, "x", "y");
        let first = ast.property_sig("first", first_type, false);
        let second_type = literal_union(ast, "y", "z");
        let second = ast.property_sig("second", second_type, false);
        let pair = ast.interface("Pair", vec![], vec![], vec![first, second]);
        let pair_ref = ast.type_ref("Pair", vec![]);
        let p = ast.let_decl("p", pair_ref, NodeIndex::NONE);

        let string = ast.keyword(KeywordTypeKind::String);
        let number = ast.keyword(KeywordTypeKind::Number);
        let tuple = ast.tuple_type(vec![string, number]);
        let t = ast.let_decl("t", tuple, NodeIndex::NONE);

        let target = ast.ident("p");
        let name = ast.string_lit("frist");
        misspelled = ast.elem_access(target, name);
        let target = ast.ident("p");
        let name = ast.string_lit("other");
        missing = ast.elem_access(target, name);
        let target = ast.ident("t");
        let position = ast.num_lit(2.0);
        out_of_bounds = ast.elem_access(target, position);
        vec![pair, p, t]
    });
    Fixture {
        program: builder.build(),
        file,
        misspelled,
        missing,
        out_of_bounds,
    }
}

fn variable_type(checker: &mut Checker<'_>, file: FileId, name: &str) -> TypeId {
    let symbol = checker.get_file_symbol(file, name).expect("variable");
    checker.get_type_of_symbol(symbol)
}

fn codes(checker: &Checker<'_>) -> Vec<u32> {
    checker.ctx.diagnostics.iter().map(|d| d.code).collect()
}

#[test]
fn test_generic_object_access_is_deferred() {
    let fx = fixture();
    let mut checker = Checker::new(&fx.program, CheckerOptions::default());
    let t = checker.ctx.types.create_type_parameter(SymbolId::NONE);
    let first = checker.ctx.types.string_literal("first");
    let access = checker.get_indexed_access_type(t, first, AccessFlags::empty(), NodeIndex::NONE, None);
    assert!(checker.type_flags(access).contains(TypeFlags::INDEXED_ACCESS));
    let again = checker.get_indexed_access_type(t, first, AccessFlags::empty(), NodeIndex::NONE, None);
    assert_eq!(access, again);
    assert!(checker.ctx.diagnostics.is_empty());
}

#[test]
fn test_union_index_reads_a_union_and_writes_an_intersection() {
    let fx = fixture();
    let mut checker = Checker::new(&fx.program, CheckerOptions::default());
    let pair = variable_type(&mut checker, fx.file, "p");
    let first = checker.ctx.types.string_literal("first");
    let second = checker.ctx.types.string_literal("second");
    let keys = checker.get_union_type(&[first, second]);
    let x = checker.ctx.types.string_literal("x");
    let y = checker.ctx.types.string_literal("y");
    let z = checker.ctx.types.string_literal("z");

    let read = checker.get_indexed_access_type(pair, keys, AccessFlags::empty(), NodeIndex::NONE, None);
    let expected = checker.get_union_type(&[x, y, z]);
    assert_eq!(read, expected);

    let write = checker.get_indexed_access_type(pair, keys, AccessFlags::WRITING, NodeIndex::NONE, None);
    assert_eq!(write, y);
}

#[test]
fn test_tuple_index_out_of_bounds_reports_2493() {
    let fx = fixture();
    let mut checker = Checker::new(&fx.program, CheckerOptions::default());
    let tuple = variable_type(&mut checker, fx.file, "t");
    let two = checker.ctx.types.number_literal(2.0);
    checker.get_indexed_access_type(tuple, two, AccessFlags::empty(), fx.out_of_bounds, None);
    assert_eq!(codes(&checker), vec![diagnostic_codes::TUPLE_INDEX_OUT_OF_BOUNDS]);
}

#[test]
fn test_missing_property_index_reports_2339_or_2551() {
    let fx = fixture();
    let mut checker = Checker::new(&fx.program, CheckerOptions::default());
    let pair = variable_type(&mut checker, fx.file, "p");

    let other = checker.ctx.types.string_literal("other");
    let result = checker.get_indexed_access_type(pair, other, AccessFlags::empty(), fx.missing, None);
    assert_eq!(result, TypeId::ERROR);
    assert_eq!(codes(&checker), vec![diagnostic_codes::PROPERTY_DOES_NOT_EXIST]);

    let frist = checker.ctx.types.string_literal("frist");
    checker.get_indexed_access_type(pair, frist, AccessFlags::empty(), fx.misspelled, None);
    assert_eq!(
        codes(&checker),
        vec![
            diagnostic_codes::PROPERTY_DOES_NOT_EXIST,
            diagnostic_codes::PROPERTY_DOES_NOT_EXIST_DID_YOU_MEAN
        ]
    );
    assert!(checker.ctx.diagnostics[1].message_text.contains("Did you mean 'first'?"));
}
