use super::*;
use crate::context::CheckerOptions;
use crate::state::Checker;
use tyck_binder::{FileId, KeywordTypeKind, NodeArena, NodeIndex, Program, ProgramBuilder};

fn number_props(ast: &mut NodeArena, names: &[&str]) -> Vec<NodeIndex> {
    names
        .iter()
        .map(|&name| {
            let number = ast.keyword(KeywordTypeKind::Number);
            ast.property_sig(name, number, false)
        })
        .collect()
}

/// Interfaces `Point { x; y }`, `Point3 { x; y; z }`, `Named { name }`,
/// `MaybeX { x? }`, `Dict { [key: string]: number }`, and the function type
/// aliases `Wide = (x: string) => void` and `Narrow = (x: "a") => void`.
fn shapes() -> (Program, FileId) {
    let mut builder = ProgramBuilder::new();
    let file = builder.add_file("shapes.ts", |ast| {
        let point_members = number_props(ast, &["x", "y"]);
        let point = ast.interface("Point", vec![], vec![], point_members);
        let point3_members = number_props(ast, &["x", "y", "z"]);
        let point3 = ast.interface("Point3", vec![], vec![], point3_members);

        let string = ast.keyword(KeywordTypeKind::String);
        let name = ast.property_sig("name", string, false);
        let named = ast.interface("Named", vec![], vec![], vec![name]);

        let number = ast.keyword(KeywordTypeKind::Number);
        let x = ast.property_sig("x", number, true);
        let maybe_x = ast.interface("MaybeX", vec![], vec![], vec![x]);

        let key = ast.keyword(KeywordTypeKind::String);
        let value = ast.keyword(KeywordTypeKind::Number);
        let index = ast.index_sig("key", key, value);
        let dict = ast.interface("Dict", vec![], vec![], vec![index]);

        let string = ast.keyword(KeywordTypeKind::String);
        let wide_param = ast.param("x", string);
        let void = ast.keyword(KeywordTypeKind::Void);
        let wide_fn = ast.function_type(vec![], vec![wide_param], void);
        let wide = ast.type_alias("Wide", vec![], wide_fn);

        let a = ast.string_lit("a");
        let a_type = ast.literal_type(a);
        let narrow_param = ast.param("x", a_type);
        let void = ast.keyword(KeywordTypeKind::Void);
        let narrow_fn = ast.function_type(vec![], vec![narrow_param], void);
        let narrow = ast.type_alias("Narrow", vec![], narrow_fn);

        vec![point, point3, named, maybe_x, dict, wide, narrow]
    });
    (builder.build(), file)
}

fn declared(checker: &mut Checker<'_>, file: FileId, name: &str) -> TypeId {
    let symbol = checker.get_file_symbol(file, name).expect("declared name");
    checker.get_declared_type_of_symbol(symbol)
}

#[test]
fn test_primitive_assignability() {
    let (program, _) = shapes();
    let mut checker = Checker::new(&program, CheckerOptions::default());
    let one = checker.ctx.types.number_literal(1.0);
    assert!(checker.is_type_assignable_to(one, TypeId::NUMBER));
    assert!(!checker.is_type_assignable_to(TypeId::NUMBER, one));
    assert!(checker.is_type_assignable_to(TypeId::STRING, TypeId::ANY));
    assert!(checker.is_type_assignable_to(TypeId::STRING, TypeId::UNKNOWN));
    assert!(checker.is_type_assignable_to(TypeId::NEVER, TypeId::STRING));
    assert!(checker.is_type_assignable_to(TypeId::ANY, TypeId::STRING));
    assert!(!checker.is_type_assignable_to(TypeId::UNKNOWN, TypeId::STRING));
    assert!(!checker.is_type_assignable_to(TypeId::STRING, TypeId::NUMBER));
}

#[test]
fn test_nullables_depend_on_strict_null_checks() {
    let (program, _) = shapes();
    let mut loose = Checker::new(&program, CheckerOptions::default());
    assert!(loose.is_type_assignable_to(TypeId::UNDEFINED, TypeId::STRING));
    assert!(loose.is_type_assignable_to(TypeId::NULL, TypeId::NUMBER));

    let mut strict = Checker::new(&program, CheckerOptions::strict());
    assert!(!strict.is_type_assignable_to(TypeId::UNDEFINED, TypeId::STRING));
    assert!(!strict.is_type_assignable_to(TypeId::NULL, TypeId::NUMBER));
    assert!(strict.is_type_assignable_to(TypeId::UNDEFINED, TypeId::VOID));
}

#[test]
fn test_structural_width_subtyping() {
    let (program, file) = shapes();
    let mut checker = Checker::new(&program, CheckerOptions::default());
    let point = declared(&mut checker, file, "Point");
    let point3 = declared(&mut checker, file, "Point3");
    let named = declared(&mut checker, file, "Named");
    assert!(checker.is_type_assignable_to(point3, point));
    assert!(checker.is_type_subtype_of(point3, point));
    assert!(!checker.is_type_assignable_to(point, point3));
    assert!(!checker.is_type_assignable_to(named, point));
}

#[test]
fn test_optional_target_property() {
    let (program, file) = shapes();
    let mut checker = Checker::new(&program, CheckerOptions::default());
    let point = declared(&mut checker, file, "Point");
    let named = declared(&mut checker, file, "Named");
    let maybe_x = declared(&mut checker, file, "MaybeX");
    assert!(checker.is_type_assignable_to(point, maybe_x));
    // `MaybeX` is weak, so a source sharing none of its properties fails.
    assert!(!checker.is_type_assignable_to(named, maybe_x));
    assert!(!checker.is_type_assignable_to(maybe_x, point));
}

#[test]
fn test_identity_is_stricter_than_assignability() {
    let (program, file) = shapes();
    let mut checker = Checker::new(&program, CheckerOptions::default());
    let point = declared(&mut checker, file, "Point");
    let point3 = declared(&mut checker, file, "Point3");
    assert!(checker.is_type_identical_to(point, point));
    assert!(!checker.is_type_identical_to(point3, point));
    assert!(checker.is_type_related_to(point3, point, RelationKind::Assignable));
    assert!(!checker.is_type_related_to(point3, point, RelationKind::Identity));
}

#[test]
fn test_index_signature_target() {
    let (program, file) = shapes();
    let mut checker = Checker::new(&program, CheckerOptions::default());
    let dict = declared(&mut checker, file, "Dict");
    let named = declared(&mut checker, file, "Named");
    let point = declared(&mut checker, file, "Point");
    assert!(!checker.is_type_assignable_to(named, dict));
    assert!(!checker.is_type_assignable_to(point, dict));
    assert!(checker.is_type_assignable_to(dict, dict));
}

#[test]
fn test_parameter_variance_follows_strict_function_types() {
    let (program, file) = shapes();

    let mut strict = Checker::new(&program, CheckerOptions::strict());
    let wide = declared(&mut strict, file, "Wide");
    let narrow = declared(&mut strict, file, "Narrow");
    assert!(strict.is_type_assignable_to(wide, narrow));
    assert!(!strict.is_type_assignable_to(narrow, wide));

    let mut loose = Checker::new(&program, CheckerOptions::default());
    let wide = declared(&mut loose, file, "Wide");
    let narrow = declared(&mut loose, file, "Narrow");
    assert!(loose.is_type_assignable_to(wide, narrow));
    assert!(loose.is_type_assignable_to(narrow, wide));
}

#[test]
fn test_union_source_and_target() {
    let (program, file) = shapes();
    let mut checker = Checker::new(&program, CheckerOptions::default());
    let point = declared(&mut checker, file, "Point");
    let named = declared(&mut checker, file, "Named");
    let either = checker.get_union_type(&[point, named]);
    assert!(checker.is_type_assignable_to(point, either));
    assert!(checker.is_type_assignable_to(named, either));
    assert!(!checker.is_type_assignable_to(either, point));
    let both = checker.get_intersection_type(&[point, named]);
    assert!(checker.is_type_assignable_to(both, point));
    assert!(checker.is_type_assignable_to(both, either));
}

#[test]
fn test_ternary_combination() {
    assert_eq!(Ternary::True.and(Ternary::Maybe), Ternary::Maybe);
    assert_eq!(Ternary::Maybe.and(Ternary::False), Ternary::False);
    assert!(Ternary::from_bool(true).is_true());
    assert!(!Ternary::from_bool(false).is_true());
}
