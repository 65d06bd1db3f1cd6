//! Global merging across script files and module import resolution.

use tyck_binder::{FileId, KeywordTypeKind, NodeArena, NodeIndex, Program, ProgramBuilder};
use tyck_checker::{Checker, CheckerOptions};
use tyck_types::TypeId;

fn interface_with_a(ast: &mut NodeArena) -> Vec<NodeIndex> {
    let number = ast.keyword(KeywordTypeKind::Number);
    let a = ast.property_sig("a", number, false);
    vec![ast.interface("I", vec![], vec![], vec![a])]
}

fn interface_with_b(ast: &mut NodeArena) -> Vec<NodeIndex> {
    let string = ast.keyword(KeywordTypeKind::String);
    let b = ast.property_sig("b", string, false);
    vec![ast.interface("I", vec![], vec![], vec![b])]
}

fn property_names_of_i(program: &Program, file: FileId) -> Vec<String> {
    let mut checker = Checker::new(program, CheckerOptions::default());
    let symbol = checker.get_file_symbol(file, "I").expect("I");
    let declared = checker.get_declared_type_of_symbol(symbol);
    let mut names: Vec<String> = checker
        .get_properties_of_type(declared)
        .into_iter()
        .map(|p| checker.symbol(p).escaped_name.clone())
        .collect();
    names.sort();
    names
}

#[test]
fn test_global_interfaces_merge_across_files() {
    let mut builder = ProgramBuilder::new();
    let first = builder.add_file("a.ts", interface_with_a);
    builder.add_file("b.ts", interface_with_b);
    let program = builder.build();

    assert_eq!(property_names_of_i(&program, first), vec!["a", "b"]);
}

#[test]
fn test_global_merge_is_order_independent() {
    let mut builder = ProgramBuilder::new();
    let ab = builder.add_file("a.ts", interface_with_a);
    builder.add_file("b.ts", interface_with_b);
    let ab_program = builder.build();

    let mut builder = ProgramBuilder::new();
    builder.add_file("b.ts", interface_with_b);
    let ba = builder.add_file("a.ts", interface_with_a);
    let ba_program = builder.build();

    assert_eq!(
        property_names_of_i(&ab_program, ab),
        property_names_of_i(&ba_program, ba)
    );
}

#[test]
fn test_merged_interface_members_are_visible_from_a_third_file() {
    let mut accesses = Vec::new();
    let mut builder = ProgramBuilder::new();
    builder.add_file("a.ts", interface_with_a);
    builder.add_file("b.ts", interface_with_b);
    builder.add_file("c.ts", |ast| {
        let i_ref = ast.type_ref("I", vec![]);
        let var = ast.let_decl("v", i_ref, NodeIndex::NONE);
        let mut statements = vec![var];
        for name in ["a", "b"] {
            let target = ast.ident("v");
            let access = ast.prop_access(target, name);
            accesses.push(access);
            statements.push(ast.expr_stmt(access));
        }
        statements
    });
    let program = builder.build();

    let mut checker = Checker::new(&program, CheckerOptions::default());
    checker.check_program();
    assert!(checker.get_diagnostics().is_empty(), "{:?}", checker.get_diagnostics());
    assert_eq!(checker.get_type_at_location(accesses[0]), TypeId::NUMBER);
    assert_eq!(checker.get_type_at_location(accesses[1]), TypeId::STRING);
}

#[test]
fn test_namespaces_merge_across_files() {
    let mut builder = ProgramBuilder::new();
    builder.add_file("a.ts", |ast| {
        let number = ast.keyword(KeywordTypeKind::Number);
        let a = ast.var_decl("a", number, NodeIndex::NONE);
        let a = ast.exported(a);
        vec![ast.namespace("N", vec![a])]
    });
    builder.add_file("b.ts", |ast| {
        let string = ast.keyword(KeywordTypeKind::String);
        let b = ast.var_decl("b", string, NodeIndex::NONE);
        let b = ast.exported(b);
        vec![ast.namespace("N", vec![b])]
    });
    builder.add_file("c.ts", |ast| {
        let n = ast.ident("N");
        let a = ast.prop_access(n, "a");
        let n = ast.ident("N");
        let b = ast.prop_access(n, "b");
        vec![ast.expr_stmt(a), ast.expr_stmt(b)]
    });
    let program = builder.build();

    let mut checker = Checker::new(&program, CheckerOptions::default());
    checker.check_program();
    assert!(checker.get_diagnostics().is_empty(), "{:?}", checker.get_diagnostics());
}

#[test]
fn test_named_import_resolves_exported_interface() {
    let mut access = NodeIndex::NONE;
    let mut builder = ProgramBuilder::new();
    builder.add_file("src/point.ts", |ast| {
        let number = ast.keyword(KeywordTypeKind::Number);
        let x = ast.property_sig("x", number, false);
        let point = ast.interface("Point", vec![], vec![], vec![x]);
        vec![ast.exported(point)]
    });
    builder.add_file("src/main.ts", |ast| {
        let import = ast.import_named(&[("Point", "P")], "./point");
        let p_ref = ast.type_ref("P", vec![]);
        let var = ast.let_decl("p", p_ref, NodeIndex::NONE);
        let target = ast.ident("p");
        access = ast.prop_access(target, "x");
        vec![import, var, ast.expr_stmt(access)]
    });
    let program = builder.build();

    let mut checker = Checker::new(&program, CheckerOptions::default());
    checker.check_program();
    assert!(checker.get_diagnostics().is_empty(), "{:?}", checker.get_diagnostics());
    assert_eq!(checker.get_type_at_location(access), TypeId::NUMBER);
}

#[test]
fn test_reexported_value_is_visible_through_star_export() {
    let mut builder = ProgramBuilder::new();
    builder.add_file("lib/inner.ts", |ast| {
        let number = ast.keyword(KeywordTypeKind::Number);
        let value = ast.var_decl("value", number, NodeIndex::NONE);
        vec![ast.exported(value)]
    });
    builder.add_file("lib/index.ts", |ast| vec![ast.export_star("./inner")]);
    let main = builder.add_file("main.ts", |ast| {
        let import = ast.import_named(&[("value", "value")], "./lib/index");
        let reference = ast.ident("value");
        let copy = ast.let_decl("copy", NodeIndex::NONE, reference);
        vec![import, copy]
    });
    let program = builder.build();

    let mut checker = Checker::new(&program, CheckerOptions::default());
    checker.check_program();
    assert!(checker.get_diagnostics().is_empty(), "{:?}", checker.get_diagnostics());
    let copy = checker.get_file_symbol(main, "copy").expect("copy");
    assert_eq!(checker.get_type_of_symbol(copy), TypeId::NUMBER);
}

#[test]
fn test_unresolved_module_is_reported() {
    let mut builder = ProgramBuilder::new();
    builder.add_file("main.ts", |ast| vec![ast.import_named(&[("X", "X")], "./missing")]);
    let program = builder.build();

    let mut checker = Checker::new(&program, CheckerOptions::default());
    checker.check_program();
    let codes: Vec<u32> = checker.get_diagnostics().iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![2307]);
}

#[test]
fn test_missing_export_is_reported() {
    let mut builder = ProgramBuilder::new();
    builder.add_file("b.ts", |ast| {
        let number = ast.keyword(KeywordTypeKind::Number);
        let value = ast.var_decl("value", number, NodeIndex::NONE);
        vec![ast.exported(value)]
    });
    builder.add_file("main.ts", |ast| vec![ast.import_named(&[("nope", "nope")], "./b")]);
    let program = builder.build();

    let mut checker = Checker::new(&program, CheckerOptions::default());
    checker.check_program();
    let diagnostics = checker.get_diagnostics();
    assert_eq!(diagnostics.len(), 1, "{diagnostics:?}");
    assert_eq!(diagnostics[0].code, 2305);
}
