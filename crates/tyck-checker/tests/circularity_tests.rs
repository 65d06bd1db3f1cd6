//! Self-referential declarations are reported once and resolve to a
//! sentinel instead of recursing.

use tyck_binder::{NodeIndex, Program, ProgramBuilder};
use tyck_checker::{Checker, CheckerOptions};
use tyck_common::Diagnostic;
use tyck_types::TypeId;

fn check(program: &Program, options: CheckerOptions) -> Vec<Diagnostic> {
    let mut checker = Checker::new(program, options);
    checker.check_program();
    checker.get_diagnostics()
}

fn count(diagnostics: &[Diagnostic], code: u32) -> usize {
    diagnostics.iter().filter(|d| d.code == code).count()
}

#[test]
fn test_import_alias_cycle_reports_once() {
    let mut builder = ProgramBuilder::new();
    builder.add_file("a.ts", |ast| {
        let a = ast.import_equals("A", "B");
        let b = ast.import_equals("B", "A");
        vec![a, b]
    });
    let program = builder.build();

    let diagnostics = check(&program, CheckerOptions::default());
    assert_eq!(count(&diagnostics, 2303), 1, "{diagnostics:?}");
}

#[test]
fn test_import_alias_cycle_resolves_to_unknown_symbol() {
    let mut builder = ProgramBuilder::new();
    let file = builder.add_file("a.ts", |ast| {
        let a = ast.import_equals("A", "B");
        let b = ast.import_equals("B", "A");
        vec![a, b]
    });
    let program = builder.build();

    let mut checker = Checker::new(&program, CheckerOptions::default());
    let a = checker.get_file_symbol(file, "A").expect("alias A");
    let b = checker.get_file_symbol(file, "B").expect("alias B");
    let target_a = checker.resolve_alias(a);
    let target_b = checker.resolve_alias(b);
    assert_eq!(target_a, target_b);
    assert_eq!(checker.resolve_alias(a), target_a);
}

#[test]
fn test_type_alias_cycle() {
    let mut builder = ProgramBuilder::new();
    let file = builder.add_file("a.ts", |ast| {
        let b_ref = ast.type_ref("B", vec![]);
        let a = ast.type_alias("A", vec![], b_ref);
        let a_ref = ast.type_ref("A", vec![]);
        let b = ast.type_alias("B", vec![], a_ref);
        vec![a, b]
    });
    let program = builder.build();

    let mut checker = Checker::new(&program, CheckerOptions::default());
    checker.check_program();
    let diagnostics = checker.get_diagnostics();
    assert!(count(&diagnostics, 2456) >= 1, "{diagnostics:?}");
    assert_eq!(count(&diagnostics, 2456), diagnostics.len());

    let a = checker.get_file_symbol(file, "A").expect("A");
    assert_eq!(checker.get_declared_type_of_symbol(a), TypeId::ERROR);
}

#[test]
fn test_self_referential_alias_through_object_is_fine() {
    // type List = { next: List }
    let mut builder = ProgramBuilder::new();
    builder.add_file("a.ts", |ast| {
        let list_ref = ast.type_ref("List", vec![]);
        let next = ast.property_sig("next", list_ref, false);
        let literal = ast.type_literal(vec![next]);
        vec![ast.type_alias("List", vec![], literal)]
    });
    let program = builder.build();

    assert!(check(&program, CheckerOptions::default()).is_empty());
}

#[test]
fn test_interface_base_cycle() {
    let mut builder = ProgramBuilder::new();
    builder.add_file("a.ts", |ast| {
        let b = ast.heritage("B", vec![]);
        let a = ast.interface("A", vec![], vec![b], vec![]);
        let a_base = ast.heritage("A", vec![]);
        let b = ast.interface("B", vec![], vec![a_base], vec![]);
        vec![a, b]
    });
    let program = builder.build();

    let diagnostics = check(&program, CheckerOptions::default());
    assert!(count(&diagnostics, 2310) >= 1, "{diagnostics:?}");
    assert_eq!(count(&diagnostics, 2310), diagnostics.len());
}

#[test]
fn test_variable_in_its_own_type_annotation() {
    // var x: typeof x;
    let mut builder = ProgramBuilder::new();
    builder.add_file("a.ts", |ast| {
        let query = ast.type_query("x");
        vec![ast.var_decl("x", query, NodeIndex::NONE)]
    });
    let program = builder.build();

    let diagnostics = check(&program, CheckerOptions::default());
    assert_eq!(count(&diagnostics, 2502), 1, "{diagnostics:?}");
}

#[test]
fn test_circular_initializer_is_any() {
    // var x = x;
    let mut builder = ProgramBuilder::new();
    let file = builder.add_file("a.ts", |ast| {
        let reference = ast.ident("x");
        vec![ast.var_decl("x", NodeIndex::NONE, reference)]
    });
    let program = builder.build();

    let mut checker = Checker::new(&program, CheckerOptions::default());
    checker.check_program();
    assert!(checker.get_diagnostics().is_empty(), "{:?}", checker.get_diagnostics());
    let x = checker.get_file_symbol(file, "x").expect("x");
    assert_eq!(checker.get_type_of_symbol(x), TypeId::ANY);

    let mut checker = Checker::new(&program, CheckerOptions::strict());
    checker.check_program();
    assert_eq!(count(&checker.get_diagnostics(), 7022), 1);
}

#[test]
fn test_mutually_recursive_interfaces_relate() {
    // interface A { b: B } interface B { a: A }
    let mut builder = ProgramBuilder::new();
    let file = builder.add_file("a.ts", |ast| {
        let b_ref = ast.type_ref("B", vec![]);
        let b_prop = ast.property_sig("b", b_ref, false);
        let a = ast.interface("A", vec![], vec![], vec![b_prop]);
        let a_ref = ast.type_ref("A", vec![]);
        let a_prop = ast.property_sig("a", a_ref, false);
        let b = ast.interface("B", vec![], vec![], vec![a_prop]);
        vec![a, b]
    });
    let program = builder.build();

    let mut checker = Checker::new(&program, CheckerOptions::default());
    let a = checker.get_file_symbol(file, "A").expect("A");
    let b = checker.get_file_symbol(file, "B").expect("B");
    let a = checker.get_declared_type_of_symbol(a);
    let b = checker.get_declared_type_of_symbol(b);
    assert!(checker.is_type_assignable_to(a, a));
    assert!(!checker.is_type_assignable_to(a, b));
    assert!(checker.get_diagnostics().is_empty());
}
