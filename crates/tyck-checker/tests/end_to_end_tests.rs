//! Whole-program checks over small hand-built programs.

use tyck_binder::{FunctionBody, KeywordTypeKind, NodeIndex, Program, ProgramBuilder};
use tyck_checker::{Checker, CheckerOptions};
use tyck_common::Diagnostic;
use tyck_types::TypeId;

fn codes(diagnostics: &[Diagnostic]) -> Vec<u32> {
    diagnostics.iter().map(|d| d.code).collect()
}

fn check(program: &Program, options: CheckerOptions) -> Vec<Diagnostic> {
    let mut checker = Checker::new(program, options);
    checker.check_program();
    checker.get_diagnostics()
}

#[test]
fn test_property_access_on_interface() {
    let mut access = NodeIndex::NONE;
    let mut builder = ProgramBuilder::new();
    builder.add_file("a.ts", |ast| {
        let string = ast.keyword(KeywordTypeKind::String);
        let bar = ast.property_sig("bar", string, false);
        let foo = ast.interface("Foo", vec![], vec![], vec![bar]);
        let foo_ref = ast.type_ref("Foo", vec![]);
        let var = ast.let_decl("foo", foo_ref, NodeIndex::NONE);
        let target = ast.ident("foo");
        access = ast.prop_access(target, "bar");
        let statement = ast.expr_stmt(access);
        vec![foo, var, statement]
    });
    let program = builder.build();

    let mut checker = Checker::new(&program, CheckerOptions::default());
    checker.check_program();
    assert!(checker.get_diagnostics().is_empty(), "{:?}", checker.get_diagnostics());
    assert_eq!(checker.get_type_at_location(access), TypeId::STRING);
}

#[test]
fn test_missing_property_is_reported() {
    let mut builder = ProgramBuilder::new();
    builder.add_file("a.ts", |ast| {
        let string = ast.keyword(KeywordTypeKind::String);
        let bar = ast.property_sig("bar", string, false);
        let foo = ast.interface("Foo", vec![], vec![], vec![bar]);
        let foo_ref = ast.type_ref("Foo", vec![]);
        let var = ast.let_decl("foo", foo_ref, NodeIndex::NONE);
        let target = ast.ident("foo");
        let access = ast.prop_access(target, "qux");
        let statement = ast.expr_stmt(access);
        vec![foo, var, statement]
    });
    let program = builder.build();

    let diagnostics = check(&program, CheckerOptions::default());
    assert_eq!(codes(&diagnostics), vec![2339]);
    assert_eq!(
        diagnostics[0].message_text,
        "Property 'qux' does not exist on type 'Foo'."
    );
}

#[test]
fn test_near_miss_property_gets_suggestion() {
    let mut builder = ProgramBuilder::new();
    builder.add_file("a.ts", |ast| {
        let number = ast.keyword(KeywordTypeKind::Number);
        let length = ast.property_sig("length", number, false);
        let foo = ast.interface("Foo", vec![], vec![], vec![length]);
        let foo_ref = ast.type_ref("Foo", vec![]);
        let var = ast.let_decl("foo", foo_ref, NodeIndex::NONE);
        let target = ast.ident("foo");
        let access = ast.prop_access(target, "lenght");
        let statement = ast.expr_stmt(access);
        vec![foo, var, statement]
    });
    let program = builder.build();

    let diagnostics = check(&program, CheckerOptions::default());
    assert_eq!(codes(&diagnostics), vec![2551]);
    assert!(diagnostics[0].message_text.ends_with("Did you mean 'length'?"));
}

#[test]
fn test_initializer_not_assignable_to_annotation() {
    let mut builder = ProgramBuilder::new();
    builder.add_file("a.ts", |ast| {
        let string = ast.keyword(KeywordTypeKind::String);
        let one = ast.num_lit(1.0);
        vec![ast.let_decl("x", string, one)]
    });
    let program = builder.build();

    assert_eq!(codes(&check(&program, CheckerOptions::default())), vec![2322]);
}

#[test]
fn test_null_assignability_depends_on_strict_null_checks() {
    let mut builder = ProgramBuilder::new();
    builder.add_file("a.ts", |ast| {
        let string = ast.keyword(KeywordTypeKind::String);
        let null = ast.null_lit();
        vec![ast.let_decl("x", string, null)]
    });
    let program = builder.build();

    assert!(check(&program, CheckerOptions::default()).is_empty());
    assert_eq!(codes(&check(&program, CheckerOptions::strict())), vec![2322]);
}

#[test]
fn test_call_argument_and_arity_errors() {
    let mut builder = ProgramBuilder::new();
    builder.add_file("a.ts", |ast| {
        let number = ast.keyword(KeywordTypeKind::Number);
        let a = ast.param("a", number);
        let void = ast.keyword(KeywordTypeKind::Void);
        let f = ast.function_decl("f", vec![], vec![a], void, FunctionBody::None);
        let f = ast.declared(f);

        let callee = ast.ident("f");
        let text = ast.string_lit("x");
        let bad_argument = ast.call(callee, vec![], vec![text]);
        let first = ast.expr_stmt(bad_argument);

        let callee = ast.ident("f");
        let no_arguments = ast.call(callee, vec![], vec![]);
        let second = ast.expr_stmt(no_arguments);
        vec![f, first, second]
    });
    let program = builder.build();

    let diagnostics = check(&program, CheckerOptions::default());
    let mut found = codes(&diagnostics);
    found.sort_unstable();
    assert_eq!(found, vec![2345, 2554]);
    let arity = diagnostics.iter().find(|d| d.code == 2554).map(|d| d.message_text.as_str());
    assert_eq!(arity, Some("Expected 1 arguments, but got 0."));
}

#[test]
fn test_calling_a_non_function_is_reported() {
    let mut builder = ProgramBuilder::new();
    builder.add_file("a.ts", |ast| {
        let number = ast.keyword(KeywordTypeKind::Number);
        let var = ast.let_decl("n", number, NodeIndex::NONE);
        let callee = ast.ident("n");
        let call = ast.call(callee, vec![], vec![]);
        let statement = ast.expr_stmt(call);
        vec![var, statement]
    });
    let program = builder.build();

    assert_eq!(codes(&check(&program, CheckerOptions::default())), vec![2349]);
}

#[test]
fn test_inference_unions_conflicting_candidates() {
    let mut builder = ProgramBuilder::new();
    let file = builder.add_file("a.ts", |ast| {
        let t = ast.type_param("T", NodeIndex::NONE, NodeIndex::NONE);
        let t_a = ast.type_ref("T", vec![]);
        let a = ast.param("a", t_a);
        let t_b = ast.type_ref("T", vec![]);
        let b = ast.param("b", t_b);
        let t_ret = ast.type_ref("T", vec![]);
        let pick = ast.function_decl("pick", vec![t], vec![a, b], t_ret, FunctionBody::None);
        let pick = ast.declared(pick);

        let callee = ast.ident("pick");
        let one = ast.num_lit(1.0);
        let text = ast.string_lit("a");
        let call = ast.call(callee, vec![], vec![one, text]);
        let r = ast.let_decl("r", NodeIndex::NONE, call);
        vec![pick, r]
    });
    let program = builder.build();

    let mut checker = Checker::new(&program, CheckerOptions::default());
    checker.check_program();
    assert!(checker.get_diagnostics().is_empty(), "{:?}", checker.get_diagnostics());
    let r = checker.get_file_symbol(file, "r").expect("r");
    let t = checker.get_type_of_symbol(r);
    let expected = checker.get_union_type(&[TypeId::NUMBER, TypeId::STRING]);
    assert_eq!(t, expected);
    assert_eq!(checker.type_to_string(t), "string | number");
}

#[test]
fn test_generic_interface_member_is_instantiated() {
    let mut access = NodeIndex::NONE;
    let mut builder = ProgramBuilder::new();
    builder.add_file("a.ts", |ast| {
        let t = ast.type_param("T", NodeIndex::NONE, NodeIndex::NONE);
        let t_ref = ast.type_ref("T", vec![]);
        let value = ast.property_sig("value", t_ref, false);
        let boxed = ast.interface("Box", vec![t], vec![], vec![value]);
        let string = ast.keyword(KeywordTypeKind::String);
        let box_ref = ast.type_ref("Box", vec![string]);
        let var = ast.let_decl("b", box_ref, NodeIndex::NONE);
        let target = ast.ident("b");
        access = ast.prop_access(target, "value");
        let statement = ast.expr_stmt(access);
        vec![boxed, var, statement]
    });
    let program = builder.build();

    let mut checker = Checker::new(&program, CheckerOptions::default());
    checker.check_program();
    assert!(checker.get_diagnostics().is_empty(), "{:?}", checker.get_diagnostics());
    assert_eq!(checker.get_type_at_location(access), TypeId::STRING);
}

#[test]
fn test_inherited_class_member() {
    let mut access = NodeIndex::NONE;
    let mut builder = ProgramBuilder::new();
    builder.add_file("a.ts", |ast| {
        let number = ast.keyword(KeywordTypeKind::Number);
        let x = ast.property_decl("x", number, NodeIndex::NONE, false);
        let base = ast.class_decl("Base", vec![], NodeIndex::NONE, vec![], vec![x]);
        let string = ast.keyword(KeywordTypeKind::String);
        let y = ast.property_decl("y", string, NodeIndex::NONE, false);
        let extends = ast.heritage("Base", vec![]);
        let derived = ast.class_decl("Derived", vec![], extends, vec![], vec![y]);
        let derived_ref = ast.type_ref("Derived", vec![]);
        let var = ast.let_decl("d", derived_ref, NodeIndex::NONE);
        let target = ast.ident("d");
        access = ast.prop_access(target, "x");
        let statement = ast.expr_stmt(access);
        vec![base, derived, var, statement]
    });
    let program = builder.build();

    let mut checker = Checker::new(&program, CheckerOptions::default());
    checker.check_program();
    assert!(checker.get_diagnostics().is_empty(), "{:?}", checker.get_diagnostics());
    assert_eq!(checker.get_type_at_location(access), TypeId::NUMBER);
}

#[test]
fn test_symbol_at_location_follows_declarations() {
    let mut reference = NodeIndex::NONE;
    let mut builder = ProgramBuilder::new();
    let file = builder.add_file("a.ts", |ast| {
        let number = ast.keyword(KeywordTypeKind::Number);
        let var = ast.let_decl("count", number, NodeIndex::NONE);
        reference = ast.ident("count");
        let statement = ast.expr_stmt(reference);
        vec![var, statement]
    });
    let program = builder.build();

    let mut checker = Checker::new(&program, CheckerOptions::default());
    let declared = checker.get_file_symbol(file, "count");
    assert!(declared.is_some());
    assert_eq!(checker.get_symbol_at_location(reference), declared);
    assert_eq!(checker.get_type_at_location(reference), TypeId::NUMBER);
}

#[test]
fn test_options_from_tsconfig_json() {
    let options = CheckerOptions::from_json(r#"{ "compilerOptions": { "strict": true } }"#).expect("valid json");
    assert!(options.strict_null_checks);
    assert!(options.no_implicit_any);

    let options = CheckerOptions::from_json(r#"{ "noUncheckedIndexedAccess": true }"#).expect("valid json");
    assert!(options.no_unchecked_indexed_access);
    assert!(!options.strict_null_checks);
}
