use super::*;
use crate::context::CheckerOptions;
use crate::state::Checker;
use tyck_binder::{KeywordTypeKind, NodeIndex, ProgramBuilder};

/// Print the annotated type of `let v: <annotation>` in a file that also
/// declares `interface Box<T> { value: T }`.
fn print_annotation(build: impl FnOnce(&mut tyck_binder::NodeArena) -> NodeIndex) -> String {
    let mut builder = ProgramBuilder::new();
    let file = builder.add_file("print.ts", |ast| {
        let t = ast.type_param("T", NodeIndex::NONE, NodeIndex::NONE);
        let t_ref = ast.type_ref("T", vec![]);
        let value = ast.property_sig("value", t_ref, false);
        let boxed = ast.interface("Box", vec![t], vec![], vec![value]);
        let annotation = build(ast);
        vec![boxed, ast.let_decl("v", annotation, NodeIndex::NONE)]
    });
    let program = builder.build();
    let mut checker = Checker::new(&program, CheckerOptions::default());
    let v = checker.get_file_symbol(file, "v").expect("v");
    let t = checker.get_type_of_symbol(v);
    checker.type_to_string(t)
}

#[test]
fn test_intrinsics() {
    let mut builder = ProgramBuilder::new();
    builder.add_file("empty.ts", |_| Vec::new());
    let program = builder.build();
    let mut checker = Checker::new(&program, CheckerOptions::default());
    assert_eq!(checker.type_to_string(TypeId::STRING), "string");
    assert_eq!(checker.type_to_string(TypeId::NUMBER), "number");
    assert_eq!(checker.type_to_string(TypeId::ANY), "any");
    assert_eq!(checker.type_to_string(TypeId::NEVER), "never");
    assert_eq!(checker.type_to_string(TypeId::UNKNOWN), "unknown");
    assert_eq!(checker.type_to_string(TypeId::BOOLEAN), "boolean");
}

#[test]
fn test_literals() {
    let mut builder = ProgramBuilder::new();
    builder.add_file("empty.ts", |_| Vec::new());
    let program = builder.build();
    let mut checker = Checker::new(&program, CheckerOptions::default());
    let quoted = checker.ctx.types.string_literal("say \"hi\"");
    assert_eq!(checker.type_to_string(quoted), r#""say \"hi\"""#);
    let fraction = checker.ctx.types.number_literal(1.5);
    assert_eq!(checker.type_to_string(fraction), "1.5");
    assert_eq!(checker.type_to_string(TypeId::TRUE), "true");
}

#[test]
fn test_arrays_and_tuples() {
    let array = print_annotation(|ast| {
        let string = ast.keyword(KeywordTypeKind::String);
        ast.array_type(string)
    });
    assert_eq!(array, "string[]");

    let union_array = print_annotation(|ast| {
        let string = ast.keyword(KeywordTypeKind::String);
        let number = ast.keyword(KeywordTypeKind::Number);
        let union = ast.union_type(vec![string, number]);
        let paren = ast.paren_type(union);
        ast.array_type(paren)
    });
    assert_eq!(union_array, "(string | number)[]");

    let tuple = print_annotation(|ast| {
        let string = ast.keyword(KeywordTypeKind::String);
        let number = ast.keyword(KeywordTypeKind::Number);
        let optional = ast.optional_type(number);
        ast.tuple_type(vec![string, optional])
    });
    assert_eq!(tuple, "[string, number?]");
}

#[test]
fn test_generic_reference() {
    let boxed = print_annotation(|ast| {
        let string = ast.keyword(KeywordTypeKind::String);
        ast.type_ref("Box", vec![string])
    });
    assert_eq!(boxed, "Box<string>");
}

#[test]
fn test_function_and_object_literals() {
    let function = print_annotation(|ast| {
        let string = ast.keyword(KeywordTypeKind::String);
        let x = ast.param("x", string);
        let void = ast.keyword(KeywordTypeKind::Void);
        ast.function_type(vec![], vec![x], void)
    });
    assert_eq!(function, "(x: string) => void");

    let object = print_annotation(|ast| {
        let number = ast.keyword(KeywordTypeKind::Number);
        let a = ast.property_sig("a", number, false);
        let string = ast.keyword(KeywordTypeKind::String);
        let b = ast.property_sig("b", string, true);
        ast.type_literal(vec![a, b])
    });
    assert_eq!(object, "{ a: number; b?: string; }");

    let empty = print_annotation(|ast| ast.type_literal(vec![]));
    assert_eq!(empty, "{}");
}

#[test]
fn test_property_names_that_need_quotes() {
    assert_eq!(property_name_text("plain"), "plain");
    assert_eq!(property_name_text("with-dash"), "\"with-dash\"");
    assert_eq!(property_name_text("42"), "42");
}
