use super::*;
use crate::context::CheckerOptions;
use crate::state::Checker;
use tyck_binder::{FileId, FunctionBody, KeywordTypeKind, NodeIndex, Program, ProgramBuilder};

/// `function g<T, U = string>(a: T[], b: Box<T>, c: (x: T) => void): void`
/// next to `interface Box<T> { value: T }` and the sources
/// `let box: Box<string>` and `let callback: (x: string) => void`.
struct Fixture {
    program: Program,
    file: FileId,
    t: NodeIndex,
    u: NodeIndex,
    array_of_t: NodeIndex,
    box_of_t: NodeIndex,
    callback_of_t: NodeIndex,
}

fn fixture() -> Fixture {
    let mut t = NodeIndex::NONE;
    let mut u = NodeIndex::NONE;
    let mut array_of_t = NodeIndex::NONE;
    let mut box_of_t = NodeIndex::NONE;
    let mut callback_of_t = NodeIndex::NONE;
    let mut builder = ProgramBuilder::new();
    let file = builder.add_file("infer.ts", |ast| {
        let box_param = ast.type_param("T", NodeIndex::NONE, NodeIndex::NONE);
        let value_type = ast.type_ref("T", vec![]);
        let value = ast.property_sig("value", value_type, false);
        let boxed = ast.interface("Box", vec![box_param], vec![], vec![value]);

        t = ast.type_param("T", NodeIndex::NONE, NodeIndex::NONE);
        let default = ast.keyword(KeywordTypeKind::String);
        u = ast.type_param("U", NodeIndex::NONE, default);
        let element = ast.type_ref("T", vec![]);
        array_of_t = ast.array_type(element);
        let a = ast.param("a", array_of_t);
        let argument = ast.type_ref("T", vec![]);
        box_of_t = ast.type_ref("Box", vec![argument]);
        let b = ast.param("b", box_of_t);
        let x_type = ast.type_ref("T", vec![]);
        let x = ast.param("x", x_type);
        let void = ast.keyword(KeywordTypeKind::Void);
        callback_of_t = ast.function_type(vec![], vec![x], void);
        let c = ast.param("c", callback_of_t);
        let void = ast.keyword(KeywordTypeKind::Void);
        let g = ast.function_decl("g", vec![t, u], vec![a, b, c], void, FunctionBody::None);
        let g = ast.declared(g);

        let string = ast.keyword(KeywordTypeKind::String);
        let box_string = ast.type_ref("Box", vec![string]);
        let box_var = ast.let_decl("box", box_string, NodeIndex::NONE);
        let string = ast.keyword(KeywordTypeKind::String);
        let x = ast.param("x", string);
        let void = ast.keyword(KeywordTypeKind::Void);
        let callback = ast.function_type(vec![], vec![x], void);
        let callback_var = ast.let_decl("callback", callback, NodeIndex::NONE);
        vec![boxed, g, box_var, callback_var]
    });
    Fixture {
        program: builder.build(),
        file,
        t,
        u,
        array_of_t,
        box_of_t,
        callback_of_t,
    }
}

fn type_parameter(checker: &mut Checker<'_>, node: NodeIndex) -> TypeId {
    let symbol = checker.get_symbol_of_node(node).expect("type parameter symbol");
    checker.get_declared_type_of_type_parameter(symbol)
}

fn variable_type(checker: &mut Checker<'_>, file: FileId, name: &str) -> TypeId {
    let symbol = checker.get_file_symbol(file, name).expect("variable");
    checker.get_type_of_symbol(symbol)
}

#[test]
fn test_infer_to_naked_type_parameter() {
    let fx = fixture();
    let mut checker = Checker::new(&fx.program, CheckerOptions::default());
    let t = type_parameter(&mut checker, fx.t);
    let context = checker.create_inference_context(&[t], None, InferenceFlags::empty());
    checker.infer_types(context, TypeId::STRING, t, InferencePriority::empty());
    assert_eq!(checker.get_inferred_types(context), vec![TypeId::STRING]);
}

#[test]
fn test_fresh_literal_candidates_widen_into_a_union() {
    let fx = fixture();
    let mut checker = Checker::new(&fx.program, CheckerOptions::default());
    let t = type_parameter(&mut checker, fx.t);
    let one = checker.ctx.types.number_literal(1.0);
    let one = checker.ctx.types.fresh_type_of(one);
    let a = checker.ctx.types.string_literal("a");
    let a = checker.ctx.types.fresh_type_of(a);
    let context = checker.create_inference_context(&[t], None, InferenceFlags::empty());
    checker.infer_types(context, one, t, InferencePriority::empty());
    checker.infer_types(context, a, t, InferencePriority::empty());
    let expected = checker.get_union_type(&[TypeId::NUMBER, TypeId::STRING]);
    assert_eq!(checker.get_inferred_types(context), vec![expected]);
}

#[test]
fn test_infer_through_array_element() {
    let fx = fixture();
    let mut checker = Checker::new(&fx.program, CheckerOptions::default());
    let t = type_parameter(&mut checker, fx.t);
    let target = checker.get_type_from_type_node(fx.array_of_t);
    let source = checker.create_array_type(TypeId::NUMBER, false);
    let context = checker.create_inference_context(&[t], None, InferenceFlags::empty());
    checker.infer_types(context, source, target, InferencePriority::empty());
    assert_eq!(checker.get_inferred_types(context), vec![TypeId::NUMBER]);
}

#[test]
fn test_infer_through_type_arguments() {
    let fx = fixture();
    let mut checker = Checker::new(&fx.program, CheckerOptions::default());
    let t = type_parameter(&mut checker, fx.t);
    let target = checker.get_type_from_type_node(fx.box_of_t);
    let source = variable_type(&mut checker, fx.file, "box");
    let context = checker.create_inference_context(&[t], None, InferenceFlags::empty());
    checker.infer_types(context, source, target, InferencePriority::empty());
    assert_eq!(checker.get_inferred_types(context), vec![TypeId::STRING]);
}

#[test]
fn test_infer_from_callback_parameter() {
    let fx = fixture();
    for options in [CheckerOptions::default(), CheckerOptions::strict()] {
        let mut checker = Checker::new(&fx.program, options);
        let t = type_parameter(&mut checker, fx.t);
        let target = checker.get_type_from_type_node(fx.callback_of_t);
        let source = variable_type(&mut checker, fx.file, "callback");
        let context = checker.create_inference_context(&[t], None, InferenceFlags::empty());
        checker.infer_types(context, source, target, InferencePriority::empty());
        assert_eq!(checker.get_inferred_types(context), vec![TypeId::STRING]);
    }
}

#[test]
fn test_parameters_without_candidates() {
    let fx = fixture();
    let mut checker = Checker::new(&fx.program, CheckerOptions::default());
    let t = type_parameter(&mut checker, fx.t);
    let u = type_parameter(&mut checker, fx.u);

    let context = checker.create_inference_context(&[t, u], None, InferenceFlags::empty());
    assert_eq!(checker.get_inferred_types(context), vec![TypeId::UNKNOWN, TypeId::STRING]);

    let context = checker.create_inference_context(&[t], None, InferenceFlags::ANY_DEFAULT);
    assert_eq!(checker.get_inferred_types(context), vec![TypeId::ANY]);

    let context = checker.create_inference_context(&[t], None, InferenceFlags::NO_DEFAULT);
    assert_eq!(checker.get_inferred_types(context), vec![TypeId::SILENT_NEVER]);
}

#[test]
fn test_fixed_parameter_ignores_later_candidates() {
    let fx = fixture();
    let mut checker = Checker::new(&fx.program, CheckerOptions::default());
    let t = type_parameter(&mut checker, fx.t);
    let context = checker.create_inference_context(&[t], None, InferenceFlags::empty());
    checker.infer_types(context, TypeId::STRING, t, InferencePriority::empty());
    assert_eq!(checker.map_inference_type(context, true, t), TypeId::STRING);
    checker.infer_types(context, TypeId::NUMBER, t, InferencePriority::empty());
    assert_eq!(checker.get_inferred_types(context), vec![TypeId::STRING]);
}

#[test]
fn test_priority_precedence() {
    let naked = InferencePriority::NAKED_TYPE_VARIABLE;
    let return_type = InferencePriority::RETURN_TYPE;
    assert!(naked.takes_precedence_over(return_type));
    assert!(!return_type.takes_precedence_over(naked));
    assert_eq!(return_type.min(naked), naked);
    assert!(InferencePriority::CIRCULARITY.takes_precedence_over(InferencePriority::empty()));
}

/// `interface Point { x }`, `interface Point3 { x; y; z }`,
/// `type Reader<A, B = number> = (x: A) => B`, the generic function
/// `function h<T>(r: Reader<T>, c: (x: T) => void): void` and sources
/// `let take_point: (x: Point) => void`, `let take_point3: (x: Point3) => void`,
/// `let take_one: (x: 1) => void`, `let take_a: (x: "a") => void` and
/// `let reader: Reader<string>`.
struct ReaderFixture {
    program: Program,
    file: FileId,
    t: NodeIndex,
    reader_of_t: NodeIndex,
    callback_of_t: NodeIndex,
}

fn reader_fixture() -> ReaderFixture {
    let mut t = NodeIndex::NONE;
    let mut reader_of_t = NodeIndex::NONE;
    let mut callback_of_t = NodeIndex::NONE;
    let mut builder = ProgramBuilder::new();
    let file = builder.add_file("reader.ts", |ast| {
        let mut statements = Vec::new();
        let number = ast.keyword(KeywordTypeKind::Number);
        let x = ast.property_sig("x", number, false);
        statements.push(ast.interface("Point", vec![], vec![], vec![x]));
        let members = ["x", "y", "z"]
            .iter()
            .map(|&name| {
                let number = ast.keyword(KeywordTypeKind::Number);
                ast.property_sig(name, number, false)
            })
            .collect();
        statements.push(ast.interface("Point3", vec![], vec![], members));

        let a = ast.type_param("A", NodeIndex::NONE, NodeIndex::NONE);
        let default = ast.keyword(KeywordTypeKind::Number);
        let b = ast.type_param("B", NodeIndex::NONE, default);
        let x_type = ast.type_ref("A", vec![]);
        let x = ast.param("x", x_type);
        let result = ast.type_ref("B", vec![]);
        let reader_fn = ast.function_type(vec![], vec![x], result);
        statements.push(ast.type_alias("Reader", vec![a, b], reader_fn));

        t = ast.type_param("T", NodeIndex::NONE, NodeIndex::NONE);
        let argument = ast.type_ref("T", vec![]);
        reader_of_t = ast.type_ref("Reader", vec![argument]);
        let r = ast.param("r", reader_of_t);
        let x_type = ast.type_ref("T", vec![]);
        let x = ast.param("x", x_type);
        let void = ast.keyword(KeywordTypeKind::Void);
        callback_of_t = ast.function_type(vec![], vec![x], void);
        let c = ast.param("c", callback_of_t);
        let void = ast.keyword(KeywordTypeKind::Void);
        let h = ast.function_decl("h", vec![t], vec![r, c], void, FunctionBody::None);
        statements.push(ast.declared(h));

        let one = ast.num_lit(1.0);
        let one = ast.literal_type(one);
        let a = ast.string_lit("a");
        let a = ast.literal_type(a);
        let point = ast.type_ref("Point", vec![]);
        let point3 = ast.type_ref("Point3", vec![]);
        for (name, parameter) in [("take_point", point), ("take_point3", point3), ("take_one", one), ("take_a", a)] {
            let x = ast.param("x", parameter);
            let void = ast.keyword(KeywordTypeKind::Void);
            let callback = ast.function_type(vec![], vec![x], void);
            statements.push(ast.let_decl(name, callback, NodeIndex::NONE));
        }

        let string = ast.keyword(KeywordTypeKind::String);
        let reader_string = ast.type_ref("Reader", vec![string]);
        statements.push(ast.let_decl("reader", reader_string, NodeIndex::NONE));
        statements
    });
    ReaderFixture {
        program: builder.build(),
        file,
        t,
        reader_of_t,
        callback_of_t,
    }
}

#[test]
fn test_infer_through_alias_type_arguments() {
    let fx = reader_fixture();
    let mut checker = Checker::new(&fx.program, CheckerOptions::strict());
    let t = type_parameter(&mut checker, fx.t);
    let target = checker.get_type_from_type_node(fx.reader_of_t);
    let source = variable_type(&mut checker, fx.file, "reader");
    let context = checker.create_inference_context(&[t], None, InferenceFlags::empty());
    checker.infer_types(context, source, target, InferencePriority::empty());
    // `A` is contravariant in `Reader`, so the candidate is contravariant.
    assert_eq!(checker.inference_context(context).infos[0].contra_candidates, vec![TypeId::STRING]);
    assert!(checker.inference_context(context).infos[0].candidates.is_empty());
    assert_eq!(checker.get_inferred_types(context), vec![TypeId::STRING]);
}

#[test]
fn test_contravariant_candidates_pick_the_common_subtype() {
    let fx = reader_fixture();
    for names in [["take_point", "take_point3"], ["take_point3", "take_point"]] {
        let mut checker = Checker::new(&fx.program, CheckerOptions::strict());
        let t = type_parameter(&mut checker, fx.t);
        let target = checker.get_type_from_type_node(fx.callback_of_t);
        let point3 = {
            let symbol = checker.get_file_symbol(fx.file, "Point3").expect("Point3");
            checker.get_declared_type_of_symbol(symbol)
        };
        let context = checker.create_inference_context(&[t], None, InferenceFlags::empty());
        for name in names {
            let source = variable_type(&mut checker, fx.file, name);
            checker.infer_types(context, source, target, InferencePriority::empty());
        }
        assert_eq!(checker.get_inferred_types(context), vec![point3]);
    }
}

#[test]
fn test_unrelated_contravariant_candidates_keep_the_first() {
    let fx = reader_fixture();
    let mut checker = Checker::new(&fx.program, CheckerOptions::strict());
    let t = type_parameter(&mut checker, fx.t);
    let target = checker.get_type_from_type_node(fx.callback_of_t);
    let context = checker.create_inference_context(&[t], None, InferenceFlags::empty());
    for name in ["take_one", "take_a"] {
        let source = variable_type(&mut checker, fx.file, name);
        checker.infer_types(context, source, target, InferencePriority::empty());
    }
    let one = checker.ctx.types.number_literal(1.0);
    assert_eq!(checker.get_inferred_types(context), vec![one]);
}
