use super::*;
use crate::context::CheckerOptions;
use crate::state::Checker;
use tyck_binder::{KeywordTypeKind, NodeIndex, Program, ProgramBuilder};

/// `interface Box<T> { value: T }`, `let b: Box<string>` and the statement
/// `b.value;`.
fn boxed_program() -> Program {
    let mut builder = ProgramBuilder::new();
    builder.add_file("box.ts", |ast| {
        let t = ast.type_param("T", NodeIndex::NONE, NodeIndex::NONE);
        let value_type = ast.type_ref("T", vec![]);
        let value = ast.property_sig("value", value_type, false);
        let boxed = ast.interface("Box", vec![t], vec![], vec![value]);
        let string = ast.keyword(KeywordTypeKind::String);
        let box_string = ast.type_ref("Box", vec![string]);
        let b = ast.let_decl("b", box_string, NodeIndex::NONE);
        let target = ast.ident("b");
        let access = ast.prop_access(target, "value");
        let statement = ast.expr_stmt(access);
        vec![boxed, b, statement]
    });
    builder.build()
}

fn string_mapper(checker: &mut Checker<'_>) -> (TypeId, Rc<TypeMapper>) {
    let parameter = checker.ctx.types.create_type_parameter(SymbolId::NONE);
    (parameter, TypeMapper::from_lists(vec![parameter], Some(vec![TypeId::STRING])))
}

fn excessive_instantiation_count(checker: &Checker<'_>) -> usize {
    checker
        .ctx
        .diagnostics
        .iter()
        .filter(|d| d.code == diagnostic_codes::TYPE_INSTANTIATION_EXCESSIVELY_DEEP)
        .count()
}

#[test]
fn test_instantiation_depth_cap() {
    let program = boxed_program();
    let mut checker = Checker::new(&program, CheckerOptions::default());
    let (parameter, mapper) = string_mapper(&mut checker);
    assert_eq!(checker.instantiate_type(parameter, &mapper), TypeId::STRING);

    checker.ctx.instantiation_depth = MAX_INSTANTIATION_DEPTH;
    assert_eq!(checker.instantiate_type(parameter, &mapper), TypeId::ERROR);
    assert_eq!(excessive_instantiation_count(&checker), 1);
    assert_eq!(checker.ctx.instantiation_depth, MAX_INSTANTIATION_DEPTH);

    checker.ctx.instantiation_depth = 0;
    assert_eq!(checker.instantiate_type(parameter, &mapper), TypeId::STRING);
    assert_eq!(checker.ctx.instantiation_depth, 0);
}

#[test]
fn test_instantiation_count_cap() {
    let program = boxed_program();
    let mut checker = Checker::new(&program, CheckerOptions::default());
    let (parameter, mapper) = string_mapper(&mut checker);
    checker.ctx.instantiation_count = MAX_INSTANTIATION_COUNT;
    assert_eq!(checker.instantiate_type(parameter, &mapper), TypeId::ERROR);
    assert_eq!(excessive_instantiation_count(&checker), 1);
}

#[test]
fn test_instantiation_budget_is_per_statement() {
    let program = boxed_program();
    let mut checker = Checker::new(&program, CheckerOptions::default());
    // A budget spent by earlier work does not leak into the next statement.
    checker.ctx.instantiation_count = MAX_INSTANTIATION_COUNT;
    checker.check_program();
    assert_eq!(excessive_instantiation_count(&checker), 0);
    assert!(checker.ctx.instantiation_count < MAX_INSTANTIATION_COUNT);
    assert!(checker.get_diagnostics().is_empty(), "{:?}", checker.get_diagnostics());
}
