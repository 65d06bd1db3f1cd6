use super::*;
use crate::context::CheckerOptions;
use crate::state::Checker;
use tyck_binder::{Program, ProgramBuilder, SymbolId};

fn empty_program() -> Program {
    let mut builder = ProgramBuilder::new();
    builder.add_file("empty.ts", |_| Vec::new());
    builder.build()
}

#[test]
fn test_single_member_is_itself() {
    let program = empty_program();
    let mut checker = Checker::new(&program, CheckerOptions::default());
    let t = checker.ctx.types.create_type_parameter(SymbolId::NONE);
    assert_eq!(checker.get_intersection_type(&[t]), t);
    assert_eq!(checker.get_intersection_type(&[t, t]), t);
    assert_eq!(checker.get_intersection_type(&[]), TypeId::UNKNOWN);
}

#[test]
fn test_empty_object_and_null_is_never_under_strict_null_checks() {
    let program = empty_program();
    let mut checker = Checker::new(&program, CheckerOptions::strict());
    assert_eq!(
        checker.get_intersection_type(&[TypeId::EMPTY_TYPE_LITERAL, TypeId::NULL]),
        TypeId::NEVER
    );
    assert_eq!(
        checker.get_intersection_type(&[TypeId::NULL, TypeId::EMPTY_TYPE_LITERAL]),
        TypeId::NEVER
    );
}

#[test]
fn test_disjoint_primitives_are_never() {
    let program = empty_program();
    let mut checker = Checker::new(&program, CheckerOptions::strict());
    assert_eq!(checker.get_intersection_type(&[TypeId::STRING, TypeId::NUMBER]), TypeId::NEVER);
    let a = checker.ctx.types.string_literal("a");
    assert_eq!(checker.get_intersection_type(&[TypeId::STRING, a]), a);
}

#[test]
fn test_distributed_intersection_is_cached() {
    let program = empty_program();
    let mut checker = Checker::new(&program, CheckerOptions::default());
    let t = checker.ctx.types.create_type_parameter(SymbolId::NONE);
    let either = checker.get_union_type(&[TypeId::STRING, TypeId::NUMBER]);
    let first = checker.get_intersection_type(&[t, either]);
    assert!(checker.type_flags(first).contains(TypeFlags::UNION));

    let key = TypeInterner::intersection_key(&[t, either], None);
    assert_eq!(checker.ctx.types.lookup_intersection(&key), Some(first));
    assert_eq!(checker.get_intersection_type(&[t, either]), first);
}
