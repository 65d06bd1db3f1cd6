use super::*;
use crate::context::CheckerOptions;
use crate::state::Checker;
use tyck_binder::{Program, ProgramBuilder};

fn empty_program() -> Program {
    let mut builder = ProgramBuilder::new();
    builder.add_file("empty.ts", |_| Vec::new());
    builder.build()
}

#[test]
fn test_trivial_unions() {
    let program = empty_program();
    let mut checker = Checker::new(&program, CheckerOptions::default());
    assert_eq!(checker.get_union_type(&[]), TypeId::NEVER);
    assert_eq!(checker.get_union_type(&[TypeId::STRING]), TypeId::STRING);
    assert_eq!(checker.get_union_type(&[TypeId::STRING, TypeId::STRING]), TypeId::STRING);
    assert_eq!(checker.get_union_type(&[TypeId::NUMBER, TypeId::NEVER]), TypeId::NUMBER);
}

#[test]
fn test_union_is_order_independent() {
    let program = empty_program();
    let mut checker = Checker::new(&program, CheckerOptions::default());
    let a = checker.ctx.types.string_literal("a");
    let b = checker.ctx.types.string_literal("b");
    let c = checker.ctx.types.string_literal("c");
    let abc = checker.get_union_type(&[a, b, c]);
    let cba = checker.get_union_type(&[c, b, a, b]);
    assert_eq!(abc, cba);
    assert!(checker.type_flags(abc).contains(TypeFlags::UNION));
    assert_eq!(checker.union_constituents(abc).len(), 3);
}

#[test]
fn test_nested_unions_flatten() {
    let program = empty_program();
    let mut checker = Checker::new(&program, CheckerOptions::default());
    let a = checker.ctx.types.string_literal("a");
    let b = checker.ctx.types.string_literal("b");
    let one = checker.ctx.types.number_literal(1.0);
    let ab = checker.get_union_type(&[a, b]);
    let nested = checker.get_union_type(&[ab, one]);
    let flat = checker.get_union_type(&[a, b, one]);
    assert_eq!(nested, flat);
}

#[test]
fn test_literals_are_absorbed_by_their_base_type() {
    let program = empty_program();
    let mut checker = Checker::new(&program, CheckerOptions::default());
    let a = checker.ctx.types.string_literal("a");
    let one = checker.ctx.types.number_literal(1.0);
    assert_eq!(checker.get_union_type(&[a, TypeId::STRING]), TypeId::STRING);
    let mixed = checker.get_union_type(&[a, one, TypeId::NUMBER]);
    let expected = checker.get_union_type(&[a, TypeId::NUMBER]);
    assert_eq!(mixed, expected);
}

#[test]
fn test_any_and_unknown_dominate() {
    let program = empty_program();
    let mut checker = Checker::new(&program, CheckerOptions::default());
    assert_eq!(checker.get_union_type(&[TypeId::STRING, TypeId::ANY]), TypeId::ANY);
    assert_eq!(checker.get_union_type(&[TypeId::STRING, TypeId::UNKNOWN]), TypeId::UNKNOWN);
    assert_eq!(
        checker.get_union_type(&[TypeId::UNKNOWN, TypeId::ANY, TypeId::NUMBER]),
        TypeId::ANY
    );
}

#[test]
fn test_boolean_literals_form_boolean() {
    let program = empty_program();
    let mut checker = Checker::new(&program, CheckerOptions::default());
    let boolean = checker.get_union_type(&[TypeId::REGULAR_TRUE, TypeId::REGULAR_FALSE]);
    assert_eq!(boolean, TypeId::BOOLEAN);
    assert_eq!(checker.type_to_string(boolean), "boolean");
}

#[test]
fn test_subtype_reduction_removes_subsumed_members() {
    let program = empty_program();
    let mut checker = Checker::new(&program, CheckerOptions::default());
    let a = checker.ctx.types.string_literal("a");
    let reduced = checker.get_union_type_ex(&[a, TypeId::STRING, TypeId::NEVER], UnionReduction::Subtype, None, None);
    assert_eq!(reduced, TypeId::STRING);
    let kept = checker.get_union_type_ex(&[TypeId::STRING, TypeId::NUMBER], UnionReduction::Subtype, None, None);
    let literal = checker.get_union_type(&[TypeId::NUMBER, TypeId::STRING]);
    assert_eq!(kept, literal);
}

#[test]
fn test_nullable_members_are_removed_by_non_nullable() {
    let program = empty_program();
    let mut checker = Checker::new(&program, CheckerOptions::strict());
    let maybe = checker.get_union_type(&[TypeId::STRING, TypeId::NULL, TypeId::UNDEFINED]);
    assert_eq!(checker.get_non_nullable_type(maybe), TypeId::STRING);
}

#[test]
fn test_disjoint_primitive_intersection_is_never() {
    let program = empty_program();
    let mut checker = Checker::new(&program, CheckerOptions::default());
    assert_eq!(checker.get_intersection_type(&[TypeId::STRING, TypeId::NUMBER]), TypeId::NEVER);
    assert_eq!(checker.get_intersection_type(&[TypeId::STRING, TypeId::UNKNOWN]), TypeId::STRING);
    assert_eq!(checker.get_intersection_type(&[TypeId::STRING, TypeId::ANY]), TypeId::ANY);
    let a = checker.ctx.types.string_literal("a");
    assert_eq!(checker.get_intersection_type(&[a, TypeId::STRING]), a);
}

#[test]
fn test_intersection_distributes_over_union() {
    let program = empty_program();
    let mut checker = Checker::new(&program, CheckerOptions::default());
    let a = checker.ctx.types.string_literal("a");
    let one = checker.ctx.types.number_literal(1.0);
    let mixed = checker.get_union_type(&[a, one]);
    assert_eq!(checker.get_intersection_type(&[mixed, TypeId::STRING]), a);
}
