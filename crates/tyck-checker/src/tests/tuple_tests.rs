use super::*;
use crate::context::CheckerOptions;
use crate::state::Checker;
use tyck_binder::{Program, ProgramBuilder};
use tyck_common::limits::MAX_CROSS_PRODUCT_SIZE;

fn empty_program() -> Program {
    let mut builder = ProgramBuilder::new();
    builder.add_file("empty.ts", |_| Vec::new());
    builder.build()
}

fn tuple(checker: &mut Checker<'_>, types: &[TypeId], flags: &[ElementFlags]) -> TypeId {
    checker.create_tuple_type(types, Some(flags), false, &[])
}

fn flags_of(checker: &Checker<'_>, t: TypeId) -> Vec<ElementFlags> {
    checker.tuple_target_info(t).expect("tuple").element_flags
}

fn codes(checker: &Checker<'_>) -> Vec<u32> {
    checker.ctx.diagnostics.iter().map(|d| d.code).collect()
}

#[test]
fn test_variadic_never_element_is_never() {
    let program = empty_program();
    let mut checker = Checker::new(&program, CheckerOptions::default());
    let t = tuple(
        &mut checker,
        &[TypeId::NEVER, TypeId::STRING],
        &[ElementFlags::VARIADIC, ElementFlags::REQUIRED],
    );
    assert_eq!(t, TypeId::NEVER);
    assert!(checker.ctx.diagnostics.is_empty());
}

#[test]
fn test_optional_before_required_is_promoted() {
    let program = empty_program();
    let mut checker = Checker::new(&program, CheckerOptions::default());
    let t = tuple(
        &mut checker,
        &[TypeId::STRING, TypeId::NUMBER],
        &[ElementFlags::OPTIONAL, ElementFlags::REQUIRED],
    );
    assert_eq!(flags_of(&checker, t), vec![ElementFlags::REQUIRED, ElementFlags::REQUIRED]);
    assert_eq!(checker.tuple_target_info(t).map(|i| i.min_length), Some(2));
}

#[test]
fn test_trailing_rest_run_collapses() {
    let program = empty_program();
    let mut checker = Checker::new(&program, CheckerOptions::default());
    // [string, ...number[], boolean?]
    let t = tuple(
        &mut checker,
        &[TypeId::STRING, TypeId::NUMBER, TypeId::BOOLEAN],
        &[ElementFlags::REQUIRED, ElementFlags::REST, ElementFlags::OPTIONAL],
    );
    assert_eq!(flags_of(&checker, t), vec![ElementFlags::REQUIRED, ElementFlags::REST]);
    let rest = checker.get_union_type(&[TypeId::NUMBER, TypeId::BOOLEAN]);
    assert_eq!(checker.get_element_types(t), vec![TypeId::STRING, rest]);
}

#[test]
fn test_normalization_is_idempotent() {
    let program = empty_program();
    let mut checker = Checker::new(&program, CheckerOptions::default());
    let layouts: [(&[TypeId], &[ElementFlags]); 3] = [
        (
            &[TypeId::STRING, TypeId::NUMBER],
            &[ElementFlags::OPTIONAL, ElementFlags::REQUIRED],
        ),
        (
            &[TypeId::STRING, TypeId::NUMBER, TypeId::BOOLEAN],
            &[ElementFlags::REQUIRED, ElementFlags::REST, ElementFlags::OPTIONAL],
        ),
        (
            &[TypeId::STRING, TypeId::NUMBER, TypeId::BOOLEAN],
            &[ElementFlags::REQUIRED, ElementFlags::OPTIONAL, ElementFlags::REST],
        ),
    ];
    for (types, flags) in layouts {
        let once = tuple(&mut checker, types, flags);
        let elements = checker.get_element_types(once);
        let once_flags = flags_of(&checker, once);
        let twice = tuple(&mut checker, &elements, &once_flags);
        assert_eq!(once, twice);

        let info = checker.tuple_target_info(once).expect("tuple");
        assert!(info.min_length <= info.fixed_length);
    }
}

#[test]
fn test_min_length_never_exceeds_fixed_length() {
    let program = empty_program();
    let mut checker = Checker::new(&program, CheckerOptions::default());
    // [string, number?, ...boolean[]]
    let t = tuple(
        &mut checker,
        &[TypeId::STRING, TypeId::NUMBER, TypeId::BOOLEAN],
        &[ElementFlags::REQUIRED, ElementFlags::OPTIONAL, ElementFlags::REST],
    );
    let info = checker.tuple_target_info(t).expect("tuple");
    assert_eq!(info.min_length, 1);
    assert_eq!(info.fixed_length, 2);
    assert!(info.has_rest_element);
}

#[test]
fn test_concrete_tuple_spread_is_flattened() {
    let program = empty_program();
    let mut checker = Checker::new(&program, CheckerOptions::default());
    let inner = tuple(
        &mut checker,
        &[TypeId::STRING, TypeId::BOOLEAN],
        &[ElementFlags::REQUIRED, ElementFlags::OPTIONAL],
    );
    // [number, ...[string, boolean?]]
    let t = tuple(
        &mut checker,
        &[TypeId::NUMBER, inner],
        &[ElementFlags::REQUIRED, ElementFlags::VARIADIC],
    );
    assert_eq!(
        flags_of(&checker, t),
        vec![ElementFlags::REQUIRED, ElementFlags::REQUIRED, ElementFlags::OPTIONAL]
    );
    assert_eq!(
        checker.get_element_types(t),
        vec![TypeId::NUMBER, TypeId::STRING, TypeId::BOOLEAN]
    );
}

#[test]
fn test_union_of_tuples_spread_distributes() {
    let program = empty_program();
    let mut checker = Checker::new(&program, CheckerOptions::default());
    let just_string = tuple(&mut checker, &[TypeId::STRING], &[ElementFlags::REQUIRED]);
    let just_number = tuple(&mut checker, &[TypeId::NUMBER], &[ElementFlags::REQUIRED]);
    let either = checker.get_union_type(&[just_string, just_number]);
    // [boolean, ...([string] | [number])]
    let spread = tuple(
        &mut checker,
        &[TypeId::BOOLEAN, either],
        &[ElementFlags::REQUIRED, ElementFlags::VARIADIC],
    );
    let with_string = tuple(
        &mut checker,
        &[TypeId::BOOLEAN, TypeId::STRING],
        &[ElementFlags::REQUIRED, ElementFlags::REQUIRED],
    );
    let with_number = tuple(
        &mut checker,
        &[TypeId::BOOLEAN, TypeId::NUMBER],
        &[ElementFlags::REQUIRED, ElementFlags::REQUIRED],
    );
    let expected = checker.get_union_type(&[with_string, with_number]);
    assert_eq!(spread, expected);
}

#[test]
fn test_oversized_spread_reports_2799() {
    let program = empty_program();
    let mut checker = Checker::new(&program, CheckerOptions::default());
    let huge = checker.create_tuple_type(&vec![TypeId::STRING; MAX_TUPLE_ELEMENTS], None, false, &[]);
    let t = tuple(&mut checker, &[huge], &[ElementFlags::VARIADIC]);
    assert_eq!(t, TypeId::ERROR);
    assert_eq!(codes(&checker), vec![diagnostic_codes::TUPLE_TYPE_TOO_LARGE]);
}

#[test]
fn test_variadic_cross_product_reports_2590() {
    let program = empty_program();
    let mut checker = Checker::new(&program, CheckerOptions::default());
    let literals: Vec<TypeId> = (0..400).map(|n| checker.ctx.types.number_literal(n as f64)).collect();
    let wide = checker.get_union_type(&literals);
    assert!(400 * 400 >= MAX_CROSS_PRODUCT_SIZE);
    let t = tuple(
        &mut checker,
        &[wide, wide],
        &[ElementFlags::VARIADIC, ElementFlags::VARIADIC],
    );
    assert_eq!(t, TypeId::ERROR);
    assert_eq!(codes(&checker), vec![diagnostic_codes::UNION_TYPE_TOO_COMPLEX]);
}
