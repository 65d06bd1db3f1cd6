use super::*;
use crate::type_list_id::get_type_list_id;

#[test]
fn test_intrinsics_have_fixed_ids() {
    let interner = TypeInterner::new();
    assert_eq!(interner.len() as u32, TypeId::FIRST_USER);
    assert!(interner.flags(TypeId::ANY).contains(TypeFlags::ANY));
    assert!(interner.flags(TypeId::ERROR).contains(TypeFlags::ANY));
    assert!(interner.flags(TypeId::STRING).contains(TypeFlags::STRING));
    assert!(interner.flags(TypeId::NON_PRIMITIVE).contains(TypeFlags::NON_PRIMITIVE));
    assert!(interner.flags(TypeId::SILENT_NEVER).contains(TypeFlags::NEVER));
    assert!(
        interner
            .object_flags(TypeId::SILENT_NEVER)
            .contains(ObjectFlags::NON_INFERRABLE_TYPE)
    );
    assert!(
        interner
            .object_flags(TypeId::EMPTY_OBJECT)
            .contains(ObjectFlags::MEMBERS_RESOLVED)
    );
}

#[test]
fn test_boolean_is_union_of_regular_literals() {
    let interner = TypeInterner::new();
    let boolean = interner.get(TypeId::BOOLEAN);
    assert!(boolean.flags.contains(TypeFlags::UNION | TypeFlags::BOOLEAN));
    assert_eq!(
        boolean.constituents(),
        &[TypeId::REGULAR_FALSE, TypeId::REGULAR_TRUE]
    );
    assert_eq!(interner.regular_type_of(TypeId::TRUE), TypeId::REGULAR_TRUE);
    assert!(interner.is_fresh_literal(TypeId::FALSE));
    assert!(!interner.is_fresh_literal(TypeId::REGULAR_FALSE));
}

#[test]
fn test_marker_sub_is_constrained_to_marker_super() {
    let interner = TypeInterner::new();
    let sub = interner.get(TypeId::MARKER_SUB).as_type_parameter().unwrap();
    assert_eq!(sub.constraint, Some(TypeId::MARKER_SUPER));
}

#[test]
fn test_literal_interning_is_idempotent() {
    let mut interner = TypeInterner::new();
    let a1 = interner.string_literal("a");
    let a2 = interner.string_literal("a");
    let b = interner.string_literal("b");
    assert_eq!(a1, a2);
    assert_ne!(a1, b);

    let zero = interner.number_literal(0.0);
    let negative_zero = interner.number_literal(-0.0);
    assert_eq!(zero, negative_zero);

    let big = interner.bigint_literal(PseudoBigInt {
        negative: false,
        base10_value: "10".into(),
    });
    let big_again = interner.bigint_literal(PseudoBigInt {
        negative: false,
        base10_value: "10".into(),
    });
    assert_eq!(big, big_again);
}

#[test]
fn test_fresh_literal_pairs() {
    let mut interner = TypeInterner::new();
    let regular = interner.number_literal(42.0);
    let fresh = interner.fresh_type_of(regular);
    assert_ne!(regular, fresh);
    assert_eq!(interner.fresh_type_of(regular), fresh);
    assert_eq!(interner.fresh_type_of(fresh), fresh);
    assert_eq!(interner.regular_type_of(fresh), regular);
    assert_eq!(interner.regular_type_of(regular), regular);
    assert_eq!(interner.fresh_type_of(TypeId::STRING), TypeId::STRING);
}

#[test]
fn test_union_from_sorted_list_is_interned() {
    let mut interner = TypeInterner::new();
    let a = interner.string_literal("a");
    let u1 = interner.union_from_sorted_list(vec![TypeId::STRING, TypeId::NUMBER, a], ObjectFlags::empty(), None, None);
    let u2 = interner.union_from_sorted_list(vec![TypeId::STRING, TypeId::NUMBER, a], ObjectFlags::empty(), None, None);
    assert_eq!(u1, u2);
    assert_eq!(
        interner.union_from_sorted_list(vec![TypeId::STRING], ObjectFlags::empty(), None, None),
        TypeId::STRING
    );
    assert_eq!(
        interner.union_from_sorted_list(vec![], ObjectFlags::empty(), None, None),
        TypeId::NEVER
    );
}

#[test]
fn test_alias_keys_unions_separately() {
    let mut interner = TypeInterner::new();
    let plain = interner.union_from_sorted_list(vec![TypeId::STRING, TypeId::NUMBER], ObjectFlags::empty(), None, None);
    let alias = TypeAlias {
        symbol: SymbolId(7),
        type_arguments: vec![],
    };
    let aliased = interner.union_from_sorted_list(
        vec![TypeId::STRING, TypeId::NUMBER],
        ObjectFlags::empty(),
        Some(alias.clone()),
        None,
    );
    assert_ne!(plain, aliased);
    assert_eq!(interner.get(aliased).alias.as_ref(), Some(&alias));
}

#[test]
fn test_union_propagates_widening_flags_except_nullable() {
    let mut interner = TypeInterner::new();
    let u = interner.union_from_sorted_list(
        vec![TypeId::UNDEFINED_WIDENING, TypeId::STRING],
        ObjectFlags::empty(),
        None,
        None,
    );
    assert!(!interner.object_flags(u).contains(ObjectFlags::CONTAINS_WIDENING_TYPE));
}

#[test]
fn test_intersection_preserves_order_in_key() {
    let mut interner = TypeInterner::new();
    let p = interner.create_type_parameter(SymbolId(1));
    let q = interner.create_type_parameter(SymbolId(2));
    let pq = interner.intersection_from_list(vec![p, q], ObjectFlags::empty(), None);
    let qp = interner.intersection_from_list(vec![q, p], ObjectFlags::empty(), None);
    assert_ne!(pq, qp);
    assert_eq!(interner.intersection_from_list(vec![p, q], ObjectFlags::empty(), None), pq);
}

#[test]
fn test_indexed_access_key_uses_persistent_flags_only() {
    let mut interner = TypeInterner::new();
    let t = interner.create_type_parameter(SymbolId(1));
    let a = interner.indexed_access(t, TypeId::STRING, AccessFlags::empty(), None);
    let b = interner.indexed_access(t, TypeId::STRING, AccessFlags::WRITING, None);
    let c = interner.indexed_access(t, TypeId::STRING, AccessFlags::INCLUDE_UNDEFINED, None);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_type_references_are_cached_per_target_and_arguments() {
    let mut interner = TypeInterner::new();
    let target = interner.create_anonymous_type(SymbolId(3), None, ObjectFlags::empty());
    let r1 = interner.create_type_reference(target, vec![TypeId::STRING]);
    let r2 = interner.create_type_reference(target, vec![TypeId::STRING]);
    let r3 = interner.create_type_reference(target, vec![TypeId::NUMBER]);
    assert_eq!(r1, r2);
    assert_ne!(r1, r3);
    assert_eq!(interner.symbol(r1), SymbolId(3));
}

#[test]
fn test_template_literal_interning() {
    let mut interner = TypeInterner::new();
    let a = interner.template_literal(vec!["a".into(), "b".into()], vec![TypeId::STRING]);
    let b = interner.template_literal(vec!["a".into(), "b".into()], vec![TypeId::STRING]);
    let c = interner.template_literal(vec!["ab".into(), "".into()], vec![TypeId::STRING]);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_type_list_id_run_length_encoding() {
    assert_eq!(get_type_list_id(&[]), "");
    assert_eq!(get_type_list_id(&[TypeId(5)]), "5");
    assert_eq!(get_type_list_id(&[TypeId(5), TypeId(6), TypeId(7)]), "5:3");
    assert_eq!(get_type_list_id(&[TypeId(5), TypeId(7)]), "5,7");
    // 64 needs two digits.
    assert_eq!(get_type_list_id(&[TypeId(64)]), "10");
    // Distinct lists never collide.
    assert_ne!(
        get_type_list_id(&[TypeId(1), TypeId(2)]),
        get_type_list_id(&[TypeId(12)])
    );
}

#[test]
fn test_tuple_target_key() {
    let key = TypeInterner::tuple_target_key(
        &[ElementFlags::REQUIRED, ElementFlags::OPTIONAL, ElementFlags::REST],
        true,
        None,
    );
    assert_eq!(key, "#?.R");
}
