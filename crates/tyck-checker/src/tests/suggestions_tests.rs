use super::*;

#[test]
fn test_suggests_transposed_letters() {
    let suggestion = get_spelling_suggestion("lenght", ["length", "push", "pop"]);
    assert_eq!(suggestion.as_deref(), Some("length"));
}

#[test]
fn test_suggests_case_only_difference() {
    assert_eq!(get_spelling_suggestion("Bar", ["bar"]).as_deref(), Some("bar"));
}

#[test]
fn test_short_candidates_need_case_match() {
    assert_eq!(get_spelling_suggestion("x", ["y"]), None);
    assert_eq!(get_spelling_suggestion("x", ["X"]).as_deref(), Some("X"));
}

#[test]
fn test_rejects_distant_names() {
    assert_eq!(get_spelling_suggestion("foo", ["completelyDifferent"]), None);
    assert_eq!(get_spelling_suggestion("bra", ["bar"]), None);
}

#[test]
fn test_prefers_closest_candidate() {
    let suggestion = get_spelling_suggestion("fooo", ["foo", "fooooo"]);
    assert_eq!(suggestion.as_deref(), Some("foo"));
}

#[test]
fn test_never_suggests_identical_name() {
    assert_eq!(get_spelling_suggestion("foo", ["foo"]), None);
}

#[test]
fn test_levenshtein_case_substitution_is_cheap() {
    let d = levenshtein_with_max("abc", "abC", 5.0);
    assert!(d.is_some_and(|d| (d - 0.1).abs() < 1e-9));
}
