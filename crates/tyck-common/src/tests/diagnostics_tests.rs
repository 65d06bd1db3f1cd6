use super::*;

#[test]
fn test_format_message_replaces_placeholders() {
    let text = format_message("Property '{0}' does not exist on type '{1}'.", &["bar", "Foo"]);
    assert_eq!(text, "Property 'bar' does not exist on type 'Foo'.");
}

#[test]
fn test_format_message_repeated_placeholder() {
    let text = format_message(diagnostic_messages::REFERS_TO_A_VALUE_USED_AS_TYPE, &["x"]);
    assert_eq!(
        text,
        "'x' refers to a value, but is being used as a type here. Did you mean 'typeof x'?"
    );
}

#[test]
fn test_message_table_is_consistent() {
    assert_eq!(
        get_message_template(diagnostic_codes::DUPLICATE_IDENTIFIER),
        Some(diagnostic_messages::DUPLICATE_IDENTIFIER)
    );
    assert_eq!(
        get_diagnostic_category(diagnostic_codes::WAS_ALSO_DECLARED_HERE),
        Some(DiagnosticCategory::Message)
    );
    let mut codes: Vec<u32> = DIAGNOSTIC_MESSAGES.iter().map(|m| m.code).collect();
    let len = codes.len();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), len, "duplicate diagnostic code in table");
}

#[test]
fn test_from_code_formats_and_categorizes() {
    let diag = Diagnostic::from_code(
        "a.ts".to_string(),
        3,
        4,
        diagnostic_codes::CANNOT_FIND_NAME,
        &["foo"],
    );
    assert_eq!(diag.message_text, "Cannot find name 'foo'.");
    assert_eq!(diag.category, DiagnosticCategory::Error);
    assert_eq!(diag.code, 2304);
}

#[test]
fn test_sort_and_deduplicate() {
    let mk = |file: &str, start: u32, code: u32| {
        Diagnostic::from_code(file.to_string(), start, 1, code, &["x"])
    };
    let mut diags = vec![
        mk("b.ts", 0, 2304),
        mk("a.ts", 5, 2304),
        mk("a.ts", 5, 2304),
        mk("a.ts", 1, 2300),
    ];
    sort_and_deduplicate_diagnostics(&mut diags);
    let keys: Vec<(&str, u32)> = diags.iter().map(|d| (d.file.as_str(), d.start)).collect();
    assert_eq!(keys, vec![("a.ts", 1), ("a.ts", 5), ("b.ts", 0)]);
}

#[test]
fn test_diagnostic_serializes_without_empty_related() {
    let diag = Diagnostic::error("a.ts".to_string(), 0, 1, "m".to_string(), 1);
    let json = serde_json::to_string(&diag).unwrap();
    assert!(!json.contains("related_information"));
    let with = diag.with_related("b.ts".to_string(), 2, 3, "here".to_string());
    let json = serde_json::to_string(&with).unwrap();
    assert!(json.contains("related_information"));
}
