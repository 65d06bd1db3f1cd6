use super::*;
use crate::context::CheckerOptions;
use crate::state::Checker;
use tyck_binder::{NodeArena, Program, ProgramBuilder};

fn class_c(ast: &mut NodeArena) -> Vec<NodeIndex> {
    vec![ast.class_decl("C", vec![], NodeIndex::NONE, vec![], vec![])]
}

fn duplicate_class_program(first: &str, second: &str) -> Program {
    let mut builder = ProgramBuilder::new();
    builder.add_file(first, class_c);
    builder.add_file(second, class_c);
    builder.build()
}

/// `(file, code)` of every diagnostic, sorted.
fn located_codes(program: &Program) -> Vec<(String, u32)> {
    let mut checker = Checker::new(program, CheckerOptions::default());
    checker.check_program();
    let mut located: Vec<(String, u32)> = checker
        .get_diagnostics()
        .into_iter()
        .map(|d| (d.file, d.code))
        .collect();
    located.sort();
    located
}

#[test]
fn test_duplicate_global_class_reported_in_both_files() {
    let expected = vec![
        ("a.ts".to_string(), diagnostic_codes::DUPLICATE_IDENTIFIER),
        ("b.ts".to_string(), diagnostic_codes::DUPLICATE_IDENTIFIER),
    ];
    assert_eq!(located_codes(&duplicate_class_program("a.ts", "b.ts")), expected);
    assert_eq!(located_codes(&duplicate_class_program("b.ts", "a.ts")), expected);
}

#[test]
fn test_duplicate_class_message_names_the_class() {
    let program = duplicate_class_program("a.ts", "b.ts");
    let mut checker = Checker::new(&program, CheckerOptions::default());
    checker.check_program();
    let diagnostics = checker.get_diagnostics();
    assert!(!diagnostics.is_empty());
    assert!(
        diagnostics
            .iter()
            .all(|d| d.message_text == "Duplicate identifier 'C'.")
    );
}
