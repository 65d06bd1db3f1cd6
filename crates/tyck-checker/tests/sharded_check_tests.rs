//! Sharded checking produces the same diagnostics as a single checker.

use tyck_binder::{FileId, KeywordTypeKind, NodeIndex, Program, ProgramBuilder};
use tyck_checker::{CheckerOptions, check_program, check_program_sharded, shard_files};

/// Six files: shared global declarations, a few errors, and files that
/// reach declarations owned by other shards.
fn sample_program() -> Program {
    let mut builder = ProgramBuilder::new();
    builder.add_file("globals.ts", |ast| {
        let string = ast.keyword(KeywordTypeKind::String);
        let name = ast.property_sig("name", string, false);
        let user = ast.interface("User", vec![], vec![], vec![name]);
        let b_ref = ast.type_ref("B", vec![]);
        let a = ast.type_alias("A", vec![], b_ref);
        let a_ref = ast.type_ref("A", vec![]);
        let b = ast.type_alias("B", vec![], a_ref);
        vec![user, a, b]
    });
    builder.add_file("more_globals.ts", |ast| {
        let number = ast.keyword(KeywordTypeKind::Number);
        let id = ast.property_sig("id", number, false);
        vec![ast.interface("User", vec![], vec![], vec![id])]
    });
    for index in 0..4 {
        builder.add_file(&format!("use{index}.ts"), |ast| {
            let user_ref = ast.type_ref("User", vec![]);
            let var_name = format!("u{index}");
            let var = ast.let_decl(&var_name, user_ref, NodeIndex::NONE);
            let target = ast.ident(&var_name);
            let property = if index % 2 == 0 { "name" } else { "missing" };
            let access = ast.prop_access(target, property);
            let a_ref = ast.type_ref("A", vec![]);
            let through_cycle = ast.let_decl(&format!("c{index}"), a_ref, NodeIndex::NONE);
            let string = ast.keyword(KeywordTypeKind::String);
            let one = ast.num_lit(1.0);
            let mismatch = ast.let_decl(&format!("s{index}"), string, one);
            vec![var, ast.expr_stmt(access), through_cycle, mismatch]
        });
    }
    builder.build()
}

#[test]
fn test_shards_partition_the_files() {
    let program = sample_program();
    let mut all: Vec<FileId> = (0..4).flat_map(|i| shard_files(&program, i, 4)).collect();
    all.sort();
    let expected: Vec<FileId> = program.file_ids().collect();
    assert_eq!(all, expected);
    assert_eq!(shard_files(&program, 0, 0), expected);
}

#[test]
fn test_sharded_matches_unsharded() {
    let program = sample_program();
    let options = CheckerOptions::default();
    let unsharded = check_program(&program, &options);
    assert!(!unsharded.is_empty());
    for shard_count in 1..=6 {
        let sharded = check_program_sharded(&program, &options, shard_count);
        assert_eq!(sharded, unsharded, "shard count {shard_count}");
    }
}

#[test]
fn test_cross_shard_cycle_is_reported_once_per_declaration() {
    let program = sample_program();
    let diagnostics = check_program_sharded(&program, &CheckerOptions::strict(), 3);
    let mut starts: Vec<(String, u32)> = diagnostics
        .iter()
        .filter(|d| d.code == 2456)
        .map(|d| (d.file.clone(), d.start))
        .collect();
    let total = starts.len();
    starts.dedup();
    assert!(total >= 1);
    assert_eq!(starts.len(), total);
}

#[test]
fn test_sharded_results_are_sorted() {
    let program = sample_program();
    let diagnostics = check_program_sharded(&program, &CheckerOptions::default(), 4);
    let keys: Vec<(String, u32)> = diagnostics.iter().map(|d| (d.file.clone(), d.start)).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}
