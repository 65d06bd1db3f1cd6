//! Parallel checking of one program split into shards.
//!
//! Every shard owns an independent [`Checker`] with its own interner,
//! merged globals and caches; only the immutable [`Program`] is shared.
//! Files are dealt round-robin. A declaration reached from several shards
//! may be diagnosed more than once, so the merged list is deduplicated.

use rayon::prelude::*;
use tracing::{debug, info_span};
use tyck_binder::{FileId, Program};
use tyck_common::Diagnostic;
use tyck_common::diagnostics::sort_and_deduplicate_diagnostics;

use crate::context::CheckerOptions;
use crate::state::Checker;

/// Files of shard `index` out of `shard_count`.
pub fn shard_files(program: &Program, index: usize, shard_count: usize) -> Vec<FileId> {
    let shard_count = shard_count.max(1);
    program
        .file_ids()
        .filter(|file| file.0 as usize % shard_count == index)
        .collect()
}

/// Check every file with `shard_count` independent checkers in parallel.
///
/// The result is sorted by file, start, length, code and message, and
/// deduplicated; it does not depend on the shard count.
pub fn check_program_sharded(program: &Program, options: &CheckerOptions, shard_count: usize) -> Vec<Diagnostic> {
    let shard_count = shard_count.max(1);
    let per_shard: Vec<Vec<Diagnostic>> = (0..shard_count)
        .into_par_iter()
        .map(|index| {
            let _span = info_span!("shard", index).entered();
            let files = shard_files(program, index, shard_count);
            let mut checker = Checker::new(program, options.clone());
            for &file in &files {
                checker.check_source_file(file);
            }
            debug!(index, files = files.len(), diagnostics = checker.checker_diagnostics().len(), "shard done");
            checker.checker_diagnostics().to_vec()
        })
        .collect();

    let mut all: Vec<Diagnostic> = program.binder_diagnostics().to_vec();
    all.extend(per_shard.into_iter().flatten());
    sort_and_deduplicate_diagnostics(&mut all);
    all
}

/// Check every file with a single checker.
pub fn check_program(program: &Program, options: &CheckerOptions) -> Vec<Diagnostic> {
    let mut checker = Checker::new(program, options.clone());
    checker.check_program();
    checker.get_diagnostics()
}
