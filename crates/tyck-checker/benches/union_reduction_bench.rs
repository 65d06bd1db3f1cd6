//! Union construction and reduction benchmark
//!
//! Measures checking of programs dominated by large unions: a type alias of
//! N distinct string literals (literal reduction), and an array literal of N
//! object literals whose element type goes through subtype reduction.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;
use tyck_binder::{NodeIndex, Program, ProgramBuilder};
use tyck_checker::{Checker, CheckerOptions};

/// `type U = "k0" | "k1" | ...; let u: U = "k0";`
fn literal_union_program(size: usize) -> Program {
    let mut builder = ProgramBuilder::new();
    builder.add_file("literals.ts", |ast| {
        let members: Vec<NodeIndex> = (0..size)
            .map(|i| {
                let literal = ast.string_lit(&format!("k{i}"));
                ast.literal_type(literal)
            })
            .collect();
        let union = ast.union_type(members);
        let alias = ast.type_alias("U", vec![], union);
        let u_ref = ast.type_ref("U", vec![]);
        let first = ast.string_lit("k0");
        let var = ast.let_decl("u", u_ref, first);
        vec![alias, var]
    });
    builder.build()
}

/// `let xs = [{ p0: 0 }, { p0: 0, p1: 1 }, ...];`
fn object_array_program(size: usize) -> Program {
    let mut builder = ProgramBuilder::new();
    builder.add_file("objects.ts", |ast| {
        let elements: Vec<NodeIndex> = (0..size)
            .map(|i| {
                let names: Vec<String> = (0..=i % 8).map(|p| format!("p{p}")).collect();
                let properties: Vec<(&str, NodeIndex)> = names
                    .iter()
                    .map(|name| (name.as_str(), ast.num_lit(i as f64)))
                    .collect();
                ast.object_lit(properties)
            })
            .collect();
        let array = ast.array_lit(elements);
        vec![ast.let_decl("xs", NodeIndex::NONE, array)]
    });
    builder.build()
}

fn check(program: &Program) -> usize {
    let mut checker = Checker::new(program, CheckerOptions::default());
    checker.check_program();
    checker.get_diagnostics().len()
}

fn bench_literal_union(c: &mut Criterion) {
    let mut group = c.benchmark_group("literal_union");
    group.measurement_time(Duration::from_secs(5));
    for size in [16, 128, 1024] {
        let program = literal_union_program(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &program, |b, program| {
            b.iter(|| black_box(check(program)));
        });
    }
    group.finish();
}

fn bench_subtype_reduction(c: &mut Criterion) {
    let mut group = c.benchmark_group("subtype_reduction");
    group.measurement_time(Duration::from_secs(5));
    for size in [8, 64, 256] {
        let program = object_array_program(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &program, |b, program| {
            b.iter(|| black_box(check(program)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_literal_union, bench_subtype_reduction);
criterion_main!(benches);
