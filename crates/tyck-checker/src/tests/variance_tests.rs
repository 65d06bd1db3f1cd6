use super::*;
use crate::context::{CheckerOptions, ResolutionProperty, ResolutionTarget};
use crate::state::Checker;
use tyck_binder::{FileId, KeywordTypeKind, NodeIndex, Program, ProgramBuilder};

/// `interface Box<T> { value: T }`, `type Reader<A> = (x: A) => void` and
/// `type Getter<A> = () => A`.
fn generics() -> (Program, FileId) {
    let mut builder = ProgramBuilder::new();
    let file = builder.add_file("variance.ts", |ast| {
        let t = ast.type_param("T", NodeIndex::NONE, NodeIndex::NONE);
        let value_type = ast.type_ref("T", vec![]);
        let value = ast.property_sig("value", value_type, false);
        let boxed = ast.interface("Box", vec![t], vec![], vec![value]);

        let a = ast.type_param("A", NodeIndex::NONE, NodeIndex::NONE);
        let x_type = ast.type_ref("A", vec![]);
        let x = ast.param("x", x_type);
        let void = ast.keyword(KeywordTypeKind::Void);
        let reader_fn = ast.function_type(vec![], vec![x], void);
        let reader = ast.type_alias("Reader", vec![a], reader_fn);

        let a = ast.type_param("A", NodeIndex::NONE, NodeIndex::NONE);
        let result = ast.type_ref("A", vec![]);
        let getter_fn = ast.function_type(vec![], vec![], result);
        let getter = ast.type_alias("Getter", vec![a], getter_fn);
        vec![boxed, reader, getter]
    });
    (builder.build(), file)
}

#[test]
fn test_interface_variance_is_cached() {
    let (program, file) = generics();
    let mut checker = Checker::new(&program, CheckerOptions::strict());
    let symbol = checker.get_file_symbol(file, "Box").expect("Box");
    let target = checker.get_declared_type_of_symbol(symbol);
    let variances = checker.get_variances(target);
    assert_eq!(variances.len(), 1);
    assert_eq!(variances[0].variance(), VarianceFlags::COVARIANT);
    assert_eq!(checker.get_variances(target), variances);
}

#[test]
fn test_alias_variances() {
    let (program, file) = generics();
    let mut checker = Checker::new(&program, CheckerOptions::strict());
    let reader = checker.get_file_symbol(file, "Reader").expect("Reader");
    let getter = checker.get_file_symbol(file, "Getter").expect("Getter");
    let reader_variances = checker.get_alias_variances(reader);
    assert_eq!(reader_variances.len(), 1);
    assert_eq!(reader_variances[0].variance(), VarianceFlags::CONTRAVARIANT);
    let getter_variances = checker.get_alias_variances(getter);
    assert_eq!(getter_variances[0].variance(), VarianceFlags::COVARIANT);
    assert_eq!(
        checker.links_ref(reader).and_then(|l| l.variances.clone()),
        Some(reader_variances)
    );
}

#[test]
fn test_variance_measurement_ignores_outer_resolutions() {
    let (program, file) = generics();
    let mut checker = Checker::new(&program, CheckerOptions::strict());
    let reader = checker.get_file_symbol(file, "Reader").expect("Reader");

    // An outer resolution of the alias is in flight when its variances are
    // measured; the measurement resolves the alias on its own.
    assert!(checker.push_type_resolution(ResolutionTarget::Symbol(reader), ResolutionProperty::DeclaredType));
    let variances = checker.get_alias_variances(reader);
    assert_eq!(variances[0].variance(), VarianceFlags::CONTRAVARIANT);
    assert_eq!(checker.ctx.resolution_start, 0);
    assert!(!checker.ctx.in_variance_computation);
    assert!(checker.pop_type_resolution());
    assert!(checker.ctx.diagnostics.is_empty());

    // Cycles are still detected once the window is restored.
    let getter = checker.get_file_symbol(file, "Getter").expect("Getter");
    let target = ResolutionTarget::Symbol(getter);
    assert!(checker.push_type_resolution(target, ResolutionProperty::Type));
    assert!(!checker.push_type_resolution(target, ResolutionProperty::Type));
    assert!(!checker.pop_type_resolution());
}
