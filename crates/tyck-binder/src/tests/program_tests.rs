use super::*;
use crate::symbols::symbol_flags;
use crate::{KeywordTypeKind, node_flags};

fn local_flags(program: &Program, file: FileId, name: &str) -> u32 {
    let locals = program.file_locals(file).expect("file locals");
    let id = *locals.get(name).expect("symbol in locals");
    program.symbol(id).expect("symbol").flags
}

#[test]
fn test_script_file_declarations_go_to_locals() {
    let mut builder = ProgramBuilder::new();
    let file = builder.add_file("a.ts", |ast| {
        let string = ast.keyword(KeywordTypeKind::String);
        let bar = ast.property_sig("bar", string, false);
        let foo = ast.interface("Foo", vec![], vec![], vec![bar]);
        let ty = ast.type_ref("Foo", vec![]);
        let var = ast.let_decl("foo", ty, NodeIndex::NONE);
        vec![foo, var]
    });
    let program = builder.build();

    assert!(!program.files[0].is_external_module);
    assert!(program.file_symbol(file).is_none());
    assert_eq!(local_flags(&program, file, "Foo"), symbol_flags::INTERFACE);
    assert_eq!(
        local_flags(&program, file, "foo"),
        symbol_flags::BLOCK_SCOPED_VARIABLE
    );

    let locals = program.file_locals(file).unwrap();
    let foo = program.symbol(locals["Foo"]).unwrap();
    let members = foo.members.as_ref().expect("interface members");
    assert!(members.contains_key("bar"));
    assert!(program.binder_diagnostics().is_empty());
}

#[test]
fn test_interfaces_in_one_file_merge() {
    let mut builder = ProgramBuilder::new();
    let file = builder.add_file("a.ts", |ast| {
        let n = ast.keyword(KeywordTypeKind::Number);
        let a = ast.property_sig("a", n, false);
        let first = ast.interface("I", vec![], vec![], vec![a]);
        let s = ast.keyword(KeywordTypeKind::String);
        let b = ast.property_sig("b", s, false);
        let second = ast.interface("I", vec![], vec![], vec![b]);
        vec![first, second]
    });
    let program = builder.build();
    let locals = program.file_locals(file).unwrap();
    let sym = program.symbol(locals["I"]).unwrap();
    assert_eq!(sym.declarations.len(), 2);
    let members = sym.members.as_ref().unwrap();
    assert_eq!(members.keys().collect::<Vec<_>>(), vec!["a", "b"]);
}

#[test]
fn test_block_scoped_redeclaration_reports_both_declarations() {
    let mut builder = ProgramBuilder::new();
    builder.add_file("a.ts", |ast| {
        let n = ast.keyword(KeywordTypeKind::Number);
        let first = ast.let_decl("x", n, NodeIndex::NONE);
        let s = ast.keyword(KeywordTypeKind::String);
        let second = ast.let_decl("x", s, NodeIndex::NONE);
        vec![first, second]
    });
    let program = builder.build();
    let diags = program.binder_diagnostics();
    assert_eq!(diags.len(), 2);
    assert!(diags.iter().all(|d| d.code == 2451));
    assert_eq!(diags[0].message_text, "Cannot redeclare block-scoped variable 'x'.");
    assert_eq!(diags[0].related_information.len(), 1);
    assert_eq!(diags[0].related_information[0].message_text, "'x' was also declared here.");
}

#[test]
fn test_external_module_exports() {
    let mut builder = ProgramBuilder::new();
    let file = builder.add_file("lib.ts", |ast| {
        let n = ast.keyword(KeywordTypeKind::Number);
        let exported = ast.const_decl("value", n, NodeIndex::NONE);
        let exported = ast.exported(exported);
        let s = ast.keyword(KeywordTypeKind::String);
        let hidden = ast.const_decl("hidden", s, NodeIndex::NONE);
        vec![exported, hidden]
    });
    let program = builder.build();
    assert!(program.files[0].is_external_module);
    let module = program.file_symbol(file).expect("module symbol");
    let module = program.symbol(module).unwrap();
    assert_eq!(module.escaped_name, "\"lib\"");
    let exports = module.exports.as_ref().unwrap();
    assert!(exports.contains_key("value"));
    assert!(!exports.contains_key("hidden"));
    // Exported declarations stay reachable by name inside the module.
    let locals = program.file_locals(file).unwrap();
    assert_eq!(locals["value"], exports["value"]);
}

#[test]
fn test_namespace_instantiation_state() {
    let mut builder = ProgramBuilder::new();
    let file = builder.add_file("a.ts", |ast| {
        let iface = ast.interface("T", vec![], vec![], vec![]);
        let iface = ast.exported(iface);
        let types_only = ast.namespace("Types", vec![iface]);
        let n = ast.keyword(KeywordTypeKind::Number);
        let value = ast.const_decl("v", n, NodeIndex::NONE);
        let value = ast.exported(value);
        let values = ast.namespace("Values", vec![value]);
        vec![types_only, values]
    });
    let program = builder.build();
    assert_eq!(
        local_flags(&program, file, "Types"),
        symbol_flags::NAMESPACE_MODULE
    );
    assert_eq!(local_flags(&program, file, "Values"), symbol_flags::VALUE_MODULE);
}

#[test]
fn test_imports_bind_aliases() {
    let mut builder = ProgramBuilder::new();
    builder.add_file("lib.ts", |ast| {
        let n = ast.keyword(KeywordTypeKind::Number);
        let d = ast.const_decl("a", n, NodeIndex::NONE);
        vec![ast.exported(d)]
    });
    let main = builder.add_file("main.ts", |ast| {
        let named = ast.import_named(&[("a", "b")], "./lib");
        let ns = ast.import_namespace("lib", "./lib");
        vec![named, ns]
    });
    let program = builder.build();
    assert_eq!(local_flags(&program, main, "b"), symbol_flags::ALIAS);
    assert_eq!(local_flags(&program, main, "lib"), symbol_flags::ALIAS);
    assert_eq!(program.resolve_module_name(main, "./lib"), Some(FileId(0)));
    assert_eq!(program.resolve_module_name(main, "./missing"), None);
}

#[test]
fn test_ambient_module_body_is_implicitly_exported() {
    let mut builder = ProgramBuilder::new();
    let file = builder.add_file("decls.d.ts", |ast| {
        let iface = ast.interface("Thing", vec![], vec![], vec![]);
        vec![ast.ambient_module("things", vec![iface])]
    });
    let program = builder.build();
    let locals = program.file_locals(file).unwrap();
    let module = program.symbol(locals["\"things\""]).unwrap();
    assert!(module.exports.as_ref().unwrap().contains_key("Thing"));
}

#[test]
fn test_parent_links_and_positions() {
    let mut builder = ProgramBuilder::new();
    builder.add_file("a.ts", |ast| {
        let n = ast.keyword(KeywordTypeKind::Number);
        let d = ast.variable(node_flags::CONST, "x", n, NodeIndex::NONE);
        vec![d]
    });
    let program = builder.build();
    let root = program.files[0].root;
    let stmt = program.arena.get_source_file(root).unwrap().statements[0];
    let name = program.arena.declaration_name(stmt);
    assert_eq!(program.arena.parent(name), stmt);
    assert_eq!(program.arena.parent(stmt), root);
    assert_eq!(program.file_of_node(name), Some(FileId(0)));
    let name_node = program.arena.get(name).unwrap();
    assert_eq!(name_node.end - name_node.pos, 1);
}
