//! Bound programs and module resolution.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;
use tyck_common::Diagnostic;

use crate::binding::strip_extension;
use crate::symbols::{Symbol, SymbolId, SymbolTable};
use crate::{BinderState, NodeArena, NodeIndex, NodeKind};

/// Index of a source file within a [`Program`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u32);

#[derive(Clone, Debug)]
pub struct SourceFileInfo {
    pub file_name: String,
    pub root: NodeIndex,
    pub is_external_module: bool,
}

/// Maps an import specifier to a program file.
pub trait ModuleResolver: Send + Sync {
    fn resolve_module_name(
        &self,
        files: &[SourceFileInfo],
        containing_file: FileId,
        specifier: &str,
    ) -> Option<FileId>;
}

/// Resolves relative specifiers against the containing file's directory and
/// bare specifiers against file stems, ignoring source extensions.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultModuleResolver;

impl ModuleResolver for DefaultModuleResolver {
    fn resolve_module_name(
        &self,
        files: &[SourceFileInfo],
        containing_file: FileId,
        specifier: &str,
    ) -> Option<FileId> {
        let containing = files.get(containing_file.0 as usize)?;
        let wanted = if specifier.starts_with("./") || specifier.starts_with("../") {
            let dir = match containing.file_name.rfind('/') {
                Some(pos) => &containing.file_name[..pos],
                None => "",
            };
            normalize_path(&format!("{dir}/{specifier}"))
        } else {
            normalize_path(specifier)
        };
        let wanted = strip_extension(&wanted);
        files
            .iter()
            .position(|f| strip_extension(&normalize_path(&f.file_name)) == wanted)
            .map(|i| FileId(i as u32))
    }
}

fn normalize_path(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }
    parts.join("/")
}

/// A bound program: every file's AST plus the binder's output.
pub struct Program {
    pub arena: NodeArena,
    pub files: Vec<SourceFileInfo>,
    pub binder: BinderState,
    root_to_file: FxHashMap<NodeIndex, FileId>,
    resolver: Arc<dyn ModuleResolver>,
}

impl std::fmt::Debug for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Program")
            .field("files", &self.files)
            .field("nodes", &self.arena.len())
            .field("symbols", &self.binder.symbols.len())
            .finish()
    }
}

impl Program {
    #[inline]
    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.binder.symbols.get(id)
    }

    #[inline]
    pub fn symbol_count(&self) -> usize {
        self.binder.symbols.len()
    }

    pub fn file(&self, id: FileId) -> Option<&SourceFileInfo> {
        self.files.get(id.0 as usize)
    }

    pub fn file_ids(&self) -> impl Iterator<Item = FileId> + '_ {
        (0..self.files.len()).map(|i| FileId(i as u32))
    }

    /// File containing a node.
    pub fn file_of_node(&self, node: NodeIndex) -> Option<FileId> {
        let root = self.arena.source_file_of(node);
        self.root_to_file.get(&root).copied()
    }

    pub fn file_name_of_node(&self, node: NodeIndex) -> &str {
        self.file_of_node(node)
            .and_then(|f| self.file(f))
            .map_or("", |f| f.file_name.as_str())
    }

    /// Locals of a source file.
    pub fn file_locals(&self, file: FileId) -> Option<&SymbolTable> {
        let root = self.file(file)?.root;
        self.binder.get_locals(root)
    }

    /// Module symbol of an external module file.
    pub fn file_symbol(&self, file: FileId) -> Option<SymbolId> {
        let info = self.file(file)?;
        if !info.is_external_module {
            return None;
        }
        self.binder.get_node_symbol(info.root)
    }

    pub fn resolve_module_name(&self, containing_file: FileId, specifier: &str) -> Option<FileId> {
        self.resolver
            .resolve_module_name(&self.files, containing_file, specifier)
    }

    /// Diagnostics produced while binding.
    pub fn binder_diagnostics(&self) -> &[Diagnostic] {
        &self.binder.diagnostics
    }
}

/// Builds a [`Program`] file by file.
pub struct ProgramBuilder {
    arena: NodeArena,
    files: Vec<(String, NodeIndex)>,
    resolver: Arc<dyn ModuleResolver>,
}

impl Default for ProgramBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self {
            arena: NodeArena::new(),
            files: Vec::new(),
            resolver: Arc::new(DefaultModuleResolver),
        }
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn ModuleResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Add a source file whose top-level statements are produced by `build`.
    pub fn add_file(
        &mut self,
        file_name: &str,
        build: impl FnOnce(&mut NodeArena) -> Vec<NodeIndex>,
    ) -> FileId {
        self.arena.cursor = 0;
        let statements = build(&mut self.arena);
        let root = self.arena.add(
            NodeKind::SourceFile(crate::ast::SourceFileData {
                file_name: file_name.to_string(),
                statements,
            }),
            0,
            0,
        );
        let id = FileId(self.files.len() as u32);
        self.files.push((file_name.to_string(), root));
        id
    }

    /// Bind every file and produce the program.
    pub fn build(self) -> Program {
        let mut binder = BinderState::new();
        let mut files = Vec::with_capacity(self.files.len());
        let mut root_to_file = FxHashMap::default();
        for (i, (file_name, root)) in self.files.into_iter().enumerate() {
            let is_external_module = binder.bind_source_file(&self.arena, root, &file_name);
            root_to_file.insert(root, FileId(i as u32));
            files.push(SourceFileInfo {
                file_name,
                root,
                is_external_module,
            });
        }
        debug!(
            files = files.len(),
            symbols = binder.symbols.len(),
            "program bound"
        );
        Program {
            arena: self.arena,
            files,
            binder,
            root_to_file,
            resolver: self.resolver,
        }
    }
}

#[cfg(test)]
#[path = "tests/program_tests.rs"]
mod tests;
