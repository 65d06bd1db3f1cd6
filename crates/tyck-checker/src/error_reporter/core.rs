//! Core error emission helpers.

use tracing::trace;
use tyck_binder::NodeIndex;
use tyck_common::Diagnostic;
use tyck_common::diagnostics::get_message_template;
use tyck_common::format_message;

use crate::context::DiagnosticKey;
use crate::state::CheckerState;

impl<'a> CheckerState<'a> {
    /// Location of a node as `(file, start, length)`.
    pub(crate) fn node_span(&self, node: NodeIndex) -> (String, u32, u32) {
        let file = self.ctx.program.file_name_of_node(node).to_string();
        let span = self.ctx.arena.span(node);
        (file, span.start, span.len())
    }

    /// Report `code` at `node`, or return the index of an identical
    /// diagnostic reported earlier.
    pub(crate) fn error(&mut self, node: NodeIndex, code: u32, args: &[&str]) -> usize {
        let (file, start, length) = self.node_span(node);
        let diagnostic = Diagnostic::from_code(file, start, length, code, args);
        self.push_diagnostic(diagnostic)
    }

    /// Report on the name of a declaration, falling back to the declaration.
    pub(crate) fn error_on_declaration(&mut self, declaration: NodeIndex, code: u32, args: &[&str]) -> usize {
        let node = self.ctx.arena.error_node(declaration);
        self.error(node, code, args)
    }

    /// Report against the node currently being checked. Used for resource
    /// limits hit deep inside type construction.
    pub(crate) fn error_at_current_node(&mut self, code: u32, args: &[&str]) -> usize {
        let node = self.ctx.current_node;
        self.error(node, code, args)
    }

    fn push_diagnostic(&mut self, diagnostic: Diagnostic) -> usize {
        let key: DiagnosticKey = (
            diagnostic.file.clone(),
            diagnostic.start,
            diagnostic.length,
            diagnostic.code,
            diagnostic.message_text.clone(),
        );
        if let Some(&index) = self.ctx.diagnostic_index.get(&key) {
            return index;
        }
        trace!(code = diagnostic.code, start = diagnostic.start, "diagnostic");
        let index = self.ctx.diagnostics.len();
        self.ctx.diagnostics.push(diagnostic);
        self.ctx.diagnostic_index.insert(key, index);
        index
    }

    /// Number of related entries already attached to a diagnostic.
    pub(crate) fn related_count(&self, index: usize) -> usize {
        self.ctx
            .diagnostics
            .get(index)
            .map_or(0, |d| d.related_information.len())
    }

    /// Attach related information at `node` unless the same entry exists.
    pub(crate) fn add_related(&mut self, index: usize, node: NodeIndex, code: u32, args: &[&str]) {
        let (file, start, length) = self.node_span(node);
        let message = format_message(get_message_template(code).unwrap_or(""), args);
        let Some(diagnostic) = self.ctx.diagnostics.get_mut(index) else {
            return;
        };
        let exists = diagnostic.related_information.iter().any(|r| {
            r.file == file && r.start == start && r.length == length && r.message_text == message
        });
        if !exists {
            *diagnostic = std::mem::replace(
                diagnostic,
                Diagnostic::error(String::new(), 0, 0, String::new(), 0),
            )
            .with_related(file, start, length, message);
        }
    }

    /// True if `(file, start, length, message)` of `node` matches a related
    /// entry of the diagnostic.
    pub(crate) fn has_related_at(&self, index: usize, node: NodeIndex, code: u32, args: &[&str]) -> bool {
        let (file, start, length) = self.node_span(node);
        let message = format_message(get_message_template(code).unwrap_or(""), args);
        self.ctx.diagnostics.get(index).is_some_and(|d| {
            d.related_information.iter().any(|r| {
                r.file == file && r.start == start && r.length == length && r.message_text == message
            })
        })
    }
}
