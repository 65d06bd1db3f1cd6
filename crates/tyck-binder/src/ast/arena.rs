//! `NodeArena` storage, traversal and typed accessors.

use smallvec::SmallVec;
use tyck_common::Span;

use super::node::*;

/// Child list returned by [`NodeArena::children`].
pub type ChildList = SmallVec<[NodeIndex; 8]>;

/// Arena holding every node of every source file in a program.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    pub(crate) nodes: Vec<Node>,
    /// Position assigned to the next leaf node created by the factory.
    pub(crate) cursor: u32,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node by index.
    #[inline]
    /// Source range of a node. Missing nodes get an empty span at 0.
    pub fn span(&self, index: NodeIndex) -> Span {
        self.get(index).map_or_else(Span::default, |n| Span::new(n.pos, n.end))
    }

    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    #[inline]
    pub fn kind(&self, index: NodeIndex) -> Option<&NodeKind> {
        self.get(index).map(|n| &n.kind)
    }

    #[inline]
    pub fn parent(&self, index: NodeIndex) -> NodeIndex {
        self.get(index).map_or(NodeIndex::NONE, |n| n.parent)
    }

    #[inline]
    pub fn flags(&self, index: NodeIndex) -> u16 {
        self.get(index).map_or(0, |n| n.flags)
    }

    #[inline]
    pub fn has_flag(&self, index: NodeIndex, flag: u16) -> bool {
        self.flags(index) & flag != 0
    }

    /// Allocate a node, derive its range from its children and link the
    /// children back to it.
    pub(crate) fn add(&mut self, kind: NodeKind, flags: u16, width: u32) -> NodeIndex {
        let idx = NodeIndex(self.nodes.len() as u32);
        let children = children_of(&kind);
        let mut pos = u32::MAX;
        let mut end = 0;
        for &child in &children {
            if let Some(node) = self.nodes.get(child.0 as usize) {
                pos = pos.min(node.pos);
                end = end.max(node.end);
            }
        }
        if pos == u32::MAX {
            pos = self.cursor;
            end = self.cursor + width.max(1);
            self.cursor = end + 1;
        }
        for &child in &children {
            if let Some(node) = self.nodes.get_mut(child.0 as usize) {
                node.parent = idx;
            }
        }
        self.nodes.push(Node {
            kind,
            flags,
            pos,
            end,
            parent: NodeIndex::NONE,
        });
        idx
    }

    /// Direct children of a node in source order.
    pub fn children(&self, index: NodeIndex) -> ChildList {
        match self.get(index) {
            Some(node) => children_of(&node.kind),
            None => ChildList::new(),
        }
    }

    /// Walk parent links up to the enclosing `SourceFile` node.
    pub fn source_file_of(&self, mut index: NodeIndex) -> NodeIndex {
        while let Some(node) = self.get(index) {
            if matches!(node.kind, NodeKind::SourceFile(_)) {
                return index;
            }
            index = node.parent;
        }
        NodeIndex::NONE
    }

    /// True if `ancestor` is `index` or one of its parents.
    pub fn is_descendant_of(&self, mut index: NodeIndex, ancestor: NodeIndex) -> bool {
        while index.is_some() {
            if index == ancestor {
                return true;
            }
            index = self.parent(index);
        }
        false
    }

    // =========================================================================
    // Names
    // =========================================================================

    /// Text of an identifier node.
    pub fn identifier_text(&self, index: NodeIndex) -> Option<&str> {
        match self.kind(index)? {
            NodeKind::Identifier(id) => Some(id.escaped_text.as_str()),
            _ => None,
        }
    }

    /// Text of a declaration name: identifier, string or numeric literal.
    pub fn property_name_text(&self, index: NodeIndex) -> Option<String> {
        match self.kind(index)? {
            NodeKind::Identifier(id) => Some(id.escaped_text.clone()),
            NodeKind::StringLiteral(lit) => Some(lit.text.clone()),
            NodeKind::NumericLiteral(lit) => Some(format_number(lit.value)),
            _ => None,
        }
    }

    /// Dotted text of an entity name (`A.B.C`).
    pub fn entity_name_text(&self, index: NodeIndex) -> String {
        match self.kind(index) {
            Some(NodeKind::Identifier(id)) => id.escaped_text.clone(),
            Some(NodeKind::QualifiedName(q)) => {
                format!("{}.{}", self.entity_name_text(q.left), self.entity_name_text(q.right))
            }
            Some(NodeKind::PropertyAccessExpression(a)) => format!(
                "{}.{}",
                self.entity_name_text(a.expression),
                self.entity_name_text(a.name_or_argument)
            ),
            Some(NodeKind::StringLiteral(lit)) => format!("\"{}\"", lit.text),
            _ => String::new(),
        }
    }

    /// Name node of a named declaration.
    pub fn declaration_name(&self, index: NodeIndex) -> NodeIndex {
        let Some(kind) = self.kind(index) else {
            return NodeIndex::NONE;
        };
        match kind {
            NodeKind::VariableDeclaration(d) => d.name,
            NodeKind::Parameter(d) => d.name,
            NodeKind::TypeParameter(d) => d.name,
            NodeKind::ClassDeclaration(d) => d.name,
            NodeKind::InterfaceDeclaration(d) => d.name,
            NodeKind::TypeAliasDeclaration(d) => d.name,
            NodeKind::EnumDeclaration(d) => d.name,
            NodeKind::EnumMember(d) => d.name,
            NodeKind::ModuleDeclaration(d) => d.name,
            NodeKind::PropertySignature(d) | NodeKind::PropertyDeclaration(d) => d.name,
            NodeKind::PropertyAssignment(d) => d.name,
            NodeKind::ImportEqualsDeclaration(d) => d.name,
            NodeKind::ImportClause(d) => d.name,
            NodeKind::NamespaceImport(d) | NodeKind::NamespaceExport(d) => d.name,
            NodeKind::ImportSpecifier(d) | NodeKind::ExportSpecifier(d) => d.name,
            NodeKind::NamedTupleMember(d) => d.name,
            _ => match kind.as_function_like() {
                Some(f) => f.name,
                None => NodeIndex::NONE,
            },
        }
    }

    /// Declared name of a declaration, if it has a simple one.
    pub fn declaration_name_text(&self, index: NodeIndex) -> Option<String> {
        self.property_name_text(self.declaration_name(index))
    }

    /// The node an error about `index` should be reported on: its name when it
    /// has one, otherwise the node itself.
    pub fn error_node(&self, index: NodeIndex) -> NodeIndex {
        let name = self.declaration_name(index);
        if name.is_some() { name } else { index }
    }

    // =========================================================================
    // Typed accessors
    // =========================================================================

    pub fn get_source_file(&self, index: NodeIndex) -> Option<&SourceFileData> {
        match self.kind(index)? {
            NodeKind::SourceFile(d) => Some(d),
            _ => None,
        }
    }

    pub fn get_function_like(&self, index: NodeIndex) -> Option<&FunctionData> {
        self.kind(index)?.as_function_like()
    }

    pub fn get_variable(&self, index: NodeIndex) -> Option<&VariableData> {
        match self.kind(index)? {
            NodeKind::VariableDeclaration(d) => Some(d),
            _ => None,
        }
    }

    pub fn get_parameter(&self, index: NodeIndex) -> Option<&ParameterData> {
        match self.kind(index)? {
            NodeKind::Parameter(d) => Some(d),
            _ => None,
        }
    }

    pub fn get_type_parameter(&self, index: NodeIndex) -> Option<&TypeParameterData> {
        match self.kind(index)? {
            NodeKind::TypeParameter(d) => Some(d),
            _ => None,
        }
    }

    pub fn get_class(&self, index: NodeIndex) -> Option<&ClassData> {
        match self.kind(index)? {
            NodeKind::ClassDeclaration(d) => Some(d),
            _ => None,
        }
    }

    pub fn get_interface(&self, index: NodeIndex) -> Option<&InterfaceData> {
        match self.kind(index)? {
            NodeKind::InterfaceDeclaration(d) => Some(d),
            _ => None,
        }
    }

    pub fn get_type_alias(&self, index: NodeIndex) -> Option<&TypeAliasData> {
        match self.kind(index)? {
            NodeKind::TypeAliasDeclaration(d) => Some(d),
            _ => None,
        }
    }

    pub fn get_enum(&self, index: NodeIndex) -> Option<&EnumData> {
        match self.kind(index)? {
            NodeKind::EnumDeclaration(d) => Some(d),
            _ => None,
        }
    }

    pub fn get_module(&self, index: NodeIndex) -> Option<&ModuleData> {
        match self.kind(index)? {
            NodeKind::ModuleDeclaration(d) => Some(d),
            _ => None,
        }
    }

    pub fn get_property(&self, index: NodeIndex) -> Option<&PropertyData> {
        match self.kind(index)? {
            NodeKind::PropertySignature(d) | NodeKind::PropertyDeclaration(d) => Some(d),
            _ => None,
        }
    }

    pub fn get_mapped_type(&self, index: NodeIndex) -> Option<&MappedTypeData> {
        match self.kind(index)? {
            NodeKind::MappedType(d) => Some(d),
            _ => None,
        }
    }

    /// Type parameter declarations owned by a declaration node.
    pub fn type_parameters_of(&self, index: NodeIndex) -> &[NodeIndex] {
        match self.kind(index) {
            Some(NodeKind::ClassDeclaration(d)) => &d.type_parameters,
            Some(NodeKind::InterfaceDeclaration(d)) => &d.type_parameters,
            Some(NodeKind::TypeAliasDeclaration(d)) => &d.type_parameters,
            Some(kind) => kind.as_function_like().map_or(&[], |f| &f.type_parameters),
            None => &[],
        }
    }

    /// Type annotation of a variable-like declaration.
    pub fn type_annotation_of(&self, index: NodeIndex) -> NodeIndex {
        match self.kind(index) {
            Some(NodeKind::VariableDeclaration(d)) => d.type_annotation,
            Some(NodeKind::Parameter(d)) => d.type_annotation,
            Some(NodeKind::PropertySignature(d)) | Some(NodeKind::PropertyDeclaration(d)) => {
                d.type_annotation
            }
            _ => NodeIndex::NONE,
        }
    }

    /// Initializer of a variable-like declaration.
    pub fn initializer_of(&self, index: NodeIndex) -> NodeIndex {
        match self.kind(index) {
            Some(NodeKind::VariableDeclaration(d)) => d.initializer,
            Some(NodeKind::Parameter(d)) => d.initializer,
            Some(NodeKind::PropertySignature(d)) | Some(NodeKind::PropertyDeclaration(d)) => {
                d.initializer
            }
            Some(NodeKind::PropertyAssignment(d)) => d.initializer,
            Some(NodeKind::EnumMember(d)) => d.initializer,
            _ => NodeIndex::NONE,
        }
    }
}

/// Render a numeric literal value the way property names spell it.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e21 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

fn push(list: &mut ChildList, idx: NodeIndex) {
    if idx.is_some() {
        list.push(idx);
    }
}

fn push_function(list: &mut ChildList, f: &FunctionData) {
    push(list, f.name);
    list.extend(f.type_parameters.iter().copied());
    list.extend(f.parameters.iter().copied());
    push(list, f.return_type);
    match &f.body {
        FunctionBody::None => {}
        FunctionBody::Block(stmts) => list.extend(stmts.iter().copied()),
        FunctionBody::Expression(expr) => push(list, *expr),
    }
}

fn children_of(kind: &NodeKind) -> ChildList {
    let mut list = ChildList::new();
    match kind {
        NodeKind::SourceFile(d) => list.extend(d.statements.iter().copied()),
        NodeKind::QualifiedName(d) => {
            push(&mut list, d.left);
            push(&mut list, d.right);
        }
        NodeKind::VariableDeclaration(d) => {
            push(&mut list, d.name);
            push(&mut list, d.type_annotation);
            push(&mut list, d.initializer);
        }
        NodeKind::Parameter(d) => {
            push(&mut list, d.name);
            push(&mut list, d.type_annotation);
            push(&mut list, d.initializer);
        }
        NodeKind::TypeParameter(d) => {
            push(&mut list, d.name);
            push(&mut list, d.constraint);
            push(&mut list, d.default);
        }
        NodeKind::ClassDeclaration(d) => {
            push(&mut list, d.name);
            list.extend(d.type_parameters.iter().copied());
            push(&mut list, d.extends);
            list.extend(d.implements.iter().copied());
            list.extend(d.members.iter().copied());
        }
        NodeKind::InterfaceDeclaration(d) => {
            push(&mut list, d.name);
            list.extend(d.type_parameters.iter().copied());
            list.extend(d.extends.iter().copied());
            list.extend(d.members.iter().copied());
        }
        NodeKind::TypeAliasDeclaration(d) => {
            push(&mut list, d.name);
            list.extend(d.type_parameters.iter().copied());
            push(&mut list, d.type_node);
        }
        NodeKind::EnumDeclaration(d) => {
            push(&mut list, d.name);
            list.extend(d.members.iter().copied());
        }
        NodeKind::EnumMember(d) => {
            push(&mut list, d.name);
            push(&mut list, d.initializer);
        }
        NodeKind::ModuleDeclaration(d) => {
            push(&mut list, d.name);
            list.extend(d.body.iter().copied());
        }
        NodeKind::ExpressionWithTypeArguments(d) => {
            push(&mut list, d.expression);
            list.extend(d.type_arguments.iter().copied());
        }
        NodeKind::PropertySignature(d) | NodeKind::PropertyDeclaration(d) => {
            push(&mut list, d.name);
            push(&mut list, d.type_annotation);
            push(&mut list, d.initializer);
        }
        NodeKind::FunctionDeclaration(f)
        | NodeKind::MethodSignature(f)
        | NodeKind::MethodDeclaration(f)
        | NodeKind::Constructor(f)
        | NodeKind::CallSignature(f)
        | NodeKind::ConstructSignature(f)
        | NodeKind::FunctionType(f)
        | NodeKind::ConstructorType(f)
        | NodeKind::ArrowFunction(f)
        | NodeKind::FunctionExpression(f) => push_function(&mut list, f),
        NodeKind::IndexSignature(d) => {
            push(&mut list, d.parameter);
            push(&mut list, d.type_annotation);
        }
        NodeKind::ImportEqualsDeclaration(d) => {
            push(&mut list, d.name);
            push(&mut list, d.module_reference);
        }
        NodeKind::ExternalModuleReference(d) => push(&mut list, d.expression),
        NodeKind::ImportDeclaration(d) => {
            push(&mut list, d.import_clause);
            push(&mut list, d.module_specifier);
        }
        NodeKind::ImportClause(d) => {
            push(&mut list, d.name);
            push(&mut list, d.named_bindings);
        }
        NodeKind::NamespaceImport(d) | NodeKind::NamespaceExport(d) => push(&mut list, d.name),
        NodeKind::NamedImports(d) | NodeKind::NamedExports(d) => {
            list.extend(d.elements.iter().copied());
        }
        NodeKind::ImportSpecifier(d) | NodeKind::ExportSpecifier(d) => {
            push(&mut list, d.property_name);
            push(&mut list, d.name);
        }
        NodeKind::ExportDeclaration(d) => {
            push(&mut list, d.export_clause);
            push(&mut list, d.module_specifier);
        }
        NodeKind::ExportAssignment(d) => push(&mut list, d.expression),
        NodeKind::ExpressionStatement(d) => push(&mut list, d.expression),
        NodeKind::ReturnStatement(d) => push(&mut list, d.expression),
        NodeKind::TypeReference(d) => {
            push(&mut list, d.type_name);
            list.extend(d.type_arguments.iter().copied());
        }
        NodeKind::ArrayType(d) => push(&mut list, d.element_type),
        NodeKind::TupleType(d) => list.extend(d.elements.iter().copied()),
        NodeKind::NamedTupleMember(d) => {
            push(&mut list, d.name);
            push(&mut list, d.type_node);
        }
        NodeKind::OptionalType(d) | NodeKind::RestType(d) | NodeKind::ParenthesizedType(d) => {
            push(&mut list, d.type_node);
        }
        NodeKind::UnionType(d) | NodeKind::IntersectionType(d) => {
            list.extend(d.types.iter().copied());
        }
        NodeKind::LiteralType(d) => push(&mut list, d.literal),
        NodeKind::TypeLiteral(d) => list.extend(d.members.iter().copied()),
        NodeKind::TypeOperator(d) => push(&mut list, d.type_node),
        NodeKind::IndexedAccessType(d) => {
            push(&mut list, d.object_type);
            push(&mut list, d.index_type);
        }
        NodeKind::MappedType(d) => {
            push(&mut list, d.type_parameter);
            push(&mut list, d.name_type);
            push(&mut list, d.type_node);
        }
        NodeKind::TypeQuery(d) => {
            push(&mut list, d.expr_name);
            list.extend(d.type_arguments.iter().copied());
        }
        NodeKind::TemplateLiteralType(d) => list.extend(d.spans.iter().map(|(t, _)| *t)),
        NodeKind::PropertyAccessExpression(d) | NodeKind::ElementAccessExpression(d) => {
            push(&mut list, d.expression);
            push(&mut list, d.name_or_argument);
        }
        NodeKind::CallExpression(d) | NodeKind::NewExpression(d) => {
            push(&mut list, d.expression);
            list.extend(d.type_arguments.iter().copied());
            list.extend(d.arguments.iter().copied());
        }
        NodeKind::ObjectLiteralExpression(d) => list.extend(d.properties.iter().copied()),
        NodeKind::PropertyAssignment(d) => {
            push(&mut list, d.name);
            push(&mut list, d.initializer);
        }
        NodeKind::ArrayLiteralExpression(d) => list.extend(d.elements.iter().copied()),
        NodeKind::SpreadElement(d) | NodeKind::ParenthesizedExpression(d) => {
            push(&mut list, d.expression);
        }
        NodeKind::AsExpression(d) => {
            push(&mut list, d.expression);
            push(&mut list, d.type_node);
        }
        NodeKind::Identifier(_)
        | NodeKind::StringLiteral(_)
        | NodeKind::NumericLiteral(_)
        | NodeKind::BigIntLiteral(_)
        | NodeKind::TrueKeyword
        | NodeKind::FalseKeyword
        | NodeKind::NullKeyword
        | NodeKind::KeywordType(_)
        | NodeKind::ThisType => {}
    }
    list
}
