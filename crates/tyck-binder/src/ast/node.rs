//! Node header and per-kind payloads.
//!
//! Every node lives in a [`super::NodeArena`] and is addressed by a
//! [`NodeIndex`]. The header carries the source range, modifier flags and the
//! parent link; the payload is a [`NodeKind`] variant.

/// Index of a node in the program-wide arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    pub const fn is_some(self) -> bool {
        self.0 != u32::MAX
    }
}

impl Default for NodeIndex {
    fn default() -> Self {
        Self::NONE
    }
}

/// Modifier and declaration-kind flags stored on the node header.
pub mod node_flags {
    pub const NONE: u16 = 0;
    pub const EXPORT: u16 = 1 << 0;
    /// `declare` modifier or ambient context.
    pub const AMBIENT: u16 = 1 << 1;
    pub const LET: u16 = 1 << 2;
    pub const CONST: u16 = 1 << 3;
    pub const READONLY: u16 = 1 << 4;
    pub const STATIC: u16 = 1 << 5;
    /// `export default` declaration.
    pub const DEFAULT: u16 = 1 << 6;
    /// `declare global { }` block.
    pub const GLOBAL_AUGMENTATION: u16 = 1 << 7;
    pub const ABSTRACT: u16 = 1 << 8;
    /// `import type` / `export type`.
    pub const TYPE_ONLY: u16 = 1 << 9;

    pub const BLOCK_SCOPED: u16 = LET | CONST;
}

/// A node header.
#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub flags: u16,
    /// Start position within the owning file.
    pub pos: u32,
    /// End position within the owning file.
    pub end: u32,
    pub parent: NodeIndex,
}

impl Node {
    #[inline]
    pub fn has_flag(&self, flag: u16) -> bool {
        self.flags & flag != 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeywordTypeKind {
    Any,
    Unknown,
    String,
    Number,
    Boolean,
    BigInt,
    Symbol,
    Void,
    Undefined,
    Null,
    Never,
    Object,
    /// `unique symbol`
    UniqueSymbol,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeOperatorKind {
    Keyof,
    Readonly,
}

/// `+`, `-` or bare modifier on a mapped type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MappedModifier {
    Add,
    Remove,
}

#[derive(Clone, Debug)]
pub enum FunctionBody {
    None,
    Block(Vec<NodeIndex>),
    Expression(NodeIndex),
}

impl FunctionBody {
    pub fn is_none(&self) -> bool {
        matches!(self, FunctionBody::None)
    }
}

// =============================================================================
// Payloads
// =============================================================================

#[derive(Clone, Debug)]
pub struct SourceFileData {
    pub file_name: String,
    pub statements: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct IdentifierData {
    pub escaped_text: String,
}

#[derive(Clone, Debug)]
pub struct QualifiedNameData {
    pub left: NodeIndex,
    pub right: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct LiteralData {
    pub text: String,
}

#[derive(Clone, Debug)]
pub struct NumericLiteralData {
    pub value: f64,
}

#[derive(Clone, Debug)]
pub struct VariableData {
    pub name: NodeIndex,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
}

/// Shared shape of functions, methods, constructors and signature members.
#[derive(Clone, Debug)]
pub struct FunctionData {
    pub name: NodeIndex,
    pub question_token: bool,
    pub type_parameters: Vec<NodeIndex>,
    pub parameters: Vec<NodeIndex>,
    pub return_type: NodeIndex,
    pub body: FunctionBody,
}

#[derive(Clone, Debug)]
pub struct ParameterData {
    pub name: NodeIndex,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
    pub question_token: bool,
    pub dot_dot_dot: bool,
}

#[derive(Clone, Debug)]
pub struct TypeParameterData {
    pub name: NodeIndex,
    pub constraint: NodeIndex,
    pub default: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ClassData {
    pub name: NodeIndex,
    pub type_parameters: Vec<NodeIndex>,
    /// `ExpressionWithTypeArguments` or NONE.
    pub extends: NodeIndex,
    pub implements: Vec<NodeIndex>,
    pub members: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct InterfaceData {
    pub name: NodeIndex,
    pub type_parameters: Vec<NodeIndex>,
    pub extends: Vec<NodeIndex>,
    pub members: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct TypeAliasData {
    pub name: NodeIndex,
    pub type_parameters: Vec<NodeIndex>,
    pub type_node: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct EnumData {
    pub name: NodeIndex,
    pub members: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct EnumMemberData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ModuleData {
    /// Identifier for namespaces, string literal for ambient modules.
    pub name: NodeIndex,
    pub body: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct ExprWithTypeArgsData {
    pub expression: NodeIndex,
    pub type_arguments: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct PropertyData {
    pub name: NodeIndex,
    pub question_token: bool,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct IndexSignatureData {
    pub parameter: NodeIndex,
    pub type_annotation: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ImportEqualsData {
    pub name: NodeIndex,
    /// Entity name or `ExternalModuleReference`.
    pub module_reference: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ExternalModuleReferenceData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ImportDeclData {
    pub import_clause: NodeIndex,
    pub module_specifier: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ImportClauseData {
    pub name: NodeIndex,
    /// `NamespaceImport` or `NamedImports`.
    pub named_bindings: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct NamedData {
    pub name: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct NamedElementsData {
    pub elements: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct SpecifierData {
    pub property_name: NodeIndex,
    pub name: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ExportDeclData {
    /// `NamedExports`, `NamespaceExport` or NONE for `export *`.
    pub export_clause: NodeIndex,
    pub module_specifier: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ExportAssignmentData {
    pub expression: NodeIndex,
    pub is_export_equals: bool,
}

#[derive(Clone, Debug)]
pub struct ExprStatementData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ReturnData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct TypeRefData {
    pub type_name: NodeIndex,
    pub type_arguments: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct ArrayTypeData {
    pub element_type: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct TupleTypeData {
    pub elements: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct NamedTupleMemberData {
    pub name: NodeIndex,
    pub question_token: bool,
    pub dot_dot_dot: bool,
    pub type_node: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct WrappedTypeData {
    pub type_node: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct CompositeTypeData {
    pub types: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct LiteralTypeData {
    pub literal: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct TypeLiteralData {
    pub members: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct TypeOperatorData {
    pub operator: TypeOperatorKind,
    pub type_node: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct IndexedAccessTypeData {
    pub object_type: NodeIndex,
    pub index_type: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct MappedTypeData {
    pub type_parameter: NodeIndex,
    pub name_type: NodeIndex,
    pub readonly_token: Option<MappedModifier>,
    pub question_token: Option<MappedModifier>,
    pub type_node: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct TypeQueryData {
    pub expr_name: NodeIndex,
    pub type_arguments: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct TemplateLiteralTypeData {
    pub head: String,
    /// `(type, literal text following it)`
    pub spans: Vec<(NodeIndex, String)>,
}

#[derive(Clone, Debug)]
pub struct AccessExprData {
    pub expression: NodeIndex,
    /// Identifier for property access, argument expression for element access.
    pub name_or_argument: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct CallExprData {
    pub expression: NodeIndex,
    pub type_arguments: Vec<NodeIndex>,
    pub arguments: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct ObjectLiteralData {
    pub properties: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct PropertyAssignmentData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ArrayLiteralData {
    pub elements: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct WrappedExprData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct AsExprData {
    pub expression: NodeIndex,
    pub type_node: NodeIndex,
}

// =============================================================================
// Node kinds
// =============================================================================

#[derive(Clone, Debug)]
pub enum NodeKind {
    SourceFile(SourceFileData),

    // Names and literals
    Identifier(IdentifierData),
    QualifiedName(QualifiedNameData),
    StringLiteral(LiteralData),
    NumericLiteral(NumericLiteralData),
    BigIntLiteral(LiteralData),
    TrueKeyword,
    FalseKeyword,
    NullKeyword,

    // Declarations
    VariableDeclaration(VariableData),
    FunctionDeclaration(FunctionData),
    Parameter(ParameterData),
    TypeParameter(TypeParameterData),
    ClassDeclaration(ClassData),
    InterfaceDeclaration(InterfaceData),
    TypeAliasDeclaration(TypeAliasData),
    EnumDeclaration(EnumData),
    EnumMember(EnumMemberData),
    ModuleDeclaration(ModuleData),
    ExpressionWithTypeArguments(ExprWithTypeArgsData),

    // Class and type members
    PropertySignature(PropertyData),
    PropertyDeclaration(PropertyData),
    MethodSignature(FunctionData),
    MethodDeclaration(FunctionData),
    Constructor(FunctionData),
    CallSignature(FunctionData),
    ConstructSignature(FunctionData),
    IndexSignature(IndexSignatureData),

    // Imports and exports
    ImportEqualsDeclaration(ImportEqualsData),
    ExternalModuleReference(ExternalModuleReferenceData),
    ImportDeclaration(ImportDeclData),
    ImportClause(ImportClauseData),
    NamespaceImport(NamedData),
    NamedImports(NamedElementsData),
    ImportSpecifier(SpecifierData),
    ExportDeclaration(ExportDeclData),
    NamespaceExport(NamedData),
    NamedExports(NamedElementsData),
    ExportSpecifier(SpecifierData),
    ExportAssignment(ExportAssignmentData),

    // Statements
    ExpressionStatement(ExprStatementData),
    ReturnStatement(ReturnData),

    // Type nodes
    KeywordType(KeywordTypeKind),
    TypeReference(TypeRefData),
    ArrayType(ArrayTypeData),
    TupleType(TupleTypeData),
    NamedTupleMember(NamedTupleMemberData),
    OptionalType(WrappedTypeData),
    RestType(WrappedTypeData),
    UnionType(CompositeTypeData),
    IntersectionType(CompositeTypeData),
    LiteralType(LiteralTypeData),
    TypeLiteral(TypeLiteralData),
    FunctionType(FunctionData),
    ConstructorType(FunctionData),
    TypeOperator(TypeOperatorData),
    IndexedAccessType(IndexedAccessTypeData),
    MappedType(MappedTypeData),
    ParenthesizedType(WrappedTypeData),
    TypeQuery(TypeQueryData),
    ThisType,
    TemplateLiteralType(TemplateLiteralTypeData),

    // Expressions
    PropertyAccessExpression(AccessExprData),
    ElementAccessExpression(AccessExprData),
    CallExpression(CallExprData),
    NewExpression(CallExprData),
    ObjectLiteralExpression(ObjectLiteralData),
    PropertyAssignment(PropertyAssignmentData),
    ArrayLiteralExpression(ArrayLiteralData),
    SpreadElement(WrappedExprData),
    ParenthesizedExpression(WrappedExprData),
    AsExpression(AsExprData),
    ArrowFunction(FunctionData),
    FunctionExpression(FunctionData),
}

impl NodeKind {
    /// Short kind name used in tracing output.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::SourceFile(_) => "SourceFile",
            NodeKind::Identifier(_) => "Identifier",
            NodeKind::QualifiedName(_) => "QualifiedName",
            NodeKind::StringLiteral(_) => "StringLiteral",
            NodeKind::NumericLiteral(_) => "NumericLiteral",
            NodeKind::BigIntLiteral(_) => "BigIntLiteral",
            NodeKind::TrueKeyword => "TrueKeyword",
            NodeKind::FalseKeyword => "FalseKeyword",
            NodeKind::NullKeyword => "NullKeyword",
            NodeKind::VariableDeclaration(_) => "VariableDeclaration",
            NodeKind::FunctionDeclaration(_) => "FunctionDeclaration",
            NodeKind::Parameter(_) => "Parameter",
            NodeKind::TypeParameter(_) => "TypeParameter",
            NodeKind::ClassDeclaration(_) => "ClassDeclaration",
            NodeKind::InterfaceDeclaration(_) => "InterfaceDeclaration",
            NodeKind::TypeAliasDeclaration(_) => "TypeAliasDeclaration",
            NodeKind::EnumDeclaration(_) => "EnumDeclaration",
            NodeKind::EnumMember(_) => "EnumMember",
            NodeKind::ModuleDeclaration(_) => "ModuleDeclaration",
            NodeKind::ExpressionWithTypeArguments(_) => "ExpressionWithTypeArguments",
            NodeKind::PropertySignature(_) => "PropertySignature",
            NodeKind::PropertyDeclaration(_) => "PropertyDeclaration",
            NodeKind::MethodSignature(_) => "MethodSignature",
            NodeKind::MethodDeclaration(_) => "MethodDeclaration",
            NodeKind::Constructor(_) => "Constructor",
            NodeKind::CallSignature(_) => "CallSignature",
            NodeKind::ConstructSignature(_) => "ConstructSignature",
            NodeKind::IndexSignature(_) => "IndexSignature",
            NodeKind::ImportEqualsDeclaration(_) => "ImportEqualsDeclaration",
            NodeKind::ExternalModuleReference(_) => "ExternalModuleReference",
            NodeKind::ImportDeclaration(_) => "ImportDeclaration",
            NodeKind::ImportClause(_) => "ImportClause",
            NodeKind::NamespaceImport(_) => "NamespaceImport",
            NodeKind::NamedImports(_) => "NamedImports",
            NodeKind::ImportSpecifier(_) => "ImportSpecifier",
            NodeKind::ExportDeclaration(_) => "ExportDeclaration",
            NodeKind::NamespaceExport(_) => "NamespaceExport",
            NodeKind::NamedExports(_) => "NamedExports",
            NodeKind::ExportSpecifier(_) => "ExportSpecifier",
            NodeKind::ExportAssignment(_) => "ExportAssignment",
            NodeKind::ExpressionStatement(_) => "ExpressionStatement",
            NodeKind::ReturnStatement(_) => "ReturnStatement",
            NodeKind::KeywordType(_) => "KeywordType",
            NodeKind::TypeReference(_) => "TypeReference",
            NodeKind::ArrayType(_) => "ArrayType",
            NodeKind::TupleType(_) => "TupleType",
            NodeKind::NamedTupleMember(_) => "NamedTupleMember",
            NodeKind::OptionalType(_) => "OptionalType",
            NodeKind::RestType(_) => "RestType",
            NodeKind::UnionType(_) => "UnionType",
            NodeKind::IntersectionType(_) => "IntersectionType",
            NodeKind::LiteralType(_) => "LiteralType",
            NodeKind::TypeLiteral(_) => "TypeLiteral",
            NodeKind::FunctionType(_) => "FunctionType",
            NodeKind::ConstructorType(_) => "ConstructorType",
            NodeKind::TypeOperator(_) => "TypeOperator",
            NodeKind::IndexedAccessType(_) => "IndexedAccessType",
            NodeKind::MappedType(_) => "MappedType",
            NodeKind::ParenthesizedType(_) => "ParenthesizedType",
            NodeKind::TypeQuery(_) => "TypeQuery",
            NodeKind::ThisType => "ThisType",
            NodeKind::TemplateLiteralType(_) => "TemplateLiteralType",
            NodeKind::PropertyAccessExpression(_) => "PropertyAccessExpression",
            NodeKind::ElementAccessExpression(_) => "ElementAccessExpression",
            NodeKind::CallExpression(_) => "CallExpression",
            NodeKind::NewExpression(_) => "NewExpression",
            NodeKind::ObjectLiteralExpression(_) => "ObjectLiteralExpression",
            NodeKind::PropertyAssignment(_) => "PropertyAssignment",
            NodeKind::ArrayLiteralExpression(_) => "ArrayLiteralExpression",
            NodeKind::SpreadElement(_) => "SpreadElement",
            NodeKind::ParenthesizedExpression(_) => "ParenthesizedExpression",
            NodeKind::AsExpression(_) => "AsExpression",
            NodeKind::ArrowFunction(_) => "ArrowFunction",
            NodeKind::FunctionExpression(_) => "FunctionExpression",
        }
    }

    /// Function-like payload for signature-bearing kinds.
    pub fn as_function_like(&self) -> Option<&FunctionData> {
        match self {
            NodeKind::FunctionDeclaration(f)
            | NodeKind::MethodSignature(f)
            | NodeKind::MethodDeclaration(f)
            | NodeKind::Constructor(f)
            | NodeKind::CallSignature(f)
            | NodeKind::ConstructSignature(f)
            | NodeKind::FunctionType(f)
            | NodeKind::ConstructorType(f)
            | NodeKind::ArrowFunction(f)
            | NodeKind::FunctionExpression(f) => Some(f),
            _ => None,
        }
    }

    pub fn is_type_node(&self) -> bool {
        matches!(
            self,
            NodeKind::KeywordType(_)
                | NodeKind::TypeReference(_)
                | NodeKind::ArrayType(_)
                | NodeKind::TupleType(_)
                | NodeKind::NamedTupleMember(_)
                | NodeKind::OptionalType(_)
                | NodeKind::RestType(_)
                | NodeKind::UnionType(_)
                | NodeKind::IntersectionType(_)
                | NodeKind::LiteralType(_)
                | NodeKind::TypeLiteral(_)
                | NodeKind::FunctionType(_)
                | NodeKind::ConstructorType(_)
                | NodeKind::TypeOperator(_)
                | NodeKind::IndexedAccessType(_)
                | NodeKind::MappedType(_)
                | NodeKind::ParenthesizedType(_)
                | NodeKind::TypeQuery(_)
                | NodeKind::ThisType
                | NodeKind::TemplateLiteralType(_)
        )
    }
}
