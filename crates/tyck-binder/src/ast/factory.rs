//! Node factory.
//!
//! Programs are assembled bottom-up: children are created first and every
//! constructor links them to the new parent. Leaf nodes receive increasing
//! synthetic positions so diagnostics have stable, distinct ranges.

use super::arena::NodeArena;
use super::node::*;

impl NodeArena {
    /// Add flags to an existing node header.
    pub fn with_flags(&mut self, idx: NodeIndex, flags: u16) -> NodeIndex {
        if let Some(node) = self.nodes.get_mut(idx.0 as usize) {
            node.flags |= flags;
        }
        idx
    }

    pub fn exported(&mut self, idx: NodeIndex) -> NodeIndex {
        self.with_flags(idx, node_flags::EXPORT)
    }

    pub fn declared(&mut self, idx: NodeIndex) -> NodeIndex {
        self.with_flags(idx, node_flags::AMBIENT)
    }

    // =========================================================================
    // Names and literals
    // =========================================================================

    pub fn ident(&mut self, text: &str) -> NodeIndex {
        let width = text.len() as u32;
        self.add(
            NodeKind::Identifier(IdentifierData {
                escaped_text: text.to_string(),
            }),
            0,
            width,
        )
    }

    /// Identifier or left-nested qualified name from dotted text.
    pub fn entity_name(&mut self, dotted: &str) -> NodeIndex {
        let mut parts = dotted.split('.');
        let mut left = self.ident(parts.next().unwrap_or_default());
        for part in parts {
            let right = self.ident(part);
            left = self.add(NodeKind::QualifiedName(QualifiedNameData { left, right }), 0, 0);
        }
        left
    }

    pub fn string_lit(&mut self, text: &str) -> NodeIndex {
        let width = text.len() as u32 + 2;
        self.add(
            NodeKind::StringLiteral(LiteralData {
                text: text.to_string(),
            }),
            0,
            width,
        )
    }

    pub fn num_lit(&mut self, value: f64) -> NodeIndex {
        let width = super::arena::format_number(value).len() as u32;
        self.add(NodeKind::NumericLiteral(NumericLiteralData { value }), 0, width)
    }

    pub fn bigint_lit(&mut self, text: &str) -> NodeIndex {
        let width = text.len() as u32 + 1;
        self.add(
            NodeKind::BigIntLiteral(LiteralData {
                text: text.to_string(),
            }),
            0,
            width,
        )
    }

    pub fn true_lit(&mut self) -> NodeIndex {
        self.add(NodeKind::TrueKeyword, 0, 4)
    }

    pub fn false_lit(&mut self) -> NodeIndex {
        self.add(NodeKind::FalseKeyword, 0, 5)
    }

    pub fn null_lit(&mut self) -> NodeIndex {
        self.add(NodeKind::NullKeyword, 0, 4)
    }

    // =========================================================================
    // Type nodes
    // =========================================================================

    pub fn keyword(&mut self, kind: KeywordTypeKind) -> NodeIndex {
        self.add(NodeKind::KeywordType(kind), 0, 6)
    }

    pub fn type_ref(&mut self, name: &str, type_arguments: Vec<NodeIndex>) -> NodeIndex {
        let type_name = self.entity_name(name);
        self.add(
            NodeKind::TypeReference(TypeRefData {
                type_name,
                type_arguments,
            }),
            0,
            0,
        )
    }

    pub fn array_type(&mut self, element_type: NodeIndex) -> NodeIndex {
        self.add(NodeKind::ArrayType(ArrayTypeData { element_type }), 0, 0)
    }

    pub fn tuple_type(&mut self, elements: Vec<NodeIndex>) -> NodeIndex {
        self.add(NodeKind::TupleType(TupleTypeData { elements }), 0, 2)
    }

    pub fn named_tuple_member(
        &mut self,
        name: &str,
        type_node: NodeIndex,
        question_token: bool,
        dot_dot_dot: bool,
    ) -> NodeIndex {
        let name = self.ident(name);
        self.add(
            NodeKind::NamedTupleMember(NamedTupleMemberData {
                name,
                question_token,
                dot_dot_dot,
                type_node,
            }),
            0,
            0,
        )
    }

    pub fn optional_type(&mut self, type_node: NodeIndex) -> NodeIndex {
        self.add(NodeKind::OptionalType(WrappedTypeData { type_node }), 0, 0)
    }

    pub fn rest_type(&mut self, type_node: NodeIndex) -> NodeIndex {
        self.add(NodeKind::RestType(WrappedTypeData { type_node }), 0, 0)
    }

    pub fn union_type(&mut self, types: Vec<NodeIndex>) -> NodeIndex {
        self.add(NodeKind::UnionType(CompositeTypeData { types }), 0, 0)
    }

    pub fn intersection_type(&mut self, types: Vec<NodeIndex>) -> NodeIndex {
        self.add(NodeKind::IntersectionType(CompositeTypeData { types }), 0, 0)
    }

    pub fn literal_type(&mut self, literal: NodeIndex) -> NodeIndex {
        self.add(NodeKind::LiteralType(LiteralTypeData { literal }), 0, 0)
    }

    pub fn type_literal(&mut self, members: Vec<NodeIndex>) -> NodeIndex {
        self.add(NodeKind::TypeLiteral(TypeLiteralData { members }), 0, 2)
    }

    pub fn function_type(
        &mut self,
        type_parameters: Vec<NodeIndex>,
        parameters: Vec<NodeIndex>,
        return_type: NodeIndex,
    ) -> NodeIndex {
        self.add(
            NodeKind::FunctionType(signature_data(type_parameters, parameters, return_type)),
            0,
            4,
        )
    }

    pub fn constructor_type(
        &mut self,
        type_parameters: Vec<NodeIndex>,
        parameters: Vec<NodeIndex>,
        return_type: NodeIndex,
    ) -> NodeIndex {
        self.add(
            NodeKind::ConstructorType(signature_data(type_parameters, parameters, return_type)),
            0,
            8,
        )
    }

    pub fn keyof(&mut self, type_node: NodeIndex) -> NodeIndex {
        self.add(
            NodeKind::TypeOperator(TypeOperatorData {
                operator: TypeOperatorKind::Keyof,
                type_node,
            }),
            0,
            0,
        )
    }

    pub fn readonly_type(&mut self, type_node: NodeIndex) -> NodeIndex {
        self.add(
            NodeKind::TypeOperator(TypeOperatorData {
                operator: TypeOperatorKind::Readonly,
                type_node,
            }),
            0,
            0,
        )
    }

    pub fn indexed_access_type(&mut self, object_type: NodeIndex, index_type: NodeIndex) -> NodeIndex {
        self.add(
            NodeKind::IndexedAccessType(IndexedAccessTypeData {
                object_type,
                index_type,
            }),
            0,
            0,
        )
    }

    pub fn mapped_type(
        &mut self,
        type_parameter: NodeIndex,
        name_type: NodeIndex,
        readonly_token: Option<MappedModifier>,
        question_token: Option<MappedModifier>,
        type_node: NodeIndex,
    ) -> NodeIndex {
        self.add(
            NodeKind::MappedType(MappedTypeData {
                type_parameter,
                name_type,
                readonly_token,
                question_token,
                type_node,
            }),
            0,
            0,
        )
    }

    pub fn paren_type(&mut self, type_node: NodeIndex) -> NodeIndex {
        self.add(NodeKind::ParenthesizedType(WrappedTypeData { type_node }), 0, 0)
    }

    pub fn type_query(&mut self, name: &str) -> NodeIndex {
        let expr_name = self.entity_name(name);
        self.add(
            NodeKind::TypeQuery(TypeQueryData {
                expr_name,
                type_arguments: Vec::new(),
            }),
            0,
            0,
        )
    }

    pub fn this_type(&mut self) -> NodeIndex {
        self.add(NodeKind::ThisType, 0, 4)
    }

    pub fn template_literal_type(&mut self, head: &str, spans: Vec<(NodeIndex, &str)>) -> NodeIndex {
        let width = head.len() as u32 + 2;
        self.add(
            NodeKind::TemplateLiteralType(TemplateLiteralTypeData {
                head: head.to_string(),
                spans: spans.into_iter().map(|(t, s)| (t, s.to_string())).collect(),
            }),
            0,
            width,
        )
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    pub fn type_param(&mut self, name: &str, constraint: NodeIndex, default: NodeIndex) -> NodeIndex {
        let name = self.ident(name);
        self.add(
            NodeKind::TypeParameter(TypeParameterData {
                name,
                constraint,
                default,
            }),
            0,
            0,
        )
    }

    pub fn param(&mut self, name: &str, type_annotation: NodeIndex) -> NodeIndex {
        self.param_ex(name, type_annotation, false, false)
    }

    pub fn optional_param(&mut self, name: &str, type_annotation: NodeIndex) -> NodeIndex {
        self.param_ex(name, type_annotation, true, false)
    }

    pub fn rest_param(&mut self, name: &str, type_annotation: NodeIndex) -> NodeIndex {
        self.param_ex(name, type_annotation, false, true)
    }

    fn param_ex(
        &mut self,
        name: &str,
        type_annotation: NodeIndex,
        question_token: bool,
        dot_dot_dot: bool,
    ) -> NodeIndex {
        let name = self.ident(name);
        self.add(
            NodeKind::Parameter(ParameterData {
                name,
                type_annotation,
                initializer: NodeIndex::NONE,
                question_token,
                dot_dot_dot,
            }),
            0,
            0,
        )
    }

    /// Variable declaration; `flags` carries `LET`/`CONST` and modifiers.
    pub fn variable(
        &mut self,
        flags: u16,
        name: &str,
        type_annotation: NodeIndex,
        initializer: NodeIndex,
    ) -> NodeIndex {
        let name = self.ident(name);
        self.add(
            NodeKind::VariableDeclaration(VariableData {
                name,
                type_annotation,
                initializer,
            }),
            flags,
            0,
        )
    }

    pub fn var_decl(&mut self, name: &str, type_annotation: NodeIndex, initializer: NodeIndex) -> NodeIndex {
        self.variable(node_flags::NONE, name, type_annotation, initializer)
    }

    pub fn let_decl(&mut self, name: &str, type_annotation: NodeIndex, initializer: NodeIndex) -> NodeIndex {
        self.variable(node_flags::LET, name, type_annotation, initializer)
    }

    pub fn const_decl(&mut self, name: &str, type_annotation: NodeIndex, initializer: NodeIndex) -> NodeIndex {
        self.variable(node_flags::CONST, name, type_annotation, initializer)
    }

    pub fn function_decl(
        &mut self,
        name: &str,
        type_parameters: Vec<NodeIndex>,
        parameters: Vec<NodeIndex>,
        return_type: NodeIndex,
        body: FunctionBody,
    ) -> NodeIndex {
        let name = self.ident(name);
        self.add(
            NodeKind::FunctionDeclaration(FunctionData {
                name,
                question_token: false,
                type_parameters,
                parameters,
                return_type,
                body,
            }),
            0,
            0,
        )
    }

    /// `Name<Args>` in a heritage clause.
    pub fn heritage(&mut self, name: &str, type_arguments: Vec<NodeIndex>) -> NodeIndex {
        let expression = self.entity_name(name);
        self.add(
            NodeKind::ExpressionWithTypeArguments(ExprWithTypeArgsData {
                expression,
                type_arguments,
            }),
            0,
            0,
        )
    }

    pub fn class_decl(
        &mut self,
        name: &str,
        type_parameters: Vec<NodeIndex>,
        extends: NodeIndex,
        implements: Vec<NodeIndex>,
        members: Vec<NodeIndex>,
    ) -> NodeIndex {
        let name = self.ident(name);
        self.add(
            NodeKind::ClassDeclaration(ClassData {
                name,
                type_parameters,
                extends,
                implements,
                members,
            }),
            0,
            0,
        )
    }

    pub fn interface(
        &mut self,
        name: &str,
        type_parameters: Vec<NodeIndex>,
        extends: Vec<NodeIndex>,
        members: Vec<NodeIndex>,
    ) -> NodeIndex {
        let name = self.ident(name);
        self.add(
            NodeKind::InterfaceDeclaration(InterfaceData {
                name,
                type_parameters,
                extends,
                members,
            }),
            0,
            0,
        )
    }

    pub fn type_alias(&mut self, name: &str, type_parameters: Vec<NodeIndex>, type_node: NodeIndex) -> NodeIndex {
        let name = self.ident(name);
        self.add(
            NodeKind::TypeAliasDeclaration(TypeAliasData {
                name,
                type_parameters,
                type_node,
            }),
            0,
            0,
        )
    }

    pub fn enum_decl(&mut self, name: &str, members: Vec<NodeIndex>) -> NodeIndex {
        let name = self.ident(name);
        self.add(NodeKind::EnumDeclaration(EnumData { name, members }), 0, 0)
    }

    pub fn enum_member(&mut self, name: &str, initializer: NodeIndex) -> NodeIndex {
        let name = self.ident(name);
        self.add(NodeKind::EnumMember(EnumMemberData { name, initializer }), 0, 0)
    }

    pub fn namespace(&mut self, name: &str, body: Vec<NodeIndex>) -> NodeIndex {
        let name = self.ident(name);
        self.add(NodeKind::ModuleDeclaration(ModuleData { name, body }), 0, 0)
    }

    /// `declare module "name" { ... }`
    pub fn ambient_module(&mut self, name: &str, body: Vec<NodeIndex>) -> NodeIndex {
        let name = self.string_lit(name);
        self.add(
            NodeKind::ModuleDeclaration(ModuleData { name, body }),
            node_flags::AMBIENT,
            0,
        )
    }

    /// `declare global { ... }`
    pub fn global_augmentation(&mut self, body: Vec<NodeIndex>) -> NodeIndex {
        let name = self.ident("global");
        self.add(
            NodeKind::ModuleDeclaration(ModuleData { name, body }),
            node_flags::AMBIENT | node_flags::GLOBAL_AUGMENTATION,
            0,
        )
    }

    // =========================================================================
    // Members
    // =========================================================================

    pub fn property_sig(&mut self, name: &str, type_annotation: NodeIndex, question_token: bool) -> NodeIndex {
        let name = self.ident(name);
        self.add(
            NodeKind::PropertySignature(PropertyData {
                name,
                question_token,
                type_annotation,
                initializer: NodeIndex::NONE,
            }),
            0,
            0,
        )
    }

    pub fn property_decl(
        &mut self,
        name: &str,
        type_annotation: NodeIndex,
        initializer: NodeIndex,
        question_token: bool,
    ) -> NodeIndex {
        let name = self.ident(name);
        self.add(
            NodeKind::PropertyDeclaration(PropertyData {
                name,
                question_token,
                type_annotation,
                initializer,
            }),
            0,
            0,
        )
    }

    pub fn method_sig(
        &mut self,
        name: &str,
        type_parameters: Vec<NodeIndex>,
        parameters: Vec<NodeIndex>,
        return_type: NodeIndex,
    ) -> NodeIndex {
        let name = self.ident(name);
        let mut data = signature_data(type_parameters, parameters, return_type);
        data.name = name;
        self.add(NodeKind::MethodSignature(data), 0, 0)
    }

    pub fn method_decl(
        &mut self,
        name: &str,
        type_parameters: Vec<NodeIndex>,
        parameters: Vec<NodeIndex>,
        return_type: NodeIndex,
        body: FunctionBody,
    ) -> NodeIndex {
        let name = self.ident(name);
        let mut data = signature_data(type_parameters, parameters, return_type);
        data.name = name;
        data.body = body;
        self.add(NodeKind::MethodDeclaration(data), 0, 0)
    }

    pub fn constructor(&mut self, parameters: Vec<NodeIndex>) -> NodeIndex {
        self.add(
            NodeKind::Constructor(signature_data(Vec::new(), parameters, NodeIndex::NONE)),
            0,
            11,
        )
    }

    pub fn call_sig(
        &mut self,
        type_parameters: Vec<NodeIndex>,
        parameters: Vec<NodeIndex>,
        return_type: NodeIndex,
    ) -> NodeIndex {
        self.add(
            NodeKind::CallSignature(signature_data(type_parameters, parameters, return_type)),
            0,
            2,
        )
    }

    pub fn construct_sig(
        &mut self,
        type_parameters: Vec<NodeIndex>,
        parameters: Vec<NodeIndex>,
        return_type: NodeIndex,
    ) -> NodeIndex {
        self.add(
            NodeKind::ConstructSignature(signature_data(type_parameters, parameters, return_type)),
            0,
            3,
        )
    }

    /// `[name: key]: value`
    pub fn index_sig(&mut self, param_name: &str, key_type: NodeIndex, type_annotation: NodeIndex) -> NodeIndex {
        let parameter = self.param(param_name, key_type);
        self.add(
            NodeKind::IndexSignature(IndexSignatureData {
                parameter,
                type_annotation,
            }),
            0,
            0,
        )
    }

    // =========================================================================
    // Imports and exports
    // =========================================================================

    /// `import name = A.B`
    pub fn import_equals(&mut self, name: &str, entity: &str) -> NodeIndex {
        let name = self.ident(name);
        let module_reference = self.entity_name(entity);
        self.add(
            NodeKind::ImportEqualsDeclaration(ImportEqualsData {
                name,
                module_reference,
            }),
            0,
            0,
        )
    }

    /// `import name = require("specifier")`
    pub fn import_require(&mut self, name: &str, specifier: &str) -> NodeIndex {
        let name = self.ident(name);
        let expression = self.string_lit(specifier);
        let module_reference = self.add(
            NodeKind::ExternalModuleReference(ExternalModuleReferenceData { expression }),
            0,
            0,
        );
        self.add(
            NodeKind::ImportEqualsDeclaration(ImportEqualsData {
                name,
                module_reference,
            }),
            0,
            0,
        )
    }

    /// `import name from "specifier"`
    pub fn import_default(&mut self, name: &str, specifier: &str) -> NodeIndex {
        let name = self.ident(name);
        let import_clause = self.add(
            NodeKind::ImportClause(ImportClauseData {
                name,
                named_bindings: NodeIndex::NONE,
            }),
            0,
            0,
        );
        self.import_decl(import_clause, specifier)
    }

    /// `import * as name from "specifier"`
    pub fn import_namespace(&mut self, name: &str, specifier: &str) -> NodeIndex {
        let name = self.ident(name);
        let named_bindings = self.add(NodeKind::NamespaceImport(NamedData { name }), 0, 0);
        let import_clause = self.add(
            NodeKind::ImportClause(ImportClauseData {
                name: NodeIndex::NONE,
                named_bindings,
            }),
            0,
            0,
        );
        self.import_decl(import_clause, specifier)
    }

    /// `import { a, b as c } from "specifier"`; each pair is
    /// `(property name, local name)`.
    pub fn import_named(&mut self, specifiers: &[(&str, &str)], specifier: &str) -> NodeIndex {
        let elements = specifiers
            .iter()
            .map(|&(property, local)| self.specifier(NodeKindTag::Import, property, local))
            .collect();
        let named_bindings = self.add(NodeKind::NamedImports(NamedElementsData { elements }), 0, 0);
        let import_clause = self.add(
            NodeKind::ImportClause(ImportClauseData {
                name: NodeIndex::NONE,
                named_bindings,
            }),
            0,
            0,
        );
        self.import_decl(import_clause, specifier)
    }

    fn import_decl(&mut self, import_clause: NodeIndex, specifier: &str) -> NodeIndex {
        let module_specifier = self.string_lit(specifier);
        self.add(
            NodeKind::ImportDeclaration(ImportDeclData {
                import_clause,
                module_specifier,
            }),
            0,
            0,
        )
    }

    /// `export { a, b as c }` with an optional `from "specifier"`.
    pub fn export_named(&mut self, specifiers: &[(&str, &str)], from: Option<&str>) -> NodeIndex {
        let elements = specifiers
            .iter()
            .map(|&(local, exported)| self.specifier(NodeKindTag::Export, local, exported))
            .collect();
        let export_clause = self.add(NodeKind::NamedExports(NamedElementsData { elements }), 0, 0);
        let module_specifier = match from {
            Some(spec) => self.string_lit(spec),
            None => NodeIndex::NONE,
        };
        self.add(
            NodeKind::ExportDeclaration(ExportDeclData {
                export_clause,
                module_specifier,
            }),
            0,
            0,
        )
    }

    /// `export * from "specifier"`
    pub fn export_star(&mut self, specifier: &str) -> NodeIndex {
        let module_specifier = self.string_lit(specifier);
        self.add(
            NodeKind::ExportDeclaration(ExportDeclData {
                export_clause: NodeIndex::NONE,
                module_specifier,
            }),
            0,
            0,
        )
    }

    /// `export * as name from "specifier"`
    pub fn export_star_as(&mut self, name: &str, specifier: &str) -> NodeIndex {
        let name = self.ident(name);
        let export_clause = self.add(NodeKind::NamespaceExport(NamedData { name }), 0, 0);
        let module_specifier = self.string_lit(specifier);
        self.add(
            NodeKind::ExportDeclaration(ExportDeclData {
                export_clause,
                module_specifier,
            }),
            0,
            0,
        )
    }

    /// `export = expression`
    pub fn export_equals(&mut self, expression: NodeIndex) -> NodeIndex {
        self.add(
            NodeKind::ExportAssignment(ExportAssignmentData {
                expression,
                is_export_equals: true,
            }),
            0,
            0,
        )
    }

    /// `export default expression`
    pub fn export_default(&mut self, expression: NodeIndex) -> NodeIndex {
        self.add(
            NodeKind::ExportAssignment(ExportAssignmentData {
                expression,
                is_export_equals: false,
            }),
            0,
            0,
        )
    }

    fn specifier(&mut self, tag: NodeKindTag, property: &str, name: &str) -> NodeIndex {
        let property_name = if property == name {
            NodeIndex::NONE
        } else {
            self.ident(property)
        };
        let name = self.ident(name);
        let data = SpecifierData {
            property_name,
            name,
        };
        let kind = match tag {
            NodeKindTag::Import => NodeKind::ImportSpecifier(data),
            NodeKindTag::Export => NodeKind::ExportSpecifier(data),
        };
        self.add(kind, 0, 0)
    }

    // =========================================================================
    // Statements and expressions
    // =========================================================================

    pub fn expr_stmt(&mut self, expression: NodeIndex) -> NodeIndex {
        self.add(NodeKind::ExpressionStatement(ExprStatementData { expression }), 0, 0)
    }

    pub fn return_stmt(&mut self, expression: NodeIndex) -> NodeIndex {
        self.add(NodeKind::ReturnStatement(ReturnData { expression }), 0, 6)
    }

    pub fn prop_access(&mut self, expression: NodeIndex, name: &str) -> NodeIndex {
        let name_or_argument = self.ident(name);
        self.add(
            NodeKind::PropertyAccessExpression(AccessExprData {
                expression,
                name_or_argument,
            }),
            0,
            0,
        )
    }

    pub fn elem_access(&mut self, expression: NodeIndex, argument: NodeIndex) -> NodeIndex {
        self.add(
            NodeKind::ElementAccessExpression(AccessExprData {
                expression,
                name_or_argument: argument,
            }),
            0,
            0,
        )
    }

    pub fn call(
        &mut self,
        expression: NodeIndex,
        type_arguments: Vec<NodeIndex>,
        arguments: Vec<NodeIndex>,
    ) -> NodeIndex {
        self.add(
            NodeKind::CallExpression(CallExprData {
                expression,
                type_arguments,
                arguments,
            }),
            0,
            0,
        )
    }

    pub fn new_expr(
        &mut self,
        expression: NodeIndex,
        type_arguments: Vec<NodeIndex>,
        arguments: Vec<NodeIndex>,
    ) -> NodeIndex {
        self.add(
            NodeKind::NewExpression(CallExprData {
                expression,
                type_arguments,
                arguments,
            }),
            0,
            0,
        )
    }

    pub fn object_lit(&mut self, properties: Vec<(&str, NodeIndex)>) -> NodeIndex {
        let properties = properties
            .into_iter()
            .map(|(name, initializer)| {
                let name = self.ident(name);
                self.add(
                    NodeKind::PropertyAssignment(PropertyAssignmentData { name, initializer }),
                    0,
                    0,
                )
            })
            .collect();
        self.add(
            NodeKind::ObjectLiteralExpression(ObjectLiteralData { properties }),
            0,
            2,
        )
    }

    pub fn array_lit(&mut self, elements: Vec<NodeIndex>) -> NodeIndex {
        self.add(
            NodeKind::ArrayLiteralExpression(ArrayLiteralData { elements }),
            0,
            2,
        )
    }

    pub fn spread(&mut self, expression: NodeIndex) -> NodeIndex {
        self.add(NodeKind::SpreadElement(WrappedExprData { expression }), 0, 0)
    }

    pub fn paren(&mut self, expression: NodeIndex) -> NodeIndex {
        self.add(NodeKind::ParenthesizedExpression(WrappedExprData { expression }), 0, 0)
    }

    pub fn as_expr(&mut self, expression: NodeIndex, type_node: NodeIndex) -> NodeIndex {
        self.add(NodeKind::AsExpression(AsExprData { expression, type_node }), 0, 0)
    }

    /// `(params): ret => body`
    pub fn arrow(&mut self, parameters: Vec<NodeIndex>, return_type: NodeIndex, body: NodeIndex) -> NodeIndex {
        let mut data = signature_data(Vec::new(), parameters, return_type);
        data.body = FunctionBody::Expression(body);
        self.add(NodeKind::ArrowFunction(data), 0, 2)
    }
}

#[derive(Clone, Copy)]
enum NodeKindTag {
    Import,
    Export,
}

fn signature_data(
    type_parameters: Vec<NodeIndex>,
    parameters: Vec<NodeIndex>,
    return_type: NodeIndex,
) -> FunctionData {
    FunctionData {
        name: NodeIndex::NONE,
        question_token: false,
        type_parameters,
        parameters,
        return_type,
        body: FunctionBody::None,
    }
}
