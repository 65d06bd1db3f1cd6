//! Rendering types and signatures for diagnostics.
//!
//! Aliased types print as their alias; unions print their origin when one
//! was kept. Nesting deeper than the printing profile allows prints `???`
//! and a type reached again while it is being printed prints `...`.

use tyck_binder::{SymbolId, format_number, symbol_flags};
use tyck_types::{
    ElementFlags, LiteralValue, ObjectKind, SignatureId, SignatureKind, TypeData, TypeFlags, TypeId,
};

use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::state::CheckerState;
use crate::types::MappedTypeModifiers;

impl<'a> CheckerState<'a> {
    /// Display form of `t`, e.g. `{ bar: string; }` or `Foo<number>[]`.
    pub fn type_to_string(&mut self, t: TypeId) -> String {
        TypePrinter::new(false).print(self, t)
    }

    /// Like [`type_to_string`](Self::type_to_string) with symbols spelled
    /// through their namespace parents.
    pub(crate) fn type_to_string_qualified(&mut self, t: TypeId) -> String {
        TypePrinter::new(true).print(self, t)
    }

    pub fn signature_to_string(&mut self, signature: SignatureId) -> String {
        TypePrinter::new(false).signature(self, signature, SignatureStyle::Arrow)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum SignatureStyle {
    /// `(x: T) => R`
    Arrow,
    /// `(x: T): R` inside a type literal.
    Member,
    /// `new (x: T): R` inside a type literal.
    ConstructMember,
    /// `new (x: T) => R`
    ConstructArrow,
}

struct TypePrinter {
    guard: RecursionGuard<TypeId>,
    qualified: bool,
}

impl TypePrinter {
    fn new(qualified: bool) -> Self {
        Self {
            guard: RecursionGuard::with_profile(RecursionProfile::TypePrinting),
            qualified,
        }
    }

    fn print(&mut self, state: &mut CheckerState<'_>, t: TypeId) -> String {
        match self.guard.enter(t) {
            RecursionResult::Entered => {}
            RecursionResult::Cycle => return "...".to_string(),
            RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => return "???".to_string(),
        }
        let text = self.print_worker(state, t);
        self.guard.leave(t);
        text
    }

    fn symbol_text(&self, state: &CheckerState<'_>, symbol: SymbolId) -> String {
        if self.qualified {
            state.symbol_to_string(symbol)
        } else {
            state.symbol_name(symbol)
        }
    }

    fn print_worker(&mut self, state: &mut CheckerState<'_>, t: TypeId) -> String {
        let flags = state.type_flags(t);
        if flags.contains(TypeFlags::ANY) {
            return "any".to_string();
        }
        if let Some(alias) = state.ty(t).alias.clone() {
            let name = self.symbol_text(state, alias.symbol);
            return self.with_type_arguments(state, name, &alias.type_arguments);
        }
        let data = state.ty(t).data.clone();
        match data {
            TypeData::Intrinsic(intrinsic) => intrinsic.name.to_string(),
            TypeData::Literal(literal) => match literal.value {
                LiteralValue::String(value) => quote_string(&value),
                LiteralValue::Number(value) => number_to_string(value),
                LiteralValue::BigInt(value) => value.to_string(),
                LiteralValue::Boolean(value) => value.to_string(),
            },
            TypeData::UniqueSymbol(symbol) => format!("typeof {}", symbol.escaped_name),
            TypeData::TypeParameter(parameter) => {
                if parameter.is_this_type {
                    "this".to_string()
                } else {
                    let symbol = state.ty(t).symbol;
                    self.symbol_text(state, symbol)
                }
            }
            TypeData::Union(union) => match union.origin {
                Some(origin) if origin != t => self.print(state, origin),
                _ => self.print_union(state, &union.types),
            },
            TypeData::Intersection(intersection) => {
                let parts: Vec<String> = intersection
                    .types
                    .iter()
                    .map(|&c| self.print_operand(state, c, TypeFlags::UNION))
                    .collect();
                parts.join(" & ")
            }
            TypeData::Index(index) => {
                let operand = self.print_operand(state, index.target, TypeFlags::UNION_OR_INTERSECTION);
                format!("keyof {operand}")
            }
            TypeData::IndexedAccess(access) => {
                let object = self.print_operand(
                    state,
                    access.object_type,
                    TypeFlags::UNION_OR_INTERSECTION | TypeFlags::INDEX,
                );
                let index = self.print(state, access.index_type);
                format!("{object}[{index}]")
            }
            TypeData::TemplateLiteral(template) => {
                let mut text = String::from("`");
                text.push_str(&template.texts[0]);
                for (i, &hole) in template.types.iter().enumerate() {
                    text.push_str("${");
                    text.push_str(&self.print(state, hole));
                    text.push('}');
                    text.push_str(template.texts.get(i + 1).map_or("", String::as_str));
                }
                text.push('`');
                text
            }
            TypeData::Object(object) => self.print_object(state, t, &object.kind),
        }
    }

    /// `true | false` pairs collapse back into `boolean`.
    fn print_union(&mut self, state: &mut CheckerState<'_>, types: &[TypeId]) -> String {
        let is_true = |s: &CheckerState<'_>, c: TypeId| s.get_regular_type_of_literal_type(c) == TypeId::REGULAR_TRUE;
        let is_false = |s: &CheckerState<'_>, c: TypeId| s.get_regular_type_of_literal_type(c) == TypeId::REGULAR_FALSE;
        let has_boolean = types.iter().any(|&c| is_true(state, c)) && types.iter().any(|&c| is_false(state, c));
        let mut parts = Vec::with_capacity(types.len());
        let mut boolean_written = false;
        for &c in types {
            if has_boolean && (is_true(state, c) || is_false(state, c)) {
                if !boolean_written {
                    parts.push("boolean".to_string());
                    boolean_written = true;
                }
                continue;
            }
            parts.push(self.print_operand(state, c, TypeFlags::empty()));
        }
        parts.join(" | ")
    }

    /// Print a constituent, parenthesized when its own syntax would bind
    /// looser than the surrounding operator.
    fn print_operand(&mut self, state: &mut CheckerState<'_>, t: TypeId, paren_flags: TypeFlags) -> String {
        let text = self.print(state, t);
        let is_arrow = (text.starts_with('(') || text.starts_with('<') || text.starts_with("new ")) && text.contains(") => ");
        let needs_parens = is_arrow || (state.type_flags(t).intersects(paren_flags) && state.ty(t).alias.is_none());
        if needs_parens { format!("({text})") } else { text }
    }

    fn with_type_arguments(&mut self, state: &mut CheckerState<'_>, name: String, arguments: &[TypeId]) -> String {
        if arguments.is_empty() {
            return name;
        }
        let printed: Vec<String> = arguments.iter().map(|&a| self.print(state, a)).collect();
        format!("{name}<{}>", printed.join(", "))
    }

    // =========================================================================
    // Objects
    // =========================================================================

    fn print_object(&mut self, state: &mut CheckerState<'_>, t: TypeId, kind: &ObjectKind) -> String {
        match kind {
            ObjectKind::Interface(iface) => {
                if iface.tuple.is_some() {
                    let parameters = iface.type_parameters.clone();
                    return self.print_tuple(state, t, &parameters);
                }
                let symbol = state.ty(t).symbol;
                let name = self.symbol_text(state, symbol);
                let local = iface.local_type_parameters.clone();
                self.with_type_arguments(state, name, &local)
            }
            ObjectKind::Reference(reference) => {
                let arguments = state.get_type_arguments(t);
                if state.is_array_type(t) {
                    let element = arguments.first().copied().unwrap_or(TypeId::ANY);
                    let element = self.print_operand(state, element, TypeFlags::UNION_OR_INTERSECTION);
                    return if state.is_readonly_array_type(t) {
                        format!("readonly {element}[]")
                    } else {
                        format!("{element}[]")
                    };
                }
                if state.ty(reference.target).tuple_info().is_some() {
                    return self.print_tuple(state, reference.target, &arguments);
                }
                let target = reference.target;
                let symbol = state.ty(target).symbol;
                let name = self.symbol_text(state, symbol);
                let (outer, local) = state
                    .ty(target)
                    .as_interface()
                    .map_or((0, arguments.len()), |i| (i.outer_type_parameters.len(), i.local_type_parameters.len()));
                let shown: Vec<TypeId> = arguments.iter().skip(outer).take(local).copied().collect();
                self.with_type_arguments(state, name, &shown)
            }
            ObjectKind::Mapped(_) => self.print_mapped(state, t),
            ObjectKind::Anonymous(_) | ObjectKind::ReverseMapped(_) => {
                let symbol = state.ty(t).symbol;
                if symbol.is_some()
                    && state.symbol_flags_raw(symbol) & (symbol_flags::CLASS | symbol_flags::ENUM | symbol_flags::VALUE_MODULE)
                        != 0
                {
                    return format!("typeof {}", self.symbol_text(state, symbol));
                }
                self.print_structure(state, t)
            }
        }
    }

    fn print_tuple(&mut self, state: &mut CheckerState<'_>, target: TypeId, elements: &[TypeId]) -> String {
        let Some(info) = state.ty(target).tuple_info().cloned() else {
            return "[]".to_string();
        };
        let mut parts = Vec::with_capacity(info.element_flags.len());
        for (i, &flags) in info.element_flags.iter().enumerate() {
            let element = elements.get(i).copied().unwrap_or(TypeId::ANY);
            let label = info
                .labeled_declarations
                .as_ref()
                .and_then(|labels| labels.get(i))
                .and_then(|&node| state.ctx.arena.declaration_name_text(node));
            let text = if flags.contains(ElementFlags::REST) {
                let element = self.print_operand(state, element, TypeFlags::UNION_OR_INTERSECTION);
                format!("{element}[]")
            } else {
                self.print(state, element)
            };
            let part = match (label, flags) {
                (Some(label), f) if f.contains(ElementFlags::OPTIONAL) => format!("{label}?: {text}"),
                (Some(label), f) if f.intersects(ElementFlags::VARIABLE) => format!("...{label}: {text}"),
                (Some(label), _) => format!("{label}: {text}"),
                (None, f) if f.contains(ElementFlags::OPTIONAL) => format!("{text}?"),
                (None, f) if f.intersects(ElementFlags::VARIABLE) => format!("...{text}"),
                (None, _) => text,
            };
            parts.push(part);
        }
        let prefix = if info.readonly { "readonly " } else { "" };
        format!("{prefix}[{}]", parts.join(", "))
    }

    fn print_mapped(&mut self, state: &mut CheckerState<'_>, t: TypeId) -> String {
        let parameter = state.get_type_parameter_from_mapped_type(t);
        let constraint = state.get_constraint_type_from_mapped_type(t);
        let name_type = state.get_name_type_from_mapped_type(t);
        let template = state.get_template_type_from_mapped_type(t);
        let modifiers = state.get_mapped_type_modifiers(t);

        let readonly = if modifiers.contains(MappedTypeModifiers::INCLUDE_READONLY) {
            "readonly "
        } else if modifiers.contains(MappedTypeModifiers::EXCLUDE_READONLY) {
            "-readonly "
        } else {
            ""
        };
        let optional = if modifiers.contains(MappedTypeModifiers::INCLUDE_OPTIONAL) {
            "?"
        } else if modifiers.contains(MappedTypeModifiers::EXCLUDE_OPTIONAL) {
            "-?"
        } else {
            ""
        };
        let parameter = self.print(state, parameter);
        let constraint = self.print(state, constraint);
        let as_clause = match name_type {
            Some(n) => format!(" as {}", self.print(state, n)),
            None => String::new(),
        };
        let template = self.print(state, template);
        format!("{{ {readonly}[{parameter} in {constraint}{as_clause}]{optional}: {template}; }}")
    }

    /// Type literal form. A lone call or construct signature prints in
    /// arrow form.
    fn print_structure(&mut self, state: &mut CheckerState<'_>, t: TypeId) -> String {
        let members = state.resolve_structured_type_members(t);
        if members.properties.is_empty() && members.index_infos.is_empty() {
            match (members.call_signatures.as_slice(), members.construct_signatures.as_slice()) {
                ([], []) => return "{}".to_string(),
                ([signature], []) => return self.signature(state, *signature, SignatureStyle::Arrow),
                ([], [signature]) => return self.signature(state, *signature, SignatureStyle::ConstructArrow),
                _ => {}
            }
        }
        let mut parts = Vec::new();
        for &signature in &members.call_signatures {
            parts.push(self.signature(state, signature, SignatureStyle::Member));
        }
        for &signature in &members.construct_signatures {
            parts.push(self.signature(state, signature, SignatureStyle::ConstructMember));
        }
        for info in &members.index_infos {
            let key = self.print(state, info.key_type);
            let value = self.print(state, info.value_type);
            let readonly = if info.is_readonly { "readonly " } else { "" };
            parts.push(format!("{readonly}[x: {key}]: {value}"));
        }
        for &property in &members.properties {
            parts.push(self.print_property(state, property));
        }
        format!("{{ {}; }}", parts.join("; "))
    }

    fn print_property(&mut self, state: &mut CheckerState<'_>, property: SymbolId) -> String {
        let name = state.symbol_name(property);
        let optional = state.symbol_flags_raw(property) & symbol_flags::OPTIONAL != 0;
        let readonly = if state.is_readonly_symbol(property) { "readonly " } else { "" };
        let mut t = state.get_type_of_symbol(property);
        if optional {
            t = state.remove_missing_or_undefined_type(t);
        }
        let is_method = state.symbol_flags_raw(property) & symbol_flags::METHOD != 0;
        if is_method && !optional {
            let signatures = state.get_signatures_of_type(t, SignatureKind::Call);
            if signatures.len() == 1 {
                let signature = self.signature(state, signatures[0], SignatureStyle::Member);
                return format!("{}{signature}", property_name_text(&name));
            }
        }
        let text = self.print(state, t);
        let question = if optional { "?" } else { "" };
        format!("{readonly}{}{question}: {text}", property_name_text(&name))
    }

    fn signature(&mut self, state: &mut CheckerState<'_>, signature: SignatureId, style: SignatureStyle) -> String {
        let s = state.ctx.types.signature(signature).clone();
        let mut text = String::new();
        if matches!(style, SignatureStyle::ConstructMember | SignatureStyle::ConstructArrow) {
            text.push_str("new ");
        }
        if !s.type_parameters.is_empty() {
            let mut parts = Vec::with_capacity(s.type_parameters.len());
            for &parameter in &s.type_parameters {
                parts.push(self.type_parameter_declaration(state, parameter));
            }
            text.push('<');
            text.push_str(&parts.join(", "));
            text.push('>');
        }
        let rest_index = s.has_rest_parameter().then(|| s.parameters.len() - 1);
        let mut parameters = Vec::with_capacity(s.parameters.len());
        for (i, &parameter) in s.parameters.iter().enumerate() {
            let name = state.symbol_name(parameter);
            let mut t = state.get_type_of_symbol(parameter);
            let part = if Some(i) == rest_index {
                format!("...{name}: {}", self.print(state, t))
            } else if i >= s.min_argument_count {
                t = state.remove_missing_or_undefined_type(t);
                format!("{name}?: {}", self.print(state, t))
            } else {
                format!("{name}: {}", self.print(state, t))
            };
            parameters.push(part);
        }
        text.push('(');
        text.push_str(&parameters.join(", "));
        text.push(')');
        let return_type = state.get_return_type_of_signature(signature);
        let return_text = self.print(state, return_type);
        match style {
            SignatureStyle::Arrow | SignatureStyle::ConstructArrow => format!("{text} => {return_text}"),
            SignatureStyle::Member | SignatureStyle::ConstructMember => format!("{text}: {return_text}"),
        }
    }

    fn type_parameter_declaration(&mut self, state: &mut CheckerState<'_>, parameter: TypeId) -> String {
        let mut text = self.print(state, parameter);
        if let Some(constraint) = state.get_constraint_of_type_parameter(parameter) {
            text.push_str(" extends ");
            text.push_str(&self.print(state, constraint));
        }
        if let Some(default) = state.get_default_from_type_parameter(parameter) {
            text.push_str(" = ");
            text.push_str(&self.print(state, default));
        }
        text
    }
}

fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn number_to_string(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if value == 0.0 {
        "0".to_string()
    } else {
        format_number(value)
    }
}

/// Property names that are not identifiers print quoted.
fn property_name_text(name: &str) -> String {
    let mut chars = name.chars();
    let is_identifier = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$');
    if is_identifier || name.parse::<f64>().is_ok_and(|v| format_number(v) == name) {
        name.to_string()
    } else {
        quote_string(name)
    }
}

#[cfg(test)]
#[path = "tests/printer_tests.rs"]
mod tests;
