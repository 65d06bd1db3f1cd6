//! Reverse mapped types: inferring `T` from a source matched against
//! `{ [P in keyof T]: X<T[P]> }`.
//!
//! The reversed object is created lazily. Each property re-infers its type
//! from the corresponding source property the first time it is read.

use std::rc::Rc;

use tracing::trace;
use tyck_binder::{SymbolId, SymbolTable, symbol_flags};
use tyck_types::{
    AccessFlags, ElementFlags, IndexInfo, ObjectFlags, ObjectKind, ObjectType, ReverseMappedType, StructuredMembers,
    TypeData, TypeFlags, TypeId,
};

use super::{InferenceFlags, InferencePriority};
use crate::state::CheckerState;
use crate::symbols::links::CheckFlags;
use crate::types::MappedTypeModifiers;

impl<'a> CheckerState<'a> {
    /// `T` such that mapping it through `mapped` gives back `source`.
    /// `None` when the source has neither properties nor a string index.
    pub(crate) fn infer_type_for_homomorphic_mapped_type(
        &mut self,
        source: TypeId,
        mapped: TypeId,
        constraint: TypeId,
    ) -> Option<TypeId> {
        let key = (source, mapped, constraint);
        if let Some(&cached) = self.ctx.reverse_mapped_types.get(&key) {
            return cached;
        }
        // Placeholder so a re-entrant request sees "not reversible".
        self.ctx.reverse_mapped_types.insert(key, None);
        let result = self.create_reverse_mapped_type(source, mapped, constraint);
        self.ctx.reverse_mapped_types.insert(key, result);
        result
    }

    fn create_reverse_mapped_type(&mut self, source: TypeId, mapped: TypeId, constraint: TypeId) -> Option<TypeId> {
        let has_string_index = self.get_index_info_of_type(source, TypeId::STRING).is_some();
        if !has_string_index && (self.get_properties_of_type(source).is_empty() || !self.is_partially_inferable_type(source))
        {
            return None;
        }
        if self.is_array_type(source) {
            let element = self.get_type_arguments(source).first().copied()?;
            let element = self.infer_reverse_mapped_type(element, mapped, constraint);
            let readonly = self.is_readonly_array_type(source);
            return Some(self.create_array_type(element, readonly));
        }
        if self.is_tuple_type(source) {
            let info = self.tuple_target_info(source)?;
            let mut elements = Vec::new();
            for element in self.get_element_types(source) {
                elements.push(self.infer_reverse_mapped_type(element, mapped, constraint));
            }
            let flags: Vec<ElementFlags> = if self
                .get_mapped_type_modifiers(mapped)
                .contains(MappedTypeModifiers::INCLUDE_OPTIONAL)
            {
                info.element_flags
                    .iter()
                    .map(|&f| if f.contains(ElementFlags::OPTIONAL) { ElementFlags::REQUIRED } else { f })
                    .collect()
            } else {
                info.element_flags.clone()
            };
            let labels = info.labeled_declarations.as_deref().unwrap_or(&[]);
            return Some(self.create_tuple_type(&elements, Some(&flags), info.readonly, labels));
        }
        let reversed = self.ctx.types.alloc(
            TypeFlags::OBJECT,
            ObjectFlags::REVERSE_MAPPED | ObjectFlags::ANONYMOUS,
            SymbolId::NONE,
            TypeData::Object(ObjectType {
                kind: ObjectKind::ReverseMapped(ReverseMappedType {
                    source,
                    mapped_type: mapped,
                    constraint_type: constraint,
                }),
                members: None,
            }),
        );
        trace!(source = source.0, mapped = mapped.0, reversed = reversed.0, "reverse mapped type");
        Some(reversed)
    }

    /// A source whose inference is at least partly usable: not marked
    /// non-inferrable, or an object literal with an inferable property.
    fn is_partially_inferable_type(&mut self, t: TypeId) -> bool {
        if !self.object_flags(t).contains(ObjectFlags::NON_INFERRABLE_TYPE) {
            return true;
        }
        if self.object_flags(t).contains(ObjectFlags::OBJECT_LITERAL) {
            for property in self.get_properties_of_type(t) {
                let property_type = self.get_type_of_symbol(property);
                if self.is_partially_inferable_type(property_type) {
                    return true;
                }
            }
            return false;
        }
        if self.is_tuple_type(t) {
            for element in self.get_element_types(t) {
                if self.is_partially_inferable_type(element) {
                    return true;
                }
            }
        }
        false
    }

    /// Infer `T[P]` from one source property type against the template.
    fn infer_reverse_mapped_type(&mut self, source: TypeId, mapped: TypeId, constraint: TypeId) -> TypeId {
        let TypeData::Index(index) = &self.ty(constraint).data else {
            return TypeId::UNKNOWN;
        };
        let operand = index.target;
        let parameter = self.get_type_parameter_from_mapped_type(mapped);
        let type_parameter =
            self.get_indexed_access_type(operand, parameter, AccessFlags::empty(), tyck_binder::NodeIndex::NONE, None);
        let template = self.get_template_type_from_mapped_type(mapped);
        let context = self.create_inference_context(&[type_parameter], None, InferenceFlags::empty());
        self.infer_types(context, source, template, InferencePriority::empty());
        let info = self.inference_context(context).infos[0].clone();
        self.get_type_from_inference(&info).unwrap_or(TypeId::UNKNOWN)
    }

    /// Properties mirror the source; their types are inferred on demand.
    pub(crate) fn resolve_reverse_mapped_type_members(&mut self, t: TypeId) -> Rc<StructuredMembers> {
        let Some(ObjectKind::ReverseMapped(reverse)) = self.ty(t).as_object().map(|o| o.kind.clone()) else {
            return StructuredMembers::empty();
        };
        let modifiers = self.get_mapped_type_modifiers(reverse.mapped_type);
        let keep_readonly = !modifiers.contains(MappedTypeModifiers::INCLUDE_READONLY);
        let optional_mask = if modifiers.contains(MappedTypeModifiers::INCLUDE_OPTIONAL) {
            0
        } else {
            symbol_flags::OPTIONAL
        };

        let mut index_infos = Vec::new();
        if let Some(info) = self.get_index_info_of_type(reverse.source, TypeId::STRING) {
            let value_type = self.infer_reverse_mapped_type(info.value_type, reverse.mapped_type, reverse.constraint_type);
            index_infos.push(IndexInfo {
                key_type: TypeId::STRING,
                value_type,
                is_readonly: keep_readonly && info.is_readonly,
                declaration: info.declaration,
            });
        }

        let mut members = SymbolTable::default();
        for property in self.get_properties_of_type(reverse.source) {
            let name = self.symbol_name(property);
            let flags = symbol_flags::PROPERTY | (self.symbol_flags_raw(property) & optional_mask);
            let mut check_flags = CheckFlags::REVERSE_MAPPED;
            if keep_readonly && self.is_readonly_symbol(property) {
                check_flags |= CheckFlags::READONLY;
            }
            let reversed = self.create_symbol(flags, &name, check_flags);
            let declarations = self.symbol_declarations(property);
            if let Some(created) = self.transient_symbol_mut(reversed) {
                created.declarations = declarations;
            }
            let property_type = self.get_type_of_symbol(property);
            self.links(reversed).reverse_mapped = Some((property_type, reverse.mapped_type, reverse.constraint_type));
            members.insert(name, reversed);
        }
        let properties = members.values().copied().collect();
        Rc::new(StructuredMembers {
            members,
            properties,
            call_signatures: Vec::new(),
            construct_signatures: Vec::new(),
            index_infos,
        })
    }

    pub(crate) fn get_type_of_reverse_mapped_symbol(&mut self, symbol: SymbolId) -> TypeId {
        if let Some(t) = self.links_ref(symbol).and_then(|l| l.type_) {
            return t;
        }
        let Some((property_type, mapped, constraint)) = self.links_ref(symbol).and_then(|l| l.reverse_mapped) else {
            return TypeId::ERROR;
        };
        let t = self.infer_reverse_mapped_type(property_type, mapped, constraint);
        self.links(symbol).type_ = Some(t);
        t
    }
}
