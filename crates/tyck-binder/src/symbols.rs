//! Symbols, symbol tables and symbol flags.

use indexmap::IndexMap;

use crate::NodeIndex;

/// Unique identifier for a symbol.
///
/// Ids below the program's bound symbol count refer to [`SymbolArena`]
/// entries; the checker allocates transient symbols above that range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

impl SymbolId {
    pub const NONE: SymbolId = SymbolId(u32::MAX);

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    pub const fn is_some(self) -> bool {
        self.0 != u32::MAX
    }
}

impl Default for SymbolId {
    fn default() -> Self {
        Self::NONE
    }
}

/// Symbol flags (bit positions match the TypeScript compiler).
pub mod symbol_flags {
    pub const NONE: u32 = 0;
    pub const FUNCTION_SCOPED_VARIABLE: u32 = 1 << 0;
    pub const BLOCK_SCOPED_VARIABLE: u32 = 1 << 1;
    pub const PROPERTY: u32 = 1 << 2;
    pub const ENUM_MEMBER: u32 = 1 << 3;
    pub const FUNCTION: u32 = 1 << 4;
    pub const CLASS: u32 = 1 << 5;
    pub const INTERFACE: u32 = 1 << 6;
    pub const CONST_ENUM: u32 = 1 << 7;
    pub const REGULAR_ENUM: u32 = 1 << 8;
    pub const VALUE_MODULE: u32 = 1 << 9;
    pub const NAMESPACE_MODULE: u32 = 1 << 10;
    pub const TYPE_LITERAL: u32 = 1 << 11;
    pub const OBJECT_LITERAL: u32 = 1 << 12;
    pub const METHOD: u32 = 1 << 13;
    pub const CONSTRUCTOR: u32 = 1 << 14;
    pub const GET_ACCESSOR: u32 = 1 << 15;
    pub const SET_ACCESSOR: u32 = 1 << 16;
    pub const SIGNATURE: u32 = 1 << 17;
    pub const TYPE_PARAMETER: u32 = 1 << 18;
    pub const TYPE_ALIAS: u32 = 1 << 19;
    pub const EXPORT_VALUE: u32 = 1 << 20;
    pub const ALIAS: u32 = 1 << 21;
    pub const PROTOTYPE: u32 = 1 << 22;
    pub const EXPORT_STAR: u32 = 1 << 23;
    pub const OPTIONAL: u32 = 1 << 24;
    pub const TRANSIENT: u32 = 1 << 25;
    pub const ASSIGNMENT: u32 = 1 << 26;
    pub const MODULE_EXPORTS: u32 = 1 << 27;
    pub const ALL: u32 = (1 << 28) - 1;

    pub const ENUM: u32 = REGULAR_ENUM | CONST_ENUM;
    pub const VARIABLE: u32 = FUNCTION_SCOPED_VARIABLE | BLOCK_SCOPED_VARIABLE;
    pub const VALUE: u32 = VARIABLE
        | PROPERTY
        | ENUM_MEMBER
        | OBJECT_LITERAL
        | FUNCTION
        | CLASS
        | ENUM
        | VALUE_MODULE
        | METHOD
        | GET_ACCESSOR
        | SET_ACCESSOR;
    pub const TYPE: u32 =
        CLASS | INTERFACE | ENUM | ENUM_MEMBER | TYPE_LITERAL | TYPE_PARAMETER | TYPE_ALIAS;
    pub const NAMESPACE: u32 = VALUE_MODULE | NAMESPACE_MODULE | ENUM;
    pub const MODULE: u32 = VALUE_MODULE | NAMESPACE_MODULE;
    pub const ACCESSOR: u32 = GET_ACCESSOR | SET_ACCESSOR;

    // Flags a declaration of a given kind may not merge with.
    pub const FUNCTION_SCOPED_VARIABLE_EXCLUDES: u32 = VALUE & !FUNCTION_SCOPED_VARIABLE;
    pub const BLOCK_SCOPED_VARIABLE_EXCLUDES: u32 = VALUE;
    pub const PARAMETER_EXCLUDES: u32 = VALUE;
    pub const PROPERTY_EXCLUDES: u32 = NONE;
    pub const ENUM_MEMBER_EXCLUDES: u32 = VALUE | TYPE;
    pub const FUNCTION_EXCLUDES: u32 = VALUE & !(FUNCTION | VALUE_MODULE | CLASS);
    pub const CLASS_EXCLUDES: u32 = (VALUE | TYPE) & !(VALUE_MODULE | INTERFACE | FUNCTION);
    pub const INTERFACE_EXCLUDES: u32 = TYPE & !(INTERFACE | CLASS);
    pub const REGULAR_ENUM_EXCLUDES: u32 = (VALUE | TYPE) & !(REGULAR_ENUM | VALUE_MODULE);
    pub const CONST_ENUM_EXCLUDES: u32 = (VALUE | TYPE) & !CONST_ENUM;
    pub const VALUE_MODULE_EXCLUDES: u32 = VALUE & !(FUNCTION | CLASS | REGULAR_ENUM | VALUE_MODULE);
    pub const NAMESPACE_MODULE_EXCLUDES: u32 = NONE;
    pub const METHOD_EXCLUDES: u32 = VALUE & !METHOD;
    pub const GET_ACCESSOR_EXCLUDES: u32 = VALUE & !SET_ACCESSOR;
    pub const SET_ACCESSOR_EXCLUDES: u32 = VALUE & !GET_ACCESSOR;
    pub const TYPE_PARAMETER_EXCLUDES: u32 = TYPE & !TYPE_PARAMETER;
    pub const TYPE_ALIAS_EXCLUDES: u32 = TYPE;
    pub const ALIAS_EXCLUDES: u32 = ALIAS;

    /// Containers whose members may be added after binding.
    pub const LATE_BINDING_CONTAINER: u32 =
        CLASS | INTERFACE | TYPE_LITERAL | OBJECT_LITERAL | FUNCTION;

    /// Union of the exclusion sets of every kind present in `flags`.
    pub const fn get_excluded_symbol_flags(flags: u32) -> u32 {
        let mut result = NONE;
        if flags & BLOCK_SCOPED_VARIABLE != 0 {
            result |= BLOCK_SCOPED_VARIABLE_EXCLUDES;
        }
        if flags & FUNCTION_SCOPED_VARIABLE != 0 {
            result |= FUNCTION_SCOPED_VARIABLE_EXCLUDES;
        }
        if flags & PROPERTY != 0 {
            result |= PROPERTY_EXCLUDES;
        }
        if flags & ENUM_MEMBER != 0 {
            result |= ENUM_MEMBER_EXCLUDES;
        }
        if flags & FUNCTION != 0 {
            result |= FUNCTION_EXCLUDES;
        }
        if flags & CLASS != 0 {
            result |= CLASS_EXCLUDES;
        }
        if flags & INTERFACE != 0 {
            result |= INTERFACE_EXCLUDES;
        }
        if flags & REGULAR_ENUM != 0 {
            result |= REGULAR_ENUM_EXCLUDES;
        }
        if flags & CONST_ENUM != 0 {
            result |= CONST_ENUM_EXCLUDES;
        }
        if flags & VALUE_MODULE != 0 {
            result |= VALUE_MODULE_EXCLUDES;
        }
        if flags & METHOD != 0 {
            result |= METHOD_EXCLUDES;
        }
        if flags & GET_ACCESSOR != 0 {
            result |= GET_ACCESSOR_EXCLUDES;
        }
        if flags & SET_ACCESSOR != 0 {
            result |= SET_ACCESSOR_EXCLUDES;
        }
        if flags & TYPE_PARAMETER != 0 {
            result |= TYPE_PARAMETER_EXCLUDES;
        }
        if flags & TYPE_ALIAS != 0 {
            result |= TYPE_ALIAS_EXCLUDES;
        }
        if flags & ALIAS != 0 {
            result |= ALIAS_EXCLUDES;
        }
        result
    }
}

/// Reserved member names for signatures and special exports.
pub mod internal_names {
    pub const CALL: &str = "__call";
    pub const NEW: &str = "__new";
    pub const INDEX: &str = "__index";
    pub const CONSTRUCTOR: &str = "__constructor";
    pub const EXPORT_STAR: &str = "__export";
    pub const EXPORT_EQUALS: &str = "export=";
    pub const DEFAULT: &str = "default";
    pub const TYPE: &str = "__type";
    pub const OBJECT: &str = "__object";
    pub const FUNCTION: &str = "__function";
    pub const GLOBAL: &str = "__global";
    pub const MISSING: &str = "__missing";
    pub const THIS: &str = "this";

    /// Names that never surface as properties.
    pub fn is_reserved_member_name(name: &str) -> bool {
        name.starts_with("__") && !name.starts_with("___")
    }
}

/// Ordered name-to-symbol table.
pub type SymbolTable = IndexMap<String, SymbolId>;

/// A named program entity.
#[derive(Clone, Debug)]
pub struct Symbol {
    pub id: SymbolId,
    pub flags: u32,
    pub escaped_name: String,
    pub declarations: Vec<NodeIndex>,
    pub value_declaration: NodeIndex,
    /// Non-owning link to the containing symbol.
    pub parent: SymbolId,
    pub members: Option<SymbolTable>,
    pub exports: Option<SymbolTable>,
    /// Set on aliases introduced by `import type` / `export type`.
    pub is_type_only: bool,
}

impl Symbol {
    pub fn new(id: SymbolId, flags: u32, escaped_name: String) -> Self {
        Self {
            id,
            flags,
            escaped_name,
            declarations: Vec::new(),
            value_declaration: NodeIndex::NONE,
            parent: SymbolId::NONE,
            members: None,
            exports: None,
            is_type_only: false,
        }
    }

    #[inline]
    pub fn has_any_flags(&self, flags: u32) -> bool {
        self.flags & flags != 0
    }

    /// First declaration, or NONE for synthetic symbols.
    pub fn first_declaration(&self) -> NodeIndex {
        self.declarations.first().copied().unwrap_or(NodeIndex::NONE)
    }
}

/// Arena owning every bound symbol of a program.
#[derive(Clone, Debug, Default)]
pub struct SymbolArena {
    symbols: Vec<Symbol>,
}

impl SymbolArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, flags: u32, escaped_name: String) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(Symbol::new(id, flags, escaped_name));
        id
    }

    #[inline]
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0 as usize)
    }

    #[inline]
    pub fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(id.0 as usize)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }
}
