//! Diagnostic message table.
//!
//! Codes and templates match the TypeScript compiler so that output can be
//! compared against `tsc` baselines.

use super::{DiagnosticCategory, DiagnosticMessage};

macro_rules! diagnostics {
    ($( $name:ident = $code:literal, $category:ident, $message:literal; )*) => {
        pub mod diagnostic_codes {
            $( pub const $name: u32 = $code; )*
        }

        pub mod diagnostic_messages {
            $( pub const $name: &str = $message; )*
        }

        pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
            $( DiagnosticMessage {
                code: $code,
                category: DiagnosticCategory::$category,
                message: $message,
            }, )*
        ];
    };
}

diagnostics! {
    MODULE_HAS_NO_DEFAULT_EXPORT = 1192, Error, "Module '{0}' has no default export.";
    DUPLICATE_IDENTIFIER = 2300, Error, "Duplicate identifier '{0}'.";
    CIRCULAR_DEFINITION_OF_IMPORT_ALIAS = 2303, Error, "Circular definition of import alias '{0}'.";
    CANNOT_FIND_NAME = 2304, Error, "Cannot find name '{0}'.";
    MODULE_HAS_NO_EXPORTED_MEMBER = 2305, Error, "Module '{0}' has no exported member '{1}'.";
    FILE_IS_NOT_A_MODULE = 2306, Error, "File '{0}' is not a module.";
    CANNOT_FIND_MODULE = 2307, Error, "Cannot find module '{0}' or its corresponding type declarations.";
    MODULE_HAS_ALREADY_EXPORTED_MEMBER = 2308, Error, "Module {0} has already exported a member named '{1}'. Consider explicitly re-exporting to resolve the ambiguity.";
    TYPE_RECURSIVELY_REFERENCES_ITSELF_AS_BASE = 2310, Error, "Type '{0}' recursively references itself as a base type.";
    INTERFACE_CAN_ONLY_EXTEND_OBJECT_TYPE = 2312, Error, "An interface can only extend an object type or intersection of object types with statically known members.";
    TYPE_PARAMETER_HAS_CIRCULAR_CONSTRAINT = 2313, Error, "Type parameter '{0}' has a circular constraint.";
    GENERIC_TYPE_REQUIRES_TYPE_ARGUMENTS = 2314, Error, "Generic type '{0}' requires {1} type argument(s).";
    TYPE_IS_NOT_GENERIC = 2315, Error, "Type '{0}' is not generic.";
    TYPE_NOT_ASSIGNABLE = 2322, Error, "Type '{0}' is not assignable to type '{1}'.";
    PROPERTY_DOES_NOT_EXIST = 2339, Error, "Property '{0}' does not exist on type '{1}'.";
    TYPE_DOES_NOT_SATISFY_CONSTRAINT = 2344, Error, "Type '{0}' does not satisfy the constraint '{1}'.";
    ARGUMENT_NOT_ASSIGNABLE = 2345, Error, "Argument of type '{0}' is not assignable to parameter of type '{1}'.";
    EXPRESSION_NOT_CALLABLE = 2349, Error, "This expression is not callable.";
    EXPRESSION_NOT_CONSTRUCTABLE = 2351, Error, "This expression is not constructable.";
    CONVERSION_MAY_BE_A_MISTAKE = 2352, Error, "Conversion of type '{0}' to type '{1}' may be a mistake because neither type sufficiently overlaps with the other. If this was intentional, convert the expression to 'unknown' first.";
    CANNOT_REDECLARE_BLOCK_SCOPED_VARIABLE = 2451, Error, "Cannot redeclare block-scoped variable '{0}'.";
    TYPE_ALIAS_CIRCULARLY_REFERENCES_ITSELF = 2456, Error, "Type alias '{0}' circularly references itself.";
    TUPLE_INDEX_OUT_OF_BOUNDS = 2493, Error, "Tuple type '{0}' of length '{1}' has no element at index '{2}'.";
    REFERENCED_IN_OWN_TYPE_ANNOTATION = 2502, Error, "'{0}' is referenced directly or indirectly in its own type annotation.";
    CANNOT_FIND_NAMESPACE = 2503, Error, "Cannot find namespace '{0}'.";
    REFERENCED_IN_OWN_BASE_EXPRESSION = 2506, Error, "'{0}' is referenced directly or indirectly in its own base expression.";
    TYPE_IS_NOT_A_CONSTRUCTOR_FUNCTION_TYPE = 2507, Error, "Type '{0}' is not a constructor function type.";
    BASE_CONSTRUCTOR_RETURN_TYPE_NOT_OBJECT = 2509, Error, "Base constructor return type '{0}' is not an object type or intersection of object types with statically known members.";
    TYPE_CANNOT_BE_USED_TO_INDEX_TYPE = 2536, Error, "Type '{0}' cannot be used to index type '{1}'.";
    TYPE_CANNOT_BE_USED_AS_INDEX_TYPE = 2538, Error, "Type '{0}' cannot be used as an index type.";
    PROPERTY_DOES_NOT_EXIST_DID_YOU_MEAN = 2551, Error, "Property '{0}' does not exist on type '{1}'. Did you mean '{2}'?";
    CANNOT_FIND_NAME_DID_YOU_MEAN = 2552, Error, "Cannot find name '{0}'. Did you mean '{1}'?";
    EXPECTED_ARGUMENTS = 2554, Error, "Expected {0} arguments, but got {1}.";
    EXPECTED_AT_LEAST_ARGUMENTS = 2555, Error, "Expected at least {0} arguments, but got {1}.";
    EXPECTED_TYPE_ARGUMENTS = 2558, Error, "Expected {0} type arguments, but got {1}.";
    ENUM_DECLARATIONS_CAN_ONLY_MERGE = 2567, Error, "Enum declarations can only merge with namespace or other enum declarations.";
    RETURN_TYPE_ANNOTATION_CIRCULARLY_REFERENCES_ITSELF = 2577, Error, "Return type annotation circularly references itself.";
    TYPE_INSTANTIATION_EXCESSIVELY_DEEP = 2589, Error, "Type instantiation is excessively deep and possibly infinite.";
    UNION_TYPE_TOO_COMPLEX = 2590, Error, "Expression produces a union type that is too complex to represent.";
    TYPE_OF_PROPERTY_CIRCULARLY_REFERENCES_ITSELF_IN_MAPPED_TYPE = 2615, Error, "Type of property '{0}' circularly references itself in mapped type '{1}'.";
    INVALID_MODULE_NAME_IN_AUGMENTATION = 2664, Error, "Invalid module name in augmentation, module '{0}' cannot be found.";
    CANNOT_AUGMENT_MODULE_WITH_VALUE_EXPORTS = 2671, Error, "Cannot augment module '{0}' with value exports because it resolves to a non-module entity.";
    ONLY_REFERS_TO_A_TYPE = 2693, Error, "'{0}' only refers to a type, but is being used as a value here.";
    NAMESPACE_HAS_NO_EXPORTED_MEMBER = 2694, Error, "Namespace '{0}' has no exported member '{1}'.";
    GENERIC_TYPE_REQUIRES_BETWEEN_TYPE_ARGUMENTS = 2707, Error, "Generic type '{0}' requires between {1} and {2} type arguments.";
    CANNOT_USE_NAMESPACE_AS_VALUE = 2708, Error, "Cannot use namespace '{0}' as a value.";
    CANNOT_USE_NAMESPACE_AS_TYPE = 2709, Error, "Cannot use namespace '{0}' as a type.";
    REFERS_TO_A_VALUE_USED_AS_TYPE = 2749, Error, "'{0}' refers to a value, but is being used as a type here. Did you mean 'typeof {0}'?";
    NO_OVERLOAD_MATCHES_THIS_CALL = 2769, Error, "No overload matches this call.";
    TUPLE_TYPE_TOO_LARGE = 2799, Error, "Expression produces a tuple type that is too large to represent.";
    TYPE_ARGUMENTS_CIRCULARLY_REFERENCE_THEMSELVES = 4109, Error, "Type arguments for '{0}' circularly reference themselves.";
    TUPLE_TYPE_ARGUMENTS_CIRCULARLY_REFERENCE_THEMSELVES = 4110, Error, "Tuple type arguments circularly reference themselves.";
    WAS_ALSO_DECLARED_HERE = 6203, Message, "'{0}' was also declared here.";
    AND_HERE = 6204, Message, "and here.";
    VARIABLE_IMPLICITLY_HAS_TYPE = 7005, Error, "Variable '{0}' implicitly has an '{1}' type.";
    PARAMETER_IMPLICITLY_HAS_ANY_TYPE = 7006, Error, "Parameter '{0}' implicitly has an '{1}' type.";
    IMPLICITLY_HAS_TYPE_ANY_CIRCULAR_INITIALIZER = 7022, Error, "'{0}' implicitly has type 'any' because it does not have a type annotation and is referenced directly or indirectly in its own initializer.";
    IMPLICITLY_HAS_RETURN_TYPE_ANY_CIRCULAR = 7023, Error, "'{0}' implicitly has return type 'any' because it does not have a return type annotation and is referenced directly or indirectly in one of its return expressions.";
    ELEMENT_IMPLICITLY_HAS_ANY_TYPE = 7053, Error, "Element implicitly has an 'any' type because expression of type '{0}' can't be used to index type '{1}'.";
}
