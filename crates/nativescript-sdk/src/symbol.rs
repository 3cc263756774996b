//! Symbol naming convention
//!
//! Every exported function name is a pure function of the type name and,
//! for accessors, the field name. The generator emits these names and the
//! loader looks them up; neither side has a fallback if they drift.

/// Registration entry point every generated module exports.
pub const REGISTRATION_SYMBOL: &str = "getGeneratedScripts";

/// `create<TypeName>`
pub fn create_symbol(type_name: &str) -> String {
    format!("create{}", type_name)
}

/// `destroy<TypeName>`
pub fn destroy_symbol(type_name: &str) -> String {
    format!("destroy{}", type_name)
}

/// `<TypeName>_get_<FieldName>`
pub fn getter_symbol(type_name: &str, field_name: &str) -> String {
    format!("{}_get_{}", type_name, field_name)
}

/// `<TypeName>_set_<FieldName>`
pub fn setter_symbol(type_name: &str, field_name: &str) -> String {
    format!("{}_set_{}", type_name, field_name)
}
