//! Metadata records describing annotated types.
//!
//! These are produced by the extractor, serialized into the registration
//! table by the generator, and reconstructed from that table by the loader.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::symbol;

// ============================================================================
// Field Type
// ============================================================================

/// Scalar type tag of an annotated field.
///
/// This closed set is the whole type system the bridge understands. The
/// discriminants are the wire values written into the registration table.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Declared type text was not one of the recognized scalar keywords
    Unknown = 0,
    /// `int`
    Int = 1,
    /// `char`
    Char = 2,
    /// `bool`
    Bool = 3,
    /// `float`
    Float = 4,
    /// `double`
    Double = 5,
    /// `wchar_t`
    WChar = 6,
    /// `void`
    Void = 7,
}

impl FieldType {
    /// All value kinds that get accessors.
    pub const VALUE_KINDS: [FieldType; 6] = [
        FieldType::Int,
        FieldType::Char,
        FieldType::Bool,
        FieldType::Float,
        FieldType::Double,
        FieldType::WChar,
    ];

    /// Wire tag of this type.
    pub const fn tag(self) -> i32 {
        self as i32
    }

    /// Decode a wire tag. Out-of-range tags decode as [`FieldType::Unknown`].
    pub fn from_tag(tag: i32) -> Self {
        match tag {
            1 => FieldType::Int,
            2 => FieldType::Char,
            3 => FieldType::Bool,
            4 => FieldType::Float,
            5 => FieldType::Double,
            6 => FieldType::WChar,
            7 => FieldType::Void,
            _ => FieldType::Unknown,
        }
    }

    /// Parse declared type text.
    pub fn from_keyword(text: &str) -> Self {
        match text {
            "int" => FieldType::Int,
            "char" => FieldType::Char,
            "bool" => FieldType::Bool,
            "float" => FieldType::Float,
            "double" => FieldType::Double,
            "wchar_t" => FieldType::WChar,
            "void" => FieldType::Void,
            _ => FieldType::Unknown,
        }
    }

    /// C spelling of this type, `None` for [`FieldType::Unknown`].
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            FieldType::Unknown => None,
            FieldType::Int => Some("int"),
            FieldType::Char => Some("char"),
            FieldType::Bool => Some("bool"),
            FieldType::Float => Some("float"),
            FieldType::Double => Some("double"),
            FieldType::WChar => Some("wchar_t"),
            FieldType::Void => Some("void"),
        }
    }

    /// Whether a field of this type can be read and written by value.
    pub fn is_accessible(self) -> bool {
        !matches!(self, FieldType::Unknown | FieldType::Void)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword().unwrap_or("<unknown>"))
    }
}

// ============================================================================
// Field / Method / Type records
// ============================================================================

/// One annotated field of a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    /// Declared scalar type
    #[serde(rename = "type")]
    pub ty: FieldType,
    /// Field name as declared
    pub name: String,
    /// Exported getter symbol
    pub getter: String,
    /// Exported setter symbol
    pub setter: String,
}

impl FieldInfo {
    /// Build a field record, deriving both accessor symbols.
    pub fn new(type_name: &str, ty: FieldType, name: impl Into<String>) -> Self {
        let name = name.into();
        FieldInfo {
            ty,
            getter: symbol::getter_symbol(type_name, &name),
            setter: symbol::setter_symbol(type_name, &name),
            name,
        }
    }
}

/// An annotated method.
///
/// Method reflection is not implemented: the record is part of the table
/// layout, but neither the extractor nor the loader populates or resolves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodInfo {
    /// Method name
    pub name: String,
    /// Parameter types in declaration order
    pub parameters: Vec<FieldType>,
    /// Return type
    pub return_type: FieldType,
}

/// Metadata for one annotated type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    /// Type name
    pub name: String,
    /// Fields in declaration order
    pub fields: Vec<FieldInfo>,
    /// Declared methods (always empty, see [`MethodInfo`])
    #[serde(default)]
    pub methods: Vec<MethodInfo>,
    /// Exported creation symbol
    pub create: String,
    /// Exported destruction symbol
    pub destroy: String,
}

impl TypeInfo {
    /// Create an empty record with derived lifecycle symbols.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        TypeInfo {
            create: symbol::create_symbol(&name),
            destroy: symbol::destroy_symbol(&name),
            name,
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Append a field, deriving its accessor symbols from this type's name.
    pub fn push_field(&mut self, ty: FieldType, name: impl Into<String>) -> &FieldInfo {
        let field = FieldInfo::new(&self.name, ty, name);
        self.fields.push(field);
        &self.fields[self.fields.len() - 1]
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Every symbol the generated glue exports for this type.
    ///
    /// Fields whose type is not accessible export nothing.
    pub fn exported_symbols(&self) -> impl Iterator<Item = &str> + '_ {
        let lifecycle = [self.create.as_str(), self.destroy.as_str()];
        let accessors = self
            .fields
            .iter()
            .filter(|f| f.ty.is_accessible())
            .flat_map(|f| [f.getter.as_str(), f.setter.as_str()]);
        lifecycle.into_iter().chain(accessors)
    }
}
