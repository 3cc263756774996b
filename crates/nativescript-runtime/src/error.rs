//! Bridge error types

use nativescript_sdk::FieldType;

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Errors raised while resolving a module or using its interfaces
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    /// The module does not export the registration entry point
    #[error("Module {module} does not export {symbol}")]
    MissingEntryPoint {
        /// Module name
        module: String,
        /// Entry point symbol
        symbol: String,
    },

    /// A symbol named in the registration table is not exported
    #[error("Type {type_name}: symbol {symbol} not found")]
    MissingSymbol {
        /// Type whose symbol failed to resolve
        type_name: String,
        /// Symbol name
        symbol: String,
    },

    /// A field has no accessors because its type is not a supported scalar
    #[error("Type {type_name}: field {field} has unsupported type {field_type}")]
    UnsupportedField {
        /// Owning type
        type_name: String,
        /// Field name
        field: String,
        /// Declared type tag
        field_type: FieldType,
    },

    /// Two registration entries share a type name
    #[error("Duplicate type name: {type_name}")]
    DuplicateType {
        /// Type name
        type_name: String,
    },

    /// The registration table is malformed
    #[error("Invalid registration table: {0}")]
    InvalidMetadata(String),

    /// Field index out of range
    #[error("Type {type_name} has no field at index {index}")]
    FieldIndex {
        /// Type name
        type_name: String,
        /// Requested index
        index: usize,
    },

    /// No field with this name
    #[error("Type {type_name} has no field named {field}")]
    UnknownField {
        /// Type name
        type_name: String,
        /// Requested field name
        field: String,
    },

    /// A value of the wrong scalar kind was passed or requested
    #[error("Type {type_name}: field {field} is {expected}, not {found}")]
    TypeMismatch {
        /// Type name
        type_name: String,
        /// Field name
        field: String,
        /// Declared field type
        expected: FieldType,
        /// Kind used by the caller
        found: FieldType,
    },

    /// The creation function returned null
    #[error("Type {type_name}: creation function returned null")]
    CreateFailed {
        /// Type name
        type_name: String,
    },
}

impl BridgeError {
    /// The type this error is about, if any
    pub fn type_name(&self) -> Option<&str> {
        match self {
            BridgeError::MissingSymbol { type_name, .. }
            | BridgeError::UnsupportedField { type_name, .. }
            | BridgeError::DuplicateType { type_name }
            | BridgeError::FieldIndex { type_name, .. }
            | BridgeError::UnknownField { type_name, .. }
            | BridgeError::TypeMismatch { type_name, .. }
            | BridgeError::CreateFailed { type_name } => Some(type_name),
            BridgeError::MissingEntryPoint { .. } | BridgeError::InvalidMetadata(_) => None,
        }
    }
}
