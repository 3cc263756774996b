//! nativescript SDK - the protocol shared by the generator and the loader
//!
//! The generator (`nativescript-engine`) and the dynamic bridge
//! (`nativescript-runtime`) never exchange a schema file. What they agree on
//! lives here:
//!
//! - the metadata records ([`TypeInfo`], [`FieldInfo`], [`MethodInfo`])
//! - the scalar type tags ([`FieldType`]) and their wire values
//! - the symbol naming convention ([`symbol`])
//! - the C layout of the registration table ([`abi`])
//!
//! # Example
//!
//! ```ignore
//! use nativescript_sdk::{FieldType, TypeInfo};
//!
//! let mut info = TypeInfo::new("TypeA");
//! info.push_field(FieldType::Int, "health");
//!
//! assert_eq!(info.create, "createTypeA");
//! assert_eq!(info.fields[0].getter, "TypeA_get_health");
//! ```

#![warn(missing_docs)]

pub mod abi;
pub mod error;
pub mod symbol;
pub mod types;
pub mod value;

pub use error::{AbiError, AbiResult};
pub use symbol::REGISTRATION_SYMBOL;
pub use types::{FieldInfo, FieldType, MethodInfo, TypeInfo};
pub use value::{Scalar, ScalarValue, WChar};
