//! nativescript runtime - the dynamic bridge
//!
//! Loads a compiled module produced from generated glue, reads its
//! registration table and resolves every exported function it names:
//! - **FFI**: shared library loading and in-process symbol tables (`ffi` module)
//! - **Bridge**: script collections, typed interfaces, live instances (`bridge` module)
//!
//! Every address handed out is only reachable through a borrow of the
//! [`ScriptCollection`] that owns the module.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod bridge;
pub mod error;
pub mod ffi;

pub use bridge::{
    Accessor, DuplicatePolicy, LoadOptions, ResolvePolicy, ResolvedField, ScriptCollection, ScriptInstance,
    ScriptInterface,
};
pub use error::{BridgeError, BridgeResult};
pub use ffi::{Library, LoadError, StaticModule, SymbolSource};
