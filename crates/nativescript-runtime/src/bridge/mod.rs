//! The dynamic bridge: registration table in, typed interfaces out.
//!
//! # Example
//!
//! ```ignore
//! use nativescript_runtime::{LoadOptions, ScriptCollection};
//!
//! let Some(scripts) = ScriptCollection::load("./libgame.so", &LoadOptions::new())? else {
//!     return Ok(()); // not a loadable module
//! };
//!
//! let player = scripts.get("Player").unwrap();
//! let mut instance = player.create()?;
//! instance.set_as(player.field_index("health")?, 80)?;
//! ```

pub mod collection;
pub mod instance;
pub mod interface;
pub mod options;

#[cfg(test)]
pub(crate) mod fixture;

pub use collection::ScriptCollection;
pub use instance::ScriptInstance;
pub use interface::{Accessor, ResolvedField, ScriptInterface};
pub use options::{DuplicatePolicy, LoadOptions, ResolvePolicy};
