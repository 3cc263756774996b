//! Library half of the `nsg` tool.
//!
//! - `nsg generate`: mirror an annotated C++ project with reflection glue
//! - `nsg inspect`: list what a compiled module registers

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod commands;
pub mod config;
pub mod files;
pub mod logging;
