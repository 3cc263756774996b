//! Subcommands of `nsg`.

pub mod generate;
pub mod inspect;

pub use generate::{GenerateOptions, GenerateSummary};
pub use inspect::{InspectOptions, InspectReport};
