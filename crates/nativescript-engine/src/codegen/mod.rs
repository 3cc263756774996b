//! Code generation: per-file C++ glue, the project-wide registration
//! artifact, the support header and symbol collision checks.

pub mod collision;
pub mod cpp;

pub use collision::{find_collisions, SymbolCollision};
pub use cpp::{render_header_glue, render_registration, SUPPORT_HEADER};

/// File name of the generated registration header
pub const REGISTRATION_HEADER: &str = "scripts.generated.h";

/// File name of the generated registration source
pub const REGISTRATION_SOURCE: &str = "scripts.generated.cpp";

/// File name of the support header
pub const SUPPORT_HEADER_NAME: &str = "ns.h";

/// The project-wide registration artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Contents of [`REGISTRATION_HEADER`]
    pub header: String,
    /// Contents of [`REGISTRATION_SOURCE`]
    pub source: String,
}
