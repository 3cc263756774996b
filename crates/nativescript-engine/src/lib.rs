//! nativescript engine - the build-time half of the reflection bridge
//!
//! - **Parser**: scanner and metadata extractor for annotated C++ headers (`parser` module)
//! - **Codegen**: exported C++ glue and the registration table (`codegen` module)
//! - **Project**: multi-file driver tying the two together (`project` module)
//!
//! # Example
//!
//! ```rust,ignore
//! use nativescript_engine::Project;
//!
//! let mut project = Project::new();
//! let header = project.add_header("player.h", &std::fs::read_to_string("player.h")?);
//! std::fs::write("player.generated.h", header.contents)?;
//!
//! let output = project.finish();
//! std::fs::write("scripts.generated.h", output.registration.header)?;
//! std::fs::write("scripts.generated.cpp", output.registration.source)?;
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// ============================================================================
// Core Modules
// ============================================================================

/// Parser module: tokens, scanner, metadata extractor
pub mod parser;

/// Codegen module: C++ glue, registration artifact, collision checks
pub mod codegen;

/// Project module: accumulates headers into one registration artifact
pub mod project;

// ============================================================================
// Re-exports
// ============================================================================

pub use codegen::{find_collisions, Registration, SymbolCollision};
pub use parser::{extract_source, Diagnostic, SourceMetadata};
pub use project::{FileDiagnostic, GeneratedHeader, Project, ProjectOutput};
