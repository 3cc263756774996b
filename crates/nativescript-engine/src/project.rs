//! In-memory project driver.
//!
//! Headers are fed one at a time; each yields its generated text right away
//! while its types accumulate for the registration artifact. File IO is the
//! caller's job.

use std::fmt;

use nativescript_sdk::TypeInfo;

use crate::codegen::{find_collisions, render_header_glue, render_registration, Registration, SymbolCollision};
use crate::parser::{extract_source, Diagnostic};

/// A diagnostic tagged with the file it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiagnostic {
    /// Label the file was added under
    pub file: String,
    /// The diagnostic
    pub diagnostic: Diagnostic,
}

impl fmt::Display for FileDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.file, self.diagnostic.span(), self.diagnostic)
    }
}

/// Output for one header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedHeader {
    /// Original text followed by the generated glue
    pub contents: String,
    /// Types declared in this header
    pub types: Vec<TypeInfo>,
    /// Number of diagnostics this header produced
    pub diagnostic_count: usize,
}

/// Output for the whole project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectOutput {
    /// `scripts.generated.h` / `scripts.generated.cpp`
    pub registration: Registration,
    /// Every type, in the order headers were added
    pub types: Vec<TypeInfo>,
    /// Symbols the glue would define more than once
    pub collisions: Vec<SymbolCollision>,
    /// Every diagnostic, in the order headers were added
    pub diagnostics: Vec<FileDiagnostic>,
}

/// Accumulates headers and produces the registration artifact.
#[derive(Debug, Default)]
pub struct Project {
    types: Vec<TypeInfo>,
    diagnostics: Vec<FileDiagnostic>,
}

impl Project {
    /// Create an empty project
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan, extract and render one header.
    pub fn add_header(&mut self, label: &str, source: &str) -> GeneratedHeader {
        let metadata = extract_source(source);
        log::debug!(
            "{}: {} annotated type(s), {} diagnostic(s)",
            label,
            metadata.types.len(),
            metadata.diagnostics.len()
        );

        let contents = render_header_glue(source, &metadata.types);
        let diagnostic_count = metadata.diagnostics.len();
        self.diagnostics
            .extend(metadata.diagnostics.into_iter().map(|diagnostic| FileDiagnostic {
                file: label.to_string(),
                diagnostic,
            }));
        self.types.extend(metadata.types.iter().cloned());

        GeneratedHeader {
            contents,
            types: metadata.types,
            diagnostic_count,
        }
    }

    /// Types collected so far
    pub fn types(&self) -> &[TypeInfo] {
        &self.types
    }

    /// Render the registration artifact and run the collision check.
    pub fn finish(self) -> ProjectOutput {
        let registration = render_registration(&self.types);
        let collisions = find_collisions(&self.types);
        for collision in &collisions {
            log::warn!("{}", collision);
        }

        ProjectOutput {
            registration,
            types: self.types,
            collisions,
            diagnostics: self.diagnostics,
        }
    }
}
