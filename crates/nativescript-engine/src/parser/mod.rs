//! Scanner and metadata extractor for annotated headers.
//!
//! # Example
//!
//! ```ignore
//! use nativescript_engine::parser::extract_source;
//!
//! let source = r#"
//!     UCLASS()
//!     class TypeA : public Script {
//!         UPROPERTY()
//!         int health = 100;
//!     };
//! "#;
//!
//! let metadata = extract_source(source);
//! assert_eq!(metadata.types[0].fields[0].getter, "TypeA_get_health");
//! ```

pub mod token;
pub mod lexer;
pub mod extract;

pub use token::{Span, Token, TokenKind};
pub use lexer::{scan, Lexer, Scan, ScanDiagnostic};
pub use extract::{extract, ExtractDiagnostic, Extraction};

use nativescript_sdk::TypeInfo;

/// Any diagnostic produced while reading one file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Diagnostic {
    /// Scanner diagnostic
    #[error(transparent)]
    Scan(#[from] ScanDiagnostic),
    /// Extractor diagnostic
    #[error(transparent)]
    Extract(#[from] ExtractDiagnostic),
}

impl Diagnostic {
    /// Get the span of this diagnostic
    pub fn span(&self) -> &Span {
        match self {
            Diagnostic::Scan(d) => d.span(),
            Diagnostic::Extract(d) => d.span(),
        }
    }
}

/// Metadata for one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMetadata {
    /// Annotated types in source order
    pub types: Vec<TypeInfo>,
    /// Scanner diagnostics followed by extractor diagnostics
    pub diagnostics: Vec<Diagnostic>,
}

/// Scan and extract one source file.
pub fn extract_source(source: &str) -> SourceMetadata {
    let scan = scan(source);
    let extraction = extract(&scan.tokens);

    let diagnostics = scan
        .diagnostics
        .into_iter()
        .map(Diagnostic::from)
        .chain(extraction.diagnostics.into_iter().map(Diagnostic::from))
        .collect();

    SourceMetadata {
        types: extraction.types,
        diagnostics,
    }
}
