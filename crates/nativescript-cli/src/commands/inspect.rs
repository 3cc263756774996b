//! `nsg inspect`: load a compiled module through the bridge and list what it
//! registers.

use std::fmt::Write as _;
use std::path::PathBuf;

use serde::Serialize;

use nativescript_runtime::{DuplicatePolicy, LoadOptions, ResolvePolicy, ScriptCollection, SymbolSource};
use nativescript_sdk::TypeInfo;

/// Flags for one run.
#[derive(Debug, Clone, Default)]
pub struct InspectOptions {
    /// Path to the compiled shared module
    pub module: PathBuf,
    /// Print JSON instead of text
    pub json: bool,
    /// Let a later registration replace an earlier one of the same name
    pub overwrite_duplicates: bool,
    /// Skip types whose symbols cannot be resolved
    pub skip_broken: bool,
}

impl InspectOptions {
    /// Bridge options for these flags
    pub fn load_options(&self) -> LoadOptions {
        let mut options = LoadOptions::new();
        if self.overwrite_duplicates {
            options = options.duplicates(DuplicatePolicy::Overwrite);
        }
        if self.skip_broken {
            options = options.unresolved(ResolvePolicy::SkipBroken);
        }
        options
    }
}

/// Everything a module registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectReport {
    /// Module path as given
    pub module: String,
    /// Resolved types in registration order
    pub types: Vec<TypeInfo>,
    /// Why each skipped type was left out
    pub skipped: Vec<String>,
}

impl InspectReport {
    /// Snapshot a resolved collection
    pub fn from_collection<S: SymbolSource>(collection: &ScriptCollection<S>) -> Self {
        Self {
            module: collection.module().name().to_string(),
            types: collection.iter().map(|s| s.info().clone()).collect(),
            skipped: collection.skipped().iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Human-readable listing
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}: {} type(s)", self.module, self.types.len());
        for info in &self.types {
            let _ = writeln!(out, "\n{} ({} / {})", info.name, info.create, info.destroy);
            for field in &info.fields {
                let _ = writeln!(
                    out,
                    "  {} {}  [{}, {}]",
                    field.ty, field.name, field.getter, field.setter
                );
            }
            for method in &info.methods {
                let params = method
                    .parameters
                    .iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                let _ = writeln!(out, "  {} {}({})  [not callable]", method.return_type, method.name, params);
            }
        }
        if !self.skipped.is_empty() {
            let _ = writeln!(out, "\nskipped:");
            for reason in &self.skipped {
                let _ = writeln!(out, "  {}", reason);
            }
        }
        out
    }

    /// Pretty JSON
    pub fn render_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Load the module. `Ok(None)` when it cannot be opened.
pub fn execute(options: &InspectOptions) -> anyhow::Result<Option<InspectReport>> {
    let Some(collection) = ScriptCollection::load(&options.module, &options.load_options())? else {
        return Ok(None);
    };
    Ok(Some(InspectReport::from_collection(&collection)))
}
