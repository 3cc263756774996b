//! `nsg generate`: scan a project and write the reflection glue.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};

use nativescript_engine::codegen::{REGISTRATION_HEADER, REGISTRATION_SOURCE, SUPPORT_HEADER, SUPPORT_HEADER_NAME};
use nativescript_engine::Project;

use crate::config::{Config, GenerateConfig};
use crate::files::{generated_path, IncludeRewriter, SourceTree};

/// File name of the optional metadata dump
pub const METADATA_JSON: &str = "scripts.metadata.json";

/// Flags for one run. `true` flags override the config file.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Project root to scan
    pub input: PathBuf,
    /// Directory the generated tree is written to
    pub output: PathBuf,
    /// Explicit config file; `<input>/nsg.toml` is used otherwise
    pub config: Option<PathBuf>,
    /// Fail on symbol collisions
    pub deny_collisions: bool,
    /// Do not write `ns.h`
    pub no_support_header: bool,
    /// Write `scripts.metadata.json`
    pub metadata_json: bool,
}

/// What a run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateSummary {
    /// Headers scanned
    pub headers: usize,
    /// Sources copied
    pub sources: usize,
    /// Annotated types found
    pub types: usize,
    /// Fields across all types
    pub fields: usize,
    /// Scan and extraction diagnostics
    pub diagnostics: usize,
    /// Symbol collisions (warned unless denied)
    pub collisions: usize,
    /// Every file written, relative to the output root
    pub written: Vec<PathBuf>,
}

impl fmt::Display for GenerateSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Generated {} type(s) with {} field(s) from {} header(s) and {} source(s); {} file(s) written",
            self.types,
            self.fields,
            self.headers,
            self.sources,
            self.written.len()
        )?;
        if self.diagnostics > 0 {
            write!(f, ", {} diagnostic(s)", self.diagnostics)?;
        }
        if self.collisions > 0 {
            write!(f, ", {} symbol collision(s)", self.collisions)?;
        }
        Ok(())
    }
}

fn resolve_config(options: &GenerateOptions) -> anyhow::Result<GenerateConfig> {
    let config = match &options.config {
        Some(path) => Config::from_file(path).with_context(|| format!("Failed to load {}", path.display()))?,
        None => Config::discover(&options.input)?,
    };

    let mut generate = config.generate;
    if options.deny_collisions {
        generate.deny_collisions = true;
    }
    if options.no_support_header {
        generate.support_header = false;
    }
    if options.metadata_json {
        generate.metadata_json = true;
    }
    Ok(generate)
}

/// Run the generator.
pub fn execute(options: &GenerateOptions) -> anyhow::Result<GenerateSummary> {
    if !options.input.is_dir() {
        bail!("Input directory not found: {}", options.input.display());
    }
    let config = resolve_config(options)?;

    let tree = SourceTree::collect(&options.input, &config, Some(&options.output))?;
    if tree.is_empty() {
        log::warn!("no headers or sources found under {}", options.input.display());
    }
    let rewriter = IncludeRewriter::new(&tree.headers)?;

    let mut project = Project::new();
    let mut outputs: Vec<(PathBuf, String)> = Vec::new();

    for relative in &tree.headers {
        let source = read(&options.input.join(relative))?;
        let label = relative.display().to_string();
        let generated = project.add_header(&label, &source);
        log::info!("{}: {} type(s)", label, generated.types.len());
        outputs.push((generated_path(relative), rewriter.rewrite(&generated.contents)));
    }

    for relative in &tree.sources {
        let source = read(&options.input.join(relative))?;
        outputs.push((generated_path(relative), rewriter.rewrite(&source)));
    }

    let output = project.finish();
    for diagnostic in &output.diagnostics {
        eprintln!("warning: {}", diagnostic);
    }

    if config.deny_collisions && !output.collisions.is_empty() {
        let listed = output
            .collisions
            .iter()
            .map(|c| format!("  {}", c))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("{} symbol collision(s):\n{}", output.collisions.len(), listed);
    }

    outputs.push((PathBuf::from(REGISTRATION_HEADER), output.registration.header));
    outputs.push((PathBuf::from(REGISTRATION_SOURCE), output.registration.source));
    if config.support_header {
        outputs.push((PathBuf::from(SUPPORT_HEADER_NAME), SUPPORT_HEADER.to_string()));
    }
    if config.metadata_json {
        let json = serde_json::to_string_pretty(&output.types).context("Failed to serialize metadata")?;
        outputs.push((PathBuf::from(METADATA_JSON), json + "\n"));
    }

    let mut written = Vec::with_capacity(outputs.len());
    for (relative, contents) in outputs {
        write(&options.output.join(&relative), &contents)?;
        written.push(relative);
    }

    Ok(GenerateSummary {
        headers: tree.headers.len(),
        sources: tree.sources.len(),
        types: output.types.len(),
        fields: output.types.iter().map(|t| t.fields.len()).sum(),
        diagnostics: output.diagnostics.len(),
        collisions: output.collisions.len(),
        written,
    })
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn write(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    log::debug!("writing {}", path.display());
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}
