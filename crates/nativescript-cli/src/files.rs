//! Input tree walking, output path mirroring and include rewriting.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Context;
use regex::{Captures, Regex};

use crate::config::GenerateConfig;

/// Infix inserted before the extension of every mirrored file
pub const GENERATED_INFIX: &str = "generated";

/// Files found under an input root, relative to it and sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTree {
    /// Files scanned for annotations
    pub headers: Vec<PathBuf>,
    /// Files copied with include rewriting
    pub sources: Vec<PathBuf>,
}

impl SourceTree {
    /// Walk `root`. Dot-directories, directories named in `exclude` and
    /// `skip` (usually the output directory) are not entered.
    pub fn collect(root: &Path, config: &GenerateConfig, skip: Option<&Path>) -> anyhow::Result<Self> {
        let skip = skip.and_then(|p| p.canonicalize().ok());
        let mut tree = SourceTree::default();
        collect_in_dir(root, root, config, skip.as_deref(), &mut tree)
            .with_context(|| format!("Failed to walk {}", root.display()))?;
        tree.headers.sort();
        tree.sources.sort();
        Ok(tree)
    }

    /// Whether nothing was found
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.sources.is_empty()
    }
}

fn collect_in_dir(
    root: &Path,
    dir: &Path,
    config: &GenerateConfig,
    skip: Option<&Path>,
    tree: &mut SourceTree,
) -> anyhow::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if name_str.starts_with('.') || config.exclude.iter().any(|e| e.as_str() == name_str) {
                continue;
            }
            if skip.is_some() && path.canonicalize().ok().as_deref() == skip {
                log::debug!("not walking output directory {}", path.display());
                continue;
            }
            collect_in_dir(root, &path, config, skip, tree)?;
            continue;
        }

        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if is_generated(&path) {
            log::debug!("skipping generated file {}", path.display());
            continue;
        }
        let relative = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
        if config.header_extensions.iter().any(|e| e == ext) {
            tree.headers.push(relative);
        } else if config.source_extensions.iter().any(|e| e == ext) {
            tree.sources.push(relative);
        }
    }
    Ok(())
}

fn is_generated(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| Path::new(s).extension())
        .is_some_and(|infix| infix == GENERATED_INFIX)
}

/// `dir/name.ext` -> `dir/name.generated.ext`
pub fn generated_path(relative: &Path) -> PathBuf {
    let stem = relative.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let name = match relative.extension() {
        Some(ext) => format!("{}.{}.{}", stem, GENERATED_INFIX, ext.to_string_lossy()),
        None => format!("{}.{}", stem, GENERATED_INFIX),
    };
    relative.with_file_name(name)
}

/// Rewrites `#include "x.h"` to `#include "x.generated.h"` for every header
/// the project generates. Other includes are left alone.
#[derive(Debug, Clone)]
pub struct IncludeRewriter {
    pattern: Option<Regex>,
}

impl IncludeRewriter {
    /// Build from the scanned headers (relative paths; only file names matter).
    pub fn new(headers: &[PathBuf]) -> anyhow::Result<Self> {
        let names: BTreeSet<String> = headers
            .iter()
            .filter_map(|h| h.file_name())
            .map(|n| regex::escape(&n.to_string_lossy()))
            .collect();
        if names.is_empty() {
            return Ok(Self { pattern: None });
        }

        let alternatives = names.into_iter().collect::<Vec<_>>().join("|");
        let pattern = Regex::new(&format!(r#"(#\s*include\s*")((?:[^"\n]*/)?)({})(")"#, alternatives))
            .context("Failed to build include pattern")?;
        Ok(Self { pattern: Some(pattern) })
    }

    /// Rewrite one file's text
    pub fn rewrite(&self, text: &str) -> String {
        match &self.pattern {
            Some(pattern) => pattern
                .replace_all(text, |caps: &Captures<'_>| {
                    let renamed = generated_path(Path::new(&caps[3]));
                    format!("{}{}{}{}", &caps[1], &caps[2], renamed.display(), &caps[4])
                })
                .into_owned(),
            None => text.to_string(),
        }
    }
}
