//! Filesystem corpus loader.
//!
//! Scans a directory of YAML rule files in lexical filename order. A file
//! that fails to parse is skipped with a warning and does not abort the
//! scan, so one malformed file cannot take the whole corpus down.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::schema::{DetectionRule, RuleDocument};

/// Errors that can occur reading the corpus directory itself.
///
/// Per-file parse failures are not errors; they are skipped during the scan.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// The corpus directory could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for corpus operations.
pub type Result<T> = std::result::Result<T, RuleError>;

/// The full set of loaded rules, in file-then-document order.
///
/// Immutable once loaded; reload by constructing a fresh corpus. The caller
/// owns the handle; there is no process-global cache.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    rules: Vec<DetectionRule>,
}

impl Corpus {
    /// Scan `dir` and load every YAML rule file in sorted filename order.
    ///
    /// Dotfiles, directories, and non-YAML extensions are skipped.
    /// Unparsable files are skipped with a warning.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| is_rule_file(path))
            .collect();
        paths.sort();

        let mut rules = Vec::new();
        for path in &paths {
            match load_file(path) {
                Ok(mut file_rules) => {
                    debug!(path = %path.display(), count = file_rules.len(), "loaded rule file");
                    rules.append(&mut file_rules);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unparsable rule file");
                }
            }
        }

        Ok(Self { rules })
    }

    /// All loaded rules, in scan order.
    pub fn rules(&self) -> &[DetectionRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn is_rule_file(path: &Path) -> bool {
    if path.is_dir() {
        return false;
    }
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        if name.starts_with('.') {
            return false;
        }
    }
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "yml" || e == "yaml")
        .unwrap_or(false)
}

fn load_file(path: &Path) -> std::result::Result<Vec<DetectionRule>, String> {
    let contents = fs::read_to_string(path).map_err(|e| e.to_string())?;
    let doc: RuleDocument = serde_yaml::from_str(&contents).map_err(|e| e.to_string())?;
    Ok(doc.into_rules())
}
