//! The ATT&CK dataset handle.
//!
//! Loaded once by the host and injected into [`crate::LlmEnrichment`];
//! there is no process-global cache, so tests can hand in fixture data.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("cannot read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("dataset {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// In-memory ATT&CK technique dataset given to the classifier prompt.
#[derive(Debug, Clone)]
pub struct AttackKnowledge {
    data: serde_json::Value,
}

impl AttackKnowledge {
    /// Load the dataset from a JSON file.
    pub fn load(path: &Path) -> Result<Self, KnowledgeError> {
        let contents = fs::read_to_string(path).map_err(|source| KnowledgeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let data = serde_json::from_str(&contents).map_err(|source| KnowledgeError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "loaded ATT&CK dataset");
        Ok(Self { data })
    }

    /// Wrap already-parsed dataset JSON (fixtures, embedded data).
    pub fn from_value(data: serde_json::Value) -> Self {
        Self { data }
    }

    pub fn as_json(&self) -> &serde_json::Value {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_reads_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"techniques": [{{"id": "T1110"}}]}}"#).unwrap();

        let knowledge = AttackKnowledge::load(file.path()).unwrap();
        assert_eq!(knowledge.as_json()["techniques"][0]["id"], "T1110");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = AttackKnowledge::load(Path::new("/no/such/dataset.json")).unwrap_err();
        assert!(matches!(err, KnowledgeError::Io { .. }));
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = AttackKnowledge::load(file.path()).unwrap_err();
        assert!(matches!(err, KnowledgeError::Parse { .. }));
    }
}
