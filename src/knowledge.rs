use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::models::FaqEntry;

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("failed to read knowledge base {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("knowledge base {path:?} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("knowledge base {0:?} contains no FAQ entries")]
    Empty(PathBuf),
}

#[derive(Deserialize)]
struct KnowledgeFile {
    faqs: Vec<FaqEntry>,
}

/// Loads the FAQ list from a JSON file of the form `{"faqs": [{"question", "answer"}]}`.
pub fn load_faqs(path: impl AsRef<Path>) -> Result<Vec<FaqEntry>, KnowledgeError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| KnowledgeError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let file: KnowledgeFile = serde_json::from_str(&raw).map_err(|source| KnowledgeError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    if file.faqs.is_empty() {
        return Err(KnowledgeError::Empty(path.to_path_buf()));
    }

    Ok(file.faqs)
}
