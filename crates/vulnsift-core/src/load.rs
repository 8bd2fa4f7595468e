//! Reading input documents from disk.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::entry::ChangesDocument;
use crate::error::LoadError;
use crate::grype::{GrypeReport, Match};

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a `vulnerable_changes` document. The file must exist.
pub fn load_changes(path: &Path) -> Result<ChangesDocument, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    read_json(path)
}

/// Load the matches of a Grype report.
///
/// A missing or zero-length report means the scan produced nothing, so an
/// empty list is returned. Malformed JSON is still an error.
pub fn load_matches(path: &Path) -> Result<Vec<Match>, LoadError> {
    let len = match fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(_) => {
            log::info!("Report {} not found, treating as empty", path.display());
            return Ok(Vec::new());
        }
    };
    if len == 0 {
        log::info!("Report {} is empty", path.display());
        return Ok(Vec::new());
    }

    let report: GrypeReport = read_json(path)?;
    Ok(report.matches)
}
