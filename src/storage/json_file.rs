//! JSON file storage implementation
//!
//! One pretty-printed file per code, named `icd10_<storage key>.json`.

use crate::catalog::{Code, NodeRecord};
use crate::storage::traits::{RecordStore, StoreError, StoreResult};
use std::fs;
use std::path::{Path, PathBuf};

const FILE_PREFIX: &str = "icd10_";
const FILE_EXTENSION: &str = "json";

/// File-per-code record store rooted at an output directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    output_dir: PathBuf,
}

impl JsonFileStore {
    /// Creates a store writing below `output_dir`
    ///
    /// The directory is created lazily on the first save.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Location of the record file for `code`
    ///
    /// # Example
    ///
    /// ```
    /// use icd_harvest::{Code, JsonFileStore};
    /// use std::path::Path;
    ///
    /// let store = JsonFileStore::new("icd_data");
    /// assert_eq!(
    ///     store.path_for(&Code::new("A00.1")),
    ///     Path::new("icd_data/icd10_A00_1.json")
    /// );
    /// ```
    pub fn path_for(&self, code: &Code) -> PathBuf {
        self.output_dir.join(format!(
            "{}{}.{}",
            FILE_PREFIX,
            code.storage_key(),
            FILE_EXTENSION
        ))
    }
}

impl RecordStore for JsonFileStore {
    fn save(&self, code: &Code, record: &NodeRecord) -> StoreResult<PathBuf> {
        fs::create_dir_all(&self.output_dir).map_err(|source| StoreError::CreateDir {
            code: code.clone(),
            path: self.output_dir.clone(),
            source,
        })?;

        let path = self.path_for(code);

        // serde_json leaves non-ASCII characters unescaped
        let text =
            serde_json::to_string_pretty(record).map_err(|source| StoreError::Serialization {
                code: code.clone(),
                source,
            })?;

        fs::write(&path, text).map_err(|source| StoreError::Io {
            code: code.clone(),
            path: path.clone(),
            source,
        })?;

        tracing::info!("Data for code {} saved to {}", code, path.display());
        Ok(path)
    }
}
