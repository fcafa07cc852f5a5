use crate::error::{MobilityError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Reads raw source tables from the data directory. Files are UTF-8 text,
/// optionally BOM-prefixed; everything past reading is the parser's job.
#[derive(Debug, Clone)]
pub struct SourceDir {
    root: PathBuf,
}

impl SourceDir {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        SourceDir { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn read(&self, file_name: &str) -> Result<String> {
        let path = self.root.join(file_name);
        fs::read_to_string(&path).map_err(|e| {
            MobilityError::DataLoad(format!("failed to read '{}': {}", path.display(), e))
        })
    }
}
