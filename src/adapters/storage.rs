use crate::domain::ports::{Storage, WriteMode};
use crate::utils::error::{Result, WriterError};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Files under an existing directory. The directory is never created.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for LocalStorage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.base_path.join(path);
        fs::read(&full_path).map_err(|e| WriterError::io(&full_path, e))
    }

    fn write_file(&self, path: &str, data: &[u8], mode: WriteMode) -> Result<PathBuf> {
        let full_path = self.base_path.join(path);
        let io_err = |e: std::io::Error| WriterError::io(&full_path, e);

        if full_path.is_file() {
            tracing::debug!("Overwriting existing file {}", full_path.display());
        }

        match mode {
            WriteMode::Truncate => {
                let mut file = fs::File::create(&full_path).map_err(io_err)?;
                file.write_all(data).map_err(io_err)?;
                file.flush().map_err(io_err)?;
            }
            WriteMode::Atomic => {
                let dir = full_path.parent().unwrap_or(&self.base_path);
                let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
                tmp.write_all(data).map_err(io_err)?;
                tmp.as_file().sync_all().map_err(io_err)?;
                tmp.persist(&full_path).map_err(|e| io_err(e.error))?;
            }
        }

        Ok(full_path)
    }
}
