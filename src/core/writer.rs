use crate::adapters::storage::LocalStorage;
use crate::config::WriterConfig;
use crate::core::encoder::{JsonEncoder, NumericEncoder};
use crate::core::formatter::{write_node, IndentFormatter};
use crate::domain::model::Datum;
use crate::domain::ports::{ExtendedEncoder, Storage, WriteMode};
use crate::utils::error::{Result, WriterError};
use crate::utils::validation::validate_filename;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Encodes values with an [`ExtendedEncoder`] and writes them as indented JSON.
///
/// The whole document is rendered in memory before the storage is touched, so
/// an encoding failure never truncates an existing file.
pub struct JsonWriter<S: Storage, E: ExtendedEncoder = NumericEncoder> {
    storage: S,
    encoder: E,
    config: WriterConfig,
}

impl<S: Storage> JsonWriter<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            encoder: NumericEncoder,
            config: WriterConfig::default(),
        }
    }
}

impl<S: Storage, E: ExtendedEncoder> JsonWriter<S, E> {
    pub fn with_config(mut self, config: WriterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_encoder<E2: ExtendedEncoder>(self, encoder: E2) -> JsonWriter<S, E2> {
        JsonWriter {
            storage: self.storage,
            encoder,
            config: self.config,
        }
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The exact text [`write`](Self::write) would put on disk.
    pub fn render(&self, data: &Datum) -> Result<String> {
        let bytes = self.render_bytes(data)?;
        String::from_utf8(bytes).map_err(|e| WriterError::ValidationError {
            message: format!("rendered JSON is not UTF-8: {}", e),
        })
    }

    pub fn write(&self, data: &Datum, filename: &str) -> Result<PathBuf> {
        validate_filename("filename", filename)?;

        let bytes = self.render_bytes(data)?;
        let mode = if self.config.atomic {
            WriteMode::Atomic
        } else {
            WriteMode::Truncate
        };
        let path = self.storage.write_file(filename, &bytes, mode)?;

        tracing::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }

    /// Writes any serde value. Serde errors surface as serialization errors.
    pub fn write_serializable<T>(&self, value: &T, filename: &str) -> Result<PathBuf>
    where
        T: Serialize + ?Sized,
    {
        let json = serde_json::to_value(value)?;
        self.write(&Datum::from(json), filename)
    }

    /// Parses a written file back. Files holding `NaN` or `Infinity` tokens are
    /// not strict JSON and fail with a serialization error.
    pub fn read(&self, filename: &str) -> Result<serde_json::Value> {
        let bytes = self.storage.read_file(filename)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn render_bytes(&self, data: &Datum) -> Result<Vec<u8>> {
        let node = JsonEncoder::with_hook(&self.encoder)
            .non_finite(self.config.non_finite)
            .encode(data)?;

        let indent = self.config.indent_string();
        let mut formatter = IndentFormatter::new(indent.as_bytes(), self.config.ensure_ascii);
        let mut buf = Vec::new();
        write_node(&node, &mut buf, &mut formatter).map_err(serde_json::Error::io)?;

        if self.config.trailing_newline {
            buf.push(b'\n');
        }
        Ok(buf)
    }
}

/// Writes `data` to `<output_path>/<filename>` with the default configuration,
/// overwriting any existing file. `output_path` must already exist.
pub fn write_json(
    data: &Datum,
    output_path: impl AsRef<Path>,
    filename: &str,
) -> Result<PathBuf> {
    JsonWriter::new(LocalStorage::new(output_path.as_ref())).write(data, filename)
}

pub fn write_serializable<T>(
    value: &T,
    output_path: impl AsRef<Path>,
    filename: &str,
) -> Result<PathBuf>
where
    T: Serialize + ?Sized,
{
    JsonWriter::new(LocalStorage::new(output_path.as_ref())).write_serializable(value, filename)
}

pub fn read_json(output_path: impl AsRef<Path>, filename: &str) -> Result<serde_json::Value> {
    JsonWriter::new(LocalStorage::new(output_path.as_ref())).read(filename)
}
