use crate::core::encoder::EncodeContext;
use crate::domain::model::{Extension, JsonNode};
use crate::utils::error::Result;
use std::path::PathBuf;

/// Hook invoked for every value the default JSON rules cannot represent.
pub trait ExtendedEncoder {
    fn encode_extension(&self, ext: &Extension, ctx: &EncodeContext) -> Result<JsonNode>;
}

impl<E: ExtendedEncoder + ?Sized> ExtendedEncoder for &E {
    fn encode_extension(&self, ext: &Extension, ctx: &EncodeContext) -> Result<JsonNode> {
        (**self).encode_extension(ext, ctx)
    }
}

impl<E: ExtendedEncoder + ?Sized> ExtendedEncoder for Box<E> {
    fn encode_extension(&self, ext: &Extension, ctx: &EncodeContext) -> Result<JsonNode> {
        (**self).encode_extension(ext, ctx)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Truncate the target and write in place.
    Truncate,
    /// Write a sibling temporary file and rename it over the target.
    Atomic,
}

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    /// Returns the location the bytes were written to.
    fn write_file(&self, path: &str, data: &[u8], mode: WriteMode) -> Result<PathBuf>;
}
