pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::storage::LocalStorage;
pub use config::{NonFinitePolicy, WriterConfig};
pub use crate::core::encoder::{EncodeContext, JsonEncoder, NumericEncoder};
pub use crate::core::writer::{read_json, write_json, write_serializable, JsonWriter};
pub use domain::model::{Datum, Extension, JsonNode, NdArray, NumericScalar};
pub use domain::ports::{ExtendedEncoder, Storage, WriteMode};
pub use utils::error::{Result, WriterError};
