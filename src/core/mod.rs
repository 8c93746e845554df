pub mod encoder;
pub mod formatter;
pub mod writer;

pub use crate::domain::model::{Datum, Extension, NdArray, NumericScalar};
pub use crate::domain::ports::{ExtendedEncoder, Storage, WriteMode};
pub use crate::utils::error::Result;
