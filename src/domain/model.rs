use crate::utils::error::{Result, WriterError};
use indexmap::IndexMap;

/// In-memory value accepted by the writer.
///
/// The first eight variants map directly onto JSON. Everything else is wrapped
/// in [`Extension`] and handed to the configured encoder.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    List(Vec<Datum>),
    /// Ordered map; output keys follow insertion order.
    Map(Vec<(String, Datum)>),
    Ext(Extension),
}

/// Values the default JSON rules do not cover.
#[derive(Debug, Clone, PartialEq)]
pub enum Extension {
    Scalar(NumericScalar),
    Array(NdArray),
    Complex { re: f64, im: f64 },
    Opaque { type_name: String },
}

/// Fixed-width numeric scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericScalar {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
}

/// Row-major n-dimensional array of numeric scalars.
#[derive(Debug, Clone, PartialEq)]
pub struct NdArray {
    shape: Vec<usize>,
    elements: Vec<NumericScalar>,
}

impl Datum {
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Datum)>,
    {
        Datum::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn type_name(&self) -> &str {
        match self {
            Datum::Null => "null",
            Datum::Bool(_) => "bool",
            Datum::Int(_) | Datum::UInt(_) => "int",
            Datum::Float(_) => "float",
            Datum::Str(_) => "str",
            Datum::List(_) => "list",
            Datum::Map(_) => "map",
            Datum::Ext(ext) => ext.type_name(),
        }
    }
}

impl Extension {
    pub fn type_name(&self) -> &str {
        match self {
            Extension::Scalar(scalar) => scalar.dtype(),
            Extension::Array(_) => "ndarray",
            Extension::Complex { .. } => "complex128",
            Extension::Opaque { type_name } => type_name,
        }
    }
}

impl NumericScalar {
    pub fn dtype(&self) -> &'static str {
        match self {
            NumericScalar::Bool(_) => "bool",
            NumericScalar::I8(_) => "int8",
            NumericScalar::I16(_) => "int16",
            NumericScalar::I32(_) => "int32",
            NumericScalar::I64(_) => "int64",
            NumericScalar::U8(_) => "uint8",
            NumericScalar::U16(_) => "uint16",
            NumericScalar::U32(_) => "uint32",
            NumericScalar::U64(_) => "uint64",
            NumericScalar::F32(_) => "float32",
            NumericScalar::F64(_) => "float64",
        }
    }
}

impl NdArray {
    pub fn new(shape: Vec<usize>, elements: Vec<NumericScalar>) -> Result<Self> {
        let expected = element_count(&shape).ok_or_else(|| WriterError::ValidationError {
            message: format!("array of shape {:?} has too many elements", shape),
        })?;
        if expected != elements.len() {
            return Err(WriterError::ValidationError {
                message: format!(
                    "array of shape {:?} needs {} elements, got {}",
                    shape,
                    expected,
                    elements.len()
                ),
            });
        }
        Ok(Self { shape, elements })
    }

    /// One-dimensional array.
    pub fn from_vec(elements: Vec<NumericScalar>) -> Self {
        Self {
            shape: vec![elements.len()],
            elements,
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn elements(&self) -> &[NumericScalar] {
        &self.elements
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }
}

/// Number of elements a shape describes, or `None` when it overflows `usize`.
/// Any zero dimension makes the count zero.
pub fn element_count(shape: &[usize]) -> Option<usize> {
    if shape.contains(&0) {
        return Some(0);
    }
    shape.iter().try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
}

/// Encoded output tree.
///
/// Mirrors `serde_json::Value` but can also carry non-finite floats, which are
/// written as the `NaN` / `Infinity` / `-Infinity` literals.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonNode {
    Null,
    Bool(bool),
    Int(i64),
    /// Only for values above `i64::MAX`.
    UInt(u64),
    Float(f64),
    NonFinite(f64),
    Str(String),
    Array(Vec<JsonNode>),
    Object(IndexMap<String, JsonNode>),
}

impl From<f64> for JsonNode {
    fn from(value: f64) -> Self {
        if value.is_finite() {
            JsonNode::Float(value)
        } else {
            JsonNode::NonFinite(value)
        }
    }
}

impl From<u64> for JsonNode {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or(JsonNode::UInt(value), JsonNode::Int)
    }
}

macro_rules! node_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for JsonNode {
                fn from(value: $ty) -> Self {
                    JsonNode::Int(i64::from(value))
                }
            }
        )*
    };
}

node_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for JsonNode {
    fn from(value: bool) -> Self {
        JsonNode::Bool(value)
    }
}

impl From<String> for JsonNode {
    fn from(value: String) -> Self {
        JsonNode::Str(value)
    }
}

impl From<&str> for JsonNode {
    fn from(value: &str) -> Self {
        JsonNode::Str(value.to_string())
    }
}

impl From<Vec<JsonNode>> for JsonNode {
    fn from(value: Vec<JsonNode>) -> Self {
        JsonNode::Array(value)
    }
}

impl From<serde_json::Value> for JsonNode {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => JsonNode::Null,
            serde_json::Value::Bool(b) => JsonNode::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    JsonNode::Int(i)
                } else if let Some(u) = n.as_u64() {
                    JsonNode::UInt(u)
                } else {
                    n.as_f64().map_or(JsonNode::Null, JsonNode::from)
                }
            }
            serde_json::Value::String(s) => JsonNode::Str(s),
            serde_json::Value::Array(items) => {
                JsonNode::Array(items.into_iter().map(JsonNode::from).collect())
            }
            serde_json::Value::Object(map) => JsonNode::Object(
                map.into_iter()
                    .map(|(k, v)| (k, JsonNode::from(v)))
                    .collect(),
            ),
        }
    }
}

macro_rules! scalar_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for NumericScalar {
                fn from(value: $ty) -> Self {
                    NumericScalar::$variant(value)
                }
            }
        )*
    };
}

scalar_from!(
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
);

impl From<NumericScalar> for Datum {
    fn from(value: NumericScalar) -> Self {
        Datum::Ext(Extension::Scalar(value))
    }
}

impl From<NdArray> for Datum {
    fn from(value: NdArray) -> Self {
        Datum::Ext(Extension::Array(value))
    }
}

impl From<Extension> for Datum {
    fn from(value: Extension) -> Self {
        Datum::Ext(value)
    }
}

impl From<bool> for Datum {
    fn from(value: bool) -> Self {
        Datum::Bool(value)
    }
}

impl From<i64> for Datum {
    fn from(value: i64) -> Self {
        Datum::Int(value)
    }
}

impl From<i32> for Datum {
    fn from(value: i32) -> Self {
        Datum::Int(value.into())
    }
}

impl From<u64> for Datum {
    fn from(value: u64) -> Self {
        Datum::UInt(value)
    }
}

impl From<f64> for Datum {
    fn from(value: f64) -> Self {
        Datum::Float(value)
    }
}

impl From<&str> for Datum {
    fn from(value: &str) -> Self {
        Datum::Str(value.to_string())
    }
}

impl From<String> for Datum {
    fn from(value: String) -> Self {
        Datum::Str(value)
    }
}

impl<T: Into<Datum>> From<Vec<T>> for Datum {
    fn from(value: Vec<T>) -> Self {
        Datum::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Datum>> From<Option<T>> for Datum {
    fn from(value: Option<T>) -> Self {
        value.map_or(Datum::Null, Into::into)
    }
}

impl From<serde_json::Value> for Datum {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Datum::Null,
            serde_json::Value::Bool(b) => Datum::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Datum::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Datum::UInt(u)
                } else {
                    Datum::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Datum::Str(s),
            serde_json::Value::Array(items) => {
                Datum::List(items.into_iter().map(Datum::from).collect())
            }
            serde_json::Value::Object(map) => {
                Datum::Map(map.into_iter().map(|(k, v)| (k, Datum::from(v))).collect())
            }
        }
    }
}
