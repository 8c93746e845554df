use crate::config::NonFinitePolicy;
use crate::domain::model::{element_count, Datum, Extension, JsonNode, NdArray, NumericScalar};
use crate::domain::ports::ExtendedEncoder;
use crate::utils::error::{Result, WriterError};
use indexmap::IndexMap;

/// Upper bound on the nested lists an element-less array may expand to.
pub const MAX_EMPTY_LISTS: usize = 1 << 20;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Position of the value being encoded, plus the float policy in effect.
///
/// Hooks use it to build errors that point at the offending value, e.g.
/// `$.samples[3]`.
#[derive(Debug, Clone)]
pub struct EncodeContext {
    segments: Vec<Segment>,
    non_finite: NonFinitePolicy,
}

impl EncodeContext {
    pub fn new(non_finite: NonFinitePolicy) -> Self {
        Self {
            segments: Vec::new(),
            non_finite,
        }
    }

    pub fn non_finite(&self) -> NonFinitePolicy {
        self.non_finite
    }

    pub fn path(&self) -> String {
        render_path(&self.segments, &[])
    }

    pub fn unsupported(&self, type_name: &str) -> WriterError {
        WriterError::EncodingError {
            path: self.path(),
            type_name: type_name.to_string(),
            reason: format!("Object of type {} is not JSON serializable", type_name),
        }
    }

    /// Converts a float, applying the non-finite policy.
    ///
    /// `tail` holds array indices below the current position, used only in the
    /// error path.
    pub fn encode_float(&self, value: f64, type_name: &str, tail: &[usize]) -> Result<JsonNode> {
        if value.is_finite() {
            return Ok(JsonNode::Float(value));
        }

        match self.non_finite {
            NonFinitePolicy::Literal => Ok(JsonNode::NonFinite(value)),
            NonFinitePolicy::Null => Ok(JsonNode::Null),
            NonFinitePolicy::Error => Err(WriterError::EncodingError {
                path: render_path(&self.segments, tail),
                type_name: type_name.to_string(),
                reason: format!("Out of range float value {} is not JSON compliant", value),
            }),
        }
    }

    fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    fn pop(&mut self) {
        self.segments.pop();
    }
}

fn render_path(segments: &[Segment], tail: &[usize]) -> String {
    let mut out = String::from("$");
    for segment in segments {
        match segment {
            Segment::Key(key) if is_identifier(key) => {
                out.push('.');
                out.push_str(key);
            }
            Segment::Key(key) => out.push_str(&format!("[{:?}]", key)),
            Segment::Index(index) => out.push_str(&format!("[{}]", index)),
        }
    }
    for index in tail {
        out.push_str(&format!("[{}]", index));
    }
    out
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Stock hook: fixed-width scalars and n-dimensional arrays.
///
/// Arrays become nested lists following their shape; a 0-d array becomes a
/// bare scalar. Complex and opaque values are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericEncoder;

impl ExtendedEncoder for NumericEncoder {
    fn encode_extension(&self, ext: &Extension, ctx: &EncodeContext) -> Result<JsonNode> {
        match ext {
            Extension::Scalar(scalar) => encode_scalar(*scalar, ctx, &[]),
            Extension::Array(array) => encode_array(array, ctx),
            Extension::Complex { .. } | Extension::Opaque { .. } => {
                Err(ctx.unsupported(ext.type_name()))
            }
        }
    }
}

pub fn encode_scalar(scalar: NumericScalar, ctx: &EncodeContext, tail: &[usize]) -> Result<JsonNode> {
    let node = match scalar {
        NumericScalar::Bool(v) => JsonNode::from(v),
        NumericScalar::I8(v) => JsonNode::from(v),
        NumericScalar::I16(v) => JsonNode::from(v),
        NumericScalar::I32(v) => JsonNode::from(v),
        NumericScalar::I64(v) => JsonNode::from(v),
        NumericScalar::U8(v) => JsonNode::from(v),
        NumericScalar::U16(v) => JsonNode::from(v),
        NumericScalar::U32(v) => JsonNode::from(v),
        NumericScalar::U64(v) => JsonNode::from(v),
        NumericScalar::F32(v) => return ctx.encode_float(f64::from(v), scalar.dtype(), tail),
        NumericScalar::F64(v) => return ctx.encode_float(v, scalar.dtype(), tail),
    };
    Ok(node)
}

pub fn encode_array(array: &NdArray, ctx: &EncodeContext) -> Result<JsonNode> {
    if array.ndim() == 0 {
        return match array.elements().first() {
            Some(scalar) => encode_scalar(*scalar, ctx, &[]),
            None => Err(ctx.unsupported("ndarray")),
        };
    }

    if array.elements().is_empty() {
        match empty_list_count(array.shape()) {
            Some(count) if count <= MAX_EMPTY_LISTS => {}
            _ => {
                return Err(WriterError::EncodingError {
                    path: ctx.path(),
                    type_name: "ndarray".to_string(),
                    reason: format!(
                        "array of shape {:?} expands to more than {} empty lists",
                        array.shape(),
                        MAX_EMPTY_LISTS
                    ),
                })
            }
        }
    }

    let mut index = Vec::with_capacity(array.ndim());
    nest(array.shape(), array.elements(), ctx, &mut index)
}

/// Lists produced by an element-less shape: one per position above the first
/// zero dimension.
fn empty_list_count(shape: &[usize]) -> Option<usize> {
    let mut total = 1usize;
    let mut level = 1usize;
    for &dim in shape {
        if dim == 0 {
            break;
        }
        level = level.checked_mul(dim)?;
        total = total.checked_add(level)?;
    }
    Some(total)
}

fn nest(
    shape: &[usize],
    elements: &[NumericScalar],
    ctx: &EncodeContext,
    index: &mut Vec<usize>,
) -> Result<JsonNode> {
    let (len, rest) = match shape.split_first() {
        Some((&len, rest)) if len > 0 => (len, rest),
        _ => return Ok(JsonNode::Array(Vec::new())),
    };

    if rest.is_empty() {
        let mut items = Vec::with_capacity(elements.len());
        for (i, scalar) in elements.iter().enumerate() {
            index.push(i);
            items.push(encode_scalar(*scalar, ctx, index)?);
            index.pop();
        }
        return Ok(JsonNode::Array(items));
    }

    let stride = element_count(rest).ok_or_else(|| ctx.unsupported("ndarray"))?;
    let mut items = Vec::with_capacity(if elements.is_empty() { 0 } else { len });
    for i in 0..len {
        index.push(i);
        let chunk = elements.get(i * stride..(i + 1) * stride).unwrap_or(&[]);
        items.push(nest(rest, chunk, ctx, index)?);
        index.pop();
    }
    Ok(JsonNode::Array(items))
}

/// Applies the default JSON rules and delegates everything else to the hook.
#[derive(Debug, Clone)]
pub struct JsonEncoder<E = NumericEncoder> {
    hook: E,
    non_finite: NonFinitePolicy,
}

impl JsonEncoder {
    pub fn new() -> Self {
        Self::with_hook(NumericEncoder)
    }
}

impl Default for JsonEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ExtendedEncoder> JsonEncoder<E> {
    pub fn with_hook(hook: E) -> Self {
        Self {
            hook,
            non_finite: NonFinitePolicy::default(),
        }
    }

    pub fn non_finite(mut self, policy: NonFinitePolicy) -> Self {
        self.non_finite = policy;
        self
    }

    pub fn encode(&self, datum: &Datum) -> Result<JsonNode> {
        let mut ctx = EncodeContext::new(self.non_finite);
        self.encode_at(datum, &mut ctx)
    }

    fn encode_at(&self, datum: &Datum, ctx: &mut EncodeContext) -> Result<JsonNode> {
        let node = match datum {
            Datum::Null => JsonNode::Null,
            Datum::Bool(b) => JsonNode::Bool(*b),
            Datum::Int(i) => JsonNode::from(*i),
            Datum::UInt(u) => JsonNode::from(*u),
            Datum::Float(f) => ctx.encode_float(*f, "float", &[])?,
            Datum::Str(s) => JsonNode::Str(s.clone()),
            Datum::List(items) => {
                let mut out = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    ctx.push(Segment::Index(i));
                    out.push(self.encode_at(item, ctx)?);
                    ctx.pop();
                }
                JsonNode::Array(out)
            }
            Datum::Map(entries) => {
                let mut out = IndexMap::with_capacity(entries.len());
                for (key, item) in entries {
                    ctx.push(Segment::Key(key.clone()));
                    let encoded = self.encode_at(item, ctx)?;
                    ctx.pop();
                    // a repeated key keeps its first position and takes the last value
                    out.insert(key.clone(), encoded);
                }
                JsonNode::Object(out)
            }
            Datum::Ext(ext) => self.hook.encode_extension(ext, ctx)?,
        };
        Ok(node)
    }
}
