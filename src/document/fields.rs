//! # Typed Attribute Fields
//!
//! X3D attribute values are whitespace or comma separated ASCII lists. This
//! module decodes them on demand into engine types:
//!
//! - scalars (`f32`, `f64`, `i32`, `bool`)
//! - single vectors (`Vector2`, `Vector3`, [`Rgb`]) and axis-angle rotations
//!   (`Quaternion`)
//! - multi-valued fields (`Vec<T>`), consumed `T::ARITY` numbers at a time
//!
//! Decoding never aborts a node. [`SceneNode::field_or`] falls back to the
//! supplied default when an attribute is missing or malformed, logging the
//! latter at debug level.

use cgmath::{InnerSpace, Quaternion, Rad, Rotation3, Vector2, Vector3, Zero};

use super::node::SceneNode;
use crate::error::FieldError;

/// Linear RGB triple in `[0, 1]`
pub type Rgb = [f32; 3];

/// A value that can be decoded from a raw attribute string
pub trait FieldValue: Sized {
    fn parse_field(raw: &str) -> Result<Self, FieldError>;
}

/// A fixed-width tuple of numbers, the element type of multi-valued fields
pub trait FieldTuple: Sized {
    const ARITY: usize;
    fn from_numbers(values: &[f64]) -> Self;
}

/// Splits a raw value on whitespace and commas
pub fn tokens(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
}

fn numbers(raw: &str) -> Result<Vec<f64>, FieldError> {
    tokens(raw)
        .map(|t| {
            t.parse::<f64>()
                .map_err(|_| FieldError::Malformed(t.to_string()))
        })
        .collect()
}

fn exact<const N: usize>(raw: &str) -> Result<[f64; N], FieldError> {
    let values = numbers(raw)?;
    if values.len() < N {
        return Err(FieldError::Arity {
            expected: N,
            found: values.len(),
        });
    }
    let mut out = [0.0; N];
    out.copy_from_slice(&values[..N]);
    Ok(out)
}

impl FieldValue for f32 {
    fn parse_field(raw: &str) -> Result<Self, FieldError> {
        exact::<1>(raw).map(|[v]| v as f32)
    }
}

impl FieldValue for f64 {
    fn parse_field(raw: &str) -> Result<Self, FieldError> {
        exact::<1>(raw).map(|[v]| v)
    }
}

impl FieldValue for i32 {
    fn parse_field(raw: &str) -> Result<Self, FieldError> {
        let token = tokens(raw).next().ok_or(FieldError::Arity {
            expected: 1,
            found: 0,
        })?;
        token
            .parse()
            .map_err(|_| FieldError::Malformed(token.to_string()))
    }
}

impl FieldValue for bool {
    fn parse_field(raw: &str) -> Result<Self, FieldError> {
        match raw.trim() {
            t if t.eq_ignore_ascii_case("true") => Ok(true),
            t if t.eq_ignore_ascii_case("false") => Ok(false),
            other => Err(FieldError::Boolean(other.to_string())),
        }
    }
}

impl FieldValue for String {
    fn parse_field(raw: &str) -> Result<Self, FieldError> {
        Ok(raw.to_string())
    }
}

impl FieldTuple for f32 {
    const ARITY: usize = 1;
    fn from_numbers(v: &[f64]) -> Self {
        v[0] as f32
    }
}

impl FieldTuple for Vector2<f32> {
    const ARITY: usize = 2;
    fn from_numbers(v: &[f64]) -> Self {
        Vector2::new(v[0] as f32, v[1] as f32)
    }
}

impl FieldTuple for Vector3<f32> {
    const ARITY: usize = 3;
    fn from_numbers(v: &[f64]) -> Self {
        Vector3::new(v[0] as f32, v[1] as f32, v[2] as f32)
    }
}

impl FieldTuple for Vector3<f64> {
    const ARITY: usize = 3;
    fn from_numbers(v: &[f64]) -> Self {
        Vector3::new(v[0], v[1], v[2])
    }
}

impl FieldTuple for Rgb {
    const ARITY: usize = 3;
    fn from_numbers(v: &[f64]) -> Self {
        [v[0] as f32, v[1] as f32, v[2] as f32]
    }
}

impl FieldTuple for Quaternion<f32> {
    const ARITY: usize = 4;
    fn from_numbers(v: &[f64]) -> Self {
        axis_angle(
            Vector3::new(v[0] as f32, v[1] as f32, v[2] as f32),
            v[3] as f32,
        )
    }
}

/// Rotation of `angle` radians about `axis`; a zero axis yields identity
pub fn axis_angle(axis: Vector3<f32>, angle: f32) -> Quaternion<f32> {
    if axis.magnitude2() <= f32::EPSILON || !angle.is_finite() {
        return Quaternion::new(1.0, 0.0, 0.0, 0.0);
    }
    Quaternion::from_axis_angle(axis.normalize(), Rad(angle))
}

macro_rules! single_from_tuple {
    ($($ty:ty),*) => {$(
        impl FieldValue for $ty {
            fn parse_field(raw: &str) -> Result<Self, FieldError> {
                const N: usize = <$ty as FieldTuple>::ARITY;
                exact::<N>(raw).map(|v| <$ty>::from_numbers(&v))
            }
        }
    )*};
}

single_from_tuple!(Vector2<f32>, Vector3<f32>, Vector3<f64>, Quaternion<f32>);

// Rgb is an array alias, so it cannot share the macro without overlapping impls
impl FieldValue for [f32; 3] {
    fn parse_field(raw: &str) -> Result<Self, FieldError> {
        exact::<3>(raw).map(|v| <Rgb as FieldTuple>::from_numbers(&v))
    }
}

impl<T: FieldTuple> FieldValue for Vec<T> {
    /// Consumes `T::ARITY` numbers at a time; a trailing partial tuple is ignored
    fn parse_field(raw: &str) -> Result<Self, FieldError> {
        let values = numbers(raw)?;
        Ok(values.chunks_exact(T::ARITY).map(T::from_numbers).collect())
    }
}

/// Decodes an index list such as `coordIndex`
pub fn parse_indices(raw: &str) -> Result<Vec<i32>, FieldError> {
    tokens(raw)
        .map(|t| {
            t.parse::<i32>()
                .map_err(|_| FieldError::Malformed(t.to_string()))
        })
        .collect()
}

/// Decodes an MFString value
///
/// Quoted items (`"a b" "c"`) are unescaped; a value with no quotes at all is
/// split on whitespace instead.
pub fn parse_strings(raw: &str) -> Vec<String> {
    if !raw.contains('"') {
        return tokens(raw).map(str::to_string).collect();
    }

    let mut items = Vec::new();
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '"' {
            continue;
        }
        let mut item = String::new();
        while let Some(c) = chars.next() {
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        item.push(escaped);
                    }
                }
                '"' => break,
                _ => item.push(c),
            }
        }
        items.push(item);
    }
    items
}

impl SceneNode {
    /// Decodes an attribute, returning `None` when absent or malformed
    pub fn field<T: FieldValue>(&self, key: &str) -> Option<T> {
        let raw = self.attr(key)?;
        match T::parse_field(raw) {
            Ok(value) => Some(value),
            Err(err) => {
                log::debug!("<{}> {}=\"{}\": {}, using default", self.name(), key, raw, err);
                None
            }
        }
    }

    /// Decodes an attribute or falls back to `default`
    pub fn field_or<T: FieldValue>(&self, key: &str, default: T) -> T {
        self.field(key).unwrap_or(default)
    }

    /// Decodes an index list attribute, empty when absent or malformed
    pub fn indices(&self, key: &str) -> Vec<i32> {
        let Some(raw) = self.attr(key) else {
            return Vec::new();
        };
        parse_indices(raw).unwrap_or_else(|err| {
            log::debug!("<{}> {}: {}, ignoring indices", self.name(), key, err);
            Vec::new()
        })
    }

    /// Decodes an MFString attribute
    pub fn strings(&self, key: &str) -> Option<Vec<String>> {
        self.attr(key).map(parse_strings)
    }

    /// `translation`-style vector with a zero default
    pub fn vec3_or_zero(&self, key: &str) -> Vector3<f32> {
        self.field_or(key, Vector3::zero())
    }
}
