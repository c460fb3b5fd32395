//! Row-major n-dimensional `f64` arrays and their canonical text rendering.
//!
//! # Rendering rules
//!
//! 1. A scalar renders with the shortest round-trip form that keeps a
//!    decimal point or exponent (`1.0`, `0.1`, `6.25e-7`). Non-finite
//!    values render as `NaN`, `inf`, `-inf`.
//! 2. Each axis renders as `[` + elements joined by `", "` + `]`.
//! 3. A 0-d array renders as its single scalar.
//! 4. An axis of length zero renders as `[]`.
//!
//! The rendering is part of the digest surface: changing it changes every
//! stored reference digest.

use std::fmt::Write as _;

/// Why a value could not be interpreted as a rectangular numeric array.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArrayError {
    /// `data.len()` disagrees with the product of `shape`.
    #[error("shape {shape:?} needs {expected} elements, got {actual}")]
    LengthMismatch {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },
    /// Nested arrays of different lengths at the same depth.
    #[error("ragged array at depth {depth}")]
    Ragged { depth: usize },
    /// A leaf is not a JSON number.
    #[error("non-numeric element at depth {depth}: {found}")]
    NonNumeric { depth: usize, found: String },
}

/// A dense row-major array of `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct NdArray {
    shape: Vec<usize>,
    data: Vec<f64>,
}

impl NdArray {
    /// Build from a shape and matching row-major data.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::LengthMismatch`] if `data.len()` is not the
    /// product of `shape`.
    pub fn new(shape: Vec<usize>, data: Vec<f64>) -> Result<Self, ArrayError> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(ArrayError::LengthMismatch {
                shape,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// A 0-d array holding one value.
    #[must_use]
    pub fn scalar(value: f64) -> Self {
        Self {
            shape: Vec::new(),
            data: vec![value],
        }
    }

    /// A 1-d array.
    #[must_use]
    pub fn vector(data: Vec<f64>) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[must_use]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    #[must_use]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Interpret a JSON number or (nested) array of numbers.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::Ragged`] for non-rectangular nesting and
    /// [`ArrayError::NonNumeric`] for any non-number leaf.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ArrayError> {
        let mut shape = Vec::new();
        infer_shape(value, 0, &mut shape)?;
        let mut data = Vec::with_capacity(shape.iter().product());
        collect(value, 0, &shape, &mut data)?;
        Ok(Self { shape, data })
    }

    /// Nested JSON arrays mirroring the shape (a bare number for 0-d).
    ///
    /// Non-finite values have no JSON form and become `null`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        if self.shape.is_empty() {
            return number_json(self.data[0]);
        }
        build_json(&self.shape, &self.data)
    }

    /// Canonical text form (see module docs).
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    /// Append the canonical text form to `out`.
    pub fn render_into(&self, out: &mut String) {
        if self.shape.is_empty() {
            push_scalar(out, self.data[0]);
            return;
        }
        render_axis(out, &self.shape, &self.data);
    }
}

fn infer_shape(
    value: &serde_json::Value,
    depth: usize,
    shape: &mut Vec<usize>,
) -> Result<(), ArrayError> {
    match value {
        serde_json::Value::Number(_) => Ok(()),
        serde_json::Value::Array(items) => {
            shape.push(items.len());
            match items.first() {
                Some(first) => infer_shape(first, depth + 1, shape),
                None => Ok(()),
            }
        }
        other => Err(ArrayError::NonNumeric {
            depth,
            found: other.to_string(),
        }),
    }
}

fn collect(
    value: &serde_json::Value,
    depth: usize,
    shape: &[usize],
    data: &mut Vec<f64>,
) -> Result<(), ArrayError> {
    match value {
        serde_json::Value::Number(n) if depth == shape.len() => {
            // as_f64 only fails for arbitrary-precision numbers, which we
            // do not enable.
            let v = n.as_f64().ok_or_else(|| ArrayError::NonNumeric {
                depth,
                found: n.to_string(),
            })?;
            data.push(v);
            Ok(())
        }
        serde_json::Value::Array(items) if depth < shape.len() => {
            if items.len() != shape[depth] {
                return Err(ArrayError::Ragged { depth });
            }
            for item in items {
                collect(item, depth + 1, shape, data)?;
            }
            Ok(())
        }
        serde_json::Value::Number(_) | serde_json::Value::Array(_) => {
            Err(ArrayError::Ragged { depth })
        }
        other => Err(ArrayError::NonNumeric {
            depth,
            found: other.to_string(),
        }),
    }
}

fn number_json(v: f64) -> serde_json::Value {
    serde_json::Number::from_f64(v).map_or(serde_json::Value::Null, serde_json::Value::Number)
}

fn build_json(shape: &[usize], data: &[f64]) -> serde_json::Value {
    if shape.len() == 1 {
        return serde_json::Value::Array(data.iter().map(|&v| number_json(v)).collect());
    }
    let stride: usize = shape[1..].iter().product();
    let rows = (0..shape[0])
        .map(|i| build_json(&shape[1..], &data[i * stride..(i + 1) * stride]))
        .collect();
    serde_json::Value::Array(rows)
}

fn render_axis(out: &mut String, shape: &[usize], data: &[f64]) {
    out.push('[');
    if shape.len() == 1 {
        for (i, &v) in data.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            push_scalar(out, v);
        }
    } else {
        let stride: usize = shape[1..].iter().product();
        for i in 0..shape[0] {
            if i > 0 {
                out.push_str(", ");
            }
            render_axis(out, &shape[1..], &data[i * stride..(i + 1) * stride]);
        }
    }
    out.push(']');
}

fn push_scalar(out: &mut String, v: f64) {
    // `{:?}` is the shortest representation that round-trips and always
    // carries a `.` or exponent for finite values.
    let _ = write!(out, "{v:?}");
}
