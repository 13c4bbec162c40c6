//! Input shapes and row-major input batches.
//!
//! A unit always sees a batch of `batch` input vectors of `len` elements each.
//! A scalar input size is shorthand for a batch of one, so a unit built with
//! `InputSize::vector(20)` has shape `(1, 20)`.

use crate::error::{Error, Result};

/// Configured input shape of a unit: `batch` rows of `len` elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "(usize, usize)", into = "(usize, usize)"))]
pub struct InputSize {
    batch: usize,
    len: usize,
}

impl InputSize {
    /// A `(batch, len)` shape. Both dimensions must be at least 1 and
    /// `batch * len` must fit in a `usize`.
    pub fn new(batch: usize, len: usize) -> Result<Self> {
        if batch == 0 {
            return Err(Error::invalid("batch size must be >= 1; got 0"));
        }
        if len == 0 {
            return Err(Error::invalid("input length must be >= 1; got 0"));
        }
        if batch.checked_mul(len).is_none() {
            return Err(Error::invalid(format!(
                "input size ({batch}, {len}) overflows the element count"
            )));
        }
        Ok(Self { batch, len })
    }

    /// A single input vector of `len` elements, i.e. shape `(1, len)`.
    pub fn vector(len: usize) -> Result<Self> {
        Self::new(1, len)
    }

    pub fn batch(&self) -> usize {
        self.batch
    }

    /// Elements per input vector (the weight count of a unit).
    pub fn length(&self) -> usize {
        self.len
    }

    /// `(batch, len)`.
    pub fn dims(&self) -> (usize, usize) {
        (self.batch, self.len)
    }

    /// Total number of elements in a batch of this shape.
    ///
    /// Cannot overflow: `new` rejects shapes whose product does not fit.
    pub fn numel(&self) -> usize {
        self.batch * self.len
    }
}

impl Default for InputSize {
    /// A single scalar input, `(1, 1)`.
    fn default() -> Self {
        Self { batch: 1, len: 1 }
    }
}

impl TryFrom<usize> for InputSize {
    type Error = Error;

    fn try_from(len: usize) -> Result<Self> {
        Self::vector(len)
    }
}

impl TryFrom<(usize, usize)> for InputSize {
    type Error = Error;

    fn try_from((batch, len): (usize, usize)) -> Result<Self> {
        Self::new(batch, len)
    }
}

impl From<InputSize> for (usize, usize) {
    fn from(s: InputSize) -> Self {
        s.dims()
    }
}

impl TryFrom<&[usize]> for InputSize {
    type Error = Error;

    /// Accepts exactly two elements, `[batch, len]`.
    fn try_from(dims: &[usize]) -> Result<Self> {
        match dims {
            [batch, len] => Self::new(*batch, *len),
            _ => Err(Error::invalid(format!(
                "input size must have two elements (batch size, length); got {}",
                dims.len()
            ))),
        }
    }
}

/// A batch of input vectors stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Inputs {
    shape: InputSize,
    data: Vec<f64>,
}

impl Inputs {
    /// Wrap row-major `data` of the given shape.
    pub fn new(shape: InputSize, data: Vec<f64>) -> Result<Self> {
        if data.len() != shape.numel() {
            return Err(Error::invalid(format!(
                "expected {} values for shape {:?}, got {}",
                shape.numel(),
                shape.dims(),
                data.len()
            )));
        }
        Ok(Self { shape, data })
    }

    /// Build a batch from equal-length rows.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let len = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let shape = InputSize::new(rows.len(), len)?;
        let mut data = Vec::with_capacity(shape.numel());
        for (i, r) in rows.iter().enumerate() {
            let r = r.as_ref();
            if r.len() != len {
                return Err(Error::invalid(format!(
                    "row {i} has {} elements, expected {len}",
                    r.len()
                )));
            }
            data.extend_from_slice(r);
        }
        Ok(Self { shape, data })
    }

    /// A single-row batch holding `v`.
    pub fn from_vector(v: Vec<f64>) -> Result<Self> {
        let shape = InputSize::vector(v.len())?;
        Ok(Self { shape, data: v })
    }

    pub fn filled(shape: InputSize, value: f64) -> Self {
        Self {
            shape,
            data: vec![value; shape.numel()],
        }
    }

    pub fn ones(shape: InputSize) -> Self {
        Self::filled(shape, 1.0)
    }

    pub fn zeros(shape: InputSize) -> Self {
        Self::filled(shape, 0.0)
    }

    pub fn shape(&self) -> InputSize {
        self.shape
    }

    /// Row-major backing storage.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Row `i`, or `None` if `i >= batch`.
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        self.rows().nth(i)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.shape.length())
    }

    pub(crate) fn rows_mut(&mut self) -> impl Iterator<Item = &mut [f64]> {
        self.data.chunks_exact_mut(self.shape.length())
    }

    /// True if every element is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|&v| v == 0.0)
    }
}

pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    let mut s = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        s += x * y;
    }
    s
}
