//! Dense `f64` vector with value-semantics arithmetic.

use std::fmt;
use std::ops::{Index, IndexMut};

/// A dense vector of `f64` values.
///
/// Arithmetic methods return new vectors and never mutate their
/// operands. The editing methods ([`push`](Vector::push),
/// [`insert`](Vector::insert), [`remove`](Vector::remove)) are meant
/// for scratch buffers only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vector {
    data: Vec<f64>,
}

impl Vector {
    /// Create a zero-filled vector of the given length.
    pub fn zeros(len: usize) -> Self {
        Self {
            data: vec![0.0; len],
        }
    }

    /// Create a vector with every element set to `value`.
    pub fn filled(len: usize, value: f64) -> Self {
        Self {
            data: vec![value; len],
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.data.iter()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Append an element.
    pub fn push(&mut self, value: f64) {
        self.data.push(value);
    }

    /// Insert an element at `index`, shifting the tail right.
    pub fn insert(&mut self, index: usize, value: f64) {
        self.data.insert(index, value);
    }

    /// Remove and return the element at `index`.
    pub fn remove(&mut self, index: usize) -> f64 {
        self.data.remove(index)
    }

    /// Elementwise addition.
    pub fn add(&self, rhs: &Vector) -> Vector {
        self.zip_with(rhs, |a, b| a + b)
    }

    /// Elementwise subtraction.
    pub fn sub(&self, rhs: &Vector) -> Vector {
        self.zip_with(rhs, |a, b| a - b)
    }

    /// Elementwise multiplication.
    pub fn mul(&self, rhs: &Vector) -> Vector {
        self.zip_with(rhs, |a, b| a * b)
    }

    /// Elementwise division.
    pub fn div(&self, rhs: &Vector) -> Vector {
        self.zip_with(rhs, |a, b| a / b)
    }

    /// Multiply every element by a scalar.
    pub fn scale(&self, value: f64) -> Vector {
        self.map(|a| a * value)
    }

    /// Add a scalar to every element.
    pub fn shift(&self, value: f64) -> Vector {
        self.map(|a| a + value)
    }

    /// Negate every element.
    pub fn negate(&self) -> Vector {
        self.scale(-1.0)
    }

    /// Raise every element to `power`.
    pub fn powf(&self, power: f64) -> Vector {
        self.map(|a| a.powf(power))
    }

    /// Sum of all elements.
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    /// True if any element is NaN.
    pub fn has_nan(&self) -> bool {
        self.data.iter().any(|v| v.is_nan())
    }

    fn map(&self, f: impl Fn(f64) -> f64) -> Vector {
        Vector {
            data: self.data.iter().map(|&a| f(a)).collect(),
        }
    }

    fn zip_with(&self, rhs: &Vector, f: impl Fn(f64, f64) -> f64) -> Vector {
        assert_eq!(
            self.len(),
            rhs.len(),
            "vector length mismatch: {} vs {}",
            self.len(),
            rhs.len()
        );
        Vector {
            data: self
                .data
                .iter()
                .zip(rhs.data.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        }
    }
}

impl From<Vec<f64>> for Vector {
    fn from(data: Vec<f64>) -> Self {
        Self { data }
    }
}

impl FromIterator<f64> for Vector {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

impl Index<usize> for Vector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.data[index]
    }
}

impl IndexMut<usize> for Vector {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.data[index]
    }
}

impl<'a> IntoIterator for &'a Vector {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.data.iter().map(|v| format!("{v:.6}")).collect();
        write!(f, "[{}]", rendered.join(", "))
    }
}
