use std::{
    fmt,
    ops::{Deref, DerefMut, Index, IndexMut},
};

use thiserror::Error;

/// Maximum number of equations (species plus energy) supported by the
/// stack-allocated buffers.
pub const MAX_NEQS: usize = 64;

/// Returned when a buffer is requested with more entries than [`MAX_NEQS`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("requested length {requested} exceeds buffer capacity {max}")]
pub struct CapacityError {
    pub requested: usize,
    pub max: usize,
}

/// A fixed-capacity vector of `f64` values living on the stack.
///
/// The backing storage is always [`MAX_NEQS`] long, while the logical length
/// is chosen at runtime. This lets the same compiled kernels serve networks of
/// any size up to the capacity without heap allocation.
///
/// `StateVector` dereferences to `[f64]`, so slice methods and indexing work
/// directly on the logical contents.
#[derive(Clone, Copy)]
pub struct StateVector {
    data: [f64; MAX_NEQS],
    len: usize,
}

impl StateVector {
    /// Creates a zero-filled vector of the given length.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if `len` exceeds [`MAX_NEQS`].
    pub fn try_zeros(len: usize) -> Result<Self, CapacityError> {
        if len > MAX_NEQS {
            return Err(CapacityError {
                requested: len,
                max: MAX_NEQS,
            });
        }
        Ok(Self {
            data: [0.0; MAX_NEQS],
            len,
        })
    }

    /// Creates a zero-filled vector of the given length.
    ///
    /// # Panics
    ///
    /// Panics if `len` exceeds [`MAX_NEQS`]. Lengths derived from a
    /// [`Network`](crate::Network) never do.
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        assert!(len <= MAX_NEQS, "state vector length {len} exceeds {MAX_NEQS}");
        Self {
            data: [0.0; MAX_NEQS],
            len,
        }
    }

    /// Creates a vector holding a copy of `values`.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if `values` is longer than [`MAX_NEQS`].
    pub fn from_slice(values: &[f64]) -> Result<Self, CapacityError> {
        let mut v = Self::try_zeros(values.len())?;
        v.copy_from_slice(values);
        Ok(v)
    }

    /// Sets every entry to zero.
    pub fn fill_zero(&mut self) {
        self.data[..self.len].fill(0.0);
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data[..self.len]
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data[..self.len]
    }
}

impl Deref for StateVector {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        self.as_slice()
    }
}

impl DerefMut for StateVector {
    fn deref_mut(&mut self) -> &mut [f64] {
        self.as_mut_slice()
    }
}

impl PartialEq for StateVector {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl fmt::Debug for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// A square, fixed-capacity matrix of partial derivatives.
///
/// Entry `(m, n)` holds `∂ẏ_m/∂y_n`. Storage is row-major with capacity
/// [`MAX_NEQS`] × [`MAX_NEQS`]; only the leading `dim` × `dim` block is
/// meaningful.
#[derive(Clone)]
pub struct Jacobian {
    data: [[f64; MAX_NEQS]; MAX_NEQS],
    dim: usize,
}

impl Jacobian {
    /// Creates a zero matrix of dimension `dim`.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if `dim` exceeds [`MAX_NEQS`].
    pub fn zeros(dim: usize) -> Result<Self, CapacityError> {
        if dim > MAX_NEQS {
            return Err(CapacityError {
                requested: dim,
                max: MAX_NEQS,
            });
        }
        Ok(Self {
            data: [[0.0; MAX_NEQS]; MAX_NEQS],
            dim,
        })
    }

    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Sets every entry to zero.
    pub fn zero(&mut self) {
        for row in &mut self.data[..self.dim] {
            row[..self.dim].fill(0.0);
        }
    }

    /// Multiplies every entry by `factor`.
    pub fn scale(&mut self, factor: f64) {
        for row in &mut self.data[..self.dim] {
            for value in &mut row[..self.dim] {
                *value *= factor;
            }
        }
    }

    /// Returns `true` if every entry is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.data[..self.dim]
            .iter()
            .all(|row| row[..self.dim].iter().all(|&v| v == 0.0))
    }

    /// Returns row `m` as a slice of length `dim`.
    #[must_use]
    pub fn row(&self, m: usize) -> &[f64] {
        &self.data[m][..self.dim]
    }

    pub fn row_mut(&mut self, m: usize) -> &mut [f64] {
        &mut self.data[m][..self.dim]
    }

    /// Iterates over column `n`.
    pub fn column(&self, n: usize) -> impl Iterator<Item = f64> + '_ {
        self.data[..self.dim].iter().map(move |row| row[n])
    }
}

impl Index<(usize, usize)> for Jacobian {
    type Output = f64;

    fn index(&self, (m, n): (usize, usize)) -> &f64 {
        debug_assert!(m < self.dim && n < self.dim);
        &self.data[m][n]
    }
}

impl IndexMut<(usize, usize)> for Jacobian {
    fn index_mut(&mut self, (m, n): (usize, usize)) -> &mut f64 {
        debug_assert!(m < self.dim && n < self.dim);
        &mut self.data[m][n]
    }
}

impl fmt::Debug for Jacobian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries((0..self.dim).map(|m| self.row(m)))
            .finish()
    }
}
