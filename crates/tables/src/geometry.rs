use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Interpolation scheme used for table lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationMode {
    /// Trilinear interpolation within the enclosing 2×2×2 cell.
    Linear,

    /// Tricubic interpolation over a 4×4×4 neighborhood.
    #[default]
    Cubic,
}

/// Errors that can occur when validating a [`TableGeometry`].
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum GeometryError {
    #[error("{axis} axis needs at least {required} nodes, got {found}")]
    TooFewNodes {
        axis: &'static str,
        required: usize,
        found: usize,
    },

    #[error("{axis} axis extent [{min}, {max}] must be finite and increasing")]
    BadExtent {
        axis: &'static str,
        min: f64,
        max: f64,
    },
}

/// A table coordinate: log₁₀ density, log₁₀ temperature, and electron
/// fraction, already clamped to the table bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogPoint {
    pub logrho: f64,
    pub logt: f64,
    pub ye: f64,
}

/// The regular grid underlying an NSE table.
///
/// Density and temperature nodes are uniformly spaced in log₁₀ and stored in
/// increasing order. Electron-fraction nodes are uniformly spaced and stored
/// in *decreasing* order, starting at `ye_max`.
///
/// Node indices are 1-based throughout, matching the row numbering of the
/// table file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableGeometry {
    pub nden: usize,
    pub logrho_min: f64,
    pub logrho_max: f64,
    pub ntemp: usize,
    pub logt_min: f64,
    pub logt_max: f64,
    pub nye: usize,
    pub ye_min: f64,
    pub ye_max: f64,
}

/// Subtracted before truncating to an index so that a query sitting exactly on
/// a node falls into the cell below it.
const INDEX_BIAS: f64 = 1.0e-6;

impl TableGeometry {
    /// Checks node counts and extents for the given interpolation mode.
    ///
    /// Linear lookups need two nodes per axis, cubic lookups need four.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`] describing the first problem found.
    pub fn validate(&self, mode: InterpolationMode) -> Result<(), GeometryError> {
        let required = match mode {
            InterpolationMode::Linear => 2,
            InterpolationMode::Cubic => 4,
        };

        let axes = [
            ("density", self.nden, self.logrho_min, self.logrho_max),
            ("temperature", self.ntemp, self.logt_min, self.logt_max),
            ("electron fraction", self.nye, self.ye_min, self.ye_max),
        ];

        for (axis, n, min, max) in axes {
            if n < required {
                return Err(GeometryError::TooFewNodes {
                    axis,
                    required,
                    found: n,
                });
            }
            if !min.is_finite() || !max.is_finite() || min >= max {
                return Err(GeometryError::BadExtent { axis, min, max });
            }
        }
        Ok(())
    }

    /// Returns `true` if every axis has enough nodes for a cubic stencil.
    #[must_use]
    pub fn supports_cubic(&self) -> bool {
        self.nden >= 4 && self.ntemp >= 4 && self.nye >= 4
    }

    /// Total number of grid nodes.
    #[must_use]
    pub fn npoints(&self) -> usize {
        self.nden * self.ntemp * self.nye
    }

    #[must_use]
    pub fn dlogrho(&self) -> f64 {
        (self.logrho_max - self.logrho_min) / (self.nden - 1) as f64
    }

    #[must_use]
    pub fn dlogt(&self) -> f64 {
        (self.logt_max - self.logt_min) / (self.ntemp - 1) as f64
    }

    #[must_use]
    pub fn dye(&self) -> f64 {
        (self.ye_max - self.ye_min) / (self.nye - 1) as f64
    }

    /// Flattens a 1-based `(density, temperature, Ye)` node index into the
    /// 1-based row number of the table.
    #[must_use]
    pub fn idx(&self, ir: usize, it: usize, ic: usize) -> usize {
        (ir - 1) * self.ntemp * self.nye + (it - 1) * self.nye + ic
    }

    /// log₁₀ density of node `ir`.
    #[must_use]
    pub fn logrho(&self, ir: usize) -> f64 {
        self.logrho_min + (ir - 1) as f64 * self.dlogrho()
    }

    /// log₁₀ temperature of node `it`.
    #[must_use]
    pub fn logt(&self, it: usize) -> f64 {
        self.logt_min + (it - 1) as f64 * self.dlogt()
    }

    /// Electron fraction of node `ic`. Decreases with `ic`.
    #[must_use]
    pub fn ye(&self, ic: usize) -> f64 {
        self.ye_max - (ic - 1) as f64 * self.dye()
    }

    /// Index of the node at or below `logrho`, limited so that a cell
    /// `[ir, ir + 1]` always exists.
    #[must_use]
    pub fn logrho_index(&self, logrho: f64) -> usize {
        lower_index((logrho - self.logrho_min) / self.dlogrho(), self.nden)
    }

    /// Index of the node at or below `logt`, limited so that a cell
    /// `[it, it + 1]` always exists.
    #[must_use]
    pub fn logt_index(&self, logt: f64) -> usize {
        lower_index((logt - self.logt_min) / self.dlogt(), self.ntemp)
    }

    /// Index of the node at or above `ye` (the axis is stored decreasing),
    /// limited so that a cell `[ic, ic + 1]` always exists.
    #[must_use]
    pub fn ye_index(&self, ye: f64) -> usize {
        lower_index((self.ye_max - ye) / self.dye(), self.nye)
    }

    /// Converts a physical state to table coordinates, projecting any
    /// out-of-range component onto the table boundary.
    #[must_use]
    pub fn clamp_point(&self, rho: f64, t: f64, ye: f64) -> LogPoint {
        LogPoint {
            logrho: rho.log10().clamp(self.logrho_min, self.logrho_max),
            logt: t.log10().clamp(self.logt_min, self.logt_max),
            ye: ye.clamp(self.ye_min, self.ye_max),
        }
    }
}

/// Truncates a fractional node offset to a 1-based index in `[1, n - 1]`.
fn lower_index(offset: f64, n: usize) -> usize {
    let i0 = (offset - INDEX_BIAS) as isize;
    (i0 + 1).clamp(1, n as isize - 1) as usize
}
