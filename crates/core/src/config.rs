use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Relative and absolute tolerances used to build error weights.
///
/// Species share one pair and the energy slot uses the other.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    pub rtol_spec: f64,
    pub atol_spec: f64,
    pub rtol_enuc: f64,
    pub atol_enuc: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            rtol_spec: 1e-12,
            atol_spec: 1e-8,
            rtol_enuc: 1e-6,
            atol_enuc: 1e-6,
        }
    }
}

impl Tolerances {
    /// Error weight `rtol_spec·|x| + atol_spec` for a species slot.
    #[must_use]
    pub fn species_weight(&self, x: f64) -> f64 {
        self.rtol_spec * x.abs() + self.atol_spec
    }

    /// Error weight `rtol_enuc·|v| + atol_enuc` for the energy slot.
    #[must_use]
    pub fn energy_weight(&self, v: f64) -> f64 {
        self.rtol_enuc * v.abs() + self.atol_enuc
    }

    /// Fills `ewt` with the error weights of the packed vector `y`, treating
    /// the first `num_spec` entries as species and the rest as energy.
    pub fn error_weights(&self, y: &[f64], num_spec: usize, ewt: &mut [f64]) {
        for (i, (w, &v)) in ewt.iter_mut().zip(y).enumerate() {
            *w = if i < num_spec {
                self.species_weight(v)
            } else {
                self.energy_weight(v)
            };
        }
    }
}

/// Settings shared by the Jacobian builder and the step-size estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratorConfig {
    pub tolerances: Tolerances,
    /// Upper bound on any integration step (s).
    pub ode_max_dt: f64,
    /// Largest temperature the integrator may visit (K).
    pub max_temp: f64,
    /// When `false`, the energy equation is frozen.
    pub integrate_energy: bool,
    /// Scale factor for the energy slot, improving conditioning when energy
    /// and mass fractions differ by orders of magnitude. `None` disables it.
    pub energy_scale: Option<f64>,
    /// Multiplier applied to all reaction rates. `None` disables it.
    pub react_boost: Option<f64>,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            tolerances: Tolerances::default(),
            ode_max_dt: 1e30,
            max_temp: 1e11,
            integrate_energy: true,
            energy_scale: None,
            react_boost: None,
        }
    }
}

/// Errors that can occur when validating an [`IntegratorConfig`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("relative tolerances must be finite and non-negative")]
    RelativeTolerance,

    #[error("absolute tolerances must be finite and positive")]
    AbsoluteTolerance,

    #[error("ode_max_dt must be positive")]
    MaxStep,

    #[error("max_temp must be finite and positive")]
    MaxTemperature,

    #[error("energy_scale must be finite and positive")]
    EnergyScale,

    #[error("react_boost must be finite and positive")]
    ReactBoost,
}

impl IntegratorConfig {
    /// Validates tolerances, limits, and optional factors.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tol = &self.tolerances;

        let rel_ok = |v: f64| v.is_finite() && v >= 0.0;
        let positive = |v: f64| v.is_finite() && v > 0.0;

        if !rel_ok(tol.rtol_spec) || !rel_ok(tol.rtol_enuc) {
            return Err(ConfigError::RelativeTolerance);
        }
        if !positive(tol.atol_spec) || !positive(tol.atol_enuc) {
            return Err(ConfigError::AbsoluteTolerance);
        }
        if self.ode_max_dt.is_nan() || self.ode_max_dt <= 0.0 {
            return Err(ConfigError::MaxStep);
        }
        if !positive(self.max_temp) {
            return Err(ConfigError::MaxTemperature);
        }
        if self.energy_scale.is_some_and(|s| !positive(s)) {
            return Err(ConfigError::EnergyScale);
        }
        if self.react_boost.is_some_and(|b| !positive(b)) {
            return Err(ConfigError::ReactBoost);
        }
        Ok(())
    }
}
