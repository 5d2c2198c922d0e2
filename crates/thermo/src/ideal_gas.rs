use nucleon_core::{
    BurnState, EosDerivatives, EquationOfState, Network, constants::GAS_CONSTANT,
};
use uom::si::{f64::Pressure, pressure::pascal};

use crate::PropertyError;

/// Pascals per dyne per square centimeter.
const PASCAL_PER_BARYE: f64 = 0.1;

/// A fully ionized ideal gas of nuclei and electrons.
///
/// Each species contributes `(1 + Z)/A` particles per baryon, so the mean
/// molecular weight satisfies `1/μ = Σ X_i (1 + Z_i)/A_i` and
///
/// ```text
/// e   = (3/2) R T / μ
/// c_v = (3/2) R / μ
/// p   = ρ R T / μ
/// ```
///
/// The composition derivative of the energy at constant temperature is
/// `∂e/∂X_k = (3/2) R T (1 + Z_k)/A_k`.
#[derive(Debug, Clone, PartialEq)]
pub struct IdealGas {
    particles_per_baryon: Vec<f64>,
    min_temperature: f64,
}

impl IdealGas {
    /// Default lower temperature bound (K).
    pub const DEFAULT_MIN_TEMPERATURE: f64 = 1.0e4;

    /// Creates an ideal gas for the species of `network`.
    #[must_use]
    pub fn new(network: &Network) -> Self {
        let particles_per_baryon = network
            .species()
            .iter()
            .map(|s| (1.0 + s.z) / s.a)
            .collect();

        Self {
            particles_per_baryon,
            min_temperature: Self::DEFAULT_MIN_TEMPERATURE,
        }
    }

    /// Returns the model with a different lower temperature bound.
    #[must_use]
    pub fn with_min_temperature(self, min_temperature: f64) -> Self {
        Self {
            min_temperature,
            ..self
        }
    }

    /// Computes pressure with `p = ρ·R·T/μ`.
    ///
    /// # Errors
    ///
    /// Returns a [`PropertyError`] if the state has non-positive density or
    /// temperature, or a composition with no particles.
    pub fn pressure(&self, state: &BurnState) -> Result<Pressure, PropertyError> {
        check_positive("density", state.rho)?;
        check_positive("temperature", state.t)?;
        let inv_mu = self.inverse_mu(state)?;

        let p = state.rho * GAS_CONSTANT * state.t * inv_mu;
        Ok(Pressure::new::<pascal>(p * PASCAL_PER_BARYE))
    }

    /// Returns `1/μ` for the composition of `state`.
    fn inverse_mu(&self, state: &BurnState) -> Result<f64, PropertyError> {
        if state.xn.len() != self.particles_per_baryon.len() {
            return Err(PropertyError::InvalidInput(format!(
                "expected {} mass fractions, got {}",
                self.particles_per_baryon.len(),
                state.xn.len()
            )));
        }

        let inv_mu: f64 = state
            .xn
            .iter()
            .zip(&self.particles_per_baryon)
            .map(|(x, n)| x * n)
            .sum();

        if inv_mu.is_finite() && inv_mu > 0.0 {
            Ok(inv_mu)
        } else {
            Err(PropertyError::Undefined {
                property: "mean molecular weight",
                context: Some(format!("Σ X(1+Z)/A = {inv_mu}")),
            })
        }
    }
}

impl EquationOfState for IdealGas {
    type Error = PropertyError;

    fn min_temperature(&self) -> f64 {
        self.min_temperature
    }

    /// Sets `e = (3/2) R T / μ`.
    fn update_from_temperature(&self, state: &mut BurnState) -> Result<(), PropertyError> {
        check_positive("density", state.rho)?;
        check_positive("temperature", state.t)?;
        let inv_mu = self.inverse_mu(state)?;

        state.e = 1.5 * GAS_CONSTANT * state.t * inv_mu;
        Ok(())
    }

    /// Inverts `e = c_v T` for the temperature.
    fn update_from_energy(&self, state: &mut BurnState) -> Result<EosDerivatives, PropertyError> {
        check_positive("density", state.rho)?;
        check_positive("internal energy", state.e)?;
        let inv_mu = self.inverse_mu(state)?;

        let cv = 1.5 * GAS_CONSTANT * inv_mu;
        state.t = state.e / cv;

        let mut dedx = state.xn;
        for (d, n) in dedx.iter_mut().zip(&self.particles_per_baryon) {
            *d = 1.5 * GAS_CONSTANT * state.t * n;
        }

        Ok(EosDerivatives { cv, dedx })
    }
}

fn check_positive(name: &str, value: f64) -> Result<(), PropertyError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PropertyError::InvalidInput(format!(
            "{name} must be finite and positive, got {value}"
        )))
    }
}
