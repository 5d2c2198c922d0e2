use crate::{BurnState, StateVector};

/// Evaluates the reaction network right-hand side at constant temperature.
///
/// Implementations write molar-fraction rates `dY/dt` into the species slots
/// of `ydot` and the specific nuclear energy generation rate into the slot
/// that follows them. Any remaining slots are left untouched.
pub trait ReactionRates {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Computes the rates for `state`.
    ///
    /// # Errors
    ///
    /// Returns an error if the rates cannot be evaluated.
    fn rates(&self, state: &BurnState, ydot: &mut StateVector) -> Result<(), Self::Error>;
}

/// Heat capacity and composition derivatives returned by
/// [`EquationOfState::update_from_energy`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EosDerivatives {
    /// Specific heat at constant volume (erg g⁻¹ K⁻¹).
    pub cv: f64,
    /// `∂e/∂X_k` at constant density and temperature, one entry per species.
    pub dedx: StateVector,
}

/// An equation of state with the two call modes the burner needs.
pub trait EquationOfState {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Lowest temperature the equation of state accepts (K).
    fn min_temperature(&self) -> f64;

    /// Given density, temperature, and composition, sets the internal energy.
    ///
    /// # Errors
    ///
    /// Returns an error if the state is outside the model's domain.
    fn update_from_temperature(&self, state: &mut BurnState) -> Result<(), Self::Error>;

    /// Given density, internal energy, and composition, sets the temperature
    /// and returns `c_v` and the composition derivatives of the energy.
    ///
    /// # Errors
    ///
    /// Returns an error if the state is outside the model's domain or the
    /// inversion fails.
    fn update_from_energy(&self, state: &mut BurnState) -> Result<EosDerivatives, Self::Error>;
}

/// The integrator-level right-hand side: time derivative of the packed vector.
pub trait Rhs {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Computes `ydot = f(t, y)`.
    ///
    /// `burn` carries the thermodynamic context (density and any quantities
    /// held fixed during the step); `y` is the packed integration vector.
    ///
    /// # Errors
    ///
    /// Returns an error if the derivative cannot be evaluated.
    fn rhs(
        &self,
        t: f64,
        burn: &BurnState,
        y: &StateVector,
        ydot: &mut StateVector,
    ) -> Result<(), Self::Error>;
}
