use uom::si::{
    f64::{MassDensity, ThermodynamicTemperature},
    mass_density::gram_per_cubic_centimeter,
    thermodynamic_temperature::kelvin,
};

use crate::{Composition, StateVector};

/// Thermodynamic state of a single burning zone, in CGS units.
///
/// The burn state is expected to be thermodynamically consistent, meaning the
/// temperature `t` and specific internal energy `e` agree through the
/// equation of state for the current density and composition.
#[derive(Debug, Clone, PartialEq)]
pub struct BurnState {
    /// Density (g cm⁻³).
    pub rho: f64,
    /// Temperature (K).
    pub t: f64,
    /// Specific internal energy (erg g⁻¹).
    pub e: f64,
    /// Species mass fractions.
    pub xn: StateVector,
    /// Cached auxiliary composition, kept in sync with `xn` when present.
    pub aux: Option<Composition>,
}

impl BurnState {
    /// Creates a burn state with the given density, temperature, and mass
    /// fractions. The energy is left at zero until an equation of state fills it.
    #[must_use]
    pub fn new(rho: f64, t: f64, xn: StateVector) -> Self {
        Self {
            rho,
            t,
            e: 0.0,
            xn,
            aux: None,
        }
    }

    /// Creates a burn state from dimensioned density and temperature.
    #[must_use]
    pub fn from_quantities(
        density: MassDensity,
        temperature: ThermodynamicTemperature,
        xn: StateVector,
    ) -> Self {
        Self::new(
            density.get::<gram_per_cubic_centimeter>(),
            temperature.get::<kelvin>(),
            xn,
        )
    }

    /// Returns the state with an auxiliary composition slot enabled.
    ///
    /// The slot is filled by [`Network::sync_aux`](crate::Network::sync_aux).
    #[must_use]
    pub fn with_aux(self) -> Self {
        Self {
            aux: Some(Composition::default()),
            ..self
        }
    }
}

/// The packed state handed to the stiff integrator.
///
/// `y` holds the species mass fractions followed by the specific internal
/// energy; see [`Network::pack`](crate::Network::pack).
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationState {
    /// Current integration time (s).
    pub t: f64,
    /// Duration of the integration (s).
    pub tout: f64,
    /// Packed unknowns.
    pub y: StateVector,
}
