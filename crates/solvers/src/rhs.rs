//! The reaction network as seen by a stiff integrator.

use std::error::Error as StdError;

use nucleon_core::{
    BurnState, EquationOfState, IntegratorConfig, Network, NetworkError, ReactionRates, Rhs,
    StateVector,
};
use thiserror::Error;

/// Errors that can occur when evaluating a [`ReactionSystem`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("integration vector does not match the network")]
    Network(#[from] NetworkError),

    #[error("reaction rate evaluation failed")]
    Rates(#[source] Box<dyn StdError + Send + Sync>),

    #[error("equation of state call failed")]
    Eos(#[source] Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub(crate) fn rates(err: impl StdError + Send + Sync + 'static) -> Self {
        Self::Rates(Box::new(err))
    }

    pub(crate) fn eos(err: impl StdError + Send + Sync + 'static) -> Self {
        Self::Eos(Box::new(err))
    }
}

/// A reaction network together with its rates, equation of state, and
/// integrator settings.
///
/// Implements [`Rhs`] for the packed vector `y = (X_1..X_N, e)`: the energy
/// in `y` is converted to a temperature through the equation of state, the
/// molar rates are evaluated there, and the result is returned as
/// mass-fraction rates. With energy integration disabled the energy slot of
/// `ydot` is zero. A configured boost multiplies every entry.
#[derive(Debug, Clone)]
pub struct ReactionSystem<R, E> {
    pub network: Network,
    pub rates: R,
    pub eos: E,
    pub config: IntegratorConfig,
}

impl<R, E> ReactionSystem<R, E>
where
    R: ReactionRates,
    E: EquationOfState,
{
    #[must_use]
    pub fn new(network: Network, rates: R, eos: E, config: IntegratorConfig) -> Self {
        Self {
            network,
            rates,
            eos,
            config,
        }
    }

    /// Evaluates the rates at `state` and converts them to mass-fraction
    /// rates, leaving the energy slot as the rates returned it.
    ///
    /// `ydot` is reset to a zeroed vector of the network's length first.
    ///
    /// # Errors
    ///
    /// Returns the rate model's error if the rates cannot be evaluated.
    pub fn mass_rates(&self, state: &BurnState, ydot: &mut StateVector) -> Result<(), R::Error> {
        *ydot = self.network.state_vector();
        self.rates.rates(state, ydot)?;
        self.network.molar_to_mass_rates(ydot);
        Ok(())
    }
}

impl<R, E> Rhs for ReactionSystem<R, E>
where
    R: ReactionRates,
    E: EquationOfState,
{
    type Error = Error;

    fn rhs(
        &self,
        _t: f64,
        burn: &BurnState,
        y: &StateVector,
        ydot: &mut StateVector,
    ) -> Result<(), Error> {
        let mut state = burn.clone();
        self.network.unpack(y, &mut state)?;
        self.eos
            .update_from_energy(&mut state)
            .map_err(Error::eos)?;

        self.mass_rates(&state, ydot).map_err(Error::rates)?;

        if !self.config.integrate_energy {
            ydot[self.network.ienuc()] = 0.0;
        }
        if let Some(boost) = self.config.react_boost {
            ydot.iter_mut().for_each(|v| *v *= boost);
        }

        Ok(())
    }
}
