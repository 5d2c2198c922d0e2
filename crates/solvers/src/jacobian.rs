//! Finite-difference Jacobian of a reaction network.
//!
//! # Algorithm
//!
//! The Jacobian `J(m, n) = ∂ẏ_m/∂y_n` is built for `y = (X_1..X_N, e)`, but the
//! reaction rates are naturally evaluated at constant temperature. Columns are
//! therefore differenced with respect to `(X, T)` and converted afterwards:
//!
//! 1. Evaluate the baseline mass-fraction rates `ẏ`.
//! 2. Compute the perturbation floor `r0 = 1000·|h|·U·N·‖ẏ‖`, where `U` is
//!    machine epsilon and `‖·‖` is the RMS norm weighted by the inverse error
//!    weights (energy weight for the energy slot). A zero floor becomes 1.
//! 3. Each species column uses `δ = max(√U·|X_n|, r0·w_n)` and a one-sided
//!    difference. The perturbation is undone before the next column.
//! 4. The last column perturbs `T` by `max(√U·|T|, r0·w_T)`, brings the energy
//!    into agreement through the equation of state, and differences `ẏ`.
//! 5. At the unperturbed state the equation of state supplies `c_v` and
//!    `∂e/∂X_n|_T`. The temperature column is divided by `c_v` to give
//!    `∂ẏ/∂e`, and each species column becomes
//!    `∂ẏ/∂X_n|_e = ∂ẏ/∂X_n|_T − ∂e/∂X_n|_T · ∂ẏ/∂e`.
//! 6. Optional post-processing from [`IntegratorConfig`]: energy row and column
//!    scaling, an overall boost factor, and a zeroed energy row when energy
//!    integration is disabled.
//!
//! # Temperature guard
//!
//! If the perturbed temperature is at or below the equation of state's
//! minimum, or at or above `max_temp`, the whole matrix is zeroed and
//! [`JacobianStatus::TemperatureOutOfRange`] is returned. Callers should treat
//! this as a request to shrink the step.
//!
//! [`IntegratorConfig`]: nucleon_core::IntegratorConfig

mod error;

#[cfg(test)]
mod tests;

pub use error::Error;

use log::debug;
use nucleon_core::{BurnState, EquationOfState, Jacobian, ReactionRates};

use crate::ReactionSystem;

/// Machine epsilon.
const U: f64 = f64::EPSILON;

/// Outcome of a successful call to [`numerical_jacobian`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JacobianStatus {
    /// Every column was computed.
    Filled,

    /// The perturbed temperature left the valid range; the matrix is all zero.
    TemperatureOutOfRange,
}

/// Fills `jac` with the Jacobian of `system` at `state` with respect to the
/// packed `(X, e)` vector.
///
/// `state` must be thermodynamically consistent, with `t` and `e` related
/// through the system's equation of state. `h` is the current step size,
/// used only to size the perturbations.
///
/// See the [module docs](self) for the algorithm.
///
/// # Errors
///
/// Returns an error if `jac` or the state's composition does not match the
/// network, or if the rates or equation of state fail.
pub fn numerical_jacobian<R, E>(
    system: &ReactionSystem<R, E>,
    state: &BurnState,
    h: f64,
    jac: &mut Jacobian,
) -> Result<JacobianStatus, Error>
where
    R: ReactionRates,
    E: EquationOfState,
{
    let network = &system.network;
    let config = &system.config;
    let tol = &config.tolerances;

    let neqs = network.neqs();
    let num_spec = network.num_spec();
    let ienuc = network.ienuc();

    if jac.dim() != neqs {
        return Err(Error::Dimension {
            what: "jacobian",
            expected: neqs,
            found: jac.dim(),
        });
    }
    if state.xn.len() != num_spec {
        return Err(Error::Dimension {
            what: "composition",
            expected: num_spec,
            found: state.xn.len(),
        });
    }

    let mut ydotm = network.state_vector();
    system.mass_rates(state, &mut ydotm).map_err(Error::rates)?;

    let mut fac = 0.0;
    for (ydot, &x) in ydotm.iter().zip(state.xn.iter()) {
        let w = 1.0 / tol.species_weight(x);
        fac += (ydot * w) * (ydot * w);
    }
    // Weight the energy slot by energy even though T is differenced below.
    let w = 1.0 / tol.energy_weight(state.e);
    fac += (ydotm[ienuc] * w) * (ydotm[ienuc] * w);
    let fac = (fac / neqs as f64).sqrt();

    let mut r0 = 1000.0 * h.abs() * U * neqs as f64 * fac;
    if r0 == 0.0 {
        r0 = 1.0;
    }

    let mut delp = state.clone();
    let mut ydotp = network.state_vector();

    for n in 0..num_spec {
        let yj = delp.xn[n];
        let dy = (U.sqrt() * yj.abs()).max(r0 * tol.species_weight(yj));

        delp.xn[n] += dy;
        system.mass_rates(&delp, &mut ydotp).map_err(Error::rates)?;

        for m in 0..neqs {
            jac[(m, n)] = (ydotp[m] - ydotm[m]) / dy;
        }

        delp.xn[n] = yj;
    }

    let dy = (U.sqrt() * state.t.abs()).max(r0 * tol.energy_weight(state.t));
    delp.t += dy;

    if delp.t <= system.eos.min_temperature() || delp.t >= config.max_temp {
        debug!(
            "perturbed temperature {:e} K outside ({:e}, {:e}), zeroing jacobian",
            delp.t,
            system.eos.min_temperature(),
            config.max_temp,
        );
        jac.zero();
        return Ok(JacobianStatus::TemperatureOutOfRange);
    }

    network.sync_aux(&mut delp);
    system
        .eos
        .update_from_temperature(&mut delp)
        .map_err(Error::eos)?;
    system.mass_rates(&delp, &mut ydotp).map_err(Error::rates)?;

    for m in 0..neqs {
        jac[(m, ienuc)] = (ydotp[m] - ydotm[m]) / dy;
    }

    let mut eos_state = state.clone();
    network.sync_aux(&mut eos_state);
    let derivs = system
        .eos
        .update_from_energy(&mut eos_state)
        .map_err(Error::eos)?;

    // dydot/dT -> dydot/de
    for m in 0..neqs {
        jac[(m, ienuc)] *= 1.0 / derivs.cv;
    }

    // dydot/dX|_e = dydot/dX|_T - de/dX|_T · dydot/de
    for n in 0..num_spec {
        for m in 0..neqs {
            jac[(m, n)] -= derivs.dedx[n] * jac[(m, ienuc)];
        }
    }

    if let Some(scale) = config.energy_scale {
        for n in 0..neqs {
            jac[(ienuc, n)] /= scale;
        }
        for m in 0..neqs {
            jac[(m, ienuc)] *= scale;
        }
    }

    if let Some(boost) = config.react_boost {
        jac.scale(boost);
    }

    if !config.integrate_energy {
        jac.row_mut(ienuc).fill(0.0);
    }

    Ok(JacobianStatus::Filled)
}
