//! Initial step-size estimate for a stiff integration.
//!
//! # Algorithm
//!
//! The step is bracketed by `h_low = 100·ε·t_out` and `h_high = 0.1·t_out` and
//! starts at their geometric mean. Each of at most four passes:
//!
//! 1. forms the trial point `y + h·ẏ` and evaluates the right-hand side there,
//! 2. estimates the second derivative `ÿ ≈ (ẏ_trial − ẏ)/h`,
//! 3. takes the RMS norm of `ÿ` weighted by the error weights of `y`,
//! 4. updates `h = √(2/‖ÿ‖)` if `‖ÿ‖·h_high² > 2`, otherwise `h = √(h·h_high)`.
//!
//! Iteration stops early once successive estimates agree within a factor of
//! two. The result is clamped to `[h_low, h_high]` and capped by
//! `ode_max_dt`.

mod error;

#[cfg(test)]
mod tests;

pub use error::Error;

use nucleon_core::{BurnState, IntegrationState, IntegratorConfig, Rhs, StateVector};

const MAX_PASSES: usize = 4;

/// Estimates a first step size for integrating `state` to `state.tout`.
///
/// `ydot` is the right-hand side at `state.y`. The last entry of `y` is
/// treated as the energy slot when forming error weights; all others are
/// species. `state` is only read.
///
/// The returned step lies in `[100·ε·t_out, 0.1·t_out]` unless `ode_max_dt`
/// is smaller, in which case `ode_max_dt` is returned.
///
/// # Errors
///
/// Returns an error if `tout` is not finite and positive, if `ydot` and `y`
/// differ in length, or if the right-hand side fails.
pub fn initial_timestep<F: Rhs>(
    rhs: &F,
    burn: &BurnState,
    state: &IntegrationState,
    ydot: &StateVector,
    config: &IntegratorConfig,
) -> Result<f64, Error> {
    let tout = state.tout;
    if !tout.is_finite() || tout <= 0.0 {
        return Err(Error::InvalidDuration(tout));
    }

    let y_old = &state.y;
    let neqs = y_old.len();
    if neqs == 0 {
        return Err(Error::EmptyState);
    }
    if ydot.len() != neqs {
        return Err(Error::LengthMismatch {
            expected: neqs,
            found: ydot.len(),
        });
    }

    let h_low = 100.0 * f64::EPSILON * tout;
    let h_high = 0.1 * tout;
    let mut h = (h_low * h_high).sqrt();

    let mut ewt = *y_old;
    config.tolerances.error_weights(y_old, neqs - 1, &mut ewt);

    let mut trial = *y_old;
    let mut ydot_trial = *ydot;

    for _ in 0..MAX_PASSES {
        let h_old = h;

        for ((yt, y), yd) in trial.iter_mut().zip(y_old.iter()).zip(ydot.iter()) {
            *yt = y + h * yd;
        }

        rhs.rhs(state.t, burn, &trial, &mut ydot_trial)
            .map_err(Error::rhs)?;

        let sum: f64 = ydot_trial
            .iter()
            .zip(ydot.iter())
            .zip(ewt.iter())
            .map(|((yt, y0), w)| {
                let ddy = (yt - y0) / h;
                (ddy * w) * (ddy * w)
            })
            .sum();
        let yddnorm = (sum / neqs as f64).sqrt();

        h = if yddnorm * h_high * h_high > 2.0 {
            (2.0 / yddnorm).sqrt()
        } else {
            (h * h_high).sqrt()
        };

        if h_old < 2.0 * h && h_old > 0.5 * h {
            break;
        }
    }

    Ok(h.clamp(h_low, h_high).min(config.ode_max_dt))
}
