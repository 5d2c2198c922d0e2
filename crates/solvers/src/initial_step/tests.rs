use std::convert::Infallible;

use approx::assert_relative_eq;
use nucleon_core::{BurnState, IntegrationState, IntegratorConfig, Rhs, StateVector};
use thiserror::Error;

use super::{Error, initial_timestep};

/// Uniform exponential decay `ẏ = −λ·y`.
struct Decay {
    lambda: f64,
}

impl Rhs for Decay {
    type Error = Infallible;

    fn rhs(
        &self,
        _t: f64,
        _burn: &BurnState,
        y: &StateVector,
        ydot: &mut StateVector,
    ) -> Result<(), Infallible> {
        *ydot = *y;
        ydot.iter_mut().for_each(|v| *v *= -self.lambda);
        Ok(())
    }
}

#[derive(Debug, Error)]
#[error("network blew up")]
struct BlewUp;

struct Failing;

impl Rhs for Failing {
    type Error = BlewUp;

    fn rhs(
        &self,
        _t: f64,
        _burn: &BurnState,
        _y: &StateVector,
        _ydot: &mut StateVector,
    ) -> Result<(), BlewUp> {
        Err(BlewUp)
    }
}

fn burn() -> BurnState {
    BurnState::new(1.0e6, 1.0e9, StateVector::from_slice(&[0.5, 0.5]).unwrap())
}

fn state(tout: f64) -> IntegrationState {
    IntegrationState {
        t: 0.0,
        tout,
        y: StateVector::from_slice(&[0.5, 0.5, 1.0]).unwrap(),
    }
}

fn estimate(lambda: f64, state: &IntegrationState, config: &IntegratorConfig) -> f64 {
    let rhs = Decay { lambda };
    let mut ydot = state.y;
    rhs.rhs(state.t, &burn(), &state.y, &mut ydot).unwrap();
    initial_timestep(&rhs, &burn(), state, &ydot, config).unwrap()
}

/// Weighted RMS norm of `ÿ = λ²·y`, which is exact for linear decay.
fn decay_norm(lambda: f64, y: &[f64], config: &IntegratorConfig) -> f64 {
    let mut ewt = StateVector::from_slice(y).unwrap();
    config.tolerances.error_weights(y, y.len() - 1, &mut ewt);
    let sum: f64 = y
        .iter()
        .zip(ewt.iter())
        .map(|(v, w)| (lambda * lambda * v * w).powi(2))
        .sum();
    (sum / y.len() as f64).sqrt()
}

#[test]
fn stiff_systems_use_curvature_limited_step() {
    let config = IntegratorConfig::default();
    let s = state(1.0);

    let mild = estimate(1.0e6, &s, &config);
    let stiff = estimate(1.0e8, &s, &config);
    assert!(stiff < mild);

    let expected = (2.0 / decay_norm(1.0e8, &s.y, &config)).sqrt();
    assert_relative_eq!(stiff, expected, max_relative = 1e-10);
}

#[test]
fn smooth_systems_approach_upper_bound() {
    let config = IntegratorConfig::default();
    let s = state(1.0);

    let h_low = 100.0 * f64::EPSILON;
    let h_high = 0.1;
    let mut expected = (h_low * h_high).sqrt();
    for _ in 0..4 {
        expected = (expected * h_high).sqrt();
    }

    let h = estimate(1.0, &s, &config);
    assert_relative_eq!(h, expected, max_relative = 1e-12);
}

#[test]
fn step_stays_within_bounds() {
    let config = IntegratorConfig::default();

    for tout in [1.0e-6, 1.0, 1.0e3] {
        let s = state(tout);
        for lambda in [0.0, 1.0, 1.0e4, 1.0e9, 1.0e14] {
            let h = estimate(lambda, &s, &config);
            assert!(
                h >= 100.0 * f64::EPSILON * tout && h <= 0.1 * tout,
                "lambda {lambda}, tout {tout}: step {h} out of bounds"
            );
        }
    }
}

#[test]
fn max_step_caps_result() {
    let config = IntegratorConfig {
        ode_max_dt: 1.0e-7,
        ..IntegratorConfig::default()
    };
    let h = estimate(1.0, &state(1.0), &config);
    assert_eq!(h, 1.0e-7);
}

#[test]
fn input_state_is_unchanged() {
    let config = IntegratorConfig::default();
    let s = state(2.0);
    let before = s.clone();

    let _ = estimate(1.0e7, &s, &config);

    assert_eq!(s.y.as_slice(), before.y.as_slice());
    assert_eq!(s.t.to_bits(), before.t.to_bits());
    assert_eq!(s.tout.to_bits(), before.tout.to_bits());
}

#[test]
fn rejects_invalid_duration() {
    let config = IntegratorConfig::default();
    let rhs = Decay { lambda: 1.0 };

    for tout in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let s = state(tout);
        let err = initial_timestep(&rhs, &burn(), &s, &s.y, &config).unwrap_err();
        assert!(matches!(err, Error::InvalidDuration(_)));
    }
}

#[test]
fn rejects_mismatched_derivative() {
    let config = IntegratorConfig::default();
    let s = state(1.0);
    let ydot = StateVector::zeros(2);

    let err = initial_timestep(&Decay { lambda: 1.0 }, &burn(), &s, &ydot, &config).unwrap_err();
    assert!(matches!(
        err,
        Error::LengthMismatch {
            expected: 3,
            found: 2
        }
    ));
}

#[test]
fn rhs_failure_propagates() {
    let config = IntegratorConfig::default();
    let s = state(1.0);

    let err = initial_timestep(&Failing, &burn(), &s, &s.y, &config).unwrap_err();
    assert!(matches!(err, Error::Rhs(ref e) if e.to_string() == "network blew up"));
}
