use std::convert::Infallible;

use approx::assert_relative_eq;
use nucleon_core::{
    BurnState, EquationOfState, IntegratorConfig, Jacobian, Network, ReactionRates, Rhs,
    Species, StateVector,
};
use nucleon_thermo::IdealGas;
use thiserror::Error;

use crate::ReactionSystem;

use super::{Error, JacobianStatus, numerical_jacobian};

fn alpha_network() -> Network {
    Network::new([
        Species::new("he4", 4.0, 2.0, 7.073915),
        Species::new("c12", 12.0, 6.0, 7.680144),
        Species::new("o16", 16.0, 8.0, 7.976206),
    ])
    .unwrap()
}

/// Triple-alpha and alpha capture on carbon with power-law temperature
/// dependence.
struct AlphaChain;

impl AlphaChain {
    const Q_3ALPHA: f64 = 5.8e17;
    const Q_C12_ALPHA: f64 = 4.3e17;
}

impl ReactionRates for AlphaChain {
    type Error = Infallible;

    fn rates(&self, state: &BurnState, ydot: &mut StateVector) -> Result<(), Infallible> {
        let t9 = state.t / 1.0e9;
        let y_he = state.xn[0] / 4.0;
        let y_c = state.xn[1] / 12.0;

        let r1 = t9.powi(3) * y_he.powi(3);
        let r2 = 0.5 * t9.powi(2) * y_c * y_he;

        ydot[0] = -3.0 * r1 - r2;
        ydot[1] = r1 - r2;
        ydot[2] = r2;
        ydot[3] = Self::Q_3ALPHA * r1 + Self::Q_C12_ALPHA * r2;
        Ok(())
    }
}

/// Temperature-independent rates `dY/dt = A·Y` with energy `Σ q_k Y_k`.
struct LinearRates;

impl LinearRates {
    const A: [[f64; 3]; 3] = [[-2.0, 0.0, 0.5], [1.0, -0.3, 0.0], [0.0, 0.3, -0.5]];
    const Q: [f64; 3] = [3.0e17, -1.0e17, 2.0e17];
}

impl ReactionRates for LinearRates {
    type Error = Infallible;

    fn rates(&self, state: &BurnState, ydot: &mut StateVector) -> Result<(), Infallible> {
        let a = [4.0, 12.0, 16.0];
        let y: [f64; 3] = std::array::from_fn(|k| state.xn[k] / a[k]);

        for (m, row) in Self::A.iter().enumerate() {
            ydot[m] = row.iter().zip(&y).map(|(c, yk)| c * yk).sum();
        }
        ydot[3] = Self::Q.iter().zip(&y).map(|(q, yk)| q * yk).sum();
        Ok(())
    }
}

#[derive(Debug, Error)]
#[error("rates unavailable")]
struct Unavailable;

struct FailingRates;

impl ReactionRates for FailingRates {
    type Error = Unavailable;

    fn rates(&self, _state: &BurnState, _ydot: &mut StateVector) -> Result<(), Unavailable> {
        Err(Unavailable)
    }
}

fn system<R: ReactionRates>(rates: R, config: IntegratorConfig) -> ReactionSystem<R, IdealGas> {
    let network = alpha_network();
    let eos = IdealGas::new(&network);
    ReactionSystem::new(network, rates, eos, config)
}

/// A consistent burn state: helium-rich at 2 GK.
fn burn<R: ReactionRates>(system: &ReactionSystem<R, IdealGas>) -> BurnState {
    let xn = system
        .network
        .mass_fractions([("he4", 0.5), ("c12", 0.3), ("o16", 0.2)])
        .unwrap();
    let mut state = BurnState::new(1.0e6, 2.0e9, xn).with_aux();
    system.network.sync_aux(&mut state);
    system.eos.update_from_temperature(&mut state).unwrap();
    state
}

fn jacobian<R: ReactionRates>(system: &ReactionSystem<R, IdealGas>, state: &BurnState) -> Jacobian {
    let mut jac = Jacobian::zeros(system.network.neqs()).unwrap();
    let status = numerical_jacobian(system, state, 1.0e-3, &mut jac).unwrap();
    assert_eq!(status, JacobianStatus::Filled);
    jac
}

#[test]
fn linear_rates_give_analytic_species_columns() {
    let sys = system(LinearRates, IntegratorConfig::default());
    let state = burn(&sys);
    let jac = jacobian(&sys, &state);
    let a = [4.0, 12.0, 16.0];

    for n in 0..3 {
        for m in 0..3 {
            let expected = a[m] * LinearRates::A[m][n] / a[n];
            assert_relative_eq!(jac[(m, n)], expected, epsilon = 1e-12, max_relative = 1e-6);
        }
        let expected = LinearRates::Q[n] / a[n];
        assert_relative_eq!(jac[(3, n)], expected, max_relative = 1e-6);
    }

    // No temperature dependence, so the energy column vanishes.
    assert!(jac.column(3).all(|v| v == 0.0));
}

#[test]
fn matches_direct_difference_in_mass_fraction_and_energy() {
    let sys = system(AlphaChain, IntegratorConfig::default());
    let state = burn(&sys);
    let jac = jacobian(&sys, &state);

    let y0 = sys.network.pack(&state, 0.0, 1.0).y;
    let neqs = sys.network.neqs();

    for n in 0..neqs {
        let step = 1.0e-6 * y0[n].abs();

        let mut plus = y0;
        plus[n] += step;
        let mut minus = y0;
        minus[n] -= step;

        let mut fp = sys.network.state_vector();
        let mut fm = sys.network.state_vector();
        sys.rhs(0.0, &state, &plus, &mut fp).unwrap();
        sys.rhs(0.0, &state, &minus, &mut fm).unwrap();

        for m in 0..neqs {
            let direct = (fp[m] - fm[m]) / (2.0 * step);
            assert_relative_eq!(jac[(m, n)], direct, max_relative = 1e-5);
        }
    }
}

#[test]
fn energy_row_is_zero_when_energy_integration_disabled() {
    let enabled = system(AlphaChain, IntegratorConfig::default());
    let disabled = system(
        AlphaChain,
        IntegratorConfig {
            integrate_energy: false,
            ..IntegratorConfig::default()
        },
    );
    let state = burn(&enabled);

    let full = jacobian(&enabled, &state);
    let jac = jacobian(&disabled, &state);

    assert!(jac.row(3).iter().all(|&v| v == 0.0));
    assert!(full.row(3).iter().all(|&v| v != 0.0));
    for m in 0..3 {
        assert_eq!(jac.row(m), full.row(m));
    }
}

#[test]
fn boost_scales_every_entry() {
    let single = system(
        AlphaChain,
        IntegratorConfig {
            react_boost: Some(1.0),
            ..IntegratorConfig::default()
        },
    );
    let double = system(
        AlphaChain,
        IntegratorConfig {
            react_boost: Some(2.0),
            ..IntegratorConfig::default()
        },
    );
    let state = burn(&single);

    let j1 = jacobian(&single, &state);
    let j2 = jacobian(&double, &state);

    for m in 0..4 {
        for n in 0..4 {
            assert_eq!(j2[(m, n)], 2.0 * j1[(m, n)]);
        }
    }
}

#[test]
fn energy_scale_rescales_energy_row_and_column() {
    let plain = system(AlphaChain, IntegratorConfig::default());
    let scaled = system(
        AlphaChain,
        IntegratorConfig {
            energy_scale: Some(8.0),
            ..IntegratorConfig::default()
        },
    );
    let state = burn(&plain);

    let raw = jacobian(&plain, &state);
    let jac = jacobian(&scaled, &state);

    for n in 0..3 {
        assert_eq!(jac[(3, n)], raw[(3, n)] / 8.0);
        assert_eq!(jac[(n, 3)], raw[(n, 3)] * 8.0);
        for m in 0..3 {
            assert_eq!(jac[(m, n)], raw[(m, n)]);
        }
    }
    assert_eq!(jac[(3, 3)], raw[(3, 3)]);
}

#[test]
fn temperature_above_limit_zeroes_everything() {
    let config = IntegratorConfig::default();
    let mut sys = system(AlphaChain, config);
    let state = burn(&sys);
    sys.config.max_temp = state.t * (1.0 + 1.0e-12);

    let mut jac = Jacobian::zeros(4).unwrap();
    for m in 0..4 {
        jac.row_mut(m).fill(1.0);
    }

    let status = numerical_jacobian(&sys, &state, 1.0e-3, &mut jac).unwrap();
    assert_eq!(status, JacobianStatus::TemperatureOutOfRange);
    assert!(jac.is_zero());
}

#[test]
fn temperature_below_eos_minimum_zeroes_everything() {
    let network = alpha_network();
    let eos = IdealGas::new(&network).with_min_temperature(1.0e10);
    let sys = ReactionSystem::new(network, AlphaChain, eos, IntegratorConfig::default());

    let xn = sys.network.mass_fractions([("he4", 1.0)]).unwrap();
    let mut state = BurnState::new(1.0e6, 2.0e9, xn);
    sys.eos.update_from_temperature(&mut state).unwrap();

    let mut jac = Jacobian::zeros(4).unwrap();
    let status = numerical_jacobian(&sys, &state, 1.0e-3, &mut jac).unwrap();
    assert_eq!(status, JacobianStatus::TemperatureOutOfRange);
    assert!(jac.is_zero());
}

#[test]
fn rate_failures_propagate() {
    let sys = system(FailingRates, IntegratorConfig::default());
    let state = burn(&sys);
    let mut jac = Jacobian::zeros(4).unwrap();

    let err = numerical_jacobian(&sys, &state, 1.0e-3, &mut jac).unwrap_err();
    assert!(matches!(err, Error::Rates(ref e) if e.to_string() == "rates unavailable"));
}

#[test]
fn rejects_mismatched_dimensions() {
    let sys = system(AlphaChain, IntegratorConfig::default());
    let state = burn(&sys);
    let mut jac = Jacobian::zeros(3).unwrap();

    assert!(matches!(
        numerical_jacobian(&sys, &state, 1.0e-3, &mut jac),
        Err(Error::Dimension {
            what: "jacobian",
            expected: 4,
            found: 3
        })
    ));
}
