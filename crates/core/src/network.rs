use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    BurnState, IntegrationState, MAX_NEQS, StateVector,
    constants::{C_LIGHT, M_ELECTRON, M_NEUTRON, M_PROTON, MEV_TO_GRAM, N_AVOGADRO},
};

/// A nuclide participating in a reaction network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    /// Short name, such as `"he4"` or `"c12"`. Must be unique in a network.
    pub name: String,
    /// Mass number.
    pub a: f64,
    /// Proton number.
    pub z: f64,
    /// Binding energy per nucleon in MeV.
    #[serde(default)]
    pub binding_energy_per_nucleon: f64,
}

impl Species {
    #[must_use]
    pub fn new(name: impl Into<String>, a: f64, z: f64, binding_energy_per_nucleon: f64) -> Self {
        Self {
            name: name.into(),
            a,
            z,
            binding_energy_per_nucleon,
        }
    }
}

/// Errors raised while describing a network or its composition.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NetworkError {
    #[error("network has no species")]
    Empty,

    #[error("network with {species} species exceeds the supported {max} equations")]
    TooManySpecies { species: usize, max: usize },

    #[error("species `{name}` appears more than once")]
    DuplicateSpecies { name: String },

    #[error("species `{name}` has invalid nuclear data: {reason}")]
    InvalidSpecies { name: String, reason: &'static str },

    #[error("unknown species `{name}`")]
    UnknownSpecies { name: String },

    #[error("mass fraction for `{name}` is {value}, outside [0, 1]")]
    MassFractionOutOfRange { name: String, value: f64 },

    #[error("expected {expected} values, got {found}")]
    LengthMismatch { expected: usize, found: usize },
}

/// Bulk composition variables derived from the mass fractions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Composition {
    /// Mean mass number.
    pub abar: f64,
    /// Mean charge.
    pub zbar: f64,
    /// Electron fraction.
    pub ye: f64,
    /// Mean binding energy per nucleon (MeV).
    pub bea: f64,
}

/// An immutable description of a reaction network.
///
/// The packed integration vector holds one mass fraction per species followed
/// by the specific internal energy, so `neqs() == num_spec() + 1` and the
/// energy slot is `ienuc()`.
///
/// Per-species binding energies and ion masses are computed once when the
/// network is built.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    species: Vec<Species>,
    binding_energy: Vec<f64>,
    ion_mass: Vec<f64>,
}

impl Network {
    /// Builds a network from its species list.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty, too long for the fixed-capacity
    /// buffers, contains duplicate names, or has unphysical `A`/`Z` values.
    pub fn new(species: impl IntoIterator<Item = Species>) -> Result<Self, NetworkError> {
        let species: Vec<Species> = species.into_iter().collect();

        if species.is_empty() {
            return Err(NetworkError::Empty);
        }
        if species.len() + 1 > MAX_NEQS {
            return Err(NetworkError::TooManySpecies {
                species: species.len(),
                max: MAX_NEQS,
            });
        }

        for (i, s) in species.iter().enumerate() {
            if species[..i].iter().any(|other| other.name == s.name) {
                return Err(NetworkError::DuplicateSpecies {
                    name: s.name.clone(),
                });
            }
            if !s.a.is_finite() || s.a <= 0.0 {
                return Err(NetworkError::InvalidSpecies {
                    name: s.name.clone(),
                    reason: "mass number must be positive",
                });
            }
            if !s.z.is_finite() || s.z < 0.0 || s.z > s.a {
                return Err(NetworkError::InvalidSpecies {
                    name: s.name.clone(),
                    reason: "charge must lie in [0, A]",
                });
            }
            if !s.binding_energy_per_nucleon.is_finite() {
                return Err(NetworkError::InvalidSpecies {
                    name: s.name.clone(),
                    reason: "binding energy must be finite",
                });
            }
        }

        let binding_energy: Vec<f64> = species
            .iter()
            .map(|s| s.binding_energy_per_nucleon * s.a)
            .collect();

        let ion_mass = species
            .iter()
            .zip(&binding_energy)
            .map(|(s, bion)| {
                (s.a - s.z) * M_NEUTRON + s.z * (M_PROTON + M_ELECTRON) - bion * MEV_TO_GRAM
            })
            .collect();

        Ok(Self {
            species,
            binding_energy,
            ion_mass,
        })
    }

    /// Number of species.
    #[must_use]
    pub fn num_spec(&self) -> usize {
        self.species.len()
    }

    /// Number of integrated equations: species plus energy.
    #[must_use]
    pub fn neqs(&self) -> usize {
        self.species.len() + 1
    }

    /// Index of the energy slot in packed vectors.
    #[must_use]
    pub fn ienuc(&self) -> usize {
        self.species.len()
    }

    #[must_use]
    pub fn species(&self) -> &[Species] {
        &self.species
    }

    /// Looks up a species index by name.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.species.iter().position(|s| s.name == name)
    }

    /// Mass number of species `i`.
    #[must_use]
    pub fn aion(&self, i: usize) -> f64 {
        self.species[i].a
    }

    /// Proton number of species `i`.
    #[must_use]
    pub fn zion(&self, i: usize) -> f64 {
        self.species[i].z
    }

    /// Binding energy of a whole nucleus of species `i` (MeV).
    #[must_use]
    pub fn binding_energy(&self, i: usize) -> f64 {
        self.binding_energy[i]
    }

    /// Rest mass of an ion of species `i` (g).
    #[must_use]
    pub fn ion_mass(&self, i: usize) -> f64 {
        self.ion_mass[i]
    }

    /// A zeroed vector sized for the packed integration state.
    #[must_use]
    pub fn state_vector(&self) -> StateVector {
        StateVector::zeros(self.neqs())
    }

    /// A zeroed vector sized for the species mass fractions.
    #[must_use]
    pub fn species_vector(&self) -> StateVector {
        StateVector::zeros(self.num_spec())
    }

    /// Converts molar-fraction rates `dY/dt` to mass-fraction rates `dX/dt`
    /// in place by multiplying each species slot by its mass number.
    ///
    /// Slots past the species (energy, auxiliary) are left untouched.
    pub fn molar_to_mass_rates(&self, ydot: &mut [f64]) {
        for (rate, s) in ydot.iter_mut().zip(&self.species) {
            *rate *= s.a;
        }
    }

    /// Specific nuclear energy generation rate (erg g⁻¹ s⁻¹) implied by the
    /// molar rates of change `dY/dt` of the species.
    ///
    /// Computed from the change in rest mass: `ε̇ = −N_A c² Σ Ẏ_i m_i`.
    #[must_use]
    pub fn energy_release_rate(&self, molar_rates: &[f64]) -> f64 {
        let dm: f64 = molar_rates
            .iter()
            .zip(&self.ion_mass)
            .map(|(ydot, m)| ydot * m)
            .sum();
        -dm * N_AVOGADRO * C_LIGHT * C_LIGHT
    }

    /// Builds a mass-fraction vector from a keyed mapping of species name to
    /// mass fraction. Species that are not named are set to zero.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown names or values outside `[0, 1]`.
    pub fn mass_fractions<K, I>(&self, values: I) -> Result<StateVector, NetworkError>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, f64)>,
    {
        let mut xn = self.species_vector();
        for (name, value) in values {
            let name = name.as_ref();
            let i = self
                .index_of(name)
                .ok_or_else(|| NetworkError::UnknownSpecies {
                    name: name.to_owned(),
                })?;
            if !(0.0..=1.0).contains(&value) {
                return Err(NetworkError::MassFractionOutOfRange {
                    name: name.to_owned(),
                    value,
                });
            }
            xn[i] = value;
        }
        Ok(xn)
    }

    /// Computes the bulk composition variables for a set of mass fractions.
    #[must_use]
    pub fn composition(&self, xn: &[f64]) -> Composition {
        let mut inv_abar = 0.0;
        let mut ye = 0.0;
        let mut bea = 0.0;
        for (x, s) in xn.iter().zip(&self.species) {
            inv_abar += x / s.a;
            ye += x * s.z / s.a;
            bea += x * s.binding_energy_per_nucleon;
        }

        let abar = if inv_abar > 0.0 { 1.0 / inv_abar } else { 0.0 };

        Composition {
            abar,
            zbar: abar * ye,
            ye,
            bea,
        }
    }

    /// Refreshes the cached auxiliary composition of `state`, if it carries one,
    /// so that it is consistent with the current mass fractions.
    pub fn sync_aux(&self, state: &mut BurnState) {
        if state.aux.is_some() {
            state.aux = Some(self.composition(&state.xn));
        }
    }

    /// Packs the mass fractions and energy of `state` into an integration state.
    #[must_use]
    pub fn pack(&self, state: &BurnState, t: f64, tout: f64) -> IntegrationState {
        let mut y = self.state_vector();
        y[..self.num_spec()].copy_from_slice(&state.xn);
        y[self.ienuc()] = state.e;
        IntegrationState { t, tout, y }
    }

    /// Copies the mass fractions and energy held in `y` into `state`, refreshing
    /// any cached auxiliary composition. Temperature is left for the caller to
    /// recompute from the equation of state.
    ///
    /// # Errors
    ///
    /// Returns an error if `y` does not have `neqs()` entries.
    pub fn unpack(&self, y: &[f64], state: &mut BurnState) -> Result<(), NetworkError> {
        if y.len() != self.neqs() {
            return Err(NetworkError::LengthMismatch {
                expected: self.neqs(),
                found: y.len(),
            });
        }
        state.xn = self.species_vector();
        state.xn.copy_from_slice(&y[..self.num_spec()]);
        state.e = y[self.ienuc()];
        self.sync_aux(state);
        Ok(())
    }
}
