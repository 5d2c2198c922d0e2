//! Physical constants in CGS units.

/// Avogadro's number (mol⁻¹).
pub const N_AVOGADRO: f64 = 6.022_141_793_0e23;

/// Speed of light (cm s⁻¹).
pub const C_LIGHT: f64 = 2.997_924_58e10;

/// Boltzmann constant (erg K⁻¹).
pub const K_BOLTZMANN: f64 = 1.380_650_424e-16;

/// Neutron mass (g).
pub const M_NEUTRON: f64 = 1.674_927_211_84e-24;

/// Proton mass (g).
pub const M_PROTON: f64 = 1.672_621_637_83e-24;

/// Electron mass (g).
pub const M_ELECTRON: f64 = 9.109_382_15e-28;

/// One MeV in erg.
pub const MEV_TO_ERG: f64 = 1.602_176_487_40e-6;

/// Mass equivalent of one MeV (g).
pub const MEV_TO_GRAM: f64 = MEV_TO_ERG / (C_LIGHT * C_LIGHT);

/// Ideal gas constant `N_A · k_B` (erg mol⁻¹ K⁻¹).
pub const GAS_CONSTANT: f64 = N_AVOGADRO * K_BOLTZMANN;
