//! # Thermodynamics Module
//!
//! Nearest-neighbor duplex energies for fixed-length DNA domains.
//!
//! ## Overview
//!
//! A duplex of a strand with its Watson-Crick complement is scored as the sum
//! of the stacking free energies of every adjacent pair of bases, with
//! `dG = dH - T * dS / 1000` evaluated at the requested temperature. No
//! secondary structure or partition function is computed.
//!
//! ## Key Components
//!
//! - [`params`] - Enthalpy/entropy stacking parameters (built-in or loaded from TOML)
//! - [`table`] - The 16-entry [`table::EnergyTable`] for one temperature
//! - [`model`] - [`model::EnergyModel`], which memoizes tables and scalar energies
//! - [`energy`] - Scalar and batched duplex energies, complements, loop penalty
//! - [`cache`] - Caller-owned cache of batched energies keyed by matrix content
//!
//! ## Usage
//!
//! ```ignore
//! use domainseq::core::thermo::model::EnergyModel;
//!
//! let model = EnergyModel::default();
//! let energies = model.duplex_energies(&matrix, 37.0, false);
//! ```

pub mod cache;
pub mod energy;
pub mod model;
pub mod params;
pub mod table;
