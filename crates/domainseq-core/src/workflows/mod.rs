//! # Workflows Module
//!
//! End-to-end procedures built from the engine.
//!
//! - **Prefilter** ([`prefilter`]) - Candidate domains of several lengths within an energy
//!   window, free of `{C,G}^4` runs and optionally GC-clamped.

pub mod prefilter;
