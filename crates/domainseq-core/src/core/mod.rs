//! # Core Module
//!
//! Stateless building blocks shared by the engine: the symbol codec, the
//! columnar code matrix, the nearest-neighbor energy model and the persisted
//! set format.
//!
//! ## Architecture
//!
//! - **Symbol Codec** ([`alphabet`]) - Symbol/code mapping, sub-alphabets, string and batch conversion
//! - **Code Matrix** ([`matrix`]) - Row-major one-byte-per-base storage with bulk row operations
//! - **Energetics** ([`thermo`]) - Stacking parameters, energy tables and batched duplex energies
//! - **File I/O** ([`io`]) - Reading and writing sequence lists
//!
//! Codes are fixed: `A -> 0, C -> 1, G -> 2, T -> 3`, and the complement of a
//! code `c` is `3 - c`.

pub mod alphabet;
pub mod io;
pub mod matrix;
pub mod thermo;
