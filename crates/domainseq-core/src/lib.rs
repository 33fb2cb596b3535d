//! # domainseq
//!
//! Generation, filtering and thermodynamic scoring of fixed-length DNA domain
//! sequences.
//!
//! ## Architecture
//!
//! The library follows three layers:
//!
//! - **[`core`]: The Foundation.** Stateless pieces: the symbol codec, the
//!   row-major code matrix, the nearest-neighbor energy model and the sequence
//!   list file format.
//!
//! - **[`engine`]: The Logic Core.** The stateful [`engine::set::SequenceSet`]
//!   with its filters and declarative pipelines, and the batched substring
//!   matcher that finds the longest or thermodynamically strongest common
//!   window between sequences.
//!
//! - **[`workflows`]: The Public API.** Complete procedures such as
//!   [`workflows::prefilter`], which produces candidate domains of given
//!   lengths inside an energy window.

pub mod core;
pub mod engine;
pub mod workflows;
