//! # Engine Module
//!
//! Stateful sequence sets and the algorithms that reduce and compare them.
//!
//! ## Overview
//!
//! A [`set::SequenceSet`] is built once from a validated
//! [`config::SequenceSetConfig`] and then narrowed by filters. Filters return
//! new sets (the Hamming filter is the one in-place exception), so a chain of
//! filters reads as a pipeline of values; [`pipeline`] makes that chain
//! declarative. The [`matcher`] compares the raw matrices of two sets.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Construction sources, builder and validation
//! - **Sequence Sets** ([`set`]) - Enumeration, sampling, accessors and mutators
//! - **Filters** ([`filters`]) - Energy, Hamming, substring, base and end-composition filters
//! - **Pipelines** ([`pipeline`]) - Serializable filter stages applied in order
//! - **Substring Matching** ([`matcher`]) - Longest and strongest common windows in every batching shape
//! - **Progress Monitoring** ([`progress`]) - Progress events for long-running work
//! - **Error Handling** ([`error`]) - The umbrella [`error::DesignError`]

pub mod config;
pub mod error;
pub mod filters;
pub mod matcher;
pub mod pipeline;
pub mod progress;
pub mod set;
