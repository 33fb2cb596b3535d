use crate::core::thermo::model::EnergyModel;
use crate::engine::config::SequenceSetConfigBuilder;
use crate::engine::error::DesignError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::set::SequenceSet;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PrefilterConfig {
    #[serde(default = "default_lengths")]
    pub lengths: Vec<usize>,
    pub low_dg: f64,
    pub high_dg: f64,
    pub temperature: f64,
    /// Also apply [`SequenceSet::filter_end_gc`].
    #[serde(default)]
    pub end_gc: bool,
}

fn default_lengths() -> Vec<usize> {
    vec![10, 11]
}

impl PrefilterConfig {
    pub fn new(low_dg: f64, high_dg: f64, temperature: f64) -> Self {
        Self {
            lengths: default_lengths(),
            low_dg,
            high_dg,
            temperature,
            end_gc: false,
        }
    }
}

/// All 16 words of `{C,G}^4`.
pub fn strong_quadruplets() -> Vec<String> {
    (0..4)
        .map(|_| ['C', 'G'])
        .multi_cartesian_product()
        .map(|word| word.into_iter().collect())
        .collect()
}

/// Every sequence of each configured length whose duplex energy lies within
/// `[low_dg, high_dg]` and which holds no `{C,G}^4` run.
///
/// Fails with [`DesignError::EmptyResult`] as soon as one length has no survivors.
#[instrument(skip_all, name = "prefilter_workflow", fields(lengths = ?config.lengths))]
pub fn run(
    config: &PrefilterConfig,
    model: Arc<EnergyModel>,
    reporter: &ProgressReporter,
) -> Result<Vec<SequenceSet>, DesignError> {
    let forbidden = strong_quadruplets();
    let mut results = Vec::with_capacity(config.lengths.len());

    for &length in &config.lengths {
        reporter.report(Progress::PhaseStart {
            name: format!("Length {length}"),
        });

        let set = SequenceSet::from_config(
            SequenceSetConfigBuilder::new()
                .length(length)
                .energy_model(Arc::clone(&model))
                .build()?,
        )?;
        let mut set = set.filter_energy(config.low_dg, config.high_dg, config.temperature);
        reporter.report(Progress::StageComplete {
            stage: "energy",
            remaining: set.numseqs(),
        });

        set = set.filter_substring(&forbidden)?;
        reporter.report(Progress::StageComplete {
            stage: "strong-quadruplets",
            remaining: set.numseqs(),
        });

        if config.end_gc {
            info!("Removing domains ending in A or T, and requiring an A or T within 2 bases of each end.");
            set = set.filter_end_gc()?;
            reporter.report(Progress::StageComplete {
                stage: "end-gc",
                remaining: set.numseqs(),
            });
        }

        let set = set.require_nonempty(format!(
            "low_dg {:.2} and high_dg {:.2} too strict, no sequences of length {} found",
            config.low_dg, config.high_dg, length
        ))?;
        info!(length, candidates = set.numseqs(), "Prefilter complete for length.");
        reporter.report(Progress::PhaseFinish);
        results.push(set);
    }

    Ok(results)
}
