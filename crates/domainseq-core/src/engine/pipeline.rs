use super::error::DesignError;
use super::progress::{Progress, ProgressReporter};
use super::set::SequenceSet;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// One declarative filter stage.
///
/// Deserializes from tables tagged by `type`, e.g.
/// `{ type = "energy", low = -9.6, high = -9.0, temperature = 53.0 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "kebab-case")]
pub enum FilterStep {
    Energy {
        low: f64,
        high: f64,
        temperature: f64,
    },
    Hamming {
        threshold: usize,
    },
    Substring {
        substrings: Vec<String>,
    },
    BaseCount {
        base: char,
        low: usize,
        high: usize,
    },
    BaseAtPosition {
        position: usize,
        base: char,
    },
    BaseNowhere {
        base: char,
    },
    EndGc,
    EndAt {
        #[serde(default)]
        gc_near_end: bool,
    },
    GQuad,
    GQuadCQuad,
}

impl FilterStep {
    pub fn name(&self) -> &'static str {
        match self {
            FilterStep::Energy { .. } => "energy",
            FilterStep::Hamming { .. } => "hamming",
            FilterStep::Substring { .. } => "substring",
            FilterStep::BaseCount { .. } => "base-count",
            FilterStep::BaseAtPosition { .. } => "base-at-position",
            FilterStep::BaseNowhere { .. } => "base-nowhere",
            FilterStep::EndGc => "end-gc",
            FilterStep::EndAt { .. } => "end-at",
            FilterStep::GQuad => "g-quad",
            FilterStep::GQuadCQuad => "g-quad-c-quad",
        }
    }

    pub fn apply(&self, set: SequenceSet) -> Result<SequenceSet, DesignError> {
        match self {
            FilterStep::Energy {
                low,
                high,
                temperature,
            } => Ok(set.filter_energy(*low, *high, *temperature)),
            FilterStep::Hamming { threshold } => {
                let mut set = set;
                set.filter_hamming(*threshold);
                Ok(set)
            }
            FilterStep::Substring { substrings } => set.filter_substring(substrings),
            FilterStep::BaseCount { base, low, high } => set.filter_base_count(*base, *low, *high),
            FilterStep::BaseAtPosition { position, base } => {
                set.filter_base_at_pos(*position, *base)
            }
            FilterStep::BaseNowhere { base } => set.filter_base_nowhere(*base),
            FilterStep::EndGc => set.filter_end_gc(),
            FilterStep::EndAt { gc_near_end } => set.filter_end_at(*gc_near_end),
            FilterStep::GQuad => set.filter_g_quad(),
            FilterStep::GQuadCQuad => set.filter_g_quad_c_quad(),
        }
    }
}

/// An ordered list of filter stages applied one after another.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterPipeline {
    steps: Vec<FilterStep>,
}

impl FilterPipeline {
    pub fn new(steps: Vec<FilterStep>) -> Self {
        Self { steps }
    }

    pub fn push(&mut self, step: FilterStep) -> &mut Self {
        self.steps.push(step);
        self
    }

    pub fn steps(&self) -> &[FilterStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Runs every stage in order. An emptied set keeps flowing through the
    /// remaining stages; use [`SequenceSet::require_nonempty`] on the result
    /// when emptiness is fatal.
    #[instrument(skip_all, name = "filter_pipeline", fields(stages = self.steps.len()))]
    pub fn run(
        &self,
        set: SequenceSet,
        reporter: &ProgressReporter,
    ) -> Result<SequenceSet, DesignError> {
        reporter.report(Progress::PhaseStart {
            name: "Filtering".to_string(),
        });
        reporter.report(Progress::TaskStart {
            total_steps: self.steps.len() as u64,
        });

        let mut current = set;
        for step in &self.steps {
            current = step.apply(current)?;
            info!(stage = step.name(), remaining = current.numseqs(), "Stage complete.");
            reporter.report(Progress::StageComplete {
                stage: step.name(),
                remaining: current.numseqs(),
            });
            reporter.report(Progress::TaskIncrement);
        }

        reporter.report(Progress::TaskFinish);
        reporter.report(Progress::PhaseFinish);
        Ok(current)
    }
}
