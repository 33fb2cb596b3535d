pub mod energy;
pub mod generate;
pub mod matching;
pub mod prefilter;

use crate::error::{CliError, Result};
use domainseq::core::thermo::model::EnergyModel;
use domainseq::engine::config::SequenceSetConfigBuilder;
use domainseq::engine::set::SequenceSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Reads a sequence list into a set scored with `model`.
fn load_set(path: &Path, model: &Arc<EnergyModel>) -> Result<SequenceSet> {
    info!("Loading sequence set from {:?}", path);
    let config = SequenceSetConfigBuilder::new()
        .source_file(path.to_path_buf())
        .energy_model(Arc::clone(model))
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;
    Ok(SequenceSet::from_config(config)?)
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => Ok(Box::new(BufWriter::new(File::create(path)?))),
        None => Ok(Box::new(io::stdout().lock())),
    }
}
