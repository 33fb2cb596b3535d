use crate::cli::GenerateArgs;
use crate::config::build_generate_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use domainseq::engine::{progress::ProgressReporter, set::SequenceSet};
use tracing::{info, warn};

pub fn run(args: GenerateArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app_config = build_generate_config(&args)?;

    let set = SequenceSet::from_config(app_config.set_config)?;
    info!(
        "Initial set holds {} sequences of length {}.",
        set.numseqs(),
        set.seqlen()
    );

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Running {} filter stage(s) over {} sequences...",
        app_config.pipeline.steps().len(),
        set.numseqs()
    );
    let mut set = app_config.pipeline.run(set, &reporter)?;

    if app_config.require_nonempty {
        set = set.require_nonempty("no sequences survived the filter pipeline")?;
    } else if set.is_empty() {
        warn!("Filter pipeline removed every sequence; writing an empty set.");
    }

    set.write_to_path(&app_config.output_path)?;
    println!(
        "✓ {} sequence(s) written to: {}",
        set.numseqs(),
        app_config.output_path.display()
    );
    Ok(())
}
