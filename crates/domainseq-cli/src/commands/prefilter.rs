use crate::cli::PrefilterArgs;
use crate::config::load_energy_model;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use domainseq::engine::progress::ProgressReporter;
use domainseq::workflows::prefilter::{self, PrefilterConfig};
use std::path::{Path, PathBuf};
use tracing::info;

pub fn run(args: PrefilterArgs) -> Result<()> {
    if args.lengths.is_empty() {
        return Err(CliError::Argument(
            "--lengths requires at least one value".to_string(),
        ));
    }
    if args.low_dg > args.high_dg {
        return Err(CliError::Argument(format!(
            "--low-dg ({}) must not exceed --high-dg ({})",
            args.low_dg, args.high_dg
        )));
    }

    let model = load_energy_model(args.params.as_deref())?;
    let config = PrefilterConfig {
        lengths: args.lengths,
        low_dg: args.low_dg,
        high_dg: args.high_dg,
        temperature: args.temperature,
        end_gc: args.end_gc,
    };

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Prefiltering domains of length(s) {:?} within [{}, {}] kcal/mol...",
        config.lengths, config.low_dg, config.high_dg
    );
    let sets = prefilter::run(&config, model, &reporter)?;

    std::fs::create_dir_all(&args.output_dir)?;
    for set in &sets {
        let path = output_path(&args.output_dir, set.seqlen());
        info!("Writing {} domains to {:?}", set.numseqs(), &path);
        set.write_to_path(&path)?;
        println!(
            "✓ {} domain(s) of length {} written to: {}",
            set.numseqs(),
            set.seqlen(),
            path.display()
        );
    }
    Ok(())
}

fn output_path(dir: &Path, length: usize) -> PathBuf {
    dir.join(format!("domains_{}.txt", length))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_files_are_named_by_length() {
        assert_eq!(
            output_path(Path::new("out"), 11),
            PathBuf::from("out/domains_11.txt")
        );
    }

    #[test]
    fn inverted_energy_window_is_rejected_before_work_starts() {
        let args = PrefilterArgs {
            lengths: vec![4],
            low_dg: -3.0,
            high_dg: -5.0,
            temperature: 37.0,
            end_gc: false,
            output_dir: PathBuf::from("unused"),
            params: None,
        };
        assert!(matches!(run(args), Err(CliError::Argument(_))));
    }
}
