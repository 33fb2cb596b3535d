use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileGenerateConfig};
use super::models::GenerateAppConfig;
use crate::cli::GenerateArgs;
use crate::error::{CliError, Result};
use domainseq::core::alphabet::Alphabet;
use domainseq::core::thermo::model::EnergyModel;
use domainseq::core::thermo::params::NearestNeighborParams;
use domainseq::engine::config::SequenceSetConfigBuilder;
use domainseq::engine::error::DesignError;
use domainseq::engine::pipeline::{FilterPipeline, FilterStep};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

enum Source {
    Length(usize),
    Input(PathBuf),
}

/// Built-in parameters unless a TOML parameter file is given.
pub fn load_energy_model(params: Option<&Path>) -> Result<Arc<EnergyModel>> {
    match params {
        Some(path) => {
            info!("Loading nearest-neighbor parameters from {:?}", path);
            let params = NearestNeighborParams::load(path).map_err(DesignError::from)?;
            Ok(Arc::new(EnergyModel::new(params)))
        }
        None => Ok(Arc::new(EnergyModel::default())),
    }
}

pub fn build_generate_config(args: &GenerateArgs) -> Result<GenerateAppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = match &args.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    let generate_file = file_config.generate.unwrap_or_default();

    let source = resolve_source(args, &generate_file)?;
    let alphabet = match &args.alphabet {
        Some(symbols) => Some(
            Alphabet::from_symbols(symbols.chars())
                .map_err(|e| CliError::Argument(format!("--alphabet: {}", e)))?,
        ),
        None => generate_file.alphabet,
    };
    let sample_count = args.sample_count.or(generate_file.sample_count);
    let seed = args.seed.or(generate_file.seed);
    let shuffle = args.shuffle || generate_file.shuffle.unwrap_or(defaults.shuffle);
    let temperature = args
        .temperature
        .or(generate_file.temperature)
        .unwrap_or(defaults.temperature);

    let params_path = args.params.as_deref().or(generate_file.params.as_deref());
    let model = load_energy_model(params_path)?;

    let mut builder = SequenceSetConfigBuilder::new()
        .shuffle(shuffle)
        .energy_model(model);
    builder = match source {
        Source::Length(length) => builder.length(length),
        Source::Input(path) => builder.source_file(path),
    };
    if let Some(alphabet) = alphabet {
        builder = builder.alphabet(alphabet);
    }
    if let Some(count) = sample_count {
        builder = builder.sample_count(count);
    }
    if let Some(seed) = seed {
        builder = builder.seed(seed);
    }
    let set_config = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let mut pipeline = FilterPipeline::new(file_config.filters);
    match (args.low_dg, args.high_dg) {
        (Some(low), Some(high)) => {
            pipeline.push(FilterStep::Energy {
                low,
                high,
                temperature,
            });
        }
        _ if args.temperature.is_some() => {
            warn!("--temperature has no effect without --low-dg and --high-dg.");
        }
        _ => {}
    }
    if args.exclude_quadruplexes {
        pipeline.push(FilterStep::GQuadCQuad);
    }
    if let Some(threshold) = args.hamming {
        pipeline.push(FilterStep::Hamming { threshold });
    }

    Ok(GenerateAppConfig {
        set_config,
        pipeline,
        output_path: args.output.clone(),
        require_nonempty: args.require_nonempty,
    })
}

fn resolve_source(args: &GenerateArgs, file: &FileGenerateConfig) -> Result<Source> {
    if let Some(path) = &args.input {
        return Ok(Source::Input(path.clone()));
    }
    if let Some(length) = args.length {
        return Ok(Source::Length(length));
    }
    match (&file.input, file.length) {
        (Some(path), None) => Ok(Source::Input(path.clone())),
        (None, Some(length)) => Ok(Source::Length(length)),
        (Some(_), Some(_)) => Err(CliError::Config(
            "`generate.length` and `generate.input` are mutually exclusive.".to_string(),
        )),
        (None, None) => Err(CliError::Config(
            "A sequence source is required: pass --length or --input, or set `generate.length` or `generate.input`.".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domainseq::engine::config::SetSource;
    use std::fs;
    use tempfile::tempdir;

    fn base_generate_args() -> GenerateArgs {
        GenerateArgs {
            output: PathBuf::from("out.txt"),
            config: None,
            length: None,
            alphabet: None,
            sample_count: None,
            input: None,
            seed: None,
            shuffle: false,
            params: None,
            low_dg: None,
            high_dg: None,
            temperature: None,
            exclude_quadruplexes: false,
            hamming: None,
            require_nonempty: false,
        }
    }

    #[test]
    fn cli_length_builds_an_enumeration_with_no_filters() {
        let mut args = base_generate_args();
        args.length = Some(5);

        let app = build_generate_config(&args).expect("build ok");
        assert_eq!(
            app.set_config.source,
            SetSource::Enumerate {
                length: 5,
                alphabet: Alphabet::full()
            }
        );
        assert!(app.pipeline.is_empty());
        assert!(!app.set_config.shuffle);
        assert_eq!(app.output_path, PathBuf::from("out.txt"));
    }

    #[test]
    fn missing_source_is_a_config_error() {
        let result = build_generate_config(&base_generate_args());
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn file_values_are_used_and_cli_flags_append_filters() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("config.toml");
        fs::write(
            &cfg_path,
            r#"
            [generate]
            length = 7
            alphabet = "ACG"
            sample-count = 50
            temperature = 53.0

            [[filters]]
            type = "end-gc"
            "#,
        )
        .unwrap();

        let mut args = base_generate_args();
        args.config = Some(cfg_path);
        args.low_dg = Some(-9.6);
        args.high_dg = Some(-9.0);
        args.hamming = Some(3);
        args.exclude_quadruplexes = true;

        let app = build_generate_config(&args).expect("build ok");
        assert_eq!(
            app.set_config.source,
            SetSource::Sample {
                length: 7,
                alphabet: Alphabet::from_symbols("ACG".chars()).unwrap(),
                count: 50
            }
        );
        assert_eq!(
            app.pipeline.steps(),
            &[
                FilterStep::EndGc,
                FilterStep::Energy {
                    low: -9.6,
                    high: -9.0,
                    temperature: 53.0
                },
                FilterStep::GQuadCQuad,
                FilterStep::Hamming { threshold: 3 },
            ]
        );
    }

    #[test]
    fn cli_source_overrides_file_source() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("config.toml");
        fs::write(&cfg_path, "[generate]\nlength = 9\nshuffle = true\n").unwrap();

        let mut args = base_generate_args();
        args.config = Some(cfg_path);
        args.input = Some(PathBuf::from("seed.txt"));

        let app = build_generate_config(&args).expect("build ok");
        assert_eq!(
            app.set_config.source,
            SetSource::File(PathBuf::from("seed.txt"))
        );
        assert!(app.set_config.shuffle);
    }

    #[test]
    fn alphabet_with_input_file_is_rejected() {
        let mut args = base_generate_args();
        args.input = Some(PathBuf::from("seed.txt"));
        args.alphabet = Some("AC".to_string());

        let result = build_generate_config(&args);
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn invalid_alphabet_is_an_argument_error() {
        let mut args = base_generate_args();
        args.length = Some(4);
        args.alphabet = Some("ACX".to_string());

        let result = build_generate_config(&args);
        assert!(matches!(result, Err(CliError::Argument(_))));
    }

    #[test]
    fn energy_window_defaults_to_body_temperature() {
        let mut args = base_generate_args();
        args.length = Some(4);
        args.low_dg = Some(-6.0);
        args.high_dg = Some(-4.0);

        let app = build_generate_config(&args).expect("build ok");
        assert_eq!(
            app.pipeline.steps(),
            &[FilterStep::Energy {
                low: -6.0,
                high: -4.0,
                temperature: 37.0
            }]
        );
    }

    #[test]
    fn missing_params_file_surfaces_a_core_error() {
        let dir = tempdir().unwrap();
        let result = load_energy_model(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(CliError::Core(DesignError::Params(_)))));
    }
}
