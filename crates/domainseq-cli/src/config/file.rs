use crate::error::{CliError, Result};
use domainseq::core::alphabet::Alphabet;
use domainseq::engine::pipeline::FilterStep;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileGenerateConfig {
    pub length: Option<usize>,
    pub alphabet: Option<Alphabet>,
    pub sample_count: Option<usize>,
    pub input: Option<PathBuf>,
    pub seed: Option<u64>,
    pub shuffle: Option<bool>,
    pub params: Option<PathBuf>,
    pub temperature: Option<f64>,
}

/// On-disk layout of a `generate` run:
///
/// ```toml
/// [generate]
/// length = 8
/// seed = 7
///
/// [[filters]]
/// type = "energy"
/// low = -9.6
/// high = -9.0
/// temperature = 53.0
/// ```
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub generate: Option<FileGenerateConfig>,
    #[serde(default)]
    pub filters: Vec<FilterStep>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parses_generate_section_and_filter_list() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.toml");
        fs::write(
            &path,
            r#"
            [generate]
            length = 6
            alphabet = "ACT"
            seed = 11

            [[filters]]
            type = "g-quad-c-quad"

            [[filters]]
            type = "base-count"
            base = "A"
            low = 1
            high = 3
            "#,
        )
        .unwrap();

        let config = FileConfig::from_file(&path).unwrap();
        let generate = config.generate.unwrap();
        assert_eq!(generate.length, Some(6));
        assert_eq!(generate.alphabet.unwrap().to_string(), "ACT");
        assert_eq!(generate.seed, Some(11));
        assert_eq!(
            config.filters,
            vec![
                FilterStep::GQuadCQuad,
                FilterStep::BaseCount {
                    base: 'A',
                    low: 1,
                    high: 3
                }
            ]
        );
    }

    #[test]
    fn unknown_keys_are_reported_with_the_file_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[generate]\nlenght = 6\n").unwrap();

        match FileConfig::from_file(&path) {
            Err(CliError::FileParsing { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("Expected FileParsing error, got {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let result = FileConfig::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
