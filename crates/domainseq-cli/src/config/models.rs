use domainseq::engine::config::SequenceSetConfig;
use domainseq::engine::pipeline::FilterPipeline;
use std::path::PathBuf;

pub struct GenerateAppConfig {
    pub set_config: SequenceSetConfig,
    pub pipeline: FilterPipeline,
    pub output_path: PathBuf,
    pub require_nonempty: bool,
}
