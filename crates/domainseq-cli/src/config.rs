mod builder;
mod defaults;
mod file;
mod models;

pub use builder::{build_generate_config, load_energy_model};
pub use models::GenerateAppConfig;
