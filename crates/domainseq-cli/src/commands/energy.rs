use super::{load_set, open_output};
use crate::cli::EnergyArgs;
use crate::config::load_energy_model;
use crate::error::Result;
use serde::Serialize;
use tracing::info;

#[derive(Serialize)]
struct EnergyRecord<'a> {
    sequence: &'a str,
    energy: f64,
}

pub fn run(args: EnergyArgs) -> Result<()> {
    let model = load_energy_model(args.params.as_deref())?;
    let set = load_set(&args.input, &model)?;

    info!(
        "Computing duplex energies of {} sequences at {:.1} C.",
        set.numseqs(),
        args.temperature
    );
    let energies = set.energies(args.temperature);
    let sequences = set.to_list();

    let mut writer = csv::Writer::from_writer(open_output(args.output.as_deref())?);
    for (sequence, energy) in sequences.iter().zip(&energies) {
        writer.serialize(EnergyRecord {
            sequence,
            energy: *energy,
        })?;
    }
    writer.flush()?;
    Ok(())
}
