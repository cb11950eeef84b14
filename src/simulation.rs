//! Functionality for running a system-of-systems model over several timesteps.
use crate::model::{Simulate, SosModel, Timestep};
use crate::output::DataWriter;
use crate::value::DataMap;
use anyhow::{Context, Result};
use log::info;
use std::path::Path;

/// Run the simulation.
///
/// Each timestep is simulated in turn, with the results of the previous timestep available to
/// dependencies which read from it.
///
/// # Arguments:
///
/// * `sos` - The model to run
/// * `timesteps` - The years to simulate, in order
/// * `output_path` - The folder to which results will be written
pub fn run(sos: &SosModel, timesteps: &[u32], output_path: &Path) -> Result<()> {
    let mut writer = DataWriter::create(output_path)?;
    run_with_writer(sos, timesteps, &mut writer)?;
    writer.flush()?;

    Ok(())
}

/// Run the simulation, writing each timestep's results with `writer`.
///
/// # Returns
///
/// The results of the final timestep.
pub fn run_with_writer(
    sos: &SosModel,
    timesteps: &[u32],
    writer: &mut DataWriter,
) -> Result<DataMap> {
    let mut previous: Option<DataMap> = None;
    for &year in timesteps {
        info!("Timestep: {year}");

        let timestep = Timestep {
            year,
            previous: previous.as_ref(),
        };
        let results = sos
            .simulate(&DataMap::new(), &timestep)
            .with_context(|| format!("Simulation failed for timestep {year}"))?;
        writer.write_results(year, sos, &results)?;
        previous = Some(results);
    }

    Ok(previous.unwrap_or_default())
}
