//! The module responsible for writing output data to disk.
use crate::model::{Model, SosModel};
use crate::value::DataMap;
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

/// The root folder in which model-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "sosim_results";

/// The output file name for model results
const RESULTS_FILE_NAME: &str = "results.csv";

/// Get the output directory for the model in the specified directory
pub fn get_output_dir(model_dir: &Path) -> Result<PathBuf> {
    // Get the model name from the dir path. This ends up being convoluted because we need to check
    // for all possible errors.
    let model_dir = model_dir
        .canonicalize() // canonicalise in case the user has specified "."
        .context("Could not resolve path to model")?;

    let model_name = model_dir
        .file_name()
        .context("Model cannot be in root folder")?
        .to_str()
        .context("Invalid chars in model dir name")?;

    // Construct path
    Ok([OUTPUT_DIRECTORY_ROOT, model_name].iter().collect())
}

/// Create a new output directory for the model, if it doesn't already exist.
///
/// If the directory exists and is not empty, it is only reused if `allow_overwrite` is true, in
/// which case its contents are deleted.
///
/// # Returns
///
/// Whether an existing directory was overwritten.
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    let mut overwrite = false;
    if output_dir.is_dir() {
        let is_empty = output_dir.read_dir()?.next().is_none();
        if !is_empty {
            ensure!(
                allow_overwrite,
                "Output folder already exists and is not empty. Please delete the folder or pass \
                 the --overwrite command line option."
            );
            fs::remove_dir_all(output_dir)?;
            overwrite = true;
        }
    }

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// Represents a row in the results CSV file.
///
/// Outputs without a spatial resolution have an empty region, and those without a temporal
/// resolution an empty interval.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct ResultRow {
    timestep: u32,
    model: String,
    output: String,
    region: String,
    interval: String,
    value: f64,
}

/// An object for writing model results to file
pub struct DataWriter {
    results_writer: csv::Writer<File>,
}

impl DataWriter {
    /// Open CSV files to write output data to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    pub fn create(output_path: &Path) -> Result<Self> {
        let file_path = output_path.join(RESULTS_FILE_NAME);
        let results_writer = csv::Writer::from_path(&file_path)
            .with_context(|| format!("Could not create {}", file_path.display()))?;

        Ok(Self { results_writer })
    }

    /// Write the results of a system-of-systems model for one timestep.
    ///
    /// Results of nested system-of-systems models are written with the names of the models joined
    /// by dots.
    pub fn write_results(&mut self, timestep: u32, sos: &SosModel, results: &DataMap) -> Result<()> {
        self.write_sos_results(timestep, sos, results, "")
    }

    fn write_sos_results(
        &mut self,
        timestep: u32,
        sos: &SosModel,
        results: &DataMap,
        prefix: &str,
    ) -> Result<()> {
        for (name, model_results) in results {
            let Some(model_results) = model_results.as_map() else {
                continue;
            };
            let model_path = format!("{prefix}{name}");
            let model = sos.models().get(name.as_str());
            if let Some(Model::Sos(inner)) = model {
                self.write_sos_results(timestep, inner, model_results, &format!("{model_path}."))?;
                continue;
            }

            for (output, value) in model_results {
                let is_spatial = model
                    .and_then(|model| model.outputs().get(output.as_str()))
                    .is_some_and(|spec| spec.spatial_resolution.is_some());

                // Spatial data is keyed by region, then timeseries by interval name
                for (keys, number) in value.iter_leaves() {
                    let (region, interval) = match keys.split_first() {
                        Some((region, rest)) if is_spatial => {
                            ((*region).to_string(), rest.join("."))
                        }
                        _ => (String::new(), keys.join(".")),
                    };
                    self.results_writer.serialize(ResultRow {
                        timestep,
                        model: model_path.clone(),
                        output: output.clone(),
                        region,
                        interval,
                        value: number,
                    })?;
                }
            }
        }

        Ok(())
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        self.results_writer.flush()?;

        Ok(())
    }
}
