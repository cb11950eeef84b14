//! Common routines for handling input data.
use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use std::rc::Rc;

pub mod interval;
use interval::read_interval_register;
pub mod model;
use model::{ModelFile, build_sos_model};
pub mod region;
use region::read_region_register;

use crate::model::SosModel;

/// A model loaded from a model directory, ready to run
#[derive(Debug)]
pub struct LoadedModel {
    /// The system-of-systems model
    pub sos: SosModel,
    /// The years to simulate, in order
    pub timesteps: Vec<u32>,
}

/// Read a series of type `T`s from a CSV file.
///
/// Will raise an error if the file is empty.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
pub fn read_csv<T: DeserializeOwned>(file_path: &Path) -> Result<Vec<T>> {
    let vec: Vec<T> = csv::Reader::from_path(file_path)
        .with_context(|| input_err_msg(file_path))?
        .into_deserialize()
        .try_collect()
        .with_context(|| input_err_msg(file_path))?;
    ensure!(
        !vec.is_empty(),
        "CSV file {} cannot be empty",
        file_path.display()
    );

    Ok(vec)
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;

    Ok(toml_data)
}

/// Format an error message to include the file path. To be used with `anyhow::Context`.
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Check whether an iterator contains values that are sorted and unique
pub fn is_sorted_and_unique<T, I>(iter: I) -> bool
where
    T: PartialOrd + Clone,
    I: IntoIterator<Item = T>,
{
    iter.into_iter().tuple_windows().all(|(a, b)| a < b)
}

/// Read a model from the specified directory.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
///
/// # Returns
///
/// The model contained in the folder and the timesteps to simulate, or an error if the model is
/// invalid.
pub fn load_model<P: AsRef<Path>>(model_dir: P) -> Result<LoadedModel> {
    let model_dir = model_dir.as_ref();
    let model_file = ModelFile::from_path(model_dir)?;

    let intervals = read_interval_register(
        model_dir,
        model_file.base_year,
        &model_file.interval_sets,
    )?;
    let regions = read_region_register(model_dir, &model_file.region_sets)?;
    let mut sos = build_sos_model(model_dir, &model_file, &intervals, &regions)?;
    sos.set_interval_register(Rc::new(intervals));
    sos.set_region_register(Rc::new(regions));

    Ok(LoadedModel {
        sos,
        timesteps: model_file.timesteps,
    })
}
