//! Code for reading interval set CSV files.
use super::{input_err_msg, read_csv};
use crate::interval::{IntervalDefinition, IntervalRegister};
use anyhow::{Context, Result};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// Read the interval sets listed in the model file into a new register.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
/// * `base_year` - The year from which interval offsets are measured
/// * `interval_sets` - Map of interval set name to CSV file path (relative to `model_dir`)
pub fn read_interval_register(
    model_dir: &Path,
    base_year: i32,
    interval_sets: &IndexMap<String, PathBuf>,
) -> Result<IntervalRegister> {
    let mut register = IntervalRegister::new(base_year);
    for (set_name, file_name) in interval_sets {
        let file_path = model_dir.join(file_name);
        let definitions: Vec<IntervalDefinition> = read_csv(&file_path)?;
        register
            .add_interval_set(set_name.as_str().into(), definitions)
            .with_context(|| input_err_msg(&file_path))?;
    }

    Ok(register)
}
