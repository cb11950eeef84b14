//! Code for reading region set CSV files.
//!
//! Each row gives one vertex of a region's outline. The vertices of a region are listed in order,
//! and regions appear in the set in the order of their first vertex.
use super::{input_err_msg, read_csv};
use crate::region::{RegionDefinition, RegionRegister};
use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// A row of a region set CSV file
#[derive(PartialEq, Debug, Deserialize)]
struct RegionVertexRow {
    region: String,
    x: f64,
    y: f64,
}

/// Group vertex rows into region definitions
fn region_definitions_from_iter<I>(iter: I) -> Vec<RegionDefinition>
where
    I: Iterator<Item = RegionVertexRow>,
{
    let mut vertices: IndexMap<String, Vec<(f64, f64)>> = IndexMap::new();
    for row in iter {
        vertices.entry(row.region).or_default().push((row.x, row.y));
    }

    vertices
        .into_iter()
        .map(|(name, vertices)| RegionDefinition { name, vertices })
        .collect()
}

/// Read the region sets listed in the model file into a new register.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
/// * `region_sets` - Map of region set name to CSV file path (relative to `model_dir`)
pub fn read_region_register(
    model_dir: &Path,
    region_sets: &IndexMap<String, PathBuf>,
) -> Result<RegionRegister> {
    let mut register = RegionRegister::new();
    for (set_name, file_name) in region_sets {
        let file_path = model_dir.join(file_name);
        let rows: Vec<RegionVertexRow> = read_csv(&file_path)?;
        register
            .add_region_set(
                set_name.as_str().into(),
                region_definitions_from_iter(rows.into_iter()),
            )
            .with_context(|| input_err_msg(&file_path))?;
    }

    Ok(register)
}
