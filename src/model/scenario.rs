//! Scenario models provide exogenous data to other models.
use super::{ModelBase, Simulate, Timestep};
use crate::error::config_bail;
use crate::value::DataMap;
use anyhow::Result;
use std::collections::HashMap;

/// A model whose outputs are fixed data, e.g. population projections
#[derive(Clone, Debug)]
pub struct ScenarioModel {
    pub(super) base: ModelBase,
    data: DataMap,
    timestep_data: HashMap<u32, DataMap>,
}

impl ScenarioModel {
    /// Create a new [`ScenarioModel`] with no outputs
    pub fn new(name: &str) -> Self {
        Self {
            base: ModelBase::new(name),
            data: DataMap::new(),
            timestep_data: HashMap::new(),
        }
    }

    /// Check that every key of `data` is a declared output
    fn check_outputs(&self, data: &DataMap) -> Result<()> {
        for name in data.keys() {
            if !self.base.outputs.contains_key(name.as_str()) {
                config_bail!(
                    "Output '{name}' is not defined in '{}' model",
                    self.base.name
                );
            }
        }

        Ok(())
    }

    /// Set data which applies to every timestep, keyed by output name
    pub fn add_data(&mut self, data: DataMap) -> Result<()> {
        self.check_outputs(&data)?;
        self.data.extend(data);

        Ok(())
    }

    /// Set data for a single timestep, which takes precedence over data for all timesteps
    pub fn add_timestep_data(&mut self, year: u32, data: DataMap) -> Result<()> {
        self.check_outputs(&data)?;
        self.timestep_data.entry(year).or_default().extend(data);

        Ok(())
    }
}

impl Simulate for ScenarioModel {
    fn simulate(&self, _data: &DataMap, timestep: &Timestep) -> Result<DataMap> {
        let mut results = self.data.clone();
        if let Some(overrides) = self.timestep_data.get(&timestep.year) {
            results.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        Ok(results)
    }
}
