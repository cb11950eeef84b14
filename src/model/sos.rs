//! System-of-systems models, which couple other models together.
use super::{Model, ModelBase, ModelKind, Simulate, Timestep};
use crate::dependency::{Dependency, RelativeTimestep};
use crate::error::{config_bail, not_found_bail};
use crate::graph::evaluation_order;
use crate::id::ModelID;
use crate::interval::IntervalRegister;
use crate::port::PortPath;
use crate::region::RegionRegister;
use crate::value::{DataMap, Value};
use anyhow::Result;
use indexmap::IndexMap;
use itertools::Itertools;
use log::debug;
use std::rc::Rc;

/// A model composed of other models, whose outputs feed each other's inputs
#[derive(Clone, Debug)]
pub struct SosModel {
    pub(super) base: ModelBase,
    models: IndexMap<ModelID, Model>,
    intervals: Rc<IntervalRegister>,
    regions: Rc<RegionRegister>,
}

impl SosModel {
    /// Create a new, empty [`SosModel`]
    pub fn new(name: &str) -> Self {
        Self {
            base: ModelBase::new(name),
            models: IndexMap::new(),
            intervals: Rc::new(IntervalRegister::default()),
            regions: Rc::new(RegionRegister::new()),
        }
    }

    /// The name of the model
    pub fn name(&self) -> &ModelID {
        &self.base.name
    }

    /// Human-readable description
    pub fn description(&self) -> &str {
        &self.base.description
    }

    /// Set the model's description
    pub fn set_description(&mut self, description: &str) {
        self.base.description = description.to_string();
    }

    /// The models contained in this model, in the order they were added
    pub fn models(&self) -> &IndexMap<ModelID, Model> {
        &self.models
    }

    /// Get a contained model by name
    pub fn get_model(&self, name: &str) -> Result<&Model> {
        match self.models.get(name) {
            Some(model) => Ok(model),
            None => not_found_bail!("Model '{name}' is not part of '{}'", self.base.name),
        }
    }

    fn get_model_mut(&mut self, name: &str) -> Result<&mut Model> {
        match self.models.get_mut(name) {
            Some(model) => Ok(model),
            None => not_found_bail!("Model '{name}' is not part of '{}'", self.base.name),
        }
    }

    /// The interval register used to convert data between temporal resolutions
    pub fn interval_register(&self) -> &Rc<IntervalRegister> {
        &self.intervals
    }

    /// Set the interval register for this model and any system-of-systems models it contains
    pub fn set_interval_register(&mut self, intervals: Rc<IntervalRegister>) {
        for model in self.models.values_mut() {
            if let Model::Sos(sos) = model {
                sos.set_interval_register(Rc::clone(&intervals));
            }
        }
        self.intervals = intervals;
    }

    /// The region register used to convert data between spatial resolutions
    pub fn region_register(&self) -> &Rc<RegionRegister> {
        &self.regions
    }

    /// Set the region register for this model and any system-of-systems models it contains
    pub fn set_region_register(&mut self, regions: Rc<RegionRegister>) {
        for model in self.models.values_mut() {
            if let Model::Sos(sos) = model {
                sos.set_region_register(Rc::clone(&regions));
            }
        }
        self.regions = regions;
    }

    /// Add a model to this one
    pub fn add_model<M: Into<Model>>(&mut self, model: M) -> Result<()> {
        let mut model = model.into();
        if self.models.contains_key(model.name()) {
            config_bail!(
                "Model '{}' has already been added to '{}'",
                model.name(),
                self.base.name
            );
        }
        if let Model::Sos(sos) = &mut model {
            sos.set_interval_register(Rc::clone(&self.intervals));
            sos.set_region_register(Rc::clone(&self.regions));
        }

        debug!("Adding '{}' to '{}'", model.name(), self.base.name);
        self.models.insert(model.name().clone(), model);

        Ok(())
    }

    /// Add a dependency between two of the models contained in this one.
    ///
    /// The source and sink may be the same model, provided the dependency reads from the
    /// previous timestep.
    pub fn add_dependency(
        &mut self,
        source: &str,
        source_output: &str,
        sink: &str,
        sink_input: &str,
        timestep: RelativeTimestep,
    ) -> Result<()> {
        let dependency = self.get_model(sink)?.dependency_from(
            self.get_model(source)?,
            source_output,
            sink_input,
            timestep,
        )?;
        self.get_model_mut(sink)?.insert_dependency(dependency)
    }

    /// The free inputs of all contained models, prefixed with the name of their model
    pub fn free_inputs(&self) -> Vec<PortPath> {
        self.models
            .iter()
            .flat_map(|(name, model)| {
                model
                    .free_inputs()
                    .into_iter()
                    .map(move |path| path.prefixed(name.clone()))
            })
            .collect()
    }

    /// The outputs of all contained models, prefixed with the name of their model
    pub fn outputs(&self) -> Vec<PortPath> {
        self.models
            .iter()
            .flat_map(|(name, model)| {
                let outputs = match model {
                    Model::Sos(sos) => sos.outputs(),
                    _ => model.outputs().keys().cloned().map(PortPath::local).collect(),
                };
                outputs
                    .into_iter()
                    .map(move |path| path.prefixed(name.clone()))
            })
            .collect()
    }

    /// Gather the inputs for `model` from caller-supplied data and the results of its sources
    fn resolve_inputs(
        &self,
        model: &Model,
        data: &DataMap,
        results: &DataMap,
        timestep: &Timestep,
    ) -> Result<DataMap> {
        let supplied = data.get(model.name().as_str()).and_then(Value::as_map);
        if model.kind() == ModelKind::Sos {
            return Ok(supplied.cloned().unwrap_or_default());
        }

        let mut inputs = DataMap::new();
        for input in model.inputs().keys() {
            let value = match supplied.and_then(|supplied| supplied.get(input.as_str())) {
                Some(value) => value.clone(),
                None => self.resolve_dependency(model, input.as_str(), results, timestep)?,
            };
            inputs.insert(input.to_string(), value);
        }

        Ok(inputs)
    }

    /// Get the value of `input` for `model` from one of its dependencies.
    ///
    /// Dependencies on other sector models take precedence over those on scenario models.
    /// Dependencies on the previous timestep are skipped for the first timestep.
    ///
    /// The first dependency that resolves wins, whatever its timestep. So if an input has both a
    /// previous-timestep scenario dependency and a current-timestep sector dependency, the
    /// scenario data is never read.
    fn resolve_dependency(
        &self,
        model: &Model,
        input: &str,
        results: &DataMap,
        timestep: &Timestep,
    ) -> Result<Value> {
        let dependencies = model.dependencies().get(input).map(Vec::as_slice).unwrap_or_default();
        let dependencies = dependencies
            .iter()
            .sorted_by_key(|dependency| dependency.is_from_scenario())
            .collect_vec();
        for (index, dependency) in dependencies.iter().enumerate() {
            let source_results = match dependency.timestep {
                RelativeTimestep::Current => results.get(dependency.source_model.as_str()),
                RelativeTimestep::Previous => {
                    let Some(previous) = timestep.previous else {
                        continue;
                    };
                    previous.get(dependency.source_model.as_str())
                }
            };
            let Some(source_results) = source_results else {
                not_found_bail!(
                    "No results from '{}' model found for {dependency}",
                    dependency.source_model
                );
            };

            for unused in &dependencies[index + 1..] {
                debug!("Ignoring {unused} as '{input}' is supplied by {dependency}");
            }

            return self.read_dependency(dependency, source_results);
        }

        not_found_bail!("Dependency not found for '{input}' of model '{}'", model.name())
    }

    fn read_dependency(&self, dependency: &Dependency, source_results: &Value) -> Result<Value> {
        let output = dependency.source_output.name.as_str();
        let Some(value) = source_results.as_map().and_then(|map| map.get(output)) else {
            not_found_bail!(
                "Output '{output}' not found in results of '{}' model",
                dependency.source_model
            );
        };

        dependency.apply(value.clone(), &self.intervals, &self.regions)
    }
}

impl Simulate for SosModel {
    /// Simulate each contained model once, in an order which respects their dependencies.
    ///
    /// `data` may provide inputs for contained models, keyed by model name then input name.
    /// `timestep.previous` holds the results of this model for the previous timestep, which are
    /// read by dependencies on the previous timestep.
    fn simulate(&self, data: &DataMap, timestep: &Timestep) -> Result<DataMap> {
        let order = evaluation_order(self)?;
        debug!(
            "Simulation order for '{}': {}",
            self.base.name,
            order.iter().join(", ")
        );

        let mut results = DataMap::new();
        for name in order {
            let model = &self.models[&name];
            let inputs = self.resolve_inputs(model, data, &results, timestep)?;
            let model_timestep = Timestep {
                year: timestep.year,
                previous: timestep
                    .previous
                    .and_then(|previous| previous.get(name.as_str()))
                    .and_then(Value::as_map),
            };
            let model_results = model.simulate(&inputs, &model_timestep)?;
            results.insert(name.to_string(), Value::Map(model_results));
        }

        // Report results in the order the models were added
        Ok(self
            .models
            .keys()
            .filter_map(|name| results.shift_remove_entry(name.as_str()))
            .collect())
    }
}
