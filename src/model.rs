//! Models which can be composed into a system-of-systems simulation.
//!
//! There are three kinds of model:
//!
//! * [`ScenarioModel`]s, which provide exogenous data as outputs
//! * [`SectorModel`]s, which run a simulation of an infrastructure sector
//! * [`SosModel`]s, which contain other models and wire their outputs to each other's inputs
use crate::dependency::{Dependency, RelativeTimestep};
use crate::error::config_bail;
use crate::id::{ModelID, PortName};
use crate::port::{PortPath, PortSpec};
use crate::value::DataMap;
use anyhow::Result;
use indexmap::IndexMap;
use log::debug;
use std::fmt::Display;

pub mod scenario;
pub use scenario::ScenarioModel;
pub mod sector;
pub use sector::{CommandExecutable, Executable, IdentityExecutable, SectorModel};
pub mod sos;
pub use sos::SosModel;

/// A map of port names to their specifications
pub type PortMap = IndexMap<PortName, PortSpec>;

/// A map of sink input names to the dependencies feeding them
pub type DependencyMap = IndexMap<PortName, Vec<Dependency>>;

/// The kind of a [`Model`]
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
pub enum ModelKind {
    /// A [`ScenarioModel`]
    Scenario,
    /// A [`SectorModel`]
    Sector,
    /// A [`SosModel`]
    Sos,
}

impl Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelKind::Scenario => write!(f, "scenario"),
            ModelKind::Sector => write!(f, "sector"),
            ModelKind::Sos => write!(f, "system-of-systems"),
        }
    }
}

/// The timestep being simulated, along with the results of the timestep before it
#[derive(Clone, Copy, Debug)]
pub struct Timestep<'a> {
    /// The year being simulated
    pub year: u32,
    /// The results of the model for the previous timestep, if there was one
    pub previous: Option<&'a DataMap>,
}

impl Timestep<'_> {
    /// The first timestep of a run, which has no prior state
    pub fn first(year: u32) -> Self {
        Self {
            year,
            previous: None,
        }
    }
}

/// Something which can be simulated for a single timestep
pub trait Simulate {
    /// Run the simulation.
    ///
    /// # Arguments
    ///
    /// * `data` - Input data for the model, keyed by input name (or, for a system-of-systems
    ///   model, by child model name)
    /// * `timestep` - The timestep to simulate
    ///
    /// # Returns
    ///
    /// The model results, keyed by output name (or by child model name).
    fn simulate(&self, data: &DataMap, timestep: &Timestep) -> Result<DataMap>;
}

/// The attributes common to all kinds of model
#[derive(Clone, Debug)]
pub struct ModelBase {
    /// The model's name, unique within the containing model
    pub name: ModelID,
    /// Human-readable description
    pub description: String,
    inputs: PortMap,
    outputs: PortMap,
    parameters: PortMap,
    dependencies: DependencyMap,
}

impl ModelBase {
    /// Create a new [`ModelBase`] with no ports
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            inputs: PortMap::new(),
            outputs: PortMap::new(),
            parameters: PortMap::new(),
            dependencies: DependencyMap::new(),
        }
    }

    /// Add a port to one of the port maps, checking for duplicates
    fn add_port(ports: &mut PortMap, model: &ModelID, kind: &str, spec: PortSpec) -> Result<()> {
        if ports.contains_key(&spec.name) {
            config_bail!("{kind} '{}' is already defined in '{model}' model", spec.name);
        }
        ports.insert(spec.name.clone(), spec);

        Ok(())
    }

    /// Check whether `dependency` can be added alongside those already feeding the same input.
    ///
    /// An input can be fed by two dependencies only if they read from different timesteps and
    /// at least one of them comes from a scenario model.
    fn check_binding(&self, dependency: &Dependency) -> Result<()> {
        let existing = self
            .dependencies
            .get(&dependency.sink_input.name)
            .map(Vec::as_slice)
            .unwrap_or_default();
        match existing {
            [] => Ok(()),
            [other]
                if other.timestep != dependency.timestep
                    && (other.is_from_scenario() || dependency.is_from_scenario()) =>
            {
                Ok(())
            }
            _ => config_bail!(
                "Input '{}' of '{}' model already has a dependency",
                dependency.sink_input.name,
                self.name
            ),
        }
    }
}

/// A model of any kind
#[derive(Clone, Debug)]
pub enum Model {
    /// A scenario model
    Scenario(ScenarioModel),
    /// A sector model
    Sector(SectorModel),
    /// A system-of-systems model
    Sos(SosModel),
}

impl Model {
    fn base(&self) -> &ModelBase {
        match self {
            Model::Scenario(model) => &model.base,
            Model::Sector(model) => &model.base,
            Model::Sos(model) => &model.base,
        }
    }

    fn base_mut(&mut self) -> &mut ModelBase {
        match self {
            Model::Scenario(model) => &mut model.base,
            Model::Sector(model) => &mut model.base,
            Model::Sos(model) => &mut model.base,
        }
    }

    /// The model's name
    pub fn name(&self) -> &ModelID {
        &self.base().name
    }

    /// The model's description
    pub fn description(&self) -> &str {
        &self.base().description
    }

    /// Set the model's description
    pub fn set_description(&mut self, description: &str) {
        self.base_mut().description = description.to_string();
    }

    /// What kind of model this is
    pub fn kind(&self) -> ModelKind {
        match self {
            Model::Scenario(_) => ModelKind::Scenario,
            Model::Sector(_) => ModelKind::Sector,
            Model::Sos(_) => ModelKind::Sos,
        }
    }

    /// The model as a [`ScenarioModel`], if it is one
    pub fn as_scenario_mut(&mut self) -> Option<&mut ScenarioModel> {
        match self {
            Model::Scenario(model) => Some(model),
            _ => None,
        }
    }

    /// The model's declared inputs
    pub fn inputs(&self) -> &PortMap {
        &self.base().inputs
    }

    /// The model's declared outputs
    pub fn outputs(&self) -> &PortMap {
        &self.base().outputs
    }

    /// The model's declared parameters
    pub fn parameters(&self) -> &PortMap {
        &self.base().parameters
    }

    /// The dependencies feeding this model's inputs, keyed by input name
    pub fn dependencies(&self) -> &DependencyMap {
        &self.base().dependencies
    }

    /// Declare a new input
    pub fn add_input(&mut self, spec: PortSpec) -> Result<()> {
        match self.kind() {
            ModelKind::Sector => {}
            kind => config_bail!("A {kind} model cannot have inputs ('{}')", self.name()),
        }
        let base = self.base_mut();
        ModelBase::add_port(&mut base.inputs, &base.name, "Input", spec)
    }

    /// Declare a new output
    pub fn add_output(&mut self, spec: PortSpec) -> Result<()> {
        if self.kind() == ModelKind::Sos {
            config_bail!(
                "A system-of-systems model cannot declare its own outputs ('{}')",
                self.name()
            );
        }
        let base = self.base_mut();
        ModelBase::add_port(&mut base.outputs, &base.name, "Output", spec)
    }

    /// Declare a new parameter
    pub fn add_parameter(&mut self, spec: PortSpec) -> Result<()> {
        if self.kind() != ModelKind::Sector {
            config_bail!("A {} model cannot have parameters ('{}')", self.kind(), self.name());
        }
        let base = self.base_mut();
        ModelBase::add_port(&mut base.parameters, &base.name, "Parameter", spec)
    }

    /// Build a dependency from an output of `source` to an input of this model, without adding
    /// it.
    ///
    /// Fails if the output or input is not declared, or if this model is a system-of-systems
    /// model (dependencies are wired between its children instead).
    pub fn dependency_from(
        &self,
        source: &Model,
        source_output: &str,
        sink_input: &str,
        timestep: RelativeTimestep,
    ) -> Result<Dependency> {
        if self.kind() == ModelKind::Sos {
            config_bail!(
                "Cannot add a dependency to system-of-systems model '{}'; add it to one of its \
                 models instead",
                self.name()
            );
        }
        let Some(output) = source.outputs().get(source_output) else {
            config_bail!(
                "Output '{source_output}' is not defined in '{}' model",
                source.name()
            );
        };
        let Some(input) = self.inputs().get(sink_input) else {
            config_bail!("Input '{sink_input}' is not defined in '{}' model", self.name());
        };

        Ok(Dependency::new(
            source.name().clone(),
            source.kind(),
            output.clone(),
            self.name().clone(),
            input.clone(),
            timestep,
        ))
    }

    /// Add a dependency from an output of `source` to an input of this model.
    ///
    /// See [`Model::dependency_from`] and [`Model::insert_dependency`] for the checks performed.
    pub fn add_dependency(
        &mut self,
        source: &Model,
        source_output: &str,
        sink_input: &str,
        timestep: RelativeTimestep,
    ) -> Result<()> {
        let dependency = self.dependency_from(source, source_output, sink_input, timestep)?;
        self.insert_dependency(dependency)
    }

    /// Add an already-built dependency to this model.
    ///
    /// Each input can have at most one dependency, except that two dependencies reading from
    /// different timesteps may share an input if at least one of them comes from a scenario
    /// model.
    pub fn insert_dependency(&mut self, dependency: Dependency) -> Result<()> {
        let base = self.base_mut();
        if dependency.sink_model != base.name {
            config_bail!(
                "Cannot add {dependency} to '{}' model: it has a different sink",
                base.name
            );
        }
        if !base.inputs.contains_key(&dependency.sink_input.name) {
            config_bail!(
                "Input '{}' is not defined in '{}' model",
                dependency.sink_input.name,
                base.name
            );
        }
        base.check_binding(&dependency)?;

        debug!("Adding {dependency}");
        base.dependencies
            .entry(dependency.sink_input.name.clone())
            .or_default()
            .push(dependency);

        Ok(())
    }

    /// Inputs which are not fed by any dependency.
    ///
    /// For a system-of-systems model, these are the free inputs of all its models, prefixed with
    /// the name of the model they belong to.
    pub fn free_inputs(&self) -> Vec<PortPath> {
        match self {
            Model::Sos(sos) => sos.free_inputs(),
            _ => {
                let base = self.base();
                base.inputs
                    .keys()
                    .filter(|name| !base.dependencies.contains_key(*name))
                    .cloned()
                    .map(PortPath::local)
                    .collect()
            }
        }
    }
}

impl Simulate for Model {
    fn simulate(&self, data: &DataMap, timestep: &Timestep) -> Result<DataMap> {
        debug!("Simulating {} model '{}' for {}", self.kind(), self.name(), timestep.year);
        match self {
            Model::Scenario(model) => model.simulate(data, timestep),
            Model::Sector(model) => model.simulate(data, timestep),
            Model::Sos(model) => model.simulate(data, timestep),
        }
    }
}

impl From<ScenarioModel> for Model {
    fn from(model: ScenarioModel) -> Self {
        Model::Scenario(model)
    }
}

impl From<SectorModel> for Model {
    fn from(model: SectorModel) -> Self {
        Model::Sector(model)
    }
}

impl From<SosModel> for Model {
    fn from(model: SosModel) -> Self {
        Model::Sos(model)
    }
}
