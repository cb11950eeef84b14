//! Metadata describing model inputs, outputs and parameters.
use crate::id::{IntervalSetID, ModelID, PortName, RegionSetID};
use itertools::Itertools;
use serde::Deserialize;
use std::fmt::Display;

/// Dimensional metadata for a model input, output or parameter
#[derive(PartialEq, Clone, Debug, Deserialize)]
pub struct PortSpec {
    /// Name of the port, unique among the model's ports of the same type
    pub name: PortName,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// The interval set in which data for this port is expressed, if it varies over the year
    #[serde(default)]
    pub temporal_resolution: Option<IntervalSetID>,
    /// The region set in which data for this port is expressed, if it varies over space
    #[serde(default)]
    pub spatial_resolution: Option<RegionSetID>,
    /// Units of the data
    #[serde(default)]
    pub units: Option<String>,
}

impl PortSpec {
    /// Create a new [`PortSpec`] with no temporal or spatial resolution and no units
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            temporal_resolution: None,
            spatial_resolution: None,
            units: None,
        }
    }

    /// Set the temporal resolution for the port
    pub fn with_temporal_resolution(mut self, set_name: &str) -> Self {
        self.temporal_resolution = Some(set_name.into());
        self
    }

    /// Set the spatial resolution for the port
    pub fn with_spatial_resolution(mut self, set_name: &str) -> Self {
        self.spatial_resolution = Some(set_name.into());
        self
    }

    /// Set the units for the port
    pub fn with_units(mut self, units: &str) -> Self {
        self.units = Some(units.to_string());
        self
    }
}

/// The location of an input within a (possibly nested) system-of-systems model.
///
/// For a leaf model, `models` is empty. Each enclosing composite prefixes the name of the child
/// model which owns the port.
#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub struct PortPath {
    /// Names of the models leading to the port, outermost first
    pub models: Vec<ModelID>,
    /// The name of the port
    pub port: PortName,
}

impl PortPath {
    /// A path to a port on the current model
    pub fn local(port: PortName) -> Self {
        Self {
            models: Vec::new(),
            port,
        }
    }

    /// This path as seen from the composite model containing `model`
    pub fn prefixed(mut self, model: ModelID) -> Self {
        self.models.insert(0, model);
        self
    }
}

impl Display for PortPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.models.is_empty() {
            write!(f, "{}", self.port)
        } else {
            write!(f, "{}.{}", self.models.iter().join("."), self.port)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_path_display() {
        let path = PortPath::local("demand".into());
        assert_eq!(path.to_string(), "demand");
        let path = path.prefixed("energy".into()).prefixed("national".into());
        assert_eq!(path.to_string(), "national.energy.demand");
    }

    #[test]
    fn test_port_spec_deserialise() {
        let spec: PortSpec =
            toml::from_str(
                "name = \"demand\"\ntemporal_resolution = \"seasons\"\n\
                 spatial_resolution = \"lads\"\nunits = \"GWh\"",
            )
            .unwrap();
        assert_eq!(
            spec,
            PortSpec::new("demand")
                .with_temporal_resolution("seasons")
                .with_spatial_resolution("lads")
                .with_units("GWh")
        );
    }
}
