//! Dependencies link the output of one model to the input of another.
use crate::id::{IntervalSetID, ModelID};
use crate::interval::IntervalRegister;
use crate::model::ModelKind;
use crate::port::PortSpec;
use crate::region::RegionRegister;
use crate::timeseries::{TimeSeries, interval_values_to_value};
use crate::value::{DataMap, Value};
use anyhow::{Context, Result};
use log::debug;
use serde_string_enum::DeserializeLabeledStringEnum;
use std::fmt::{Debug, Display};
use std::rc::Rc;

/// The timestep from which a dependency reads its source's output
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash, DeserializeLabeledStringEnum)]
pub enum RelativeTimestep {
    /// The timestep currently being simulated
    #[string = "current"]
    Current,
    /// The timestep before the one currently being simulated
    #[string = "previous"]
    Previous,
}

impl Display for RelativeTimestep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelativeTimestep::Current => write!(f, "current"),
            RelativeTimestep::Previous => write!(f, "previous"),
        }
    }
}

/// A function applied to the source data before it is passed to the sink
pub type Transform = Rc<dyn Fn(Value) -> Result<Value>>;

/// A link from a source model's output to a sink model's input
#[derive(Clone)]
pub struct Dependency {
    /// The model providing the data
    pub source_model: ModelID,
    /// What kind of model the source is
    pub source_kind: ModelKind,
    /// The output of the source model
    pub source_output: PortSpec,
    /// The model receiving the data
    pub sink_model: ModelID,
    /// The input of the sink model
    pub sink_input: PortSpec,
    /// Which timestep's source data is used
    pub timestep: RelativeTimestep,
    transform: Transform,
}

impl Dependency {
    /// Create a new [`Dependency`] which passes the data through unchanged
    pub fn new(
        source_model: ModelID,
        source_kind: ModelKind,
        source_output: PortSpec,
        sink_model: ModelID,
        sink_input: PortSpec,
        timestep: RelativeTimestep,
    ) -> Self {
        Self {
            source_model,
            source_kind,
            source_output,
            sink_model,
            sink_input,
            timestep,
            transform: Rc::new(Ok),
        }
    }

    /// Replace the function applied to the source data
    pub fn with_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + 'static,
    {
        self.transform = Rc::new(transform);
        self
    }

    /// Whether the source of this dependency is a scenario model
    pub fn is_from_scenario(&self) -> bool {
        self.source_kind == ModelKind::Scenario
    }

    /// Prepare data from the source's output for the sink's input.
    ///
    /// If the source and sink use different spatial resolutions, the data is converted between
    /// them first, then likewise for temporal resolutions. The dependency's transform is then
    /// applied.
    ///
    /// Data with a spatial resolution is keyed by region. If it also has a temporal resolution,
    /// each region holds a timeseries.
    pub fn apply(
        &self,
        value: Value,
        intervals: &IntervalRegister,
        regions: &RegionRegister,
    ) -> Result<Value> {
        let value = match (
            &self.source_output.spatial_resolution,
            &self.sink_input.spatial_resolution,
        ) {
            (Some(from), Some(to)) if from != to => {
                debug!("Converting data for {self} from '{from}' to '{to}'");
                regions
                    .convert(&value, from.as_str(), to.as_str())
                    .with_context(|| format!("Could not convert data for {self}"))?
            }
            _ => value,
        };

        let value = match (
            &self.source_output.temporal_resolution,
            &self.sink_input.temporal_resolution,
        ) {
            (Some(from), Some(to)) if from != to => {
                debug!("Converting data for {self} from '{from}' to '{to}'");
                if self.source_output.spatial_resolution.is_some() {
                    let by_region = value
                        .as_map()
                        .with_context(|| format!("Invalid spatial data for {self}"))?;
                    let converted = by_region
                        .iter()
                        .map(|(region, series)| {
                            let series = self.convert_timeseries(series, from, to, intervals)?;
                            Ok((region.clone(), series))
                        })
                        .collect::<Result<DataMap>>()?;
                    Value::Map(converted)
                } else {
                    self.convert_timeseries(&value, from, to, intervals)?
                }
            }
            _ => value,
        };

        (self.transform)(value)
    }

    fn convert_timeseries(
        &self,
        value: &Value,
        from: &IntervalSetID,
        to: &IntervalSetID,
        intervals: &IntervalRegister,
    ) -> Result<Value> {
        let mut timeseries = TimeSeries::from_value(value)
            .with_context(|| format!("Invalid timeseries data for {self}"))?;
        let converted = intervals
            .convert(&mut timeseries, from.as_str(), to.as_str())
            .with_context(|| format!("Could not convert data for {self}"))?;

        Ok(interval_values_to_value(converted))
    }
}

impl Display for Dependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "dependency from '{}:{}' to '{}:{}' ({} timestep)",
            self.source_model,
            self.source_output.name,
            self.sink_model,
            self.sink_input.name,
            self.timestep
        )
    }
}

impl Debug for Dependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dependency")
            .field("source_model", &self.source_model)
            .field("source_kind", &self.source_kind)
            .field("source_output", &self.source_output)
            .field("sink_model", &self.sink_model)
            .field("sink_input", &self.sink_input)
            .field("timestep", &self.timestep)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{
        assert_error, register_annual_and_quarters, register_rect_and_half_squares,
    };
    use float_cmp::assert_approx_eq;
    use indexmap::indexmap;
    use rstest::rstest;

    fn number_map(pairs: &[(&str, f64)]) -> Value {
        Value::Map(
            pairs
                .iter()
                .map(|(name, value)| ((*name).to_string(), Value::Number(*value)))
                .collect(),
        )
    }

    fn dependency(from: Option<&str>, to: Option<&str>) -> Dependency {
        let mut source_output = PortSpec::new("demand");
        source_output.temporal_resolution = from.map(Into::into);
        let mut sink_input = PortSpec::new("demand");
        sink_input.temporal_resolution = to.map(Into::into);
        Dependency::new(
            "scenario".into(),
            ModelKind::Scenario,
            source_output,
            "energy".into(),
            sink_input,
            RelativeTimestep::Current,
        )
    }

    #[rstest]
    fn test_apply_identity(register_annual_and_quarters: IntervalRegister) {
        let dep = dependency(None, None);
        assert_eq!(
            dep.apply(
                Value::Number(123.0),
                &register_annual_and_quarters,
                &RegionRegister::new()
            )
            .unwrap(),
            Value::Number(123.0)
        );
    }

    #[rstest]
    fn test_apply_transform(register_annual_and_quarters: IntervalRegister) {
        let dep = dependency(None, None).with_transform(|value| {
            Ok(Value::Number(value.as_number().unwrap_or_default() * 2.0))
        });
        assert_eq!(
            dep.apply(
                Value::Number(2.0),
                &register_annual_and_quarters,
                &RegionRegister::new()
            )
            .unwrap(),
            Value::Number(4.0)
        );
    }

    #[rstest]
    fn test_apply_converts_resolution(register_annual_and_quarters: IntervalRegister) {
        let dep = dependency(Some("annual"), Some("quarters"));
        let value = Value::Map(indexmap! {"year".to_string() => Value::Number(40.0)});
        let converted = dep
            .apply(value, &register_annual_and_quarters, &RegionRegister::new())
            .unwrap();
        let converted = converted.as_map().unwrap();
        assert_eq!(converted.len(), 4);
        for value in converted.values() {
            assert_approx_eq!(f64, value.as_number().unwrap(), 10.0, epsilon = 1e-9);
        }
    }

    #[rstest]
    fn test_apply_same_resolution_not_converted(register_annual_and_quarters: IntervalRegister) {
        let dep = dependency(Some("annual"), Some("annual"));
        let value = Value::Map(indexmap! {"year".to_string() => Value::Number(40.0)});
        assert_eq!(
            dep.apply(
                value.clone(),
                &register_annual_and_quarters,
                &RegionRegister::new()
            )
            .unwrap(),
            value
        );
    }

    #[rstest]
    fn test_apply_invalid_timeseries(register_annual_and_quarters: IntervalRegister) {
        let dep = dependency(Some("annual"), Some("quarters"));
        assert_error!(
            dep.apply(
                Value::Number(1.0),
                &register_annual_and_quarters,
                &RegionRegister::new()
            ),
            "Invalid timeseries data for dependency from 'scenario:demand' to 'energy:demand' \
             (current timestep)"
        );
    }

    #[rstest]
    fn test_apply_converts_spatial_resolution(
        register_annual_and_quarters: IntervalRegister,
        register_rect_and_half_squares: RegionRegister,
    ) {
        let mut dep = dependency(None, None);
        dep.source_output.spatial_resolution = Some("half_squares".into());
        dep.sink_input.spatial_resolution = Some("rect".into());
        let converted = dep
            .apply(
                number_map(&[("a", 2.0), ("b", 3.0)]),
                &register_annual_and_quarters,
                &register_rect_and_half_squares,
            )
            .unwrap();
        let zero = converted.as_map().unwrap()["zero"].as_number().unwrap();
        assert_approx_eq!(f64, zero, 5.0, epsilon = 1e-9);
    }

    #[rstest]
    fn test_apply_converts_both_resolutions(
        register_annual_and_quarters: IntervalRegister,
        register_rect_and_half_squares: RegionRegister,
    ) {
        let mut dep = dependency(Some("annual"), Some("quarters"));
        dep.source_output.spatial_resolution = Some("rect".into());
        dep.sink_input.spatial_resolution = Some("half_squares".into());
        let value = Value::Map(indexmap! {"zero".to_string() => number_map(&[("year", 80.0)])});
        let converted = dep
            .apply(value, &register_annual_and_quarters, &register_rect_and_half_squares)
            .unwrap();

        let by_region = converted.as_map().unwrap();
        assert_eq!(by_region.len(), 2);
        for series in by_region.values() {
            let series = series.as_map().unwrap();
            assert_eq!(series.len(), 4);
            for value in series.values() {
                assert_approx_eq!(f64, value.as_number().unwrap(), 10.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            dependency(None, None).to_string(),
            "dependency from 'scenario:demand' to 'energy:demand' (current timestep)"
        );
    }
}
