//! Fixtures for tests

use crate::interval::{IntervalDefinition, IntervalRegister};
use crate::model::{IdentityExecutable, Model, ScenarioModel, SectorModel};
use crate::port::PortSpec;
use crate::region::{RegionDefinition, RegionRegister};
use crate::value::Value;
use indexmap::indexmap;
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// Create interval definitions from (name, start, end) tuples
pub fn interval_definitions(intervals: &[(&str, &str, &str)]) -> Vec<IntervalDefinition> {
    intervals
        .iter()
        .map(|(name, start, end)| IntervalDefinition {
            name: (*name).to_string(),
            start: (*start).to_string(),
            end: (*end).to_string(),
        })
        .collect()
}

/// A register with a single-interval "annual" set and a four-interval "quarters" set
#[fixture]
pub fn register_annual_and_quarters() -> IntervalRegister {
    let mut register = IntervalRegister::new(2010);
    register
        .add_interval_set(
            "annual".into(),
            interval_definitions(&[("year", "P0D", "P365D")]),
        )
        .unwrap();
    register
        .add_interval_set(
            "quarters".into(),
            interval_definitions(&[
                ("q1", "PT0H", "PT2190H"),
                ("q2", "PT2190H", "PT4380H"),
                ("q3", "PT4380H", "PT6570H"),
                ("q4", "PT6570H", "PT8760H"),
            ]),
        )
        .unwrap();
    register
}

/// A register with a single interval which wraps around the end of the year
#[fixture]
pub fn register_winter() -> IntervalRegister {
    let mut register = IntervalRegister::new(2010);
    register
        .add_interval_set(
            "winter".into(),
            interval_definitions(&[("winter", "P333D", "P10D")]),
        )
        .unwrap();
    register
}

/// Create region definitions from (name, vertices) tuples
pub fn region_definitions(regions: &[(&str, &[(f64, f64)])]) -> Vec<RegionDefinition> {
    regions
        .iter()
        .map(|(name, vertices)| RegionDefinition {
            name: (*name).to_string(),
            vertices: vertices.to_vec(),
        })
        .collect()
}

/// A register with a 1x2 rectangle "rect" (one region, "zero") and the same area split into two
/// unit squares "half_squares" ("a" below "b")
#[fixture]
pub fn register_rect_and_half_squares() -> RegionRegister {
    const RECT: &[(f64, f64)] = &[(0.0, 0.0), (0.0, 2.0), (1.0, 2.0), (1.0, 0.0)];
    const LOWER_SQUARE: &[(f64, f64)] = &[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)];
    const UPPER_SQUARE: &[(f64, f64)] = &[(0.0, 1.0), (0.0, 2.0), (1.0, 2.0), (1.0, 1.0)];

    let mut register = RegionRegister::new();
    register
        .add_region_set("rect".into(), region_definitions(&[("zero", RECT)]))
        .unwrap();
    register
        .add_region_set(
            "half_squares".into(),
            region_definitions(&[("a", LOWER_SQUARE), ("b", UPPER_SQUARE)]),
        )
        .unwrap();
    register
}

/// A scenario model with a single output, set to `value` for every timestep
pub fn scenario_with_data(name: &str, output: PortSpec, value: Value) -> Model {
    let output_name = output.name.to_string();
    let mut model = Model::from(ScenarioModel::new(name));
    model.add_output(output).unwrap();
    model
        .as_scenario_mut()
        .unwrap()
        .add_data(indexmap! {output_name => value})
        .unwrap();
    model
}

/// A sector model which returns its inputs as outputs
pub fn identity_model(name: &str, inputs: Vec<PortSpec>, outputs: Vec<PortSpec>) -> Model {
    let mut sector = SectorModel::new(name);
    sector.add_executable(IdentityExecutable);
    let mut model = Model::from(sector);
    for input in inputs {
        model.add_input(input).unwrap();
    }
    for output in outputs {
        model.add_output(output).unwrap();
    }
    model
}

/// A scenario model called "scenario" whose "demand" output is 123
#[fixture]
pub fn scenario_model() -> Model {
    scenario_with_data("scenario", PortSpec::new("demand"), Value::Number(123.0))
}

/// A sector model called "energy" with a "demand" input and output
#[fixture]
pub fn sector_model() -> Model {
    identity_model(
        "energy",
        vec![PortSpec::new("demand")],
        vec![PortSpec::new("demand")],
    )
}
