//! Code for reading the model file and building the system-of-systems model it describes.
use super::{input_err_msg, is_sorted_and_unique, read_csv, read_toml};
use crate::dependency::RelativeTimestep;
use crate::graph::evaluation_order;
use crate::id::{IDCollection, IntervalSetID, RegionSetID};
use crate::interval::{DEFAULT_BASE_YEAR, IntervalRegister};
use crate::model::{
    CommandExecutable, IdentityExecutable, Model, PortMap, ScenarioModel, SectorModel, SosModel,
};
use crate::port::PortSpec;
use crate::region::RegionRegister;
use crate::value::{DataMap, Value};
use anyhow::{Context, Result, bail, ensure};
use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;
use log::info;
use serde::Deserialize;
use serde_string_enum::DeserializeLabeledStringEnum;
use std::path::{Path, PathBuf};

const MODEL_FILE_NAME: &str = "model.toml";

fn default_base_year() -> i32 {
    DEFAULT_BASE_YEAR
}

fn default_timestep() -> RelativeTimestep {
    RelativeTimestep::Current
}

/// Represents the contents of the entire model file.
#[derive(Debug, Deserialize, PartialEq)]
pub struct ModelFile {
    /// Name of the system-of-systems model
    pub name: String,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// The year from which interval offsets are measured
    #[serde(default = "default_base_year")]
    pub base_year: i32,
    /// The years to simulate
    pub timesteps: Vec<u32>,
    /// Interval set names mapped to CSV files defining them
    #[serde(default)]
    pub interval_sets: IndexMap<String, PathBuf>,
    /// Region set names mapped to CSV files defining them
    #[serde(default)]
    pub region_sets: IndexMap<String, PathBuf>,
    /// Scenario models
    #[serde(default)]
    pub scenario_models: Vec<ScenarioModelDefinition>,
    /// Sector models
    #[serde(default)]
    pub sector_models: Vec<SectorModelDefinition>,
    /// Dependencies between models
    #[serde(default)]
    pub dependencies: Vec<DependencyDefinition>,
}

/// A scenario model, as defined in the model file
#[derive(Debug, Deserialize, PartialEq)]
pub struct ScenarioModelDefinition {
    name: String,
    #[serde(default)]
    description: String,
    outputs: Vec<PortSpec>,
    /// CSV file containing the scenario data
    data: PathBuf,
}

/// An executable provided by the program itself
#[derive(PartialEq, Debug, DeserializeLabeledStringEnum)]
enum BuiltinExecutable {
    #[string = "identity"]
    Identity,
}

/// How a sector model is run
#[derive(PartialEq, Debug, Deserialize)]
#[serde(untagged)]
enum ExecutableDefinition {
    Builtin(BuiltinExecutable),
    Command(CommandExecutable),
}

/// A sector model, as defined in the model file
#[derive(Debug, Deserialize, PartialEq)]
pub struct SectorModelDefinition {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    inputs: Vec<PortSpec>,
    #[serde(default)]
    outputs: Vec<PortSpec>,
    #[serde(default)]
    parameters: Vec<PortSpec>,
    executable: ExecutableDefinition,
}

/// A dependency, as defined in the model file
#[derive(Debug, Deserialize, PartialEq)]
pub struct DependencyDefinition {
    source: String,
    source_output: String,
    sink: String,
    sink_input: String,
    #[serde(default = "default_timestep")]
    timestep: RelativeTimestep,
}

/// A row of a scenario data CSV file.
///
/// `region` is empty (or the column absent) for outputs without a spatial resolution, and
/// `interval` likewise for outputs without a temporal resolution.
#[derive(Debug, Deserialize, PartialEq)]
struct ScenarioDataRow {
    timestep: u32,
    output: String,
    #[serde(default)]
    region: Option<String>,
    interval: Option<String>,
    value: f64,
}

impl ModelFile {
    /// Read a model file from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `model_dir` - Folder containing model configuration files
    pub fn from_path<P: AsRef<Path>>(model_dir: P) -> Result<ModelFile> {
        let file_path = model_dir.as_ref().join(MODEL_FILE_NAME);
        let model_file: ModelFile = read_toml(&file_path)?;
        model_file
            .validate()
            .with_context(|| input_err_msg(&file_path))?;

        Ok(model_file)
    }

    /// Validate parameters after reading in file
    fn validate(&self) -> Result<()> {
        ensure!(!self.timesteps.is_empty(), "timesteps is empty");
        ensure!(
            is_sorted_and_unique(&self.timesteps),
            "timesteps must be composed of unique values in order"
        );

        Ok(())
    }
}

/// Check that the temporal resolution of a port, if any, is a registered interval set
fn check_temporal_resolution(spec: &PortSpec, set_ids: &IndexSet<IntervalSetID>) -> Result<()> {
    if let Some(set_name) = &spec.temporal_resolution {
        set_ids
            .get_id_by_str(set_name.as_str())
            .with_context(|| format!("Invalid temporal resolution for '{}'", spec.name))?;
    }

    Ok(())
}

/// Check that the spatial resolution of a port, if any, is a registered region set
fn check_spatial_resolution(spec: &PortSpec, set_ids: &IndexSet<RegionSetID>) -> Result<()> {
    if let Some(set_name) = &spec.spatial_resolution {
        set_ids
            .get_id_by_str(set_name.as_str())
            .with_context(|| format!("Invalid spatial resolution for '{}'", spec.name))?;
    }

    Ok(())
}

/// The interval and region sets which ports may refer to
struct Resolutions<'a> {
    intervals: &'a IntervalRegister,
    regions: &'a RegionRegister,
    interval_set_ids: IndexSet<IntervalSetID>,
    region_set_ids: IndexSet<RegionSetID>,
}

impl<'a> Resolutions<'a> {
    fn new(intervals: &'a IntervalRegister, regions: &'a RegionRegister) -> Self {
        Self {
            intervals,
            regions,
            interval_set_ids: intervals.interval_set_names().cloned().collect(),
            region_set_ids: regions.region_set_names().cloned().collect(),
        }
    }

    /// Check that the resolutions of a port refer to registered sets
    fn check(&self, spec: &PortSpec) -> Result<()> {
        check_temporal_resolution(spec, &self.interval_set_ids)?;
        check_spatial_resolution(spec, &self.region_set_ids)
    }
}

/// Insert `value` into `data` under `output` and then each of `keys` in turn.
///
/// Returns false, leaving `data` unchanged, if there is already a value at that position.
fn insert_nested(data: &mut DataMap, output: String, keys: Vec<String>, value: f64) -> bool {
    let mut keys = std::iter::once(output).chain(keys).peekable();
    let mut map = data;
    while let Some(key) = keys.next() {
        if keys.peek().is_none() {
            if map.contains_key(&key) {
                return false;
            }
            map.insert(key, Value::Number(value));
            return true;
        }

        let entry = map.entry(key).or_insert_with(|| Value::Map(DataMap::new()));
        let Value::Map(inner) = entry else {
            return false;
        };
        map = inner;
    }

    false
}

/// Read the data for a scenario model, grouped by timestep
fn read_scenario_data(
    file_path: &Path,
    model_name: &str,
    outputs: &PortMap,
    intervals: &IntervalRegister,
    regions: &RegionRegister,
    timesteps: &[u32],
) -> Result<IndexMap<u32, DataMap>> {
    let rows: Vec<ScenarioDataRow> = read_csv(file_path)?;
    read_scenario_data_from_iter(
        rows.into_iter(),
        model_name,
        outputs,
        intervals,
        regions,
        timesteps,
    )
    .with_context(|| input_err_msg(file_path))
}

fn read_scenario_data_from_iter<I>(
    iter: I,
    model_name: &str,
    outputs: &PortMap,
    intervals: &IntervalRegister,
    regions: &RegionRegister,
    timesteps: &[u32],
) -> Result<IndexMap<u32, DataMap>>
where
    I: Iterator<Item = ScenarioDataRow>,
{
    let mut data: IndexMap<u32, DataMap> = IndexMap::new();
    for row in iter {
        let Some(spec) = outputs.get(row.output.as_str()) else {
            bail!(
                "Output '{}' is not defined in '{model_name}' model",
                row.output
            );
        };
        ensure!(
            timesteps.contains(&row.timestep),
            "Timestep {} is not one of the model's timesteps",
            row.timestep
        );

        // Spatial data is keyed by region, then by interval if it also varies over time
        let mut keys = Vec::new();
        let mut position = String::new();
        match (&spec.spatial_resolution, row.region) {
            (None, None) => {}
            (Some(set_name), Some(region)) => {
                ensure!(
                    regions
                        .get_regions_in_set(set_name.as_str())?
                        .contains_key(region.as_str()),
                    "Region '{region}' is not in region set '{set_name}'"
                );
                position.push_str(&format!(", region '{region}'"));
                keys.push(region);
            }
            (None, Some(region)) => bail!(
                "Output '{}' has no spatial resolution, but a value was given for region \
                 '{region}'",
                row.output
            ),
            (Some(set_name), None) => bail!(
                "Output '{}' has spatial resolution '{set_name}', but no region was given",
                row.output
            ),
        }
        match (&spec.temporal_resolution, row.interval) {
            (None, None) => {}
            (Some(set_name), Some(interval)) => {
                ensure!(
                    intervals
                        .get_intervals_in_set(set_name.as_str())?
                        .contains_key(interval.as_str()),
                    "Interval '{interval}' is not in interval set '{set_name}'"
                );
                position.push_str(&format!(", interval '{interval}'"));
                keys.push(interval);
            }
            (None, Some(interval)) => bail!(
                "Output '{}' has no temporal resolution, but a value was given for interval \
                 '{interval}'",
                row.output
            ),
            (Some(set_name), None) => bail!(
                "Output '{}' has temporal resolution '{set_name}', but no interval was given",
                row.output
            ),
        }

        let year_data = data.entry(row.timestep).or_default();
        ensure!(
            insert_nested(year_data, row.output.clone(), keys, row.value),
            "Duplicate value for output '{}'{position} in timestep {}",
            row.output,
            row.timestep
        );
    }

    // Every output needs data for every timestep
    for (&year, output) in timesteps.iter().cartesian_product(outputs.keys()) {
        ensure!(
            data.get(&year)
                .is_some_and(|year_data| year_data.contains_key(output.as_str())),
            "Missing data for output '{output}' in timestep {year}"
        );
    }

    Ok(data)
}

/// Build a scenario model from its definition
fn build_scenario_model(
    model_dir: &Path,
    definition: &ScenarioModelDefinition,
    resolutions: &Resolutions,
    timesteps: &[u32],
) -> Result<Model> {
    let mut model = Model::from(ScenarioModel::new(&definition.name));
    model.set_description(&definition.description);
    for output in &definition.outputs {
        resolutions.check(output)?;
        model.add_output(output.clone())?;
    }

    let data = read_scenario_data(
        &model_dir.join(&definition.data),
        &definition.name,
        model.outputs(),
        resolutions.intervals,
        resolutions.regions,
        timesteps,
    )?;
    if let Some(scenario) = model.as_scenario_mut() {
        for (year, year_data) in data {
            scenario.add_timestep_data(year, year_data)?;
        }
    }

    Ok(model)
}

/// Build a sector model from its definition
fn build_sector_model(
    definition: &SectorModelDefinition,
    resolutions: &Resolutions,
) -> Result<Model> {
    let mut sector = SectorModel::new(&definition.name);
    match &definition.executable {
        ExecutableDefinition::Builtin(BuiltinExecutable::Identity) => {
            sector.add_executable(IdentityExecutable);
        }
        ExecutableDefinition::Command(command) => sector.add_executable(command.clone()),
    }

    let mut model = Model::from(sector);
    model.set_description(&definition.description);
    for input in &definition.inputs {
        resolutions.check(input)?;
        model.add_input(input.clone())?;
    }
    for output in &definition.outputs {
        resolutions.check(output)?;
        model.add_output(output.clone())?;
    }
    for parameter in &definition.parameters {
        model.add_parameter(parameter.clone())?;
    }

    Ok(model)
}

/// Build the system-of-systems model described by the model file.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
/// * `model_file` - The contents of the model file
/// * `intervals` - The interval sets used by the model
/// * `regions` - The region sets used by the model
pub fn build_sos_model(
    model_dir: &Path,
    model_file: &ModelFile,
    intervals: &IntervalRegister,
    regions: &RegionRegister,
) -> Result<SosModel> {
    let file_path = model_dir.join(MODEL_FILE_NAME);
    let resolutions = Resolutions::new(intervals, regions);

    let mut sos = SosModel::new(&model_file.name);
    sos.set_description(&model_file.description);
    for definition in &model_file.scenario_models {
        let model = build_scenario_model(
            model_dir,
            definition,
            &resolutions,
            &model_file.timesteps,
        )
        .with_context(|| format!("Error loading scenario model '{}'", definition.name))?;
        sos.add_model(model).with_context(|| input_err_msg(&file_path))?;
    }
    for definition in &model_file.sector_models {
        let model = build_sector_model(definition, &resolutions)
            .with_context(|| format!("Error loading sector model '{}'", definition.name))?;
        sos.add_model(model).with_context(|| input_err_msg(&file_path))?;
    }

    for dependency in &model_file.dependencies {
        sos.add_dependency(
            &dependency.source,
            &dependency.source_output,
            &dependency.sink,
            &dependency.sink_input,
            dependency.timestep,
        )
        .with_context(|| {
            format!(
                "Invalid dependency from '{}:{}' to '{}:{}'",
                dependency.source, dependency.source_output, dependency.sink, dependency.sink_input
            )
        })?;
    }

    let free_inputs = sos.free_inputs();
    ensure!(
        free_inputs.is_empty(),
        "The following inputs have no dependencies: {}",
        free_inputs.iter().join(", ")
    );
    let order = evaluation_order(&sos).with_context(|| input_err_msg(&file_path))?;
    info!(
        "Loaded model '{}' with models: {}",
        model_file.name,
        order.iter().join(", ")
    );

    Ok(sos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{
        assert_error, register_annual_and_quarters, register_rect_and_half_squares,
    };
    use indexmap::indexmap;
    use rstest::rstest;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn row(timestep: u32, output: &str, interval: Option<&str>, value: f64) -> ScenarioDataRow {
        ScenarioDataRow {
            timestep,
            output: output.into(),
            region: None,
            interval: interval.map(Into::into),
            value,
        }
    }

    fn spatial_row(region: &str, interval: Option<&str>, value: f64) -> ScenarioDataRow {
        ScenarioDataRow {
            region: Some(region.into()),
            ..row(2010, "heat", interval, value)
        }
    }

    fn outputs() -> PortMap {
        [
            ("population".into(), PortSpec::new("population")),
            (
                "demand".into(),
                PortSpec::new("demand").with_temporal_resolution("quarters"),
            ),
        ]
        .into_iter()
        .collect()
    }

    fn spatial_outputs() -> PortMap {
        [
            (
                "heat".into(),
                PortSpec::new("heat")
                    .with_spatial_resolution("half_squares")
                    .with_temporal_resolution("quarters"),
            ),
            (
                "land".into(),
                PortSpec::new("land").with_spatial_resolution("rect"),
            ),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_model_file_from_path() {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join(MODEL_FILE_NAME)).unwrap();
            writeln!(
                file,
                r#"name = "national"
timesteps = [2010, 2015]

[interval_sets]
annual = "annual.csv"

[region_sets]
lads = "lads.csv"

[[sector_models]]
name = "energy"
executable = "identity"
inputs = [{{ name = "demand", temporal_resolution = "annual" }}]

[[sector_models]]
name = "water"
executable = {{ command = "python", args = ["water.py"] }}

[[dependencies]]
source = "energy"
source_output = "demand"
sink = "water"
sink_input = "demand"
timestep = "previous"
"#
            )
            .unwrap();
        }

        let model_file = ModelFile::from_path(dir.path()).unwrap();
        assert_eq!(model_file.base_year, DEFAULT_BASE_YEAR);
        assert_eq!(model_file.timesteps, [2010, 2015]);
        assert_eq!(model_file.interval_sets["annual"], PathBuf::from("annual.csv"));
        assert_eq!(model_file.region_sets["lads"], PathBuf::from("lads.csv"));
        assert_eq!(
            model_file.sector_models[0].executable,
            ExecutableDefinition::Builtin(BuiltinExecutable::Identity)
        );
        assert_eq!(
            model_file.sector_models[1].executable,
            ExecutableDefinition::Command(CommandExecutable {
                program: "python".into(),
                args: vec!["water.py".into()]
            })
        );
        assert_eq!(
            model_file.sector_models[0].inputs,
            [PortSpec::new("demand").with_temporal_resolution("annual")]
        );
        assert_eq!(model_file.dependencies[0].timestep, RelativeTimestep::Previous);
    }

    #[rstest]
    #[case(&[], "timesteps is empty")]
    #[case(&[2015, 2010], "timesteps must be composed of unique values in order")]
    #[case(&[2010, 2010], "timesteps must be composed of unique values in order")]
    fn test_model_file_invalid_timesteps(#[case] timesteps: &[u32], #[case] msg: &str) {
        let model_file = ModelFile {
            name: "national".into(),
            description: String::new(),
            base_year: DEFAULT_BASE_YEAR,
            timesteps: timesteps.to_vec(),
            interval_sets: IndexMap::new(),
            region_sets: IndexMap::new(),
            scenario_models: Vec::new(),
            sector_models: Vec::new(),
            dependencies: Vec::new(),
        };
        assert_error!(model_file.validate(), msg);
    }

    #[rstest]
    fn test_read_scenario_data(register_annual_and_quarters: IntervalRegister) {
        let rows = [
            row(2010, "population", None, 100.0),
            row(2010, "demand", Some("q1"), 1.0),
            row(2010, "demand", Some("q2"), 2.0),
        ];
        let data = read_scenario_data_from_iter(
            rows.into_iter(),
            "scenario",
            &outputs(),
            &register_annual_and_quarters,
            &RegionRegister::new(),
            &[2010],
        )
        .unwrap();
        assert_eq!(
            data[&2010],
            indexmap! {
                "population".to_string() => Value::Number(100.0),
                "demand".to_string() => Value::Map(indexmap! {
                    "q1".to_string() => Value::Number(1.0),
                    "q2".to_string() => Value::Number(2.0),
                }),
            }
        );
    }

    #[rstest]
    #[case(row(2010, "births", None, 1.0), "Output 'births' is not defined in 'scenario' model")]
    #[case(row(2012, "population", None, 1.0), "Timestep 2012 is not one of the model's timesteps")]
    #[case(
        row(2010, "demand", Some("winter"), 1.0),
        "Interval 'winter' is not in interval set 'quarters'"
    )]
    #[case(
        row(2010, "population", Some("q1"), 1.0),
        "Output 'population' has no temporal resolution, but a value was given for interval 'q1'"
    )]
    #[case(
        row(2010, "demand", None, 1.0),
        "Output 'demand' has temporal resolution 'quarters', but no interval was given"
    )]
    fn test_read_scenario_data_invalid(
        register_annual_and_quarters: IntervalRegister,
        #[case] bad_row: ScenarioDataRow,
        #[case] msg: &str,
    ) {
        let result = read_scenario_data_from_iter(
            std::iter::once(bad_row),
            "scenario",
            &outputs(),
            &register_annual_and_quarters,
            &RegionRegister::new(),
            &[2010],
        );
        assert_error!(result, msg);
    }

    #[rstest]
    fn test_read_scenario_data_missing_timestep(register_annual_and_quarters: IntervalRegister) {
        let rows = [
            row(2010, "population", None, 100.0),
            row(2010, "demand", Some("q1"), 1.0),
        ];
        let result = read_scenario_data_from_iter(
            rows.into_iter(),
            "scenario",
            &outputs(),
            &register_annual_and_quarters,
            &RegionRegister::new(),
            &[2010, 2015],
        );
        assert_error!(result, "Missing data for output 'population' in timestep 2015");
    }

    #[rstest]
    fn test_read_scenario_data_spatial(
        register_annual_and_quarters: IntervalRegister,
        register_rect_and_half_squares: RegionRegister,
    ) {
        let rows = [
            spatial_row("a", Some("q1"), 1.0),
            spatial_row("b", Some("q1"), 2.0),
            spatial_row("a", Some("q2"), 3.0),
            ScenarioDataRow {
                region: Some("zero".into()),
                ..row(2010, "land", None, 2.0)
            },
        ];
        let data = read_scenario_data_from_iter(
            rows.into_iter(),
            "scenario",
            &spatial_outputs(),
            &register_annual_and_quarters,
            &register_rect_and_half_squares,
            &[2010],
        )
        .unwrap();
        assert_eq!(
            data[&2010],
            indexmap! {
                "heat".to_string() => Value::Map(indexmap! {
                    "a".to_string() => Value::Map(indexmap! {
                        "q1".to_string() => Value::Number(1.0),
                        "q2".to_string() => Value::Number(3.0),
                    }),
                    "b".to_string() => Value::Map(indexmap! {
                        "q1".to_string() => Value::Number(2.0),
                    }),
                }),
                "land".to_string() => Value::Map(indexmap! {
                    "zero".to_string() => Value::Number(2.0),
                }),
            }
        );
    }

    #[rstest]
    #[case(
        vec![spatial_row("c", Some("q1"), 1.0)],
        "Region 'c' is not in region set 'half_squares'"
    )]
    #[case(
        vec![row(2010, "heat", Some("q1"), 1.0)],
        "Output 'heat' has spatial resolution 'half_squares', but no region was given"
    )]
    #[case(
        vec![ScenarioDataRow {
            region: Some("a".into()),
            ..row(2010, "population", None, 1.0)
        }],
        "Output 'population' has no spatial resolution, but a value was given for region 'a'"
    )]
    #[case(
        vec![spatial_row("a", Some("q1"), 1.0), spatial_row("a", Some("q1"), 2.0)],
        "Duplicate value for output 'heat', region 'a', interval 'q1' in timestep 2010"
    )]
    fn test_read_scenario_data_spatial_invalid(
        register_annual_and_quarters: IntervalRegister,
        register_rect_and_half_squares: RegionRegister,
        #[case] rows: Vec<ScenarioDataRow>,
        #[case] msg: &str,
    ) {
        let mut outputs = spatial_outputs();
        outputs.insert("population".into(), PortSpec::new("population"));
        let result = read_scenario_data_from_iter(
            rows.into_iter(),
            "scenario",
            &outputs,
            &register_annual_and_quarters,
            &register_rect_and_half_squares,
            &[2010],
        );
        assert_error!(result, msg);
    }

    #[test]
    fn test_insert_nested() {
        let mut data = DataMap::new();
        assert!(insert_nested(&mut data, "heat".into(), vec!["a".into(), "q1".into()], 1.0));
        assert!(!insert_nested(&mut data, "heat".into(), vec!["a".into(), "q1".into()], 2.0));
        assert!(insert_nested(&mut data, "population".into(), Vec::new(), 3.0));
        assert_eq!(
            data,
            indexmap! {
                "heat".to_string() => Value::Map(indexmap! {
                    "a".to_string() => Value::Map(indexmap! {
                        "q1".to_string() => Value::Number(1.0),
                    }),
                }),
                "population".to_string() => Value::Number(3.0),
            }
        );
    }

    #[test]
    fn test_check_spatial_resolution() {
        let set_ids: IndexSet<RegionSetID> = ["lads".into()].into_iter().collect();
        assert!(check_spatial_resolution(&PortSpec::new("demand"), &set_ids).is_ok());
        assert!(
            check_spatial_resolution(
                &PortSpec::new("demand").with_spatial_resolution("lads"),
                &set_ids
            )
            .is_ok()
        );
        assert_error!(
            check_spatial_resolution(
                &PortSpec::new("demand").with_spatial_resolution("countries"),
                &set_ids
            ),
            "Invalid spatial resolution for 'demand'"
        );
    }

    #[test]
    fn test_check_temporal_resolution() {
        let set_ids: IndexSet<IntervalSetID> = ["annual".into()].into_iter().collect();
        assert!(check_temporal_resolution(&PortSpec::new("demand"), &set_ids).is_ok());
        assert!(
            check_temporal_resolution(
                &PortSpec::new("demand").with_temporal_resolution("annual"),
                &set_ids
            )
            .is_ok()
        );
        assert_error!(
            check_temporal_resolution(
                &PortSpec::new("demand").with_temporal_resolution("hourly"),
                &set_ids
            ),
            "Invalid temporal resolution for 'demand'"
        );
    }
}
