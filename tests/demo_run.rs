//! Integration tests for the `demo run` command, checking the results of the simple demo.
use float_cmp::approx_eq;
use serde::Deserialize;
use sosim::cli::RunOpts;
use sosim::cli::demo::handle_demo_run_command;
use sosim::settings::Settings;
use tempfile::tempdir;

#[derive(Debug, Deserialize)]
struct ResultRow {
    timestep: u32,
    model: String,
    output: String,
    region: String,
    interval: String,
    value: f64,
}

#[test]
fn test_handle_demo_run_command() {
    unsafe { std::env::set_var("SOSIM_LOG_LEVEL", "off") };

    let tempdir = tempdir().unwrap();
    let opts = RunOpts {
        output_dir: Some(tempdir.path().to_path_buf()),
        overwrite: false,
    };
    handle_demo_run_command("simple", &opts, Some(Settings::default())).unwrap();

    let rows: Vec<ResultRow> = csv::Reader::from_path(tempdir.path().join("results.csv"))
        .unwrap()
        .into_deserialize()
        .collect::<Result<_, _>>()
        .unwrap();

    // Each timestep has: 2 scenario outputs, 1 + 4 energy model outputs and 1 water model output
    assert_eq!(rows.len(), 3 * 8);

    // The annual demand is split evenly between the quarters
    let quarters: Vec<&ResultRow> = rows
        .iter()
        .filter(|row| {
            row.timestep == 2015 && row.model == "energy_model" && row.output == "energy_demand"
        })
        .collect();
    assert_eq!(quarters.len(), 4);
    for row in quarters {
        assert!(row.interval.starts_with('q'));
        assert!(approx_eq!(f64, row.value, 110.0, epsilon = 1e-6));
    }

    let water = rows
        .iter()
        .find(|row| row.timestep == 2020 && row.model == "water_model")
        .unwrap();
    assert_eq!(water.output, "population");
    assert_eq!(water.region, "");
    assert_eq!(water.interval, "");
    assert!(approx_eq!(f64, water.value, 121.0));
}
