//! Sector models wrap a simulation of one infrastructure sector.
use super::{ModelBase, Simulate, Timestep};
use crate::error::config_bail;
use crate::value::DataMap;
use anyhow::{Context, Result, bail, ensure};
use log::warn;
use serde::Deserialize;
use std::fmt::Debug;
use std::io::Write;
use std::process::{Command, Stdio};
use std::rc::Rc;
use std::thread;

/// Something which computes a sector model's outputs from its inputs
pub trait Executable {
    /// Run the simulation, returning outputs keyed by output name
    fn run(&self, inputs: &DataMap) -> Result<DataMap>;
}

impl<F> Executable for F
where
    F: Fn(&DataMap) -> Result<DataMap>,
{
    fn run(&self, inputs: &DataMap) -> Result<DataMap> {
        self(inputs)
    }
}

/// An executable which returns its inputs as outputs
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityExecutable;

impl Executable for IdentityExecutable {
    fn run(&self, inputs: &DataMap) -> Result<DataMap> {
        Ok(inputs.clone())
    }
}

/// An external program which reads inputs as TOML on stdin and writes outputs as TOML to stdout
#[derive(PartialEq, Clone, Debug, Deserialize)]
pub struct CommandExecutable {
    /// The program to run
    #[serde(rename = "command")]
    pub program: String,
    /// Arguments passed to the program
    #[serde(default)]
    pub args: Vec<String>,
}

impl Executable for CommandExecutable {
    fn run(&self, inputs: &DataMap) -> Result<DataMap> {
        let input_toml = toml::to_string(inputs).context("Could not serialise model inputs")?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to start {}", self.program))?;

        // Write from another thread, so a child which streams its output can't block on a full
        // stdout pipe while we are still writing
        let mut stdin = child
            .stdin
            .take()
            .context("Could not open stdin of child process")?;
        let writer = thread::spawn(move || stdin.write_all(input_toml.as_bytes()));
        let output = child
            .wait_with_output()
            .with_context(|| format!("Failed to wait for {}", self.program))?;
        let written = writer.join();
        ensure!(
            output.status.success(),
            "{} exited with {}: {}",
            self.program,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
        match written {
            Ok(result) => {
                result.with_context(|| format!("Could not write inputs to {}", self.program))?;
            }
            Err(_) => bail!("Thread writing inputs to {} panicked", self.program),
        }

        let stdout = String::from_utf8(output.stdout)
            .with_context(|| format!("Output of {} is not UTF-8 encoded", self.program))?;
        toml::from_str(&stdout).with_context(|| format!("Could not parse output of {}", self.program))
    }
}

/// A model which runs a simulation of an infrastructure sector
#[derive(Clone)]
pub struct SectorModel {
    pub(super) base: ModelBase,
    executable: Option<Rc<dyn Executable>>,
}

impl SectorModel {
    /// Create a new [`SectorModel`] with no ports or executable
    pub fn new(name: &str) -> Self {
        Self {
            base: ModelBase::new(name),
            executable: None,
        }
    }

    /// Set the executable which is run when the model is simulated
    pub fn add_executable<E: Executable + 'static>(&mut self, executable: E) {
        self.executable = Some(Rc::new(executable));
    }
}

impl Debug for SectorModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectorModel")
            .field("base", &self.base)
            .field("has_executable", &self.executable.is_some())
            .finish()
    }
}

impl Simulate for SectorModel {
    fn simulate(&self, data: &DataMap, _timestep: &Timestep) -> Result<DataMap> {
        let Some(executable) = &self.executable else {
            config_bail!("No executable has been added to '{}' model", self.base.name);
        };
        let results = executable
            .run(data)
            .with_context(|| format!("Error running executable for '{}' model", self.base.name))?;

        for output in self.base.outputs.keys() {
            if !results.contains_key(output.as_str()) {
                warn!(
                    "Output '{output}' of '{}' model is missing from its results",
                    self.base.name
                );
            }
        }

        Ok(results)
    }
}
