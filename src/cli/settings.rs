//! Code related to CLI interface for managing the settings file
use crate::settings::{Settings, get_settings_file_path};
use anyhow::{Context, Result, ensure};
use clap::Subcommand;
use std::fs;
use std::path::Path;

/// Subcommands for settings
#[derive(Subcommand)]
pub enum SettingsSubcommands {
    /// Create a placeholder settings file, if one does not already exist
    Init,
    /// Get the path to where the settings file is read from
    Path,
    /// Write the contents of a placeholder `settings.toml` to the console
    DumpDefault,
}

impl SettingsSubcommands {
    /// Execute the supplied settings subcommand
    pub fn execute(self) -> Result<()> {
        match self {
            Self::Init => handle_init_command()?,
            Self::Path => handle_path_command(),
            Self::DumpDefault => handle_dump_default_command()?,
        }

        Ok(())
    }
}

/// Write a placeholder settings file to `file_path`, creating parent directories as needed
fn write_default_settings_file(file_path: &Path) -> Result<()> {
    ensure!(
        !file_path.exists(),
        "Settings file already exists: {}",
        file_path.display()
    );

    if let Some(dir_path) = file_path.parent() {
        fs::create_dir_all(dir_path)
            .with_context(|| format!("Failed to create directory: {}", dir_path.display()))?;
    }
    fs::write(file_path, Settings::default_file_contents()?)?;

    Ok(())
}

/// Handle the `init` command
fn handle_init_command() -> Result<()> {
    let file_path = get_settings_file_path();
    write_default_settings_file(&file_path)?;
    println!("Created settings file: {}", file_path.display());

    Ok(())
}

/// Handle the `path` command
fn handle_path_command() {
    println!("{}", get_settings_file_path().display());
}

/// Handle the `dump-default` command
fn handle_dump_default_command() -> Result<()> {
    print!("{}", Settings::default_file_contents()?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::read_toml;
    use tempfile::tempdir;

    #[test]
    fn test_write_default_settings_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("sosim").join("settings.toml");
        write_default_settings_file(&file_path).unwrap();

        let settings: Settings = read_toml(&file_path).unwrap();
        assert_eq!(settings, Settings::default());

        // Won't overwrite an existing file
        assert!(write_default_settings_file(&file_path).is_err());
    }
}
