use crate::models::{CleanOptions, RawCleanOptions};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// File name the loader looks for inside its configuration directory
pub const OPTIONS_FILE_NAME: &str = "stalesweep.yaml";

/// Loads and saves cleanup options from a YAML file.
///
/// Hosts that keep plugin options on disk (rather than building them in code)
/// point this at their project directory. JSON is accepted too, since it is a
/// subset of YAML.
#[derive(Debug, Clone)]
pub struct OptionsLoader {
    config_dir: Utf8PathBuf,
    options_path: Utf8PathBuf,
}

impl OptionsLoader {
    /// Create a loader for `config_dir`.
    ///
    /// The directory is not created or checked until options are loaded or saved.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Self {
        let config_dir = config_dir.as_ref().to_path_buf();
        Self {
            options_path: config_dir.join(OPTIONS_FILE_NAME),
            config_dir,
        }
    }

    /// Load and resolve the options file.
    ///
    /// # Returns
    /// The resolved options, or the defaults if the file doesn't exist
    pub fn load_options(&self) -> Result<CleanOptions> {
        if !self.options_path.exists() {
            tracing::warn!(
                "Options file not found at {}, using defaults",
                self.options_path
            );
            return Ok(CleanOptions::default());
        }

        let file_contents = fs::read_to_string(&self.options_path)
            .with_context(|| format!("Failed to read options file: {}", self.options_path))?;

        let options = CleanOptions::from_yaml_str(&file_contents)
            .with_context(|| format!("Failed to parse options file: {}", self.options_path))?;

        tracing::info!("Loaded cleanup options from {}", self.options_path);
        Ok(options)
    }

    /// Write raw options to the options file, creating the directory if needed.
    ///
    /// Only fields that are set are written, so the file stays a minimal override.
    pub fn save_options(&self, options: &RawCleanOptions) -> Result<()> {
        if !self.config_dir.exists() {
            fs::create_dir_all(&self.config_dir).with_context(|| {
                format!("Failed to create config directory: {}", self.config_dir)
            })?;
        }

        let yaml_string =
            serde_yaml_ng::to_string(options).context("Failed to serialize options to YAML")?;

        fs::write(&self.options_path, yaml_string)
            .with_context(|| format!("Failed to write options file: {}", self.options_path))?;

        tracing::info!("Saved cleanup options to {}", self.options_path);
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    /// Get the options file path.
    pub fn options_path(&self) -> &Utf8Path {
        &self.options_path
    }
}
