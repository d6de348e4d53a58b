//! Configuration structures for the remote-control session
//!
//! This module contains the session configuration, the command line surface of
//! the `plantsim-remote` binary and the validation logic applied before a
//! session is opened.

use super::LicenseType;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default path context the engine resolves relative object names against
pub const DEFAULT_PATH_CONTEXT: &str = ".Models.Model";

/// Default event controller of a freshly created model
pub const DEFAULT_EVENT_CONTROLLER: &str = ".Models.Model.EventController";

/// Command line arguments structure
#[derive(Debug, Clone, Parser)]
#[command(
    name = "plantsim-remote",
    version = "0.1.0",
    about = "Plant Simulation remote control - drives the engine through its automation interface",
    long_about = "Opens a remote-control session to Plant Simulation, applies the session configuration and performs the requested operations in order: set values, read values, run the simulation, execute SimTalk, look up objects and fetch tables.

EXAMPLES:
    # Load a model and run it to completion with a fixed seed
    plantsim-remote --license-type Standard --model line.spp --start --seed 42

    # Use a configuration file
    plantsim-remote --config session.json --get Model.Source.Interval

    # Fetch a table as JSON
    plantsim-remote --config session.json --table Model.Results

    # Generate configuration template
    plantsim-remote --license-type Research --print-config > session.json

    # Validate configuration without connecting
    plantsim-remote --config session.json --dry-run

CONFIGURATION:
    Configuration can be provided via:
    1. Command line arguments (highest priority)
    2. Configuration file (--config flag)
    3. Default values (lowest priority)

    Supported configuration file formats: JSON (.json)
    The license type has no default and must come from the file or the command line."
)]
pub struct CliArgs {
    /// Configuration file path (JSON format)
    #[arg(
        short,
        long,
        help = "Configuration file path (JSON format)",
        long_help = "Path to a JSON configuration file. CLI arguments will override file settings."
    )]
    pub config: Option<String>,

    /// License type requested from the license server
    #[arg(
        short,
        long,
        help = "License type (Professional, Standard, Application, Runtime, Research, Educational, Student)"
    )]
    pub license_type: Option<LicenseType>,

    /// Version qualifier appended to the dispatch target
    #[arg(long, help = "Engine version qualifier, e.g. 16.1")]
    pub engine_version: Option<String>,

    /// Run the engine without a visible window
    #[arg(long, help = "Hide the engine window")]
    pub hidden: bool,

    /// Trust models so that their init methods run without confirmation
    #[arg(long, help = "Trust loaded models")]
    pub trust_models: bool,

    /// Path context for relative object names
    #[arg(long, help = "Path context for relative object names (default: .Models.Model)")]
    pub path_context: Option<String>,

    /// Default event controller for simulation runs
    #[arg(long, help = "Event controller path (default: .Models.Model.EventController)")]
    pub event_controller: Option<String>,

    /// Model file to load after connecting
    #[arg(short, long, help = "Model file to load")]
    pub model: Option<String>,

    /// Automation backend
    #[arg(
        long,
        default_value = "memory",
        help = "Automation backend",
        long_help = "Automation backend used to reach the engine. The in-process 'memory' engine records every call and is used for offline rehearsal of command sequences."
    )]
    pub backend: String,

    /// Start the simulation
    #[arg(long, help = "Start the simulation on the event controller")]
    pub start: bool,

    /// Random seed written to the event controller before starting
    #[arg(long, help = "Random number variant set before starting")]
    pub seed: Option<i64>,

    /// Skip the reset before starting
    #[arg(long, help = "Do not reset the simulation before starting")]
    pub no_reset: bool,

    /// Return right after starting instead of waiting for the run to end
    #[arg(long, help = "Do not wait for the simulation to finish")]
    pub no_wait: bool,

    /// Sleep between `IsSimulationRunning` polls
    #[arg(long, help = "Milliseconds to sleep between running-state polls")]
    pub poll_interval_ms: Option<u64>,

    /// Values to write, as PATH=VALUE
    #[arg(long = "set", value_name = "PATH=VALUE", help = "Write a value (repeatable)")]
    pub set: Vec<String>,

    /// Values to read
    #[arg(long = "get", value_name = "PATH", help = "Read a value (repeatable)")]
    pub get: Vec<String>,

    /// SimTalk commands to execute
    #[arg(long = "simtalk", value_name = "COMMAND", help = "Execute a SimTalk command (repeatable)")]
    pub simtalk: Vec<String>,

    /// Objects to look up by kind
    #[arg(long = "object", value_name = "PATH", help = "Look up an object and describe it (repeatable)")]
    pub object: Vec<String>,

    /// Tables to fetch as JSON
    #[arg(long = "table", value_name = "PATH", help = "Fetch a table as JSON (repeatable)")]
    pub table: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    /// Dry run mode - validate configuration without connecting
    #[arg(long, help = "Validate configuration without connecting")]
    pub dry_run: bool,

    /// Print the effective configuration and exit
    #[arg(long, help = "Print the effective configuration in JSON format and exit")]
    pub print_config: bool,

    /// Write the effective configuration to a JSON file
    #[arg(long, value_name = "FILE", help = "Save the effective configuration to a JSON file")]
    pub save_config: Option<String>,

    /// Directory for JSON log files
    #[arg(long, value_name = "DIR", help = "Write JSON logs to daily rolling files in DIR")]
    pub log_dir: Option<String>,
}

/// Configuration file structure (allows partial configuration)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// License type requested from the license server
    pub license_type: Option<LicenseType>,

    /// Version qualifier appended to the dispatch target
    pub version: Option<String>,

    /// Whether the engine window is visible
    pub visible: Option<bool>,

    /// Whether loaded models are trusted
    pub trust_models: Option<bool>,

    /// Path context for relative object names
    pub path_context: Option<String>,

    /// Default event controller
    pub event_controller: Option<String>,

    /// Model file loaded after connecting
    pub model: Option<PathBuf>,

    /// Sleep between running-state polls while waiting for a run
    pub poll_interval_ms: Option<u64>,
}

impl ConfigFile {
    /// Load a partial configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }
}

/// Configuration of a remote-control session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// License type requested from the license server
    pub license_type: LicenseType,

    /// Version qualifier appended to the dispatch target
    pub version: Option<String>,

    /// Whether the engine window is visible
    pub visible: bool,

    /// Whether loaded models are trusted
    pub trust_models: bool,

    /// Path context for relative object names
    pub path_context: String,

    /// Default event controller
    pub event_controller: String,

    /// Model file loaded after connecting
    pub model: Option<PathBuf>,

    /// Sleep between running-state polls while waiting for a run
    pub poll_interval_ms: Option<u64>,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Configuration file read error
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported configuration file format
    #[error("Unsupported configuration file format: {0} (supported: .json)")]
    UnsupportedFormat(String),

    /// No license type in the file or on the command line
    #[error("No license type configured; pass --license-type or set \"license_type\" in the configuration file")]
    MissingLicenseType,
}

/// Validation errors for session configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    /// Path context is empty
    #[error("Path context must not be empty")]
    EmptyPathContext,

    /// Event controller path is empty
    #[error("Event controller path must not be empty")]
    EmptyEventController,

    /// Version qualifier contains characters the dispatch target cannot carry
    #[error("Invalid engine version qualifier: {0:?} (expected digits and dots, e.g. 16.1)")]
    InvalidVersion(String),

    /// Model path is empty
    #[error("Model path must not be empty")]
    EmptyModelPath,

    /// Poll interval is zero
    #[error("Poll interval must be greater than 0 ms when set")]
    InvalidPollInterval,
}

impl SessionConfig {
    /// Create a configuration with the given license type and default settings
    pub fn new(license_type: LicenseType) -> Self {
        Self {
            license_type,
            version: None,
            visible: true,
            trust_models: false,
            path_context: DEFAULT_PATH_CONTEXT.to_string(),
            event_controller: DEFAULT_EVENT_CONTROLLER.to_string(),
            model: None,
            poll_interval_ms: None,
        }
    }

    /// Set the version qualifier
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set window visibility
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Set whether models are trusted
    pub fn with_trust_models(mut self, trust_models: bool) -> Self {
        self.trust_models = trust_models;
        self
    }

    /// Set the path context
    pub fn with_path_context(mut self, path_context: impl Into<String>) -> Self {
        self.path_context = path_context.into();
        self
    }

    /// Set the default event controller
    pub fn with_event_controller(mut self, event_controller: impl Into<String>) -> Self {
        self.event_controller = event_controller.into();
        self
    }

    /// Set the model loaded after connecting
    pub fn with_model(mut self, model: impl Into<PathBuf>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Create configuration from parsed CLI arguments
    pub fn from_cli_args(args: CliArgs) -> Result<Self, ConfigError> {
        let mut config_file = match &args.config {
            Some(config_path) => ConfigFile::from_file(config_path)?,
            None => ConfigFile::default(),
        };

        // CLI takes precedence over the file
        Self::apply_cli_overrides(&mut config_file, args);

        Self::from_config_file(config_file)
    }

    /// Load a complete configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::from_config_file(ConfigFile::from_file(path)?)
    }

    /// Create configuration from a config file, merging with defaults
    fn from_config_file(config_file: ConfigFile) -> Result<Self, ConfigError> {
        let license_type = config_file.license_type.ok_or(ConfigError::MissingLicenseType)?;
        let defaults = Self::new(license_type);

        Ok(Self {
            license_type,
            version: config_file.version.or(defaults.version),
            visible: config_file.visible.unwrap_or(defaults.visible),
            trust_models: config_file.trust_models.unwrap_or(defaults.trust_models),
            path_context: config_file.path_context.unwrap_or(defaults.path_context),
            event_controller: config_file.event_controller.unwrap_or(defaults.event_controller),
            model: config_file.model.or(defaults.model),
            poll_interval_ms: config_file.poll_interval_ms.or(defaults.poll_interval_ms),
        })
    }

    /// Apply CLI argument overrides to a partial configuration
    fn apply_cli_overrides(config: &mut ConfigFile, args: CliArgs) {
        if let Some(value) = args.license_type {
            config.license_type = Some(value);
        }
        if let Some(value) = args.engine_version {
            config.version = Some(value);
        }
        // Flags only ever move away from the defaults
        if args.hidden {
            config.visible = Some(false);
        }
        if args.trust_models {
            config.trust_models = Some(true);
        }
        if let Some(value) = args.path_context {
            config.path_context = Some(value);
        }
        if let Some(value) = args.event_controller {
            config.event_controller = Some(value);
        }
        if let Some(value) = args.model {
            config.model = Some(PathBuf::from(value));
        }
        if let Some(value) = args.poll_interval_ms {
            config.poll_interval_ms = Some(value);
        }
    }

    /// Dispatch target this configuration connects to
    pub fn dispatch_target(&self) -> String {
        crate::session::dispatch_target(self.version.as_deref())
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Print configuration as JSON
    pub fn print_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.path_context.trim().is_empty() {
            return Err(ConfigValidationError::EmptyPathContext);
        }

        if self.event_controller.trim().is_empty() {
            return Err(ConfigValidationError::EmptyEventController);
        }

        if let Some(version) = &self.version {
            let well_formed = !version.is_empty()
                && !version.starts_with('.')
                && !version.ends_with('.')
                && version.chars().all(|c| c.is_ascii_digit() || c == '.');
            if !well_formed {
                return Err(ConfigValidationError::InvalidVersion(version.clone()));
            }
        }

        if let Some(model) = &self.model {
            if model.as_os_str().is_empty() {
                return Err(ConfigValidationError::EmptyModelPath);
            }
        }

        if self.poll_interval_ms == Some(0) {
            return Err(ConfigValidationError::InvalidPollInterval);
        }

        Ok(())
    }
}
