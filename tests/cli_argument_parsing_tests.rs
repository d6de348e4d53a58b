//! Tests for CLI argument parsing and configuration loading
//!
//! These tests verify that command line arguments are parsed, merged with an
//! optional configuration file and validated.

use clap::Parser;
use plantsim_remote::types::config::{CliArgs, ConfigError, SessionConfig};
use plantsim_remote::types::LicenseType;
use std::io::Write;
use std::path::PathBuf;

fn parse(args: &[&str]) -> CliArgs {
    let mut argv = vec!["plantsim-remote"];
    argv.extend_from_slice(args);
    CliArgs::try_parse_from(argv).unwrap()
}

/// Test defaults with only a license type
#[test]
fn test_minimal_arguments() {
    let args = parse(&["--license-type", "Standard"]);
    assert_eq!(args.license_type, Some(LicenseType::Standard));
    assert_eq!(args.backend, "memory");
    assert!(!args.start);

    let config = SessionConfig::from_cli_args(args).unwrap();
    assert_eq!(config, SessionConfig::new(LicenseType::Standard));
    config.validate().unwrap();
}

/// License types are accepted in any case
#[test]
fn test_license_type_is_case_insensitive() {
    assert_eq!(parse(&["-l", "research"]).license_type, Some(LicenseType::Research));
    assert_eq!(parse(&["-l", "STUDENT"]).license_type, Some(LicenseType::Student));

    let error = CliArgs::try_parse_from(["plantsim-remote", "-l", "enterprise"]);
    assert!(error.is_err());
}

/// Session flags and actions
#[test]
fn test_session_flags_and_actions() {
    let args = parse(&[
        "-l",
        "Standard",
        "--hidden",
        "--trust-models",
        "--engine-version",
        "16.1",
        "--model",
        "line.spp",
        "--set",
        "Model.Source.Interval=30",
        "--set",
        "Model.Buffer.Capacity=8",
        "--get",
        "Model.Drain.StatNumIn",
        "--start",
        "--seed",
        "42",
        "--no-reset",
        "--poll-interval-ms",
        "50",
    ]);

    assert_eq!(args.set, vec!["Model.Source.Interval=30", "Model.Buffer.Capacity=8"]);
    assert_eq!(args.get, vec!["Model.Drain.StatNumIn"]);
    assert!(args.start);
    assert_eq!(args.seed, Some(42));
    assert!(args.no_reset);
    assert!(!args.no_wait);

    let config = SessionConfig::from_cli_args(args).unwrap();
    assert!(!config.visible);
    assert!(config.trust_models);
    assert_eq!(config.version.as_deref(), Some("16.1"));
    assert_eq!(config.model, Some(PathBuf::from("line.spp")));
    assert_eq!(config.poll_interval_ms, Some(50));
    assert_eq!(config.dispatch_target(), "Tecnomatix.PlantSimulation.RemoteControl.16.1");
}

/// A license type is required from somewhere
#[test]
fn test_missing_license_type() {
    let result = SessionConfig::from_cli_args(parse(&["--start"]));
    assert!(matches!(result, Err(ConfigError::MissingLicenseType)));
}

/// Command line arguments override the configuration file
#[test]
fn test_cli_overrides_config_file() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"{{"license_type": "Research", "path_context": ".Models.Line", "poll_interval_ms": 10}}"#
    )
    .unwrap();
    let path = file.path().to_string_lossy().into_owned();

    let config = SessionConfig::from_cli_args(parse(&["--config", &path])).unwrap();
    assert_eq!(config.license_type, LicenseType::Research);
    assert_eq!(config.path_context, ".Models.Line");
    assert_eq!(config.poll_interval_ms, Some(10));

    let config = SessionConfig::from_cli_args(parse(&[
        "--config",
        &path,
        "-l",
        "Professional",
        "--path-context",
        ".Models.Cell",
    ]))
    .unwrap();
    assert_eq!(config.license_type, LicenseType::Professional);
    assert_eq!(config.path_context, ".Models.Cell");
    assert_eq!(config.poll_interval_ms, Some(10));
}

/// Missing configuration files are reported as such
#[test]
fn test_missing_config_file() {
    let result = SessionConfig::from_cli_args(parse(&["--config", "does/not/exist.json"]));
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}

/// Invalid values parse but fail validation
#[test]
fn test_invalid_values_fail_validation() {
    let config =
        SessionConfig::from_cli_args(parse(&["-l", "Standard", "--poll-interval-ms", "0"])).unwrap();
    assert!(config.validate().is_err());

    let config =
        SessionConfig::from_cli_args(parse(&["-l", "Standard", "--engine-version", "16.x"])).unwrap();
    assert!(config.validate().is_err());

    let config =
        SessionConfig::from_cli_args(parse(&["-l", "Standard", "--path-context", " "])).unwrap();
    assert!(config.validate().is_err());
}

/// Special flags
#[test]
fn test_special_flags() {
    let args = parse(&["-l", "Standard", "--dry-run", "--print-config", "-v", "-d"]);
    assert!(args.dry_run);
    assert!(args.print_config);
    assert!(args.verbose);
    assert!(args.debug);

    let json = SessionConfig::from_cli_args(args).unwrap().print_json().unwrap();
    assert!(json.contains("\"license_type\": \"Standard\""));
}

/// Output flags for the effective configuration and file logging
#[test]
fn test_save_config_and_log_dir() {
    let args = parse(&["-l", "Standard", "--save-config", "session.json", "--log-dir", "logs"]);
    assert_eq!(args.save_config.as_deref(), Some("session.json"));
    assert_eq!(args.log_dir.as_deref(), Some("logs"));

    let args = parse(&["-l", "Standard"]);
    assert!(args.save_config.is_none());
    assert!(args.log_dir.is_none());
}
