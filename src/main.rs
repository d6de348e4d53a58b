// Plant Simulation Remote Control - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/plantsim-remote --license-type Standard --start --seed 42
// ```
//
// Or with a configuration file:
//
// ```console
// $ ./target/release/plantsim-remote --config session.json --table Model.Results --verbose
// ```

use anyhow::{bail, Context};
use clap::Parser;
use plantsim_remote::automation::{Dispatcher, MemoryDispatcher, MemoryEngine};
use plantsim_remote::session::{LoggingConfig, ObjectRef, Session, StartOptions};
use plantsim_remote::types::config::CliArgs;
use plantsim_remote::types::{SessionConfig, Value};
use std::process;
use std::time::Duration;
use tracing::{error, info};

fn main() {
    let args = CliArgs::parse();

    // Special flags that don't need logging or a session
    if args.print_config {
        let json = SessionConfig::from_cli_args(args.clone())
            .map_err(anyhow::Error::from)
            .and_then(|config| config.print_json().map_err(anyhow::Error::from));
        match json {
            Ok(json) => {
                println!("{}", json);
                return;
            }
            Err(e) => {
                eprintln!("Failed to build configuration: {}", e);
                process::exit(1);
            }
        }
    }

    let logging_result = if let Some(log_dir) = &args.log_dir {
        LoggingConfig::init_prod(log_dir.as_str())
    } else if args.debug {
        LoggingConfig::init_debug()
    } else if args.verbose {
        LoggingConfig::init_verbose()
    } else {
        LoggingConfig::new().with_level(tracing::Level::WARN).init()
    };

    if let Err(e) = logging_result {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    if let Err(e) = run(args) {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(args: CliArgs) -> anyhow::Result<()> {
    let config = SessionConfig::from_cli_args(args.clone()).context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;
    info!("Configuration loaded and validated successfully");

    if let Some(path) = &args.save_config {
        config
            .save_to_file(path)
            .with_context(|| format!("Failed to save configuration to {}", path))?;
        eprintln!("Configuration saved to {}", path);
    }

    if args.dry_run {
        eprintln!("Configuration validation successful!");
        eprintln!("Dry run mode - no session will be opened.");
        print_configuration_summary(&config);
        return Ok(());
    }

    let dispatcher = dispatcher_for(&args.backend)?;
    let session = Session::open(dispatcher.as_ref(), &config)
        .with_context(|| format!("Failed to open a session on {}", config.dispatch_target()))?;

    let result = perform(&session, &args, &config);

    // Always close the engine, but report the first failure
    let quit = session.quit().context("Failed to close the engine");
    result.and(quit)
}

/// Resolve the automation backend named on the command line
fn dispatcher_for(backend: &str) -> anyhow::Result<Box<dyn Dispatcher>> {
    match backend.to_lowercase().as_str() {
        "memory" => Ok(Box::new(MemoryDispatcher::new(MemoryEngine::new()))),
        other => bail!("Unsupported automation backend: {} (available: memory)", other),
    }
}

/// Carry out the requested operations in a fixed order
fn perform(session: &Session, args: &CliArgs, config: &SessionConfig) -> anyhow::Result<()> {
    for assignment in &args.set {
        let (path, value) = parse_assignment(assignment)?;
        session.set_value(path, value.clone()).with_context(|| format!("Failed to set {}", path))?;
        info!(path, %value, "value written");
    }

    for path in &args.get {
        let value = session.get_value(path).with_context(|| format!("Failed to read {}", path))?;
        println!("{} = {}", path, value);
    }

    if args.start {
        let mut options = StartOptions::new();
        if let Some(seed) = args.seed {
            options = options.with_seed(seed);
        }
        if args.no_reset {
            options = options.without_reset();
        }
        if args.no_wait {
            options = options.without_wait();
        }
        if let Some(interval) = config.poll_interval_ms {
            options = options.with_poll_interval(Duration::from_millis(interval));
        }
        session.start_simulation(&options).context("Simulation run failed")?;
        eprintln!("Simulation {}", if options.wait { "finished" } else { "started" });
    }

    for command in &args.simtalk {
        let result = session
            .execute_command(command, &[], false)
            .with_context(|| format!("SimTalk command failed: {}", command))?;
        if !result.is_empty() {
            println!("{}", result);
        }
    }

    for path in &args.object {
        match session.get_object(path).with_context(|| format!("Failed to look up {}", path))? {
            ObjectRef::Explorer(explorer) => {
                println!("{}: attribute explorer in {} mode", path, explorer.cached_mode())
            }
            ObjectRef::Value(value) => println!("{}: {} {}", path, value.type_name(), value),
        }
    }

    for path in &args.table {
        let table = session.table(path).with_context(|| format!("Failed to fetch table {}", path))?;
        println!("{}", table.current().to_json()?);
    }

    Ok(())
}

/// Split `PATH=VALUE`
fn parse_assignment(assignment: &str) -> anyhow::Result<(&str, Value)> {
    match assignment.split_once('=') {
        Some((path, value)) if !path.trim().is_empty() => {
            Ok((path.trim(), Value::parse_literal(value)))
        }
        _ => bail!("Expected PATH=VALUE, got '{}'", assignment),
    }
}

/// Print configuration summary
fn print_configuration_summary(config: &SessionConfig) {
    eprintln!("Configuration:");
    eprintln!("  Dispatch Target: {}", config.dispatch_target());
    eprintln!("  License Type: {}", config.license_type);
    eprintln!("  Visible: {}", config.visible);
    eprintln!("  Trust Models: {}", config.trust_models);
    eprintln!("  Path Context: {}", config.path_context);
    eprintln!("  Event Controller: {}", config.event_controller);
    if let Some(model) = &config.model {
        eprintln!("  Model: {}", model.display());
    }
    if let Some(interval) = config.poll_interval_ms {
        eprintln!("  Poll Interval: {} ms", interval);
    }
    eprintln!();
}
