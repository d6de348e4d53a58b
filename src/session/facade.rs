//! Remote-control session
//!
//! This module contains [`Session`], which owns the automation handle and
//! exposes lifecycle control, session properties, generic value access,
//! SimTalk execution and object lookup.

use super::command::normalize;
use super::error::{PlantSimError, PlantSimResult};
use crate::automation::{Automation, ConnectFault, Dispatcher};
use crate::engine_event;
use crate::explorer::AttributeExplorer;
use crate::table::TableBridge;
use crate::types::{
    LicenseType, SessionConfig, Value, DEFAULT_EVENT_CONTROLLER, DEFAULT_PATH_CONTEXT,
};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Dispatch target of the engine's remote-control object
pub const DISPATCH_TARGET: &str = "Tecnomatix.PlantSimulation.RemoteControl";

/// Event controller attribute holding the random number variant
pub const SEED_ATTRIBUTE: &str = "RandomNumbersVariant";

/// Attribute every engine object reports its class through
pub const CLASS_NAME_ATTRIBUTE: &str = "internalClassName";

/// Class name of attribute explorer objects
pub const ATTRIBUTE_EXPLORER_CLASS: &str = "AttributeExplorer";

/// Serializes rebuilds of the process-wide type description cache
static TYPE_CACHE_REBUILD: Mutex<()> = Mutex::new(());

/// Dispatch target for an optional version qualifier
pub fn dispatch_target(version: Option<&str>) -> String {
    match version {
        Some(version) => format!("{}.{}", DISPATCH_TARGET, version),
        None => DISPATCH_TARGET.to_string(),
    }
}

/// Options for [`Session::start_simulation`]
#[derive(Debug, Clone, PartialEq)]
pub struct StartOptions {
    /// Event controller to run; the session default when `None`
    pub controller: Option<String>,
    /// Reset before starting
    pub reset: bool,
    /// Random number variant written to the controller before starting
    pub seed: Option<i64>,
    /// Block until the run has finished
    pub wait: bool,
    /// Sleep between running-state polls while waiting
    pub poll_interval: Option<Duration>,
}

impl Default for StartOptions {
    fn default() -> Self {
        Self { controller: None, reset: true, seed: None, wait: true, poll_interval: None }
    }
}

impl StartOptions {
    /// Reset, start on the default controller and wait
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a specific event controller
    pub fn with_controller(mut self, controller: impl Into<String>) -> Self {
        self.controller = Some(controller.into());
        self
    }

    /// Set the random number variant before starting
    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Do not reset before starting
    pub fn without_reset(mut self) -> Self {
        self.reset = false;
        self
    }

    /// Return as soon as the run has been started
    pub fn without_wait(mut self) -> Self {
        self.wait = false;
        self
    }

    /// Sleep between running-state polls
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }
}

/// Result of [`Session::get_object`]
///
/// The engine owns the set of class names; every class other than the
/// attribute explorer is returned as its raw value.
#[derive(Debug)]
pub enum ObjectRef<'s> {
    /// An attribute explorer bound to the looked-up path
    Explorer(AttributeExplorer<'s>),
    /// The raw value of any other object
    Value(Value),
}

impl<'s> ObjectRef<'s> {
    /// Whether the object is an attribute explorer
    pub fn is_explorer(&self) -> bool {
        matches!(self, ObjectRef::Explorer(_))
    }

    /// The explorer, if the object is one
    pub fn into_explorer(self) -> Option<AttributeExplorer<'s>> {
        match self {
            ObjectRef::Explorer(explorer) => Some(explorer),
            ObjectRef::Value(_) => None,
        }
    }

    /// The raw value, if the object is not an explorer
    pub fn into_value(self) -> Option<Value> {
        match self {
            ObjectRef::Value(value) => Some(value),
            ObjectRef::Explorer(_) => None,
        }
    }
}

/// One live connection to the engine
///
/// The session exclusively owns its automation handle. Calls block until the
/// engine answers; the handle is not reentrant, so a session is used from one
/// thread. [`Session::quit`] consumes the session.
#[derive(Debug)]
pub struct Session {
    handle: Box<dyn Automation>,
    target: String,
    visible: bool,
    trust_models: bool,
    path_context: String,
    event_controller: String,
    license_type: Option<LicenseType>,
    model: Option<PathBuf>,
}

impl Session {
    /// Connect to the engine
    ///
    /// If the dispatcher reports a corrupted type cache, the cache is cleared
    /// and the connection retried exactly once. Every other failure, and a
    /// failure of the retry, is a [`PlantSimError::Connection`].
    ///
    /// The returned session records the engine defaults locally without
    /// sending them; use [`Session::open`] to apply a configuration.
    #[instrument(skip(dispatcher))]
    pub fn connect<D>(dispatcher: &D, version: Option<&str>) -> PlantSimResult<Self>
    where
        D: Dispatcher + ?Sized,
    {
        let target = dispatch_target(version);
        let handle = dispatch_with_rebuild(dispatcher, &target)?;
        info!(target = %target, "connected to engine");

        Ok(Self {
            handle,
            target,
            visible: true,
            trust_models: false,
            path_context: DEFAULT_PATH_CONTEXT.to_string(),
            event_controller: DEFAULT_EVENT_CONTROLLER.to_string(),
            license_type: None,
            model: None,
        })
    }

    /// Connect and apply `config`
    ///
    /// Settings are applied in the order the engine requires: visibility,
    /// trust, license type, model, path context, event controller.
    #[instrument(skip_all, fields(license_type = %config.license_type))]
    pub fn open<D>(dispatcher: &D, config: &SessionConfig) -> PlantSimResult<Self>
    where
        D: Dispatcher + ?Sized,
    {
        let mut session = Self::connect(dispatcher, config.version.as_deref())?;
        session.set_visible(config.visible)?;
        session.set_trust_models(config.trust_models)?;
        session.set_license_type(config.license_type)?;
        if let Some(model) = &config.model {
            session.load_model(model)?;
        }
        session.set_path_context(&config.path_context)?;
        session.set_event_controller(&config.event_controller);
        Ok(session)
    }

    /// Dispatch target this session is bound to
    pub fn target(&self) -> &str {
        &self.target
    }

    /// License type accepted by the engine, if one was set
    pub fn license_type(&self) -> Option<LicenseType> {
        self.license_type
    }

    /// Request a license type from the license server
    #[instrument(skip(self))]
    pub fn set_license_type(&mut self, license_type: LicenseType) -> PlantSimResult<()> {
        match self.handle.set_license_type(license_type.as_engine_str()) {
            Ok(()) => {
                self.license_type = Some(license_type);
                Ok(())
            }
            Err(fault) if fault.is_facility_unavailable() => {
                warn!(%fault, "license type rejected");
                Err(PlantSimError::license(format!(
                    "The license type \"{}\" is not available. Make sure it is a valid Plant Simulation license type and that a license of this type is available in the license server.",
                    license_type
                )))
            }
            Err(fault) => Err(fault.into()),
        }
    }

    /// Model currently loaded through this session
    pub fn model(&self) -> Option<&Path> {
        self.model.as_deref()
    }

    /// Load a model file; relative paths are made absolute first
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn load_model(&mut self, path: impl AsRef<Path>) -> PlantSimResult<()> {
        let model = std::path::absolute(path.as_ref())?;
        let license = self
            .license_type
            .map(|license| license.to_string())
            .unwrap_or_else(|| "(not set)".to_string());

        match self.handle.load_model(&model.to_string_lossy()) {
            Ok(()) => {
                info!(model = %model.display(), "model loaded");
                self.model = Some(model);
                Ok(())
            }
            Err(fault) if fault.is_facility_unavailable() => {
                warn!(%fault, "model load refused for licensing reasons");
                Err(PlantSimError::license(format!(
                    "The license server or the selected license type \"{license}\" is not available. Make sure that the license server is up and running and you can connect to it (VPN etc.). Make sure that a valid license of type \"{license}\" is available in the license server."
                )))
            }
            Err(fault) => Err(fault.into()),
        }
    }

    /// Whether the engine window is visible
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the engine window
    pub fn set_visible(&mut self, visible: bool) -> PlantSimResult<()> {
        self.handle.set_visible(visible)?;
        self.visible = visible;
        Ok(())
    }

    /// Whether loaded models are trusted
    pub fn trust_models(&self) -> bool {
        self.trust_models
    }

    /// Trust loaded models
    pub fn set_trust_models(&mut self, trust_models: bool) -> PlantSimResult<()> {
        self.handle.set_trust_models(trust_models)?;
        self.trust_models = trust_models;
        Ok(())
    }

    /// Path relative object names are resolved against
    pub fn path_context(&self) -> &str {
        &self.path_context
    }

    /// Set the path relative object names are resolved against
    pub fn set_path_context(&mut self, path_context: &str) -> PlantSimResult<()> {
        self.handle.set_path_context(path_context)?;
        self.path_context = path_context.to_string();
        Ok(())
    }

    /// Default event controller for lifecycle calls
    pub fn event_controller(&self) -> &str {
        &self.event_controller
    }

    /// Set the default event controller; stored locally only
    pub fn set_event_controller(&mut self, path: &str) {
        self.event_controller = path.to_string();
    }

    fn controller_or_default<'a>(&'a self, controller: Option<&'a str>) -> &'a str {
        controller.unwrap_or(&self.event_controller)
    }

    /// Reset the run of `controller`, or of the default event controller
    #[instrument(skip(self))]
    pub fn reset_simulation(&self, controller: Option<&str>) -> PlantSimResult<()> {
        let controller = self.controller_or_default(controller);
        self.handle.reset_simulation(controller)?;
        Ok(())
    }

    /// Start a simulation run
    ///
    /// Resets first unless disabled, writes the seed to
    /// `<controller>.RandomNumbersVariant` when given, then starts. With
    /// `wait` set this polls [`Session::is_running`] until it reports `false`.
    /// There is no timeout: if the engine never stops, neither does this call.
    #[instrument(skip(self, options), fields(seed = ?options.seed, wait = options.wait))]
    pub fn start_simulation(&self, options: &StartOptions) -> PlantSimResult<()> {
        let controller = self.controller_or_default(options.controller.as_deref());

        if options.reset {
            self.reset_simulation(Some(controller))?;
        }

        if let Some(seed) = options.seed {
            self.set_value(&format!("{}.{}", controller, SEED_ATTRIBUTE), Value::Integer(seed))?;
        }

        self.handle.start_simulation(controller)?;
        engine_event!(info, "simulation started", controller = controller);

        if options.wait {
            let mut polls: u64 = 0;
            while self.is_running()? {
                polls += 1;
                if let Some(interval) = options.poll_interval {
                    thread::sleep(interval);
                }
            }
            engine_event!(info, "simulation finished", controller = controller, polls = polls);
        }

        Ok(())
    }

    /// Stop the running simulation
    pub fn stop_simulation(&self) -> PlantSimResult<()> {
        self.handle.stop_simulation()?;
        debug!("simulation stopped");
        Ok(())
    }

    /// Whether a simulation run is in progress
    pub fn is_running(&self) -> PlantSimResult<bool> {
        Ok(self.handle.is_simulation_running()?)
    }

    /// Read the value at `path`
    pub fn get_value(&self, path: &str) -> PlantSimResult<Value> {
        let value = self.handle.get_value(path)?;
        debug!(path, value = ?value, "get value");
        Ok(value)
    }

    /// Write `value` to `path`
    pub fn set_value(&self, path: &str, value: impl Into<Value>) -> PlantSimResult<()> {
        let value = value.into();
        debug!(path, value = ?value, "set value");
        self.handle.set_value(path, &value)?;
        Ok(())
    }

    /// Execute SimTalk source and return what it evaluates to
    ///
    /// With `from_context` the command is prefixed with the path context.
    /// Multi-line text is normalized (see [`normalize`]) before dispatch and
    /// `params` are passed positionally when non-empty.
    #[instrument(skip(self, command, params), fields(params = params.len()))]
    pub fn execute_command(
        &self,
        command: &str,
        params: &[Value],
        from_context: bool,
    ) -> PlantSimResult<Value> {
        let command = if from_context {
            format!("{}.{}", self.path_context, command)
        } else {
            command.to_string()
        };
        let command = normalize(&command);

        engine_event!(debug, "execute simtalk", command = command.as_str());
        Ok(self.handle.execute_simtalk(&command, params)?)
    }

    /// Look up an object and return it in the most useful form
    ///
    /// Attribute explorers come back as an [`AttributeExplorer`]; anything
    /// else comes back as the raw value at `path`.
    #[instrument(skip(self))]
    pub fn get_object(&self, path: &str) -> PlantSimResult<ObjectRef<'_>> {
        let class_name = self.get_value(&format!("{}.{}", path, CLASS_NAME_ATTRIBUTE))?;

        match class_name.as_str() {
            Some(ATTRIBUTE_EXPLORER_CLASS) => Ok(ObjectRef::Explorer(self.attribute_explorer(path)?)),
            _ => Ok(ObjectRef::Value(self.get_value(path)?)),
        }
    }

    /// Bind an attribute explorer at `path`
    pub fn attribute_explorer(&self, path: &str) -> PlantSimResult<AttributeExplorer<'_>> {
        AttributeExplorer::new(self, path)
    }

    /// Fetch the table object at `path`
    pub fn table(&self, path: &str) -> PlantSimResult<TableBridge<'_>> {
        TableBridge::new(self, path)
    }

    /// Close the engine and release the handle
    #[instrument(skip(self), fields(target = %self.target))]
    pub fn quit(self) -> PlantSimResult<()> {
        self.handle.quit()?;
        info!("engine closed");
        Ok(())
    }
}

/// Dispatch `target`, rebuilding the type cache once if it is corrupted
fn dispatch_with_rebuild<D>(dispatcher: &D, target: &str) -> PlantSimResult<Box<dyn Automation>>
where
    D: Dispatcher + ?Sized,
{
    match dispatcher.dispatch(target) {
        Ok(handle) => Ok(handle),
        Err(ConnectFault::TypeCacheCorrupted(reason)) => {
            warn!(%reason, "automation type cache corrupted, rebuilding once");
            let _rebuild = TYPE_CACHE_REBUILD.lock().unwrap_or_else(PoisonError::into_inner);

            dispatcher.clear_type_cache().map_err(|e| {
                PlantSimError::connection(target, format!("could not clear the type cache: {}", e))
            })?;

            dispatcher.dispatch(target).map_err(|e| {
                PlantSimError::connection(target, format!("{} (after rebuilding the type cache)", e))
            })
        }
        Err(ConnectFault::Fault(fault)) => Err(PlantSimError::connection(target, fault.to_string())),
    }
}
