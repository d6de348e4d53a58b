//! The automation seam between this crate and the engine
//!
//! The engine exposes a synchronous call-and-response object model. This
//! module describes it as two traits:
//!
//! - [`Automation`]: one live handle, one method per remote call
//! - [`Dispatcher`]: creates handles for a dispatch target and owns the
//!   process-wide type description cache used while binding them
//!
//! Calls are blocking and the handle is not required to be reentrant, so the
//! traits take `&self` and make no `Send`/`Sync` promises.
//!
//! [`memory`] provides an in-process engine that implements both traits and
//! records every call.

pub mod fault;
pub mod memory;

pub use fault::*;
pub use memory::{EngineCall, EngineMethod, MemoryDispatcher, MemoryEngine};

use crate::types::Value;
use std::fmt;
use std::io;

/// A live handle to the engine's remote-control object
pub trait Automation: fmt::Debug {
    /// Select the license type to request from the license server
    fn set_license_type(&self, license_type: &str) -> FaultResult<()>;

    /// Load the model file at an absolute path
    fn load_model(&self, path: &str) -> FaultResult<()>;

    /// Show or hide the engine window
    fn set_visible(&self, visible: bool) -> FaultResult<()>;

    /// Trust loaded models
    fn set_trust_models(&self, trust_models: bool) -> FaultResult<()>;

    /// Set the path relative object names are resolved against
    fn set_path_context(&self, path_context: &str) -> FaultResult<()>;

    /// Reset the run governed by an event controller
    fn reset_simulation(&self, event_controller: &str) -> FaultResult<()>;

    /// Start the run governed by an event controller
    fn start_simulation(&self, event_controller: &str) -> FaultResult<()>;

    /// Stop the running simulation
    fn stop_simulation(&self) -> FaultResult<()>;

    /// Whether a simulation run is in progress
    fn is_simulation_running(&self) -> FaultResult<bool>;

    /// Read the value of an object or attribute
    fn get_value(&self, path: &str) -> FaultResult<Value>;

    /// Write the value of an object or attribute
    fn set_value(&self, path: &str, value: &Value) -> FaultResult<()>;

    /// Execute SimTalk source, passing positional parameters when non-empty
    fn execute_simtalk(&self, command: &str, params: &[Value]) -> FaultResult<Value>;

    /// Close the engine
    fn quit(&self) -> FaultResult<()>;
}

/// Failure to create an automation handle
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConnectFault {
    /// The local type description cache is corrupted and must be rebuilt
    #[error("automation type cache is corrupted: {0}")]
    TypeCacheCorrupted(String),

    /// Any other failure raised while dispatching
    #[error(transparent)]
    Fault(#[from] AutomationFault),
}

/// Creates automation handles for a dispatch target
pub trait Dispatcher {
    /// Bind a new handle to `target`
    fn dispatch(&self, target: &str) -> Result<Box<dyn Automation>, ConnectFault>;

    /// Delete the process-wide type description cache so that the next
    /// dispatch regenerates it
    fn clear_type_cache(&self) -> io::Result<()>;
}
