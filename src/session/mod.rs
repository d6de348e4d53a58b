//! Session facade, error taxonomy and logging
//!
//! This module contains the remote-control session, the errors it raises,
//! SimTalk command normalization and the logging setup.
//!
//! # Overview
//!
//! - **Session**: owns the automation handle; lifecycle, properties, values, SimTalk
//! - **StartOptions**: reset, seed and wait behavior of a simulation start
//! - **PlantSimError**: classified errors raised by every component
//! - **LoggingConfig**: tracing subscriber setup for library users and the CLI
//!
//! # Usage Example
//!
//! ```rust
//! use plantsim_remote::automation::{MemoryDispatcher, MemoryEngine};
//! use plantsim_remote::session::*;
//! use plantsim_remote::types::*;
//!
//! let engine = MemoryEngine::new();
//! engine.set_run_length(3);
//!
//! let config = SessionConfig::new(LicenseType::Standard).with_visible(false);
//! let session = Session::open(&MemoryDispatcher::new(engine.clone()), &config)?;
//! session.start_simulation(&StartOptions::new().with_seed(42))?;
//! assert!(!session.is_running()?);
//! session.quit()?;
//! # Ok::<(), PlantSimError>(())
//! ```

pub mod command;
pub mod error;
pub mod facade;
pub mod logging;

// Re-export all public types for convenience
pub use command::*;
pub use error::*;
pub use facade::*;
pub use logging::*;
