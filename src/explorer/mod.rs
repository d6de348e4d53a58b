//! Attribute explorer control
//!
//! This module contains the attribute explorer controller and the SimTalk
//! commands it uses to import and export explorer tables.
//!
//! # Usage Example
//!
//! ```rust
//! use plantsim_remote::automation::{MemoryDispatcher, MemoryEngine};
//! use plantsim_remote::session::Session;
//! use plantsim_remote::types::ExplorerMode;
//!
//! let engine = MemoryEngine::new().with_value("Model.Explorer.Mode", "Watch");
//! let session = Session::connect(&MemoryDispatcher::new(engine), None)?;
//!
//! let mut explorer = session.attribute_explorer("Model.Explorer")?;
//! explorer.set_mode(ExplorerMode::Edit)?;
//! assert_eq!(explorer.mode()?, ExplorerMode::Edit);
//! # Ok::<(), plantsim_remote::PlantSimError>(())
//! ```

pub mod commands;
pub mod controller;

pub use commands::{export_command, import_command, TableFormat};
pub use controller::*;
