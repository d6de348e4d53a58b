//! Table snapshots
//!
//! This module contains the table bridge, which copies engine tables out
//! through a temporary file, and the snapshot type it produces.
//!
//! # Usage Example
//!
//! ```rust
//! use plantsim_remote::automation::{MemoryDispatcher, MemoryEngine};
//! use plantsim_remote::session::Session;
//! use plantsim_remote::types::Value;
//!
//! let engine = MemoryEngine::new();
//! engine.insert_table("Model.Parts", &["Name", "Qty"], &[&["Gear", "4"], &["Shaft", "2"]]);
//! let session = Session::connect(&MemoryDispatcher::new(engine), None)?;
//!
//! let parts = session.table("Model.Parts")?;
//! assert_eq!(parts.current().row_count(), 2);
//! assert_eq!(parts.current().get(1, "Qty"), Some(&Value::Integer(2)));
//! # Ok::<(), plantsim_remote::PlantSimError>(())
//! ```

pub mod bridge;
pub mod snapshot;

pub use bridge::*;
pub use snapshot::*;
