//! Plant Simulation Remote Control
//!
//! A typed remote-control layer for Plant Simulation, driven through the
//! engine's automation interface.
//!
//! # Overview
//!
//! This library opens a session to the engine, controls its lifecycle, reads
//! and writes model values, executes SimTalk and moves tables between the
//! engine and the host. Engine failures are decoded into a small error
//! taxonomy so that license problems can be told apart from everything else.
//!
//! ## Key Features
//!
//! - **Session Facade**: connect, configure, run, query and quit
//! - **Attribute Explorer**: mode control and table import/export
//! - **Table Snapshots**: engine tables copied out as typed, column-inferred snapshots
//! - **Error Decoding**: engine status codes extracted from automation faults
//! - **In-Memory Engine**: a recording engine for tests and offline rehearsal
//!
//! ## Quick Start
//!
//! ```rust
//! use plantsim_remote::*;
//!
//! let engine = MemoryEngine::new();
//! engine.set_run_length(5);
//!
//! let config = SessionConfig::new(LicenseType::Standard).with_visible(false);
//! let session = Session::open(&MemoryDispatcher::new(engine.clone()), &config)?;
//!
//! session.start_simulation(&StartOptions::new().with_seed(42))?;
//! assert_eq!(
//!     engine.value(".Models.Model.EventController.RandomNumbersVariant"),
//!     Some(Value::Integer(42))
//! );
//!
//! session.quit()?;
//! # Ok::<(), PlantSimError>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: values, enumerations and configuration
//! - [`automation`]: the automation seam, fault decoding and the in-memory engine
//! - [`session`]: the session facade, errors and logging
//! - [`explorer`]: the attribute explorer controller
//! - [`table`]: table snapshots and the bridge that fetches them
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │  Explorer   │───►│   Session   │───►│ Automation  │
//! │             │    │             │    │             │
//! │ Mode        │    │ Lifecycle   │    │ Dispatcher  │
//! │ Import      │    │ Values      │    │ Faults      │
//! │ Export      │    │ SimTalk     │    │ Memory      │
//! └─────────────┘    └─────────────┘    └─────────────┘
//!        │                  ▲
//!        ▼                  │
//! ┌─────────────┐           │
//! │   Table     │───────────┘
//! │             │
//! │ Bridge      │
//! │ Snapshot    │
//! └─────────────┘
//! ```
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod automation;
pub mod explorer;
pub mod session;
pub mod table;
pub mod types;

// Core types and configuration
pub use types::{
    ConfigError, ConfigValidationError, ExplorerMode, LicenseType, SessionConfig, Value,
};

// Automation seam
pub use automation::{
    classify, Automation, AutomationFault, Dispatcher, FaultCode, MemoryDispatcher, MemoryEngine,
};

// Session facade
pub use session::{LoggingConfig, ObjectRef, PlantSimError, PlantSimResult, Session, StartOptions};

// Explorer and tables
pub use explorer::{AttributeExplorer, TableFormat};
pub use table::{Column, ColumnKind, TableBridge, TableSnapshot};
