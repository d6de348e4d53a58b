//! Core types for the remote-control layer
//!
//! This module contains the value, enumeration and configuration types shared
//! by the session facade, the attribute explorer and the table bridge.
//!
//! # Overview
//!
//! - **Value**: the dynamically typed scalar the engine reads and writes
//! - **Enums**: license types and attribute explorer modes
//! - **Configuration**: session configuration with validation and CLI support
//!
//! # Usage Example
//!
//! ```rust
//! use plantsim_remote::types::*;
//!
//! let config = SessionConfig::new(LicenseType::Standard)
//!     .with_visible(false)
//!     .with_model("line.spp");
//! assert!(config.validate().is_ok());
//!
//! let seed = Value::from(42);
//! assert_eq!(seed.as_i64(), Some(42));
//! ```

pub mod config;
pub mod enums;
pub mod value;

// Re-export all public types for convenience
pub use config::*;
pub use enums::*;
pub use value::*;
