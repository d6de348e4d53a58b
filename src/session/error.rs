//! Error types and handling
//!
//! This module contains the error taxonomy of the remote-control layer. Faults
//! are classified as close to the point of failure as possible; anything this
//! layer cannot explain is passed through unchanged as [`PlantSimError::Engine`].

use crate::automation::AutomationFault;
use crate::types::Value;
use thiserror::Error;

/// Errors raised by the session, the attribute explorer and the table bridge
#[derive(Debug, Error)]
pub enum PlantSimError {
    /// The automation handle could not be established
    #[error("Could not connect to {target}: {reason}")]
    Connection {
        /// Dispatch target that was requested
        target: String,
        /// Why the connection failed
        reason: String,
    },

    /// The license server or the requested license type is not available
    #[error("License error: {0}")]
    License(String),

    /// An operation's mode precondition is not met
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A table round trip did not produce a parseable table
    #[error("Table parse error: {0}")]
    Parse(String),

    /// The engine returned a value of an unexpected shape
    #[error("Unexpected value at {path}: expected {expected}, got {found:?}")]
    UnexpectedValue {
        /// Object path that was read
        path: String,
        /// What was expected
        expected: String,
        /// What the engine returned
        found: Value,
    },

    /// Unclassified engine fault
    #[error(transparent)]
    Engine(#[from] AutomationFault),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlantSimError {
    /// Create a connection error
    pub fn connection(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Connection { target: target.into(), reason: reason.into() }
    }

    /// Create a license error
    pub fn license(msg: impl Into<String>) -> Self {
        Self::License(msg.into())
    }

    /// Create an invalid state error
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an unexpected value error
    pub fn unexpected_value(
        path: impl Into<String>,
        expected: impl Into<String>,
        found: Value,
    ) -> Self {
        Self::UnexpectedValue { path: path.into(), expected: expected.into(), found }
    }

    /// The engine fault behind this error, if it is an unclassified one
    pub fn fault(&self) -> Option<&AutomationFault> {
        match self {
            PlantSimError::Engine(fault) => Some(fault),
            _ => None,
        }
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            PlantSimError::Connection { .. } => "Connection",
            PlantSimError::License(_) => "License",
            PlantSimError::InvalidState(_) => "Invalid State",
            PlantSimError::Parse(_) => "Parse",
            PlantSimError::UnexpectedValue { .. } => "Unexpected Value",
            PlantSimError::Engine(_) => "Engine",
            PlantSimError::Io(_) => "IO",
        }
    }
}

/// Result type for remote-control operations
pub type PlantSimResult<T> = Result<T, PlantSimError>;
