//! Enumeration types for the remote-control layer
//!
//! This module contains the closed enumerations exchanged with the engine:
//! license types accepted at session setup and the attribute explorer modes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// License classes understood by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LicenseType {
    /// Full professional license
    Professional,
    /// Standard license
    Standard,
    /// Application license
    Application,
    /// Runtime-only license
    Runtime,
    /// Research license
    Research,
    /// Educational license
    Educational,
    /// Student license
    Student,
}

impl LicenseType {
    /// Every license type, in the order the engine documents them
    pub const ALL: [LicenseType; 7] = [
        LicenseType::Professional,
        LicenseType::Standard,
        LicenseType::Application,
        LicenseType::Runtime,
        LicenseType::Research,
        LicenseType::Educational,
        LicenseType::Student,
    ];

    /// Spelling the engine expects for `SetLicenseType`
    pub fn as_engine_str(&self) -> &'static str {
        match self {
            LicenseType::Professional => "Professional",
            LicenseType::Standard => "Standard",
            LicenseType::Application => "Application",
            LicenseType::Runtime => "Runtime",
            LicenseType::Research => "Research",
            LicenseType::Educational => "Educational",
            LicenseType::Student => "Student",
        }
    }
}

impl fmt::Display for LicenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_engine_str())
    }
}

impl FromStr for LicenseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "professional" => Ok(LicenseType::Professional),
            "standard" => Ok(LicenseType::Standard),
            "application" => Ok(LicenseType::Application),
            "runtime" => Ok(LicenseType::Runtime),
            "research" => Ok(LicenseType::Research),
            "educational" => Ok(LicenseType::Educational),
            "student" => Ok(LicenseType::Student),
            _ => Err(format!("Unknown license type: {}", s)),
        }
    }
}

/// Operating mode of an attribute explorer object
///
/// The engine stores the mode as a string property named `Mode`. Only
/// [`ExplorerMode::Edit`] allows the explorer table to be overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExplorerMode {
    /// The explorer mirrors live attribute values
    Watch,
    /// The explorer table may be edited and imported into
    Edit,
    /// The explorer reads attribute values on demand
    Read,
}

impl ExplorerMode {
    /// Spelling of the mode as stored in the engine's `Mode` property
    pub fn as_engine_str(&self) -> &'static str {
        match self {
            ExplorerMode::Watch => "Watch",
            ExplorerMode::Edit => "Edit",
            ExplorerMode::Read => "Read",
        }
    }
}

impl fmt::Display for ExplorerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_engine_str())
    }
}

impl FromStr for ExplorerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "watch" => Ok(ExplorerMode::Watch),
            "edit" => Ok(ExplorerMode::Edit),
            "read" => Ok(ExplorerMode::Read),
            _ => Err(format!("Unknown explorer mode: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_license_type_round_trips_through_engine_spelling() {
        for license in LicenseType::ALL {
            let parsed: LicenseType = license.as_engine_str().parse().unwrap();
            assert_eq!(parsed, license);
        }
    }

    #[test]
    fn test_license_type_parsing_is_case_insensitive() {
        assert_eq!("STANDARD".parse::<LicenseType>().unwrap(), LicenseType::Standard);
        assert_eq!(" student ".parse::<LicenseType>().unwrap(), LicenseType::Student);
        assert!("enterprise".parse::<LicenseType>().is_err());
    }

    #[test]
    fn test_explorer_mode_parsing() {
        assert_eq!("Edit".parse::<ExplorerMode>().unwrap(), ExplorerMode::Edit);
        assert_eq!("watch".parse::<ExplorerMode>().unwrap(), ExplorerMode::Watch);
        assert_eq!("READ".parse::<ExplorerMode>().unwrap(), ExplorerMode::Read);

        let err = "Locked".parse::<ExplorerMode>().unwrap_err();
        assert!(err.contains("Locked"));
    }

    #[test]
    fn test_explorer_mode_display_matches_engine_spelling() {
        assert_eq!(ExplorerMode::Watch.to_string(), "Watch");
        assert_eq!(ExplorerMode::Edit.to_string(), "Edit");
        assert_eq!(ExplorerMode::Read.to_string(), "Read");
    }
}
