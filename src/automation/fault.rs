//! Automation faults and error code decoding
//!
//! Every call through the automation interface can raise a fault. The engine
//! reports its own failures as a generic dispatch exception whose exception
//! info carries the engine-specific status code; this module extracts that
//! code so the session can tell license failures apart from everything else.

use std::fmt;

/// Generic "exception occurred" status the dispatch layer raises when the
/// engine itself reports a failure (`0x80020009`)
pub const DISP_E_EXCEPTION: i32 = 0x8002_0009_u32 as i32;

/// Generic failure status (`0x80004005`)
pub const E_FAIL: i32 = 0x8000_4005_u32 as i32;

/// Result of a single call through the automation interface
pub type FaultResult<T> = Result<T, AutomationFault>;

/// Exception details attached to a dispatch exception
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionInfo {
    /// Component that raised the exception
    pub source: Option<String>,
    /// Human readable description supplied by the engine
    pub description: Option<String>,
    /// Engine-specific status code; zero when the engine supplied none
    pub scode: i32,
}

/// A fault raised by a call into the automation interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomationFault {
    /// Status of the failed call
    pub hresult: i32,
    /// Message describing the status
    pub message: String,
    /// Exception details, present for engine-raised exceptions
    pub exception: Option<ExceptionInfo>,
}

impl AutomationFault {
    /// Create a fault without exception details
    pub fn new(hresult: i32, message: impl Into<String>) -> Self {
        Self { hresult, message: message.into(), exception: None }
    }

    /// Create an engine-raised exception carrying `scode`
    pub fn exception(scode: i32, description: impl Into<String>) -> Self {
        Self {
            hresult: DISP_E_EXCEPTION,
            message: "Exception occurred.".to_string(),
            exception: Some(ExceptionInfo {
                source: Some("Plant Simulation".to_string()),
                description: Some(description.into()),
                scode,
            }),
        }
    }

    /// Create the exception the engine raises when a licensed facility is unavailable
    pub fn facility_unavailable(description: impl Into<String>) -> Self {
        Self::exception(FaultCode::FACILITY_UNAVAILABLE.0, description)
    }

    /// Decoded engine status code, see [`classify`]
    pub fn code(&self) -> Option<FaultCode> {
        classify(self)
    }

    /// Whether this fault reports an unavailable facility (license)
    pub fn is_facility_unavailable(&self) -> bool {
        self.code().is_some_and(|code| code.is_facility_unavailable())
    }
}

impl fmt::Display for AutomationFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:08x})", self.message, self.hresult)?;
        if let Some(exception) = &self.exception {
            if let Some(description) = &exception.description {
                write!(f, ": {}", description)?;
            }
            if exception.scode != 0 {
                write!(f, " [code {}]", exception.scode)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for AutomationFault {}

/// Engine status code extracted from a fault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaultCode(pub i32);

impl FaultCode {
    /// The requested facility is unavailable (`0x80040001`); raised for
    /// unknown license types and unreachable license servers
    pub const FACILITY_UNAVAILABLE: FaultCode = FaultCode(0x8004_0001_u32 as i32);

    /// Whether this is [`FaultCode::FACILITY_UNAVAILABLE`]
    pub fn is_facility_unavailable(&self) -> bool {
        *self == Self::FACILITY_UNAVAILABLE
    }
}

impl fmt::Display for FaultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:08x})", self.0, self.0)
    }
}

/// Extract the engine status code from a fault
///
/// Returns the exception-info status code when the fault carries exception
/// details with a non-zero code, otherwise `None`.
pub fn classify(fault: &AutomationFault) -> Option<FaultCode> {
    fault
        .exception
        .as_ref()
        .map(|exception| exception.scode)
        .filter(|scode| *scode != 0)
        .map(FaultCode)
}
