//! Error types
//!
//! The simulation itself has no failure modes; errors only arise from
//! settings and from the presentation side going away.

use std::fmt;

/// Settings loading and validation errors
#[derive(Debug)]
pub enum SettingsError {
    /// Settings file could not be read
    Io(std::io::Error),
    /// Settings file is not valid JSON for [`crate::Settings`]
    Parse(serde_json::Error),
    /// Settings parsed but describe an unplayable game
    Invalid(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "cannot read settings: {}", e),
            Self::Parse(e) => write!(f, "malformed settings: {}", e),
            Self::Invalid(reason) => write!(f, "invalid settings: {}", reason),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

/// Fatal game loop errors
#[derive(Debug)]
pub enum LoopError {
    /// The front-end hung up while the loop was waiting on it
    FrontendDisconnected,
    /// The loop was built from settings that fail validation
    InvalidSettings(SettingsError),
}

impl fmt::Display for LoopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FrontendDisconnected => write!(f, "front-end disconnected"),
            Self::InvalidSettings(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for LoopError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FrontendDisconnected => None,
            Self::InvalidSettings(e) => Some(e),
        }
    }
}

impl From<SettingsError> for LoopError {
    fn from(err: SettingsError) -> Self {
        Self::InvalidSettings(err)
    }
}
