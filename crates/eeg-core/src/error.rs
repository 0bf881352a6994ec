//! Error handling for the EEG dashboard
//!
//! One error type shared by the roster, the generators and the live stream.

use thiserror::Error;

/// Result type alias for dashboard operations
pub type EegResult<T> = Result<T, EegError>;

/// Error type for all dashboard library operations
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum EegError {
    /// A numeric parameter is outside its valid range
    #[error("Invalid parameter {name}: {value} ({reason})")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f64,
        /// Valid range description
        reason: &'static str,
    },

    /// Channel list is empty or contains duplicates
    #[error("Invalid channel set: {reason}")]
    InvalidChannelSet {
        /// Description of the problem
        reason: String,
    },

    /// No patient with the requested id
    #[error("Patient not found: {id}")]
    PatientNotFound {
        /// Requested patient id
        id: String,
    },

    /// Add-patient form failed validation
    #[error("Invalid patient record: {}", format_fields(.fields))]
    InvalidPatient {
        /// Every field that failed validation
        fields: Vec<FieldError>,
    },

    /// The live stream task is no longer running
    #[error("Live stream closed")]
    StreamClosed,

    /// Configuration could not be loaded
    #[error("Configuration error: {reason}")]
    Config {
        /// Description of the problem
        reason: String,
    },

    /// File system failure while exporting or loading
    #[error("I/O error: {reason}")]
    Io {
        /// Description of the problem
        reason: String,
    },
}

/// A single failed form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    pub const fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

fn format_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.field, f.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<std::io::Error> for EegError {
    fn from(err: std::io::Error) -> Self {
        EegError::Io {
            reason: err.to_string(),
        }
    }
}

/// Reject non-positive or non-finite values for a named parameter
pub fn ensure_positive(name: &'static str, value: f64) -> EegResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EegError::InvalidParameter {
            name,
            value,
            reason: "must be a finite value greater than zero",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = EegError::InvalidParameter {
            name: "sampling_rate_hz",
            value: -5.0,
            reason: "must be a finite value greater than zero",
        };
        let display = format!("{}", error);
        assert!(display.contains("sampling_rate_hz"));
        assert!(display.contains("-5"));
    }

    #[test]
    fn test_invalid_patient_lists_every_field() {
        let error = EegError::InvalidPatient {
            fields: vec![
                FieldError::new("name", "Name is required"),
                FieldError::new("age", "Age must be between 1 and 120"),
            ],
        };
        let display = error.to_string();
        assert!(display.contains("name: Name is required"));
        assert!(display.contains("age: Age must be between 1 and 120"));
    }

    #[test]
    fn test_ensure_positive() {
        assert!(ensure_positive("duration_secs", 30.0).is_ok());
        assert!(ensure_positive("duration_secs", 0.0).is_err());
        assert!(ensure_positive("duration_secs", f64::NAN).is_err());
        assert!(ensure_positive("duration_secs", f64::INFINITY).is_err());
    }
}
