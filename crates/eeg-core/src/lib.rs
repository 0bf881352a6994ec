//! EEG-Core: Foundation types for the EEG emotion dashboard
//!
//! Signal samples, the brain region catalogue, the patient roster and its
//! CSV export.

pub mod eeg_types;
pub mod error;
pub mod export;
pub mod patient;

pub use eeg_types::*;
pub use error::{ensure_positive, EegError, EegResult, FieldError};
pub use export::{export_file_name, patients_to_csv, write_patients_csv};
pub use patient::{demo_patients, Gender, NewPatient, Patient, PatientStore};
