//! In-memory patient roster

use crate::error::{EegError, EegResult, FieldError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Patient gender as recorded on the intake form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "Male"),
            Gender::Female => write!(f, "Female"),
            Gender::Other => write!(f, "Other"),
        }
    }
}

/// A patient record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub diagnosis: String,
    pub last_test_date: Option<NaiveDate>,
    pub medical_history: String,
}

/// Fields submitted by the add-patient form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewPatient {
    pub name: String,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub diagnosis: String,
    pub medical_history: String,
}

/// Accepted patient ages, inclusive
pub const AGE_RANGE: std::ops::RangeInclusive<u32> = 1..=120;

impl NewPatient {
    /// Validate the form, collecting every failure
    pub fn validate(&self) -> EegResult<()> {
        let mut fields = Vec::new();

        if self.name.trim().is_empty() {
            fields.push(FieldError::new("name", "Name is required"));
        }
        match self.age {
            None => fields.push(FieldError::new("age", "Age is required")),
            Some(age) if !AGE_RANGE.contains(&age) => {
                fields.push(FieldError::new("age", "Age must be between 1 and 120"))
            }
            Some(_) => {}
        }
        if self.gender.is_none() {
            fields.push(FieldError::new("gender", "Gender is required"));
        }
        if self.diagnosis.trim().is_empty() {
            fields.push(FieldError::new("diagnosis", "Diagnosis is required"));
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(EegError::InvalidPatient { fields })
        }
    }
}

/// Patient roster held for the lifetime of the application
#[derive(Debug, Clone, Default)]
pub struct PatientStore {
    patients: Vec<Patient>,
}

impl PatientStore {
    pub fn new(patients: Vec<Patient>) -> Self {
        Self { patients }
    }

    /// Roster pre-populated with the demo patients
    pub fn with_demo_patients() -> Self {
        Self::new(demo_patients())
    }

    pub fn all(&self) -> &[Patient] {
        &self.patients
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    /// Look up a patient, failing with `PatientNotFound`
    pub fn find(&self, id: &str) -> EegResult<&Patient> {
        self.get(id).ok_or_else(|| EegError::PatientNotFound { id: id.to_string() })
    }

    /// Case-insensitive match on name or diagnosis
    pub fn search(&self, term: &str) -> Vec<&Patient> {
        let needle = term.trim().to_lowercase();
        self.patients
            .iter()
            .filter(|p| {
                needle.is_empty()
                    || p.name.to_lowercase().contains(&needle)
                    || p.diagnosis.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Validate and store a new patient under the next numeric id
    pub fn add(&mut self, form: NewPatient) -> EegResult<&Patient> {
        form.validate()?;

        let patient = Patient {
            id: self.next_id(),
            name: form.name.trim().to_string(),
            age: form.age.unwrap_or_default(),
            gender: form.gender.unwrap_or(Gender::Other),
            diagnosis: form.diagnosis.trim().to_string(),
            last_test_date: None,
            medical_history: form.medical_history.trim().to_string(),
        };
        info!(id = %patient.id, name = %patient.name, "patient added");

        self.patients.push(patient);
        Ok(&self.patients[self.patients.len() - 1])
    }

    fn next_id(&self) -> String {
        let max = self
            .patients
            .iter()
            .filter_map(|p| p.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        (max + 1).to_string()
    }
}

fn demo_patient(
    id: &str,
    name: &str,
    age: u32,
    gender: Gender,
    diagnosis: &str,
    last_test: Option<(i32, u32, u32)>,
    history: &str,
) -> Patient {
    Patient {
        id: id.to_string(),
        name: name.to_string(),
        age,
        gender,
        diagnosis: diagnosis.to_string(),
        last_test_date: last_test.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        medical_history: history.to_string(),
    }
}

/// The six demo patients shipped with the dashboard
pub fn demo_patients() -> Vec<Patient> {
    vec![
        demo_patient(
            "1",
            "John Smith",
            45,
            Gender::Male,
            "Anxiety Disorder",
            Some((2023, 12, 10)),
            "Previous history of depression, on medication since 2019",
        ),
        demo_patient(
            "2",
            "Sarah Johnson",
            32,
            Gender::Female,
            "Major Depressive Disorder",
            Some((2024, 1, 15)),
            "Family history of depression, first episode in 2021",
        ),
        demo_patient(
            "3",
            "Michael Chen",
            28,
            Gender::Male,
            "PTSD",
            Some((2024, 2, 3)),
            "Trauma related to accident in 2020, in therapy since then",
        ),
        demo_patient(
            "4",
            "Emily Rodriguez",
            39,
            Gender::Female,
            "Bipolar Disorder",
            Some((2023, 11, 20)),
            "Diagnosed in 2018, stable on current medication regimen",
        ),
        demo_patient(
            "5",
            "David Wilson",
            52,
            Gender::Male,
            "Generalized Anxiety Disorder",
            None,
            "New patient, previous therapy with limited success",
        ),
        demo_patient(
            "6",
            "Lisa Thompson",
            41,
            Gender::Female,
            "ADHD",
            Some((2024, 3, 5)),
            "Late diagnosis, currently evaluating treatment efficacy",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> NewPatient {
        NewPatient {
            name: "Ada Byron".to_string(),
            age: Some(36),
            gender: Some(Gender::Female),
            diagnosis: "Insomnia".to_string(),
            medical_history: String::new(),
        }
    }

    #[test]
    fn test_demo_roster() {
        let store = PatientStore::with_demo_patients();
        assert_eq!(store.len(), 6);
        assert_eq!(store.find("5").unwrap().last_test_date, None);
        assert_eq!(
            store.find("1").unwrap().last_test_date,
            NaiveDate::from_ymd_opt(2023, 12, 10)
        );
    }

    #[test]
    fn test_find_missing_patient() {
        let store = PatientStore::with_demo_patients();
        assert_eq!(
            store.find("99"),
            Err(EegError::PatientNotFound { id: "99".to_string() })
        );
    }

    #[test]
    fn test_search_by_name_or_diagnosis() {
        let store = PatientStore::with_demo_patients();

        let anxiety: Vec<_> = store.search("ANXIETY").iter().map(|p| p.id.as_str()).collect();
        assert_eq!(anxiety, vec!["1", "5"]);

        let chen: Vec<_> = store.search("chen").iter().map(|p| p.id.as_str()).collect();
        assert_eq!(chen, vec!["3"]);

        assert_eq!(store.search("").len(), 6);
        assert!(store.search("nobody").is_empty());
    }

    #[test]
    fn test_add_assigns_next_id() {
        let mut store = PatientStore::with_demo_patients();
        let added = store.add(valid_form()).unwrap();
        assert_eq!(added.id, "7");
        assert_eq!(added.last_test_date, None);
        assert_eq!(store.len(), 7);
    }

    #[test]
    fn test_add_to_empty_store() {
        let mut store = PatientStore::default();
        assert_eq!(store.add(valid_form()).unwrap().id, "1");
    }

    #[test]
    fn test_add_rejects_missing_fields() {
        let mut store = PatientStore::with_demo_patients();
        let form = NewPatient {
            name: "   ".to_string(),
            age: Some(0),
            gender: None,
            diagnosis: String::new(),
            medical_history: String::new(),
        };

        match store.add(form) {
            Err(EegError::InvalidPatient { fields }) => {
                let names: Vec<_> = fields.iter().map(|f| f.field).collect();
                assert_eq!(names, vec!["name", "age", "gender", "diagnosis"]);
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
        assert_eq!(store.len(), 6);
    }
}
