//! CSV export of the patient roster

use crate::error::EegResult;
use crate::patient::Patient;
use chrono::NaiveDate;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Header row of the exported document
pub const CSV_HEADER: [&str; 7] = [
    "ID",
    "Name",
    "Age",
    "Gender",
    "Diagnosis",
    "Last Test Date",
    "Medical History",
];

/// Wrap a free-text field in quotes, doubling embedded quotes
fn quoted(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn csv_row(patient: &Patient) -> String {
    let last_test = patient
        .last_test_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "Never".to_string());

    [
        patient.id.clone(),
        quoted(&patient.name),
        patient.age.to_string(),
        patient.gender.to_string(),
        quoted(&patient.diagnosis),
        last_test,
        quoted(&patient.medical_history),
    ]
    .join(",")
}

/// Render patients as a CSV document, one line per patient
pub fn patients_to_csv(patients: &[Patient]) -> String {
    let mut csv = CSV_HEADER.join(",");
    csv.push('\n');
    for patient in patients {
        csv.push_str(&csv_row(patient));
        csv.push('\n');
    }
    csv
}

/// Default download name for an export made on `date`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("patient_database_{}.csv", date.format("%Y-%m-%d"))
}

/// Write the CSV document to `path`
pub fn write_patients_csv(path: &Path, patients: &[Patient]) -> EegResult<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(patients_to_csv(patients).as_bytes())?;
    info!(path = %path.display(), rows = patients.len(), "patient roster exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patient::{demo_patients, Gender};

    fn quoted_patient() -> Patient {
        Patient {
            id: "1".to_string(),
            name: "A \"B\" C".to_string(),
            age: 10,
            gender: Gender::Male,
            diagnosis: "D".to_string(),
            last_test_date: None,
            medical_history: "H".to_string(),
        }
    }

    #[test]
    fn test_header_row() {
        let csv = patients_to_csv(&[]);
        assert_eq!(csv, "ID,Name,Age,Gender,Diagnosis,Last Test Date,Medical History\n");
    }

    #[test]
    fn test_quotes_are_doubled_and_missing_date_is_never() {
        let csv = patients_to_csv(&[quoted_patient()]);
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, r#"1,"A ""B"" C",10,Male,"D",Never,"H""#);
    }

    #[test]
    fn test_demo_roster_export() {
        let csv = patients_to_csv(&demo_patients());
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(
            lines[1],
            "1,\"John Smith\",45,Male,\"Anxiety Disorder\",2023-12-10,\
             \"Previous history of depression, on medication since 2019\""
        );
        assert!(lines[5].contains(",Never,"));
        assert!(csv.ends_with('\n'));
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(export_file_name(date), "patient_database_2024-03-05.csv");
    }

    #[test]
    fn test_write_to_disk() {
        let path = std::env::temp_dir().join(format!("eeg_export_{}.csv", std::process::id()));
        write_patients_csv(&path, &[quoted_patient()]).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, patients_to_csv(&[quoted_patient()]));
        let _ = std::fs::remove_file(&path);
    }
}
