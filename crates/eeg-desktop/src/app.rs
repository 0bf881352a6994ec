//! Main application state and navigation

use eeg_core::{
    export_file_name, write_patients_csv, BrainRegion, DeviceStatus, EegError, FieldError, Gender,
    NewPatient, Patient, PatientStore, BRAIN_REGIONS,
};
use eeg_simulation::{
    start_emotion_analysis, start_live_stream, AnalysisHandle, AnalysisStatus, LiveSnapshot,
    RngSource, StreamCommand, StreamHandle, StressAlert,
};
use std::collections::BTreeSet;
use std::path::Path;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::config::DashboardConfig;
use crate::notifications::Toasts;

/// Top-level page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Patients,
    AddPatient,
    Test,
}

/// Tab of the test page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestTab {
    Eeg,
    Emotion,
}

/// Raw text of the add-patient form
#[derive(Debug, Clone, Default)]
pub struct PatientForm {
    pub name: String,
    pub age: String,
    pub gender: Option<Gender>,
    pub diagnosis: String,
    pub medical_history: String,
}

impl PatientForm {
    pub fn to_new_patient(&self) -> NewPatient {
        let age = self.age.trim();
        NewPatient {
            name: self.name.clone(),
            // unparseable input is reported as out of range
            age: if age.is_empty() {
                None
            } else {
                Some(age.parse().unwrap_or(0))
            },
            gender: self.gender,
            diagnosis: self.diagnosis.clone(),
            medical_history: self.medical_history.clone(),
        }
    }
}

/// UI state that outlives individual pages
#[derive(Debug)]
pub struct UIState {
    pub search_term: String,
    pub form: PatientForm,
    pub form_errors: Vec<FieldError>,
}

impl UIState {
    pub fn new() -> Self {
        Self {
            search_term: String::new(),
            form: PatientForm::default(),
            form_errors: Vec::new(),
        }
    }

    /// Inline message for a form field, if it failed validation
    pub fn field_error(&self, field: &str) -> Option<&'static str> {
        self.form_errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message)
    }
}

/// A running test: live EEG stream plus emotion analysis for one patient
pub struct TestView {
    pub patient: Patient,
    stream: StreamHandle,
    alerts: broadcast::Receiver<StressAlert>,
    analysis: AnalysisHandle,
    pub snapshot: LiveSnapshot,
    pub analysis_status: AnalysisStatus,
    pub active_regions: BTreeSet<&'static str>,
    pub tab: TestTab,
    pub paused: bool,
    pub rate_input: f64,
}

impl TestView {
    pub fn is_region_active(&self, id: &str) -> bool {
        self.active_regions.contains(id)
    }

    pub fn toggle_region(&mut self, region: &BrainRegion) {
        if !self.active_regions.remove(region.id) {
            self.active_regions.insert(region.id);
        }
    }

    /// Connecting until the first live tick of the current window arrives
    pub fn device_status(&self) -> DeviceStatus {
        if !self.stream.is_running() {
            DeviceStatus::Disconnected
        } else if self.snapshot.tick == 0 {
            DeviceStatus::Connecting
        } else {
            DeviceStatus::Connected
        }
    }
}

/// Main application state
pub struct EegDashboardApp {
    pub config: DashboardConfig,
    pub store: PatientStore,
    pub page: Page,
    pub ui_state: UIState,
    pub test: Option<TestView>,
    pub toasts: Toasts,
    // Must drop after `test`: stream tasks are aborted before the runtime shuts down
    runtime: tokio::runtime::Runtime,
}

impl EegDashboardApp {
    pub fn new(config: DashboardConfig) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Runtime::new()
            .map_err(|e| anyhow::anyhow!("Failed to create tokio runtime: {}", e))?;

        Ok(EegDashboardApp {
            config,
            store: PatientStore::with_demo_patients(),
            page: Page::Patients,
            ui_state: UIState::new(),
            test: None,
            toasts: Toasts::default(),
            runtime,
        })
    }

    pub fn filtered_patients(&self) -> Vec<&Patient> {
        self.store.search(&self.ui_state.search_term)
    }

    /// Navigate to the test page; unknown ids bounce back to the list
    pub fn open_test(&mut self, patient_id: &str) {
        self.close_test();

        let patient = match self.store.find(patient_id) {
            Ok(patient) => patient.clone(),
            Err(e) => {
                warn!("{}", e);
                self.toasts.error("Error", "Patient not found");
                self.page = Page::Patients;
                return;
            }
        };

        match self.start_test(patient) {
            Ok(view) => {
                self.toasts.info(
                    "Test Started",
                    format!("EEG recording initiated for {}", view.patient.name),
                );
                info!(patient = %view.patient.id, session = %view.snapshot.session_id, "test started");
                self.test = Some(view);
                self.page = Page::Test;
            }
            Err(e) => {
                warn!("Failed to start test: {}", e);
                self.toasts.error("Error", e.to_string());
                self.page = Page::Patients;
            }
        }
    }

    fn start_test(&self, patient: Patient) -> Result<TestView, EegError> {
        // Streams spawn onto the app runtime
        let _guard = self.runtime.enter();

        let session = self.config.session.clone();
        let analysis_seed = session.seed.map(|s| s.wrapping_add(1));
        let stream = start_live_stream(session)?;
        let analysis =
            start_emotion_analysis(self.config.analysis.clone(), RngSource::new(analysis_seed))?;

        Ok(TestView {
            patient,
            alerts: stream.subscribe_alerts(),
            snapshot: stream.latest(),
            analysis_status: analysis.status(),
            stream,
            analysis,
            active_regions: BRAIN_REGIONS.iter().map(|r| r.id).collect(),
            tab: TestTab::Eeg,
            paused: false,
            rate_input: self.config.session.sampling_rate_hz,
        })
    }

    /// Leave the test page; dropping the view cancels its timers
    pub fn close_test(&mut self) {
        if let Some(view) = self.test.take() {
            info!(patient = %view.patient.id, "test closed");
        }
        if self.page == Page::Test {
            self.page = Page::Patients;
        }
    }

    /// Pull the latest snapshot, analysis progress and alerts (called every frame)
    pub fn update_data(&mut self) {
        let Some(view) = self.test.as_mut() else {
            return;
        };

        view.snapshot = view.stream.latest();
        view.analysis_status = view.analysis.status();

        loop {
            match view.alerts.try_recv() {
                Ok(StressAlert) => self.toasts.error(StressAlert::TITLE, StressAlert::DESCRIPTION),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "missed stress alerts");
                }
                Err(_) => break,
            }
        }
    }

    pub fn toggle_pause(&mut self) {
        let Some(view) = self.test.as_mut() else {
            return;
        };
        let command = if view.paused {
            StreamCommand::Resume
        } else {
            StreamCommand::Pause
        };
        match view.stream.try_send(command) {
            Ok(()) => view.paused = !view.paused,
            Err(e) => self.toasts.error("Error", e.to_string()),
        }
    }

    pub fn apply_sampling_rate(&mut self) {
        let Some(view) = self.test.as_mut() else {
            return;
        };
        match view.stream.set_sampling_rate(view.rate_input) {
            Ok(()) => self.toasts.info(
                "Sampling rate updated",
                format!("Recording at {:.0}Hz", view.rate_input),
            ),
            Err(e) => self.toasts.error("Invalid sampling rate", e.to_string()),
        }
    }

    pub fn open_add_patient(&mut self) {
        self.ui_state.form = PatientForm::default();
        self.ui_state.form_errors.clear();
        self.page = Page::AddPatient;
    }

    /// Validate and store the form; on failure the errors stay for inline display
    pub fn submit_patient(&mut self) {
        let form = self.ui_state.form.to_new_patient();
        match self.store.add(form) {
            Ok(patient) => {
                let name = patient.name.clone();
                self.ui_state.form = PatientForm::default();
                self.ui_state.form_errors.clear();
                self.toasts
                    .info("Patient added", format!("{} was added to the database", name));
                self.page = Page::Patients;
            }
            Err(EegError::InvalidPatient { fields }) => {
                self.ui_state.form_errors = fields;
            }
            Err(e) => self.toasts.error("Error", e.to_string()),
        }
    }

    /// Ask for a destination and write the roster as CSV
    pub fn export_csv(&mut self) {
        let default_name = export_file_name(chrono::Local::now().date_naive());
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(default_name.as_str())
            .add_filter("CSV", &["csv"])
            .save_file()
        else {
            return;
        };
        self.export_csv_to(&path);
    }

    pub fn export_csv_to(&mut self, path: &Path) {
        match write_patients_csv(path, self.store.all()) {
            Ok(()) => self.toasts.info(
                "Export complete",
                format!("{} patients exported", self.store.len()),
            ),
            Err(e) => {
                warn!("CSV export failed: {}", e);
                self.toasts.error("Export failed", e.to_string());
            }
        }
    }
}

impl eframe::App for EegDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_data();

        crate::ui::top_bar(ctx, self);

        egui::CentralPanel::default().show(ctx, |ui| match self.page {
            Page::Patients => crate::ui::patient_list(ui, self),
            Page::AddPatient => crate::ui::add_patient_form(ui, self),
            Page::Test => crate::ui::test_page(ui, self),
        });

        self.toasts.show(ctx);

        if self.test.is_some() {
            // Keep animating while a stream is live
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> EegDashboardApp {
        let mut config = DashboardConfig::default();
        config.session.seed = Some(5);
        EegDashboardApp::new(config).unwrap()
    }

    #[test]
    fn test_unknown_patient_redirects_with_toast() {
        let mut app = app();
        app.page = Page::Test;
        app.open_test("404");

        assert_eq!(app.page, Page::Patients);
        assert!(app.test.is_none());
        let toast = app.toasts.iter().last().unwrap();
        assert_eq!(toast.title, "Error");
        assert_eq!(toast.description, "Patient not found");
    }

    #[test]
    fn test_open_and_close_test() {
        let mut app = app();
        app.open_test("2");

        assert_eq!(app.page, Page::Test);
        let view = app.test.as_ref().unwrap();
        assert_eq!(view.patient.name, "Sarah Johnson");
        assert_eq!(view.snapshot.samples.len(), app.config.session.capacity());
        assert_eq!(view.active_regions.len(), 5);
        // no tick has been pulled yet
        assert_eq!(view.device_status(), DeviceStatus::Connecting);
        assert_eq!(
            app.toasts.iter().last().map(|t| t.description.as_str()),
            Some("EEG recording initiated for Sarah Johnson")
        );

        app.close_test();
        assert_eq!(app.page, Page::Patients);
        assert!(app.test.is_none());
    }

    #[test]
    fn test_rejected_rate_reports_error() {
        let mut app = app();
        app.open_test("3");
        let view = app.test.as_mut().unwrap();
        // 30s at 0.01Hz leaves the window empty
        view.rate_input = 0.01;
        app.apply_sampling_rate();

        let toast = app.toasts.iter().last().unwrap();
        assert_eq!(toast.title, "Invalid sampling rate");

        app.test.as_mut().unwrap().rate_input = 20.0;
        app.apply_sampling_rate();
        assert_eq!(
            app.toasts.iter().last().map(|t| t.title.as_str()),
            Some("Sampling rate updated")
        );
    }

    #[test]
    fn test_toggle_region() {
        let mut app = app();
        app.open_test("1");
        let view = app.test.as_mut().unwrap();
        let frontal = BrainRegion::by_id("frontal").unwrap();

        view.toggle_region(frontal);
        assert!(!view.is_region_active("frontal"));
        view.toggle_region(frontal);
        assert!(view.is_region_active("frontal"));
    }

    #[test]
    fn test_submit_invalid_form_keeps_errors() {
        let mut app = app();
        app.open_add_patient();
        app.ui_state.form.name = "Grace".to_string();
        app.ui_state.form.age = "abc".to_string();
        app.submit_patient();

        assert_eq!(app.page, Page::AddPatient);
        assert_eq!(app.ui_state.field_error("name"), None);
        assert_eq!(app.ui_state.field_error("age"), Some("Age must be between 1 and 120"));
        assert_eq!(app.ui_state.field_error("gender"), Some("Gender is required"));
        assert_eq!(app.ui_state.field_error("diagnosis"), Some("Diagnosis is required"));
        assert_eq!(app.store.len(), 6);
    }

    #[test]
    fn test_submit_valid_form() {
        let mut app = app();
        app.open_add_patient();
        app.ui_state.form = PatientForm {
            name: "Grace Hopper".to_string(),
            age: "79".to_string(),
            gender: Some(Gender::Female),
            diagnosis: "Insomnia".to_string(),
            medical_history: String::new(),
        };
        app.submit_patient();

        assert_eq!(app.page, Page::Patients);
        assert_eq!(app.store.len(), 7);
        assert_eq!(app.store.find("7").unwrap().name, "Grace Hopper");
        assert!(app.ui_state.form_errors.is_empty());
    }

    #[test]
    fn test_export_to_path() {
        let mut app = app();
        let path = std::env::temp_dir().join(format!("eeg_app_export_{}.csv", std::process::id()));
        app.export_csv_to(&path);

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 7);
        assert_eq!(
            app.toasts.iter().last().map(|t| t.title.as_str()),
            Some("Export complete")
        );
        let _ = std::fs::remove_file(&path);
    }
}
