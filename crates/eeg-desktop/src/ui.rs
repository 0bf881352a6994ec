//! UI panels for the dashboard pages

use eeg_core::{Gender, Patient, BRAIN_REGIONS};
use eeg_simulation::stress_indicator_text;
use egui::{Color32, RichText};
use egui_plot::{Corner, Legend, Line, Plot, PlotPoints};

use crate::app::{EegDashboardApp, Page, TestTab, TestView};

const CARD_WIDTH: f32 = 360.0;
const ERROR_COLOR: Color32 = Color32::from_rgb(220, 60, 60);

/// Trace color of a brain region
pub fn region_color(region_id: &str) -> Color32 {
    match region_id {
        "frontal" => Color32::from_rgb(0x2C, 0x7D, 0xA0),
        "temporal" => Color32::from_rgb(0xA9, 0xD6, 0xE5),
        "parietal" => Color32::from_rgb(0x01, 0x49, 0x7C),
        "occipital" => Color32::from_rgb(0x5A, 0x18, 0x9A),
        "limbic" => Color32::from_rgb(0xF2, 0x84, 0x82),
        _ => Color32::GRAY,
    }
}

/// Bar color of an emotion
pub fn emotion_color(emotion: &str) -> Color32 {
    match emotion {
        "Happy" => Color32::from_rgb(34, 197, 94),
        "Sad" => Color32::from_rgb(59, 130, 246),
        "Neutral" => Color32::from_rgb(107, 114, 128),
        "Anxious" => Color32::from_rgb(234, 179, 8),
        "Relaxed" => Color32::from_rgb(20, 184, 166),
        "Excited" => Color32::from_rgb(249, 115, 22),
        _ => Color32::from_rgb(44, 125, 160),
    }
}

pub fn top_bar(ctx: &egui::Context, app: &mut EegDashboardApp) {
    egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Export to CSV...").clicked() {
                    app.export_csv();
                    ui.close_menu();
                }
            });

            ui.menu_button("Patients", |ui| {
                if ui.button("Patient Database").clicked() {
                    app.close_test();
                    app.page = Page::Patients;
                    ui.close_menu();
                }
                if ui.button("Add Patient").clicked() {
                    app.close_test();
                    app.open_add_patient();
                    ui.close_menu();
                }
            });

            ui.separator();
            ui.label(RichText::new("EEG Emotion Recognition").strong());

            if let Some(view) = &app.test {
                ui.separator();
                let status = view.device_status();
                let color = if status.is_error() {
                    ERROR_COLOR
                } else {
                    Color32::GREEN
                };
                ui.colored_label(color, format!("● {}", status.message()));
            }
        });
    });
}

fn patient_card(ui: &mut egui::Ui, patient: &Patient) -> bool {
    let mut run_test = false;

    ui.group(|ui| {
        ui.set_width(CARD_WIDTH);
        ui.horizontal(|ui| {
            ui.heading(&patient.name);
            ui.label(RichText::new(patient.gender.to_string()).small().strong());
        });
        ui.separator();

        egui::Grid::new(("patient_fields", &patient.id))
            .num_columns(2)
            .show(ui, |ui| {
                ui.label("Age:");
                ui.label(patient.age.to_string());
                ui.end_row();

                ui.label("Diagnosis:");
                ui.label(&patient.diagnosis);
                ui.end_row();

                ui.label("Last Test:");
                ui.label(
                    patient
                        .last_test_date
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_else(|| "No tests yet".to_string()),
                );
                ui.end_row();
            });

        ui.add_space(4.0);
        ui.label(RichText::new("Medical History:").weak());
        ui.label(&patient.medical_history);
        ui.add_space(4.0);

        run_test = ui.button("Run Test ➡").clicked();
    });

    run_test
}

pub fn patient_list(ui: &mut egui::Ui, app: &mut EegDashboardApp) {
    ui.heading("Patient Database");
    ui.label("View and manage patients in the EEG emotion recognition system");
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        ui.add(
            egui::TextEdit::singleline(&mut app.ui_state.search_term)
                .hint_text("Search patients by name or diagnosis...")
                .desired_width(360.0),
        );
        if ui.button("Add Patient").clicked() {
            app.open_add_patient();
        }
        if ui.button("Export to CSV").clicked() {
            app.export_csv();
        }
    });
    ui.add_space(8.0);

    let mut selected: Option<String> = None;
    let patients = app.filtered_patients();

    if patients.is_empty() {
        ui.vertical_centered(|ui| {
            ui.add_space(60.0);
            ui.heading("No patients found");
            ui.label(if app.ui_state.search_term.is_empty() {
                "Add a patient to get started"
            } else {
                "Try a different search term"
            });
        });
    } else {
        egui::ScrollArea::vertical().show(ui, |ui| {
            egui::Grid::new("patient_grid")
                .num_columns(3)
                .spacing([12.0, 12.0])
                .show(ui, |ui| {
                    for (i, patient) in patients.iter().enumerate() {
                        if patient_card(ui, patient) {
                            selected = Some(patient.id.clone());
                        }
                        if (i + 1) % 3 == 0 {
                            ui.end_row();
                        }
                    }
                });
        });
    }

    if let Some(id) = selected {
        app.open_test(&id);
    }
}

fn field_error(ui: &mut egui::Ui, message: Option<&'static str>) {
    if let Some(message) = message {
        ui.label("");
        ui.colored_label(ERROR_COLOR, message);
        ui.end_row();
    }
}

pub fn add_patient_form(ui: &mut egui::Ui, app: &mut EegDashboardApp) {
    ui.heading("Add Patient");
    ui.add_space(8.0);

    let errors: Vec<(&str, Option<&'static str>)> = ["name", "age", "gender", "diagnosis"]
        .into_iter()
        .map(|field| (field, app.ui_state.field_error(field)))
        .collect();
    let error_for = |field: &str| {
        errors
            .iter()
            .find(|(f, _)| *f == field)
            .and_then(|(_, message)| *message)
    };

    let form = &mut app.ui_state.form;
    egui::Grid::new("add_patient_form")
        .num_columns(2)
        .spacing([12.0, 8.0])
        .show(ui, |ui| {
            ui.label("Name");
            ui.text_edit_singleline(&mut form.name);
            ui.end_row();
            field_error(ui, error_for("name"));

            ui.label("Age");
            ui.text_edit_singleline(&mut form.age);
            ui.end_row();
            field_error(ui, error_for("age"));

            ui.label("Gender");
            egui::ComboBox::from_id_source("gender_combo")
                .selected_text(
                    form.gender
                        .map(|g| g.to_string())
                        .unwrap_or_else(|| "Select gender".to_string()),
                )
                .show_ui(ui, |ui| {
                    for gender in Gender::ALL {
                        ui.selectable_value(&mut form.gender, Some(gender), gender.to_string());
                    }
                });
            ui.end_row();
            field_error(ui, error_for("gender"));

            ui.label("Diagnosis");
            ui.text_edit_singleline(&mut form.diagnosis);
            ui.end_row();
            field_error(ui, error_for("diagnosis"));

            ui.label("Medical History");
            ui.text_edit_multiline(&mut form.medical_history);
            ui.end_row();
        });

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        if ui.button("Save Patient").clicked() {
            app.submit_patient();
        }
        if ui.button("Cancel").clicked() {
            app.page = Page::Patients;
        }
    });
}

enum TestAction {
    Back,
    TogglePause,
    ApplyRate,
}

pub fn test_page(ui: &mut egui::Ui, app: &mut EegDashboardApp) {
    let Some(view) = app.test.as_mut() else {
        ui.label("Loading patient data...");
        return;
    };

    let mut action = None;

    ui.horizontal(|ui| {
        ui.heading("EEG Test");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("⬅ Back to Patients").clicked() {
                action = Some(TestAction::Back);
            }
        });
    });

    ui.group(|ui| {
        let patient = &view.patient;
        ui.label(RichText::new(&patient.name).heading());
        ui.label(
            RichText::new(format!(
                "{} years old, {} | Diagnosis: {}",
                patient.age, patient.gender, patient.diagnosis
            ))
            .weak(),
        );
        ui.label(&patient.medical_history);
    });
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        ui.selectable_value(&mut view.tab, TestTab::Eeg, "EEG Signals");
        ui.selectable_value(&mut view.tab, TestTab::Emotion, "Emotion Analysis");
    });
    ui.separator();

    egui::ScrollArea::vertical().show(ui, |ui| match view.tab {
        TestTab::Eeg => {
            if let Some(a) = eeg_panel(ui, view) {
                action = Some(a);
            }
        }
        TestTab::Emotion => emotion_panel(ui, view),
    });

    match action {
        Some(TestAction::Back) => app.close_test(),
        Some(TestAction::TogglePause) => app.toggle_pause(),
        Some(TestAction::ApplyRate) => app.apply_sampling_rate(),
        None => {}
    }
}

fn eeg_panel(ui: &mut egui::Ui, view: &mut TestView) -> Option<TestAction> {
    let mut action = None;

    if let Some(text) = stress_indicator_text(view.snapshot.stress, view.snapshot.threshold) {
        egui::Frame::group(ui.style())
            .fill(Color32::from_rgb(120, 20, 20))
            .stroke(egui::Stroke::new(2.0, ERROR_COLOR))
            .show(ui, |ui| {
                ui.colored_label(Color32::WHITE, format!("⚠ {}", text));
            });
        ui.add_space(4.0);
    }

    ui.horizontal(|ui| {
        let label = if view.paused { "▶ Resume" } else { "⏸ Pause" };
        if ui.button(label).clicked() {
            action = Some(TestAction::TogglePause);
        }
        ui.separator();
        ui.label("Sampling Rate:");
        ui.add(egui::Slider::new(&mut view.rate_input, 1.0..=50.0).suffix("Hz"));
        if ui.button("Apply").clicked() {
            action = Some(TestAction::ApplyRate);
        }
        ui.separator();
        ui.label(format!(
            "Samples: {} | Ticks: {} | Stress: {:.2}",
            view.snapshot.samples.len(),
            view.snapshot.tick,
            view.snapshot.stress
        ));
    });
    ui.add_space(4.0);

    ui.heading("EEG Signal Visualization");
    ui.horizontal_wrapped(|ui| {
        for region in BRAIN_REGIONS.iter() {
            let active = view.is_region_active(region.id);
            let text = if active {
                RichText::new(region.name).color(region_color(region.id)).strong()
            } else {
                RichText::new(region.name).weak()
            };
            if ui.selectable_label(active, text).clicked() {
                view.toggle_region(region);
            }
        }
    });

    Plot::new("eeg_plot")
        .legend(Legend::default().position(Corner::LeftTop))
        .height(400.0)
        .include_y(-100.0)
        .include_y(100.0)
        .x_axis_label("Time (s)")
        .y_axis_label("Amplitude (µV)")
        .allow_drag(false)
        .show(ui, |plot_ui| {
            for region in BRAIN_REGIONS.iter().filter(|r| view.is_region_active(r.id)) {
                let points = PlotPoints::from(view.snapshot.channel_series(region.id));
                plot_ui.line(
                    Line::new(points)
                        .color(region_color(region.id))
                        .name(region.name)
                        .width(2.0),
                );
            }
        });

    ui.add_space(8.0);
    egui::Grid::new("region_cards")
        .num_columns(3)
        .spacing([12.0, 12.0])
        .show(ui, |ui| {
            for (i, region) in BRAIN_REGIONS.iter().enumerate() {
                let active = view.is_region_active(region.id);
                let stroke = if active {
                    egui::Stroke::new(2.0, region_color(region.id))
                } else {
                    ui.visuals().widgets.noninteractive.bg_stroke
                };
                egui::Frame::group(ui.style()).stroke(stroke).show(ui, |ui| {
                    ui.set_width(CARD_WIDTH * 0.75);
                    ui.label(RichText::new(region.name).strong());
                    ui.label(RichText::new(region.description).small());
                });
                if (i + 1) % 3 == 0 {
                    ui.end_row();
                }
            }
        });

    action
}

fn emotion_panel(ui: &mut egui::Ui, view: &TestView) {
    ui.heading("Emotion Analysis");
    let status = &view.analysis_status;

    match &status.results {
        None => {
            ui.vertical_centered(|ui| {
                ui.label("Analyzing brain activity patterns...");
            });
            ui.add(egui::ProgressBar::new(f32::from(status.progress) / 100.0).show_percentage());
        }
        Some(results) => {
            if let Some(top) = status.predominant() {
                ui.vertical_centered(|ui| {
                    ui.label(
                        RichText::new(format!("Predominant emotion detected: {}", top.emotion))
                            .strong(),
                    );
                });
            }
            ui.add_space(8.0);

            egui::Grid::new("emotion_results")
                .num_columns(2)
                .spacing([12.0, 6.0])
                .show(ui, |ui| {
                    for result in results {
                        ui.label(&result.emotion);
                        ui.add(
                            egui::ProgressBar::new(result.confidence as f32)
                                .fill(emotion_color(&result.emotion))
                                .text(format!("{}%", result.percent()))
                                .desired_width(320.0),
                        );
                        ui.end_row();
                    }
                });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_region_has_a_color() {
        for region in BRAIN_REGIONS.iter() {
            assert_ne!(region_color(region.id), Color32::GRAY);
        }
    }

    #[test]
    fn test_every_emotion_has_a_color() {
        let fallback = emotion_color("Confused");
        for emotion in eeg_simulation::EMOTIONS {
            assert_ne!(emotion_color(emotion), fallback);
        }
    }
}
