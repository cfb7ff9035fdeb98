//! Appointment request review panel: search, accept, reject, details.

use chrono::Local;
use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, CHECK, DOWNLOAD, INFO, X};

use super::app::App;
use super::components::{back_button, colors, detail_row, panel_header};
use crate::models::Appointment;

/// Show the appointment requests panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let mut go_back = false;

    if back_button(ui) {
        go_back = true;
    }

    panel_header(ui, "Patient Requests for Approval");

    // Toolbar: search and refresh
    ui.horizontal(|ui| {
        ui.label("Search:");
        ui.add(
            egui::TextEdit::singleline(&mut app.search)
                .desired_width(220.0)
                .hint_text("Patient name..."),
        );

        if !app.search.is_empty() {
            ui.add_space(5.0);
            if ui.button("Clear").clicked() {
                app.search.clear();
            }
        }

        ui.add_space(15.0);

        if ui.button(format!("{ARROWS_CLOCKWISE} Refresh")).clicked() {
            app.load_appointments();
        }
    });

    ui.add_space(15.0);

    if app.is_loading {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.spinner();
            ui.label(RichText::new("Loading pending requests...").weak());
        });
    } else {
        show_request_list(app, ui);
    }

    // Overlay windows
    if app.selected_details.is_some() {
        show_detail_window(app, ui.ctx());
    }
    if app.meet_link_open {
        show_meet_link_window(app, ui.ctx());
    }

    go_back
}

fn show_request_list(app: &mut App, ui: &mut Ui) {
    if app.appointments.is_empty() {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.label(RichText::new("No Appointment Request").weak());
        });
        return;
    }

    // The visible subset is always a filter over the cached list, never an
    // independent fetch.
    let filtered: Vec<Appointment> = app
        .appointments
        .iter()
        .filter(|a| a.matches_search(&app.search))
        .cloned()
        .collect();

    ui.label(format!("Showing {} of {} requests", filtered.len(), app.appointments.len()));
    ui.add_space(10.0);

    let today = Local::now().date_naive();

    ScrollArea::vertical().id_salt("requests_scroll").show(ui, |ui| {
        for appointment in &filtered {
            show_request_row(app, ui, appointment, today);
            ui.add_space(8.0);
        }
    });
}

fn show_request_row(app: &mut App, ui: &mut Ui, appointment: &Appointment, today: chrono::NaiveDate) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_min_width(ui.available_width() - 20.0);

        ui.horizontal(|ui| {
            ui.label(
                RichText::new(appointment.day_label(today))
                    .strong()
                    .color(colors::ACCENT),
            );
            ui.label(RichText::new(appointment.long_date()).color(colors::ACCENT));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .button(RichText::new(X).color(colors::ERROR))
                    .on_hover_text("Reject request")
                    .clicked()
                {
                    app.start_reject(appointment.clone());
                }
                if ui
                    .button(RichText::new(INFO))
                    .on_hover_text("Show details")
                    .clicked()
                {
                    app.selected_details = Some(appointment.clone());
                }
            });
        });

        ui.label(RichText::new(appointment.full_name().to_uppercase()).strong());
        ui.label(&appointment.appointment_type);
        ui.label(RichText::new(appointment.display_time()).strong());

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button(format!("{CHECK} Accept")).clicked() {
                app.start_accept(appointment.clone());
            }
        });
    });
}

/// Read-only overlay with all appointment fields and the receipt.
fn show_detail_window(app: &mut App, ctx: &egui::Context) {
    let Some(appointment) = app.selected_details.clone() else {
        return;
    };

    let mut open = true;
    egui::Window::new("Appointment Details")
        .collapsible(false)
        .resizable(false)
        .default_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .open(&mut open)
        .show(ctx, |ui| {
            ui.add_space(10.0);

            egui::Grid::new("appointment_details_grid")
                .num_columns(2)
                .spacing([20.0, 8.0])
                .show(ui, |ui| {
                    detail_row(ui, "Date:", &appointment.long_date());
                    detail_row(ui, "Time:", &appointment.display_time());
                    detail_row(ui, "Type:", &appointment.appointment_type);
                    detail_row(ui, "Firstname:", &appointment.firstname);
                    detail_row(ui, "Lastname:", &appointment.lastname);
                    detail_row(ui, "Email:", &appointment.email);
                    detail_row(ui, "Role:", &appointment.role);
                });

            ui.add_space(10.0);
            ui.separator();
            ui.add_space(10.0);

            ui.label(RichText::new("Receipt").strong());
            ui.add_space(5.0);

            match &appointment.receipt {
                Some(url) => {
                    ui.add(egui::Image::from_uri(url.clone()).max_height(220.0));
                    ui.add_space(8.0);
                    ui.horizontal(|ui| {
                        let downloading = app.receipt_in_flight;
                        if ui
                            .add_enabled(!downloading, egui::Button::new(format!("{DOWNLOAD} Download Receipt")))
                            .clicked()
                        {
                            app.save_receipt(url.clone());
                        }
                        if downloading {
                            ui.spinner();
                            ui.label("Downloading...");
                        }
                    });
                }
                None => {
                    // Explicit indicator rather than an empty field
                    ui.label(RichText::new("No receipt available").weak());
                }
            }

            ui.add_space(15.0);

            if ui.button("Close Details").clicked() {
                app.selected_details = None;
            }
        });

    if !open {
        app.selected_details = None;
    }
}

/// Meeting-link entry window for the accept path.
fn show_meet_link_window(app: &mut App, ctx: &egui::Context) {
    let title = app
        .accept_target
        .as_ref()
        .map(|a| format!("Accept: {}", a.full_name()))
        .unwrap_or_else(|| "Accept Appointment".to_string());

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .default_width(380.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(10.0);

            ui.label("Google Meet link for the session:");
            ui.add_space(5.0);
            ui.add(
                egui::TextEdit::singleline(&mut app.meet_link_input)
                    .desired_width(340.0)
                    .hint_text("meet.google.com/abc-defg-hij"),
            );
            ui.add_space(5.0);
            ui.weak("A bare meet.google.com address gets https:// prepended.");

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                let sending = app.accept_in_flight;

                if ui.add_enabled(!sending, egui::Button::new("Cancel")).clicked() {
                    app.meet_link_open = false;
                    app.accept_target = None;
                }

                if sending {
                    ui.add_space(10.0);
                    ui.spinner();
                    ui.label("Accepting...");
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .add_enabled(!sending, egui::Button::new("Accept & Notify"))
                        .clicked()
                    {
                        app.submit_meet_link();
                    }
                });
            });
        });
}
