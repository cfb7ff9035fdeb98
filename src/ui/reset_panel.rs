//! Password reset panel: email entry, then a confirmation view.

use eframe::egui::{self, RichText, Ui};

use super::app::App;
use super::components::{back_button, panel_header};

/// Show the password reset panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let go_back = back_button(ui);
    panel_header(ui, "Forgot Password");

    ui.vertical_centered(|ui| {
        ui.add_space(40.0);

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_min_width(320.0);
            ui.add_space(10.0);

            if app.reset_form.submitted {
                show_confirmation(app, ui);
            } else {
                show_form(app, ui);
            }

            ui.add_space(10.0);
        });
    });

    go_back
}

fn show_form(app: &mut App, ui: &mut Ui) {
    ui.label("Enter the account's email address and we'll send a reset link.");
    ui.add_space(10.0);

    let response = ui.add(
        egui::TextEdit::singleline(&mut app.reset_form.email)
            .desired_width(280.0)
            .hint_text("Enter Email"),
    );

    ui.add_space(15.0);

    ui.horizontal(|ui| {
        let sending = app.reset_form.sending;

        let submit_clicked = ui.add_enabled(!sending, egui::Button::new("Submit")).clicked();
        let enter_pressed = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        if (submit_clicked || (enter_pressed && !sending)) && !app.reset_form.email.trim().is_empty() {
            app.submit_password_reset();
        }

        if sending {
            ui.add_space(10.0);
            ui.spinner();
            ui.label("Sending...");
        }
    });
}

fn show_confirmation(app: &mut App, ui: &mut Ui) {
    ui.label(RichText::new("Your password reset link has been sent to your email.").strong());
    ui.add_space(10.0);

    if ui.button("Send another").clicked() {
        app.reset_form.reset();
    }
}
