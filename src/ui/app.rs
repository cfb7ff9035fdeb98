//! Main application UI state and async plumbing.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Local};
use eframe::egui::{self, Align, Layout};
use tokio::sync::mpsc;

use crate::api::{BackendClient, ForgotPasswordResponse};
use crate::config::AppConfig;
use crate::email::{AcceptanceEmail, EmailNotifier};
use crate::models::Appointment;
use crate::models::appointment::normalize_meet_link;

use super::components::colors;
use super::{dashboard, requests_panel, reset_panel};

/// Current panel being displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Dashboard,
    Requests,
    PasswordReset,
}

impl Panel {
    /// Get the display name for the panel.
    pub fn name(&self) -> &'static str {
        match self {
            Panel::Dashboard => "Dashboard",
            Panel::Requests => "Appointment Requests",
            Panel::PasswordReset => "Password Reset",
        }
    }
}

/// Backend reachability as shown in the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendStatus {
    #[default]
    Unknown,
    Checking,
    Online,
    Error,
}

/// Messages from async tasks to UI.
pub enum UiMessage {
    // Data loading
    AppointmentsLoaded(Vec<Appointment>),
    AppointmentsLoadFailed(String),
    UserCountLoaded(u64),
    UserCountFailed(String),

    // Review workflow
    RejectCompleted { id: String },
    RejectFailed(String),
    AcceptCompleted { id: String },
    AcceptFailed(String),

    // Password reset
    ResetAcknowledged(ForgotPasswordResponse),
    ResetFailed(String),

    // Receipt download
    ReceiptSaved(PathBuf),
    ReceiptFailed(String),
}

/// Form state for the password-reset panel.
#[derive(Default, Clone)]
pub struct ResetForm {
    pub email: String,
    pub submitted: bool,
    pub sending: bool,
}

impl ResetForm {
    /// Reset the form to default values.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Log level for UI messages.
#[derive(Clone, Copy, Debug)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Log entry for display in the UI.
#[derive(Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub level: LogLevel,
}

/// Main application state.
pub struct App {
    // Runtime and remote services
    pub rt: tokio::runtime::Runtime,
    pub client: Arc<BackendClient>,
    pub notifier: Arc<EmailNotifier>,

    // Message channel for async communication
    pub tx: mpsc::UnboundedSender<UiMessage>,
    pub rx: mpsc::UnboundedReceiver<UiMessage>,

    // Navigation
    pub current_panel: Panel,

    // Cached data
    pub appointments: Vec<Appointment>,
    pub user_count: Option<u64>,

    // Loading states
    pub is_loading: bool,

    // Requests panel state
    pub search: String,
    pub selected_details: Option<Appointment>,
    pub accept_target: Option<Appointment>,
    pub meet_link_input: String,
    pub meet_link_open: bool,
    pub accept_in_flight: bool,
    pub reject_target: Option<Appointment>,
    pub show_reject_confirm: bool,
    pub receipt_in_flight: bool,

    // Password reset
    pub reset_form: ResetForm,

    // Log messages
    pub log_messages: Vec<LogEntry>,

    // Configuration
    pub config: AppConfig,
    config_path: PathBuf,

    // Dialogs
    pub error_message: Option<String>,
    pub success_message: Option<String>,

    // Backend connection dialog
    pub backend_dialog_open: bool,
    pub backend_url_input: String,
    backend_test_rx: Option<mpsc::UnboundedReceiver<Result<(), String>>>,
    backend_test_status: Option<Result<(), String>>,
    pub backend_status: BackendStatus,
}

impl App {
    pub fn new(config: AppConfig, config_path: PathBuf, rt: tokio::runtime::Runtime) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let client = Arc::new(BackendClient::new(&config.backend.base_url, config.backend.timeout_secs));
        let notifier = Arc::new(EmailNotifier::new(config.email.clone()));
        let backend_url_input = config.backend.base_url.clone();

        let mut app = Self {
            rt,
            client,
            notifier,
            tx,
            rx,
            current_panel: Panel::default(),
            appointments: Vec::new(),
            user_count: None,
            is_loading: false,
            search: String::new(),
            selected_details: None,
            accept_target: None,
            meet_link_input: String::new(),
            meet_link_open: false,
            accept_in_flight: false,
            reject_target: None,
            show_reject_confirm: false,
            receipt_in_flight: false,
            reset_form: ResetForm::default(),
            log_messages: Vec::new(),
            config,
            config_path,
            error_message: None,
            success_message: None,
            backend_dialog_open: false,
            backend_url_input,
            backend_test_rx: None,
            backend_test_status: None,
            backend_status: BackendStatus::Unknown,
        };

        // Load initial data
        app.load_appointments();
        app.load_user_count();

        app
    }

    /// Log a message to the UI log.
    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.log_messages.push(LogEntry {
            timestamp: Local::now(),
            message: message.into(),
            level,
        });

        // Keep only last 100 messages
        if self.log_messages.len() > 100 {
            self.log_messages.remove(0);
        }
    }

    /// Log an info message.
    pub fn log_info(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    /// Log a success message.
    pub fn log_success(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Success, message);
    }

    /// Log a warning message.
    pub fn log_warning(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    /// Log an error message.
    pub fn log_error(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    /// Load pending appointments from the backend.
    pub fn load_appointments(&mut self) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        self.is_loading = true;

        self.rt.spawn(async move {
            match client.pending_appointments().await {
                Ok(appointments) => {
                    let _ = tx.send(UiMessage::AppointmentsLoaded(appointments));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::AppointmentsLoadFailed(e.to_string()));
                }
            }
        });
    }

    /// Load the registered (non-admin) user count.
    pub fn load_user_count(&mut self) {
        let client = self.client.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            match client.count_non_admin_users().await {
                Ok(count) => {
                    let _ = tx.send(UiMessage::UserCountLoaded(count));
                }
                Err(e) => {
                    tracing::warn!("User count fetch failed: {e}");
                    let _ = tx.send(UiMessage::UserCountFailed(e.to_string()));
                }
            }
        });
    }

    /// Ask for confirmation before rejecting an appointment.
    pub fn start_reject(&mut self, appointment: Appointment) {
        self.reject_target = Some(appointment);
        self.show_reject_confirm = true;
    }

    /// Execute the confirmed reject.
    fn confirm_reject(&mut self) {
        let Some(appointment) = self.reject_target.take() else {
            return;
        };

        self.log_info(format!("Rejecting appointment for {}", appointment.full_name()));

        let client = self.client.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            let _ = tx.send(run_reject(client, appointment).await);
        });
    }

    /// Drop the pending reject without issuing any calls.
    pub fn cancel_reject(&mut self) {
        self.show_reject_confirm = false;
        self.reject_target = None;
    }

    /// Open the meeting-link entry window for an appointment.
    pub fn start_accept(&mut self, appointment: Appointment) {
        self.accept_target = Some(appointment);
        self.meet_link_input.clear();
        self.meet_link_open = true;
    }

    /// Validate the entered meeting link and submit the accept.
    ///
    /// An invalid link shows an error dialog and keeps the entry window
    /// open; no request is sent. With a valid link the accept PATCH runs
    /// first, then the notification email is attempted best-effort.
    pub fn submit_meet_link(&mut self) {
        let link = match normalize_meet_link(&self.meet_link_input) {
            Ok(link) => link,
            Err(e) => {
                self.error_message = Some(e.to_string());
                return;
            }
        };

        let Some(appointment) = self.accept_target.clone() else {
            return;
        };

        self.accept_in_flight = true;
        self.log_info(format!("Accepting appointment for {}", appointment.full_name()));

        let client = self.client.clone();
        let notifier = self.notifier.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            let _ = tx.send(run_accept(client, notifier, appointment, link).await);
        });
    }

    /// Download the receipt of the currently inspected appointment.
    ///
    /// Prompts for a destination with a native save dialog, then fetches the
    /// image and writes it in a background task.
    pub fn save_receipt(&mut self, url: String) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name("receipt.jpg")
            .add_filter("Images", &["jpg", "jpeg", "png"])
            .save_file()
        else {
            return;
        };

        self.receipt_in_flight = true;
        let client = self.client.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            let result = async {
                let bytes = client.fetch_receipt(&url).await?;
                tokio::fs::write(&path, bytes).await?;
                Ok::<_, crate::error::AppError>(path)
            }
            .await;

            match result {
                Ok(path) => {
                    let _ = tx.send(UiMessage::ReceiptSaved(path));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::ReceiptFailed(e.to_string()));
                }
            }
        });
    }

    /// Submit the password-reset request.
    pub fn submit_password_reset(&mut self) {
        let email = self.reset_form.email.trim().to_string();
        if email.is_empty() {
            self.error_message = Some("Please enter an email address".to_string());
            return;
        }

        self.reset_form.sending = true;
        let client = self.client.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            match client.request_password_reset(&email).await {
                Ok(response) => {
                    let _ = tx.send(UiMessage::ResetAcknowledged(response));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::ResetFailed(e.to_string()));
                }
            }
        });
    }

    /// Start an async backend reachability check.
    fn test_backend_connection(&mut self) {
        let url = self.backend_url_input.trim_end_matches('/').to_string();
        if url.is_empty() {
            self.backend_test_status = Some(Err("URL is empty".to_string()));
            return;
        }

        let (tx, rx) = mpsc::unbounded_channel();
        self.backend_test_rx = Some(rx);
        self.backend_test_status = None;
        self.backend_status = BackendStatus::Checking;

        let timeout = self.config.backend.timeout_secs;
        self.rt.spawn(async move {
            let client = BackendClient::new(&url, timeout);
            let result = match client.test_connection().await {
                Ok(true) => Ok(()),
                Ok(false) => Err("Backend answered with an error status".to_string()),
                Err(e) => Err(e.to_string()),
            };
            let _ = tx.send(result);
        });
    }

    /// Save the backend URL from the dialog and rebuild the client.
    fn save_backend_config(&mut self) {
        self.config.backend.base_url = self.backend_url_input.trim_end_matches('/').to_string();
        self.client = Arc::new(BackendClient::new(
            &self.config.backend.base_url,
            self.config.backend.timeout_secs,
        ));

        if let Err(e) = self.config.save(&self.config_path) {
            tracing::error!("Failed to save config: {}", e);
            self.log_error(format!("Failed to save config: {e}"));
        } else {
            self.log_success("Backend configuration saved");
        }

        self.load_appointments();
        self.load_user_count();
    }

    /// Poll async operation results.
    fn poll_async_results(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                UiMessage::AppointmentsLoaded(appointments) => {
                    self.log_info(format!("Loaded {} pending requests", appointments.len()));
                    self.appointments = appointments;
                    self.is_loading = false;
                    self.backend_status = BackendStatus::Online;
                }
                UiMessage::AppointmentsLoadFailed(e) => {
                    self.is_loading = false;
                    self.backend_status = BackendStatus::Error;
                    self.error_message = Some("Failed to fetch pending appointments.".to_string());
                    self.log_error(e);
                }
                UiMessage::UserCountLoaded(count) => {
                    self.user_count = Some(count);
                }
                UiMessage::UserCountFailed(e) => {
                    self.error_message =
                        Some("There was an error fetching the user count. Please try again later.".to_string());
                    self.log_error(e);
                }
                UiMessage::RejectCompleted { id } => {
                    self.appointments.retain(|a| a.id != id);
                    self.success_message = Some("Successfully declined!".to_string());
                    self.log_success("Appointment rejected and slot released");
                }
                UiMessage::RejectFailed(e) => {
                    // Item stays in the list for retry
                    self.error_message = Some("Failed to reject the appointment.".to_string());
                    self.log_error(e);
                }
                UiMessage::AcceptCompleted { id } => {
                    self.appointments.retain(|a| a.id != id);
                    self.accept_in_flight = false;
                    self.meet_link_open = false;
                    self.accept_target = None;
                    self.success_message = Some("Appointment accepted".to_string());
                    self.log_success("Appointment accepted, requester notified");
                }
                UiMessage::AcceptFailed(e) => {
                    // The entry window closes either way; the item stays
                    // pending for retry.
                    self.accept_in_flight = false;
                    self.meet_link_open = false;
                    self.accept_target = None;
                    self.error_message = Some("Failed to accept the appointment.".to_string());
                    self.log_error(e);
                }
                UiMessage::ResetAcknowledged(response) => {
                    self.reset_form.sending = false;
                    if response.is_success() {
                        self.reset_form.submitted = true;
                        self.log_success("Password reset link sent");
                    } else {
                        self.error_message = Some(format!("Error: {}", response.message));
                        self.log_error(format!("Password reset rejected: {}", response.message));
                    }
                }
                UiMessage::ResetFailed(e) => {
                    self.reset_form.sending = false;
                    self.error_message = Some("An error occurred. Please try again.".to_string());
                    self.log_error(e);
                }
                UiMessage::ReceiptSaved(path) => {
                    self.receipt_in_flight = false;
                    self.success_message = Some(format!("Receipt saved to {}", path.display()));
                    self.log_success(format!("Receipt saved: {}", path.display()));
                }
                UiMessage::ReceiptFailed(e) => {
                    self.receipt_in_flight = false;
                    self.error_message = Some("Failed to download the receipt.".to_string());
                    self.log_error(e);
                }
            }
        }

        // Poll backend connection test
        if let Some(mut rx) = self.backend_test_rx.take() {
            match rx.try_recv() {
                Ok(result) => {
                    self.backend_status = match &result {
                        Ok(()) => BackendStatus::Online,
                        Err(_) => BackendStatus::Error,
                    };
                    self.backend_test_status = Some(result);
                }
                Err(mpsc::error::TryRecvError::Empty) => {
                    self.backend_test_rx = Some(rx);
                }
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    // Channel closed, keep None
                }
            }
        }
    }

    /// Render menu bar.
    fn show_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("Tools", |ui| {
                    if ui.button("Backend Connection").clicked() {
                        self.backend_dialog_open = true;
                        self.backend_url_input = self.config.backend.base_url.clone();
                        self.backend_test_status = None;
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Refresh Requests").clicked() {
                        self.load_appointments();
                        ui.close();
                    }
                    if ui.button("Refresh User Count").clicked() {
                        self.load_user_count();
                        ui.close();
                    }
                });
                ui.menu_button("View", |ui| {
                    if ui.checkbox(&mut self.config.ui.dark_mode, "Dark Mode").changed() {
                        apply_theme(ctx, self.config.ui.dark_mode);
                        if let Err(e) = self.config.save(&self.config_path) {
                            tracing::error!("Failed to save config: {}", e);
                        }
                        ui.close();
                    }
                });
            });
        });
    }

    /// Render status bar (display only, no interaction).
    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(28.0)
            .show(ctx, |ui| {
                ui.disable();
                ui.horizontal(|ui| {
                    let (color, text) = match self.backend_status {
                        BackendStatus::Unknown => (colors::NEUTRAL, "Not checked"),
                        BackendStatus::Checking => (colors::WARNING, "Checking..."),
                        BackendStatus::Online => (colors::SUCCESS, "Online"),
                        BackendStatus::Error => (colors::ERROR, "Unreachable"),
                    };

                    if matches!(self.backend_status, BackendStatus::Checking) || self.is_loading {
                        ui.spinner();
                    }
                    ui.colored_label(color, format!("Backend: {}", text));

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!("{} pending requests", self.appointments.len()));
                    });
                });
            });
    }

    /// Render backend connection dialog.
    fn show_backend_dialog(&mut self, ctx: &egui::Context) {
        if !self.backend_dialog_open {
            return;
        }

        let mut open = true;
        egui::Window::new("Backend Connection")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .open(&mut open)
            .show(ctx, |ui| {
                ui.add_space(10.0);

                egui::Grid::new("backend_grid")
                    .num_columns(2)
                    .spacing([20.0, 8.0])
                    .show(ui, |ui| {
                        ui.label("Base URL:");
                        ui.add(egui::TextEdit::singleline(&mut self.backend_url_input).desired_width(280.0));
                        ui.end_row();
                    });

                ui.add_space(15.0);

                ui.horizontal(|ui| {
                    let testing = self.backend_test_rx.is_some();
                    if ui.add_enabled(!testing, egui::Button::new("Test Connection")).clicked() {
                        self.test_backend_connection();
                    }

                    ui.add_space(10.0);

                    if self.backend_test_rx.is_some() {
                        ui.spinner();
                        ui.label("Testing...");
                    } else if let Some(result) = &self.backend_test_status {
                        match result {
                            Ok(()) => {
                                ui.colored_label(colors::SUCCESS, "Connection successful!");
                            }
                            Err(e) => {
                                ui.colored_label(colors::ERROR, format!("Failed: {}", e));
                            }
                        }
                    }
                });

                ui.add_space(15.0);
                ui.separator();
                ui.add_space(10.0);

                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        self.backend_dialog_open = false;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if ui.button("Save").clicked() {
                            self.save_backend_config();
                            self.backend_dialog_open = false;
                        }
                    });
                });
            });

        if !open {
            self.backend_dialog_open = false;
        }
    }

    /// Render modal dialogs (error, success, reject confirmation).
    fn show_dialogs(&mut self, ctx: &egui::Context) {
        // Error dialog
        if let Some(ref error) = self.error_message.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::ERROR, error);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.error_message = None;
                    }
                });
        }

        // Success dialog
        if let Some(ref msg) = self.success_message.clone() {
            egui::Window::new("Success")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::SUCCESS, msg);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.success_message = None;
                    }
                });
        }

        // Reject confirmation dialog
        if self.show_reject_confirm
            && let Some(ref target) = self.reject_target.clone()
        {
            egui::Window::new("Are you sure?")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(format!(
                        "Reject the appointment request from {}? You won't be able to revert this.",
                        target.full_name()
                    ));
                    ui.add_space(10.0);
                    ui.horizontal(|ui| {
                        if ui.button("No, cancel").clicked() {
                            // Declined confirmation: no calls, no list change
                            self.cancel_reject();
                        }
                        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                            if ui.button("Yes, reject it").clicked() {
                                self.confirm_reject();
                                self.show_reject_confirm = false;
                            }
                        });
                    });
                });
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Poll async results
        self.poll_async_results();

        // Request repaint during async operations
        if self.is_loading
            || self.accept_in_flight
            || self.receipt_in_flight
            || self.reset_form.sending
            || self.backend_test_rx.is_some()
        {
            ctx.request_repaint();
        }

        // Menu bar
        self.show_menu_bar(ctx);

        // Status bar
        self.show_status_bar(ctx);

        // Backend dialog
        self.show_backend_dialog(ctx);

        // Modal dialogs (error, success, reject confirmation)
        self.show_dialogs(ctx);

        // Main content
        egui::CentralPanel::default().show(ctx, |ui| match self.current_panel {
            Panel::Dashboard => {
                if let Some(next) = dashboard::show(self, ui) {
                    self.current_panel = next;
                }
            }
            Panel::Requests => {
                if requests_panel::show(self, ui) {
                    self.current_panel = Panel::Dashboard;
                }
            }
            Panel::PasswordReset => {
                if reset_panel::show(self, ui) {
                    self.current_panel = Panel::Dashboard;
                }
            }
        });
    }
}

/// Apply the configured visual theme.
pub fn apply_theme(ctx: &egui::Context, dark_mode: bool) {
    if dark_mode {
        ctx.set_visuals(egui::Visuals::dark());
    } else {
        ctx.set_visuals(egui::Visuals::light());
    }
}

/// Reject an appointment, then free its schedule slot, as two dependent
/// calls. Returns the message for the UI channel.
///
/// The two PATCHes have no transactional guarantee; if the slot release
/// fails after the reject succeeded, the backend is left with a rejected
/// appointment still holding its slot. Carried over from the backend
/// contract as-is.
async fn run_reject(client: Arc<BackendClient>, appointment: Appointment) -> UiMessage {
    let result = async {
        client.reject_appointment(&appointment.id).await?;
        client.release_slot(&appointment.date, &appointment.time).await
    }
    .await;

    match result {
        Ok(()) => UiMessage::RejectCompleted { id: appointment.id },
        Err(e) => UiMessage::RejectFailed(e.to_string()),
    }
}

/// Accept an appointment with its meeting link, then notify the requester.
///
/// The notification is best-effort: a failed send is logged and never rolls
/// back the accept. A failed accept never attempts the email.
async fn run_accept(
    client: Arc<BackendClient>,
    notifier: Arc<EmailNotifier>,
    appointment: Appointment,
    link: String,
) -> UiMessage {
    match client.accept_appointment(&appointment.id, &link).await {
        Ok(()) => {
            let email = AcceptanceEmail {
                to_email: appointment.email.clone(),
                meet_link: link,
                date: appointment.date.clone(),
                time: appointment.time.clone(),
                appointment_type: appointment.appointment_type.clone(),
            };
            if let Err(e) = notifier.send_acceptance(&email).await {
                tracing::error!("Failed to send acceptance email: {e}");
            }
            UiMessage::AcceptCompleted { id: appointment.id }
        }
        Err(e) => UiMessage::AcceptFailed(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::Mutex;

    use crate::config::EmailConfig;

    fn sample_appointment() -> Appointment {
        Appointment {
            id: "65f1c0ffee".to_string(),
            firstname: "Jane".to_string(),
            lastname: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            date: "2026-01-05".to_string(),
            time: "14:30".to_string(),
            appointment_type: "counseling".to_string(),
            role: "student".to_string(),
            receipt: None,
            meet_link: None,
        }
    }

    fn test_email_config() -> EmailConfig {
        EmailConfig {
            service_id: "svc".to_string(),
            template_id: "tpl".to_string(),
            public_key: "key".to_string(),
            enabled: true,
        }
    }

    /// Read one HTTP request (headers plus declared body) off the stream.
    fn read_request(stream: &mut TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            match stream.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    data.extend_from_slice(&buf[..n]);
                    let text = String::from_utf8_lossy(&data).into_owned();
                    if let Some(idx) = text.find("\r\n\r\n") {
                        let content_len = text[..idx]
                            .lines()
                            .filter_map(|line| {
                                let lower = line.to_ascii_lowercase();
                                lower
                                    .strip_prefix("content-length:")
                                    .and_then(|v| v.trim().parse::<usize>().ok())
                            })
                            .next()
                            .unwrap_or(0);
                        if data.len() >= idx + 4 + content_len {
                            break;
                        }
                    }
                }
                Err(_) => break,
            }
        }
        String::from_utf8_lossy(&data).into_owned()
    }

    /// Loopback HTTP server answering `expected` requests with `status`,
    /// recording each request line in arrival order.
    fn spawn_server(expected: usize, status: &'static str) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();

        std::thread::spawn(move || {
            for _ in 0..expected {
                let Ok((mut stream, _)) = listener.accept() else {
                    return;
                };
                let request = read_request(&mut stream);
                if let Some(line) = request.lines().next() {
                    log.lock().unwrap().push(line.to_string());
                }
                let response = format!("HTTP/1.1 {status}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
                let _ = stream.write_all(response.as_bytes());
            }
        });

        (format!("http://{addr}"), seen)
    }

    #[tokio::test]
    async fn test_reject_issues_reject_then_slot_release() {
        let (base, seen) = spawn_server(2, "200 OK");
        let client = Arc::new(BackendClient::new(&base, 5));

        let msg = run_reject(client, sample_appointment()).await;

        assert!(matches!(msg, UiMessage::RejectCompleted { .. }));
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].starts_with("PATCH /Appointments/api/reject/65f1c0ffee"));
        assert!(seen[1].starts_with("PATCH /schedules/updateByDateTime"));
    }

    #[tokio::test]
    async fn test_failed_reject_skips_slot_release() {
        let (base, seen) = spawn_server(1, "500 Internal Server Error");
        let client = Arc::new(BackendClient::new(&base, 5));

        let msg = run_reject(client, sample_appointment()).await;

        assert!(matches!(msg, UiMessage::RejectFailed(_)));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_accept_success_sends_notification() {
        let (backend, backend_seen) = spawn_server(1, "200 OK");
        let (email, email_seen) = spawn_server(1, "200 OK");

        let client = Arc::new(BackendClient::new(&backend, 5));
        let notifier = Arc::new(EmailNotifier::with_endpoint(
            test_email_config(),
            format!("{email}/api/v1.0/email/send"),
        ));

        let msg = run_accept(
            client,
            notifier,
            sample_appointment(),
            "https://meet.google.com/abc-defg-hij".to_string(),
        )
        .await;

        assert!(matches!(msg, UiMessage::AcceptCompleted { .. }));
        assert!(backend_seen.lock().unwrap()[0].starts_with("PATCH /Appointments/api/accept/65f1c0ffee"));
        let email_seen = email_seen.lock().unwrap();
        assert_eq!(email_seen.len(), 1);
        assert!(email_seen[0].starts_with("POST /api/v1.0/email/send"));
    }

    #[tokio::test]
    async fn test_failed_accept_never_attempts_email() {
        let (backend, backend_seen) = spawn_server(1, "500 Internal Server Error");
        let (email, email_seen) = spawn_server(1, "200 OK");

        let client = Arc::new(BackendClient::new(&backend, 5));
        let notifier = Arc::new(EmailNotifier::with_endpoint(
            test_email_config(),
            format!("{email}/api/v1.0/email/send"),
        ));

        let msg = run_accept(
            client,
            notifier,
            sample_appointment(),
            "https://meet.google.com/abc-defg-hij".to_string(),
        )
        .await;

        assert!(matches!(msg, UiMessage::AcceptFailed(_)));
        assert_eq!(backend_seen.lock().unwrap().len(), 1);
        assert!(email_seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_declining_confirmation_sends_nothing() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut config = AppConfig::default();
        // Unreachable backend: any outbound call would fail loudly
        config.backend.base_url = "http://127.0.0.1:9".to_string();

        let mut app = App::new(config, std::path::PathBuf::from("config.toml"), rt);
        app.appointments = vec![sample_appointment()];

        app.start_reject(sample_appointment());
        assert!(app.show_reject_confirm);

        app.cancel_reject();

        assert!(!app.show_reject_confirm);
        assert!(app.reject_target.is_none());
        assert_eq!(app.appointments.len(), 1);

        // Only the startup loads may have reported; no reject traffic
        while let Ok(msg) = app.rx.try_recv() {
            assert!(!matches!(
                msg,
                UiMessage::RejectCompleted { .. } | UiMessage::RejectFailed(_)
            ));
        }
    }
}
