//! Clinic Desk - Desktop front desk for reviewing clinic appointment requests.

use std::path::PathBuf;

use clap::Parser;
use eframe::egui;
use clinic_desk as app;

use app::config::{AppConfig, ConfigLoadResult};
use app::ui::{self, App};

/// Desktop front desk for reviewing clinic appointment requests.
#[derive(Parser)]
#[command(name = "clinic-desk")]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,
}

fn main() -> eframe::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    tracing::info!("Clinic Desk starting...");

    // Determine config path based on mode
    let config_path = if cli.dev {
        tracing::info!("Dev mode: loading config from current directory");
        PathBuf::from("config.toml")
    } else {
        AppConfig::default_path()
    };
    tracing::info!("Config path: {:?}", config_path);

    let config = match AppConfig::try_load(&config_path) {
        ConfigLoadResult::Loaded(config) => {
            tracing::info!("Config loaded successfully");
            config
        }
        ConfigLoadResult::Missing => {
            tracing::info!("Config missing, running with defaults (first run)");
            AppConfig::default()
        }
        ConfigLoadResult::Invalid(e) => {
            tracing::warn!("Config invalid, running with defaults: {}", e);
            AppConfig::default()
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Clinic Desk")
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([860.0, 560.0]),
        ..Default::default()
    };

    // Create tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");

    eframe::run_native(
        "Clinic Desk",
        options,
        Box::new(|cc| {
            // Image loaders for receipt previews
            egui_extras::install_image_loaders(&cc.egui_ctx);

            // Phosphor icon font
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);

            ui::app::apply_theme(&cc.egui_ctx, config.ui.dark_mode);

            Ok(Box::new(App::new(config, config_path, rt)))
        }),
    )
}
