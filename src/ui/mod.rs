//! GUI panels and application state.

pub mod app;
pub mod components;
pub mod dashboard;
pub mod requests_panel;
pub mod reset_panel;

pub use app::App;
