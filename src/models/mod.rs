//! Domain models shared between the backend client and the UI.

pub mod appointment;

pub use appointment::Appointment;
