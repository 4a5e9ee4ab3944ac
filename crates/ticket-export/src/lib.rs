#![warn(clippy::pedantic)]

pub mod config;
pub mod csv;
pub mod error;
pub mod json;

pub use config::ExportConfig;
pub use csv::{csv_header, csv_row};
pub use error::ExportError;
pub use json::to_json;
