pub mod cli;
pub mod commands;
pub mod config;
pub mod telemetry;
pub mod tui;

pub use qcd_core as core;
pub use qcd_core::format;
pub use qcd_core::model;
pub use qcd_core::parser;
pub use qcd_core::registry;

pub use qcd_core::AppConfig;
