pub use qcd_tui::cli;
pub use qcd_tui::commands;
pub use qcd_tui::config;
pub use qcd_tui::telemetry;
pub use qcd_tui::tui;
pub use qcd_tui::AppConfig;

pub use qcd_core as core;
pub use qcd_core::format;
pub use qcd_core::model;
pub use qcd_core::parser;
pub use qcd_core::registry;
