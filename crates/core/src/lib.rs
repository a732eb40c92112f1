pub mod config;
pub mod format;
pub mod instance;
pub mod model;
pub mod parser;
pub mod registry;

pub use config::{AppConfig, Settings};
pub use instance::{InstanceError, InstanceGuard};
pub use model::*;
pub use parser::parse_timer_text;
pub use registry::CountdownRegistry;
