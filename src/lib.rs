pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

#[cfg(feature = "browser")]
pub use adapters::WebDriverRenderer;
pub use adapters::{notifier_for, ConsoleNotifier, HttpRenderer, SmtpNotifier};
pub use config::{EmailCredentials, MonitorConfig};
pub use core::{engine::MonitorEngine, pipeline::MonitorPipeline};
pub use utils::error::{MonitorError, Result};
