#[cfg(feature = "cli")]
pub mod cli;
pub mod credentials;
pub mod settings;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use credentials::EmailCredentials;
pub use toml_config::MonitorConfig;
