// Adapters layer: concrete page renderers and notifiers behind the domain ports.

#[cfg(feature = "browser")]
pub mod browser;
pub mod http;
pub mod mail;

#[cfg(feature = "browser")]
pub use browser::WebDriverRenderer;
pub use http::HttpRenderer;
pub use mail::{notifier_for, ConsoleNotifier, SmtpNotifier};
