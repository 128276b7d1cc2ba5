pub mod detect;
pub mod engine;
pub mod pipeline;
pub mod query;

pub use crate::domain::model::{
    Availability, AvailabilityResult, Delivery, DispatchOutcome, FetchOutcome, Notification,
    PageSnapshot, RenderedPage, RouteQuery, RunSummary,
};
pub use crate::domain::ports::{ConfigProvider, Notifier, PageRenderer, Pipeline};
pub use crate::utils::error::Result;
