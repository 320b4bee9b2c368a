//! Client side of the VeriFarm registry.
//!
//! [`TrackerProxy`] drives the two user interactions (track a product, add a
//! product) against any [`ProductApi`], keeping a [`ProductCache`] and a
//! [`TrackerView`] document up to date.

mod api;
mod cache;
mod error;
mod notify;
mod proxy;
mod view;

pub use api::{urlencoded, ApiClient, HealthStatus, ProductApi, DEFAULT_API_URL};
pub use cache::ProductCache;
pub use error::ClientError;
pub use notify::{Notification, NotificationKind, Notifications, NOTIFICATION_TTL};
pub use proxy::{AddOutcome, TrackOutcome, TrackerProxy};
pub use view::{
    stage_icon, ProductSummary, TimelineItem, TrackerForm, TrackerView, GENERIC_STAGE_ICON,
};
