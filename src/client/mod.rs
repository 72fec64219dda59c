//! Client core - front-end state without a UI toolkit
//!
//! Provides:
//! - Swipe gesture translation and frame scheduling
//! - View routing with timed transitions
//! - Card, trending and profile presentation models
//! - `AppState` tying them together, and an HTTP client for the API
//!
//! Nothing here touches a clock or the network directly. Callers pass the
//! current time in and apply the returned effects.

pub mod api_client;
pub mod app;
pub mod card;
pub mod deck;
pub mod frame;
pub mod gesture;
pub mod modal;
pub mod profile;
pub mod router;
pub mod trending;

pub use api_client::{ApiClient, ClientError};
pub use app::{AppEffect, AppState};

/// Monotonic milliseconds, as handed out by the host's frame clock
pub type Millis = f64;
