//! startup-swipe: swipe on startup demos and vote
//!
//! Two halves share the domain types:
//! - the service (`api`, `auth`, `storage`): JSON over HTTP on top of SQLite,
//!   recomputing each record's confidence from its full vote history
//! - the client core (`client`): UI-free state machines for the swipe deck,
//!   card gestures, view routing and the derived lists the front end renders

pub mod api;
pub mod auth;
pub mod client;
pub mod confidence;
pub mod config;
pub mod error;
pub mod media;
pub mod models;
pub mod storage;

pub use config::Config;
pub use models::{Record, Vote, VoteKind};
