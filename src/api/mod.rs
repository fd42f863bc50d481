//! Client side of the configuration service HTTP API.
//!
//! This module provides:
//! - Wire types ([`ConfigResponse`], [`Notification`])
//! - The endpoint wrapper that builds, signs and decodes requests ([`ConfigApi`])
//! - Error handling ([`ApiError`])
//! - Local address discovery for the `ip` query parameter ([`local_ip`])

mod client;
mod error;
mod ip;
mod model;


pub use client::{ConfigApi, PollOutcome};
pub use error::ApiError;
pub use ip::local_ip;
pub use model::{ConfigResponse, Notification};
