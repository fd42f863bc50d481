//! apollo-sync: Apollo configuration client
//!
//! A library that keeps configuration namespaces from an Apollo-compatible
//! configuration service in sync, and keeps serving them from a disk cache
//! when the service is unreachable.
//!
//! Start with [`ApolloClient::builder`].

pub mod api;
pub mod cache;
pub mod change;
pub mod client;
pub mod config;
pub mod sign;
pub mod time;
pub mod transport;

pub use cache::{CacheStore, ConfigSnapshot, FileCacheStore};
pub use change::{ChangeKind, ChangeListener, ConfigChange};
pub use client::{ApolloClient, ClientBuilder, ClientOptions};
