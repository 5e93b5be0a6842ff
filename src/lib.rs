//! Lightweight, file-backed, multi-tenant event store with
//! schema-validated publish, durable append-only storage, and
//! push-based webhook delivery to ephemeral consumers.

pub mod api;
pub mod config;
pub mod consumers;
pub mod dispatcher;
pub mod error;
pub mod registry;
pub mod scope;
pub mod store;
pub mod validator;

pub use config::Config;
pub use error::{StoreError, StoreResult};
