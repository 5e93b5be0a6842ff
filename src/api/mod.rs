//! HTTP surface (spec §6): topic/schema management, event publish and
//! read, consumer registration, and health reporting. Every route comes
//! in a default-scope and a `/tenants/{t}/namespaces/{n}`-scoped form,
//! sharing the same handler logic through [`state::AppState`].

pub mod handlers;
pub mod middleware;
pub mod server;
pub mod state;

pub use server::RestApiServer;
pub use state::AppState;
