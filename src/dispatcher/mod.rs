//! Consumer dispatch (spec §4.7, §4.8): push-based delivery of published
//! events to subscribed consumers, with at-least-once semantics and
//! eviction (no retry) on delivery failure.

pub mod delivery;
pub mod manager;
pub mod topic_dispatcher;

pub use manager::DispatcherManager;
