//! Common types for the ward meal ordering system.
//!
//! This crate defines the data model shared by every other crate: the order
//! record and its lifecycle status, change events, storage keys, and the
//! helpers used to validate pluggable-implementation configuration.

/// Change events published after order mutations.
pub mod events;
/// Orders, drafts, lifecycle statuses and meal times.
pub mod order;
/// Self-registration trait for pluggable implementations.
pub mod registry;
/// Storage keys for persisted data.
pub mod storage;
/// Display helpers.
pub mod utils;
/// Configuration validation types.
pub mod validation;

pub use events::*;
pub use order::*;
pub use registry::ImplementationRegistry;
pub use storage::*;
pub use utils::{format_timestamp_ms, short_id};
pub use validation::*;
