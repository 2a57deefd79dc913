//! Utility functions for common display formatting.

pub mod formatting;

pub use formatting::{format_timestamp_ms, short_id};
