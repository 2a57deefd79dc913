//! State management for meal orders.
//!
//! This module provides the state machine that moves orders through doctor
//! review and kitchen preparation, refusing changes the lifecycle does not
//! allow.

pub mod order;

pub use order::{OrderStateError, OrderStateMachine};
