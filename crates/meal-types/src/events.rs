//! Event types for change notification.
//!
//! Events are published after a mutation has been written to the order
//! store. They are an optional hook for reactive front ends; the order
//! store remains the source of truth and callers can always re-read it.

use crate::{Order, OrderStatus};
use serde::{Deserialize, Serialize};

/// Events describing changes to the order collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OrderEvent {
	/// A new order was submitted.
	Created { order: Order },
	/// An existing order moved to a new status.
	StatusChanged {
		order_id: String,
		from: OrderStatus,
		to: OrderStatus,
	},
	/// The whole collection was reset.
	Cleared,
}
