//! Event bus for order change notifications.
//!
//! A thin wrapper over a tokio broadcast channel. Every subscriber receives
//! every event published after it subscribed; slow subscribers that fall
//! more than the channel capacity behind see a `Lagged` error and skip ahead.

use meal_types::OrderEvent;
use tokio::sync::broadcast;

/// Number of undelivered events kept per subscriber.
pub const DEFAULT_CAPACITY: usize = 256;

/// Publish/subscribe hub for [`OrderEvent`]s.
#[derive(Clone)]
pub struct EventBus {
	sender: broadcast::Sender<OrderEvent>,
}

impl EventBus {
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity);
		Self { sender }
	}

	/// Registers a new subscriber.
	pub fn subscribe(&self) -> broadcast::Receiver<OrderEvent> {
		self.sender.subscribe()
	}

	/// Publishes an event to all current subscribers.
	///
	/// Returns the number of subscribers reached. Fails only when nobody is
	/// subscribed, which callers normally ignore.
	pub fn publish(
		&self,
		event: OrderEvent,
	) -> Result<usize, broadcast::error::SendError<OrderEvent>> {
		self.sender.send(event)
	}
}

impl Default for EventBus {
	fn default() -> Self {
		Self::new(DEFAULT_CAPACITY)
	}
}
