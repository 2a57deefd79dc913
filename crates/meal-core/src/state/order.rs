//! Order state machine implementation.
//!
//! Moves orders through the review and preparation lifecycle:
//! pending -> approved | rejected, approved -> in-progress -> completed.
//! Doctors act on pending orders and the kitchen on approved and
//! in-progress ones. Rejected and completed orders are final.

use crate::engine::event_bus::EventBus;
use crate::store::OrderStore;
use meal_types::{short_id, DraftError, Order, OrderDraft, OrderEvent, OrderStatus};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during order state management.
#[derive(Debug, Error)]
pub enum OrderStateError {
	#[error("Invalid state transition from {from} to {to}")]
	InvalidTransition { from: OrderStatus, to: OrderStatus },
	#[error("Order not found: {0}")]
	OrderNotFound(String),
	#[error("Invalid order: {0}")]
	InvalidDraft(#[from] DraftError),
}

/// Applies lifecycle rules on top of an [`OrderStore`] and announces
/// successful changes on the event bus.
pub struct OrderStateMachine {
	store: Arc<dyn OrderStore>,
	event_bus: EventBus,
	enforce_transitions: bool,
}

impl OrderStateMachine {
	/// Creates a state machine that rejects transitions outside the
	/// lifecycle table.
	pub fn new(store: Arc<dyn OrderStore>, event_bus: EventBus) -> Self {
		Self {
			store,
			event_bus,
			enforce_transitions: true,
		}
	}

	/// Turns transition checking on or off. With checking off any target
	/// status is accepted, matching the bare store.
	pub fn with_enforcement(mut self, enforce_transitions: bool) -> Self {
		self.enforce_transitions = enforce_transitions;
		self
	}

	/// Checks if a state transition is valid
	pub fn is_valid_transition(from: &OrderStatus, to: &OrderStatus) -> bool {
		from.allowed_next().contains(to)
	}

	/// Validates a patient's draft and stores it as a new pending order.
	pub async fn submit(&self, draft: OrderDraft) -> Result<Order, OrderStateError> {
		draft.validate()?;
		Ok(self.create_validated(draft).await)
	}

	/// Stores a draft that has already passed [`OrderDraft::validate`].
	pub(crate) async fn create_validated(&self, draft: OrderDraft) -> Order {
		let order = self.store.create(draft).await;
		self.event_bus
			.publish(OrderEvent::Created {
				order: order.clone(),
			})
			.ok();
		order
	}

	/// Gets an order by ID
	pub async fn get_order(&self, order_id: &str) -> Result<Order, OrderStateError> {
		self.store
			.list()
			.await
			.into_iter()
			.find(|o| o.id == order_id)
			.ok_or_else(|| OrderStateError::OrderNotFound(order_id.to_string()))
	}

	/// Transitions an order to a new status with validation
	pub async fn transition_order_status(
		&self,
		order_id: &str,
		new_status: OrderStatus,
	) -> Result<Order, OrderStateError> {
		let current = self.get_order(order_id).await?;

		if self.enforce_transitions && !Self::is_valid_transition(&current.status, &new_status) {
			tracing::warn!(
				order_id = %short_id(order_id),
				from = %current.status,
				to = %new_status,
				terminal = current.status.is_terminal(),
				"Rejected status change"
			);
			return Err(OrderStateError::InvalidTransition {
				from: current.status,
				to: new_status,
			});
		}

		let updated = self
			.store
			.update_status(order_id, new_status)
			.await
			.ok_or_else(|| OrderStateError::OrderNotFound(order_id.to_string()))?;

		self.event_bus
			.publish(OrderEvent::StatusChanged {
				order_id: order_id.to_string(),
				from: current.status,
				to: new_status,
			})
			.ok();

		Ok(updated)
	}

	/// Doctor approves a pending order.
	pub async fn approve(&self, order_id: &str) -> Result<Order, OrderStateError> {
		self.transition_order_status(order_id, OrderStatus::Approved)
			.await
	}

	/// Doctor rejects a pending order.
	pub async fn reject(&self, order_id: &str) -> Result<Order, OrderStateError> {
		self.transition_order_status(order_id, OrderStatus::Rejected)
			.await
	}

	/// Kitchen starts preparing an approved order.
	pub async fn start_preparing(&self, order_id: &str) -> Result<Order, OrderStateError> {
		self.transition_order_status(order_id, OrderStatus::InProgress)
			.await
	}

	/// Kitchen marks an order as served.
	pub async fn complete(&self, order_id: &str) -> Result<Order, OrderStateError> {
		self.transition_order_status(order_id, OrderStatus::Completed)
			.await
	}

	/// Removes every order.
	pub async fn clear(&self) {
		self.store.clear().await;
		self.event_bus.publish(OrderEvent::Cleared).ok();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::store::{MockOrderStore, StoredOrderStore};
	use meal_storage::{implementations::memory::MemoryStorage, StorageService};

	fn machine() -> (OrderStateMachine, Arc<dyn OrderStore>, EventBus) {
		let store: Arc<dyn OrderStore> = Arc::new(StoredOrderStore::new(Arc::new(
			StorageService::new(Box::new(MemoryStorage::new())),
		)));
		let bus = EventBus::default();
		(
			OrderStateMachine::new(store.clone(), bus.clone()),
			store,
			bus,
		)
	}

	fn jane() -> OrderDraft {
		OrderDraft {
			patient_name: "Jane Doe".to_string(),
			room_number: "204".to_string(),
			meal_time: "lunch".to_string(),
			menu_items: vec!["Jollof Rice".to_string()],
			..Default::default()
		}
	}

	fn stored(id: &str, status: OrderStatus) -> Order {
		OrderDraft {
			status: Some(status),
			..jane()
		}
		.into_order(id.to_string(), 1)
	}

	#[test]
	fn test_transition_table() {
		use OrderStatus::*;
		let legal = [
			(Pending, Approved),
			(Pending, Rejected),
			(Approved, InProgress),
			(InProgress, Completed),
		];

		for from in OrderStatus::all() {
			for to in OrderStatus::all() {
				assert_eq!(
					OrderStateMachine::is_valid_transition(&from, &to),
					legal.contains(&(from, to)),
					"{} -> {}",
					from,
					to
				);
			}
		}
	}

	#[tokio::test]
	async fn test_full_lifecycle() {
		let (machine, store, _bus) = machine();

		let order = machine.submit(jane()).await.unwrap();
		assert_eq!(order.status, OrderStatus::Pending);

		for (step, expected) in [
			(OrderStatus::Approved, OrderStatus::Approved),
			(OrderStatus::InProgress, OrderStatus::InProgress),
			(OrderStatus::Completed, OrderStatus::Completed),
		] {
			machine
				.transition_order_status(&order.id, step)
				.await
				.unwrap();
			let listed = store.list().await;
			assert_eq!(listed.len(), 1);
			assert_eq!(listed[0].status, expected);
			assert_eq!(listed[0].patient_name, "Jane Doe");
			assert_eq!(listed[0].room_number, "204");
			assert_eq!(listed[0].menu_items, vec!["Jollof Rice".to_string()]);
		}
	}

	#[tokio::test]
	async fn test_rejects_skipping_and_backward_transitions() {
		let (machine, store, _bus) = machine();
		let order = machine.submit(jane()).await.unwrap();

		let err = machine.start_preparing(&order.id).await.unwrap_err();
		assert!(matches!(
			err,
			OrderStateError::InvalidTransition {
				from: OrderStatus::Pending,
				to: OrderStatus::InProgress
			}
		));

		machine.approve(&order.id).await.unwrap();
		assert!(machine
			.transition_order_status(&order.id, OrderStatus::Pending)
			.await
			.is_err());

		// nothing was written by the refused transitions
		assert_eq!(store.list().await[0].status, OrderStatus::Approved);
	}

	#[tokio::test]
	async fn test_terminal_states_accept_nothing() {
		let (machine, _store, _bus) = machine();
		let order = machine.submit(jane()).await.unwrap();
		machine.reject(&order.id).await.unwrap();

		for to in OrderStatus::all() {
			assert!(machine
				.transition_order_status(&order.id, to)
				.await
				.is_err());
		}
	}

	#[tokio::test]
	async fn test_permissive_mode_accepts_any_target() {
		let (machine, _store, _bus) = machine();
		let machine = machine.with_enforcement(false);
		let order = machine.submit(jane()).await.unwrap();

		let updated = machine.complete(&order.id).await.unwrap();
		assert_eq!(updated.status, OrderStatus::Completed);
	}

	#[tokio::test]
	async fn test_submit_validates_draft() {
		let (machine, store, _bus) = machine();
		let mut draft = jane();
		draft.menu_items.clear();

		let err = machine.submit(draft).await.unwrap_err();
		assert!(matches!(
			err,
			OrderStateError::InvalidDraft(DraftError::NoMenuItems)
		));
		assert!(store.list().await.is_empty());
	}

	#[tokio::test]
	async fn test_events_published() {
		let (machine, _store, bus) = machine();
		let mut events = bus.subscribe();

		let order = machine.submit(jane()).await.unwrap();
		machine.approve(&order.id).await.unwrap();
		machine.clear().await;

		assert_eq!(
			events.recv().await.unwrap(),
			OrderEvent::Created {
				order: order.clone()
			}
		);
		assert_eq!(
			events.recv().await.unwrap(),
			OrderEvent::StatusChanged {
				order_id: order.id.clone(),
				from: OrderStatus::Pending,
				to: OrderStatus::Approved,
			}
		);
		assert_eq!(events.recv().await.unwrap(), OrderEvent::Cleared);
	}

	#[tokio::test]
	async fn test_unknown_order_is_not_found() {
		let mut store = MockOrderStore::new();
		store.expect_list().returning(Vec::new);
		store.expect_update_status().never();

		let machine = OrderStateMachine::new(Arc::new(store), EventBus::default());
		let err = machine.approve("missing").await.unwrap_err();
		assert!(matches!(err, OrderStateError::OrderNotFound(id) if id == "missing"));
	}

	#[tokio::test]
	async fn test_order_vanishing_between_read_and_write_is_not_found() {
		let mut store = MockOrderStore::new();
		store
			.expect_list()
			.returning(|| vec![stored("abc", OrderStatus::Pending)]);
		store
			.expect_update_status()
			.withf(|id, status| id == "abc" && *status == OrderStatus::Approved)
			.times(1)
			.returning(|_, _| None);

		let machine = OrderStateMachine::new(Arc::new(store), EventBus::default());
		assert!(matches!(
			machine.approve("abc").await,
			Err(OrderStateError::OrderNotFound(_))
		));
	}
}
