//! Order store: the single persisted collection of meal orders.
//!
//! The whole collection lives under one storage entry and is rewritten on
//! every mutation. This keeps the on-disk layout identical to what earlier
//! clients wrote, and is only reasonable because a facility produces a
//! small number of orders per day.
//!
//! Storage problems never reach the caller. A collection that cannot be
//! read is treated as empty, and a failed write is logged and dropped, so
//! callers cannot tell "no orders" from "storage unavailable".
//!
//! There is no locking: two processes writing the same store can overwrite
//! each other's changes.

use async_trait::async_trait;
use meal_storage::{StorageError, StorageService};
use meal_types::{short_id, Order, OrderDraft, OrderStatus, StorageKey, ORDER_COLLECTION_ID};
use std::sync::Arc;
use uuid::Uuid;

/// Persistence contract for the order collection.
///
/// Page-level code depends on this trait rather than on a concrete backend,
/// so tests can substitute an in-memory fake.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderStore: Send + Sync {
	/// Returns every order, newest first. Empty if nothing is stored or the
	/// stored data cannot be read.
	async fn list(&self) -> Vec<Order>;

	/// Assigns an id, a creation time and a status (`pending` unless the
	/// draft overrides it), prepends the order and persists the collection.
	///
	/// No field validation happens here.
	async fn create(&self, draft: OrderDraft) -> Order;

	/// Replaces the status of the order with the given id.
	///
	/// Returns `None` without writing anything if no such order exists. The
	/// transition is not checked for legality.
	async fn update_status(&self, id: &str, status: OrderStatus) -> Option<Order>;

	/// Replaces the stored collection with an empty one.
	async fn clear(&self);
}

/// [`OrderStore`] backed by a [`StorageService`], holding the collection
/// as one JSON array.
pub struct StoredOrderStore {
	storage: Arc<StorageService>,
}

impl StoredOrderStore {
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self { storage }
	}

	async fn read(&self) -> Vec<Order> {
		match self
			.storage
			.retrieve::<Vec<Order>>(StorageKey::Orders.as_str(), ORDER_COLLECTION_ID)
			.await
		{
			Ok(orders) => orders,
			Err(StorageError::NotFound) => Vec::new(),
			Err(e) => {
				tracing::warn!(error = %e, "Failed to read order collection, treating it as empty");
				Vec::new()
			},
		}
	}

	async fn write(&self, orders: &[Order]) {
		if let Err(e) = self
			.storage
			.store(StorageKey::Orders.as_str(), ORDER_COLLECTION_ID, orders)
			.await
		{
			tracing::warn!(error = %e, count = orders.len(), "Failed to write order collection");
		}
	}
}

/// Generates an id not used by any order in `existing`.
fn generate_id(existing: &[Order]) -> String {
	loop {
		let id = Uuid::new_v4().to_string();
		if !existing.iter().any(|o| o.id == id) {
			return id;
		}
	}
}

#[async_trait]
impl OrderStore for StoredOrderStore {
	async fn list(&self) -> Vec<Order> {
		let orders = self.read().await;
		tracing::debug!(count = orders.len(), "Listed orders");
		orders
	}

	async fn create(&self, draft: OrderDraft) -> Order {
		let mut orders = self.read().await;
		let id = generate_id(&orders);
		let created_at = chrono::Utc::now().timestamp_millis();
		let order = draft.into_order(id, created_at);

		orders.insert(0, order.clone());
		self.write(&orders).await;

		tracing::info!(
			order_id = %short_id(&order.id),
			status = %order.status,
			meal_time = %order.meal_time,
			"Created order"
		);
		order
	}

	async fn update_status(&self, id: &str, status: OrderStatus) -> Option<Order> {
		let mut orders = self.read().await;
		let order = orders.iter_mut().find(|o| o.id == id)?;
		order.status = status;
		let updated = order.clone();

		self.write(&orders).await;

		tracing::info!(order_id = %short_id(id), status = %status, "Updated order status");
		Some(updated)
	}

	async fn clear(&self) {
		self.write(&[]).await;
		tracing::info!("Cleared all orders");
	}
}
