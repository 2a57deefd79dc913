//! Meal ordering engine.
//!
//! Ties the order store, the lifecycle state machine, the event bus and the
//! menu together behind the operations each role performs: patients submit,
//! doctors review, the kitchen prepares.

use crate::menu::MenuProvider;
use crate::state::{OrderStateError, OrderStateMachine};
use crate::store::OrderStore;
use crate::views::{
	doctor_view, kitchen_view, DoctorStats, DoctorTab, KitchenStats, KitchenTab,
};
use chrono::Weekday;
use event_bus::EventBus;
use meal_config::Config;
use meal_types::{MealTime, Order, OrderDraft};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

pub mod event_bus;

/// Errors that can occur during engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
	#[error(transparent)]
	Order(#[from] OrderStateError),
	#[error("'{item}' is not on the {meal} menu for {day}")]
	NotOnMenu {
		item: String,
		day: Weekday,
		meal: MealTime,
	},
}

/// A dashboard snapshot: counts plus the orders on the selected tab.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard<S> {
	pub stats: S,
	pub orders: Vec<Order>,
}

/// Main engine for the meal ordering workflow.
pub struct MealEngine {
	/// Engine configuration.
	config: Config,
	/// Persisted order collection.
	store: Arc<dyn OrderStore>,
	/// Lifecycle rules applied to every status change.
	orders: OrderStateMachine,
	/// Change notifications for interested listeners.
	event_bus: EventBus,
	/// Dishes offered per day and meal.
	menu: Arc<dyn MenuProvider>,
}

impl MealEngine {
	pub fn new(
		config: Config,
		store: Arc<dyn OrderStore>,
		event_bus: EventBus,
		menu: Arc<dyn MenuProvider>,
	) -> Self {
		let orders = OrderStateMachine::new(store.clone(), event_bus.clone())
			.with_enforcement(config.orders.enforce_transitions);

		Self {
			config,
			store,
			orders,
			event_bus,
			menu,
		}
	}

	/// Submits a patient's order after checking every item against the
	/// menu for `day`. Item spellings are normalised to the menu's.
	pub async fn submit_for_day(
		&self,
		mut draft: OrderDraft,
		day: Weekday,
	) -> Result<Order, EngineError> {
		let meal = draft.validate().map_err(OrderStateError::from)?;
		draft.meal_time = meal.as_str().to_string();

		for item in draft.menu_items.iter_mut() {
			*item = self
				.menu
				.find(day, meal, item)
				.ok_or_else(|| EngineError::NotOnMenu {
					item: item.clone(),
					day,
					meal,
				})?;
		}

		Ok(self.orders.create_validated(draft).await)
	}

	/// All orders, newest first.
	pub async fn list_orders(&self) -> Vec<Order> {
		self.store.list().await
	}

	pub async fn doctor_dashboard(&self, tab: DoctorTab) -> Dashboard<DoctorStats> {
		let all = self.store.list().await;
		Dashboard {
			stats: DoctorStats::from_orders(&all),
			orders: doctor_view(&all, tab),
		}
	}

	pub async fn kitchen_dashboard(&self, tab: KitchenTab) -> Dashboard<KitchenStats> {
		let all = self.store.list().await;
		Dashboard {
			stats: KitchenStats::from_orders(&all),
			orders: kitchen_view(&all, tab),
		}
	}

	/// Dishes offered for the given day and meal.
	pub fn menu_items(&self, day: Weekday, meal: MealTime) -> Vec<String> {
		self.menu.items(day, meal)
	}

	/// Lifecycle actions (approve, reject, start, complete, clear).
	pub fn orders(&self) -> &OrderStateMachine {
		&self.orders
	}

	pub fn event_bus(&self) -> &EventBus {
		&self.event_bus
	}

	pub fn config(&self) -> &Config {
		&self.config
	}
}
