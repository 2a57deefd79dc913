//! Core of the meal ordering system.
//!
//! This crate holds the order store, the lifecycle state machine that moves
//! orders from patient submission through doctor review to the kitchen, the
//! dashboard views derived from the collection, and the builder that wires
//! a storage backend from configuration.

pub mod builder;
pub mod engine;
pub mod menu;
pub mod state;
pub mod store;
pub mod views;

pub use builder::{BuilderError, MealBuilder, MealFactories};
pub use engine::{event_bus::EventBus, Dashboard, EngineError, MealEngine};
pub use menu::{MenuProvider, WeeklyMenu};
pub use state::{OrderStateError, OrderStateMachine};
pub use store::{OrderStore, StoredOrderStore};
pub use views::{DoctorStats, DoctorTab, KitchenStats, KitchenTab};
