//! Builder pattern for constructing meal engines.
//!
//! Storage backends are created from the configuration through factory
//! functions, so the binary decides which implementations are available
//! and the configuration decides which one is used.

use crate::engine::{event_bus::EventBus, MealEngine};
use crate::menu::{MenuProvider, WeeklyMenu};
use crate::store::{OrderStore, StoredOrderStore};
use meal_config::Config;
use meal_storage::{StorageError, StorageInterface, StorageService};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during engine construction.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
}

/// Factory functions available to the builder, keyed by implementation name.
pub struct MealFactories<SF> {
	pub storage_factories: HashMap<String, SF>,
}

/// Builder for constructing a MealEngine with pluggable storage.
pub struct MealBuilder {
	config: Config,
	menu: Arc<dyn MenuProvider>,
	event_bus: EventBus,
}

impl MealBuilder {
	/// Creates a builder using the weekly menu and a fresh event bus.
	pub fn new(config: Config) -> Self {
		Self {
			config,
			menu: Arc::new(WeeklyMenu),
			event_bus: EventBus::default(),
		}
	}

	pub fn with_menu(mut self, menu: Arc<dyn MenuProvider>) -> Self {
		self.menu = menu;
		self
	}

	/// Builds the engine on top of the configured primary storage.
	///
	/// Every configured implementation with a known factory is created, so a
	/// broken table for a non-primary backend is still reported.
	pub fn build<SF>(self, factories: MealFactories<SF>) -> Result<MealEngine, BuilderError>
	where
		SF: Fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError>,
	{
		let mut storage_impls = HashMap::new();
		for (name, config) in &self.config.storage.implementations {
			let Some(factory) = factories.storage_factories.get(name) else {
				tracing::warn!(component = "storage", implementation = %name, "Unknown implementation, skipped");
				continue;
			};
			match factory(config) {
				Ok(implementation) => {
					storage_impls.insert(name.clone(), implementation);
					let is_primary = &self.config.storage.primary == name;
					tracing::info!(component = "storage", implementation = %name, enabled = %is_primary, "Loaded");
				},
				Err(e) => {
					tracing::error!(
						component = "storage",
						implementation = %name,
						error = %e,
						"Failed to create storage implementation"
					);
					return Err(BuilderError::Config(format!(
						"Failed to create storage implementation '{}': {}",
						name, e
					)));
				},
			}
		}

		if storage_impls.is_empty() {
			return Err(BuilderError::Config(
				"No valid storage implementations available".into(),
			));
		}

		let primary_storage = &self.config.storage.primary;
		let storage_backend = storage_impls.remove(primary_storage).ok_or_else(|| {
			BuilderError::Config(format!(
				"Primary storage '{}' failed to load or has invalid configuration",
				primary_storage
			))
		})?;

		let storage = Arc::new(StorageService::new(storage_backend));
		let store: Arc<dyn OrderStore> = Arc::new(StoredOrderStore::new(storage));

		Ok(MealEngine::new(self.config, store, self.event_bus, self.menu))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use meal_config::builders::config::ConfigBuilder;
	use meal_storage::get_all_implementations;
	use meal_storage::StorageFactory;
	use meal_types::{MealTime, OrderDraft};
	use tempfile::tempdir;

	fn all_factories() -> MealFactories<StorageFactory> {
		MealFactories {
			storage_factories: get_all_implementations()
				.into_iter()
				.map(|(name, factory)| (name.to_string(), factory))
				.collect(),
		}
	}

	fn lunch(patient: &str) -> OrderDraft {
		OrderDraft {
			patient_name: patient.to_string(),
			room_number: "12".to_string(),
			meal_time: "lunch".to_string(),
			menu_items: vec!["FRIED - RICE".to_string()],
			..Default::default()
		}
	}

	#[tokio::test]
	async fn test_build_with_memory_storage() {
		let engine = MealBuilder::new(ConfigBuilder::new().build())
			.build(all_factories())
			.unwrap();

		engine
			.submit_for_day(lunch("A"), chrono::Weekday::Mon)
			.await
			.unwrap();
		assert_eq!(engine.list_orders().await.len(), 1);
	}

	#[tokio::test]
	async fn test_file_storage_is_shared_between_engines() {
		let dir = tempdir().unwrap();
		let config = ConfigBuilder::new()
			.file_storage(dir.path().to_string_lossy())
			.build();

		let first = MealBuilder::new(config.clone())
			.build(all_factories())
			.unwrap();
		let order = first
			.submit_for_day(lunch("A"), chrono::Weekday::Mon)
			.await
			.unwrap();

		let second = MealBuilder::new(config).build(all_factories()).unwrap();
		second.orders().approve(&order.id).await.unwrap();
		assert_eq!(
			first.list_orders().await[0].status,
			meal_types::OrderStatus::Approved
		);
	}

	#[test]
	fn test_invalid_backend_table_fails() {
		let mut config = ConfigBuilder::new().build();
		config.storage.implementations.insert(
			"memory".to_string(),
			toml::from_str("unexpected = 1").unwrap(),
		);

		let result = MealBuilder::new(config).build(all_factories());
		assert!(matches!(result, Err(BuilderError::Config(_))));
	}

	#[test]
	fn test_missing_factory_for_primary_fails() {
		let config = ConfigBuilder::new().build();
		let factories: MealFactories<StorageFactory> = MealFactories {
			storage_factories: HashMap::new(),
		};
		assert!(MealBuilder::new(config).build(factories).is_err());
	}

	struct OnlyRice;

	impl MenuProvider for OnlyRice {
		fn items(&self, _day: chrono::Weekday, _meal: MealTime) -> Vec<String> {
			vec!["RICE".to_string()]
		}
	}

	#[tokio::test]
	async fn test_custom_menu() {
		let engine = MealBuilder::new(ConfigBuilder::new().build())
			.with_menu(Arc::new(OnlyRice))
			.build(all_factories())
			.unwrap();

		assert_eq!(
			engine.menu_items(chrono::Weekday::Fri, MealTime::Dinner),
			vec!["RICE".to_string()]
		);
		assert!(engine
			.submit_for_day(lunch("A"), chrono::Weekday::Mon)
			.await
			.is_err());
	}
}
