//! Configuration builder for creating test and development configurations.

use crate::{Config, FacilityConfig, OrdersConfig, StorageConfig};
use std::collections::HashMap;

/// Builder for creating `Config` instances with a fluent API.
///
/// Defaults to in-memory storage with transitions enforced.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
	facility_name: String,
	storage_primary: String,
	storage_implementations: HashMap<String, toml::Value>,
	enforce_transitions: bool,
}

impl Default for ConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigBuilder {
	pub fn new() -> Self {
		let mut storage_implementations = HashMap::new();
		storage_implementations.insert(
			"memory".to_string(),
			toml::Value::Table(toml::map::Map::new()),
		);

		Self {
			facility_name: "Test Ward".to_string(),
			storage_primary: "memory".to_string(),
			storage_implementations,
			enforce_transitions: true,
		}
	}

	pub fn facility_name(mut self, name: impl Into<String>) -> Self {
		self.facility_name = name.into();
		self
	}

	/// Uses file storage rooted at `path` as the primary backend.
	pub fn file_storage(mut self, path: impl Into<String>) -> Self {
		let mut table = toml::map::Map::new();
		table.insert("storage_path".to_string(), toml::Value::String(path.into()));
		self.storage_implementations
			.insert("file".to_string(), toml::Value::Table(table));
		self.storage_primary = "file".to_string();
		self
	}

	pub fn enforce_transitions(mut self, enforce: bool) -> Self {
		self.enforce_transitions = enforce;
		self
	}

	pub fn build(self) -> Config {
		Config {
			facility: FacilityConfig {
				name: self.facility_name,
			},
			storage: StorageConfig {
				primary: self.storage_primary,
				implementations: self.storage_implementations,
			},
			orders: OrdersConfig {
				enforce_transitions: self.enforce_transitions,
			},
		}
	}
}
