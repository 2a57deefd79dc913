//! Configuration module for the meal ordering system.
//!
//! Configuration is read from a TOML file. Before parsing, `${VAR}` and
//! `${VAR:-default}` references are replaced with environment variable
//! values, and after parsing the result is validated so a broken file is
//! reported at startup.

#[cfg(any(test, feature = "testing"))]
pub mod builders;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Facility identity, shown in dashboard headers.
	pub facility: FacilityConfig,
	/// Configuration for the storage backend.
	pub storage: StorageConfig,
	/// Order workflow settings.
	#[serde(default)]
	pub orders: OrdersConfig,
}

/// Facility identity.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FacilityConfig {
	/// Display name of the facility.
	pub name: String,
}

/// Configuration for the storage backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of storage implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

/// Order workflow settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrdersConfig {
	/// Reject status changes that are not in the lifecycle table.
	///
	/// Defaults to true. Setting it to false accepts any target status, as
	/// earlier clients did.
	#[serde(default = "default_enforce_transitions")]
	pub enforce_transitions: bool,
}

impl Default for OrdersConfig {
	fn default() -> Self {
		Self {
			enforce_transitions: default_enforce_transitions(),
		}
	}
}

fn default_enforce_transitions() -> bool {
	true
}

/// Default facility name used when running without a configuration file.
pub const DEFAULT_FACILITY_NAME: &str = "Residential Health Village";

impl Default for Config {
	/// File-backed storage under `./data/storage`, transitions enforced.
	fn default() -> Self {
		let mut file = toml::map::Map::new();
		file.insert(
			"storage_path".to_string(),
			toml::Value::String("./data/storage".to_string()),
		);

		let mut implementations = HashMap::new();
		implementations.insert("file".to_string(), toml::Value::Table(file));

		Self {
			facility: FacilityConfig {
				name: DEFAULT_FACILITY_NAME.to_string(),
			},
			storage: StorageConfig {
				primary: "file".to_string(),
				implementations,
			},
			orders: OrdersConfig::default(),
		}
	}
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut missing = None;
	let result = re.replace_all(input, |cap: &regex::Captures<'_>| {
		let var_name = &cap[1];
		match (std::env::var(var_name), cap.get(2)) {
			(Ok(value), _) => value,
			(Err(_), Some(default)) => default.as_str().to_string(),
			(Err(_), None) => {
				missing.get_or_insert_with(|| var_name.to_string());
				String::new()
			},
		}
	});

	if let Some(var_name) = missing {
		return Err(ConfigError::Validation(format!(
			"Environment variable '{}' not found",
			var_name
		)));
	}

	Ok(result.into_owned())
}

impl Config {
	/// Loads configuration from a file.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let content = tokio::fs::read_to_string(path).await?;
		content.parse()
	}

	/// Returns the TOML table of the primary storage implementation.
	pub fn primary_storage(&self) -> Option<&toml::Value> {
		self.storage.implementations.get(&self.storage.primary)
	}

	/// Validates the configuration.
	///
	/// - Facility name is not empty
	/// - At least one storage implementation is configured
	/// - The primary storage implementation is named and configured
	fn validate(&self) -> Result<(), ConfigError> {
		if self.facility.name.trim().is_empty() {
			return Err(ConfigError::Validation(
				"Facility name cannot be empty".into(),
			));
		}

		if self.storage.implementations.is_empty() {
			return Err(ConfigError::Validation(
				"At least one storage implementation must be configured".into(),
			));
		}
		if self.storage.primary.is_empty() {
			return Err(ConfigError::Validation(
				"Storage primary implementation cannot be empty".into(),
			));
		}
		if !self
			.storage
			.implementations
			.contains_key(&self.storage.primary)
		{
			return Err(ConfigError::Validation(format!(
				"Primary storage '{}' not found in storage.implementations",
				self.storage.primary
			)));
		}

		Ok(())
	}
}

/// Parses a TOML string, resolving environment variables and validating
/// the result.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
