//! Main entry point for the meal ordering command line.
//!
//! Each subcommand is one action of a role in the ward: patients submit
//! orders, doctors review them and the kitchen prepares approved meals.
//! Orders persist in the configured storage backend between invocations.

use chrono::Weekday;
use clap::{Parser, Subcommand};
use meal_config::Config;
use meal_core::{
	menu::today, DoctorTab, KitchenTab, MealBuilder, MealEngine, MealFactories,
};
use meal_storage::implementations::file::create_storage as create_file_storage;
use meal_storage::implementations::memory::create_storage as create_memory_storage;
use meal_types::{short_id, MealTime, Order, OrderDraft};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

mod output;

/// Command-line arguments for the meals tool.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "warn")]
	log_level: String,

	/// Print results as JSON
	#[arg(long, global = true)]
	json: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Submit a meal order for a patient
	Submit {
		#[arg(long)]
		patient: String,
		#[arg(long)]
		room: String,
		#[arg(long)]
		bed: Option<String>,
		#[arg(long)]
		meal: MealTime,
		/// Menu item, repeat for several
		#[arg(long = "item", required = true)]
		items: Vec<String>,
		/// Special instructions for the kitchen
		#[arg(long)]
		notes: Option<String>,
		/// Menu day to order from (defaults to today)
		#[arg(long)]
		day: Option<Weekday>,
	},
	/// List every order, newest first
	List,
	/// Doctor dashboard
	Doctor {
		#[arg(long, default_value = "pending")]
		tab: DoctorTab,
	},
	/// Approve a pending order
	Approve { id: String },
	/// Reject a pending order
	Reject { id: String },
	/// Kitchen dashboard
	Kitchen {
		#[arg(long, default_value = "new")]
		tab: KitchenTab,
	},
	/// Start preparing an approved order
	Start { id: String },
	/// Mark an order in preparation as completed
	Complete { id: String },
	/// Show the menu
	Menu {
		#[arg(long)]
		day: Option<Weekday>,
		#[arg(long)]
		meal: Option<MealTime>,
	},
	/// Remove every order
	Clear,
}

/// Errors raised by the command line itself.
#[derive(Debug, Error)]
enum CliError {
	#[error("Order id '{0}' matches more than one order")]
	AmbiguousId(String),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	fmt()
		.with_env_filter(env_filter)
		.with_target(true)
		.with_writer(std::io::stderr)
		.init();

	let config = load_config(&args.config).await?;
	tracing::info!(facility = %config.facility.name, "Loaded configuration");

	let engine = build_engine(config)?;

	let mut stdout = std::io::stdout().lock();
	run(&engine, args.command, args.json, &mut stdout).await
}

/// Reads the configuration file, or falls back to the built-in defaults
/// when it does not exist.
async fn load_config(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
	if !path.exists() {
		tracing::info!(path = %path.display(), "No configuration file, using defaults");
		return Ok(Config::default());
	}

	let path = path
		.to_str()
		.ok_or_else(|| format!("Configuration path is not valid UTF-8: {}", path.display()))?;
	Ok(Config::from_file(path).await?)
}

/// Macro to create a factory HashMap with the appropriate type aliases
macro_rules! create_factory_map {
    ($interface:path, $error:path, $( $name:literal => $factory:expr ),* $(,)?) => {{
        let mut factories = std::collections::HashMap::new();
        $(
            factories.insert(
                $name.to_string(),
                $factory as fn(&toml::Value) -> Result<Box<dyn $interface>, $error>
            );
        )*
        factories
    }};
}

/// Builds the engine with every storage implementation this binary ships.
fn build_engine(config: Config) -> Result<MealEngine, Box<dyn std::error::Error>> {
	let storage_factories = create_factory_map!(
		meal_storage::StorageInterface,
		meal_storage::StorageError,
		"file" => create_file_storage,
		"memory" => create_memory_storage,
	);

	Ok(MealBuilder::new(config).build(MealFactories { storage_factories })?)
}

/// Accepts a full id or a unique prefix of one (such as the short id
/// printed by other commands). Unmatched input is returned unchanged so
/// the lifecycle reports it as not found.
async fn resolve_id(engine: &MealEngine, input: &str) -> Result<String, CliError> {
	let orders = engine.list_orders().await;
	if orders.iter().any(|o| o.id == input) {
		return Ok(input.to_string());
	}

	let prefix = input.trim_start_matches('#').to_ascii_lowercase();
	let mut matches = orders
		.into_iter()
		.filter(|o| !prefix.is_empty() && o.id.to_ascii_lowercase().starts_with(&prefix));

	match (matches.next(), matches.next()) {
		(Some(order), None) => Ok(order.id),
		(Some(_), Some(_)) => Err(CliError::AmbiguousId(input.to_string())),
		(None, _) => Ok(input.to_string()),
	}
}

fn print_json<T: Serialize + ?Sized>(
	out: &mut impl Write,
	value: &T,
) -> Result<(), Box<dyn std::error::Error>> {
	serde_json::to_writer_pretty(&mut *out, value)?;
	writeln!(out)?;
	Ok(())
}

fn report_change(
	out: &mut impl Write,
	json: bool,
	order: &Order,
	verb: &str,
) -> Result<(), Box<dyn std::error::Error>> {
	if json {
		return print_json(out, order);
	}
	writeln!(
		out,
		"{} order #{} for {} (room {})",
		verb,
		short_id(&order.id),
		order.patient_name,
		order.room_number
	)?;
	Ok(())
}

/// Executes one subcommand, writing its result to `out`.
async fn run(
	engine: &MealEngine,
	command: Command,
	json: bool,
	out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
	match command {
		Command::Submit {
			patient,
			room,
			bed,
			meal,
			items,
			notes,
			day,
		} => {
			let draft = OrderDraft {
				patient_name: patient,
				room_number: room,
				bed,
				meal_time: meal.to_string(),
				menu_items: items,
				special_instructions: notes,
				status: None,
			};
			let order = engine.submit_for_day(draft, day.unwrap_or_else(today)).await?;

			if json {
				print_json(out, &order)?;
			} else {
				writeln!(
					out,
					"Order submitted successfully! Order ID: {}",
					short_id(&order.id)
				)?;
				write!(out, "{}", output::order_block(&order, order.status.as_str()))?;
			}
		},
		Command::List => {
			let orders = engine.list_orders().await;
			if json {
				print_json(out, &orders)?;
			} else if orders.is_empty() {
				writeln!(out, "No orders")?;
			} else {
				for order in &orders {
					write!(out, "{}", output::order_block(order, order.status.as_str()))?;
				}
			}
		},
		Command::Doctor { tab } => {
			let dashboard = engine.doctor_dashboard(tab).await;
			if json {
				print_json(out, &dashboard)?;
			} else {
				writeln!(out, "{} - doctor review ({})", engine.config().facility.name, tab)?;
				writeln!(out, "{}", output::doctor_summary(&dashboard.stats))?;
				if dashboard.orders.is_empty() {
					writeln!(out, "No orders")?;
				}
				for order in &dashboard.orders {
					write!(out, "{}", output::order_block(order, order.status.as_str()))?;
				}
			}
		},
		Command::Kitchen { tab } => {
			let dashboard = engine.kitchen_dashboard(tab).await;
			if json {
				print_json(out, &dashboard)?;
			} else {
				writeln!(out, "{} - kitchen ({})", engine.config().facility.name, tab)?;
				writeln!(out, "{}", output::kitchen_summary(&dashboard.stats))?;
				if dashboard.orders.is_empty() {
					writeln!(out, "No orders")?;
				}
				for order in &dashboard.orders {
					let label = meal_core::views::kitchen_label(order.status);
					write!(out, "{}", output::order_block(order, label))?;
				}
			}
		},
		Command::Approve { id } => {
			let id = resolve_id(engine, &id).await?;
			let order = engine.orders().approve(&id).await?;
			report_change(out, json, &order, "Approved")?;
		},
		Command::Reject { id } => {
			let id = resolve_id(engine, &id).await?;
			let order = engine.orders().reject(&id).await?;
			report_change(out, json, &order, "Rejected")?;
		},
		Command::Start { id } => {
			let id = resolve_id(engine, &id).await?;
			let order = engine.orders().start_preparing(&id).await?;
			report_change(out, json, &order, "Started preparing")?;
		},
		Command::Complete { id } => {
			let id = resolve_id(engine, &id).await?;
			let order = engine.orders().complete(&id).await?;
			report_change(out, json, &order, "Completed")?;
		},
		Command::Menu { day, meal } => {
			let day = day.unwrap_or_else(today);
			let meals: Vec<MealTime> = match meal {
				Some(meal) => vec![meal],
				None => MealTime::all().collect(),
			};

			if json {
				let menu: std::collections::BTreeMap<&str, Vec<String>> = meals
					.iter()
					.map(|m| (m.as_str(), engine.menu_items(day, *m)))
					.collect();
				print_json(out, &menu)?;
			} else {
				for meal in meals {
					writeln!(out, "{} {}:", day, meal)?;
					for item in engine.menu_items(day, meal) {
						writeln!(out, "  - {}", item)?;
					}
				}
			}
		},
		Command::Clear => {
			engine.orders().clear().await;
			if !json {
				writeln!(out, "All orders cleared")?;
			}
		},
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use meal_config::builders::config::ConfigBuilder;
	use meal_core::{EventBus, StoredOrderStore, WeeklyMenu};
	use meal_storage::{implementations::memory::MemoryStorage, StorageService};
	use meal_types::{OrderStatus, StorageKey, ORDER_COLLECTION_ID};
	use std::sync::Arc;
	use tempfile::tempdir;

	fn engine() -> MealEngine {
		build_engine(ConfigBuilder::new().build()).unwrap()
	}

	async fn exec(engine: &MealEngine, argv: &[&str]) -> Result<String, Box<dyn std::error::Error>> {
		let args = Args::try_parse_from(std::iter::once("meals").chain(argv.iter().copied()))?;
		let mut out = Vec::new();
		run(engine, args.command, args.json, &mut out).await?;
		Ok(String::from_utf8(out)?)
	}

	async fn submit(engine: &MealEngine, patient: &str) -> String {
		exec(
			engine,
			&[
				"submit", "--patient", patient, "--room", "204", "--meal", "lunch", "--item",
				"jollof rice", "--day", "tue",
			],
		)
		.await
		.unwrap();
		engine.list_orders().await[0].id.clone()
	}

	#[test]
	fn test_args_default_values() {
		let args = Args::try_parse_from(["meals", "list"]).unwrap();

		assert_eq!(args.config, PathBuf::from("config.toml"));
		assert_eq!(args.log_level, "warn");
		assert!(!args.json);
		assert!(matches!(args.command, Command::List));
	}

	#[test]
	fn test_args_custom_values() {
		let args = Args::try_parse_from([
			"meals", "-c", "custom.toml", "-l", "debug", "kitchen", "--tab", "in-progress", "--json",
		])
		.unwrap();

		assert_eq!(args.config, PathBuf::from("custom.toml"));
		assert_eq!(args.log_level, "debug");
		assert!(args.json);
		assert!(matches!(
			args.command,
			Command::Kitchen {
				tab: KitchenTab::InProgress
			}
		));
	}

	#[test]
	fn test_submit_requires_an_item() {
		let result = Args::try_parse_from([
			"meals", "submit", "--patient", "A", "--room", "1", "--meal", "lunch",
		]);
		assert!(result.is_err());
	}

	#[test]
	fn test_create_factory_map_multiple_entries() {
		let factories = create_factory_map!(
			meal_storage::StorageInterface,
			meal_storage::StorageError,
			"memory" => create_memory_storage,
			"file" => create_file_storage,
		);

		assert_eq!(factories.len(), 2);
		assert!(factories.contains_key("memory"));
		assert!(factories.contains_key("file"));
	}

	#[tokio::test]
	async fn test_load_config_falls_back_to_defaults() {
		let dir = tempdir().unwrap();
		let config = load_config(&dir.path().join("missing.toml")).await.unwrap();
		assert_eq!(config.storage.primary, "file");
		assert_eq!(config.facility.name, meal_config::DEFAULT_FACILITY_NAME);
	}

	#[tokio::test]
	async fn test_load_config_from_file() {
		let dir = tempdir().unwrap();
		let path = dir.path().join("config.toml");
		std::fs::write(
			&path,
			"[facility]\nname = \"North Wing\"\n\n[storage]\nprimary = \"memory\"\n[storage.implementations.memory]\n",
		)
		.unwrap();

		let config = load_config(&path).await.unwrap();
		assert_eq!(config.facility.name, "North Wing");
		assert!(build_engine(config).is_ok());
	}

	#[tokio::test]
	async fn test_submit_and_list() {
		let engine = engine();
		let text = exec(
			&engine,
			&[
				"submit", "--patient", "Jane Doe", "--room", "204", "--meal", "lunch", "--item",
				"jollof rice", "--notes", "no pepper", "--day", "tuesday",
			],
		)
		.await
		.unwrap();
		assert!(text.starts_with("Order submitted successfully! Order ID: "));

		let orders = engine.list_orders().await;
		assert_eq!(orders.len(), 1);
		assert_eq!(orders[0].menu_items, vec!["JOLLOF RICE".to_string()]);
		assert_eq!(orders[0].special_instructions, "no pepper");

		let listed = exec(&engine, &["list"]).await.unwrap();
		assert!(listed.contains(&format!("#{}", short_id(&orders[0].id))));
		assert!(listed.contains("[pending]"));
	}

	#[tokio::test]
	async fn test_item_not_on_menu_is_refused() {
		let engine = engine();
		let result = exec(
			&engine,
			&[
				"submit", "--patient", "A", "--room", "1", "--meal", "lunch", "--item", "pizza",
				"--day", "mon",
			],
		)
		.await;
		assert!(result.unwrap_err().to_string().contains("not on the lunch menu"));
		assert!(engine.list_orders().await.is_empty());
	}

	#[tokio::test]
	async fn test_workflow_with_short_ids() {
		let engine = engine();
		let id = submit(&engine, "Jane Doe").await;
		let short = short_id(&id);

		let text = exec(&engine, &["approve", &short]).await.unwrap();
		assert!(text.starts_with(&format!("Approved order #{}", short)));

		let kitchen = exec(&engine, &["kitchen"]).await.unwrap();
		assert!(kitchen.contains("New: 1  In progress: 0  Completed: 0  Total: 1"));
		assert!(kitchen.contains("[new]"));

		exec(&engine, &["start", &format!("#{}", short)]).await.unwrap();
		exec(&engine, &["complete", &id]).await.unwrap();
		assert_eq!(engine.list_orders().await[0].status, OrderStatus::Completed);
	}

	#[tokio::test]
	async fn test_illegal_transition_is_an_error() {
		let engine = engine();
		let id = submit(&engine, "A").await;

		let err = exec(&engine, &["complete", &id]).await.unwrap_err();
		assert!(err.to_string().contains("Invalid state transition"));

		let err = exec(&engine, &["approve", "no-such-order"]).await.unwrap_err();
		assert!(err.to_string().contains("Order not found"));
	}

	#[tokio::test]
	async fn test_doctor_dashboard_json() {
		let engine = engine();
		submit(&engine, "A").await;
		let approved = submit(&engine, "B").await;
		submit(&engine, "C").await;
		engine.orders().approve(&approved).await.unwrap();

		let text = exec(&engine, &["doctor", "--json"]).await.unwrap();
		let value: serde_json::Value = serde_json::from_str(&text).unwrap();
		assert_eq!(value["stats"]["pending"], 2);
		assert_eq!(value["stats"]["approved"], 1);
		assert_eq!(value["stats"]["total"], 3);
		assert_eq!(value["orders"].as_array().unwrap().len(), 2);
	}

	#[tokio::test]
	async fn test_menu_and_clear() {
		let engine = engine();
		let text = exec(&engine, &["menu", "--day", "mon", "--meal", "breakfast"])
			.await
			.unwrap();
		assert_eq!(text, "Mon breakfast:\n  - MOI MOI AND PAP\n");

		submit(&engine, "A").await;
		let text = exec(&engine, &["clear"]).await.unwrap();
		assert_eq!(text, "All orders cleared\n");
		assert!(engine.list_orders().await.is_empty());
	}

	/// Engine over a memory backend already holding orders with the given ids.
	async fn seeded_engine(ids: &[&str]) -> MealEngine {
		let orders: Vec<Order> = ids
			.iter()
			.enumerate()
			.map(|(i, id)| {
				OrderDraft {
					patient_name: format!("Patient {}", i),
					room_number: "204".to_string(),
					meal_time: "lunch".to_string(),
					menu_items: vec!["JOLLOF RICE".to_string()],
					..Default::default()
				}
				.into_order(id.to_string(), i as i64)
			})
			.collect();

		let storage = StorageService::new(Box::new(MemoryStorage::new()));
		storage
			.store(StorageKey::Orders.as_str(), ORDER_COLLECTION_ID, &orders)
			.await
			.unwrap();

		MealEngine::new(
			ConfigBuilder::new().build(),
			Arc::new(StoredOrderStore::new(Arc::new(storage))),
			EventBus::default(),
			Arc::new(WeeklyMenu),
		)
	}

	#[tokio::test]
	async fn test_ambiguous_prefix() {
		let engine = seeded_engine(&["ABC-1", "abc-2"]).await;

		assert!(matches!(
			resolve_id(&engine, "#ab").await,
			Err(CliError::AmbiguousId(input)) if input == "#ab"
		));
		let err = exec(&engine, &["approve", "ab"]).await.unwrap_err();
		assert!(err.to_string().contains("matches more than one order"));

		// a longer prefix narrows it down, ignoring case
		assert_eq!(resolve_id(&engine, "abc-1").await.unwrap(), "ABC-1");
		assert_eq!(resolve_id(&engine, "#ABC-2").await.unwrap(), "abc-2");

		// an empty prefix never matches, so the lookup falls through to not found
		assert_eq!(resolve_id(&engine, "#").await.unwrap(), "#");

		let text = exec(&engine, &["approve", "ABC-1"]).await.unwrap();
		assert!(text.starts_with("Approved order #ABC-1 for Patient 0"));
		let orders = engine.list_orders().await;
		let status = |id: &str| orders.iter().find(|o| o.id == id).unwrap().status;
		assert_eq!(status("ABC-1"), OrderStatus::Approved);
		assert_eq!(status("abc-2"), OrderStatus::Pending);
	}

	#[tokio::test]
	async fn test_dashboards_show_facility_name() {
		let config = ConfigBuilder::new().facility_name("North Wing").build();
		let engine = build_engine(config).unwrap();
		submit(&engine, "A").await;

		let doctor = exec(&engine, &["doctor"]).await.unwrap();
		assert!(doctor.starts_with("North Wing - doctor review (pending)\n"));

		let kitchen = exec(&engine, &["kitchen", "--tab", "all"]).await.unwrap();
		assert!(kitchen.starts_with("North Wing - kitchen (all)\n"));
	}
}
