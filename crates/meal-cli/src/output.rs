//! Plain-text rendering of orders and dashboards.

use meal_core::{DoctorStats, KitchenStats};
use meal_types::{format_timestamp_ms, short_id, Order};
use std::fmt::Write;

/// Renders one order as a block of lines. `label` is the status text to
/// show, which differs between dashboards.
pub fn order_block(order: &Order, label: &str) -> String {
	let mut out = String::new();
	let location = match order.bed.as_deref().filter(|b| !b.is_empty()) {
		Some(bed) => format!("room {}, bed {}", order.room_number, bed),
		None => format!("room {}", order.room_number),
	};

	let _ = writeln!(
		out,
		"#{}  [{}]  {} ({})  {}  {}",
		short_id(&order.id),
		label,
		order.patient_name,
		location,
		order.meal_time,
		format_timestamp_ms(order.created_at)
	);
	let _ = writeln!(out, "    items: {}", order.menu_items.join(", "));
	if !order.special_instructions.trim().is_empty() {
		let _ = writeln!(out, "    notes: {}", order.special_instructions);
	}
	let _ = writeln!(out, "    id: {}", order.id);
	out
}

pub fn doctor_summary(stats: &DoctorStats) -> String {
	format!(
		"Pending: {}  Approved: {}  Rejected: {}  Total: {}",
		stats.pending, stats.approved, stats.rejected, stats.total
	)
}

pub fn kitchen_summary(stats: &KitchenStats) -> String {
	format!(
		"New: {}  In progress: {}  Completed: {}  Total: {}",
		stats.new_orders, stats.in_progress, stats.completed, stats.total
	)
}
