//! Dashboard views derived from the order collection.
//!
//! Nothing here is stored. Every view and count is recomputed from the
//! slice it is given, which is normally the result of the latest
//! [`OrderStore::list`](crate::store::OrderStore::list) call.

use meal_types::{Order, OrderStatus};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Tabs on the doctor's review dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DoctorTab {
	#[default]
	Pending,
	/// Approved or rejected orders.
	Reviewed,
	All,
}

impl DoctorTab {
	fn includes(&self, status: OrderStatus) -> bool {
		match self {
			DoctorTab::Pending => status == OrderStatus::Pending,
			DoctorTab::Reviewed => {
				matches!(status, OrderStatus::Approved | OrderStatus::Rejected)
			},
			DoctorTab::All => true,
		}
	}
}

impl fmt::Display for DoctorTab {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			DoctorTab::Pending => "pending",
			DoctorTab::Reviewed => "reviewed",
			DoctorTab::All => "all",
		})
	}
}

impl FromStr for DoctorTab {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"pending" => Ok(Self::Pending),
			"reviewed" => Ok(Self::Reviewed),
			"all" => Ok(Self::All),
			other => Err(format!("unknown doctor tab: {}", other)),
		}
	}
}

/// Orders shown on the given doctor tab, keeping collection order.
pub fn doctor_view(orders: &[Order], tab: DoctorTab) -> Vec<Order> {
	orders
		.iter()
		.filter(|o| tab.includes(o.status))
		.cloned()
		.collect()
}

/// Summary counts for the doctor dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DoctorStats {
	pub pending: usize,
	pub approved: usize,
	pub rejected: usize,
	pub total: usize,
}

impl DoctorStats {
	pub fn from_orders(orders: &[Order]) -> Self {
		orders.iter().fold(
			Self {
				total: orders.len(),
				..Default::default()
			},
			|mut stats, order| {
				match order.status {
					OrderStatus::Pending => stats.pending += 1,
					OrderStatus::Approved => stats.approved += 1,
					OrderStatus::Rejected => stats.rejected += 1,
					OrderStatus::InProgress | OrderStatus::Completed => {},
				}
				stats
			},
		)
	}
}

/// Tabs on the kitchen dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KitchenTab {
	/// Approved orders not yet started.
	#[default]
	New,
	InProgress,
	Completed,
	All,
}

impl fmt::Display for KitchenTab {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			KitchenTab::New => "new",
			KitchenTab::InProgress => "in-progress",
			KitchenTab::Completed => "completed",
			KitchenTab::All => "all",
		})
	}
}

impl FromStr for KitchenTab {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"new" => Ok(Self::New),
			"in-progress" => Ok(Self::InProgress),
			"completed" => Ok(Self::Completed),
			"all" => Ok(Self::All),
			other => Err(format!("unknown kitchen tab: {}", other)),
		}
	}
}

fn kitchen_visible(status: OrderStatus) -> bool {
	matches!(
		status,
		OrderStatus::Approved | OrderStatus::InProgress | OrderStatus::Completed
	)
}

/// Orders the kitchen ever sees: approved, in-progress and completed.
/// Pending and rejected orders never reach the kitchen.
pub fn kitchen_orders(orders: &[Order]) -> Vec<Order> {
	orders
		.iter()
		.filter(|o| kitchen_visible(o.status))
		.cloned()
		.collect()
}

/// Orders shown on the given kitchen tab, keeping collection order.
pub fn kitchen_view(orders: &[Order], tab: KitchenTab) -> Vec<Order> {
	let wanted = match tab {
		KitchenTab::New => Some(OrderStatus::Approved),
		KitchenTab::InProgress => Some(OrderStatus::InProgress),
		KitchenTab::Completed => Some(OrderStatus::Completed),
		KitchenTab::All => None,
	};

	orders
		.iter()
		.filter(|o| kitchen_visible(o.status))
		.filter(|o| wanted.is_none_or(|s| o.status == s))
		.cloned()
		.collect()
}

/// Summary counts for the kitchen dashboard. `total` counts only
/// kitchen-visible orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct KitchenStats {
	pub new_orders: usize,
	pub in_progress: usize,
	pub completed: usize,
	pub total: usize,
}

impl KitchenStats {
	pub fn from_orders(orders: &[Order]) -> Self {
		let mut stats = Self::default();
		for order in orders {
			match order.status {
				OrderStatus::Approved => stats.new_orders += 1,
				OrderStatus::InProgress => stats.in_progress += 1,
				OrderStatus::Completed => stats.completed += 1,
				OrderStatus::Pending | OrderStatus::Rejected => continue,
			}
			stats.total += 1;
		}
		stats
	}
}

/// Status label on the kitchen dashboard, where approved orders read "new".
pub fn kitchen_label(status: OrderStatus) -> &'static str {
	match status {
		OrderStatus::Approved => "new",
		other => other.as_str(),
	}
}
