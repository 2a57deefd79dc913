//! Meal order types for the ward ordering system.
//!
//! This module defines the persisted order record, the draft submitted by a
//! patient, the lifecycle status and the meal times a patient can order for.
//! Field names and status spellings match the persisted JSON layout exactly,
//! so collections written by other clients can be read back unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A single patient's meal request and its current review/preparation status.
///
/// Only `status` changes after creation; every other field is fixed when
/// the order is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
	/// Unique, opaque identifier assigned at creation.
	pub id: String,
	/// Name of the patient the meal is for.
	pub patient_name: String,
	/// Room the meal should be delivered to.
	pub room_number: String,
	/// Bed within the room, if given.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub bed: Option<String>,
	/// Meal time as submitted, normally one of `breakfast`, `lunch`, `dinner`.
	pub meal_time: String,
	/// Menu items in the order the patient picked them.
	pub menu_items: Vec<String>,
	/// Free-text notes for the kitchen.
	#[serde(default)]
	pub special_instructions: String,
	/// Current lifecycle status.
	pub status: OrderStatus,
	/// Creation time in epoch milliseconds.
	pub created_at: i64,
}

/// Caller-supplied fields for a new order.
///
/// The store assigns `id` and `createdAt` and defaults `status` to
/// [`OrderStatus::Pending`] unless an override is given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
	pub patient_name: String,
	pub room_number: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub bed: Option<String>,
	pub meal_time: String,
	pub menu_items: Vec<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub special_instructions: Option<String>,
	/// Status override, used only for seeding and tests.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status: Option<OrderStatus>,
}

/// Reasons a draft is refused at submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
	#[error("Patient name is required")]
	MissingPatientName,
	#[error("Room number is required")]
	MissingRoomNumber,
	#[error("At least one menu item must be selected")]
	NoMenuItems,
	#[error("Unknown meal time: {0}")]
	InvalidMealTime(String),
}

impl OrderDraft {
	/// Checks the fields a patient must fill in before an order is accepted
	/// and returns the parsed meal time.
	///
	/// The store itself never calls this; it is the submission flow's job.
	pub fn validate(&self) -> Result<MealTime, DraftError> {
		if self.patient_name.trim().is_empty() {
			return Err(DraftError::MissingPatientName);
		}
		if self.room_number.trim().is_empty() {
			return Err(DraftError::MissingRoomNumber);
		}
		if self.menu_items.is_empty() {
			return Err(DraftError::NoMenuItems);
		}
		self.meal_time
			.parse::<MealTime>()
			.map_err(|_| DraftError::InvalidMealTime(self.meal_time.clone()))
	}

	/// Turns the draft into a stored record with the given identity.
	pub fn into_order(self, id: String, created_at: i64) -> Order {
		Order {
			id,
			patient_name: self.patient_name,
			room_number: self.room_number,
			bed: self.bed,
			meal_time: self.meal_time,
			menu_items: self.menu_items,
			special_instructions: self.special_instructions.unwrap_or_default(),
			status: self.status.unwrap_or(OrderStatus::Pending),
			created_at,
		}
	}
}

/// Lifecycle status of an order.
///
/// `pending` -> `approved` | `rejected`; `approved` -> `in-progress` -> `completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
	/// Submitted by the patient, awaiting doctor review.
	Pending,
	/// Approved by a doctor; shown to the kitchen as "new".
	Approved,
	/// Rejected by a doctor.
	Rejected,
	/// Being prepared by the kitchen.
	InProgress,
	/// Prepared and served.
	Completed,
}

impl OrderStatus {
	/// Returns the persisted spelling of the status.
	pub fn as_str(&self) -> &'static str {
		match self {
			OrderStatus::Pending => "pending",
			OrderStatus::Approved => "approved",
			OrderStatus::Rejected => "rejected",
			OrderStatus::InProgress => "in-progress",
			OrderStatus::Completed => "completed",
		}
	}

	/// Returns an iterator over all statuses in lifecycle order.
	pub fn all() -> impl Iterator<Item = Self> {
		[
			Self::Pending,
			Self::Approved,
			Self::Rejected,
			Self::InProgress,
			Self::Completed,
		]
		.into_iter()
	}

	/// Statuses an order may move to from this one.
	pub fn allowed_next(&self) -> &'static [OrderStatus] {
		match self {
			OrderStatus::Pending => &[OrderStatus::Approved, OrderStatus::Rejected],
			OrderStatus::Approved => &[OrderStatus::InProgress],
			OrderStatus::InProgress => &[OrderStatus::Completed],
			OrderStatus::Rejected | OrderStatus::Completed => &[],
		}
	}

	/// True for statuses with no outgoing transitions.
	pub fn is_terminal(&self) -> bool {
		self.allowed_next().is_empty()
	}
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for OrderStatus {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"pending" => Ok(Self::Pending),
			"approved" => Ok(Self::Approved),
			"rejected" => Ok(Self::Rejected),
			"in-progress" => Ok(Self::InProgress),
			"completed" => Ok(Self::Completed),
			other => Err(format!("unknown order status: {}", other)),
		}
	}
}

/// Meal times a patient can order for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealTime {
	Breakfast,
	Lunch,
	Dinner,
}

impl MealTime {
	pub fn as_str(&self) -> &'static str {
		match self {
			MealTime::Breakfast => "breakfast",
			MealTime::Lunch => "lunch",
			MealTime::Dinner => "dinner",
		}
	}

	pub fn all() -> impl Iterator<Item = Self> {
		[Self::Breakfast, Self::Lunch, Self::Dinner].into_iter()
	}
}

impl fmt::Display for MealTime {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for MealTime {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"breakfast" => Ok(Self::Breakfast),
			"lunch" => Ok(Self::Lunch),
			"dinner" => Ok(Self::Dinner),
			other => Err(format!("unknown meal time: {}", other)),
		}
	}
}
