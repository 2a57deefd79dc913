//! Weekly menu lookup.
//!
//! The menu is a collaborator of the order workflow rather than part of it:
//! given a day of the week and a meal time it returns the dishes a patient
//! may pick from.

use chrono::{Datelike, Weekday};
use meal_types::MealTime;

/// Source of the dishes offered for a day and meal time.
pub trait MenuProvider: Send + Sync {
	/// Dishes offered, in display order. Empty when nothing is served.
	fn items(&self, day: Weekday, meal: MealTime) -> Vec<String>;

	/// Returns the menu's spelling of `item` if it is offered, matching
	/// case-insensitively.
	fn find(&self, day: Weekday, meal: MealTime, item: &str) -> Option<String> {
		let wanted = item.trim();
		self.items(day, meal)
			.into_iter()
			.find(|offered| offered.eq_ignore_ascii_case(wanted))
	}
}

/// The facility's fixed weekly timetable.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeeklyMenu;

impl WeeklyMenu {
	fn dishes(day: Weekday, meal: MealTime) -> &'static [&'static str] {
		use MealTime::*;
		use Weekday::*;

		match (day, meal) {
			(Mon, Breakfast) => &["MOI MOI AND PAP"],
			(Mon, Lunch) => &["FRIED - RICE"],
			(Mon, Dinner) => &["AMALA, EWEDU AND GBEGIRI"],

			(Tue, Breakfast) => &[
				"TEA BREAD AND SCRAMBLED EGG",
				"IRISH POTATOES AND FISH SAUCE",
				"AMALA AND PAP",
			],
			(Tue, Lunch) => &["COCONUT RICE", "JOLLOF RICE", "VEGETABLE RICE"],
			(Tue, Dinner) => &[
				"POUNDO AND VEGETABLE SOUP",
				"PLANTAIN FLOUR AND OGBONO",
				"WHEAT AND VEGETABLE OKRO",
			],

			(Wed, Breakfast) => &["CHICKEN SANDWICH AND COCOYAM"],
			(Wed, Lunch) => &["GROUND - RICE AND EGUSI"],
			(Wed, Dinner) => &["WHITE RICE AND STEW"],

			(Thu, Breakfast) => &[
				"YAM AND GARDEN EGG SAUCE",
				"SWEET POTATOES AND EGG SAUCE",
				"OAT AND MOI MOI",
			],
			(Thu, Lunch) => &[
				"SEMO AND BITTERLEAF SOUP",
				"PINEAPPLE RICE",
				"PLAIN RICE AND STIR-FRIED VEGGIES",
			],
			(Thu, Dinner) => &[
				"WHITE RICE AND LEAFY VEG. SAUCE",
				"OAT SWALLOW AND EFORIRO",
				"AMALA AND EWEDU",
			],

			(Fri, Breakfast) => &["VEGETABLE EGG SAUCE AND COCOYAM", "OAT AND MOI MOI"],
			(Fri, Lunch) => &["EBA AND EGUSI", "SEMO AND EDIKANKONG"],
			(Fri, Dinner) => &["JOLLOF RICE AND STIR-FRIED VEGGIES", "JAMBALAYA RICE"],

			(Sat, Breakfast) => &["GREEN TEA, BOILED EGG AND BREAD"],
			(Sat, Lunch) => &["JOLLOF RICE AND BEANS"],
			(Sat, Dinner) => &["POUNDO AND VEGETABLE OKRO"],

			(Sun, Breakfast) => &["BOILED PLANTAIN AND VEGETABLE EGG SAUCE", "PAP AND AKARA"],
			(Sun, Lunch) => &["PLAIN RICE, STEW AND BEANS", "OFADA RICE AND STEW"],
			(Sun, Dinner) => &[
				"OAT SWALLOW AND BITTERLEAF SOUP",
				"AMALA EWEDU AND GBEGIRI",
				"EBA AND OGBONO",
			],
		}
	}
}

impl MenuProvider for WeeklyMenu {
	fn items(&self, day: Weekday, meal: MealTime) -> Vec<String> {
		Self::dishes(day, meal)
			.iter()
			.map(|s| s.to_string())
			.collect()
	}
}

/// Day of the week in local time, which decides the menu on offer.
pub fn today() -> Weekday {
	chrono::Local::now().weekday()
}
