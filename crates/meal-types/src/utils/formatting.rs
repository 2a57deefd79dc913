//! String formatting utilities.

/// Short, upper-cased prefix of an order id for confirmations and listings.
///
/// Shows only the first 8 characters; shorter ids are returned whole.
pub fn short_id(id: &str) -> String {
	id.chars().take(8).collect::<String>().to_uppercase()
}

/// Formats an epoch-millisecond timestamp as `YYYY-MM-DD HH:MM` in the
/// local time zone.
///
/// Out-of-range values are rendered as the raw number.
pub fn format_timestamp_ms(ms: i64) -> String {
	chrono::DateTime::from_timestamp_millis(ms)
		.map(|dt| {
			dt.with_timezone(&chrono::Local)
				.format("%Y-%m-%d %H:%M")
				.to_string()
		})
		.unwrap_or_else(|| ms.to_string())
}
