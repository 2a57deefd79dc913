//! Storage-related types for the meal ordering system.

/// Identifier of the single entry holding the whole order collection.
///
/// Kept identical to the key used by earlier clients so existing data is
/// picked up.
pub const ORDER_COLLECTION_ID: &str = "rhv_orders";

/// Storage namespaces for different data collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
	/// Namespace holding the order collection.
	Orders,
}

impl StorageKey {
	/// Returns the string representation of the storage key.
	pub fn as_str(&self) -> &'static str {
		match self {
			StorageKey::Orders => "orders",
		}
	}

}
