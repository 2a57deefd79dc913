//! Registry trait for self-registering implementations.
//!
//! Pluggable components (currently the storage backends) implement this so
//! they can be looked up by the name used in the configuration file.

/// Base trait for implementation registries.
///
/// Each implementation module provides a `Registry` struct that declares
/// its configuration name and hands out its factory function.
pub trait ImplementationRegistry {
	/// The name used in configuration files to reference this implementation,
	/// e.g. "file" for `[storage.implementations.file]`.
	const NAME: &'static str;

	/// The factory function type this implementation provides.
	type Factory;

	/// Get the factory function for this implementation.
	fn factory() -> Self::Factory;
}
