//! Static-or-callback configuration values

use std::fmt::{self, Debug};

/// A configuration value that is either fixed or computed by a callback
///
/// Column and action flags such as `searchable`, `filterable` or `can` accept
/// either a plain value or a function. Callers branch on the variant once
/// instead of probing the value at runtime.
///
/// # Example
///
/// ```rust
/// use reinhardt_tables_types::Dynamic;
///
/// let fixed: Dynamic<bool, fn(i32) -> bool> = Dynamic::Static(true);
/// assert!(!fixed.is_callback());
/// assert!(fixed.resolve(|f| f(1)));
///
/// let computed: Dynamic<bool, fn(i32) -> bool> = Dynamic::Callback(|n| n > 2);
/// assert!(computed.is_callback());
/// assert!(!computed.resolve(|f| f(1)));
/// ```
#[derive(Clone)]
pub enum Dynamic<T, F> {
	/// A fixed value
	Static(T),
	/// A callback producing the value on demand
	Callback(F),
}

impl<T, F> Dynamic<T, F> {
	/// Returns true when the value is computed by a callback
	pub fn is_callback(&self) -> bool {
		matches!(self, Self::Callback(_))
	}

	/// Returns the callback, if any
	pub fn callback(&self) -> Option<&F> {
		match self {
			Self::Callback(callback) => Some(callback),
			Self::Static(_) => None,
		}
	}

	/// Returns the fixed value, if any
	pub fn as_static(&self) -> Option<&T> {
		match self {
			Self::Static(value) => Some(value),
			Self::Callback(_) => None,
		}
	}

	/// Resolves the value, invoking `call` for the callback variant
	pub fn resolve(&self, call: impl FnOnce(&F) -> T) -> T
	where
		T: Clone,
	{
		match self {
			Self::Static(value) => value.clone(),
			Self::Callback(callback) => call(callback),
		}
	}
}

impl<F> Dynamic<bool, F> {
	/// Whether the flag is switched on at all
	///
	/// A callback counts as enabled; it decides the details later.
	pub fn is_enabled(&self) -> bool {
		match self {
			Self::Static(value) => *value,
			Self::Callback(_) => true,
		}
	}
}

impl<T: Default, F> Default for Dynamic<T, F> {
	fn default() -> Self {
		Self::Static(T::default())
	}
}

impl<T: Debug, F> Debug for Dynamic<T, F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Static(value) => f.debug_tuple("Static").field(value).finish(),
			Self::Callback(_) => f.write_str("Callback(..)"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	type Flag = Dynamic<bool, fn() -> bool>;

	#[rstest]
	#[case(Dynamic::Static(true), true)]
	#[case(Dynamic::Static(false), false)]
	#[case(Flag::Callback(|| false), true)]
	fn test_is_enabled(#[case] flag: Flag, #[case] expected: bool) {
		assert_eq!(flag.is_enabled(), expected);
	}

	#[rstest]
	fn test_default_is_static_default() {
		let flag: Flag = Dynamic::default();
		assert_eq!(flag.as_static(), Some(&false));
		assert!(flag.callback().is_none());
	}

	#[rstest]
	fn test_debug_hides_callback() {
		let flag: Flag = Dynamic::Callback(|| true);
		assert_eq!(format!("{:?}", flag), "Callback(..)");
	}
}
