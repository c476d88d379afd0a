//! Named-route index and reversal.
//!
//! Names map to the raw pattern text as registered, before regexification.
//! Reversal rebuilds a concrete path by walking the pattern's `/`-separated
//! segments: recognized placeholder segments consume the next positional
//! argument (validated against the placeholder's fragment), everything else
//! passes through literally.

use std::collections::HashMap;

use crate::error::{RouterError, RouterResult};
use crate::placeholders::Placeholders;

/// Name → raw pattern index.
///
/// # Examples
///
/// ```
/// use routage::{Names, Placeholders};
///
/// let placeholders = Placeholders::new();
/// let mut names = Names::new();
/// names.add("user.show", "/users/(:num)");
///
/// let path = names.reverse("user.show", &["42"], &placeholders).unwrap();
/// assert_eq!(path, "/users/42");
/// ```
pub struct Names {
	names: HashMap<String, String>,
}

impl Names {
	/// Create an empty index.
	pub fn new() -> Self {
		Self {
			names: HashMap::new(),
		}
	}

	/// Register a name for a raw pattern. Re-adding a name overwrites silently.
	pub fn add(&mut self, name: impl Into<String>, pattern: impl Into<String>) -> &mut Self {
		self.names.insert(name.into(), pattern.into());
		self
	}

	/// Whether a name is registered.
	pub fn has(&self, name: &str) -> bool {
		self.names.contains_key(name)
	}

	/// Rebuild a concrete path for a named route.
	///
	/// Arguments are consumed strictly left-to-right, one per placeholder
	/// segment; surplus arguments are ignored. Errors: [`RouterError::UnknownName`]
	/// for an unregistered name, [`RouterError::MissingArgument`] when a
	/// placeholder segment has no argument left, [`RouterError::InvalidArgument`]
	/// when an argument fails its placeholder's pattern.
	pub fn reverse(
		&self,
		name: &str,
		arguments: &[&str],
		placeholders: &Placeholders,
	) -> RouterResult<String> {
		let Some(pattern) = self.names.get(name) else {
			return Err(RouterError::UnknownName(name.to_string()));
		};

		let mut remaining = arguments.iter();
		let mut segments = Vec::new();
		for slug in pattern.split('/') {
			if placeholders.has(slug) {
				let Some(argument) = remaining.next() else {
					return Err(RouterError::MissingArgument(name.to_string()));
				};
				if !placeholders.compare(slug, argument) {
					return Err(RouterError::InvalidArgument(name.to_string()));
				}
				segments.push(*argument);
			} else {
				segments.push(slug);
			}
		}

		Ok(segments.join("/"))
	}

	/// Read-only snapshot of all registered names.
	pub fn all(&self) -> &HashMap<String, String> {
		&self.names
	}
}

impl Default for Names {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn seeded() -> (Names, Placeholders) {
		let mut names = Names::new();
		names.add("user.show", "/users/(:num)");
		names.add("page", "/pages/about");
		(names, Placeholders::new())
	}

	#[test]
	fn test_reverse_substitutes_arguments() {
		let (names, placeholders) = seeded();
		let path = names.reverse("user.show", &["42"], &placeholders);
		assert_eq!(path, Ok("/users/42".to_string()));
	}

	#[test]
	fn test_reverse_literal_pattern_needs_no_arguments() {
		let (names, placeholders) = seeded();
		let path = names.reverse("page", &[], &placeholders);
		assert_eq!(path, Ok("/pages/about".to_string()));
	}

	#[test]
	fn test_reverse_unknown_name() {
		let (names, placeholders) = seeded();
		assert_eq!(
			names.reverse("missing.name", &[], &placeholders),
			Err(RouterError::UnknownName("missing.name".to_string()))
		);
	}

	#[test]
	fn test_reverse_missing_argument() {
		let (names, placeholders) = seeded();
		assert_eq!(
			names.reverse("user.show", &[], &placeholders),
			Err(RouterError::MissingArgument("user.show".to_string()))
		);
	}

	#[test]
	fn test_reverse_invalid_argument() {
		let (names, placeholders) = seeded();
		assert_eq!(
			names.reverse("user.show", &["abc"], &placeholders),
			Err(RouterError::InvalidArgument("user.show".to_string()))
		);
	}

	#[test]
	fn test_reverse_ignores_surplus_arguments() {
		let (names, placeholders) = seeded();
		let path = names.reverse("user.show", &["42", "extra"], &placeholders);
		assert_eq!(path, Ok("/users/42".to_string()));
	}

	#[test]
	fn test_last_write_wins() {
		let (mut names, placeholders) = seeded();
		names.add("user.show", "/members/(:num)");
		let path = names.reverse("user.show", &["7"], &placeholders);
		assert_eq!(path, Ok("/members/7".to_string()));
	}
}
