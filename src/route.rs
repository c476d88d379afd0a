//! A single registered route.

use std::fmt;

use crate::callback::{Callback, Flow};

/// Wildcard method token matched by every request method during the
/// pattern scan.
pub const ANY_METHOD: &str = "ANY";

/// One registered route: a method, a normalized pattern, the callback to
/// run on a hit and the middlewares that run before it.
///
/// Patterns are normalized at construction: surrounding slashes and spaces
/// are stripped and a single leading slash is prepended, so `"users/"`,
/// `"/users"` and `"  users  "` all store as `/users`. The method is
/// uppercased, which also folds `"any"` into the [`ANY_METHOD`] wildcard.
pub struct Route<T> {
	method: String,
	pattern: String,
	callback: Callback<T>,
	middlewares: Vec<Callback<Flow>>,
}

impl<T> Route<T> {
	pub fn new(method: &str, pattern: &str, callback: Callback<T>) -> Self {
		Self {
			method: method.to_ascii_uppercase(),
			pattern: format!("/{}", pattern.trim_matches(['/', ' '])),
			callback,
			middlewares: Vec::new(),
		}
	}

	/// A route that is never matched by pattern, only handed out directly
	/// as a fallback. The empty pattern cannot collide with registered
	/// patterns since those always start with a slash.
	pub(crate) fn fallback(callback: Callback<T>) -> Self {
		Self {
			method: ANY_METHOD.to_string(),
			pattern: String::new(),
			callback,
			middlewares: Vec::new(),
		}
	}

	pub fn method(&self) -> &str {
		&self.method
	}

	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	pub fn callback(&self) -> &Callback<T> {
		&self.callback
	}

	/// Middlewares in the order they run.
	pub fn middlewares(&self) -> &[Callback<Flow>] {
		&self.middlewares
	}

	/// Append a middleware. Group middlewares are added at registration
	/// time, so they come before any added through this.
	pub fn add_middleware(&mut self, middleware: impl Into<Callback<Flow>>) -> &mut Self {
		self.middlewares.push(middleware.into());
		self
	}
}

impl<T> Clone for Route<T> {
	fn clone(&self) -> Self {
		Self {
			method: self.method.clone(),
			pattern: self.pattern.clone(),
			callback: self.callback.clone(),
			middlewares: self.middlewares.clone(),
		}
	}
}

impl<T> fmt::Debug for Route<T> {
	fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
		formatter
			.debug_struct("Route")
			.field("method", &self.method)
			.field("pattern", &self.pattern)
			.field("callback", &self.callback)
			.field("middlewares", &self.middlewares.len())
			.finish()
	}
}
