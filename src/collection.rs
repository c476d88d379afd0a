//! Route storage and the match scan.
//!
//! Routes are stored per pattern in registration order. A pattern registered
//! again keeps its original scan position; registering the same pattern and
//! method twice silently replaces the earlier route.
//!
//! [`RouteCollection::find`] is total: every request resolves to a
//! [`RouteMatch`], falling back to the collection's not-found or
//! method-not-allowed route when nothing matches.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use regex::RegexBuilder;

use crate::callback::Callback;
use crate::placeholders::Placeholders;
use crate::route::{ANY_METHOD, Route};

const MAX_MATCH_REGEX_SIZE: usize = 1 << 20;

/// How a request was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
	/// A registered route matched.
	Found,
	/// No pattern matched; the not-found fallback was returned.
	NotFound,
	/// A pattern matched but not for this method; the method-not-allowed
	/// fallback was returned.
	MethodNotAllowed,
}

/// Result of one lookup: the route to run, the arguments for its callback
/// and how the route was chosen.
///
/// Arguments always start with the collection's fixed arguments, followed by
/// the pattern's captures when the route was found by scan. Fallback routes
/// receive the fixed arguments too.
pub struct RouteMatch<'a, T> {
	pub route: &'a Route<T>,
	pub arguments: Vec<String>,
	pub kind: MatchKind,
}

impl<T> RouteMatch<'_, T> {
	pub fn is_found(&self) -> bool {
		self.kind == MatchKind::Found
	}
}

impl<T> fmt::Debug for RouteMatch<'_, T> {
	fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
		formatter
			.debug_struct("RouteMatch")
			.field("route", &self.route)
			.field("arguments", &self.arguments)
			.field("kind", &self.kind)
			.finish()
	}
}

struct Slot<T> {
	pattern: String,
	methods: HashMap<String, Route<T>>,
}

/// Ordered route table with shared access to the placeholder registry.
pub struct RouteCollection<T> {
	slots: Vec<Slot<T>>,
	index: HashMap<String, usize>,
	fixed_arguments: Vec<String>,
	placeholders: Arc<RwLock<Placeholders>>,
	not_found: Route<T>,
	method_not_allowed: Route<T>,
}

impl<T> RouteCollection<T> {
	pub fn new(placeholders: Arc<RwLock<Placeholders>>) -> Self {
		Self {
			slots: Vec::new(),
			index: HashMap::new(),
			fixed_arguments: Vec::new(),
			placeholders,
			not_found: Route::fallback(Callback::Noop),
			method_not_allowed: Route::fallback(Callback::Noop),
		}
	}

	/// Store a route under its pattern and method.
	pub fn add(&mut self, route: Route<T>) -> &mut Self {
		let pattern = route.pattern().to_string();
		let method = route.method().to_string();

		let at = match self.index.get(&pattern) {
			Some(&at) => at,
			None => {
				let at = self.slots.len();
				self.slots.push(Slot {
					pattern: pattern.clone(),
					methods: HashMap::new(),
				});
				self.index.insert(pattern, at);
				at
			}
		};
		self.slots[at].methods.insert(method, route);

		self
	}

	pub(crate) fn get_mut(&mut self, pattern: &str, method: &str) -> Option<&mut Route<T>> {
		let &at = self.index.get(pattern)?;
		self.slots[at].methods.get_mut(method)
	}

	/// Replace the fixed arguments prepended to every match.
	pub fn add_fixed_arguments(&mut self, arguments: Vec<String>) -> &mut Self {
		self.fixed_arguments = arguments;
		self
	}

	/// Replace the route returned when no pattern matches.
	pub fn set_not_found(&mut self, callback: Callback<T>) -> &mut Self {
		self.not_found = Route::fallback(callback);
		self
	}

	/// Replace the route returned when a pattern matches under another method.
	pub fn set_method_not_allowed(&mut self, callback: Callback<T>) -> &mut Self {
		self.method_not_allowed = Route::fallback(callback);
		self
	}

	/// Resolve a normalized method and path to a route.
	///
	/// Lookup runs in three steps. First a fast path: a route stored under
	/// exactly this path text and method wins without touching any regex;
	/// the wildcard method is not consulted here. Then the scan: every
	/// pattern is regexified against the live placeholder registry in
	/// registration order, and the first match returns its route for the
	/// request method, or failing that for the wildcard method. A pattern
	/// that matched only under other methods sets a flag and the scan goes
	/// on, so a later pattern with the right method still wins. Finally the
	/// fallbacks: the flag decides between the method-not-allowed and the
	/// not-found route.
	pub fn find(&self, method: &str, path: &str) -> RouteMatch<'_, T> {
		if let Some(route) = self.lookup(path, method) {
			return RouteMatch {
				route,
				arguments: self.fixed_arguments.clone(),
				kind: MatchKind::Found,
			};
		}

		let placeholders = self.placeholders.read();
		let mut wrong_method = false;

		for slot in &self.slots {
			let Some(regex) = self.compile(&placeholders, &slot.pattern) else {
				continue;
			};
			let Some(captures) = regex.captures(path) else {
				continue;
			};

			let route = slot
				.methods
				.get(method)
				.or_else(|| slot.methods.get(ANY_METHOD));
			match route {
				Some(route) => {
					let mut arguments = self.fixed_arguments.clone();
					arguments.extend(
						captures
							.iter()
							.skip(1)
							.flatten()
							.map(|capture| capture.as_str().to_string()),
					);
					return RouteMatch {
						route,
						arguments,
						kind: MatchKind::Found,
					};
				}
				None => wrong_method = true,
			}
		}

		let (route, kind) = if wrong_method {
			(&self.method_not_allowed, MatchKind::MethodNotAllowed)
		} else {
			(&self.not_found, MatchKind::NotFound)
		};
		RouteMatch {
			route,
			arguments: self.fixed_arguments.clone(),
			kind,
		}
	}

	fn lookup(&self, pattern: &str, method: &str) -> Option<&Route<T>> {
		let &at = self.index.get(pattern)?;
		self.slots[at].methods.get(method)
	}

	fn compile(&self, placeholders: &Placeholders, pattern: &str) -> Option<regex::Regex> {
		let source = placeholders.regexify(pattern);
		match RegexBuilder::new(&format!("^{source}$"))
			.size_limit(MAX_MATCH_REGEX_SIZE)
			.build()
		{
			Ok(regex) => Some(regex),
			Err(error) => {
				tracing::warn!(pattern = %pattern, error = %error, "skipping route with unusable pattern");
				None
			}
		}
	}
}
