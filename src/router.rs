//! The router facade.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::callback::{Callback, Flow, NoResolver, Resolver};
use crate::collection::{RouteCollection, RouteMatch};
use crate::error::RouterResult;
use crate::feed::GroupEntry;
use crate::groups::{GroupOptions, Groups};
use crate::names::Names;
use crate::placeholders::Placeholders;
use crate::route::{ANY_METHOD, Route};

/// Request router, generic over the handler return type.
///
/// Registration goes through the verb helpers or [`Router::add_route`],
/// lookup through [`Router::find`] and execution through [`Router::run`].
/// Member-reference callbacks need a resolver installed with
/// [`Router::set_resolver`] before they can run.
///
/// # Examples
///
/// ```
/// use routage::{Callback, Router};
///
/// let mut router: Router<String> = Router::new();
/// router
///     .get("/users/(:num)", Callback::direct(|arguments: &[String]| {
///         format!("user {}", arguments[0])
///     }))
///     .name("user.show");
///
/// let body = router.run("GET", "/users/42?tab=posts").unwrap();
/// assert_eq!(body.as_deref(), Some("user 42"));
/// assert_eq!(router.reverse("user.show", &["42"]).unwrap(), "/users/42");
/// ```
pub struct Router<T> {
	collection: RouteCollection<T>,
	names: Names,
	placeholders: Arc<RwLock<Placeholders>>,
	groups: Groups,
	resolver: Arc<dyn Resolver<T>>,
	flow_resolver: Arc<dyn Resolver<Flow>>,
}

impl<T> Router<T> {
	pub fn new() -> Self {
		let placeholders = Arc::new(RwLock::new(Placeholders::new()));
		Self {
			collection: RouteCollection::new(placeholders.clone()),
			names: Names::new(),
			placeholders,
			groups: Groups::new(),
			resolver: Arc::new(NoResolver),
			flow_resolver: Arc::new(NoResolver),
		}
	}

	pub fn get(&mut self, path: &str, callback: impl Into<Callback<T>>) -> RouteHandle<'_, T> {
		self.add_route("GET", path, callback)
	}

	pub fn post(&mut self, path: &str, callback: impl Into<Callback<T>>) -> RouteHandle<'_, T> {
		self.add_route("POST", path, callback)
	}

	pub fn put(&mut self, path: &str, callback: impl Into<Callback<T>>) -> RouteHandle<'_, T> {
		self.add_route("PUT", path, callback)
	}

	pub fn delete(&mut self, path: &str, callback: impl Into<Callback<T>>) -> RouteHandle<'_, T> {
		self.add_route("DELETE", path, callback)
	}

	/// Register a route matched under every request method.
	pub fn any(&mut self, path: &str, callback: impl Into<Callback<T>>) -> RouteHandle<'_, T> {
		self.add_route(ANY_METHOD, path, callback)
	}

	/// Register a route. Open group prefixes are prepended to the path
	/// before normalization and open group middlewares are attached first.
	pub fn add_route(
		&mut self,
		method: &str,
		path: &str,
		callback: impl Into<Callback<T>>,
	) -> RouteHandle<'_, T> {
		let decorated = self.groups.decorate_prefix(path);
		let mut route = Route::new(method, &decorated, callback.into());
		for middleware in self.groups.middlewares() {
			route.add_middleware(middleware.clone());
		}

		let pattern = route.pattern().to_string();
		let method = route.method().to_string();
		self.collection.add(route);

		RouteHandle {
			router: self,
			pattern,
			method,
		}
	}

	/// Run `scope` with the group open. The group is closed again when the
	/// scope returns, also on panic.
	pub fn group(
		&mut self,
		options: impl Into<GroupOptions>,
		scope: impl FnOnce(&mut Router<T>),
	) -> &mut Self {
		self.groups.push(options.into());
		let mut guard = scopeguard::guard(&mut *self, |router| {
			router.groups.pop();
		});
		scope(&mut guard);
		drop(guard);
		self
	}

	/// Register whole groups of routes from descriptors, typically
	/// deserialized from a configuration document.
	pub fn add_routes(&mut self, groups: impl IntoIterator<Item = GroupEntry>) -> &mut Self {
		for entry in groups {
			let mut options = GroupOptions::new().prefix(entry.prefix);
			for reference in entry.middlewares {
				options = options.middleware(reference);
			}

			let routes = entry.routes;
			self.group(options, move |router| {
				for descriptor in routes {
					let mut handle = router.add_route(
						&descriptor.method,
						&descriptor.path,
						Callback::Member(descriptor.handler),
					);
					if let Some(name) = descriptor.name {
						handle = handle.name(name);
					}
					for reference in descriptor.middlewares {
						handle = handle.middleware(reference);
					}
				}
			});
		}
		self
	}

	/// Replace the fixed arguments prepended to every match.
	pub fn add_fixed_arguments(
		&mut self,
		arguments: impl IntoIterator<Item = impl Into<String>>,
	) -> &mut Self {
		self.collection
			.add_fixed_arguments(arguments.into_iter().map(Into::into).collect());
		self
	}

	/// Register a placeholder token. Takes effect for every following
	/// lookup, including on routes registered earlier.
	pub fn add_placeholder(&self, token: &str, fragment: &str) -> &Self {
		self.placeholders.write().add(token, fragment);
		self
	}

	/// Install the resolver used for member-reference callbacks, both
	/// handlers and middlewares.
	pub fn set_resolver<R>(&mut self, resolver: R) -> &mut Self
	where
		R: Resolver<T> + Resolver<Flow> + 'static,
	{
		let resolver = Arc::new(resolver);
		self.resolver = resolver.clone();
		self.flow_resolver = resolver;
		self
	}

	/// Replace the route returned when no pattern matches.
	pub fn set_not_found(&mut self, callback: impl Into<Callback<T>>) -> &mut Self {
		self.collection.set_not_found(callback.into());
		self
	}

	/// Replace the route returned when a pattern matches under another
	/// method only.
	pub fn set_method_not_allowed(&mut self, callback: impl Into<Callback<T>>) -> &mut Self {
		self.collection.set_method_not_allowed(callback.into());
		self
	}

	/// Resolve a request to a route.
	///
	/// The method is uppercased and the path is normalized the same way
	/// patterns are: the query string is cut at the first `?`, surrounding
	/// slashes and spaces are stripped and a leading slash is prepended.
	pub fn find(&self, method: &str, path: &str) -> RouteMatch<'_, T> {
		let method = method.to_ascii_uppercase();
		let stripped = match path.find('?') {
			Some(at) => &path[..at],
			None => path,
		};
		let path = format!("/{}", stripped.trim_matches(['/', ' ']));
		self.collection.find(&method, &path)
	}

	/// Run a match: middlewares first, then the route callback.
	///
	/// Middlewares run in order with the match arguments; an aborting
	/// middleware stops the chain and yields `Ok(None)` without running the
	/// callback. Member references are resolved freshly on every dispatch.
	/// A route whose callback is [`Callback::Noop`] also yields `Ok(None)`,
	/// which is how unconfigured fallbacks report a miss.
	pub fn dispatch(&self, matched: &RouteMatch<'_, T>) -> RouterResult<Option<T>> {
		let arguments = matched.arguments.as_slice();

		for middleware in matched.route.middlewares() {
			let outcome = match middleware {
				Callback::Direct(handler) => handler.handle(arguments),
				Callback::Member(reference) => {
					self.flow_resolver.resolve(reference)?.handle(arguments)
				}
				Callback::Noop => Flow::Continue,
			};
			if outcome.is_abort() {
				tracing::debug!(
					pattern = %matched.route.pattern(),
					"middleware aborted the dispatch"
				);
				return Ok(None);
			}
		}

		match matched.route.callback() {
			Callback::Direct(handler) => Ok(Some(handler.handle(arguments))),
			Callback::Member(reference) => {
				Ok(Some(self.resolver.resolve(reference)?.handle(arguments)))
			}
			Callback::Noop => Ok(None),
		}
	}

	/// [`Router::find`] and [`Router::dispatch`] in one call.
	pub fn run(&self, method: &str, path: &str) -> RouterResult<Option<T>> {
		let matched = self.find(method, path);
		self.dispatch(&matched)
	}

	/// Rebuild a concrete path for a named route.
	pub fn reverse(&self, name: &str, arguments: &[&str]) -> RouterResult<String> {
		let placeholders = self.placeholders.read();
		self.names.reverse(name, arguments, &placeholders)
	}

	/// All registered route names and their raw patterns.
	pub fn route_names(&self) -> &HashMap<String, String> {
		self.names.all()
	}
}

impl<T> Default for Router<T> {
	fn default() -> Self {
		Self::new()
	}
}

/// Fluent handle to the route that was just registered.
pub struct RouteHandle<'a, T> {
	router: &'a mut Router<T>,
	pattern: String,
	method: String,
}

impl<T> RouteHandle<'_, T> {
	/// Register a name for the route, under its normalized pattern.
	pub fn name(self, name: impl Into<String>) -> Self {
		self.router.names.add(name, self.pattern.clone());
		self
	}

	/// Append a middleware to the route.
	pub fn middleware(self, middleware: impl Into<Callback<Flow>>) -> Self {
		if let Some(route) = self.router.collection.get_mut(&self.pattern, &self.method) {
			route.add_middleware(middleware);
		}
		self
	}

	/// The normalized pattern the route is stored under.
	pub fn pattern(&self) -> &str {
		&self.pattern
	}
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::{AtomicBool, Ordering};

	use super::*;
	use crate::callback::{Handler, MemberRef};
	use crate::collection::MatchKind;
	use crate::error::RouterError;

	struct TestResolver;

	impl Resolver<&'static str> for TestResolver {
		fn resolve(&self, reference: &MemberRef) -> RouterResult<Arc<dyn Handler<&'static str>>> {
			match reference.method.as_str() {
				"home" => Ok(Arc::new(|_: &[String]| "home")),
				_ => Err(RouterError::Unresolved {
					target: reference.target.clone(),
					method: reference.method.clone(),
				}),
			}
		}
	}

	impl Resolver<Flow> for TestResolver {
		fn resolve(&self, reference: &MemberRef) -> RouterResult<Arc<dyn Handler<Flow>>> {
			match reference.method.as_str() {
				"allow" => Ok(Arc::new(|_: &[String]| Flow::Continue)),
				"deny" => Ok(Arc::new(|_: &[String]| Flow::Abort)),
				_ => Err(RouterError::Unresolved {
					target: reference.target.clone(),
					method: reference.method.clone(),
				}),
			}
		}
	}

	#[test]
	fn test_run_invokes_direct_handler() {
		let mut router: Router<&'static str> = Router::new();
		router.get("/about", Callback::direct(|_: &[String]| "about page"));

		assert_eq!(router.run("GET", "/about"), Ok(Some("about page")));
	}

	#[test]
	fn test_find_normalizes_method_and_path() {
		let mut router: Router<&'static str> = Router::new();
		router.get("/users/(:num)", Callback::direct(|_: &[String]| "user"));

		let matched = router.find("get", "users/42/?page=2");
		assert_eq!(matched.kind, MatchKind::Found);
		assert_eq!(matched.arguments, ["42"]);
	}

	#[test]
	fn test_middleware_abort_skips_handler() {
		let reached = Arc::new(AtomicBool::new(false));
		let seen = reached.clone();

		let mut router: Router<&'static str> = Router::new();
		router
			.get(
				"/private",
				Callback::direct(move |_: &[String]| {
					seen.store(true, Ordering::SeqCst);
					"secret"
				}),
			)
			.middleware(Callback::direct(|_: &[String]| Flow::Abort));

		assert_eq!(router.run("GET", "/private"), Ok(None));
		assert!(!reached.load(Ordering::SeqCst));
	}

	#[test]
	fn test_member_callback_without_resolver_errors() {
		let mut router: Router<&'static str> = Router::new();
		router.get("/home", ("PageController", "home"));

		assert_eq!(
			router.run("GET", "/home"),
			Err(RouterError::Unresolved {
				target: "PageController".to_string(),
				method: "home".to_string(),
			})
		);
	}

	#[test]
	fn test_resolver_serves_members_and_middlewares() {
		let mut router: Router<&'static str> = Router::new();
		router.set_resolver(TestResolver);
		router
			.get("/home", ("PageController", "home"))
			.middleware(("Gate", "allow"));
		router
			.get("/blocked", ("PageController", "home"))
			.middleware(("Gate", "deny"));

		assert_eq!(router.run("GET", "/home"), Ok(Some("home")));
		assert_eq!(router.run("GET", "/blocked"), Ok(None));
	}

	#[test]
	fn test_group_prefix_and_middleware_apply() {
		let mut router: Router<&'static str> = Router::new();
		router.set_resolver(TestResolver);
		router.group(GroupOptions::from("/api").middleware(("Gate", "deny")), |router| {
			router.get("/users", Callback::direct(|_: &[String]| "users"));
		});
		router.get("/users", Callback::direct(|_: &[String]| "bare users"));

		assert_eq!(router.run("GET", "/api/users"), Ok(None));
		assert_eq!(router.run("GET", "/users"), Ok(Some("bare users")));
	}

	#[test]
	fn test_group_closes_after_scope() {
		let mut router: Router<&'static str> = Router::new();
		router.group("/api", |router| {
			router.get("/inside", Callback::direct(|_: &[String]| "in"));
		});
		router.get("/outside", Callback::direct(|_: &[String]| "out"));

		assert_eq!(router.run("GET", "/api/inside"), Ok(Some("in")));
		assert_eq!(router.run("GET", "/outside"), Ok(Some("out")));
		assert_eq!(router.find("GET", "/api/outside").kind, MatchKind::NotFound);
	}

	#[test]
	fn test_route_handle_names_normalized_pattern() {
		let mut router: Router<&'static str> = Router::new();
		router
			.get("users/(:num)/", Callback::direct(|_: &[String]| "user"))
			.name("user.show");

		assert_eq!(router.reverse("user.show", &["7"]), Ok("/users/7".to_string()));
		assert_eq!(
			router.route_names().get("user.show").map(String::as_str),
			Some("/users/(:num)")
		);
	}

	#[test]
	fn test_unconfigured_fallback_yields_none() {
		let router: Router<&'static str> = Router::new();
		assert_eq!(router.run("GET", "/missing"), Ok(None));
	}

	#[test]
	fn test_configured_fallback_runs_with_fixed_arguments() {
		let mut router: Router<&'static str> = Router::new();
		router.add_fixed_arguments(["app"]);
		router.set_not_found(Callback::direct(|arguments: &[String]| {
			assert_eq!(arguments, ["app"]);
			"custom 404"
		}));

		assert_eq!(router.run("GET", "/missing"), Ok(Some("custom 404")));
	}

	#[test]
	fn test_late_placeholder_applies_to_earlier_route() {
		let mut router: Router<&'static str> = Router::new();
		router.get("/tags/(:slug)", Callback::direct(|_: &[String]| "tag"));
		assert_eq!(router.find("GET", "/tags/rust-lang").kind, MatchKind::NotFound);

		router.add_placeholder("(:slug)", "([a-z0-9-]+)");
		let matched = router.find("GET", "/tags/rust-lang");
		assert_eq!(matched.kind, MatchKind::Found);
		assert_eq!(matched.arguments, ["rust-lang"]);
	}
}
