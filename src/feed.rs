//! Bulk route registration descriptors.
//!
//! A feed is a list of [`GroupEntry`] values, each opening one group and
//! registering its routes. The shapes derive [`serde::Deserialize`] so a
//! whole route table can be loaded from a configuration document and handed
//! to [`Router::add_routes`](crate::Router::add_routes). Handlers and
//! middlewares are member references, resolved at dispatch time.

use serde::Deserialize;

use crate::callback::MemberRef;

/// One group of routes sharing a prefix and middlewares.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupEntry {
	/// Path prefix prepended to every route in the group. Empty means none.
	#[serde(default)]
	pub prefix: String,
	/// Middlewares applied to every route in the group.
	#[serde(default)]
	pub middlewares: Vec<MemberRef>,
	#[serde(default)]
	pub routes: Vec<RouteEntry>,
}

/// One route inside a [`GroupEntry`].
#[derive(Debug, Clone, Deserialize)]
pub struct RouteEntry {
	/// Request method, `GET` when omitted.
	#[serde(default = "default_method")]
	pub method: String,
	#[serde(default)]
	pub path: String,
	pub handler: MemberRef,
	/// Optional name registered for reversal.
	#[serde(default)]
	pub name: Option<String>,
	/// Middlewares for this route alone, run after the group's.
	#[serde(default)]
	pub middlewares: Vec<MemberRef>,
}

fn default_method() -> String {
	"GET".to_string()
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn test_route_entry_fills_defaults() {
		let entry: RouteEntry = serde_json::from_value(json!({
			"path": "/users",
			"handler": ["UserController", "index"],
		}))
		.unwrap();

		assert_eq!(entry.method, "GET");
		assert_eq!(entry.path, "/users");
		assert_eq!(entry.handler, MemberRef::new("UserController", "index"));
		assert_eq!(entry.name, None);
		assert!(entry.middlewares.is_empty());
	}

	#[test]
	fn test_group_entry_parses_nested_routes() {
		let entry: GroupEntry = serde_json::from_value(json!({
			"prefix": "/api",
			"middlewares": [["Auth", "check"]],
			"routes": [
				{
					"method": "post",
					"path": "/users",
					"handler": ["UserController", "create"],
					"name": "user.create",
				},
			],
		}))
		.unwrap();

		assert_eq!(entry.prefix, "/api");
		assert_eq!(entry.middlewares, [MemberRef::new("Auth", "check")]);
		assert_eq!(entry.routes.len(), 1);
		assert_eq!(entry.routes[0].name.as_deref(), Some("user.create"));
	}

	#[test]
	fn test_group_entry_without_prefix() {
		let entry: GroupEntry = serde_json::from_value(json!({
			"routes": [],
		}))
		.unwrap();

		assert_eq!(entry.prefix, "");
		assert!(entry.routes.is_empty());
	}
}
