//! Request routing with ordered pattern matching and reversible names.
//!
//! Routes pair a request method with a path pattern. Patterns are plain
//! path text plus placeholder tokens such as `(:num)` or `(:any)` that
//! match one segment and capture it as an argument for the handler.
//! Matching walks routes in registration order, with an exact-text fast
//! path in front, and always resolves: requests nothing matches fall back
//! to a not-found route, requests only other methods match fall back to a
//! method-not-allowed route.
//!
//! Handlers are either closures, given directly, or member references
//! (a target name and a method name) resolved at dispatch time through a
//! [`Resolver`]. Member references keep route tables serializable, so a
//! whole table can be loaded from configuration with
//! [`Router::add_routes`].
//!
//! # Examples
//!
//! ```
//! use routage::{Callback, MatchKind, Router};
//!
//! let mut router: Router<String> = Router::new();
//!
//! router
//!     .get("/posts/(:num)", Callback::direct(|arguments: &[String]| {
//!         format!("post #{}", arguments[0])
//!     }))
//!     .name("post.show");
//!
//! router.group("/admin", |router| {
//!     router.get("/stats", Callback::direct(|_: &[String]| "stats".to_string()));
//! });
//!
//! assert_eq!(
//!     router.run("GET", "/posts/7").unwrap(),
//!     Some("post #7".to_string())
//! );
//! assert_eq!(router.run("GET", "/admin/stats").unwrap(), Some("stats".to_string()));
//! assert_eq!(router.reverse("post.show", &["7"]).unwrap(), "/posts/7");
//! assert_eq!(router.find("GET", "/posts/seven").kind, MatchKind::NotFound);
//! ```

pub mod callback;
pub mod collection;
pub mod error;
pub mod feed;
pub mod groups;
pub mod names;
pub mod placeholders;
pub mod route;
pub mod router;

pub use callback::{Callback, Flow, Handler, MemberRef, NoResolver, Resolver};
pub use collection::{MatchKind, RouteCollection, RouteMatch};
pub use error::{RouterError, RouterResult};
pub use feed::{GroupEntry, RouteEntry};
pub use groups::{GroupOptions, Groups};
pub use names::Names;
pub use placeholders::Placeholders;
pub use route::{ANY_METHOD, Route};
pub use router::{RouteHandle, Router};
