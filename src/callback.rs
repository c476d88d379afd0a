//! Handler and middleware callback model.
//!
//! Routes carry their handler and middleware as [`Callback`] values: either a
//! directly invocable [`Handler`] trait object, a named [`MemberRef`] resolved
//! by the host's [`Resolver`] capability at dispatch time, or the inert
//! [`Callback::Noop`] used by the default fallback routes.
//!
//! Handlers are generic over the host's output type. Middleware are ordinary
//! callbacks whose output is the [`Flow`] continuation signal.
//!
//! # Examples
//!
//! ```
//! use routage::{Callback, Flow};
//!
//! // A direct handler producing the host's output type.
//! let handler: Callback<String> = Callback::direct(|args: &[String]| args.join(","));
//!
//! // A middleware signalling whether dispatch may continue.
//! let gate: Callback<Flow> = Callback::direct(|_: &[String]| Flow::Continue);
//!
//! // A named reference, resolved by the host application at dispatch.
//! let member: Callback<String> = Callback::member("UserController", "show");
//! ```

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::error::{RouterError, RouterResult};

/// A synchronous invocable applied to the extracted path arguments.
///
/// Implemented by any `Fn(&[String]) -> T` closure or function pointer via the
/// blanket impl, and by hand for stateful handler types.
pub trait Handler<T>: Send + Sync {
	/// Invoke the handler with the ordered path arguments.
	fn handle(&self, arguments: &[String]) -> T;
}

impl<T, F> Handler<T> for F
where
	F: Fn(&[String]) -> T + Send + Sync,
{
	fn handle(&self, arguments: &[String]) -> T {
		self(arguments)
	}
}

impl<T, H> Handler<T> for Arc<H>
where
	H: Handler<T> + ?Sized,
{
	fn handle(&self, arguments: &[String]) -> T {
		(**self).handle(arguments)
	}
}

/// Continuation signal returned by middleware.
///
/// [`Flow::Abort`] stops the middleware chain before the handler runs and
/// makes dispatch yield the sentinel no-op result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
	/// Proceed to the next middleware, then the handler.
	Continue,
	/// Stop the chain; the handler is never invoked.
	Abort,
}

impl Flow {
	/// Whether this signal aborts the chain.
	pub fn is_abort(self) -> bool {
		matches!(self, Flow::Abort)
	}
}

impl From<bool> for Flow {
	/// `false` aborts, everything else continues.
	fn from(proceed: bool) -> Self {
		if proceed { Flow::Continue } else { Flow::Abort }
	}
}

/// A named `[target, method]` callback reference.
///
/// Member references keep the core free of any reflection mechanism: turning
/// one into an invocable is the host's job, through [`Resolver`]. In the
/// declarative registration feed they deserialize from two-element
/// `["Target", "method"]` arrays.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "(String, String)")]
pub struct MemberRef {
	/// Named type the reference points at.
	pub target: String,
	/// Member of that type.
	pub method: String,
}

impl MemberRef {
	/// Create a reference from a target type name and a member name.
	pub fn new(target: impl Into<String>, method: impl Into<String>) -> Self {
		Self {
			target: target.into(),
			method: method.into(),
		}
	}
}

impl From<(String, String)> for MemberRef {
	fn from((target, method): (String, String)) -> Self {
		Self { target, method }
	}
}

impl From<(&str, &str)> for MemberRef {
	fn from((target, method): (&str, &str)) -> Self {
		Self::new(target, method)
	}
}

impl fmt::Display for MemberRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}::{}", self.target, self.method)
	}
}

/// A route handler or middleware reference.
pub enum Callback<T> {
	/// Directly invocable handler.
	Direct(Arc<dyn Handler<T>>),
	/// Named reference resolved by the host's [`Resolver`] at dispatch.
	Member(MemberRef),
	/// Inert callback. As a handler it yields the sentinel no-op result; as a
	/// middleware it lets the chain continue. Default fallback routes use it.
	Noop,
}

impl<T> Callback<T> {
	/// Wrap a directly invocable handler.
	pub fn direct(handler: impl Handler<T> + 'static) -> Self {
		Callback::Direct(Arc::new(handler))
	}

	/// Create a named member reference.
	pub fn member(target: impl Into<String>, method: impl Into<String>) -> Self {
		Callback::Member(MemberRef::new(target, method))
	}
}

impl<T> Clone for Callback<T> {
	fn clone(&self) -> Self {
		match self {
			Callback::Direct(handler) => Callback::Direct(Arc::clone(handler)),
			Callback::Member(reference) => Callback::Member(reference.clone()),
			Callback::Noop => Callback::Noop,
		}
	}
}

impl<T> fmt::Debug for Callback<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Callback::Direct(_) => f.write_str("Callback::Direct(..)"),
			Callback::Member(reference) => write!(f, "Callback::Member({reference})"),
			Callback::Noop => f.write_str("Callback::Noop"),
		}
	}
}

impl<T> From<MemberRef> for Callback<T> {
	fn from(reference: MemberRef) -> Self {
		Callback::Member(reference)
	}
}

impl<T> From<(&str, &str)> for Callback<T> {
	fn from(pair: (&str, &str)) -> Self {
		Callback::Member(pair.into())
	}
}

impl<T> From<Arc<dyn Handler<T>>> for Callback<T> {
	fn from(handler: Arc<dyn Handler<T>>) -> Self {
		Callback::Direct(handler)
	}
}

/// Capability turning member references into invocables.
///
/// Supplied by the host application; the router calls [`Resolver::resolve`]
/// exactly once per dispatched member handler and once per dispatched member
/// middleware entry, never caching the produced invocable across requests.
/// One value usually implements both `Resolver<T>` (handler outputs) and
/// `Resolver<Flow>` (middleware outputs).
pub trait Resolver<T>: Send + Sync {
	/// Produce an invocable for the given reference.
	fn resolve(&self, reference: &MemberRef) -> RouterResult<Arc<dyn Handler<T>>>;
}

/// Default resolver: refuses every reference.
///
/// Routers start with this; hosts that register member references must install
/// their own capability via `Router::set_resolver`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResolver;

impl<T> Resolver<T> for NoResolver {
	fn resolve(&self, reference: &MemberRef) -> RouterResult<Arc<dyn Handler<T>>> {
		Err(RouterError::Unresolved {
			target: reference.target.clone(),
			method: reference.method.clone(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_closure_is_a_handler() {
		let callback = Callback::direct(|args: &[String]| args.len());
		match callback {
			Callback::Direct(handler) => {
				assert_eq!(handler.handle(&["a".to_string(), "b".to_string()]), 2)
			}
			other => panic!("expected a direct callback, got {other:?}"),
		}
	}

	#[test]
	fn test_flow_from_bool() {
		assert_eq!(Flow::from(false), Flow::Abort);
		assert_eq!(Flow::from(true), Flow::Continue);
		assert!(Flow::Abort.is_abort());
		assert!(!Flow::Continue.is_abort());
	}

	#[test]
	fn test_member_ref_display() {
		let reference = MemberRef::new("UserController", "show");
		assert_eq!(reference.to_string(), "UserController::show");
	}

	#[test]
	fn test_no_resolver_refuses() {
		let result: RouterResult<Arc<dyn Handler<u32>>> =
			NoResolver.resolve(&MemberRef::new("Missing", "method"));
		match result {
			Err(error) => assert_eq!(
				error,
				RouterError::Unresolved {
					target: "Missing".to_string(),
					method: "method".to_string(),
				}
			),
			Ok(_) => panic!("expected the default resolver to refuse"),
		}
	}

	#[test]
	fn test_callback_clone_shares_handler() {
		let callback: Callback<u32> = Callback::direct(|_: &[String]| 7);
		let cloned = callback.clone();
		match (callback, cloned) {
			(Callback::Direct(a), Callback::Direct(b)) => {
				assert!(Arc::ptr_eq(&a, &b));
			}
			_ => panic!("clone changed the callback variant"),
		}
	}
}
