//! Error types for routing operations.

use thiserror::Error;

/// Result type for router operations.
pub type RouterResult<T> = Result<T, RouterError>;

/// Errors raised by named-route reversal and callback resolution.
///
/// Matching itself never errors: unmatched requests resolve to the
/// not-found / method-not-allowed fallback routes instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RouterError {
	/// Named-route lookup miss.
	#[error("no route named {0} found")]
	UnknownName(String),

	/// Too few arguments supplied for a named-route reversal.
	#[error("missing argument for named route: {0}")]
	MissingArgument(String),

	/// A supplied argument does not match its placeholder's pattern.
	#[error("invalid argument type for named route: {0}")]
	InvalidArgument(String),

	/// A member reference could not be turned into an invocable.
	#[error("no resolver for callback reference: {target}::{method}")]
	Unresolved {
		/// Named type the reference points at.
		target: String,
		/// Member of that type.
		method: String,
	},
}
