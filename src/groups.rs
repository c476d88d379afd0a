//! Group stack for scoped route registration.
//!
//! Each open group contributes an optional path prefix and a set of
//! middlewares. The stack keeps a derived view (accumulated prefix, flattened
//! middleware list) that is recomputed on every push and pop, so reads never
//! walk the frames.

use crate::callback::{Callback, Flow};

/// Options for one group frame.
#[derive(Debug, Clone, Default)]
pub struct GroupOptions {
	prefix: Option<String>,
	middlewares: Vec<Callback<Flow>>,
}

impl GroupOptions {
	pub fn new() -> Self {
		Self::default()
	}

	/// Path prefix prepended to every pattern registered inside the group.
	pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = Some(prefix.into());
		self
	}

	/// Middleware applied to every route registered inside the group.
	pub fn middleware(mut self, middleware: impl Into<Callback<Flow>>) -> Self {
		self.middlewares.push(middleware.into());
		self
	}
}

impl From<&str> for GroupOptions {
	/// Prefix-only shorthand.
	fn from(prefix: &str) -> Self {
		Self::new().prefix(prefix)
	}
}

impl From<String> for GroupOptions {
	fn from(prefix: String) -> Self {
		Self::new().prefix(prefix)
	}
}

/// Stack of open groups with derived prefix and middleware state.
pub struct Groups {
	frames: Vec<GroupOptions>,
	prefix: String,
	middlewares: Vec<Callback<Flow>>,
}

impl Groups {
	pub fn new() -> Self {
		Self {
			frames: Vec::new(),
			prefix: String::new(),
			middlewares: Vec::new(),
		}
	}

	/// Open a group.
	pub fn push(&mut self, options: GroupOptions) {
		self.frames.push(options);
		self.generate();
	}

	/// Close the innermost group. Returns `None` when the stack is already
	/// empty instead of underflowing.
	pub fn pop(&mut self) -> Option<GroupOptions> {
		let frame = self.frames.pop();
		self.generate();
		frame
	}

	fn generate(&mut self) {
		self.middlewares.clear();
		let mut segments: Vec<&str> = Vec::new();
		for frame in &self.frames {
			if let Some(prefix) = &frame.prefix {
				let trimmed = prefix.trim_matches(['/', ' ']);
				if !trimmed.is_empty() {
					segments.push(trimmed);
				}
			}
			self.middlewares.extend(frame.middlewares.iter().cloned());
		}
		self.prefix = segments.join("/");
	}

	/// Middlewares of all open groups, outermost first.
	pub fn middlewares(&self) -> &[Callback<Flow>] {
		&self.middlewares
	}

	/// Join the accumulated prefix and a candidate pattern.
	///
	/// The result carries exactly one leading slash, no trailing slash and no
	/// doubled internal slashes, whatever slashes the frames or the candidate
	/// brought along.
	pub fn decorate_prefix(&self, pattern: &str) -> String {
		let candidate = pattern.trim_matches(['/', ' ']);
		if self.prefix.is_empty() {
			format!("/{candidate}")
		} else if candidate.is_empty() {
			format!("/{}", self.prefix)
		} else {
			format!("/{}/{}", self.prefix, candidate)
		}
	}
}

impl Default for Groups {
	fn default() -> Self {
		Self::new()
	}
}
