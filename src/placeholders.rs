//! Placeholder registry and pattern regexification.
//!
//! Route patterns stay literal strings until match time: the registry turns a
//! pattern like `/users/(:num)` into an (unanchored) regular expression body by
//! escaping the literal parts and substituting each known token's regex
//! fragment. Because substitution happens from the live registry, placeholder
//! additions made before a `find` call take effect for it.
//!
//! The pre-seeded token set:
//!
//! | token    | matches                     |
//! |----------|-----------------------------|
//! | `(:num)` | one or more ASCII digits    |
//! | `(:hex)` | hexadecimal characters      |
//! | `(:any)` | anything except a slash     |
//! | `(:all)` | anything, slashes included  |
//!
//! plus the optional-group marker `?`, which survives escaping so patterns can
//! mark a placeholder or a parenthesised group as optional.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

/// Maximum compiled size of an anchored comparison regex.
const MAX_COMPARE_REGEX_SIZE: usize = 1 << 20;

/// Finds `/(fragment)?` where the fragment is a single substituted group, so
/// the preceding slash can be made optional together with the fragment.
static OPTIONAL_SLASH: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"/\(([^/)]+)\)\?").unwrap());

struct Placeholder {
	/// Escaped token, the substitution key.
	token: String,
	/// Regex fragment substituted for the token.
	fragment: String,
	/// Precompiled `^fragment$` for [`Placeholders::compare`]; `None` when the
	/// fragment is not a standalone expression (the seeded `?` entry).
	anchored: Option<Regex>,
}

/// Ordered token → regex-fragment registry.
///
/// Insertion order is the substitution order in [`Placeholders::regexify`];
/// the seeded `?` entry comes first so optional markers are restored before
/// any fragment is substituted.
///
/// # Examples
///
/// ```
/// use routage::Placeholders;
///
/// let placeholders = Placeholders::new();
/// assert_eq!(placeholders.regexify("/users/(:num)"), r"/users/([\d]+)");
/// assert!(placeholders.compare("(:num)", "42"));
/// assert!(!placeholders.compare("(:num)", "abc"));
/// ```
pub struct Placeholders {
	entries: Vec<Placeholder>,
}

impl Placeholders {
	/// Create a registry with the pre-seeded token set.
	pub fn new() -> Self {
		let mut placeholders = Self {
			entries: Vec::new(),
		};
		placeholders
			.add("?", "?")
			.add("(:num)", r"([\d]+)")
			.add("(:hex)", "([a-fA-F0-9]+)")
			.add("(:any)", r"([^\/]+)")
			.add("(:all)", "(.*)");
		placeholders
	}

	/// Register or overwrite a token → fragment mapping.
	///
	/// The token is escaped for literal regex safety before storage; the
	/// fragment is stored verbatim. Overwriting keeps the token's original
	/// substitution position.
	///
	/// # Examples
	///
	/// ```
	/// use routage::Placeholders;
	///
	/// let mut placeholders = Placeholders::new();
	/// placeholders.add("(:slug)", "([a-z0-9-]+)");
	/// assert!(placeholders.has("(:slug)"));
	/// assert!(placeholders.compare("(:slug)", "my-first-post"));
	/// ```
	pub fn add(&mut self, token: &str, fragment: &str) -> &mut Self {
		self.insert(regex::escape(token), fragment)
	}

	/// Register a mapping whose token is already escaped by the caller.
	pub fn add_escaped(&mut self, token: &str, fragment: &str) -> &mut Self {
		self.insert(token.to_string(), fragment)
	}

	/// Whether the token is a known placeholder.
	pub fn has(&self, token: &str) -> bool {
		self.lookup(&regex::escape(token)).is_some()
	}

	/// The token's fragment, or the escaped token itself if unknown.
	///
	/// The identity fallback keeps this total: unknown tokens come back as the
	/// literal text a pattern would contain for them.
	pub fn get(&self, token: &str) -> Cow<'_, str> {
		let escaped = regex::escape(token);
		match self.lookup(&escaped) {
			Some(entry) => Cow::Borrowed(entry.fragment.as_str()),
			None => Cow::Owned(escaped),
		}
	}

	/// Validate a value against a token's fragment, anchored start-to-end.
	///
	/// Unknown tokens compare `true`: they are fixed literal segments and
	/// textual equality is the caller's concern, not the registry's. Identity
	/// mappings (fragment equal to the raw token, like the seeded `?` entry)
	/// also compare `true`.
	pub fn compare(&self, token: &str, value: &str) -> bool {
		let escaped = regex::escape(token);
		match self.lookup(&escaped) {
			None => true,
			Some(entry) if entry.fragment == token => true,
			Some(entry) => entry
				.anchored
				.as_ref()
				.is_some_and(|anchored| anchored.is_match(value)),
		}
	}

	/// Turn a pattern into a regular-expression body.
	///
	/// Pipeline: escape the whole pattern, substitute every stored token in
	/// insertion order, make the slash before an optional substituted fragment
	/// optional as well (`/(frag)?` → `/?(frag)?`, so an absent optional
	/// trailing segment leaves no dangling slash), then restore user-written
	/// parentheses as non-capturing group delimiters. The caller anchors and
	/// compiles the result.
	///
	/// # Examples
	///
	/// ```
	/// use routage::Placeholders;
	///
	/// let placeholders = Placeholders::new();
	/// assert_eq!(placeholders.regexify("/posts/(:num)?"), r"/posts/?([\d]+)?");
	/// assert_eq!(placeholders.regexify("/posts(/(:num))?"), r"/posts(?:/([\d]+))?");
	/// ```
	pub fn regexify(&self, pattern: &str) -> String {
		self.substitute(regex::escape(pattern))
	}

	/// [`Placeholders::regexify`] for a pattern the caller already escaped.
	pub fn regexify_escaped(&self, pattern: &str) -> String {
		self.substitute(pattern.to_string())
	}

	fn insert(&mut self, token: String, fragment: &str) -> &mut Self {
		let anchored = RegexBuilder::new(&format!("^{fragment}$"))
			.size_limit(MAX_COMPARE_REGEX_SIZE)
			.build()
			.ok();
		match self.entries.iter_mut().find(|entry| entry.token == token) {
			Some(entry) => {
				entry.fragment = fragment.to_string();
				entry.anchored = anchored;
			}
			None => self.entries.push(Placeholder {
				token,
				fragment: fragment.to_string(),
				anchored,
			}),
		}
		self
	}

	fn lookup(&self, escaped: &str) -> Option<&Placeholder> {
		self.entries.iter().find(|entry| entry.token == escaped)
	}

	fn substitute(&self, escaped: String) -> String {
		let mut compiled = escaped;
		for entry in &self.entries {
			compiled = compiled.replace(&entry.token, &entry.fragment);
		}
		let compiled = OPTIONAL_SLASH.replace_all(&compiled, "/?(${1})?");
		compiled.replace(r"\(", "(?:").replace(r"\)", ")")
	}
}

impl Default for Placeholders {
	fn default() -> Self {
		Self::new()
	}
}
