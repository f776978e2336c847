//! Attribute names and protocol markers.

/// Names of the attributes and query parameters the controller reads and writes.
///
/// [`Config::default`] uses the `hy-*` names, i.e. `hy-src`, `hy-target` and so on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	/// Binds an element to its remote source URL.
	pub source_attribute: String,
	/// Present while an element must be skipped by invalidation passes.
	pub protected_attribute: String,
	/// Declares where a link's or form's response is swapped into.
	pub target_attribute: String,
	/// [`target_attribute`](`Config::target_attribute`) value meaning "the nearest enclosing fragment".
	pub nearest_fragment: String,
	/// Marks the swap payload root inside a fetched document.
	pub body_attribute: String,
	/// Whitespace-separated list of additional URLs a form's mutation changes.
	pub changes_attribute: String,
	/// Explicit method override on a form.
	pub method_attribute: String,
	/// Name of the hidden input used for method override.
	pub method_field: String,
	/// Query parameter appended to every fragment request.
	pub fragment_marker: String,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			source_attribute: "hy-src".to_owned(),
			protected_attribute: "hy-protected".to_owned(),
			target_attribute: "hy-target".to_owned(),
			nearest_fragment: "fragment".to_owned(),
			body_attribute: "hy-body".to_owned(),
			changes_attribute: "hy-changes".to_owned(),
			method_attribute: "hy-method".to_owned(),
			method_field: "_method".to_owned(),
			fragment_marker: "hy-fragment".to_owned(),
		}
	}
}

impl Config {
	/// Bound fragments that are eligible for invalidation.
	pub(crate) fn unprotected_fragments_selector(&self) -> String {
		format!("[{}]:not([{}])", self.source_attribute, self.protected_attribute)
	}

	pub(crate) fn body_selector(&self) -> String {
		format!("[{}]", self.body_attribute)
	}

	pub(crate) fn anchors_selector(&self) -> String {
		format!("a[{}]", self.target_attribute)
	}

	pub(crate) fn forms_selector(&self) -> String {
		format!("form[{}]", self.target_attribute)
	}

	pub(crate) fn method_field_selector(&self) -> String {
		format!("input[name={}]", self.method_field)
	}
}
