use crate::config::Config;
use core::fmt::{self, Display, Formatter};
use wasm_bindgen::JsCast;
use web_sys::{HtmlFormElement, HtmlInputElement};

/// The effective HTTP method of a form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
	Get,
	Head,
	Post,
	Put,
	Patch,
	Delete,
	/// Any other token, lower-cased.
	Other(String),
}

impl Method {
	/// Case-insensitive.
	#[must_use]
	pub fn parse(method: &str) -> Self {
		match method.trim().to_ascii_lowercase().as_str() {
			"get" => Self::Get,
			"head" => Self::Head,
			"post" => Self::Post,
			"put" => Self::Put,
			"patch" => Self::Patch,
			"delete" => Self::Delete,
			other => Self::Other(other.to_owned()),
		}
	}

	/// Resolves a form's method with priority
	/// explicit override attribute > hidden override field > `method` attribute > the form's default method.
	///
	/// Empty values fall through to the next source.
	#[must_use]
	pub fn resolve(form: &HtmlFormElement, config: &Config) -> Self {
		let non_empty = |value: String| if value.trim().is_empty() { None } else { Some(value) };
		let field = || {
			form.query_selector(&config.method_field_selector())
				.ok()
				.flatten()
				.and_then(|field| field.dyn_into::<HtmlInputElement>().ok())
				.map(|field| field.value())
		};

		let method = form
			.get_attribute(&config.method_attribute)
			.and_then(non_empty)
			.or_else(|| field().and_then(non_empty))
			.or_else(|| form.get_attribute("method").and_then(non_empty))
			.unwrap_or_else(|| form.method());
		Self::parse(&method)
	}

	/// Read methods send their parameters in the query string and never invalidate anything.
	#[must_use]
	pub fn is_read(&self) -> bool {
		matches!(self, Self::Get | Self::Head)
	}

	/// Whether a successful submission with this method triggers an invalidation pass.
	#[must_use]
	pub fn invalidates(&self) -> bool {
		matches!(self, Self::Post | Self::Put | Self::Patch | Self::Delete)
	}

	/// The upper-case wire token.
	///
	/// `fetch` only normalises the case of some methods, so this is always sent upper-cased.
	#[must_use]
	pub fn as_http(&self) -> String {
		self.to_string().to_ascii_uppercase()
	}
}

impl Display for Method {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Get => "get",
			Self::Head => "head",
			Self::Post => "post",
			Self::Put => "put",
			Self::Patch => "patch",
			Self::Delete => "delete",
			Self::Other(other) => other,
		})
	}
}
