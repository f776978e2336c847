use core::fmt::Debug;
use thiserror::Error;
use wasm_bindgen::{JsCast as _, JsValue};

/// Everything that can go wrong while fetching or swapping a fragment.
///
/// Missing targets and empty invalidation candidate sets are **not** errors.
/// They are legitimate empty results and don't produce any signal.
#[derive(Debug, Error)]
pub enum Error {
	/// A JavaScript call threw or a promise rejected.
	#[error("JavaScript error: {0}")]
	Js(String),

	/// `window`, `document` or `document.body` isn't available.
	#[error("missing global: {0}")]
	MissingGlobal(&'static str),

	#[error("invalid URL {url:?}: {reason}")]
	InvalidUrl { url: String, reason: String },

	/// The server answered with a non-success status. The target keeps its previous content.
	#[error("{url} responded with status {status}")]
	Status { url: String, status: u16 },

	/// A JavaScript value didn't implement the expected interface.
	#[error("expected {0}")]
	UnexpectedType(&'static str),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

impl Error {
	pub(crate) fn invalid_url(url: impl Into<String>, reason: impl Debug) -> Self {
		Self::InvalidUrl {
			url: url.into(),
			reason: format!("{:?}", reason),
		}
	}
}

impl From<JsValue> for Error {
	fn from(value: JsValue) -> Self {
		// `Error` instances stringify without their message through `Debug`.
		match value.dyn_ref::<js_sys::Error>() {
			Some(error) => Self::Js(String::from(error.to_string())),
			None => Self::Js(format!("{:?}", value)),
		}
	}
}

impl From<Error> for JsValue {
	fn from(error: Error) -> Self {
		js_sys::Error::new(&error.to_string()).into()
	}
}
