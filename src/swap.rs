//! Fetching fragments and replacing element content with them.

use crate::{
	controller::Hypha,
	error::{Error, Result},
	location::{resolve, with_fragment_marker},
	target::Target,
};
use core::future::Future;
use std::rc::Rc;
use tracing::{error, instrument, trace, trace_span};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::{DomParser, Element, RequestInit, Response, SupportedType};

impl Hypha {
	/// Parses `html` and replaces the children of every element resolved from `target` with the fragment root's children.
	///
	/// The fragment root is the first element carrying the body marker attribute, wherever it is nested,
	/// or else the parsed document's `<body>`. That way a server can answer with either a full page or a bare fragment.
	///
	/// If `source` is given, it becomes each element's new binding.
	/// Links and forms inside the new content are bound afterwards, since nothing else wires them up.
	///
	/// Returns the number of elements that were swapped.
	///
	/// # Errors
	///
	/// Iff parsing fails, the target selector is invalid or a DOM mutation throws.
	/// Elements before the failing one stay swapped.
	#[instrument(skip(self, html))]
	pub fn swap(&self, html: &str, target: &Target, source: Option<&str>) -> Result<usize> {
		if cfg!(feature = "dangerous-logging") {
			trace!("Swapping in {:?}", html);
		}

		let parsed = DomParser::new()?.parse_from_string(html, SupportedType::TextHtml)?;
		let fragment: Element = match parsed.query_selector(&self.config.body_selector())? {
			Some(marked) => marked,
			None => parsed.body().ok_or(Error::MissingGlobal("body of parsed document"))?.into(),
		};

		let elements = target.elements(&self.document)?;
		for element in &elements {
			let span = trace_span!("Swapping element", tag = %element.tag_name());
			let _enter = span.enter();

			if let Some(source) = source {
				element.set_attribute(&self.config.source_attribute, source)?;
			}
			replace_children(element, &fragment)?;
			self.bind(Some(element))?;
		}
		trace!("Swapped {} element(s).", elements.len());
		Ok(elements.len())
	}

	/// Fetches the fragment rendering of `source` and [swaps](`Hypha::swap`) it into `target`,
	/// recording `source` as the new binding.
	///
	/// # Errors
	///
	/// On transport failure or a non-success status. The target keeps its previous content in that case.
	#[instrument(skip(self))]
	pub async fn fetch_to(&self, source: &str, target: &Target) -> Result<usize> {
		let absolute = resolve(source, &self.base_uri()?)?;
		let url = with_fragment_marker(&absolute, &self.config.fragment_marker)?;

		let init = RequestInit::new();
		init.set_method("GET");
		let response = self.fetch(&url, &init).await?;
		let html = text(&response).await?;
		self.swap(&html, target, Some(source))
	}

	/// Starts [`Hypha::fetch_to`] without waiting for it.
	pub(crate) fn spawn_fetch_to(self: &Rc<Self>, source: String, target: Target) {
		let this = Rc::clone(self);
		spawn("fetch_to", async move { this.fetch_to(&source, &target).await.map(drop) });
	}

	/// `fetch` that only resolves successfully for `ok` statuses.
	pub(crate) async fn fetch(&self, url: &str, init: &RequestInit) -> Result<Response> {
		let response = JsFuture::from(self.window.fetch_with_str_and_init(url, init)).await?;
		let response: Response = response.dyn_into().map_err(|_| Error::UnexpectedType("Response"))?;
		if !response.ok() {
			return Err(Error::Status {
				url: response.url(),
				status: response.status(),
			});
		}
		Ok(response)
	}

	pub(crate) fn base_uri(&self) -> Result<String> {
		self.document.base_uri()?.ok_or(Error::MissingGlobal("document.baseURI"))
	}
}

pub(crate) async fn text(response: &Response) -> Result<String> {
	let text = JsFuture::from(response.text()?).await?;
	text.as_string().ok_or(Error::UnexpectedType("string"))
}

/// Replaces all of `element`'s children with deep clones of `fragment`'s,
/// so the same fragment can fill several targets.
fn replace_children(element: &Element, fragment: &Element) -> Result<()> {
	while let Some(child) = element.first_child() {
		element.remove_child(&child)?;
	}

	let children = fragment.child_nodes();
	for i in 0..children.length() {
		if let Some(child) = children.item(i) {
			element.append_child(&child.clone_node_with_deep(true)?)?;
		}
	}
	Ok(())
}

/// Runs `future` on the browser's task queue.
///
/// Failures are logged and then surface as unhandled promise rejections, like a throwing event handler would.
pub(crate) fn spawn(name: &'static str, future: impl 'static + Future<Output = Result<()>>) {
	drop(future_to_promise(async move {
		future.await.map(|()| JsValue::UNDEFINED).map_err(|error| {
			error!("{} failed: {}", name, error);
			JsValue::from(error)
		})
	}));
}
