//! Translates clicks and submissions into fetches, swaps and invalidation passes.

use crate::{
	config::Config,
	error::{Error, Result},
	location::{resolve, resolve_changes, strip_fragment_marker, with_fragment_marker},
	method::Method,
	protect::protect,
	relation::depends_on,
	swap::{spawn, text},
	target::{resolve_target, Target},
};
use std::rc::{Rc, Weak};
use tracing::{error, info, instrument, trace, trace_span, warn};
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{
	AddEventListenerOptions, Document, Element, Event, FormData, HtmlAnchorElement, HtmlButtonElement, HtmlElement, HtmlFormElement, HtmlInputElement, MouseEvent, RequestInit, RequestRedirect,
	SubmitEvent, Url, UrlSearchParams, Window,
};

/// Owns the event handlers shared by every bound link and form of one document.
///
/// Handlers are assigned through `onclick`/`onsubmit`, so binding the same element again is idempotent.
///
/// # Safety
///
/// Bound links and forms start throwing errors into JavaScript once this instance is dropped,
/// since the handler closures are freed with it. Keep the [`Rc`] returned by [`install`] or [`Hypha::new`] alive
/// for as long as the page is in use.
#[derive(Debug)]
pub struct Hypha {
	pub(crate) config: Config,
	pub(crate) window: Window,
	pub(crate) document: Document,
	anchor_handler: Closure<dyn Fn(MouseEvent)>,
	form_handler: Closure<dyn Fn(Event)>,
	load_handler: Closure<dyn Fn()>,
}

/// Creates a [`Hypha`] for the current window and runs the initial pass once the document has loaded
/// (or right away, if it already has).
///
/// # Errors
///
/// Iff there's no window or document, or if the initial pass fails synchronously.
#[instrument]
pub fn install(config: Config) -> Result<Rc<Hypha>> {
	let hypha = Hypha::new(config)?;
	if hypha.document.ready_state() == "complete" {
		hypha.initialize()?;
	} else {
		let options = AddEventListenerOptions::new();
		options.set_once(true);
		hypha
			.window
			.add_event_listener_with_callback_and_add_event_listener_options("load", hypha.load_handler.as_ref().unchecked_ref(), &options)?;
		trace!("Deferred initial pass until `load`.");
	}
	Ok(hypha)
}

impl Hypha {
	/// Creates the shared handlers without binding anything yet.
	///
	/// # Errors
	///
	/// Iff there's no window or document.
	pub fn new(config: Config) -> Result<Rc<Self>> {
		let window = web_sys::window().ok_or(Error::MissingGlobal("window"))?;
		let document = window.document().ok_or(Error::MissingGlobal("document"))?;

		Ok(Rc::new_cyclic(|weak: &Weak<Self>| {
			let anchor_weak = weak.clone();
			let form_weak = weak.clone();
			let load_weak = weak.clone();
			Self {
				config,
				window,
				document,
				anchor_handler: Closure::wrap(Box::new(move |event: MouseEvent| match anchor_weak.upgrade() {
					Some(this) => this.on_anchor_click(&event),
					None => warn!("Link clicked after its `Hypha` was dropped."),
				}) as Box<dyn Fn(MouseEvent)>),
				form_handler: Closure::wrap(Box::new(move |event: Event| match form_weak.upgrade() {
					Some(this) => this.on_form_submit(&event),
					None => warn!("Form submitted after its `Hypha` was dropped."),
				}) as Box<dyn Fn(Event)>),
				load_handler: Closure::wrap(Box::new(move || {
					if let Some(this) = load_weak.upgrade() {
						if let Err(error) = this.initialize() {
							error!("Initial pass failed: {}", error)
						}
					}
				}) as Box<dyn Fn()>),
			}
		}))
	}

	#[must_use]
	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Binds every link and form in the document, then refreshes every bound fragment.
	///
	/// # Errors
	///
	/// Iff a selector query fails.
	#[instrument(skip(self))]
	pub fn initialize(self: &Rc<Self>) -> Result<usize> {
		self.bind(None)?;
		let started = self.reload_fragments(None, None)?;
		info!("Initialized with {} fragment refresh(es).", started);
		Ok(started)
	}

	/// Binds links and forms carrying a target attribute inside `root` (default: the whole document).
	///
	/// # Errors
	///
	/// Iff a selector query fails.
	#[instrument(skip(self, root))]
	pub fn bind(&self, root: Option<&Element>) -> Result<()> {
		let anchors = self.query_all::<HtmlElement>(root, &self.config.anchors_selector())?;
		for anchor in &anchors {
			anchor.set_onclick(Some(self.anchor_handler.as_ref().unchecked_ref()));
		}

		let forms = self.query_all::<HtmlElement>(root, &self.config.forms_selector())?;
		for form in &forms {
			form.set_onsubmit(Some(self.form_handler.as_ref().unchecked_ref()));
		}

		trace!("Bound {} link(s) and {} form(s).", anchors.len(), forms.len());
		Ok(())
	}

	/// Starts a refresh of every unprotected fragment in `root` (default: the whole document)
	/// whose source relates to any of `changes`, or of all of them if `changes` is [`None`].
	///
	/// Returns as soon as all fetches are started. They complete and swap in no particular order,
	/// and an earlier refresh of the same element that is still in flight isn't cancelled.
	/// Returns the number of refreshes started.
	///
	/// # Errors
	///
	/// Iff the selector query fails or the document has no base URI.
	#[instrument(skip(self, root))]
	pub fn reload_fragments(self: &Rc<Self>, changes: Option<&[String]>, root: Option<&Element>) -> Result<usize> {
		let stale = self.stale_fragments(changes, root)?;
		let started = stale.len();
		for (element, source) in stale {
			self.spawn_fetch_to(source, Target::Element(element));
		}
		trace!("Started {} fragment refresh(es).", started);
		Ok(started)
	}

	/// The unprotected bound fragments in `root` (default: the whole document) that
	/// [`reload_fragments`](`Hypha::reload_fragments`) would refresh, each with its source as written.
	///
	/// Sources and `changes` are resolved against the document's base URI before comparison,
	/// so relative changed URLs like `/teams/7` work too.
	/// Fragments with unparsable sources and unparsable changes are skipped with a warning.
	///
	/// # Errors
	///
	/// Iff the selector query fails or the document has no base URI.
	pub fn stale_fragments(&self, changes: Option<&[String]>, root: Option<&Element>) -> Result<Vec<(Element, String)>> {
		let candidates = self.query_all::<Element>(root, &self.config.unprotected_fragments_selector())?;
		let base = self.base_uri()?;
		let changes: Option<Vec<String>> = changes.map(|changes| {
			changes
				.iter()
				.filter_map(|changed| match resolve(changed, &base) {
					Ok(absolute) => Some(absolute),
					Err(error) => {
						warn!("Ignoring change: {}", error);
						None
					}
				})
				.collect()
		});

		let mut stale = Vec::new();
		for element in candidates {
			let source = match element.get_attribute(&self.config.source_attribute) {
				Some(source) => source,
				None => continue,
			};

			if let Some(changes) = &changes {
				let absolute = match resolve(&source, &base) {
					Ok(absolute) => absolute,
					Err(error) => {
						warn!("Skipping fragment: {}", error);
						continue;
					}
				};
				let related = changes.iter().any(|changed| {
					depends_on(changed, &absolute).unwrap_or_else(|error| {
						warn!("Treating as unrelated: {}", error);
						false
					})
				});
				if !related {
					continue;
				}
			}

			stale.push((element, source));
		}
		Ok(stale)
	}

	fn on_anchor_click(self: &Rc<Self>, event: &MouseEvent) {
		let span = trace_span!("Link clicked");
		let _enter = span.enter();

		let anchor = match event.current_target().and_then(|target| target.dyn_into::<HtmlAnchorElement>().ok()) {
			Some(anchor) => anchor,
			None => return warn!("Click handler invoked on something other than a link."),
		};
		let target = match resolve_target(&anchor, &self.config) {
			Some(target) => target,
			None => return trace!("No target. Navigating normally."),
		};

		event.prevent_default();
		let href = anchor.href();
		self.spawn_fetch_to(href, target);
	}

	fn on_form_submit(self: &Rc<Self>, event: &Event) {
		let span = trace_span!("Form submitted");
		let _enter = span.enter();

		event.prevent_default();
		let form = match event.current_target().and_then(|target| target.dyn_into::<HtmlFormElement>().ok()) {
			Some(form) => form,
			None => return warn!("Submit handler invoked on something other than a form."),
		};
		// Synthetic `submit` events aren't `SubmitEvent`s.
		let submitter = event.dyn_ref::<SubmitEvent>().and_then(SubmitEvent::submitter);

		let this = Rc::clone(self);
		spawn("handle_form_update", async move { this.handle_form_update(&form, submitter.as_ref()).await });
	}

	/// Submits `form` through `fetch`, swaps the response into the form's target
	/// and, for mutating methods, refreshes every other fragment related to the changed URLs.
	///
	/// The target is protected from that refresh until it completes,
	/// so the content that was just received isn't immediately fetched again.
	///
	/// # Errors
	///
	/// On transport failure, a non-success status or invalid URLs.
	/// Nothing is swapped or refreshed in that case, and protection is released regardless.
	#[instrument(skip(self, form, submitter))]
	pub async fn handle_form_update(self: &Rc<Self>, form: &HtmlFormElement, submitter: Option<&HtmlElement>) -> Result<()> {
		let config = &self.config;
		let action = submitter.and_then(form_action_override).unwrap_or_else(|| form.action());
		let method = Method::resolve(form, config);
		trace!(%method, "Resolved method.");

		let data = FormData::new_with_form(form)?;
		let url = Url::new(&action).map_err(|error| Error::invalid_url(action.as_str(), error))?;
		let init = RequestInit::new();
		init.set_method(&method.as_http());
		init.set_redirect(RequestRedirect::Follow);
		if method.is_read() {
			let query = UrlSearchParams::new_with_str_sequence_sequence(data.as_ref())?;
			url.set_search(&String::from(query.to_string()));
		} else {
			init.set_body(data.as_ref());
		}

		let request_url = with_fragment_marker(&url.href(), &config.fragment_marker)?;
		let response = self.fetch(&request_url, &init).await?;
		let landed = strip_fragment_marker(&response.url(), &config.fragment_marker)?;
		let html = text(&response).await?;

		let mut protection = None;
		if let Some(target) = resolve_target(form, config) {
			if !method.is_read() {
				protection = Some(protect(target.elements(&self.document)?, &config.protected_attribute));
			}
			self.swap(&html, &target, Some(&landed))?;
		} else {
			trace!("No target. Skipping swap.");
		}

		if method.invalidates() {
			let changes = resolve_changes(&action, form.get_attribute(&config.changes_attribute).as_deref())?;
			self.reload_fragments(Some(changes.as_slice()), None)?;
		}
		drop(protection);
		Ok(())
	}

	fn query_all<T: JsCast>(&self, root: Option<&Element>, selector: &str) -> Result<Vec<T>> {
		let matches = match root {
			Some(root) => root.query_selector_all(selector)?,
			None => self.document.query_selector_all(selector)?,
		};
		Ok((0..matches.length())
			.filter_map(|i| matches.item(i))
			.filter_map(|node| node.dyn_into::<T>().ok())
			.collect())
	}
}

/// The submitter's `formaction`, but only if it declares one explicitly.
fn form_action_override(submitter: &HtmlElement) -> Option<String> {
	if !submitter.has_attribute("formaction") {
		return None;
	}
	if let Some(button) = submitter.dyn_ref::<HtmlButtonElement>() {
		Some(button.form_action())
	} else {
		submitter.dyn_ref::<HtmlInputElement>().map(HtmlInputElement::form_action)
	}
}
