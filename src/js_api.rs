//! JavaScript entry points for pages that don't drive the crate from Rust.

use crate::{config::Config, controller::Hypha, error::Error};
use core::cell::RefCell;
use std::rc::Rc;
use tracing::{instrument, warn};
use wasm_bindgen::{prelude::wasm_bindgen, JsValue};
use web_sys::Element;

thread_local! {
	static INSTANCE: RefCell<Option<Rc<Hypha>>> = RefCell::new(None);
}

/// Installs the default configuration for this page. Repeated calls are ignored.
///
/// # Errors
///
/// Iff there's no window or document.
#[wasm_bindgen]
#[instrument]
pub fn start() -> Result<(), JsValue> {
	INSTANCE.with(|instance| {
		let mut instance = instance.borrow_mut();
		if instance.is_some() {
			warn!("Already started.");
			return Ok(());
		}
		*instance = Some(crate::install(Config::default())?);
		Ok(())
	})
}

/// Refreshes every fragment inside `root` (default: the whole document) related to one of `changes`,
/// or every fragment if `changes` is omitted.
///
/// Relative `changes` are resolved against the document's base URI.
/// Returns the number of refreshes started.
///
/// # Errors
///
/// Iff [`start`] wasn't called yet or the scan fails.
#[instrument(skip(root))]
#[wasm_bindgen(js_name = reloadFragments)]
pub fn reload_fragments(changes: Option<Vec<String>>, root: Option<Element>) -> Result<usize, JsValue> {
	let hypha = INSTANCE
		.with(|instance| instance.borrow().clone())
		.ok_or(Error::MissingGlobal("started instance"))?;
	Ok(hypha.reload_fragments(changes.as_deref(), root.as_ref())?)
}
