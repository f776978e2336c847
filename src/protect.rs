//! Temporary exclusion of freshly swapped elements from invalidation passes.

use tracing::{error, trace_span};
use web_sys::Element;

/// Sets the protection attribute on `elements` until the returned guard is dropped.
///
/// Protection is scoped to one submit handler: the guard is released on every exit path,
/// so a failing mutation can't leave an element permanently excluded from refreshes.
#[must_use]
pub fn protect<'a>(elements: Vec<Element>, attribute: &'a str) -> Protection<'a> {
	let span = trace_span!("Protecting", count = elements.len());
	let _enter = span.enter();
	for element in &elements {
		if let Err(error) = element.set_attribute(attribute, "") {
			error!("Failed to protect element: {:?}", error)
		}
	}
	Protection { elements, attribute }
}

#[derive(Debug)]
pub struct Protection<'a> {
	elements: Vec<Element>,
	attribute: &'a str,
}

impl Protection<'_> {
	#[must_use]
	pub fn elements(&self) -> &[Element] {
		&self.elements
	}
}

impl Drop for Protection<'_> {
	fn drop(&mut self) {
		let span = trace_span!("Unprotecting", count = self.elements.len());
		let _enter = span.enter();
		for element in &self.elements {
			if let Err(error) = element.remove_attribute(self.attribute) {
				error!("Failed to unprotect element: {:?}", error)
			}
		}
	}
}
