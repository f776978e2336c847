use crate::{config::Config, error::Result};
use tracing::{instrument, trace};
use wasm_bindgen::JsCast as _;
use web_sys::{Document, Element};

/// Where fetched content is swapped into. Resolved fresh for every interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
	/// Every element matching this selector at swap time.
	Selector(String),
	/// This exact element.
	Element(Element),
}

impl Target {
	/// Resolves the target to the elements that currently match it, in document order.
	///
	/// # Errors
	///
	/// Iff [`Target::Selector`] contains an invalid selector.
	pub fn elements(&self, document: &Document) -> Result<Vec<Element>> {
		match self {
			Self::Element(element) => Ok(vec![element.clone()]),
			Self::Selector(selector) => {
				let matches = document.query_selector_all(selector)?;
				Ok((0..matches.length())
					.filter_map(|i| matches.item(i))
					.filter_map(|node| node.dyn_into::<Element>().ok())
					.collect())
			}
		}
	}
}

/// Reads `element`'s declared target.
///
/// The nearest-fragment sentinel resolves to the closest inclusive ancestor carrying a source binding,
/// or the `<body>` if there's none. Any other value is used verbatim as selector.
///
/// Returns [`None`] if there's no target attribute (or the element is detached from any body).
#[must_use]
#[instrument(level = "trace", skip(config))]
pub fn resolve_target(element: &Element, config: &Config) -> Option<Target> {
	let declared = element.get_attribute(&config.target_attribute)?;
	if declared != config.nearest_fragment {
		return Some(Target::Selector(declared));
	}

	let mut current = element.clone();
	loop {
		if current.tag_name().eq_ignore_ascii_case("body") || current.has_attribute(&config.source_attribute) {
			trace!(tag = %current.tag_name(), "Found enclosing fragment.");
			return Some(Target::Element(current));
		}
		current = current.parent_element()?;
	}
}
