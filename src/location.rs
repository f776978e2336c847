//! URL resolution and the fragment protocol marker.

use crate::error::{Error, Result};
use tracing::warn;
use web_sys::Url;

/// Resolves `url` against `base`, returning the absolute form.
///
/// # Errors
///
/// Iff the combination isn't a valid URL.
pub fn resolve(url: &str, base: &str) -> Result<String> {
	Url::new_with_base(url, base).map(|url| url.href()).map_err(|error| Error::invalid_url(url, error))
}

/// Appends the bare `marker` query parameter (without `=`) to `url`,
/// which tells the server to render a fragment instead of a full page.
///
/// # Errors
///
/// Iff `url` isn't absolute.
pub fn with_fragment_marker(url: &str, marker: &str) -> Result<String> {
	let parsed = Url::new(url).map_err(|error| Error::invalid_url(url, error))?;
	parsed.set_search(&append_marker(&parsed.search(), marker));
	Ok(parsed.href())
}

/// Removes every occurrence of the `marker` query parameter from `url`.
///
/// The result is what gets recorded as a fragment's binding, so it must also work for a normal navigation.
///
/// # Errors
///
/// Iff `url` isn't absolute.
pub fn strip_fragment_marker(url: &str, marker: &str) -> Result<String> {
	let parsed = Url::new(url).map_err(|error| Error::invalid_url(url, error))?;
	let query = parsed.search_params();
	query.delete(marker);
	parsed.set_search(&String::from(query.to_string()));
	Ok(parsed.href())
}

/// Computes the changed-URL set of a mutation: `action` itself,
/// followed by each whitespace-separated entry of `side_effects` resolved against `action`'s origin.
///
/// Side effects that don't resolve are skipped with a warning.
///
/// # Errors
///
/// Iff `action` isn't a valid URL.
pub fn resolve_changes(action: &str, side_effects: Option<&str>) -> Result<Vec<String>> {
	let origin = Url::new(action).map_err(|error| Error::invalid_url(action, error))?.origin();
	let mut changes = vec![action.to_owned()];
	for side_effect in side_effects.unwrap_or_default().split_whitespace() {
		match resolve(side_effect, &origin) {
			Ok(changed) => changes.push(changed),
			Err(error) => warn!("Ignoring side effect: {}", error),
		}
	}
	Ok(changes)
}

/// `search` is `""` or starts with `?`, like [`Url::search`].
fn append_marker(search: &str, marker: &str) -> String {
	if search.is_empty() || search == "?" {
		format!("?{}", marker)
	} else {
		format!("{}&{}", search, marker)
	}
}
