//! Decides whether a mutation at one URL invalidates the content at another.

use crate::error::{Error, Result};
use tracing::{instrument, trace};
use web_sys::Url;

/// Returns whether the fragment at `fragment_url` should be refreshed after a mutation at `changed_url`.
///
/// Both URLs must be absolute. They are related iff they share an origin and
/// the path segments of one are a prefix of the other's. Query strings and fragments are ignored.
///
/// This over-approximates: Mutating `/teams/7` refreshes `/teams/7/members` and `/teams`, but not `/teams/8`.
/// The root path `/` relates to everything on its origin.
///
/// # Errors
///
/// Iff either argument can't be parsed as an absolute URL.
#[instrument(level = "trace")]
pub fn depends_on(changed_url: &str, fragment_url: &str) -> Result<bool> {
	let changed = Url::new(changed_url).map_err(|error| Error::invalid_url(changed_url, error))?;
	let fragment = Url::new(fragment_url).map_err(|error| Error::invalid_url(fragment_url, error))?;

	if changed.origin() != fragment.origin() {
		trace!("Origins differ.");
		return Ok(false);
	}
	Ok(paths_related(&changed.pathname(), &fragment.pathname()))
}

/// Segment-wise prefix check between two URL paths, in either direction.
///
/// Empty segments don't count, so `/a/` and `/a` are the same path and `/` is a prefix of every path.
#[must_use]
pub fn paths_related(a: &str, b: &str) -> bool {
	segments(a).zip(segments(b)).all(|(a, b)| a == b)
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
	path.split('/').filter(|segment| !segment.is_empty())
}
