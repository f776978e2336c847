//! Partial page refresh for server-rendered HTML.
//!
//! Elements bound to a remote source through `hy-src` are filled with that source's HTML fragment.
//! Links and forms carrying `hy-target` fetch in place instead of navigating,
//! and mutating form submissions refresh every other fragment whose source is related to the changed URLs.
//!
//! See [`install`] to get started and [`relation::depends_on`] for what "related" means.

#![doc(html_root_url = "https://docs.rs/hypha-dom/0.0.1")]
#![warn(clippy::pedantic)]

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod config;
pub mod controller;
pub mod error;
#[cfg(feature = "js-api")]
pub mod js_api;
pub mod location;
pub mod method;
pub mod protect;
pub mod relation;
pub mod swap;
pub mod target;

pub use config::Config;
pub use controller::{install, Hypha};
pub use error::{Error, Result};
pub use target::Target;
