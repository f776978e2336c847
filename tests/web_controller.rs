use hypha_dom::{protect::protect, Config, Hypha};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{Element, HtmlFormElement};

wasm_bindgen_test_configure!(run_in_browser);

use web_support_::{by_id, container, data_url, dispatch, document, init_logging, origin, sleep, wait_for};

fn ids(fragments: &[(Element, String)]) -> Vec<String> {
	fragments.iter().map(|(element, _)| element.id()).collect()
}

#[wasm_bindgen_test]
fn related_fragments_are_stale() {
	init_logging();
	let hypha = Hypha::new(Config::default()).unwrap();
	let root = container(
		r#"<div id="stale-a" hy-src="/x"></div>
		<div id="stale-b" hy-src="/x/y"><div id="stale-nested" hy-src="/x/y/z"></div></div>
		<div id="stale-c" hy-src="/z"></div>
		<div id="stale-unbound"></div>"#,
	);

	let changes = [format!("{}/x", origin())];
	let stale = hypha.stale_fragments(Some(&changes[..]), Some(&root)).unwrap();
	assert_eq!(ids(&stale), ["stale-a", "stale-b", "stale-nested"]);
	assert_eq!(stale[0].1, "/x");

	root.remove();
}

#[wasm_bindgen_test]
fn any_change_suffices() {
	init_logging();
	let hypha = Hypha::new(Config::default()).unwrap();
	let root = container(r#"<div id="any-x" hy-src="/x"></div><div id="any-z" hy-src="/z?page=2"></div><div id="any-w" hy-src="/w"></div>"#);

	let changes = [format!("{}/x", origin()), format!("{}/z/9", origin())];
	let stale = hypha.stale_fragments(Some(&changes[..]), Some(&root)).unwrap();
	assert_eq!(ids(&stale), ["any-x", "any-z"]);

	root.remove();
}

#[wasm_bindgen_test]
fn other_origins_are_never_stale() {
	init_logging();
	let hypha = Hypha::new(Config::default()).unwrap();
	let root = container(r#"<div id="origin-local" hy-src="/x"></div><div id="origin-remote" hy-src="https://example.com/x"></div>"#);

	let changes = ["https://example.com/".to_owned()];
	let stale = hypha.stale_fragments(Some(&changes[..]), Some(&root)).unwrap();
	assert_eq!(ids(&stale), ["origin-remote"]);

	root.remove();
}

#[wasm_bindgen_test]
fn relative_changes_resolve_against_the_base() {
	init_logging();
	let hypha = Hypha::new(Config::default()).unwrap();
	let root = container(r#"<div id="relative-x" hy-src="/x/y"></div><div id="relative-z" hy-src="/z"></div>"#);

	let changes = ["/x".to_owned(), "http://[".to_owned()];
	let stale = hypha.stale_fragments(Some(&changes[..]), Some(&root)).unwrap();
	assert_eq!(ids(&stale), ["relative-x"]);

	root.remove();
}

#[wasm_bindgen_test]
fn protected_fragments_are_skipped_until_released() {
	init_logging();
	let hypha = Hypha::new(Config::default()).unwrap();
	let root = container(r#"<div id="guarded" hy-src="/x"></div>"#);
	let guarded: Element = by_id("guarded");
	let changes = [format!("{}/x", origin())];

	{
		let _protection = protect(vec![guarded], "hy-protected");
		assert!(hypha.stale_fragments(Some(&changes[..]), Some(&root)).unwrap().is_empty());
	}
	assert_eq!(ids(&hypha.stale_fragments(Some(&changes[..]), Some(&root)).unwrap()), ["guarded"]);

	root.remove();
}

#[wasm_bindgen_test]
fn no_changes_means_everything_unprotected() {
	init_logging();
	let hypha = Hypha::new(Config::default()).unwrap();
	let root = container(
		r#"<div id="all-a" hy-src="/x"></div>
		<div id="all-b" hy-src="/unrelated"></div>
		<div id="all-protected" hy-src="/x" hy-protected></div>"#,
	);

	let stale = hypha.stale_fragments(None, Some(&root)).unwrap();
	assert_eq!(ids(&stale), ["all-a", "all-b"]);

	root.remove();
}

#[wasm_bindgen_test]
async fn read_submission_swaps_without_invalidating() {
	init_logging();
	let hypha = Hypha::new(Config::default()).unwrap();
	let action = data_url("found");
	let root = container(&format!(
		r##"<form id="get-form" action="{action}" method="get" hy-target="#get-result"><input name="q" value="1"></form>
		<div id="get-result"></div>
		<div id="get-related" hy-src="{action}"><i>kept</i></div>"##,
		action = action,
	));
	let form: HtmlFormElement = by_id("get-form");
	let result: Element = by_id("get-result");
	let related: Element = by_id("get-related");

	hypha.handle_form_update(&form, None).await.unwrap();
	assert_eq!(result.query_selector("p").unwrap().unwrap().text_content().as_deref(), Some("found"));
	assert_eq!(result.get_attribute("hy-src"), Some(format!("{}?q=1", action)));
	assert!(!result.has_attribute("hy-protected"));

	sleep(100).await;
	assert_eq!(related.inner_html(), "<i>kept</i>");

	root.remove();
}

#[wasm_bindgen_test]
async fn mutation_refreshes_related_fragments_and_releases_protection() {
	init_logging();
	let hypha = Hypha::new(Config::default()).unwrap();
	let action = data_url("posted");
	let root = container(&format!(
		r##"<form id="post-form" action="{action}" method="post" hy-target="#post-result"><input name="title" value="new"></form>
		<div id="post-result"></div>
		<div id="post-related" hy-src="{action}"><i>stale</i></div>
		<div id="post-unrelated" hy-src="/z"><i>untouched</i></div>"##,
		action = action,
	));
	let form: HtmlFormElement = by_id("post-form");
	let result: Element = by_id("post-result");
	let related: Element = by_id("post-related");
	let unrelated: Element = by_id("post-unrelated");

	hypha.handle_form_update(&form, None).await.unwrap();
	assert_eq!(result.query_selector("p").unwrap().unwrap().text_content().as_deref(), Some("posted"));
	assert_eq!(result.get_attribute("hy-src"), Some(action.clone()));
	assert!(!result.has_attribute("hy-protected"));

	wait_for("related fragment refresh", || related.query_selector("p").unwrap().is_some()).await;
	assert_eq!(related.query_selector("p").unwrap().unwrap().text_content().as_deref(), Some("posted"));
	assert_eq!(unrelated.inner_html(), "<i>untouched</i>");

	root.remove();
}

#[wasm_bindgen_test]
async fn method_override_field_makes_a_mutation() {
	init_logging();
	let hypha = Hypha::new(Config::default()).unwrap();
	let action = data_url("deleted");
	let root = container(&format!(
		r##"<form id="override-form" action="{action}" method="get" hy-target="#override-result"><input type="hidden" name="_method" value="DELETE"></form>
		<div id="override-result"></div>
		<div id="override-related" hy-src="{action}"><i>stale</i></div>"##,
		action = action,
	));
	let form: HtmlFormElement = by_id("override-form");
	let related: Element = by_id("override-related");

	hypha.handle_form_update(&form, None).await.unwrap();
	wait_for("related fragment refresh", || related.query_selector("p").unwrap().is_some()).await;

	root.remove();
}

#[wasm_bindgen_test]
async fn bound_link_fetches_into_its_target() {
	init_logging();
	let hypha = Hypha::new(Config::default()).unwrap();
	let root = container(&format!(
		r##"<a id="click-link" href="{}" hy-target="#click-result">go</a><div id="click-result"></div>"##,
		data_url("clicked"),
	));
	hypha.bind(Some(&root)).unwrap();
	let link: Element = by_id("click-link");
	let result: Element = by_id("click-result");

	assert!(dispatch(&link, "click"), "default navigation wasn't prevented");
	wait_for("link swap", || result.child_element_count() > 0).await;
	assert_eq!(result.query_selector("p").unwrap().unwrap().text_content().as_deref(), Some("clicked"));
	assert_eq!(result.get_attribute("hy-src"), Some(data_url("clicked")));

	root.remove();
}

#[wasm_bindgen_test]
async fn bound_form_submits_through_fetch() {
	init_logging();
	let hypha = Hypha::new(Config::default()).unwrap();
	let root = container(&format!(
		r##"<div id="submit-fragment" hy-src="/submit-fragment">
			<form id="submit-form" action="{}" method="get" hy-target="fragment"></form>
		</div>"##,
		data_url("submitted"),
	));
	hypha.bind(Some(&root)).unwrap();
	let form: Element = by_id("submit-form");
	let fragment: Element = by_id("submit-fragment");

	assert!(dispatch(&form, "submit"), "default submission wasn't prevented");
	wait_for("form swap", || fragment.query_selector("p").unwrap().is_some()).await;
	assert_eq!(fragment.get_attribute("hy-src"), Some(data_url("submitted")));

	root.remove();
}

#[wasm_bindgen_test]
async fn mutation_target_is_not_refreshed_by_its_own_invalidation() {
	init_logging();
	let hypha = Hypha::new(Config::default()).unwrap();
	let action = data_url("saved");
	let root = container(&format!(
		r##"<form id="own-form" action="{action}" method="post" hy-target="#own-result"></form>
		<div id="own-result" hy-src="{action}"></div>
		<div id="own-related" hy-src="{action}"><i>stale</i></div>"##,
		action = action,
	));
	let form: HtmlFormElement = by_id("own-form");
	let result: Element = by_id("own-result");
	let related: Element = by_id("own-related");

	hypha.handle_form_update(&form, None).await.unwrap();
	// Any later swap of the target would remove this.
	let sentinel = document().create_element("MARK").unwrap();
	result.append_child(&sentinel).unwrap();

	wait_for("related fragment refresh", || related.query_selector("p").unwrap().is_some()).await;
	sleep(100).await;
	assert!(result.contains(Some(sentinel.as_ref())), "the submitted form's target was swapped again");
	assert_eq!(result.query_selector("p").unwrap().unwrap().text_content().as_deref(), Some("saved"));

	root.remove();
}
