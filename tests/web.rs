//! Browser tests; run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use uop_viz::viewer::{ClientError, Cursor, Viewer, ViewerConfig, fetch_graph};
use wasm_bindgen_test::*;
use web_sys::{KeyboardEvent, KeyboardEventInit};

wasm_bindgen_test_configure!(run_in_browser);

fn data_url(body: &str) -> String {
	format!(
		"data:application/json,{}",
		String::from(js_sys::encode_uri_component(body))
	)
}

fn key_event(key: &str) -> KeyboardEvent {
	let init = KeyboardEventInit::new();
	init.set_key(key);
	KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).unwrap()
}

#[wasm_bindgen_test]
fn dom_key_events_drive_the_cursor() {
	let mut viewer = Viewer::new(ViewerConfig::default());
	let urls: Vec<String> = ["ArrowRight", "ArrowRight", "x", "ArrowLeft"]
		.into_iter()
		.filter_map(|k| viewer.handle_key(&key_event(k).key()))
		.map(|req| req.url)
		.collect();

	assert_eq!(urls, ["/1", "/2", "/1"]);
	assert_eq!(viewer.cursor(), Cursor(1));
}

#[wasm_bindgen_test]
fn left_at_zero_stays_at_zero() {
	let mut viewer = Viewer::new(ViewerConfig::default());
	let req = viewer.handle_key(&key_event("ArrowLeft").key()).unwrap();
	assert_eq!(req.cursor, Cursor(0));
	assert_eq!(req.url, "/0");
}

#[wasm_bindgen_test]
async fn fetch_decodes_a_graph_document() {
	let url = data_url(r#"{"a": ["A", 0, [], 0, "red"], "b": ["B", 0, ["a"], 0, "blue"]}"#);
	let graph = fetch_graph(&url).await.unwrap().into_graph_data();
	assert_eq!(graph.nodes.len(), 2);
	assert_eq!(graph.links.len(), 1);
}

#[wasm_bindgen_test]
async fn fetch_reports_malformed_bodies() {
	let err = fetch_graph(&data_url("not a graph")).await.unwrap_err();
	assert!(matches!(err, ClientError::Decode(_)), "{err:?}");
}
