#![cfg(target_arch = "wasm32")]

use std::sync::Once;
use vnode_dom::{create_element, create_text_vnode, style, web::WebTree, Listener, Props, PropsExt, Renderer, VNode};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{window, Element, HtmlBodyElement, Node};

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn text() {
	test_create_diff_identical_remove(|| create_text_vnode("Hello vnode-dom text!"), 0);
}

#[wasm_bindgen_test]
fn multi() {
	test_create_diff_identical_remove(
		|| {
			create_element(
				"p",
				None,
				vec![create_text_vnode("Hello vnode-dom"), create_text_vnode(" multiple "), create_text_vnode("nodes!")],
			)
		},
		0,
	);
}

#[wasm_bindgen_test]
fn minimal_div() {
	test_create_diff_identical_remove(|| create_element("DIV", None, ()), 0);
}

#[wasm_bindgen_test]
fn styled_div() {
	test_create_diff_identical_remove(
		|| create_element("div", Props::new().class("box").style(style([("color", "teal")])).with("id", "styled"), ()),
		0,
	);
}

#[wasm_bindgen_test]
fn clickable_div() {
	let clicked = Listener::new(|_| ());
	test_create_diff_identical_remove(|| create_element("div", Props::new().on("click", clicked.clone()), ()), 1);
}

#[wasm_bindgen_test]
fn shared_listener() {
	let clicked = Listener::new(|_| ());
	test_create_diff_identical_remove(
		|| {
			create_element(
				"div",
				Props::new().on("click", clicked.clone()),
				vec![
					create_element("button", Props::new().on("click", clicked.clone()), "a"),
					create_element("button", Props::new().on("click", clicked.clone()).on("focus", clicked.clone()), "b"),
				],
			)
		},
		1,
	);
}

#[wasm_bindgen_test]
fn distinct_listeners() {
	let (a, b) = (Listener::new(|_| ()), Listener::new(|_| ()));
	test_create_diff_identical_remove(
		|| {
			create_element(
				"div",
				None,
				vec![create_element("button", Props::new().on("click", a.clone()), "a"), create_element("button", Props::new().on("click", b.clone()), "b")],
			)
		},
		2,
	);
}

static LOG_INIT: Once = Once::new();

fn test_create_diff_identical_remove(vdom: impl Fn() -> VNode<Node>, closure_count: usize) {
	//TODO: Fail on warnings and errors.
	LOG_INIT.call_once(tracing_wasm::set_as_global_default);

	let container = container();
	let mut renderer = Renderer::new(WebTree::for_node(&container).unwrap());

	renderer.render(vdom(), &container).unwrap();
	let html = inner_html(&container);
	let first = container.first_child().unwrap();
	assert_eq!(renderer.tree().listener_count(), closure_count);

	renderer.render(vdom(), &container).unwrap();
	assert_eq!(inner_html(&container), html);
	assert!(first.is_same_node(container.first_child().as_ref()));
	assert_eq!(renderer.tree().listener_count(), closure_count);

	renderer.unmount(&container).unwrap();
	assert_eq!(inner_html(&container), "");
	assert_eq!(renderer.tree().listener_count(), 0);
}

fn container() -> Node {
	let document = window().unwrap().document().unwrap();
	let body = document.body().unwrap().dyn_into::<HtmlBodyElement>().unwrap();
	let container = document.create_element("div").unwrap();
	body.append_child(&container).unwrap();
	container.into()
}

fn inner_html(node: &Node) -> String {
	node.dyn_ref::<Element>().unwrap().inner_html()
}
