#![cfg(target_arch = "wasm32")]

use vnode_dom::{create_element, load::load_child_nodes, web::WebTree, ChildFlags, Kind, PropValue, Props, PropsExt, Renderer};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{window, Element, Node};

wasm_bindgen_test_configure!(run_in_browser);

fn container(html: &str) -> Node {
	let document = window().unwrap().document().unwrap();
	let container = document.create_element("div").unwrap();
	container.set_inner_html(html);
	document.body().unwrap().append_child(&container).unwrap();
	container.into()
}

#[wasm_bindgen_test]
fn load() {
	let container = container(r#"<UL class="list"><li>a</li><!-- skipped --><li style="color: red; font-size: 12px">b</li></UL>"#);
	let loaded = load_child_nodes(&container.child_nodes());
	assert_eq!(loaded.len(), 1);

	let ul = &loaded[0];
	assert_eq!(ul.tag_name(), Some("ul"));
	assert!(ul.live().unwrap().is_same_node(container.first_child().as_ref()));
	assert_eq!(ul.props().unwrap().get("class"), Some(&PropValue::Text("list".to_owned())));

	let items = ul.children().unwrap();
	assert_eq!(items.flags(), ChildFlags::Multiple);
	assert_eq!(items.len(), 2);
	assert_eq!(items.as_slice()[0].children().unwrap().as_slice()[0].kind(), Kind::Text);
	match items.as_slice()[1].props().unwrap().get("style") {
		Some(PropValue::Style(style)) => {
			assert_eq!(style.get("color").map(String::as_str), Some("red"));
			assert_eq!(style.get("font-size").map(String::as_str), Some("12px"));
		}
		other => panic!("expected a parsed style, got {:?}", other),
	}
}

#[wasm_bindgen_test]
fn adopt_and_patch() {
	let container = container(r#"<p class="old">before</p>"#);
	let paragraph = container.first_child().unwrap();

	let mut renderer = Renderer::new(WebTree::for_node(&container).unwrap());
	for vnode in load_child_nodes(&container.child_nodes()) {
		renderer.adopt(vnode, &container).unwrap();
	}

	renderer.render(create_element("p", Props::new().class("new"), "after"), &container).unwrap();
	assert!(paragraph.is_same_node(container.first_child().as_ref()));
	assert_eq!(container.dyn_ref::<Element>().unwrap().inner_html(), r#"<p class="new">after</p>"#);
}
