#![cfg(target_arch = "wasm32")]

use std::{cell::Cell, rc::Rc, sync::Once};
use vnode_dom::{create_element, web::WebTree, Listener, Props, PropsExt, Renderer};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{window, HtmlBodyElement, HtmlElement, Node};

wasm_bindgen_test_configure!(run_in_browser);

static LOG_INIT: Once = Once::new();

#[wasm_bindgen_test]
fn click() {
	//TODO: Fail on warnings and errors.
	LOG_INIT.call_once(tracing_wasm::set_as_global_default);

	let document = window().unwrap().document().unwrap();
	let body = document.body().unwrap().dyn_into::<HtmlBodyElement>().unwrap();
	let container: Node = body.into();
	let mut renderer = Renderer::new(WebTree::for_node(&container).unwrap());

	let click_count = Rc::new(Cell::new(0));
	let listener = {
		let click_count = Rc::clone(&click_count);
		Listener::new(move |event| {
			assert_eq!(event.event_type(), "click");
			event.native::<web_sys::Event>().expect("Expected Event but received something else.");
			click_count.set(click_count.get() + 1);
		})
	};
	let button = |props: Props| create_element("BUTTON", props.with("id", "test-button"), ());

	assert_eq!(click_count.get(), 0);
	renderer.render(button(Props::new().on("click", listener.clone())), &container).unwrap();
	assert_eq!(click_count.get(), 0);

	let element: HtmlElement = document.get_element_by_id("test-button").unwrap().dyn_into().unwrap();
	element.click();
	assert_eq!(click_count.get(), 1);

	// Patching with the same listener keeps the binding.
	renderer.render(button(Props::new().on("click", listener.clone())), &container).unwrap();
	element.click();
	assert_eq!(click_count.get(), 2);

	renderer.render(button(Props::new()), &container).unwrap();
	assert_eq!(renderer.tree().listener_count(), 0);
	element.click();
	assert_eq!(click_count.get(), 2);

	renderer.render(button(Props::new().on("click", listener)), &container).unwrap();
	renderer.unmount(&container).unwrap();
	element.click();
	assert_eq!(click_count.get(), 2);
	assert!(document.get_element_by_id("test-button").is_none());
}

#[wasm_bindgen_test]
fn swapped_listener() {
	LOG_INIT.call_once(tracing_wasm::set_as_global_default);

	let document = window().unwrap().document().unwrap();
	let container: Node = document.create_element("div").unwrap().into();
	document.body().unwrap().append_child(&container).unwrap();
	let mut renderer = Renderer::new(WebTree::new(document));

	let calls = Rc::new(Cell::new((0, 0)));
	let first = {
		let calls = Rc::clone(&calls);
		Listener::new(move |_| calls.set((calls.get().0 + 1, calls.get().1)))
	};
	let second = {
		let calls = Rc::clone(&calls);
		Listener::new(move |_| calls.set((calls.get().0, calls.get().1 + 1)))
	};

	renderer.render(create_element("a", Props::new().on("click", first), "link"), &container).unwrap();
	renderer.render(create_element("a", Props::new().on("click", second), "link"), &container).unwrap();
	assert_eq!(renderer.tree().listener_count(), 1);

	let link: HtmlElement = container.first_child().unwrap().dyn_into().unwrap();
	link.click();
	assert_eq!(calls.get(), (0, 1));
}
