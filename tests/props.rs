use std::{cell::Cell, rc::Rc};
use vnode_dom::{
	create_element, patch_property,
	memory::{MemoryTree, Mutation, NodeId},
	style, Error, LiveTree, Listener, PropValue, Props, PropsExt, Renderer, VNode, Violation,
};

fn element(tree: &mut MemoryTree) -> NodeId {
	let node = tree.create_element("div").unwrap();
	tree.take_mutations();
	node
}

fn sorted(mut mutations: Vec<Mutation>) -> Vec<Mutation> {
	mutations.sort_by_key(|mutation| format!("{:?}", mutation));
	mutations
}

#[test]
fn style_delta() {
	let mut tree = MemoryTree::new();
	let div = element(&mut tree);
	let previous = PropValue::Style(style([("color", "red"), ("fontSize", "12px")]));
	let next = PropValue::Style(style([("color", "blue")]));

	patch_property(&mut tree, &div, "style", None, Some(&previous)).unwrap();
	tree.take_mutations();
	patch_property(&mut tree, &div, "style", Some(&previous), Some(&next)).unwrap();

	assert_eq!(
		sorted(tree.take_mutations()),
		vec![
			Mutation::ClearStyle {
				node: div,
				name: "fontSize".to_owned()
			},
			Mutation::SetStyle {
				node: div,
				name: "color".to_owned(),
				value: "blue".to_owned()
			},
		]
	);
	assert_eq!(tree.style(div, "color"), Some("blue"));
	assert_eq!(tree.style(div, "fontSize"), None);
}

#[test]
fn unchanged_style_entries_are_set_again() {
	let mut tree = MemoryTree::new();
	let div = element(&mut tree);
	let style = PropValue::Style(style([("color", "red")]));

	patch_property(&mut tree, &div, "style", Some(&style), Some(&style)).unwrap();
	assert_eq!(
		tree.take_mutations(),
		vec![Mutation::SetStyle {
			node: div,
			name: "color".to_owned(),
			value: "red".to_owned()
		}]
	);
}

#[test]
fn removing_style_clears_every_entry() {
	let mut tree = MemoryTree::new();
	let div = element(&mut tree);
	let previous = PropValue::Style(style([("color", "red"), ("margin", "0")]));

	patch_property(&mut tree, &div, "style", None, Some(&previous)).unwrap();
	patch_property(&mut tree, &div, "style", Some(&previous), None).unwrap();
	assert_eq!(tree.to_html(div), "<div></div>");
}

#[test]
fn class_is_replaced_wholesale() {
	let mut tree = MemoryTree::new();
	let div = element(&mut tree);

	patch_property(&mut tree, &div, "class", None, Some(&"a b".into())).unwrap();
	patch_property(&mut tree, &div, "class", Some(&"a b".into()), Some(&"c".into())).unwrap();
	assert_eq!(tree.class(div), Some("c"));

	patch_property(&mut tree, &div, "class", Some(&"c".into()), None).unwrap();
	assert_eq!(tree.class(div), Some(""));
	assert_eq!(
		tree.take_mutations().last(),
		Some(&Mutation::SetClass {
			node: div,
			class: String::new()
		})
	);
}

#[test]
fn generic_attributes() {
	let mut tree = MemoryTree::new();
	let input = element(&mut tree);

	patch_property(&mut tree, &input, "id", None, Some(&"name".into())).unwrap();
	patch_property(&mut tree, &input, "tabindex", None, Some(&2.into())).unwrap();
	patch_property(&mut tree, &input, "disabled", None, Some(&true.into())).unwrap();
	assert_eq!(tree.to_html(input), r#"<div disabled id="name" tabindex="2"></div>"#);

	patch_property(&mut tree, &input, "disabled", Some(&true.into()), Some(&false.into())).unwrap();
	patch_property(&mut tree, &input, "id", Some(&"name".into()), None).unwrap();
	assert_eq!(tree.to_html(input), r#"<div tabindex="2"></div>"#);
}

#[test]
fn listeners_are_bound_to_the_node() {
	let mut tree = MemoryTree::new();
	let a = element(&mut tree);
	let b = element(&mut tree);

	let clicks = Rc::new(Cell::new(0));
	let listener = {
		let clicks = Rc::clone(&clicks);
		Listener::new(move |event| {
			assert_eq!(event.event_type(), "click");
			assert!(event.native::<NodeId>().is_some());
			clicks.set(clicks.get() + 1)
		})
	};
	let value = PropValue::Listener(listener);

	patch_property(&mut tree, &a, "@click", None, Some(&value)).unwrap();
	patch_property(&mut tree, &b, "@click", None, Some(&value)).unwrap();
	assert_eq!(tree.dispatch(a, "click"), 1);
	assert_eq!(tree.dispatch(b, "click"), 1);
	assert_eq!(clicks.get(), 2);

	// Detaching from one node leaves the other one alone.
	patch_property(&mut tree, &a, "@click", Some(&value), None).unwrap();
	assert_eq!(tree.dispatch(a, "click"), 0);
	assert_eq!(tree.dispatch(b, "click"), 1);
	assert_eq!(clicks.get(), 3);
}

#[test]
fn swapping_listeners() {
	let mut tree = MemoryTree::new();
	let button = element(&mut tree);
	let first = PropValue::Listener(Listener::new(|_| ()));
	let second = PropValue::Listener(Listener::new(|_| ()));

	patch_property(&mut tree, &button, "@input", None, Some(&first)).unwrap();
	tree.take_mutations();

	patch_property(&mut tree, &button, "@input", Some(&first), Some(&first.clone())).unwrap();
	assert!(tree.take_mutations().is_empty());

	patch_property(&mut tree, &button, "@input", Some(&first), Some(&second)).unwrap();
	assert_eq!(
		tree.take_mutations(),
		vec![
			Mutation::RemoveListener {
				node: button,
				event_type: "input".to_owned()
			},
			Mutation::AddListener {
				node: button,
				event_type: "input".to_owned()
			},
		]
	);
	assert_eq!(tree.listener_count(button, "input"), 1);
}

#[test]
fn mismatched_values_are_rejected_before_writing() {
	let mut tree = MemoryTree::new();
	let div = element(&mut tree);

	let error = patch_property(&mut tree, &div, "style", None, Some(&"color: red".into())).unwrap_err();
	assert_eq!(
		error.violation(),
		Some(&Violation::UnexpectedValue {
			name: "style".to_owned(),
			expected: "style",
			found: "text",
		})
	);

	let listener = PropValue::Listener(Listener::new(|_| ()));
	assert!(matches!(patch_property(&mut tree, &div, "title", None, Some(&listener)), Err(Error::Contract(_))));
	assert!(matches!(patch_property(&mut tree, &div, "@click", None, Some(&"alert()".into())), Err(Error::Contract(_))));
	assert!(tree.take_mutations().is_empty());
}

/// Old `{a: 1, b: 2}`, new `{b: 3, c: 4}`: each of `a`, `b` and `c` is touched exactly once.
#[test]
fn element_property_delta_is_complete() {
	let mut tree = MemoryTree::new();
	let root = tree.create_root();
	let mut renderer = Renderer::new(tree);

	let node = |props: Props| -> VNode<NodeId> { create_element("div", props, ()) };
	renderer.render(node(Props::new().with("a", 1).with("b", 2)), &root).unwrap();
	let div = *renderer.rendered(&root).unwrap().live().unwrap();
	renderer.tree_mut().take_mutations();

	renderer.render(node(Props::new().with("b", 3).with("c", 4)), &root).unwrap();
	assert_eq!(
		sorted(renderer.tree_mut().take_mutations()),
		vec![
			Mutation::RemoveAttribute { node: div, name: "a".to_owned() },
			Mutation::SetAttribute {
				node: div,
				name: "b".to_owned(),
				value: "3".to_owned()
			},
			Mutation::SetAttribute {
				node: div,
				name: "c".to_owned(),
				value: "4".to_owned()
			},
		]
	);
}

#[test]
fn falsy_dropped_properties_are_left_alone() {
	let mut tree = MemoryTree::new();
	let root = tree.create_root();
	let mut renderer = Renderer::new(tree);

	renderer.render(create_element("div", Props::new().with("hidden", false).with("title", ""), ()), &root).unwrap();
	renderer.tree_mut().take_mutations();

	renderer.render(create_element("div", None, ()), &root).unwrap();
	assert!(renderer.tree().mutations().is_empty());
}
