//! Builds [`VNode`]s from existing DOM content, with their live nodes already attached.
//!
//! Combined with [`Renderer::adopt`](`crate::Renderer::adopt`), this lets a renderer take over markup it didn't create itself.
//! Comments and other non-element, non-text nodes are skipped.

use crate::{
	factory::{create_element, create_text_vnode, Children},
	vnode::{PropValue, Props, Style, VNode},
};
use tracing::{instrument, warn};
use wasm_bindgen::JsCast;
use web_sys::{Attr, Element, NamedNodeMap, Node, NodeList, Text};

/// Loads all (supported) child nodes of `node`.
#[instrument]
pub fn load_child_nodes(child_nodes: &NodeList) -> Vec<VNode<Node>> {
	(0..child_nodes.length())
		.filter_map(|i| child_nodes.item(i))
		.filter_map(|child| load_node(&child))
		.collect()
}

/// Loads `node` and its subtree, or returns [`None`] for unsupported node types.
pub fn load_node(node: &Node) -> Option<VNode<Node>> {
	if let Some(element) = node.dyn_ref::<Element>() {
		Some(load_element(element))
	} else if let Some(text) = node.dyn_ref::<Text>() {
		let mut vnode = create_text_vnode(text.data());
		vnode.live = Some(node.clone());
		Some(vnode)
	} else {
		warn!("Skipping unsupported node: {:?}", node);
		None
	}
}

/// Note that the tag name is lowercased, so that it matches VNodes created with the usual (lowercase) HTML names.
pub fn load_element(element: &Element) -> VNode<Node> {
	let node: &Node = element.as_ref();
	let children = load_child_nodes(&node.child_nodes());
	let mut vnode = create_element(element.tag_name().to_ascii_lowercase(), load_attributes(&element.attributes()), Children::List(children));
	vnode.live = Some(node.clone());
	vnode
}

/// `class` and `style` attributes are mapped onto the matching properties.
pub fn load_attributes(attributes: &NamedNodeMap) -> Props {
	(0..attributes.length())
		.filter_map(|i| attributes.item(i))
		.map(|attribute| load_attribute(&attribute))
		.collect()
}

pub fn load_attribute(attribute: &Attr) -> (String, PropValue) {
	let name = attribute.name();
	let value = attribute.value();
	let value = if name == "style" {
		PropValue::Style(parse_style(&value))
	} else {
		PropValue::Text(value)
	};
	(name, value)
}

/// Parses inline style declarations like `"color: red; font-size: 12px"`.
#[must_use]
pub fn parse_style(declarations: &str) -> Style {
	declarations
		.split(';')
		.filter_map(|declaration| {
			let (name, value) = declaration.split_once(':')?;
			let name = name.trim();
			(!name.is_empty()).then(|| (name.to_owned(), value.trim().to_owned()))
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::parse_style;

	#[test]
	fn inline_styles() {
		let style = parse_style(" color: red;font-size:12px ; ; background: url(a:b) ");
		assert_eq!(style.len(), 3);
		assert_eq!(style["color"], "red");
		assert_eq!(style["font-size"], "12px");
		assert_eq!(style["background"], "url(a:b)");
		assert!(parse_style("").is_empty());
		assert!(parse_style(": orphan").is_empty());
	}
}
