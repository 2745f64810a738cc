//! A [`LiveTree`] backed by the browser DOM.
//!
//! # Event Listeners
//!
//! Each distinct [`Listener`] is wrapped into a single [***JavaScript***](https://developer.mozilla.org/en-US/docs/Web/JavaScript) closure,
//! which is shared by all elements it's bound to and reference-counted per [`WebTree`] instance.
//! The closure is freed once its last binding is removed.
//!
//! Bound listeners start throwing errors into JavaScript if the [`WebTree`] is dropped while they're still attached.

use crate::{
	live::LiveTree,
	rc_hash_map::{CountSaturatedError, RcHashMap},
	vnode::{Event, Listener},
};
use js_sys::Function;
use thiserror::Error;
use tracing::{error, info, instrument, trace, trace_span};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};

#[derive(Debug, Clone, Error)]
pub enum WebError {
	#[error("JavaScript error: {0:?}")]
	Js(JsValue),
	#[error("expected an element but found {0:?}")]
	NotAnElement(web_sys::Node),
	/// Only HTML elements have an inline style here.
	#[error("{0:?} has no inline style")]
	NotStylable(web_sys::Element),
	#[error("too many (more than 65k) active bindings of the same listener")]
	TooManyBindings,
}

impl From<JsValue> for WebError {
	fn from(value: JsValue) -> Self {
		WebError::Js(value)
	}
}

impl From<CountSaturatedError> for WebError {
	fn from(_: CountSaturatedError) -> Self {
		WebError::TooManyBindings
	}
}

/// Materializes VNodes into the [***Document***](https://developer.mozilla.org/en-US/docs/Web/API/Document) it's created for.
#[derive(Debug)]
pub struct WebTree {
	document: web_sys::Document,
	listeners: RcHashMap<Listener, u16, Closure<dyn Fn(web_sys::Event)>>,
}

impl WebTree {
	#[must_use]
	#[instrument]
	pub fn new(document: web_sys::Document) -> Self {
		Self {
			document,
			listeners: RcHashMap::new(),
		}
	}

	/// Creates a tree for the document that owns `node`, if there is one.
	#[must_use]
	pub fn for_node(node: &web_sys::Node) -> Option<Self> {
		node.owner_document().map(Self::new)
	}

	#[must_use]
	pub fn document(&self) -> &web_sys::Document {
		&self.document
	}

	/// How many distinct listeners currently have a JavaScript closure.
	#[must_use]
	pub fn listener_count(&self) -> usize {
		self.listeners.len()
	}

	fn element<'a>(node: &'a web_sys::Node) -> Result<&'a web_sys::Element, WebError> {
		node.dyn_ref::<web_sys::Element>().ok_or_else(|| WebError::NotAnElement(node.clone()))
	}

	fn style(node: &web_sys::Node) -> Result<web_sys::CssStyleDeclaration, WebError> {
		let element = Self::element(node)?;
		element
			.dyn_ref::<web_sys::HtmlElement>()
			.map(web_sys::HtmlElement::style)
			.ok_or_else(|| WebError::NotStylable(element.clone()))
	}
}

impl LiveTree for WebTree {
	type Node = web_sys::Node;
	type Error = WebError;

	fn create_element(&mut self, tag_name: &str) -> Result<web_sys::Node, WebError> {
		self.document.create_element(tag_name).map(Into::into).map_err(|error| {
			error!("Failed to create <{}>: {:?}", tag_name, error);
			error.into()
		})
	}

	fn create_text(&mut self, content: &str) -> Result<web_sys::Node, WebError> {
		Ok(self.document.create_text_node(content).into())
	}

	fn set_text(&mut self, node: &web_sys::Node, content: &str) -> Result<(), WebError> {
		node.set_node_value(Some(content));
		Ok(())
	}

	fn set_style(&mut self, node: &web_sys::Node, name: &str, value: &str) -> Result<(), WebError> {
		Self::style(node)?.set_property(&css_property_name(name), value).map_err(|error| {
			error!("Failed to set style {:?}: {:?}", name, error);
			error.into()
		})
	}

	fn clear_style(&mut self, node: &web_sys::Node, name: &str) -> Result<(), WebError> {
		Self::style(node)?.remove_property(&css_property_name(name)).map(drop).map_err(|error| {
			error!("Failed to clear style {:?}: {:?}", name, error);
			error.into()
		})
	}

	fn set_attribute(&mut self, node: &web_sys::Node, name: &str, value: &str) -> Result<(), WebError> {
		Self::element(node)?.set_attribute(name, value).map_err(|error| {
			error!("Could not set attribute {:?}: {:?}", name, error);
			error.into()
		})
	}

	fn remove_attribute(&mut self, node: &web_sys::Node, name: &str) -> Result<(), WebError> {
		Self::element(node)?.remove_attribute(name).map_err(|error| {
			error!("Could not remove attribute {:?}: {:?}", name, error);
			error.into()
		})
	}

	fn set_class(&mut self, node: &web_sys::Node, class: &str) -> Result<(), WebError> {
		Self::element(node)?.set_class_name(class);
		Ok(())
	}

	#[instrument(skip(self, node, listener))]
	fn add_listener(&mut self, node: &web_sys::Node, event_type: &str, listener: &Listener) -> Result<(), WebError> {
		let closure = self.listeners.increment_or_insert_with(listener.clone(), |listener| {
			let listener = listener.clone();
			trace!("Creating closure.");
			Closure::wrap(Box::new(move |event: web_sys::Event| {
				let event_type = event.type_();
				let span = trace_span!("Dispatching", event_type = event_type.as_str());
				let _enter = span.enter();
				listener.call(&Event::new(&event_type, &event));
			}) as Box<dyn Fn(web_sys::Event)>)
		})?;
		node.add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref::<Function>()).map_err(|error| {
			error!("Failed to add event listener {:?}: {:?}", event_type, error);
			error.into()
		})
	}

	#[instrument(skip(self, node, listener))]
	fn remove_listener(&mut self, node: &web_sys::Node, event_type: &str, listener: &Listener) -> Result<(), WebError> {
		let result = match self.listeners.weak_decrement(listener)? {
			Some(closure) => node.remove_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref::<Function>()).map_err(|error| {
				error!("Failed to remove event listener {:?}: {:?}", event_type, error);
				error.into()
			}),
			None => {
				error!("Tried to remove event listener {:?} that was never added.", event_type);
				Ok(())
			}
		};

		let freed = self.listeners.drain_weak().count();
		if freed > 0 {
			trace!("Freed {} closure(s).", freed);
		}
		info!("Listener closure count/cached capacity: {}/{}", self.listeners.len(), self.listeners.capacity());
		result
	}

	fn insert_before(&mut self, parent: &web_sys::Node, node: &web_sys::Node, reference: Option<&web_sys::Node>) -> Result<(), WebError> {
		parent.insert_before(node, reference).map(drop).map_err(|error| {
			error!("Failed to insert node: {:?}", error);
			error.into()
		})
	}

	fn remove_child(&mut self, parent: &web_sys::Node, node: &web_sys::Node) -> Result<(), WebError> {
		parent.remove_child(node).map(drop).map_err(|error| {
			error!("Failed to remove the node: {:?}", error);
			error.into()
		})
	}

	fn is_same_node(&self, a: &web_sys::Node, b: &web_sys::Node) -> bool {
		a.is_same_node(Some(b))
	}
}

/// Converts `camelCase` style names to CSS property names (`fontSize` → `font-size`).
///
/// Names that already contain a dash, like custom properties, are passed through.
#[must_use]
pub fn css_property_name(name: &str) -> String {
	if name.contains('-') {
		return name.to_owned();
	}
	let mut css = String::with_capacity(name.len() + 2);
	for c in name.chars() {
		if c.is_ascii_uppercase() {
			css.push('-');
			css.push(c.to_ascii_lowercase());
		} else {
			css.push(c);
		}
	}
	css
}

#[cfg(test)]
mod tests {
	use super::css_property_name;

	#[test]
	fn property_names() {
		assert_eq!(css_property_name("color"), "color");
		assert_eq!(css_property_name("fontSize"), "font-size");
		assert_eq!(css_property_name("borderTopWidth"), "border-top-width");
		assert_eq!(css_property_name("--mainColor"), "--mainColor");
		assert_eq!(css_property_name("font-size"), "font-size");
	}
}
