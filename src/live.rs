//! The narrow interface to a retained-mode UI tree.

use crate::vnode::Listener;
use core::fmt::Debug;

/// A retained-mode tree that VNodes can be materialized into.
///
/// Handles are expected to be cheap to clone and to refer to the same live node when cloned.
/// Implementors report failures through [`LiveTree::Error`]; the renderer propagates these unchanged.
pub trait LiveTree {
	type Node: Clone + Debug;
	type Error: std::error::Error + 'static;

	fn create_element(&mut self, tag_name: &str) -> Result<Self::Node, Self::Error>;
	fn create_text(&mut self, content: &str) -> Result<Self::Node, Self::Error>;

	/// Overwrites the content of a live text node.
	fn set_text(&mut self, node: &Self::Node, content: &str) -> Result<(), Self::Error>;

	fn set_style(&mut self, node: &Self::Node, name: &str, value: &str) -> Result<(), Self::Error>;
	fn clear_style(&mut self, node: &Self::Node, name: &str) -> Result<(), Self::Error>;

	fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str) -> Result<(), Self::Error>;
	fn remove_attribute(&mut self, node: &Self::Node, name: &str) -> Result<(), Self::Error>;

	fn set_class(&mut self, node: &Self::Node, class: &str) -> Result<(), Self::Error>;

	/// Binds `listener` to `node` itself (not to a shared ancestor) for `event_type`.
	fn add_listener(&mut self, node: &Self::Node, event_type: &str, listener: &Listener) -> Result<(), Self::Error>;
	fn remove_listener(&mut self, node: &Self::Node, event_type: &str, listener: &Listener) -> Result<(), Self::Error>;

	/// Inserts `node` into `parent` before `reference`, or appends it if `reference` is [`None`].
	fn insert_before(&mut self, parent: &Self::Node, node: &Self::Node, reference: Option<&Self::Node>) -> Result<(), Self::Error>;
	fn remove_child(&mut self, parent: &Self::Node, node: &Self::Node) -> Result<(), Self::Error>;

	/// Node identity, used to tell containers apart.
	fn is_same_node(&self, a: &Self::Node, b: &Self::Node) -> bool;
}
