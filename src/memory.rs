//! A headless [`LiveTree`] that keeps its nodes in an arena and logs every mutation.
//!
//! Useful for tests and for rendering without a browser.
//!
//! ```
//! use vnode_dom::{create_element, memory::MemoryTree, Renderer};
//!
//! let mut tree = MemoryTree::new();
//! let root = tree.create_root();
//! let mut renderer = Renderer::new(tree);
//!
//! renderer.render(create_element("p", None, "Hello!"), &root).unwrap();
//! assert_eq!(renderer.tree().to_html(root), "<p>Hello!</p>");
//! ```

use crate::{
	live::LiveTree,
	vnode::{Event, Listener},
};
use hashbrown::{HashMap, HashSet};
use thiserror::Error;
use tracing::trace;

/// Handle of a node in a [`MemoryTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// One primitive call on a [`MemoryTree`], as recorded in its log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
	CreateElement { node: NodeId, tag_name: String },
	CreateText { node: NodeId, content: String },
	SetText { node: NodeId, content: String },
	SetStyle { node: NodeId, name: String, value: String },
	ClearStyle { node: NodeId, name: String },
	SetAttribute { node: NodeId, name: String, value: String },
	RemoveAttribute { node: NodeId, name: String },
	SetClass { node: NodeId, class: String },
	AddListener { node: NodeId, event_type: String },
	RemoveListener { node: NodeId, event_type: String },
	Insert { parent: NodeId, node: NodeId, reference: Option<NodeId> },
	Remove { parent: NodeId, node: NodeId },
}

impl Mutation {
	/// The node this mutation targets (for insertions and removals, the child).
	#[must_use]
	pub fn node(&self) -> NodeId {
		match *self {
			Mutation::CreateElement { node, .. }
			| Mutation::CreateText { node, .. }
			| Mutation::SetText { node, .. }
			| Mutation::SetStyle { node, .. }
			| Mutation::ClearStyle { node, .. }
			| Mutation::SetAttribute { node, .. }
			| Mutation::RemoveAttribute { node, .. }
			| Mutation::SetClass { node, .. }
			| Mutation::AddListener { node, .. }
			| Mutation::RemoveListener { node, .. }
			| Mutation::Insert { node, .. }
			| Mutation::Remove { node, .. } => node,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
	#[error("unknown node {0:?}")]
	UnknownNode(NodeId),
	#[error("{0:?} can't have children, attributes or listeners")]
	NotAnElement(NodeId),
	#[error("{0:?} is not a text node")]
	NotText(NodeId),
	#[error("{node:?} is not a child of {parent:?}")]
	NotAChild { parent: NodeId, node: NodeId },
	#[error("no {event_type:?} listener like this is bound to {node:?}")]
	UnknownListener { node: NodeId, event_type: String },
	#[error("creating <{0}> elements was configured to fail")]
	Rejected(String),
}

#[derive(Debug)]
enum Data {
	Root,
	Element(ElementData),
	Text(String),
}

#[derive(Debug, Default)]
struct ElementData {
	tag_name: String,
	attributes: HashMap<String, String>,
	class: String,
	style: HashMap<String, String>,
	listeners: Vec<(String, Listener)>,
}

#[derive(Debug)]
struct MemoryNode {
	data: Data,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
}

/// See the [module documentation](`self`).
#[derive(Debug, Default)]
pub struct MemoryTree {
	nodes: Vec<MemoryNode>,
	log: Vec<Mutation>,
	rejected_tags: HashSet<String>,
}

impl MemoryTree {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a detached container node. This isn't logged.
	pub fn create_root(&mut self) -> NodeId {
		self.push(Data::Root)
	}

	/// Makes every following [`LiveTree::create_element`] call for `tag_name` fail with [`MemoryError::Rejected`].
	pub fn reject_tag(&mut self, tag_name: &str) {
		self.rejected_tags.insert(tag_name.to_owned());
	}

	pub fn accept_all_tags(&mut self) {
		self.rejected_tags.clear();
	}

	#[must_use]
	pub fn mutations(&self) -> &[Mutation] {
		&self.log
	}

	pub fn take_mutations(&mut self) -> Vec<Mutation> {
		core::mem::take(&mut self.log)
	}

	/// How many nodes were created overall, including roots.
	#[must_use]
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	#[must_use]
	pub fn children(&self, node: NodeId) -> &[NodeId] {
		self.nodes.get(node.0).map_or(&[][..], |n| n.children.as_slice())
	}

	#[must_use]
	pub fn parent(&self, node: NodeId) -> Option<NodeId> {
		self.nodes.get(node.0)?.parent
	}

	#[must_use]
	pub fn tag_name(&self, node: NodeId) -> Option<&str> {
		self.element(node).ok().map(|element| element.tag_name.as_str())
	}

	#[must_use]
	pub fn text(&self, node: NodeId) -> Option<&str> {
		match &self.nodes.get(node.0)?.data {
			Data::Text(content) => Some(content),
			Data::Root | Data::Element(_) => None,
		}
	}

	#[must_use]
	pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
		self.element(node).ok()?.attributes.get(name).map(String::as_str)
	}

	#[must_use]
	pub fn class(&self, node: NodeId) -> Option<&str> {
		self.element(node).ok().map(|element| element.class.as_str())
	}

	#[must_use]
	pub fn style(&self, node: NodeId, name: &str) -> Option<&str> {
		self.element(node).ok()?.style.get(name).map(String::as_str)
	}

	#[must_use]
	pub fn listener_count(&self, node: NodeId, event_type: &str) -> usize {
		self.element(node).map_or(0, |element| element.listeners.iter().filter(|(t, _)| t == event_type).count())
	}

	/// Calls every listener bound to `node` for `event_type`, in binding order.
	///
	/// The [`Event`] handed to listeners carries `node` as its native value.
	/// Returns how many listeners were called.
	pub fn dispatch(&self, node: NodeId, event_type: &str) -> usize {
		let listeners: Vec<Listener> = match self.element(node) {
			Ok(element) => element.listeners.iter().filter(|(t, _)| t == event_type).map(|(_, l)| l.clone()).collect(),
			Err(_) => return 0,
		};
		for listener in &listeners {
			listener.call(&Event::new(event_type, &node));
		}
		listeners.len()
	}

	/// Serializes the subtree of `node` as HTML.
	///
	/// Attributes (including `class` and `style`) and style declarations are sorted by name.
	/// For roots, only the content is serialized.
	#[must_use]
	pub fn to_html(&self, node: NodeId) -> String {
		let mut html = String::new();
		self.write_html(node, &mut html);
		html
	}

	fn write_html(&self, node: NodeId, html: &mut String) {
		let memory_node = match self.nodes.get(node.0) {
			Some(memory_node) => memory_node,
			None => return,
		};
		match &memory_node.data {
			Data::Root => {
				for &child in &memory_node.children {
					self.write_html(child, html)
				}
			}
			Data::Text(content) => html.push_str(&escape(content)),
			Data::Element(element) => {
				let mut attributes: Vec<(&str, String)> = element.attributes.iter().map(|(name, value)| (name.as_str(), value.clone())).collect();
				if !element.class.is_empty() {
					attributes.push(("class", element.class.clone()));
				}
				if !element.style.is_empty() {
					let mut declarations: Vec<_> = element.style.iter().collect();
					declarations.sort();
					let style = declarations.iter().map(|(name, value)| format!("{}: {}", name, value)).collect::<Vec<_>>().join("; ");
					attributes.push(("style", style));
				}
				attributes.sort();

				html.push('<');
				html.push_str(&element.tag_name);
				for (name, value) in attributes {
					html.push(' ');
					html.push_str(name);
					if !value.is_empty() {
						html.push_str("=\"");
						html.push_str(&escape(&value).replace('"', "&quot;"));
						html.push('"');
					}
				}
				html.push('>');
				for &child in &memory_node.children {
					self.write_html(child, html)
				}
				html.push_str("</");
				html.push_str(&element.tag_name);
				html.push('>');
			}
		}
	}

	fn push(&mut self, data: Data) -> NodeId {
		let id = NodeId(self.nodes.len());
		self.nodes.push(MemoryNode { data, parent: None, children: Vec::new() });
		id
	}

	fn node(&self, node: NodeId) -> Result<&MemoryNode, MemoryError> {
		self.nodes.get(node.0).ok_or(MemoryError::UnknownNode(node))
	}

	fn node_mut(&mut self, node: NodeId) -> Result<&mut MemoryNode, MemoryError> {
		self.nodes.get_mut(node.0).ok_or(MemoryError::UnknownNode(node))
	}

	fn element(&self, node: NodeId) -> Result<&ElementData, MemoryError> {
		match &self.node(node)?.data {
			Data::Element(element) => Ok(element),
			Data::Root | Data::Text(_) => Err(MemoryError::NotAnElement(node)),
		}
	}

	fn element_mut(&mut self, node: NodeId) -> Result<&mut ElementData, MemoryError> {
		match &mut self.node_mut(node)?.data {
			Data::Element(element) => Ok(element),
			Data::Root | Data::Text(_) => Err(MemoryError::NotAnElement(node)),
		}
	}

	fn detach(&mut self, node: NodeId) -> Result<(), MemoryError> {
		let parent = self.node_mut(node)?.parent.take();
		if let Some(parent) = parent {
			self.node_mut(parent)?.children.retain(|&child| child != node);
		}
		Ok(())
	}

	fn record(&mut self, mutation: Mutation) {
		trace!(?mutation, "Recording mutation.");
		self.log.push(mutation)
	}
}

impl LiveTree for MemoryTree {
	type Node = NodeId;
	type Error = MemoryError;

	fn create_element(&mut self, tag_name: &str) -> Result<NodeId, MemoryError> {
		if self.rejected_tags.contains(tag_name) {
			return Err(MemoryError::Rejected(tag_name.to_owned()));
		}
		let node = self.push(Data::Element(ElementData {
			tag_name: tag_name.to_owned(),
			..ElementData::default()
		}));
		self.record(Mutation::CreateElement {
			node,
			tag_name: tag_name.to_owned(),
		});
		Ok(node)
	}

	fn create_text(&mut self, content: &str) -> Result<NodeId, MemoryError> {
		let node = self.push(Data::Text(content.to_owned()));
		self.record(Mutation::CreateText {
			node,
			content: content.to_owned(),
		});
		Ok(node)
	}

	fn set_text(&mut self, node: &NodeId, content: &str) -> Result<(), MemoryError> {
		let node = *node;
		match &mut self.node_mut(node)?.data {
			Data::Text(text) => *text = content.to_owned(),
			Data::Root | Data::Element(_) => return Err(MemoryError::NotText(node)),
		}
		self.record(Mutation::SetText {
			node,
			content: content.to_owned(),
		});
		Ok(())
	}

	fn set_style(&mut self, node: &NodeId, name: &str, value: &str) -> Result<(), MemoryError> {
		self.element_mut(*node)?.style.insert(name.to_owned(), value.to_owned());
		self.record(Mutation::SetStyle {
			node: *node,
			name: name.to_owned(),
			value: value.to_owned(),
		});
		Ok(())
	}

	fn clear_style(&mut self, node: &NodeId, name: &str) -> Result<(), MemoryError> {
		self.element_mut(*node)?.style.remove(name);
		self.record(Mutation::ClearStyle { node: *node, name: name.to_owned() });
		Ok(())
	}

	fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> Result<(), MemoryError> {
		self.element_mut(*node)?.attributes.insert(name.to_owned(), value.to_owned());
		self.record(Mutation::SetAttribute {
			node: *node,
			name: name.to_owned(),
			value: value.to_owned(),
		});
		Ok(())
	}

	fn remove_attribute(&mut self, node: &NodeId, name: &str) -> Result<(), MemoryError> {
		self.element_mut(*node)?.attributes.remove(name);
		self.record(Mutation::RemoveAttribute { node: *node, name: name.to_owned() });
		Ok(())
	}

	fn set_class(&mut self, node: &NodeId, class: &str) -> Result<(), MemoryError> {
		self.element_mut(*node)?.class = class.to_owned();
		self.record(Mutation::SetClass {
			node: *node,
			class: class.to_owned(),
		});
		Ok(())
	}

	/// Binding the same listener twice for the same event type is a no-op, as in the DOM.
	fn add_listener(&mut self, node: &NodeId, event_type: &str, listener: &Listener) -> Result<(), MemoryError> {
		let element = self.element_mut(*node)?;
		if !element.listeners.iter().any(|(t, l)| t == event_type && l == listener) {
			element.listeners.push((event_type.to_owned(), listener.clone()));
		}
		self.record(Mutation::AddListener {
			node: *node,
			event_type: event_type.to_owned(),
		});
		Ok(())
	}

	/// Unlike the DOM, removing a listener that isn't bound is an error here.
	fn remove_listener(&mut self, node: &NodeId, event_type: &str, listener: &Listener) -> Result<(), MemoryError> {
		let element = self.element_mut(*node)?;
		let index = element
			.listeners
			.iter()
			.position(|(t, l)| t == event_type && l == listener)
			.ok_or_else(|| MemoryError::UnknownListener {
				node: *node,
				event_type: event_type.to_owned(),
			})?;
		element.listeners.remove(index);
		self.record(Mutation::RemoveListener {
			node: *node,
			event_type: event_type.to_owned(),
		});
		Ok(())
	}

	fn insert_before(&mut self, parent: &NodeId, node: &NodeId, reference: Option<&NodeId>) -> Result<(), MemoryError> {
		let (parent, node, reference) = (*parent, *node, reference.copied());
		if let Data::Text(_) = self.node(parent)?.data {
			return Err(MemoryError::NotAnElement(parent));
		}
		self.node(node)?;
		if let Some(reference) = reference {
			if self.node(reference)?.parent != Some(parent) {
				return Err(MemoryError::NotAChild { parent, node: reference });
			}
		}

		self.detach(node)?;
		let siblings = &mut self.node_mut(parent)?.children;
		let index = reference.and_then(|reference| siblings.iter().position(|&sibling| sibling == reference)).unwrap_or(siblings.len());
		siblings.insert(index, node);
		self.node_mut(node)?.parent = Some(parent);

		self.record(Mutation::Insert { parent, node, reference });
		Ok(())
	}

	fn remove_child(&mut self, parent: &NodeId, node: &NodeId) -> Result<(), MemoryError> {
		let (parent, node) = (*parent, *node);
		if self.node(node)?.parent != Some(parent) {
			return Err(MemoryError::NotAChild { parent, node });
		}
		self.detach(node)?;
		self.record(Mutation::Remove { parent, node });
		Ok(())
	}

	fn is_same_node(&self, a: &NodeId, b: &NodeId) -> bool {
		a == b
	}
}

fn escape(text: &str) -> String {
	text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
