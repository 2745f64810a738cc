//! Constructors for [`VNode`]s.
//!
//! Nothing in here can fail: input that fits no other category degrades into a text node.

use crate::vnode::{ChildSet, ComponentRef, Kind, Listener, NodeKind, PropValue, Props, Style, VNode, EVENT_PREFIX};

/// What a node is built from.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
	/// An element tag name, like `"div"`.
	Name(String),
	Component(ComponentRef),
	/// Anything else, already stringified. Becomes the payload of a text node.
	Other(String),
}

/// Children as supplied by the caller, before classification.
#[derive(Clone)]
pub enum Children<N> {
	Absent,
	List(Vec<VNode<N>>),
	/// A scalar that is wrapped into a text node.
	Value(String),
}

/// Maps a tag onto the kind of node it produces.
#[must_use]
pub fn classify(tag: &Tag) -> Kind {
	match tag {
		Tag::Name(_) => Kind::Element,
		Tag::Component(_) => Kind::Component,
		Tag::Other(_) => Kind::Text,
	}
}

#[must_use]
pub fn create_text_vnode<N>(text: impl Into<String>) -> VNode<N> {
	VNode::new(NodeKind::Text { content: text.into() }, None)
}

/// Creates an element, component or (fallback) text node.
///
/// For text fallbacks, `props` and `children` are discarded.
pub fn create_element<N>(tag: impl Into<Tag>, props: impl Into<Option<Props>>, children: impl Into<Children<N>>) -> VNode<N> {
	let props = props.into();
	let key = props.as_ref().and_then(read_key);
	let props = props.unwrap_or_default();
	let children = classify_children(children.into());

	let kind = match tag.into() {
		Tag::Name(tag_name) => NodeKind::Element { tag_name, props, children },
		Tag::Component(component) => NodeKind::Component { component, props, children },
		Tag::Other(content) => return create_text_vnode(content),
	};
	VNode::new(kind, key)
}

fn classify_children<N>(children: Children<N>) -> ChildSet<N> {
	match children {
		Children::Absent => ChildSet::None,
		Children::List(list) if list.is_empty() => ChildSet::None,
		Children::List(list) => ChildSet::Multiple(list),
		Children::Value(text) => ChildSet::Single(Box::new(create_text_vnode(text))),
	}
}

fn read_key(props: &Props) -> Option<String> {
	match props.get("key")? {
		PropValue::Text(key) => Some(key.clone()),
		PropValue::Number(key) => Some(key.to_string()),
		PropValue::Bool(_) | PropValue::Style(_) | PropValue::Listener(_) => None,
	}
}

impl From<&str> for Tag {
	fn from(name: &str) -> Self {
		Tag::Name(name.to_owned())
	}
}

impl From<String> for Tag {
	fn from(name: String) -> Self {
		Tag::Name(name)
	}
}

impl From<ComponentRef> for Tag {
	fn from(component: ComponentRef) -> Self {
		Tag::Component(component)
	}
}

impl From<f64> for Tag {
	fn from(value: f64) -> Self {
		Tag::Other(value.to_string())
	}
}

impl From<i32> for Tag {
	fn from(value: i32) -> Self {
		Tag::Other(value.to_string())
	}
}

impl From<bool> for Tag {
	fn from(value: bool) -> Self {
		Tag::Other(value.to_string())
	}
}

impl<N> From<Vec<VNode<N>>> for Children<N> {
	fn from(list: Vec<VNode<N>>) -> Self {
		Children::List(list)
	}
}

impl<N> From<&str> for Children<N> {
	fn from(text: &str) -> Self {
		Children::Value(text.to_owned())
	}
}

impl<N> From<String> for Children<N> {
	fn from(text: String) -> Self {
		Children::Value(text)
	}
}

impl<N> From<f64> for Children<N> {
	fn from(value: f64) -> Self {
		Children::Value(value.to_string())
	}
}

impl<N> From<i32> for Children<N> {
	fn from(value: i32) -> Self {
		Children::Value(value.to_string())
	}
}

impl<N> From<Option<Vec<VNode<N>>>> for Children<N> {
	fn from(list: Option<Vec<VNode<N>>>) -> Self {
		list.map_or(Children::Absent, Children::List)
	}
}

impl<N> From<()> for Children<N> {
	fn from((): ()) -> Self {
		Children::Absent
	}
}

/// Builder shorthands for [`Props`].
pub trait PropsExt: Sized {
	#[must_use]
	fn with(self, name: impl Into<String>, value: impl Into<PropValue>) -> Self;

	#[must_use]
	fn class(self, class: impl Into<String>) -> Self {
		self.with("class", PropValue::Text(class.into()))
	}

	#[must_use]
	fn style(self, style: Style) -> Self {
		self.with("style", style)
	}

	/// Binds `listener` to `event_type`, e.g. `.on("click", …)` for the `"@click"` property.
	#[must_use]
	fn on(self, event_type: &str, listener: Listener) -> Self {
		self.with(format!("{}{}", EVENT_PREFIX, event_type), listener)
	}
}
impl PropsExt for Props {
	fn with(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
		self.insert(name.into(), value.into());
		self
	}
}

/// Builds a [`Style`] from `(name, value)` pairs.
pub fn style<'a>(declarations: impl IntoIterator<Item = (&'a str, &'a str)>) -> Style {
	declarations.into_iter().map(|(name, value)| (name.to_owned(), value.to_owned())).collect()
}
