//! The virtual node model.
//!
//! A [`VNode`] is a cheap, inert description of one node of desired UI state.
//! It only becomes connected to a live tree once it has been [mounted](`crate::mount()`)
//! or [patched](`crate::diff::patch`), at which point it holds a handle to the live node it materialized to.

use core::{
	any::Any,
	fmt::{self, Debug, Formatter},
	hash::{Hash, Hasher},
};
use hashbrown::HashMap;
use std::rc::Rc;

/// Property name prefix that marks event listener properties, e.g. `"@click"`.
pub const EVENT_PREFIX: char = '@';

/// Property maps of elements and components, keyed by property name.
pub type Props = HashMap<String, PropValue>;

/// Inline style declarations, keyed by style property name.
pub type Style = HashMap<String, String>;

/// A virtual node, parameterised over the live tree's node handle type `N`.
#[derive(Clone)]
pub struct VNode<N> {
	pub(crate) kind: NodeKind<N>,
	pub(crate) key: Option<String>,
	pub(crate) live: Option<N>,
}

/// The closed set of node kinds.
#[derive(Clone)]
pub enum NodeKind<N> {
	Text {
		content: String,
	},
	Element {
		tag_name: String,
		props: Props,
		children: ChildSet<N>,
	},
	/// Classified only. Components are never invoked by this crate.
	Component {
		component: ComponentRef,
		props: Props,
		children: ChildSet<N>,
	},
}

/// The payload-less discriminant of [`NodeKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
	Text,
	Element,
	Component,
}

/// Child arity classification together with its payload.
#[derive(Clone)]
pub enum ChildSet<N> {
	None,
	Single(Box<VNode<N>>),
	Multiple(Vec<VNode<N>>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildFlags {
	None,
	Single,
	Multiple,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
	Text(String),
	Number(f64),
	Bool(bool),
	Style(Style),
	Listener(Listener),
}

impl<N> VNode<N> {
	pub(crate) fn new(kind: NodeKind<N>, key: Option<String>) -> Self {
		Self { kind, key, live: None }
	}

	#[must_use]
	pub fn kind(&self) -> Kind {
		self.kind.kind()
	}

	#[must_use]
	pub fn node_kind(&self) -> &NodeKind<N> {
		&self.kind
	}

	#[must_use]
	pub fn key(&self) -> Option<&str> {
		self.key.as_deref()
	}

	/// The live node this VNode currently represents, if it has been mounted or patched.
	#[must_use]
	pub fn live(&self) -> Option<&N> {
		self.live.as_ref()
	}

	/// The text payload of a [`Kind::Text`] node.
	#[must_use]
	pub fn text(&self) -> Option<&str> {
		match &self.kind {
			NodeKind::Text { content } => Some(content),
			NodeKind::Element { .. } | NodeKind::Component { .. } => None,
		}
	}

	#[must_use]
	pub fn tag_name(&self) -> Option<&str> {
		match &self.kind {
			NodeKind::Element { tag_name, .. } => Some(tag_name),
			NodeKind::Text { .. } | NodeKind::Component { .. } => None,
		}
	}

	#[must_use]
	pub fn props(&self) -> Option<&Props> {
		match &self.kind {
			NodeKind::Element { props, .. } | NodeKind::Component { props, .. } => Some(props),
			NodeKind::Text { .. } => None,
		}
	}

	/// Text nodes have no child classification at all.
	#[must_use]
	pub fn children(&self) -> Option<&ChildSet<N>> {
		match &self.kind {
			NodeKind::Element { children, .. } | NodeKind::Component { children, .. } => Some(children),
			NodeKind::Text { .. } => None,
		}
	}
}

impl<N> NodeKind<N> {
	#[must_use]
	pub fn kind(&self) -> Kind {
		match self {
			NodeKind::Text { .. } => Kind::Text,
			NodeKind::Element { .. } => Kind::Element,
			NodeKind::Component { .. } => Kind::Component,
		}
	}
}

impl<N> ChildSet<N> {
	#[must_use]
	pub fn flags(&self) -> ChildFlags {
		match self {
			ChildSet::None => ChildFlags::None,
			ChildSet::Single(_) => ChildFlags::Single,
			ChildSet::Multiple(_) => ChildFlags::Multiple,
		}
	}

	#[must_use]
	pub fn as_slice(&self) -> &[VNode<N>] {
		match self {
			ChildSet::None => &[],
			ChildSet::Single(child) => core::slice::from_ref(child),
			ChildSet::Multiple(children) => children,
		}
	}

	pub fn as_mut_slice(&mut self) -> &mut [VNode<N>] {
		match self {
			ChildSet::None => &mut [],
			ChildSet::Single(child) => core::slice::from_mut(child),
			ChildSet::Multiple(children) => children,
		}
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.as_slice().len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		matches!(self, ChildSet::None)
	}
}

impl PropValue {
	/// Mirrors JavaScript truthiness, which decides whether a dropped property gets explicitly unset.
	#[must_use]
	pub fn is_truthy(&self) -> bool {
		match self {
			PropValue::Text(text) => !text.is_empty(),
			PropValue::Number(number) => *number != 0.0 && !number.is_nan(),
			PropValue::Bool(value) => *value,
			PropValue::Style(_) | PropValue::Listener(_) => true,
		}
	}

	/// Stringifies scalar values. Styles and listeners have no attribute representation.
	#[must_use]
	pub fn as_attribute_value(&self) -> Option<String> {
		match self {
			PropValue::Text(text) => Some(text.clone()),
			PropValue::Number(number) => Some(number.to_string()),
			PropValue::Bool(true) => Some(String::new()),
			PropValue::Bool(false) | PropValue::Style(_) | PropValue::Listener(_) => None,
		}
	}

	#[must_use]
	pub fn type_name(&self) -> &'static str {
		match self {
			PropValue::Text(_) => "text",
			PropValue::Number(_) => "number",
			PropValue::Bool(_) => "bool",
			PropValue::Style(_) => "style",
			PropValue::Listener(_) => "listener",
		}
	}
}

impl From<&str> for PropValue {
	fn from(text: &str) -> Self {
		PropValue::Text(text.to_owned())
	}
}

impl From<String> for PropValue {
	fn from(text: String) -> Self {
		PropValue::Text(text)
	}
}

impl From<f64> for PropValue {
	fn from(number: f64) -> Self {
		PropValue::Number(number)
	}
}

impl From<i32> for PropValue {
	fn from(number: i32) -> Self {
		PropValue::Number(number.into())
	}
}

impl From<bool> for PropValue {
	fn from(value: bool) -> Self {
		PropValue::Bool(value)
	}
}

impl From<Style> for PropValue {
	fn from(style: Style) -> Self {
		PropValue::Style(style)
	}
}

impl From<Listener> for PropValue {
	fn from(listener: Listener) -> Self {
		PropValue::Listener(listener)
	}
}

/// An event as seen by a [`Listener`].
///
/// `native` is whatever the live tree dispatches with, for example a [`web_sys::Event`] in the browser.
pub struct Event<'a> {
	event_type: &'a str,
	native: &'a dyn Any,
}
impl<'a> Event<'a> {
	#[must_use]
	pub fn new(event_type: &'a str, native: &'a dyn Any) -> Self {
		Self { event_type, native }
	}

	#[must_use]
	pub fn event_type(&self) -> &str {
		self.event_type
	}

	#[must_use]
	pub fn native<T: Any>(&self) -> Option<&T> {
		self.native.downcast_ref()
	}
}

/// A shared event callback.
///
/// Listeners compare and hash by identity, so clones of one listener are "the same" listener
/// when a live tree has to detach it again.
#[derive(Clone)]
pub struct Listener(Rc<dyn Fn(&Event<'_>)>);
impl Listener {
	pub fn new(callback: impl 'static + Fn(&Event<'_>)) -> Self {
		Self(Rc::new(callback))
	}

	pub fn call(&self, event: &Event<'_>) {
		(self.0)(event)
	}

	fn address(&self) -> *const () {
		Rc::as_ptr(&self.0).cast::<()>()
	}
}
impl PartialEq for Listener {
	fn eq(&self, other: &Self) -> bool {
		self.address() == other.address()
	}
}
impl Eq for Listener {}
impl Hash for Listener {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.address().hash(state)
	}
}
impl Debug for Listener {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Listener").field(&self.address()).finish()
	}
}

/// An opaque reference to a component function.
#[derive(Clone)]
pub struct ComponentRef {
	name: &'static str,
	function: Rc<dyn Any>,
}
impl ComponentRef {
	pub fn new<F: 'static>(name: &'static str, function: F) -> Self {
		Self {
			name,
			function: Rc::new(function),
		}
	}

	#[must_use]
	pub fn name(&self) -> &'static str {
		self.name
	}

	#[must_use]
	pub fn function<F: 'static>(&self) -> Option<&F> {
		self.function.downcast_ref()
	}
}
impl PartialEq for ComponentRef {
	fn eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.function, &other.function)
	}
}
impl Debug for ComponentRef {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_tuple("ComponentRef").field(&self.name).finish()
	}
}

impl<N: Debug> Debug for VNode<N> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let mut debug = f.debug_struct("VNode");
		match &self.kind {
			NodeKind::Text { content } => debug.field("text", content),
			NodeKind::Element { tag_name, props, children } => debug.field("tag_name", tag_name).field("props", props).field("children", children),
			NodeKind::Component { component, props, children } => debug.field("component", component).field("props", props).field("children", children),
		};
		debug.field("key", &self.key).field("live", &self.live).finish()
	}
}

impl<N: Debug> Debug for ChildSet<N> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			ChildSet::None => f.write_str("None"),
			ChildSet::Single(child) => f.debug_tuple("Single").field(child).finish(),
			ChildSet::Multiple(children) => f.debug_tuple("Multiple").field(children).finish(),
		}
	}
}
