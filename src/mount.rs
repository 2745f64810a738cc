use crate::{
	error::{Error, Violation},
	live::LiveTree,
	props::patch_property,
	vnode::{NodeKind, VNode},
};
use tracing::{instrument, trace, trace_span};

/// Materializes `vnode` and its subtree into `container`, before `reference` if given, else at the end.
///
/// Every property is applied as a pure addition (without previous value).
/// `depth_limit` bounds how many element levels deep this may recurse.
///
/// # Errors
///
/// - [`Violation::Component`] for component nodes anywhere in the subtree,
/// - [`Error::DepthLimit`] if the subtree is deeper than `depth_limit`,
/// - [`Error::Host`] if the live tree fails.
///
/// The new node is only inserted into `container` once its subtree is complete, so an error leaves `container` itself untouched.
/// Nodes created before the error stay attached to their VNodes.
#[instrument(skip(tree, vnode, container, reference))]
pub fn mount<T: LiveTree>(tree: &mut T, vnode: &mut VNode<T::Node>, container: &T::Node, reference: Option<&T::Node>, depth_limit: usize) -> Result<(), Error<T::Error>> {
	mount_within(tree, vnode, container, reference, depth_limit, depth_limit)
}

pub(crate) fn mount_within<T: LiveTree>(tree: &mut T, vnode: &mut VNode<T::Node>, container: &T::Node, reference: Option<&T::Node>, remaining: usize, limit: usize) -> Result<(), Error<T::Error>> {
	let node = materialize(tree, vnode, remaining, limit)?;
	tree.insert_before(container, &node, reference).map_err(Error::host)
}

/// Creates the live subtree for `vnode` without inserting its root anywhere.
fn materialize<T: LiveTree>(tree: &mut T, vnode: &mut VNode<T::Node>, remaining: usize, limit: usize) -> Result<T::Node, Error<T::Error>> {
	if remaining == 0 {
		return Err(Error::DepthLimit { limit });
	}

	let node = match &mut vnode.kind {
		NodeKind::Text { content } => {
			let span = trace_span!("Creating text node");
			let _enter = span.enter();
			if cfg!(feature = "dangerous-logging") {
				trace!(content = content.as_str());
			}
			tree.create_text(content).map_err(Error::host)?
		}

		NodeKind::Element { tag_name, props, children } => {
			let span = trace_span!("Creating element", tag = tag_name.as_str(), props = props.len(), children = children.len());
			let _enter = span.enter();
			let element = tree.create_element(tag_name).map_err(Error::host)?;
			// Set early, so that a failure further down can still find and unbind this node.
			vnode.live = Some(element.clone());
			for (name, value) in props.iter() {
				patch_property(tree, &element, name, None, Some(value))?;
			}
			for child in children.as_mut_slice() {
				let child_node = materialize(tree, child, remaining - 1, limit)?;
				tree.insert_before(&element, &child_node, None).map_err(Error::host)?;
			}
			element
		}

		NodeKind::Component { component, .. } => {
			trace!(component = component.name(), "Refusing to mount component.");
			return Err(Violation::Component.into());
		}
	};

	vnode.live = Some(node.clone());
	Ok(node)
}
