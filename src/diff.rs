//! Reconciliation of a previously rendered [`VNode`] against its successor.
//!
//! Decisions, in order:
//!
//! | previous / next                    | action                                                    |
//! |------------------------------------|-----------------------------------------------------------|
//! | different kinds                    | replace                                                   |
//! | elements with different tag names  | replace                                                   |
//! | elements with equal tag names      | patch properties in place, then reconcile children        |
//! | text nodes                         | write the content if it changed                           |
//! | components                         | [`Violation::Component`]                                  |
//!
//! Keys are carried on VNodes but not consulted here.
//! Children are reconciled index by index: pairs are patched, surplus previous children are removed
//! and surplus next children are appended.

use crate::{
	error::{Error, Violation},
	live::LiveTree,
	mount::mount_within,
	props::patch_property,
	vnode::{Kind, NodeKind, PropValue, VNode, EVENT_PREFIX},
};
use tracing::{debug, instrument, trace, trace_span, warn};

/// Updates the live node of `previous` (a child of `container`) so that it matches `next`.
///
/// Wherever the live node is kept, its handle is moved from `previous` to `next`.
/// Where it's replaced, the replacement is inserted at the position of the old node.
///
/// # Errors
///
/// - [`Violation::MissingLiveNode`] if `previous` (or a previous child) was never materialized,
/// - [`Violation::Component`] for component nodes,
/// - [`Error::DepthLimit`] if either tree is deeper than `depth_limit`,
/// - [`Error::Host`] if the live tree fails.
///
/// There is no rollback. After an error, the live tree may reflect only part of `next`.
#[instrument(skip(tree, previous, next, container))]
pub fn patch<T: LiveTree>(tree: &mut T, previous: &mut VNode<T::Node>, next: &mut VNode<T::Node>, container: &T::Node, depth_limit: usize) -> Result<(), Error<T::Error>> {
	patch_within(tree, previous, next, container, depth_limit, depth_limit)
}

fn patch_within<T: LiveTree>(tree: &mut T, previous: &mut VNode<T::Node>, next: &mut VNode<T::Node>, container: &T::Node, remaining: usize, limit: usize) -> Result<(), Error<T::Error>> {
	if remaining == 0 {
		return Err(Error::DepthLimit { limit });
	}

	match (previous.kind(), next.kind()) {
		(Kind::Element, Kind::Element) => patch_element(tree, previous, next, container, remaining, limit),
		(Kind::Text, Kind::Text) => patch_text(tree, previous, next),
		(Kind::Component, Kind::Component) => Err(Violation::Component.into()),
		(previous_kind, next_kind) => {
			let span = trace_span!("Replace mismatching", ?previous_kind, ?next_kind);
			let _enter = span.enter();
			replace(tree, previous, next, container, remaining, limit)
		}
	}
}

fn patch_element<T: LiveTree>(tree: &mut T, previous: &mut VNode<T::Node>, next: &mut VNode<T::Node>, container: &T::Node, remaining: usize, limit: usize) -> Result<(), Error<T::Error>> {
	if previous.tag_name() != next.tag_name() {
		let span = trace_span!("Replace mismatching tag", previous = ?previous.tag_name(), next = ?next.tag_name());
		let _enter = span.enter();
		if let (Some(previous), Some(next)) = (previous.tag_name(), next.tag_name()) {
			if previous.eq_ignore_ascii_case(next) {
				warn!("Recreating element due to different tag name casing: {:?} -> {:?}", previous, next);
			}
		}
		return replace(tree, previous, next, container, remaining, limit);
	}

	let VNode { kind: previous_kind, live: previous_live, .. } = previous;
	let VNode { kind: next_kind, live: next_live, .. } = next;
	let (previous_props, previous_children, next_props, next_children) = match (previous_kind, next_kind) {
		(
			NodeKind::Element {
				tag_name,
				props: previous_props,
				children: previous_children,
			},
			NodeKind::Element {
				props: next_props,
				children: next_children,
				..
			},
		) => {
			let span = trace_span!("Diffing element", tag = tag_name.as_str());
			let _enter = span.enter();
			(&*previous_props, previous_children, &*next_props, next_children)
		}
		_ => unreachable!("`patch_element` called on non-elements"),
	};

	let live = previous_live.take().ok_or(Violation::MissingLiveNode)?;
	let live = next_live.insert(live).clone();

	for (name, next_value) in next_props {
		patch_property(tree, &live, name, previous_props.get(name), Some(next_value))?;
	}
	for (name, previous_value) in previous_props {
		if previous_value.is_truthy() && !next_props.contains_key(name) {
			patch_property(tree, &live, name, Some(previous_value), None)?;
		}
	}

	patch_children(tree, previous_children.as_mut_slice(), next_children.as_mut_slice(), &live, remaining - 1, limit)
}

fn patch_text<T: LiveTree>(tree: &mut T, previous: &mut VNode<T::Node>, next: &mut VNode<T::Node>) -> Result<(), Error<T::Error>> {
	let span = trace_span!("Diffing text node");
	let _enter = span.enter();

	let live = previous.live.take().ok_or(Violation::MissingLiveNode)?;
	next.live = Some(live.clone());

	match (previous.text(), next.text()) {
		(Some(previous_content), Some(next_content)) if previous_content != next_content => {
			if cfg!(feature = "dangerous-logging") {
				trace!(previous_content, next_content, "Updating text.");
			} else {
				trace!("Updating text.");
			}
			tree.set_text(&live, next_content).map_err(Error::host)
		}
		_ => Ok(()),
	}
}

/// Index-aligned reconciliation of the children of `parent`.
fn patch_children<T: LiveTree>(tree: &mut T, previous: &mut [VNode<T::Node>], next: &mut [VNode<T::Node>], parent: &T::Node, remaining: usize, limit: usize) -> Result<(), Error<T::Error>> {
	if previous.is_empty() && next.is_empty() {
		return Ok(());
	}
	if remaining == 0 {
		return Err(Error::DepthLimit { limit });
	}

	let span = trace_span!("Diffing children", previous = previous.len(), next = next.len());
	let _enter = span.enter();

	let common = previous.len().min(next.len());
	for (previous, next) in previous.iter_mut().zip(next.iter_mut()) {
		patch_within(tree, previous, next, parent, remaining, limit)?;
	}
	for removed in &mut previous[common..] {
		unmount(tree, removed, parent)?;
	}
	for added in &mut next[common..] {
		mount_within(tree, added, parent, None, remaining, limit)?;
	}
	Ok(())
}

/// Mounts `next` in place of `previous`, then unmounts `previous`.
fn replace<T: LiveTree>(tree: &mut T, previous: &mut VNode<T::Node>, next: &mut VNode<T::Node>, container: &T::Node, remaining: usize, limit: usize) -> Result<(), Error<T::Error>> {
	let old = previous.live.clone().ok_or(Violation::MissingLiveNode)?;
	mount_within(tree, next, container, Some(&old), remaining, limit)?;
	unmount(tree, previous, container)
}

/// Detaches every listener in `vnode`'s subtree, then removes its live node from `container`.
///
/// Afterwards, no VNode in the subtree refers to a live node anymore.
///
/// # Errors
///
/// [`Violation::MissingLiveNode`] if `vnode` isn't materialized, or [`Error::Host`] if the live tree fails.
#[instrument(skip(tree, vnode, container))]
pub fn unmount<T: LiveTree>(tree: &mut T, vnode: &mut VNode<T::Node>, container: &T::Node) -> Result<(), Error<T::Error>> {
	let live = vnode.live.clone().ok_or(Violation::MissingLiveNode)?;
	release(tree, vnode)?;
	trace!("Removing node.");
	tree.remove_child(container, &live).map_err(Error::host)
}

/// Unbinds the subtree depth-first and clears its live node handles.
fn release<T: LiveTree>(tree: &mut T, vnode: &mut VNode<T::Node>) -> Result<(), Error<T::Error>> {
	let live = vnode.live.take();
	if let NodeKind::Element { props, children, .. } = &mut vnode.kind {
		if let Some(live) = &live {
			for (name, value) in props.iter() {
				if let (Some(event_type), PropValue::Listener(listener)) = (name.strip_prefix(EVENT_PREFIX), value) {
					trace!(event_type, "Detaching listener of removed node.");
					tree.remove_listener(live, event_type, listener).map_err(Error::host)?;
				}
			}
		}
		for child in children.as_mut_slice() {
			release(tree, child)?;
		}
	}
	Ok(())
}

/// Best-effort teardown of a VNode left behind by a failed mount or patch.
///
/// Listeners are detached from every node in the subtree that still has a live handle,
/// then the live root is removed from `container` if it's still there.
/// Nothing here fails: live tree errors are logged and skipped.
pub(crate) fn discard<T: LiveTree>(tree: &mut T, vnode: &mut VNode<T::Node>, container: &T::Node) {
	let live = vnode.live.clone();
	release_remaining(tree, vnode);
	if let Some(live) = live {
		if let Err(error) = tree.remove_child(container, &live) {
			debug!("Discarded node wasn't in the container: {}", error);
		}
	}
}

fn release_remaining<T: LiveTree>(tree: &mut T, vnode: &mut VNode<T::Node>) {
	let live = vnode.live.take();
	if let NodeKind::Element { props, children, .. } = &mut vnode.kind {
		if let Some(live) = &live {
			for (name, value) in props.iter() {
				if let (Some(event_type), PropValue::Listener(listener)) = (name.strip_prefix(EVENT_PREFIX), value) {
					if let Err(error) = tree.remove_listener(live, event_type, listener) {
						warn!(event_type, "Could not detach listener of discarded node: {}", error);
					}
				}
			}
		}
		for child in children.as_mut_slice() {
			release_remaining(tree, child);
		}
	}
}
