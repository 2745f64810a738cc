use crate::{
	diff,
	error::{Error, Violation},
	live::LiveTree,
	mount::mount,
	vnode::VNode,
};
use tracing::{debug, instrument, trace_span, warn};

/// Runtime options of a [`Renderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
	/// How many node levels deep mounting and patching may recurse before giving up with [`Error::DepthLimit`].
	pub depth_limit: usize,
}
impl Default for RenderConfig {
	fn default() -> Self {
		Self { depth_limit: 512 }
	}
}

/// Owns a live tree and remembers, per container, which [`VNode`] was last rendered into it.
///
/// # Container Lifecycle
///
/// A container starts out unknown to the renderer. The first [`render`](`Renderer::render`) call mounts into it,
/// later calls patch what is there. [`unmount`](`Renderer::unmount`) removes the rendered content and forgets the container again.
///
/// If a render fails, the live tree may be left partially updated. The container is then marked as
/// [needing a remount](`Renderer::needs_remount`): the renderer keeps what is left of both VNodes, but no longer reports one as [rendered](`Renderer::rendered`).
/// The next render into it detaches those leftovers' listeners, removes their nodes from the container and mounts from scratch.
/// [`unmount`](`Renderer::unmount`) cleans up the same way.
#[derive(Debug)]
pub struct Renderer<T: LiveTree> {
	tree: T,
	config: RenderConfig,
	roots: Vec<Root<T::Node>>,
}

#[derive(Debug)]
struct Root<N> {
	container: N,
	state: RootState<N>,
}

#[derive(Debug)]
enum RootState<N> {
	Rendered(VNode<N>),
	/// Leftovers of a failed render.
	Stale(Vec<VNode<N>>),
}

impl<T: LiveTree> Renderer<T> {
	#[must_use]
	pub fn new(tree: T) -> Self {
		Self::with_config(tree, RenderConfig::default())
	}

	#[must_use]
	pub fn with_config(tree: T, config: RenderConfig) -> Self {
		Self { tree, config, roots: Vec::new() }
	}

	#[must_use]
	pub fn config(&self) -> RenderConfig {
		self.config
	}

	#[must_use]
	pub fn tree(&self) -> &T {
		&self.tree
	}

	pub fn tree_mut(&mut self) -> &mut T {
		&mut self.tree
	}

	#[must_use]
	pub fn into_tree(self) -> T {
		self.tree
	}

	/// The [`VNode`] last rendered into `container`, if any.
	#[must_use]
	pub fn rendered(&self, container: &T::Node) -> Option<&VNode<T::Node>> {
		match &self.roots[self.position(container)?].state {
			RootState::Rendered(vnode) => Some(vnode),
			RootState::Stale(_) => None,
		}
	}

	/// Whether the last render into `container` failed, so that the next one mounts from scratch.
	#[must_use]
	pub fn needs_remount(&self, container: &T::Node) -> bool {
		self.position(container)
			.map_or(false, |i| matches!(self.roots[i].state, RootState::Stale(_)))
	}

	/// Makes `container`'s content match `vnode`.
	///
	/// # Errors
	///
	/// Anything [`mount()`] or [`diff::patch`] may return. See [Container Lifecycle](`Renderer`#container-lifecycle) for the aftermath.
	#[instrument(skip(self, vnode, container))]
	pub fn render(&mut self, mut vnode: VNode<T::Node>, container: &T::Node) -> Result<(), Error<T::Error>> {
		match self.position(container).map(|i| self.roots.swap_remove(i).state) {
			Some(RootState::Rendered(mut previous)) => {
				debug!("Patching previous render.");
				if let Err(error) = diff::patch(&mut self.tree, &mut previous, &mut vnode, container, self.config.depth_limit) {
					warn!("Render failed, the container needs a remount: {}", error);
					self.roots.push(Root {
						container: container.clone(),
						state: RootState::Stale(vec![previous, vnode]),
					});
					return Err(error);
				}
				self.remember(vnode, container);
				Ok(())
			}
			Some(RootState::Stale(leftovers)) => {
				self.discard(leftovers, container);
				self.mount_fresh(vnode, container)
			}
			None => self.mount_fresh(vnode, container),
		}
	}

	/// Removes the content rendered into `container` and forgets it.
	///
	/// Returns the unmounted [`VNode`], or [`None`] if nothing was rendered there.
	/// Leftovers of a failed render are cleaned up on a best-effort basis, also returning [`None`].
	///
	/// # Errors
	///
	/// Anything [`diff::unmount`] may return. The container is forgotten either way.
	#[instrument(skip(self, container))]
	pub fn unmount(&mut self, container: &T::Node) -> Result<Option<VNode<T::Node>>, Error<T::Error>> {
		match self.position(container).map(|i| self.roots.swap_remove(i).state) {
			Some(RootState::Rendered(mut vnode)) => {
				diff::unmount(&mut self.tree, &mut vnode, container)?;
				Ok(Some(vnode))
			}
			Some(RootState::Stale(leftovers)) => {
				self.discard(leftovers, container);
				Ok(None)
			}
			None => Ok(None),
		}
	}

	/// Records `vnode` as rendered into `container` without touching the live tree.
	///
	/// `vnode` must already be attached to a live child of `container`, as the output of [`load`](`crate::load`) is.
	/// Any previously remembered VNode is discarded without unmounting it.
	///
	/// # Errors
	///
	/// [`Violation::MissingLiveNode`] if `vnode` or any of its descendants isn't attached.
	pub fn adopt(&mut self, vnode: VNode<T::Node>, container: &T::Node) -> Result<(), Error<T::Error>> {
		if !is_attached(&vnode) {
			return Err(Violation::MissingLiveNode.into());
		}
		if let Some(i) = self.position(container) {
			self.roots.swap_remove(i);
		}
		self.remember(vnode, container);
		Ok(())
	}

	fn mount_fresh(&mut self, mut vnode: VNode<T::Node>, container: &T::Node) -> Result<(), Error<T::Error>> {
		debug!("Mounting.");
		if let Err(error) = mount(&mut self.tree, &mut vnode, container, None, self.config.depth_limit) {
			warn!("Mounting failed: {}", error);
			diff::discard(&mut self.tree, &mut vnode, container);
			return Err(error);
		}
		self.remember(vnode, container);
		Ok(())
	}

	fn discard(&mut self, leftovers: Vec<VNode<T::Node>>, container: &T::Node) {
		let span = trace_span!("Discarding leftovers of a failed render", count = leftovers.len());
		let _enter = span.enter();
		for mut vnode in leftovers {
			diff::discard(&mut self.tree, &mut vnode, container);
		}
	}

	fn remember(&mut self, vnode: VNode<T::Node>, container: &T::Node) {
		self.roots.push(Root {
			container: container.clone(),
			state: RootState::Rendered(vnode),
		});
	}

	fn position(&self, container: &T::Node) -> Option<usize> {
		self.roots.iter().position(|root| self.tree.is_same_node(&root.container, container))
	}
}

fn is_attached<N>(vnode: &VNode<N>) -> bool {
	vnode.live().is_some() && vnode.children().map_or(true, |children| children.as_slice().iter().all(is_attached))
}
