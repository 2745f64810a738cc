use thiserror::Error;

/// Errors surfaced by mounting, patching and rendering.
///
/// `E` is the [`LiveTree::Error`](`crate::LiveTree::Error`) of the targeted tree.
/// None of these are recovered from internally: after an error, the live tree may be partially updated.
#[derive(Debug, Error)]
pub enum Error<E: std::error::Error + 'static> {
	#[error("live tree operation failed: {0}")]
	Host(#[source] E),

	#[error("contract violation: {0}")]
	Contract(#[from] Violation),

	#[error("depth limit of {limit} reached")]
	DepthLimit { limit: usize },
}

/// Malformed input that reached mount or patch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
	#[error("component nodes can't be materialized here")]
	Component,

	#[error("the previous VNode isn't attached to a live node")]
	MissingLiveNode,

	#[error("property {name:?} expects a {expected} value but got a {found} value")]
	UnexpectedValue {
		name: String,
		expected: &'static str,
		found: &'static str,
	},
}

impl<E: std::error::Error + 'static> Error<E> {
	/// Wraps a live tree error. Used with [`Result::map_err`].
	pub fn host(error: E) -> Self {
		Error::Host(error)
	}

	#[must_use]
	pub fn violation(&self) -> Option<&Violation> {
		match self {
			Error::Contract(violation) => Some(violation),
			Error::Host(_) | Error::DepthLimit { .. } => None,
		}
	}
}
