//! Applies property deltas onto a single live node.

use crate::{
	error::{Error, Violation},
	live::LiveTree,
	vnode::{Listener, PropValue, Style, EVENT_PREFIX},
};
use tracing::{instrument, trace};

/// Applies the change of one property from `previous` to `next` onto `node`.
///
/// - `"style"` sets every declaration of `next` and clears those only present in `previous`.
/// - `"class"` replaces the class value (with `""` if `next` is [`None`]).
/// - `"@<event type>"` detaches `previous` and attaches `next`, each if present.
/// - Anything else is a plain attribute, removed if `next` is [`None`] or `false`.
///
/// # Errors
///
/// Live tree failures are returned as [`Error::Host`].
/// A value that doesn't fit its property name is a [`Violation::UnexpectedValue`], checked before anything is written.
#[instrument(skip(tree, node, previous, next))]
pub fn patch_property<T: LiveTree>(tree: &mut T, node: &T::Node, name: &str, previous: Option<&PropValue>, next: Option<&PropValue>) -> Result<(), Error<T::Error>> {
	if name == "style" {
		let previous = previous.map(|previous| expect_style(name, previous)).transpose()?;
		let next = next.map(|next| expect_style(name, next)).transpose()?;
		patch_style(tree, node, previous, next)
	} else if name == "class" {
		let class = match next {
			Some(next) => expect_attribute_value(name, next)?.unwrap_or_default(),
			None => String::new(),
		};
		trace!("Setting class.");
		tree.set_class(node, &class).map_err(Error::host)
	} else if let Some(event_type) = name.strip_prefix(EVENT_PREFIX) {
		let previous = previous.map(|previous| expect_listener(name, previous)).transpose()?;
		let next = next.map(|next| expect_listener(name, next)).transpose()?;
		if previous == next {
			return Ok(());
		}
		if let Some(previous) = previous {
			trace!(event_type, "Detaching listener.");
			tree.remove_listener(node, event_type, previous).map_err(Error::host)?;
		}
		if let Some(next) = next {
			trace!(event_type, "Attaching listener.");
			tree.add_listener(node, event_type, next).map_err(Error::host)?;
		}
		Ok(())
	} else {
		match next.map(|next| expect_attribute_value(name, next)).transpose()?.flatten() {
			Some(value) => {
				if cfg!(feature = "dangerous-logging") {
					trace!(value = value.as_str(), "Setting attribute.");
				} else {
					trace!("Setting attribute.");
				}
				tree.set_attribute(node, name, &value).map_err(Error::host)
			}
			None => {
				trace!("Removing attribute.");
				tree.remove_attribute(node, name).map_err(Error::host)
			}
		}
	}
}

fn patch_style<T: LiveTree>(tree: &mut T, node: &T::Node, previous: Option<&Style>, next: Option<&Style>) -> Result<(), Error<T::Error>> {
	if let Some(next) = next {
		for (name, value) in next {
			trace!(name = name.as_str(), "Setting style.");
			tree.set_style(node, name, value).map_err(Error::host)?;
		}
	}
	if let Some(previous) = previous {
		for name in previous.keys() {
			if next.map_or(true, |next| !next.contains_key(name)) {
				trace!(name = name.as_str(), "Clearing style.");
				tree.clear_style(node, name).map_err(Error::host)?;
			}
		}
	}
	Ok(())
}

fn expect_style<'a>(name: &str, value: &'a PropValue) -> Result<&'a Style, Violation> {
	match value {
		PropValue::Style(style) => Ok(style),
		other => Err(unexpected(name, "style", other)),
	}
}

fn expect_listener<'a>(name: &str, value: &'a PropValue) -> Result<&'a Listener, Violation> {
	match value {
		PropValue::Listener(listener) => Ok(listener),
		other => Err(unexpected(name, "listener", other)),
	}
}

/// [`None`] means the attribute should be absent.
fn expect_attribute_value(name: &str, value: &PropValue) -> Result<Option<String>, Violation> {
	match value {
		PropValue::Style(_) | PropValue::Listener(_) => Err(unexpected(name, "scalar", value)),
		scalar => Ok(scalar.as_attribute_value()),
	}
}

fn unexpected(name: &str, expected: &'static str, found: &PropValue) -> Violation {
	Violation::UnexpectedValue {
		name: name.to_owned(),
		expected,
		found: found.type_name(),
	}
}
