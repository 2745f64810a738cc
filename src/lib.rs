#![doc(html_root_url = "https://docs.rs/vnode-dom/0.1.0")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! A minimal virtual DOM.
//!
//! Describe the desired UI as a tree of [`VNode`]s (see [`create_element`]), then let a [`Renderer`]
//! mount it into a container or patch what it rendered there before.
//!
//! The live tree is abstracted behind [`LiveTree`]. [`web::WebTree`] targets the browser DOM,
//! [`memory::MemoryTree`] is a headless stand-in for tests.

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod diff;
pub mod error;
pub mod factory;
pub mod live;
pub mod load;
pub mod memory;
pub mod mount;
pub mod props;
mod rc_hash_map;
pub mod render;
pub mod vnode;
pub mod web;

pub use crate::{
	diff::{patch, unmount},
	error::{Error, Violation},
	factory::{classify, create_element, create_text_vnode, style, Children, PropsExt, Tag},
	live::LiveTree,
	mount::mount,
	props::patch_property,
	render::{RenderConfig, Renderer},
	vnode::{ChildFlags, ChildSet, ComponentRef, Event, Kind, Listener, NodeKind, PropValue, Props, Style, VNode},
};
