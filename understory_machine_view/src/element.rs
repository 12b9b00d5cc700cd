// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! View descriptions produced by the resolver.
//!
//! ## Overview
//!
//! An [`Element`] is a (view reference, props, children) triple the host renders.
//! Because each configuration level contributes at most one wrapper, a resolved
//! description is a chain: every element has at most one element child, and the
//! innermost one usually receives the caller's children as [`Children::Forwarded`].
//!
//! ## Identity
//!
//! Every element carries a [`ViewKey`]: the configuration node that selected it (as the
//! state labels leading to that node), the [`Slot`] it was selected from, its depth in the
//! chain, and the [`ViewId`] of its view. A host keeps a component instance alive across
//! resolutions exactly when the key at that position is unchanged;
//! [`MountState`](crate::mount::MountState) computes those transitions from
//! [`Element::keys`].
//!
//! Sibling states configured with one shared view therefore keep a single instance, while
//! the same view reached under a different node is a new instance.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::view::{View, ViewId};

/// Explicit identity of a rendered component instance.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ViewKey {
    /// Position in the composed chain, `0` for the outermost element.
    pub depth: u32,
    /// State labels leading to the configuration node that selected the view, empty for
    /// the root node.
    ///
    /// A bare view or fallback is selected by the node holding it, so siblings share a path.
    pub path: Arc<[String]>,
    /// Slot the view was selected from.
    pub slot: Slot,
    /// View rendered at that position.
    pub view: ViewId,
}

impl ViewKey {
    /// Key for `view` selected from `slot` of the node at `path`.
    pub fn new(depth: u32, path: Arc<[String]>, slot: Slot, view: ViewId) -> Self {
        Self {
            depth,
            path,
            slot,
            view,
        }
    }

    /// Key for a view selected by the root configuration node.
    pub fn at_root(depth: u32, slot: Slot, view: ViewId) -> Self {
        Self::new(depth, Arc::from([]), slot, view)
    }
}

/// Which configuration slot produced an element.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Slot {
    /// A bare view configured in place of a node.
    Leaf,
    /// A node's `layout`.
    Layout,
    /// A node's terminal `component`.
    Component,
    /// A node's `fallback`.
    Fallback,
}

/// Content rendered inside an element.
pub enum Children<F: ?Sized, P, C> {
    /// Nothing to render inside.
    Empty,
    /// The children passed into the top-level render, untouched.
    Forwarded(C),
    /// The resolved description of the next level.
    Element(Box<Element<F, P, C>>),
}

/// One resolved view with its props and content.
pub struct Element<F: ?Sized, P, C> {
    /// View to render.
    pub view: View<F>,
    /// Identity used by hosts to keep or replace component instances.
    pub key: ViewKey,
    /// Slot that selected [`view`](Self::view).
    pub slot: Slot,
    /// Props, identical on every element of one resolution.
    pub props: P,
    /// Content to render inside the view.
    pub children: Children<F, P, C>,
}

/// Conventional props bundle: the machine handle plus the caller's extra props.
///
/// Views use `actor` to send events back to the machine; the resolver never does.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewProps<A, X = ()> {
    /// Handle to the running state machine.
    pub actor: A,
    /// Caller-defined props, forwarded unchanged to every view.
    pub extra: X,
}

impl<F: ?Sized, P, C> Element<F, P, C> {
    /// The nested element, if the content is one.
    pub fn child(&self) -> Option<&Self> {
        match &self.children {
            Children::Element(child) => Some(child),
            Children::Empty | Children::Forwarded(_) => None,
        }
    }

    /// Walk the chain from this element inward.
    pub fn iter(&self) -> impl Iterator<Item = &Self> + '_ {
        core::iter::successors(Some(self), |e| e.child())
    }

    /// Keys of the chain, outer to inner.
    pub fn keys(&self) -> Vec<ViewKey> {
        self.iter().map(|e| e.key.clone()).collect()
    }

    /// Views of the chain, outer to inner.
    pub fn views(&self) -> Vec<&View<F>> {
        self.iter().map(|e| &e.view).collect()
    }

    /// The innermost element.
    pub fn innermost(&self) -> &Self {
        let mut cur = self;
        while let Some(child) = cur.child() {
            cur = child;
        }
        cur
    }

    /// The first element in the chain rendering `view`.
    pub fn find(&self, view: &View<F>) -> Option<&Self> {
        self.iter().find(|e| e.view.same(view))
    }

    /// The caller's children, if some element in the chain forwards them.
    pub fn forwarded(&self) -> Option<&C> {
        match &self.innermost().children {
            Children::Forwarded(c) => Some(c),
            Children::Empty | Children::Element(_) => None,
        }
    }
}

/// Keys of an optional resolution; empty when nothing rendered.
pub fn keys_of<F: ?Sized, P, C>(element: Option<&Element<F, P, C>>) -> Vec<ViewKey> {
    element.map(Element::keys).unwrap_or_default()
}

impl<F: ?Sized, P: Clone, C: Clone> Clone for Children<F, P, C> {
    fn clone(&self) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Forwarded(c) => Self::Forwarded(c.clone()),
            Self::Element(e) => Self::Element(e.clone()),
        }
    }
}

impl<F: ?Sized, P: Clone, C: Clone> Clone for Element<F, P, C> {
    fn clone(&self) -> Self {
        Self {
            view: self.view.clone(),
            key: self.key.clone(),
            slot: self.slot,
            props: self.props.clone(),
            children: self.children.clone(),
        }
    }
}

impl<F: ?Sized, P: core::fmt::Debug, C: core::fmt::Debug> core::fmt::Debug for Children<F, P, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Forwarded(c) => f.debug_tuple("Forwarded").field(c).finish(),
            Self::Element(e) => f.debug_tuple("Element").field(e).finish(),
        }
    }
}

impl<F: ?Sized, P: core::fmt::Debug, C: core::fmt::Debug> core::fmt::Debug for Element<F, P, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Element")
            .field("view", &self.view)
            .field("key", &self.key)
            .field("slot", &self.slot)
            .field("props", &self.props)
            .field("children", &self.children)
            .finish()
    }
}
