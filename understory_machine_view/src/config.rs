// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The configuration tree: which views render at which state positions.
//!
//! ## Shapes
//!
//! Each position is a [`Config`]:
//! - [`Config::Leaf`]: a bare view. Resolution stops here and renders it, ignoring any
//!   deeper state.
//! - [`Config::Node`]: a [`StateNode`] with an optional `layout`, an optional terminal
//!   `component`, an optional `fallback`, and child configurations keyed by state label.
//!
//! Composition order at a node is always `layout(component(child))`; see
//! [`resolver`](crate::resolver) for the full contract.
//!
//! ```
//! use understory_machine_view::config::{Config, StateNode};
//! use understory_machine_view::view::View;
//!
//! let a = View::new("A", ());
//! let shell = View::new("Shell", ());
//! let config: Config<()> = StateNode::new()
//!     .state("a", a.clone())
//!     .state("b", StateNode::new().layout(shell).state("c", a))
//!     .into();
//!
//! assert!(config.get(&["b", "c"]).is_some());
//! assert!(config.get(&["b", "d"]).is_none());
//! ```

use alloc::collections::BTreeMap;
use alloc::string::String;

use crate::view::View;

/// A configuration position: a bare view or a structured node.
pub enum Config<F: ?Sized> {
    /// Render this view and stop descending.
    Leaf(View<F>),
    /// Structured node with optional wrappers and child configurations.
    Node(StateNode<F>),
}

/// Structured configuration for one state position.
pub struct StateNode<F: ?Sized> {
    /// Wraps everything this node renders.
    pub layout: Option<View<F>>,
    /// Terminal view: renders the caller's children when the node has no active child,
    /// and wraps the resolved child otherwise.
    pub component: Option<View<F>>,
    /// Rendered in place of the child when the active label has no entry in `states`.
    pub fallback: Option<View<F>>,
    /// Child configurations keyed by state label.
    pub states: BTreeMap<String, Config<F>>,
}

impl<F: ?Sized> StateNode<F> {
    /// An empty node: renders nothing for any state.
    pub fn new() -> Self {
        Self {
            layout: None,
            component: None,
            fallback: None,
            states: BTreeMap::new(),
        }
    }

    /// Set the layout view.
    pub fn layout(mut self, view: View<F>) -> Self {
        self.layout = Some(view);
        self
    }

    /// Set the terminal view.
    pub fn component(mut self, view: View<F>) -> Self {
        self.component = Some(view);
        self
    }

    /// Set the fallback view.
    pub fn fallback(mut self, view: View<F>) -> Self {
        self.fallback = Some(view);
        self
    }

    /// Add (or replace) the configuration for child state `label`.
    pub fn state(mut self, label: impl Into<String>, config: impl Into<Config<F>>) -> Self {
        self.states.insert(label.into(), config.into());
        self
    }

    /// Configured child labels, in sorted order.
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.states.keys().map(String::as_str)
    }
}

impl<F: ?Sized> Default for StateNode<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: ?Sized> Config<F> {
    /// The node, if this position is structured.
    pub fn as_node(&self) -> Option<&StateNode<F>> {
        match self {
            Self::Node(node) => Some(node),
            Self::Leaf(_) => None,
        }
    }

    /// The view, if this position is a bare view.
    pub fn as_leaf(&self) -> Option<&View<F>> {
        match self {
            Self::Leaf(view) => Some(view),
            Self::Node(_) => None,
        }
    }

    /// Follow `labels` through nested `states` maps.
    ///
    /// Returns `None` when a label is unconfigured or a bare view is reached before the
    /// path is exhausted.
    pub fn get<S: AsRef<str>>(&self, labels: &[S]) -> Option<&Self> {
        let mut cur = self;
        for label in labels {
            cur = cur.as_node()?.states.get(label.as_ref())?;
        }
        Some(cur)
    }
}

impl<F: ?Sized> Clone for Config<F> {
    fn clone(&self) -> Self {
        match self {
            Self::Leaf(view) => Self::Leaf(view.clone()),
            Self::Node(node) => Self::Node(node.clone()),
        }
    }
}

impl<F: ?Sized> Clone for StateNode<F> {
    fn clone(&self) -> Self {
        Self {
            layout: self.layout.clone(),
            component: self.component.clone(),
            fallback: self.fallback.clone(),
            states: self.states.clone(),
        }
    }
}

impl<F: ?Sized> From<View<F>> for Config<F> {
    fn from(view: View<F>) -> Self {
        Self::Leaf(view)
    }
}

impl<F: ?Sized> From<StateNode<F>> for Config<F> {
    fn from(node: StateNode<F>) -> Self {
        Self::Node(node)
    }
}

impl<F: ?Sized> core::fmt::Debug for Config<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Leaf(view) => f.debug_tuple("Leaf").field(view).finish(),
            Self::Node(node) => f.debug_tuple("Node").field(node).finish(),
        }
    }
}

impl<F: ?Sized> core::fmt::Debug for StateNode<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StateNode")
            .field("layout", &self.layout)
            .field("component", &self.component)
            .field("fallback", &self.fallback)
            .field("states", &self.states)
            .finish()
    }
}
