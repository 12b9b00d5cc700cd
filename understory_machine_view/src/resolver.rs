// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolver: match a state value against a configuration tree.
//!
//! ## Overview
//!
//! [`resolve`] walks a [`Config`] and a [`StateValue`] in lock-step and returns the
//! composed [`Element`] chain, or `None` when nothing renders. It is a pure function of
//! its inputs: no I/O, no retained state, and the same inputs always produce the same
//! view references, keys, and props.
//!
//! ## Composition contract
//!
//! At each level, with `value` the state value at that level (absent once the parent
//! consumed a leaf label):
//!
//! 1. [`Config::Leaf`]: render the view with the caller's children. Deeper state is ignored.
//! 2. [`Config::Node`] and no `value`: the node's `component` renders the caller's
//!    children, wrapped in the `layout` if one is configured. Without a `component`
//!    nothing renders at this node, layout included.
//! 3. [`Config::Node`] and `value = label[.rest]`: the child is `states[label]` resolved
//!    against `rest`. An unconfigured label yields the `fallback` rendering the caller's
//!    children, or nothing. If a `component` is configured it wraps the child (receiving
//!    [`Children::Empty`] when the child is nothing); otherwise the body is the child.
//! 4. A configured `layout` wraps the body from step 3, and renders even when that body
//!    is empty.
//!
//! So a node always composes as `layout(component(child))`. Rendering nothing is never
//! an error: it is how partial configurations express "no UI for this state".
//!
//! ## Identity
//!
//! Each element is keyed by the labels leading to the configuration node that selected
//! it, the slot it came from, its depth in the chain, and its view id. The resolver never
//! re-creates view references, so the same view selected by the same node across two
//! resolutions yields equal keys (as for sibling states sharing a view), and hosts keep
//! that instance alive. The same view selected by a different node is a new instance.
//!
//! ```
//! use understory_machine_view::config::{Config, StateNode};
//! use understory_machine_view::element::Slot;
//! use understory_machine_view::resolver::resolve;
//! use understory_machine_view::state::StateValue;
//! use understory_machine_view::view::View;
//!
//! let layout = View::new("L", ());
//! let b = View::new("B", ());
//! let config: Config<()> = StateNode::new()
//!     .state("a", StateNode::new().layout(layout.clone()).state("b", b.clone()))
//!     .into();
//!
//! let value = StateValue::from_path(&["a", "b"]).unwrap();
//! let root = resolve(&config, Some(&value), &(), &"children").unwrap();
//! assert_eq!(root.views(), vec![&layout, &b]);
//! assert_eq!(root.slot, Slot::Layout);
//! assert_eq!(root.forwarded(), Some(&"children"));
//! ```

use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;

use tracing::trace;

use crate::config::{Config, StateNode};
use crate::element::{Children, Element, Slot, ViewKey};
use crate::state::StateValue;
use crate::view::View;

/// Resolve `value` against `config`.
///
/// `props` is cloned onto every element; `children` is cloned into the position where
/// the chain terminates in a leaf, terminal component, or fallback.
/// Pass `None` for `value` to resolve a configuration as if its root state were atomic.
pub fn resolve<F, P, C>(
    config: &Config<F>,
    value: Option<&StateValue>,
    props: &P,
    children: &C,
) -> Option<Element<F, P, C>>
where
    F: ?Sized,
    P: Clone,
    C: Clone,
{
    let span = tracing::trace_span!("resolve", depth = value.map_or(0, StateValue::depth));
    let _enter = span.enter();
    Resolver { props, children }.level(config, value, 0, &Arc::from([]), None)
}

/// Labels leading to a configuration node.
type NodePath = Arc<[String]>;

struct Resolver<'a, P, C> {
    props: &'a P,
    children: &'a C,
}

impl<P: Clone, C: Clone> Resolver<'_, P, C> {
    /// Resolve the entry `label` of the node at `parent`, or the root config if `label`
    /// is `None`.
    fn level<F: ?Sized>(
        &self,
        config: &Config<F>,
        value: Option<&StateValue>,
        depth: u32,
        parent: &NodePath,
        label: Option<&str>,
    ) -> Option<Element<F, P, C>> {
        match config {
            Config::Leaf(view) => Some(self.terminal(view, Slot::Leaf, depth, parent)),
            Config::Node(node) => {
                let path: NodePath = match label {
                    Some(label) => parent.iter().cloned().chain([String::from(label)]).collect(),
                    None => Arc::clone(parent),
                };
                self.node(node, value, depth, &path)
            }
        }
    }

    fn node<F: ?Sized>(
        &self,
        node: &StateNode<F>,
        value: Option<&StateValue>,
        depth: u32,
        path: &NodePath,
    ) -> Option<Element<F, P, C>> {
        let body_depth = depth + u32::from(node.layout.is_some());

        let Some(value) = value else {
            let Some(component) = &node.component else {
                trace!(depth, "no active child and no component, rendering nothing");
                return None;
            };
            let body = self.terminal(component, Slot::Component, body_depth, path);
            return Some(match &node.layout {
                Some(layout) => self.wrap(layout, Slot::Layout, depth, path, Some(body)),
                None => body,
            });
        };

        let child_depth = body_depth + u32::from(node.component.is_some());
        let label = value.label();
        let child = match node.states.get(label) {
            Some(next) => self.level(next, value.child(), child_depth, path, Some(label)),
            None => match &node.fallback {
                Some(fallback) => {
                    trace!(label, "unconfigured state, rendering fallback");
                    Some(self.terminal(fallback, Slot::Fallback, child_depth, path))
                }
                None => {
                    trace!(label, "unconfigured state without fallback, rendering nothing");
                    None
                }
            },
        };
        let body = match &node.component {
            Some(view) => Some(self.wrap(view, Slot::Component, body_depth, path, child)),
            None => child,
        };

        match &node.layout {
            Some(layout) => Some(self.wrap(layout, Slot::Layout, depth, path, body)),
            None => body,
        }
    }

    fn terminal<F: ?Sized>(
        &self,
        view: &View<F>,
        slot: Slot,
        depth: u32,
        path: &NodePath,
    ) -> Element<F, P, C> {
        let children = Children::Forwarded(self.children.clone());
        self.element(view, slot, depth, path, children)
    }

    fn wrap<F: ?Sized>(
        &self,
        view: &View<F>,
        slot: Slot,
        depth: u32,
        path: &NodePath,
        inner: Option<Element<F, P, C>>,
    ) -> Element<F, P, C> {
        let children = match inner {
            Some(e) => Children::Element(Box::new(e)),
            None => Children::Empty,
        };
        self.element(view, slot, depth, path, children)
    }

    fn element<F: ?Sized>(
        &self,
        view: &View<F>,
        slot: Slot,
        depth: u32,
        path: &NodePath,
        children: Children<F, P, C>,
    ) -> Element<F, P, C> {
        Element {
            view: view.clone(),
            key: ViewKey::new(depth, Arc::clone(path), slot, view.id()),
            slot,
            props: self.props.clone(),
            children,
        }
    }
}
