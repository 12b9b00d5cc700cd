// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Component references with stable identity.
//!
//! A [`View`] is what a configuration names at each position: a shared handle to a
//! host-defined render function `F` (usually a `dyn Fn(..)` the host knows how to call).
//! The resolver never calls it. It only places references into an
//! [`Element`](crate::element::Element) tree.
//!
//! Identity is by construction, not by behavior. Clones of a view share its [`ViewId`],
//! while two views built from identical closures get distinct ids. Hosts key
//! component instances on it (see [`ViewKey`](crate::element::ViewKey)), so the same
//! view selected at the same position across two resolutions keeps its local state.

use alloc::borrow::Cow;
use alloc::sync::Arc;
use core::sync::atomic::{AtomicUsize, Ordering};

// Pointer-width so the counter exists on every target with atomics.
static NEXT_VIEW_ID: AtomicUsize = AtomicUsize::new(1);

/// Identifier of a [`View`], assigned once when the view is constructed.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ViewId(usize);

impl ViewId {
    fn next() -> Self {
        Self(NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw value, for logging.
    pub const fn get(self) -> usize {
        self.0
    }
}

/// A shared, identity-carrying reference to a render function.
pub struct View<F: ?Sized> {
    id: ViewId,
    name: Cow<'static, str>,
    render: Arc<F>,
}

impl<F> View<F> {
    /// Wrap a render function in a new view with a fresh identity.
    pub fn new(name: impl Into<Cow<'static, str>>, render: F) -> Self {
        Self::from_arc(name, Arc::new(render))
    }
}

impl<F: ?Sized> View<F> {
    /// Wrap an already shared render function, typically an `Arc<dyn Fn(..)>`.
    ///
    /// Each call produces a new identity, even for the same `Arc`.
    pub fn from_arc(name: impl Into<Cow<'static, str>>, render: Arc<F>) -> Self {
        Self {
            id: ViewId::next(),
            name: name.into(),
            render,
        }
    }

    /// Identity shared by all clones of this view.
    pub fn id(&self) -> ViewId {
        self.id
    }

    /// Debug name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The render function.
    pub fn get(&self) -> &F {
        &self.render
    }

    /// Returns true when both handles refer to the same view.
    pub fn same(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// A view that renders its children and nothing else.
///
/// Useful as a `layout` that only marks a position in the configuration tree. The crate
/// never calls render functions, so the host supplies one that returns its children
/// unchanged.
///
/// ```
/// use std::sync::Arc;
///
/// use understory_machine_view::config::{Config, StateNode};
/// use understory_machine_view::resolver::resolve;
/// use understory_machine_view::state::StateValue;
/// use understory_machine_view::view::{View, passthrough};
///
/// type Render = dyn Fn(&str) -> String;
///
/// let children: Arc<Render> = Arc::new(|children: &str| children.to_string());
/// let shell = passthrough(children);
/// let config: Config<Render> = StateNode::new()
///     .layout(shell.clone())
///     .state("a", View::from_arc("A", Arc::new(|_: &str| "A".to_string()) as Arc<Render>))
///     .into();
///
/// let root = resolve(&config, Some(&StateValue::leaf("a")), &(), &()).unwrap();
/// assert!(root.view.same(&shell));
/// assert_eq!(shell.name(), "Passthrough");
/// assert_eq!((root.view.get())("inner"), "inner");
/// ```
pub fn passthrough<F: ?Sized>(render: Arc<F>) -> View<F> {
    View::from_arc("Passthrough", render)
}

impl<F: ?Sized> Clone for View<F> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            render: Arc::clone(&self.render),
        }
    }
}

impl<F: ?Sized> PartialEq for View<F> {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl<F: ?Sized> Eq for View<F> {}

impl<F: ?Sized> core::fmt::Debug for View<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("View")
            .field("id", &self.id.0)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
