// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mount state helper: compute mount/unmount transitions between resolutions.
//!
//! ## Usage
//!
//! 1) Resolve the current state value into an [`Element`](crate::element::Element) chain.
//! 2) Extract its outer→inner key path with [`Element::keys`](crate::element::Element::keys)
//!    (or [`keys_of`](crate::element::keys_of) for an optional result).
//! 3) Call [`MountState::update`] with that path to get `Unmount(..)` / `Mount(..)` transitions.
//!
//! A host keeps local state for every key that is neither unmounted nor remounted.
//!
//! ## Minimal example
//!
//! ```
//! use understory_machine_view::element::{Slot, ViewKey};
//! use understory_machine_view::mount::{MountEvent, MountState};
//! use understory_machine_view::view::View;
//!
//! let (l, b, c) = (View::new("L", ()), View::new("B", ()), View::new("C", ()));
//! let key = |depth, v: &View<()>| ViewKey::at_root(depth, Slot::Leaf, v.id());
//!
//! let mut m = MountState::new();
//! assert_eq!(
//!     m.update(&[key(0, &l), key(1, &b)]),
//!     vec![MountEvent::Mount(key(0, &l)), MountEvent::Mount(key(1, &b))]
//! );
//! // Layout stays mounted, only the inner view is replaced.
//! assert_eq!(
//!     m.update(&[key(0, &l), key(1, &c)]),
//!     vec![MountEvent::Unmount(key(1, &b)), MountEvent::Mount(key(1, &c))]
//! );
//! ```

use alloc::vec::Vec;

use tracing::debug;

use crate::element::ViewKey;

/// Tracks the mounted key path (outer→inner) of the last rendered resolution.
///
/// When updated with a new path, computes the minimal sequence of unmount and
/// mount transitions to move from the old chain to the new one.
///
/// Ordering semantics:
/// - Unmount events are emitted from inner-most to outer-most.
/// - Mount events are emitted from outer-most to inner-most.
///
/// Once two paths differ at some position, everything below it is replaced too,
/// even where keys happen to match again: a child never outlives its parent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MountState {
    current: Vec<ViewKey>,
}

/// A component instance lifecycle transition.
///
/// Returned by [`MountState::update`] and [`MountState::clear`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MountEvent {
    /// A new instance is created for this key (in order from outer→inner).
    Mount(ViewKey),
    /// The instance for this key is torn down with its local state (inner→outer).
    Unmount(ViewKey),
}

impl MountState {
    /// Create an empty mount state.
    pub fn new() -> Self {
        Self {
            current: Vec::new(),
        }
    }

    /// Return the currently mounted key path.
    pub fn current_path(&self) -> &[ViewKey] {
        &self.current
    }

    /// Returns true if `key` is currently mounted.
    pub fn is_mounted(&self, key: &ViewKey) -> bool {
        self.current.contains(key)
    }

    /// Unmount everything, returning the events from inner-most to outer-most.
    pub fn clear(&mut self) -> Vec<MountEvent> {
        let out: Vec<_> = self
            .current
            .iter()
            .rev()
            .map(|k| MountEvent::Unmount(k.clone()))
            .collect();
        self.current.clear();
        out
    }

    /// Update the mounted path and return the unmount/mount events required to
    /// transition from the previous path to `new_path`.
    pub fn update(&mut self, new_path: &[ViewKey]) -> Vec<MountEvent> {
        // Length of the common prefix: the instances that survive.
        let kept = self
            .current
            .iter()
            .zip(new_path)
            .take_while(|(old, new)| old == new)
            .count();

        let mut out = Vec::with_capacity(self.current.len() + new_path.len() - 2 * kept);
        // Unmounts: from old tail back to the kept prefix, inner→outer.
        for k in self.current[kept..].iter().rev() {
            out.push(MountEvent::Unmount(k.clone()));
        }
        // Mounts: from the kept prefix down to the new tail, outer→inner.
        for k in &new_path[kept..] {
            out.push(MountEvent::Mount(k.clone()));
        }

        if !out.is_empty() {
            debug!(
                kept,
                unmounted = self.current.len() - kept,
                mounted = new_path.len() - kept,
                "mount transition"
            );
        }
        self.current.clear();
        self.current.extend_from_slice(new_path);
        out
    }
}
