// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Top-level entry point: re-resolve whenever the machine's value changes.
//!
//! ## Overview
//!
//! A state machine runtime exposes its current value through [`StateSource`] as a
//! versioned [`Snapshot`]. [`MachineView`] resolves one snapshot against the root
//! configuration. [`ViewDriver`] adds change detection and mount tracking on top: each
//! new version schedules exactly one resolution, and each resolution reads the source
//! exactly once, so a pass never mixes a stale and a fresh value.
//!
//! ## Workflow
//!
//! 1) Build the root [`Config`] once.
//! 2) When the host is notified of a machine change (or on every frame), call
//!    [`ViewDriver::poll`]. It returns `None` if the version did not change.
//! 3) Render [`Frame::element`] and apply [`Frame::transitions`] to component instances.
//!
//! ```
//! use understory_machine_view::config::{Config, StateNode};
//! use understory_machine_view::driver::{Snapshot, StateSource, ViewDriver};
//! use understory_machine_view::state::StateValue;
//! use understory_machine_view::view::View;
//!
//! struct Fixed(Snapshot);
//! impl StateSource for Fixed {
//!     fn snapshot(&self) -> Snapshot {
//!         self.0.clone()
//!     }
//! }
//!
//! let a = View::new("A", ());
//! let config: Config<()> = StateNode::new().state("a", a.clone()).into();
//! let mut driver = ViewDriver::new(config);
//! let source = Fixed(Snapshot::new(1, StateValue::leaf("a")));
//!
//! let frame = driver.poll(&source, &(), &()).unwrap();
//! assert!(frame.element.unwrap().view.same(&a));
//! assert_eq!(frame.transitions.len(), 1);
//! // Same version: nothing to do.
//! assert!(driver.poll(&source, &(), &()).is_none());
//! ```

use alloc::sync::Arc;
use alloc::vec::Vec;

use tracing::debug;

use crate::config::Config;
use crate::element::{Element, keys_of};
use crate::mount::{MountEvent, MountState};
use crate::resolver::resolve;
use crate::state::StateValue;

/// One observation of a machine's value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    /// Monotonic change counter maintained by the source.
    pub version: u64,
    /// The validated value at that version.
    pub value: Arc<StateValue>,
}

impl Snapshot {
    /// Create a snapshot.
    pub fn new(version: u64, value: StateValue) -> Self {
        Self {
            version,
            value: Arc::new(value),
        }
    }
}

/// Read access to a running machine's current value.
///
/// Implementations bump [`Snapshot::version`] whenever the value changes and must
/// return values that were validated when received (see
/// [`StateValue`](crate::state::StateValue)).
pub trait StateSource {
    /// The current value. Called once per resolution pass.
    fn snapshot(&self) -> Snapshot;
}

impl<S: StateSource + ?Sized> StateSource for &S {
    fn snapshot(&self) -> Snapshot {
        (**self).snapshot()
    }
}

impl<S: StateSource + ?Sized> StateSource for Arc<S> {
    fn snapshot(&self) -> Snapshot {
        (**self).snapshot()
    }
}

/// A root configuration, ready to resolve snapshots.
pub struct MachineView<F: ?Sized> {
    config: Config<F>,
}

impl<F: ?Sized> MachineView<F> {
    /// Wrap the root configuration.
    pub fn new(config: Config<F>) -> Self {
        Self { config }
    }

    /// The root configuration.
    pub fn config(&self) -> &Config<F> {
        &self.config
    }

    /// Resolve one snapshot with the caller's props and children.
    pub fn render<P: Clone, C: Clone>(
        &self,
        snapshot: &Snapshot,
        props: &P,
        children: &C,
    ) -> Option<Element<F, P, C>> {
        resolve(&self.config, Some(snapshot.value.as_ref()), props, children)
    }
}

impl<F: ?Sized> core::fmt::Debug for MachineView<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MachineView")
            .field("config", &self.config)
            .finish()
    }
}

/// The result of one resolution pass.
pub struct Frame<F: ?Sized, P, C> {
    /// Version of the snapshot that was resolved.
    pub version: u64,
    /// The resolved description, `None` when nothing renders.
    pub element: Option<Element<F, P, C>>,
    /// Instance transitions relative to the previous frame.
    pub transitions: Vec<MountEvent>,
}

impl<F: ?Sized, P: core::fmt::Debug, C: core::fmt::Debug> core::fmt::Debug for Frame<F, P, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Frame")
            .field("version", &self.version)
            .field("element", &self.element)
            .field("transitions", &self.transitions)
            .finish()
    }
}

/// Change-driven resolver with mount tracking.
pub struct ViewDriver<F: ?Sized> {
    view: MachineView<F>,
    seen: Option<u64>,
    mounts: MountState,
}

impl<F: ?Sized> ViewDriver<F> {
    /// Create a driver for the root configuration. The first poll always resolves.
    pub fn new(config: Config<F>) -> Self {
        Self {
            view: MachineView::new(config),
            seen: None,
            mounts: MountState::new(),
        }
    }

    /// The wrapped view.
    pub fn view(&self) -> &MachineView<F> {
        &self.view
    }

    /// The mounted key path of the last frame.
    pub fn mounted(&self) -> &MountState {
        &self.mounts
    }

    /// Resolve if the source changed since the last frame.
    pub fn poll<P: Clone, C: Clone>(
        &mut self,
        source: &impl StateSource,
        props: &P,
        children: &C,
    ) -> Option<Frame<F, P, C>> {
        let snapshot = source.snapshot();
        if self.seen == Some(snapshot.version) {
            return None;
        }
        Some(self.frame(&snapshot, props, children))
    }

    /// Resolve regardless of version, for example after props changed.
    pub fn force<P: Clone, C: Clone>(
        &mut self,
        source: &impl StateSource,
        props: &P,
        children: &C,
    ) -> Frame<F, P, C> {
        let snapshot = source.snapshot();
        self.frame(&snapshot, props, children)
    }

    /// Unmount everything, for when the host removes the whole view.
    pub fn unmount(&mut self) -> Vec<MountEvent> {
        self.seen = None;
        self.mounts.clear()
    }

    fn frame<P: Clone, C: Clone>(
        &mut self,
        snapshot: &Snapshot,
        props: &P,
        children: &C,
    ) -> Frame<F, P, C> {
        debug!(version = snapshot.version, state = %snapshot.value, "resolving state value");
        let element = self.view.render(snapshot, props, children);
        let transitions = self.mounts.update(&keys_of(element.as_ref()));
        self.seen = Some(snapshot.version);
        Frame {
            version: snapshot.version,
            element,
            transitions,
        }
    }
}

impl<F: ?Sized> core::fmt::Debug for ViewDriver<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ViewDriver")
            .field("seen", &self.seen)
            .field("mounts", &self.mounts)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    use crate::config::StateNode;
    use crate::view::View;

    struct Cycle {
        labels: &'static [&'static str],
        at: Cell<usize>,
        version: Cell<u64>,
        reads: Cell<usize>,
    }

    impl Cycle {
        fn new(labels: &'static [&'static str]) -> Self {
            Self {
                labels,
                at: Cell::new(0),
                version: Cell::new(1),
                reads: Cell::new(0),
            }
        }

        fn next(&self) {
            self.at.set((self.at.get() + 1) % self.labels.len());
            self.version.set(self.version.get() + 1);
        }
    }

    impl StateSource for Cycle {
        fn snapshot(&self) -> Snapshot {
            self.reads.set(self.reads.get() + 1);
            Snapshot::new(
                self.version.get(),
                StateValue::leaf(self.labels[self.at.get()]),
            )
        }
    }

    #[test]
    fn polls_once_per_version_and_reads_once_per_pass() {
        let (a, b) = (View::new("A", ()), View::new("B", ()));
        let config: Config<()> = StateNode::new()
            .state("a", a.clone())
            .state("b", b.clone())
            .into();
        let mut driver = ViewDriver::new(config);
        let machine = Cycle::new(&["a", "b"]);

        let first = driver.poll(&machine, &(), &()).unwrap();
        assert_eq!(machine.reads.get(), 1);
        assert!(first.element.unwrap().view.same(&a));
        assert!(driver.poll(&machine, &(), &()).is_none());

        machine.next();
        let second = driver.poll(&machine, &(), &()).unwrap();
        assert_eq!(second.version, 2);
        assert!(second.element.unwrap().view.same(&b));
        assert_eq!(second.transitions.len(), 2);
        assert_eq!(machine.reads.get(), 3);
    }

    #[test]
    fn unconfigured_state_unmounts_previous_chain() {
        let a = View::new("A", ());
        let config: Config<()> = StateNode::new().state("a", a).into();
        let mut driver = ViewDriver::new(config);
        let machine = Cycle::new(&["a", "b"]);
        let _ = driver.poll(&machine, &(), &());
        assert_eq!(driver.mounted().current_path().len(), 1);

        machine.next();
        let frame = driver.poll(&machine, &(), &()).unwrap();
        assert!(frame.element.is_none());
        assert!(matches!(frame.transitions[..], [MountEvent::Unmount(_)]));
        assert!(driver.mounted().current_path().is_empty());
    }

    #[test]
    fn force_and_unmount() {
        let a = View::new("A", ());
        let mut driver = ViewDriver::new(Config::Leaf(a));
        let machine = Cycle::new(&["x"]);
        let _ = driver.poll(&machine, &(), &());
        // Same version, forced: resolves again without transitions.
        let frame = driver.force(&machine, &(), &());
        assert!(frame.element.is_some());
        assert!(frame.transitions.is_empty());

        assert_eq!(driver.unmount().len(), 1);
        // After unmount the next poll mounts again.
        let frame = driver.poll(&machine, &(), &()).unwrap();
        assert!(matches!(frame.transitions[..], [MountEvent::Mount(_)]));
    }
}
