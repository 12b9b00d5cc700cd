// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared pieces for the machine view demos: two small machines and a text host.
//!
//! Run:
//! - `cargo run -p understory_demos --example counter`
//! - `cargo run -p understory_demos --example nested_layout`

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};
use understory_machine_view::config::Config;
use understory_machine_view::driver::{Snapshot, StateSource, ViewDriver};
use understory_machine_view::element::{Children, Element, ViewKey, ViewProps};
use understory_machine_view::mount::MountEvent;
use understory_machine_view::state::StateValue;
use understory_machine_view::view::View;

/// Install a `fmt` subscriber honoring `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Events understood by [`CountMachine`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CountEvent {
    /// Increment the count while running.
    Count,
    /// Move from `a` (running) to `b` (stopped).
    Stop,
    /// Move from `b` back to `a`.
    Start,
}

/// Two-state counter machine: `a` counts, `b` waits to be started again.
#[derive(Debug)]
pub struct CountMachine {
    state: RefCell<StateValue>,
    count: Cell<u32>,
    version: Cell<u64>,
}

impl Default for CountMachine {
    fn default() -> Self {
        Self {
            state: RefCell::new(StateValue::leaf("a")),
            count: Cell::new(0),
            version: Cell::new(1),
        }
    }
}

impl CountMachine {
    /// Context: number of `Count` events accepted so far.
    pub fn count(&self) -> u32 {
        self.count.get()
    }

    /// Apply an event. Events without a transition in the current state are ignored.
    pub fn send(&self, event: CountEvent) {
        let state = self.state.borrow().label().to_string();
        match (state.as_str(), event) {
            ("a", CountEvent::Count) => self.count.set(self.count.get() + 1),
            ("a", CountEvent::Stop) => *self.state.borrow_mut() = StateValue::leaf("b"),
            ("b", CountEvent::Start) => *self.state.borrow_mut() = StateValue::leaf("a"),
            _ => {
                debug!(?event, state = %state, "event ignored");
                return;
            }
        }
        self.version.set(self.version.get() + 1);
    }
}

impl StateSource for CountMachine {
    fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.version.get(), self.state.borrow().clone())
    }
}

/// A hierarchical machine defined by a transition table over dotted state paths.
///
/// The first row whose source state is an ancestor-or-self of the current state and whose
/// event matches is taken.
#[derive(Debug)]
pub struct TableMachine {
    rows: Vec<(&'static str, &'static str, StateValue)>,
    state: RefCell<StateValue>,
    version: Cell<u64>,
}

impl TableMachine {
    /// Build a machine from its initial state and `(source, event, target)` rows.
    pub fn new(
        initial: StateValue,
        rows: impl IntoIterator<Item = (&'static str, &'static str, StateValue)>,
    ) -> Self {
        Self {
            rows: rows.into_iter().collect(),
            state: RefCell::new(initial),
            version: Cell::new(1),
        }
    }

    /// Apply an event; returns true if a transition was taken.
    pub fn send(&self, event: &str) -> bool {
        let target = {
            let state = self.state.borrow();
            self.rows
                .iter()
                .find(|(from, ev, _)| *ev == event && state.matches_dotted(from))
                .map(|(_, _, to)| to.clone())
        };
        let Some(target) = target else {
            debug!(event, "event ignored");
            return false;
        };
        *self.state.borrow_mut() = target;
        self.version.set(self.version.get() + 1);
        true
    }
}

impl StateSource for TableMachine {
    fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.version.get(), self.state.borrow().clone())
    }
}

/// What a view sees when the [`TextHost`] renders it.
pub struct Cx<'a, A> {
    /// Machine handle and extra props.
    pub props: &'a ViewProps<A>,
    /// Rendered content.
    pub children: String,
    /// Local state of this component instance.
    pub clicks: u32,
}

/// Render function type used by the demos.
pub type Render<A> = dyn Fn(&Cx<'_, A>) -> String + Send + Sync;

/// Build a view from a render closure.
pub fn view<A: 'static>(
    name: &'static str,
    render: impl Fn(&Cx<'_, A>) -> String + Send + Sync + 'static,
) -> View<Render<A>> {
    let render: Arc<Render<A>> = Arc::new(render);
    View::from_arc(name, render)
}

/// A view that renders its children unchanged.
pub fn passthrough<A: 'static>() -> View<Render<A>> {
    let render: Arc<Render<A>> = Arc::new(|cx: &Cx<'_, A>| cx.children.clone());
    understory_machine_view::view::passthrough(render)
}

/// A host that renders element chains to text and keeps a click counter per instance.
pub struct TextHost<A: 'static> {
    driver: ViewDriver<Render<A>>,
    clicks: HashMap<ViewKey, u32>,
    last: Option<Element<Render<A>, ViewProps<A>, String>>,
}

impl<A: Clone + 'static> TextHost<A> {
    /// Create a host for a root configuration.
    pub fn new(config: impl Into<Config<Render<A>>>) -> Self {
        Self {
            driver: ViewDriver::new(config.into()),
            clicks: HashMap::new(),
            last: None,
        }
    }

    /// Re-resolve if `source` changed and return the rendered text.
    pub fn frame(&mut self, source: &impl StateSource, actor: &A, children: &str) -> String {
        let props = ViewProps {
            actor: actor.clone(),
            extra: (),
        };
        if let Some(frame) = self.driver.poll(source, &props, &children.to_string()) {
            for event in frame.transitions {
                match event {
                    MountEvent::Mount(key) => {
                        info!(path = ?key.path, slot = ?key.slot, view = key.view.get(), "mount");
                        self.clicks.insert(key, 0);
                    }
                    MountEvent::Unmount(key) => {
                        info!(path = ?key.path, slot = ?key.slot, view = key.view.get(), "unmount");
                        self.clicks.remove(&key);
                    }
                }
            }
            self.last = frame.element;
        }
        self.paint()
    }

    /// Click the mounted instance of `view`; returns false if it is not mounted.
    pub fn click(&mut self, view: &View<Render<A>>) -> bool {
        let key = self
            .driver
            .mounted()
            .current_path()
            .iter()
            .find(|k| k.view == view.id())
            .cloned();
        match key.and_then(|k| self.clicks.get_mut(&k)) {
            Some(n) => {
                *n += 1;
                true
            }
            None => false,
        }
    }

    /// Render the last resolved chain with current local state.
    pub fn paint(&self) -> String {
        self.last
            .as_ref()
            .map(|e| paint(e, &self.clicks))
            .unwrap_or_default()
    }
}

fn paint<A: 'static>(
    e: &Element<Render<A>, ViewProps<A>, String>,
    clicks: &HashMap<ViewKey, u32>,
) -> String {
    let children = match &e.children {
        Children::Empty => String::new(),
        Children::Forwarded(c) => c.clone(),
        Children::Element(inner) => paint(inner, clicks),
    };
    let cx = Cx {
        props: &e.props,
        children,
        clicks: clicks.get(&e.key).copied().unwrap_or_default(),
    };
    (e.view.get())(&cx)
}
