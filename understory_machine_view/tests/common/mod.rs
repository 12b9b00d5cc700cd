// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A tiny machine and a text host for integration tests.
//!
//! The host renders element chains to strings and keeps one local counter per mounted
//! component instance, keyed by [`ViewKey`], dropping it on unmount.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use understory_machine_view::config::Config;
use understory_machine_view::driver::{Snapshot, StateSource, ViewDriver};
use understory_machine_view::element::{Children, Element, ViewKey, ViewProps};
use understory_machine_view::mount::MountEvent;
use understory_machine_view::state::StateValue;
use understory_machine_view::view::View;

/// `(source state, event, target state)`, states as dotted paths.
pub(crate) type Transition = (&'static str, &'static str, &'static str);

/// A minimal hierarchical machine: the first transition whose source matches wins.
pub(crate) struct Machine {
    transitions: Vec<Transition>,
    current: RefCell<StateValue>,
    version: Cell<u64>,
}

impl Machine {
    pub(crate) fn new(initial: &str, transitions: &[Transition]) -> Rc<Self> {
        Rc::new(Self {
            transitions: transitions.to_vec(),
            current: RefCell::new(dotted(initial)),
            version: Cell::new(1),
        })
    }

    pub(crate) fn send(&self, event: &str) {
        let current = self.current.borrow().clone();
        let target = self
            .transitions
            .iter()
            .find(|(from, ev, _)| *ev == event && current.matches_dotted(from))
            .map(|(_, _, to)| *to);
        if let Some(target) = target {
            *self.current.borrow_mut() = dotted(target);
            self.version.set(self.version.get() + 1);
        }
    }

    pub(crate) fn value(&self) -> StateValue {
        self.current.borrow().clone()
    }
}

impl StateSource for Machine {
    fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.version.get(), self.current.borrow().clone())
    }
}

pub(crate) fn dotted(path: &str) -> StateValue {
    StateValue::from_path(&path.split('.').collect::<Vec<_>>()).unwrap()
}

pub(crate) type Props = ViewProps<Rc<Machine>, &'static str>;

/// What a view sees when the host renders it.
pub(crate) struct Cx<'a> {
    pub(crate) props: &'a Props,
    pub(crate) children: String,
    pub(crate) count: i64,
}

pub(crate) type Render = dyn Fn(&Cx<'_>) -> String + Send + Sync;

pub(crate) fn view(
    name: &'static str,
    render: impl Fn(&Cx<'_>) -> String + Send + Sync + 'static,
) -> View<Render> {
    let render: Arc<Render> = Arc::new(render);
    View::from_arc(name, render)
}

/// A view rendering a fixed string.
pub(crate) fn text(s: &'static str) -> View<Render> {
    view(s, move |_| s.to_string())
}

/// A view rendering its local counter.
pub(crate) fn counter(name: &'static str) -> View<Render> {
    view(name, |cx| format!("Count is:{}", cx.count))
}

pub(crate) struct Host {
    driver: ViewDriver<Render>,
    machine: Rc<Machine>,
    extra: &'static str,
    children: String,
    counts: HashMap<ViewKey, i64>,
    last: Option<Element<Render, Props, String>>,
    pub(crate) log: Vec<MountEvent>,
}

impl Host {
    pub(crate) fn new(config: impl Into<Config<Render>>, machine: &Rc<Machine>) -> Self {
        Self {
            driver: ViewDriver::new(config.into()),
            machine: Rc::clone(machine),
            extra: "",
            children: String::new(),
            counts: HashMap::new(),
            last: None,
            log: Vec::new(),
        }
    }

    pub(crate) fn with_props(mut self, extra: &'static str, children: &str) -> Self {
        self.extra = extra;
        self.children = children.to_string();
        self
    }

    /// Re-resolve if the machine changed, then paint.
    pub(crate) fn render(&mut self) -> String {
        let props = ViewProps {
            actor: Rc::clone(&self.machine),
            extra: self.extra,
        };
        if let Some(frame) = self.driver.poll(&*self.machine, &props, &self.children) {
            for event in &frame.transitions {
                match event {
                    MountEvent::Mount(key) => {
                        self.counts.insert(key.clone(), 0);
                    }
                    MountEvent::Unmount(key) => {
                        self.counts.remove(key);
                    }
                }
            }
            self.log.extend(frame.transitions);
            self.last = frame.element;
        }
        self.paint()
    }

    pub(crate) fn send(&mut self, event: &str) -> String {
        self.machine.send(event);
        self.render()
    }

    /// Bump the local counter of the mounted instance rendering `view`.
    pub(crate) fn click(&mut self, view: &View<Render>) -> String {
        let key = self
            .driver
            .mounted()
            .current_path()
            .iter()
            .find(|k| k.view == view.id())
            .cloned()
            .expect("view is not mounted");
        *self.counts.get_mut(&key).expect("mounted key has state") += 1;
        self.paint()
    }

    pub(crate) fn last(&self) -> Option<&Element<Render, Props, String>> {
        self.last.as_ref()
    }

    fn paint(&self) -> String {
        self.last
            .as_ref()
            .map(|e| paint(e, &self.counts))
            .unwrap_or_default()
    }
}

fn paint(e: &Element<Render, Props, String>, counts: &HashMap<ViewKey, i64>) -> String {
    let children = match &e.children {
        Children::Empty => String::new(),
        Children::Forwarded(c) => c.clone(),
        Children::Element(inner) => paint(inner, counts),
    };
    let cx = Cx {
        props: &e.props,
        children,
        count: counts.get(&e.key).copied().unwrap_or_default(),
    };
    (e.view.get())(&cx)
}
