// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_machine_view --heading-base-level=0

//! Understory Machine View: resolve hierarchical state machine values into views.
//!
//! ## Overview
//!
//! A hierarchical state machine reports where it is as a
//! [`StateValue`](crate::state::StateValue): a label, or a label whose active child is itself
//! a state value (`a.b.c`).
//! This crate maps such values onto a declarative [`Config`](crate::config::Config) tree that
//! names, per state position, an optional layout, an optional terminal component, an optional
//! fallback, and the configurations of child states.
//! The [resolver](crate::resolver) walks both in lock-step and emits an
//! [`Element`](crate::element::Element) chain for a host UI runtime to render.
//!
//! It does not run state machines and it does not render.
//! The machine runtime is consumed through [`StateSource`](crate::driver::StateSource), and the
//! host receives plain view references, props, and children.
//!
//! ## Identity
//!
//! Views are [`View`](crate::view::View) handles whose identity is fixed at construction.
//! Every element carries a [`ViewKey`](crate::element::ViewKey): the state labels leading to
//! the configuration node that selected it, the slot, the chain depth, and the view id. The same
//! view selected by the same node across two state values (such as two sibling states sharing
//! one view) is the same component instance to the host, and its local state survives.
//! [`view::passthrough`](crate::view::passthrough) builds a layout that only renders its
//! children.
//! [`MountState`](crate::mount::MountState) turns successive key paths into mount/unmount events.
//!
//! ## Workflow
//!
//! 1) Declare the configuration once, with views built once (clone a [`View`](crate::view::View)
//!    to share it between states).
//! 2) Drive it with [`ViewDriver::poll`](crate::driver::ViewDriver::poll) whenever the machine may
//!    have changed. Each new snapshot version is resolved exactly once.
//! 3) Render the returned element and apply its mount transitions to component instances.
//!
//! ## Example
//!
//! ```
//! use understory_machine_view::config::{Config, StateNode};
//! use understory_machine_view::resolver::resolve;
//! use understory_machine_view::state::StateValue;
//! use understory_machine_view::view::View;
//!
//! let shell = View::new("Shell", ());
//! let (b, c, fallback) = (View::new("B", ()), View::new("C", ()), View::new("Fallback", ()));
//!
//! let config: Config<()> = StateNode::new()
//!     .state(
//!         "a",
//!         StateNode::new()
//!             .layout(shell.clone())
//!             .fallback(fallback.clone())
//!             .state("b", b.clone())
//!             .state("c", c.clone()),
//!     )
//!     .into();
//!
//! let at = |labels: &[&str]| StateValue::from_path(labels).unwrap();
//!
//! let first = resolve(&config, Some(&at(&["a", "b"])), &(), &()).unwrap();
//! let second = resolve(&config, Some(&at(&["a", "c"])), &(), &()).unwrap();
//! assert_eq!(first.views(), vec![&shell, &b]);
//! assert_eq!(second.views(), vec![&shell, &c]);
//! // The shell keeps its identity across the transition.
//! assert_eq!(first.key, second.key);
//!
//! let missing = resolve(&config, Some(&at(&["a", "z"])), &(), &()).unwrap();
//! assert_eq!(missing.views(), vec![&shell, &fallback]);
//! assert!(resolve(&config, Some(&at(&["q"])), &(), &()).is_none());
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` in dependencies.
//! - `serde` (default): [`StateValue`](crate::state::StateValue) parsing from and serialization to
//!   the machine runtime's JSON shape.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod config;
pub mod driver;
pub mod element;
pub mod mount;
pub mod resolver;
pub mod state;
pub mod view;
