// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nested states under a shared layout.
//!
//! State `a` has children `b` and `c` and wraps them in a layout with a click counter.
//! Moving between `a.b` and `a.c` keeps the layout instance (and its clicks); leaving
//! `a` for `d` tears it down. Unconfigured children of `a` render the fallback inside
//! the layout.
//!
//! Run:
//! - `cargo run -p understory_demos --example nested_layout`
//! - `RUST_LOG=debug cargo run -p understory_demos --example nested_layout` to see resolutions.

use understory_demos::{TableMachine, TextHost, init_tracing, passthrough, view};
use understory_machine_view::config::StateNode;
use understory_machine_view::state::StateValue;

fn at(path: &str) -> StateValue {
    StateValue::from_path(&path.split('.').collect::<Vec<_>>()).expect("valid demo path")
}

fn main() {
    init_tracing();

    let machine = TableMachine::new(
        at("a.b"),
        [
            ("a.b", "inner", at("a.c")),
            ("a.c", "inner", at("a.e")),
            ("a.e", "inner", at("a.b")),
            ("a", "next", at("d")),
            ("d", "next", at("a.b")),
        ],
    );

    let layout = view::<()>("A", |cx| format!("A({}) clicks={}", cx.children, cx.clicks));
    let config = StateNode::new()
        .layout(passthrough())
        .state(
            "a",
            StateNode::new()
                .layout(layout.clone())
                .fallback(view("Fallback", |_| "nothing here".to_string()))
                .state("b", view("B", |_| "B".to_string()))
                .state("c", view("C", |cx| format!("C[{}]", cx.children))),
        )
        .state("d", view("D", |_| "D".to_string()));
    let mut host = TextHost::new(config);

    let mut frames = vec![host.frame(&machine, &(), "kids")];
    host.click(&layout);
    host.click(&layout);
    for event in ["inner", "inner", "inner", "next", "next"] {
        machine.send(event);
        frames.push(host.frame(&machine, &(), "kids"));
    }
    for (i, frame) in frames.iter().enumerate() {
        println!("== Frame {i} ==\n  {frame}");
    }

    assert_eq!(
        frames,
        [
            "A(B) clicks=0",
            "A(C[kids]) clicks=2",
            "A(nothing here) clicks=2",
            "A(B) clicks=2",
            "D",
            "A(B) clicks=0",
        ]
    );
}
