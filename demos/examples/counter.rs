// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Counter app: a two-state machine rendered through terminal components.
//!
//! While running (`a`) the view shows the count and offers Stop; while stopped (`b`)
//! it offers Start. Views read the count from, and send events to, the machine handle
//! they receive as props.
//!
//! Run:
//! - `cargo run -p understory_demos --example counter`

use std::rc::Rc;

use understory_demos::{CountEvent, CountMachine, TextHost, init_tracing, view};
use understory_machine_view::config::StateNode;

type Actor = Rc<CountMachine>;

fn main() {
    init_tracing();

    let machine: Actor = Rc::new(CountMachine::default());
    let running = view::<Actor>("Running", |cx| {
        format!("[count is {}] [Stop]", cx.props.actor.count())
    });
    let stopped = view::<Actor>("Stopped", |_| "[Start]".to_string());

    let config = StateNode::new()
        .state("a", StateNode::new().component(running))
        .state("b", StateNode::new().component(stopped));
    let mut host = TextHost::new(config);

    let first = host.frame(&*machine, &machine, "");
    println!("== Initial ==\n  {first}");

    machine.send(CountEvent::Count);
    machine.send(CountEvent::Count);
    let counted = host.frame(&*machine, &machine, "");
    println!("== After two counts ==\n  {counted}");

    machine.send(CountEvent::Stop);
    let stopped = host.frame(&*machine, &machine, "");
    println!("== Stopped ==\n  {stopped}");

    // Counting is ignored while stopped.
    machine.send(CountEvent::Count);
    machine.send(CountEvent::Start);
    let restarted = host.frame(&*machine, &machine, "");
    println!("== Restarted ==\n  {restarted}");

    assert_eq!(first, "[count is 0] [Stop]");
    assert_eq!(counted, "[count is 2] [Stop]");
    assert_eq!(stopped, "[Start]");
    assert_eq!(restarted, "[count is 2] [Stop]");
}
