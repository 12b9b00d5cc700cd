// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_machine_view::config::{Config, StateNode};
use understory_machine_view::element::keys_of;
use understory_machine_view::mount::MountState;
use understory_machine_view::resolver::resolve;
use understory_machine_view::state::StateValue;
use understory_machine_view::view::View;

/// A chain `s0.s1...` where every level has a layout and a component.
fn deep_config(depth: usize) -> Config<()> {
    let mut config: Config<()> = View::new("leaf", ()).into();
    for level in (0..depth).rev() {
        config = StateNode::new()
            .layout(View::new("layout", ()))
            .component(View::new("component", ()))
            .state(format!("s{level}"), config)
            .into();
    }
    config
}

fn deep_value(depth: usize) -> StateValue {
    let labels: Vec<String> = (0..depth).map(|level| format!("s{level}")).collect();
    StateValue::from_path(&labels).unwrap()
}

/// One node with `width` leaf states and a fallback.
fn wide_config(width: usize) -> Config<()> {
    let mut node = StateNode::new().fallback(View::new("fallback", ()));
    for i in 0..width {
        node = node.state(format!("w{i}"), View::new("leaf", ()));
    }
    node.into()
}

fn bench_resolve_deep(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_deep");
    for &depth in &[4usize, 16, 64] {
        let config = deep_config(depth);
        let value = deep_value(depth);
        group.throughput(Throughput::Elements(depth as u64));
        group.bench_function(format!("depth{depth}"), |b| {
            b.iter(|| {
                let root = resolve(&config, Some(black_box(&value)), &(), &());
                black_box(root.map(|e| e.iter().count()));
            });
        });
    }
    group.finish();
}

fn bench_resolve_wide(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_wide");
    for &width in &[16usize, 256, 4096] {
        let config = wide_config(width);
        let hit = StateValue::leaf(format!("w{}", width / 2));
        let miss = StateValue::leaf("missing");
        group.bench_function(format!("hit_w{width}"), |b| {
            b.iter(|| black_box(resolve(&config, Some(black_box(&hit)), &(), &()).is_some()));
        });
        group.bench_function(format!("fallback_w{width}"), |b| {
            b.iter(|| black_box(resolve(&config, Some(black_box(&miss)), &(), &()).is_some()));
        });
    }
    group.finish();
}

fn bench_mount_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("mount_diff");
    for &depth in &[4usize, 16, 64] {
        let config = deep_config(depth);
        let value = deep_value(depth);
        let Some(root) = resolve(&config, Some(&value), &(), &()) else {
            continue;
        };
        let full = keys_of(Some(&root));
        // Leaving the innermost state replaces only the tail of the chain.
        let truncated = &full[..full.len() - 1];
        group.bench_function(format!("toggle_tail_depth{depth}"), |b| {
            b.iter_batched(
                || {
                    let mut mounted = MountState::new();
                    let _ = mounted.update(&full);
                    mounted
                },
                |mut mounted| {
                    black_box(mounted.update(truncated).len());
                    black_box(mounted.update(&full).len());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_resolve_deep,
    bench_resolve_wide,
    bench_mount_diff
);
criterion_main!(benches);
