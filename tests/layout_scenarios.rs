use std::time::Duration;

use serde_json::{Value, json};

use nodescope::graph::{Edge, ValidatedGraph, ValidationError, compute_stats, validate};
use nodescope::layout::{
    FrameScheduler, LayoutConfig, LayoutEngine, LayoutHandle, LayoutMode, LayoutParameters,
    ParameterUpdate, create_layout,
};

#[derive(Debug, Default)]
struct CountingScheduler {
    requested: usize,
    cancelled: usize,
}

impl FrameScheduler for CountingScheduler {
    fn request_frame(&mut self) {
        self.requested += 1;
    }

    fn cancel_frame(&mut self) {
        self.cancelled += 1;
    }
}

fn graph(value: Value) -> ValidatedGraph {
    validate(&value).expect("graph should validate")
}

fn viewport() -> LayoutConfig {
    LayoutConfig::new(800.0, 600.0)
}

fn settle(handle: &mut LayoutHandle<CountingScheduler>) -> usize {
    let mut frames = 0;
    while !handle.is_stable() {
        handle.advance(Duration::from_millis(16));
        handle.on_frame();
        frames += 1;
        assert!(frames < 5_000, "layout never settled");
    }
    frames
}

/// Ring of `count` nodes with a chord every fifth node.
fn ring(count: usize) -> ValidatedGraph {
    let nodes = (0..count)
        .map(|index| json!({"id": format!("n{index}"), "name": format!("Node {index}")}))
        .collect::<Vec<_>>();
    let mut edges = (0..count)
        .map(|index| json!({"sourceId": format!("n{index}"), "targetId": format!("n{}", (index + 1) % count)}))
        .collect::<Vec<_>>();
    edges.extend((0..count).step_by(5).map(|index| {
        json!({"sourceId": format!("n{index}"), "targetId": format!("n{}", (index + count / 2) % count)})
    }));
    graph(json!({"nodes": nodes, "edges": edges}))
}

#[test]
fn pair_settles_near_link_distance() {
    let graph = graph(json!({
        "nodes": [{"id": "a", "name": "A"}, {"id": "b", "name": "B"}],
        "edges": [{"sourceId": "a", "targetId": "b"}]
    }));

    let stats = compute_stats(&graph);
    assert_eq!(stats.node_count, 2);
    assert_eq!(stats.edge_count, 1);
    assert!(stats.invalid_edges.is_empty());

    let mut handle = create_layout(&graph, viewport(), CountingScheduler::default());
    settle(&mut handle);

    let snapshot = handle.snapshot();
    assert!(snapshot.is_stable);
    let distance = (snapshot.nodes[0].position - snapshot.nodes[1].position).length();
    let link_distance = LayoutParameters::default().link_distance;
    assert!(
        (distance - link_distance).abs() < 15.0,
        "pair settled {distance} apart"
    );
}

#[test]
fn edge_to_missing_node_is_reported_and_not_laid_out() {
    let graph = graph(json!({
        "nodes": [{"id": "a", "name": "A"}],
        "edges": [{"sourceId": "a", "targetId": "missing"}]
    }));

    let stats = compute_stats(&graph);
    assert_eq!(stats.invalid_edges, vec![Edge::new("a", "missing")]);
    assert_eq!(
        stats.invalid_edges.len() + stats.resolvable_edge_count(),
        graph.edges.len()
    );

    let handle = create_layout(&graph, viewport(), CountingScheduler::default());
    assert!(handle.engine().edges().is_empty());
    assert!(handle.snapshot().links.is_empty());
    assert_eq!(handle.snapshot().nodes.len(), 1);
}

#[test]
fn duplicate_ids_fail_validation() {
    let error = validate(&json!({
        "nodes": [{"id": "x", "name": "X"}, {"id": "x", "name": "Y"}],
        "edges": []
    }))
    .unwrap_err();

    assert_eq!(
        error,
        ValidationError::DuplicateNodeId {
            id: "x".to_owned(),
            index: 1
        }
    );
    assert!(error.to_string().contains("`x`"));
    assert_eq!(error.field().as_deref(), Some("nodes[1].id"));
}

#[test]
fn same_graph_and_viewport_seed_identical_positions() {
    let graph = ring(25);
    for mode in [LayoutMode::Force, LayoutMode::Radial] {
        let config = viewport().with_mode(mode);
        let first = LayoutEngine::new(&graph, &config);
        let second = LayoutEngine::new(&graph.clone(), &config);
        assert_eq!(first.nodes(), second.nodes());
    }
}

#[test]
fn connected_graph_converges() {
    let graph = ring(40);
    let mut handle = create_layout(&graph, viewport(), CountingScheduler::default());
    settle(&mut handle);

    let engine = handle.engine();
    assert!(engine.is_stable());
    assert!(engine.ticks() <= 310, "took {} ticks", engine.ticks());
    assert!(
        handle
            .snapshot()
            .nodes
            .iter()
            .all(|node| node.position.is_finite())
    );
}

#[test]
fn repeated_identical_params_do_not_move_a_settled_layout() {
    let graph = ring(12);
    let mut handle = create_layout(&graph, viewport(), CountingScheduler::default());

    let update = ParameterUpdate {
        link_distance: Some(140.0),
        ..Default::default()
    };
    assert!(handle.set_params(update));
    settle(&mut handle);
    let settled = handle.snapshot();

    assert!(!handle.set_params(update));
    assert!(handle.is_stable());
    handle.advance(Duration::from_secs(1));
    handle.on_frame();
    assert_eq!(*handle.snapshot(), *settled);
}

#[test]
fn fast_ticks_coalesce_into_one_frame() {
    let graph = ring(10);
    let mut handle = create_layout(&graph, viewport(), CountingScheduler::default());
    handle.on_frame();
    let before = handle.scheduler().requested;

    for _ in 0..7 {
        handle.tick();
    }
    assert_eq!(handle.scheduler().requested, before + 1);

    assert!(handle.on_frame());
    assert!(!handle.on_frame());
    let snapshot = handle.snapshot();
    assert_eq!(snapshot.tick, 7);
    for (published, live) in snapshot.nodes.iter().zip(handle.engine().nodes()) {
        assert_eq!(published.position, live.position);
    }
}

#[test]
fn destroying_a_handle_cancels_its_frame() {
    let graph = ring(10);
    let mut handle = create_layout(&graph, viewport(), CountingScheduler::default());
    assert_eq!(handle.scheduler().requested, 1);

    handle.destroy();
    assert_eq!(handle.scheduler().cancelled, 1);
    assert!(!handle.on_frame());
    assert!(!handle.tick());
}

#[test]
fn zero_area_viewport_gives_empty_stable_layout() {
    let graph = ring(5);
    let handle = create_layout(
        &graph,
        LayoutConfig::new(0.0, 0.0),
        CountingScheduler::default(),
    );
    assert!(handle.is_stable());
    assert!(handle.snapshot().nodes.is_empty());
}

#[test]
fn dragged_node_follows_its_pin() {
    let graph = ring(8);
    let mut handle = create_layout(&graph, viewport(), CountingScheduler::default());
    settle(&mut handle);

    assert!(handle.pin_node("n3", 50.0, 60.0));
    assert!(handle.engine().is_running());
    for _ in 0..20 {
        handle.advance(Duration::from_millis(16));
        handle.on_frame();
    }
    let pinned = handle
        .snapshot()
        .nodes
        .iter()
        .find(|node| node.pinned)
        .copied()
        .expect("pinned node in snapshot");
    assert_eq!(pinned.position.x, 50.0);
    assert_eq!(pinned.position.y, 60.0);

    assert!(handle.unpin_node("n3"));
    settle(&mut handle);
    assert!(handle.snapshot().nodes.iter().all(|node| !node.pinned));
}
