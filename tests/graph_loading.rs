use std::fs;
use std::ptr;

use nodescope::graph::{
    CATEGORY_PALETTE, CategoryFilter, DEFAULT_NODE_COLOR, UNCATEGORIZED, ValidationError,
    build_index, load_graph_file, parse_graph_document,
};

const SERVICES: &str = r##"{
    "nodes": [
        {"id": "api", "name": "API", "categories": ["service"], "level": 0},
        {"id": "db", "name": "Database", "categories": ["storage", "service"], "level": 1},
        {"id": "cache", "name": "Cache", "categories": ["storage"], "color": "#ff0000"},
        {"id": "docs", "name": "Docs", "color": "not-a-color", "properties": {"owner": "team-a"}}
    ],
    "edges": [
        {"sourceId": "api", "targetId": "db"},
        {"sourceId": "api", "targetId": "cache", "properties": {"weight": 2}},
        {"sourceId": "docs", "targetId": "wiki"}
    ]
}"##;

#[test]
fn document_loads_with_index_stats_and_palette() {
    let loaded = parse_graph_document(SERVICES).unwrap();

    assert_eq!(loaded.stats.node_count, 4);
    assert_eq!(loaded.stats.edge_count, 3);
    assert_eq!(loaded.stats.resolvable_edge_count(), 2);
    assert_eq!(loaded.stats.invalid_edges[0].target_id, "wiki");
    assert_eq!(loaded.index.invalid_edge_positions(), &[2]);

    for node in &loaded.graph.nodes {
        assert!(ptr::eq(loaded.node(&node.id).unwrap(), node));
    }
    for edge in loaded.graph.edges.iter().take(2) {
        let found = loaded.edge(&edge.source_id, &edge.target_id).unwrap();
        assert!(ptr::eq(found, edge));
    }

    let mut neighbors = loaded
        .index
        .neighbors(&loaded.graph, "api")
        .map(|position| loaded.graph.nodes[position].id.as_str())
        .collect::<Vec<_>>();
    neighbors.sort_unstable();
    assert_eq!(neighbors, ["cache", "db"]);

    let palette = &loaded.palette;
    assert_eq!(palette.categories(), ["service", "storage"]);
    assert_eq!(palette.count("storage"), 2);
    assert_eq!(palette.count(UNCATEGORIZED), 1);

    let color_of = |id: &str| palette.node_color(loaded.node(id).unwrap());
    assert_eq!(color_of("api"), CATEGORY_PALETTE[0]);
    assert_eq!(color_of("db"), CATEGORY_PALETTE[1]);
    assert_eq!(color_of("cache").r(), 255);
    assert_eq!(color_of("docs"), DEFAULT_NODE_COLOR);
}

#[test]
fn hiding_one_category_hides_multi_category_nodes() {
    let loaded = parse_graph_document(SERVICES).unwrap();
    let mut filter = CategoryFilter::default();
    filter.set_hidden("storage", true);

    let visible = loaded
        .graph
        .nodes
        .iter()
        .filter(|node| filter.is_node_visible(node))
        .map(|node| node.id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(visible, ["api", "docs"]);

    filter.toggle(UNCATEGORIZED);
    assert!(!filter.is_node_visible(loaded.node("docs").unwrap()));
}

#[test]
fn invalid_documents_never_produce_a_graph() {
    let syntax = parse_graph_document("{\"nodes\": [").unwrap_err();
    assert!(format!("{syntax:#}").contains("not valid JSON"));

    let structural =
        parse_graph_document(r#"{"nodes": [{"id": "a"}], "edges": []}"#).unwrap_err();
    assert_eq!(
        structural.downcast_ref::<ValidationError>(),
        Some(&ValidationError::InvalidNodeName { index: 0 })
    );
}

#[test]
fn files_load_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("services.json");
    fs::write(&path, SERVICES).unwrap();

    let loaded = load_graph_file(&path).unwrap();
    assert_eq!(loaded.graph, parse_graph_document(SERVICES).unwrap().graph);
    assert_eq!(build_index(&loaded.graph).node_position("cache"), Some(2));

    let missing = load_graph_file(&dir.path().join("absent.json")).unwrap_err();
    assert!(format!("{missing:#}").contains("failed to read"));
}
