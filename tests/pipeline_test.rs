//! End-to-end preparation tests over in-memory tables.

use std::collections::BTreeSet;
use std::sync::Arc;

use narrative_web::engine::{NodeScope, UNKNOWN_CLUSTER};
use narrative_web::{
    EngineConfig, NarrativeEngine, Notice, Period, TableKind, TopicCatalog, dataset_from_values,
};
use serde_json::{Value, json};

fn node(quarter: &str, x: f64, y: f64, cluster: &str, theme: &str) -> Value {
    json!({
        "quarter": quarter, "x": x, "y": y, "cluster_name": cluster, "theme": theme,
        "avg_score": 50.0, "scaled_size": 10.0, "sentiment": 0.25
    })
}

fn edge(quarter: &str, from: (f64, f64), to: (f64, f64), weight: f64) -> Value {
    json!({
        "quarter": quarter, "x0": from.0, "y0": from.1, "x1": to.0, "y1": to.1,
        "weight": weight, "color": "rgba(34,197,94,0.6)", "theme_1": "left", "theme_2": "right",
        "sentiment": 0.5
    })
}

fn engine(nodes: Value, edges: Value) -> NarrativeEngine {
    engine_with(nodes, edges, EngineConfig::default())
}

fn engine_with(nodes: Value, edges: Value, config: EngineConfig) -> NarrativeEngine {
    let dataset = dataset_from_values(nodes, edges).expect("tables load");
    NarrativeEngine::new(Arc::new(dataset), TopicCatalog::default(), config)
}

fn sample_engine() -> NarrativeEngine {
    engine(
        json!([
            node("2024Q1", 0.0, 0.0, "Awareness", "breath"),
            node("2024Q1", 1.0, 0.0, "Self-Regulation", "urges"),
            node("2024Q1", 5.0, 5.0, "Awareness", "noting"),
            node("2024Q2", 0.0, 0.0, "Awareness", "breath"),
            node("2024Q2", 0.0, 1.0, "Anxiety & Mental Health", "panic"),
            node("2024Q2", 2.0, 2.0, "Buddhism & Spirituality", "metta"),
        ]),
        json!([
            edge("2024Q1", (0.0, 0.0), (1.0, 0.0), 120.0),
            edge("2024Q2", (0.0, 0.0), (0.0, 1.0), 80.0),
            edge("2024Q2", (2.0, 2.0), (0.0, 1.0), 40.0),
        ]),
    )
}

#[test]
fn three_nodes_one_edge_gives_two_thirds_connected() {
    let payload = sample_engine().prepare_key("2024Q1");

    assert_eq!(payload.summary.total_nodes, 3);
    assert_eq!(payload.summary.total_edges, 1);
    assert_eq!(payload.summary.connected_count, 2);
    assert!((payload.summary.co_occurrence_rate - 66.7).abs() < 0.05);
}

#[test]
fn connected_count_never_exceeds_total() {
    let engine = sample_engine();
    for payload in engine.prepare_all() {
        assert!(payload.summary.connected_count <= payload.summary.total_nodes);
    }
}

#[test]
fn empty_period_degrades_to_zero() {
    let payload = sample_engine().prepare_key("2031Q4");

    assert!(payload.is_empty);
    assert_eq!(payload.summary.total_nodes, 0);
    assert_eq!(payload.summary.co_occurrence_rate, 0.0);
    assert!(payload.nodes.is_empty() && payload.labels.is_empty() && payload.clusters.is_empty());
    assert_eq!(payload.empty_message.as_deref(), Some("No data available for 2031Q4"));
}

#[test]
fn cluster_percentages_sum_to_one_hundred() {
    let payload = sample_engine().prepare_key("2024Q2");
    let total = payload.clusters.iter().map(|c| c.percentage).sum::<f64>();
    assert!((total - 100.0).abs() < 1e-9);
}

#[test]
fn payload_counts_round_trip() {
    let engine = sample_engine();
    for payload in engine.prepare_all() {
        assert_eq!(payload.nodes.len(), payload.summary.total_nodes);
        assert_eq!(payload.edges.len(), payload.summary.total_edges);
    }
}

#[test]
fn repeated_preparation_is_byte_identical() {
    let engine = sample_engine();
    let period = Period::new("2024Q2");

    let first = engine.prepare(&period).to_json(false).unwrap();
    let second = engine.prepare(&period).to_json(false).unwrap();
    assert_eq!(first, second);

    let payload = engine.prepare(&period);
    let anxiety = payload
        .clusters
        .iter()
        .find(|c| c.name == "Anxiety & Mental Health")
        .unwrap();
    let partners = anxiety
        .co_occurrences
        .iter()
        .map(|c| (c.cluster.as_str(), c.weight))
        .collect::<Vec<_>>();
    assert_eq!(partners, vec![("Awareness", 80.0), ("Buddhism & Spirituality", 40.0)]);
}

#[test]
fn labels_are_sorted_and_reproducible_across_engines() {
    let first = sample_engine().prepare_key("2024Q2");
    let second = sample_engine().prepare_key("2024Q2");

    assert_eq!(first.labels, second.labels);
    let texts = first.labels.iter().map(|l| l.text.as_str()).collect::<Vec<_>>();
    let sorted = texts.iter().copied().collect::<BTreeSet<_>>().into_iter().collect::<Vec<_>>();
    assert_eq!(texts, sorted);
}

#[test]
fn hover_point_counts_follow_edge_length() {
    let payload = sample_engine().prepare_key("2024Q2");

    // lengths 1.0 and sqrt(5): max(5, floor(L * 20))
    let expected = 20 + (5.0_f64.sqrt() * 20.0).floor() as usize;
    assert_eq!(payload.hover_points.len(), expected);
    assert!(payload.hover_points[..20].iter().all(|p| p.hover_text == payload.edges[0].hover_text));
}

#[test]
fn set_valued_score_is_unwrapped_for_display() {
    let mut scored = node("2024Q1", 0.0, 0.0, "Awareness", "breath");
    scored["avg_score"] = json!([42]);
    let payload = engine(json!([scored]), json!([])).prepare_key("2024Q1");

    assert_eq!(payload.nodes[0].avg_score_display, 42);
    assert!(payload.nodes[0].hover_text.contains("<b>Engagement Score:</b> 42<br>"));
}

#[test]
fn dangling_endpoint_is_labelled_unknown() {
    let payload = engine(
        json!([node("2024Q1", 0.0, 0.0, "Awareness", "breath")]),
        json!([edge("2024Q1", (0.0, 0.0), (9.0, 9.0), 60.0)]),
    )
    .prepare_key("2024Q1");

    assert_eq!(payload.edges[0].source_cluster, "Awareness");
    assert_eq!(payload.edges[0].target_cluster, UNKNOWN_CLUSTER);
    assert!(payload.clusters[0].co_occurrences.is_empty());
    assert_eq!(payload.summary.connected_count, 1);
}

#[test]
fn missing_sentiment_defaults_and_notifies_once_per_table() {
    let mut nodes = vec![
        node("2024Q1", 0.0, 0.0, "Awareness", "breath"),
        node("2024Q2", 1.0, 0.0, "Awareness", "noting"),
    ];
    let mut edges = vec![
        edge("2024Q1", (0.0, 0.0), (1.0, 0.0), 10.0),
        edge("2024Q2", (0.0, 0.0), (1.0, 0.0), 10.0),
    ];
    for row in nodes.iter_mut().chain(edges.iter_mut()) {
        row.as_object_mut().unwrap().remove("sentiment");
    }

    let engine = engine(Value::Array(nodes), Value::Array(edges));
    assert_eq!(
        engine.dataset().notices(),
        &[
            Notice::missing_sentiment(TableKind::Nodes),
            Notice::missing_sentiment(TableKind::Edges),
        ]
    );

    for payload in engine.prepare_all() {
        assert!(payload.nodes.iter().all(|n| n.sentiment == 0.0));
        assert!(payload.edges.iter().all(|e| e.sentiment == 0.0));
    }
}

#[test]
fn connected_scope_drops_isolated_nodes() {
    let config = EngineConfig {
        node_scope: NodeScope::Connected,
        ..EngineConfig::default()
    };
    let nodes = json!([
        node("2024Q1", 0.0, 0.0, "Awareness", "breath"),
        node("2024Q1", 1.0, 0.0, "Self-Regulation", "urges"),
        node("2024Q1", 5.0, 5.0, "Zen", "koan"),
    ]);
    let edges = json!([edge("2024Q1", (0.0, 0.0), (1.0, 0.0), 120.0)]);
    let payload = engine_with(nodes, edges, config).prepare_key("2024Q1");

    assert_eq!(payload.nodes.len(), payload.summary.connected_count);
    assert!(payload.nodes.iter().all(|n| n.connected));
    assert!(!payload.cluster_color_map.contains_key("Zen"));
    assert_eq!(payload.summary.total_nodes, 3);
}

#[test]
fn explicit_ids_join_despite_coordinate_drift() {
    let mut a = node("2024Q1", 0.0, 0.0, "Awareness", "breath");
    let mut b = node("2024Q1", 1.0, 0.0, "Self-Regulation", "urges");
    a["id"] = json!("n-a");
    b["id"] = json!("n-b");
    let mut link = edge("2024Q1", (0.0001, 0.0), (1.0, 0.0002), 30.0);
    link["source"] = json!("n-a");
    link["target"] = json!("n-b");

    let payload = engine(json!([a, b]), json!([link])).prepare_key("2024Q1");
    assert_eq!(payload.summary.connected_count, 2);
    assert_eq!(payload.edges[0].target_cluster, "Self-Regulation");
}

#[test]
fn quarter_turn_rotates_every_position() {
    let config = EngineConfig {
        rotate_quarter_turn: true,
        ..EngineConfig::default()
    };
    let payload = engine_with(
        json!([node("2024Q1", 2.0, 3.0, "Awareness", "breath"), node("2024Q1", 1.0, 0.0, "Awareness", "noting")]),
        json!([edge("2024Q1", (2.0, 3.0), (1.0, 0.0), 10.0)]),
        config,
    )
    .prepare_key("2024Q1");

    assert_eq!((payload.nodes[0].x, payload.nodes[0].y), (-3.0, 2.0));
    assert_eq!((payload.edges[0].x1, payload.edges[0].y1), (-0.0, 1.0));
    assert_eq!(payload.summary.connected_count, 2);
}

#[test]
fn search_highlights_matching_nodes() {
    let engine = sample_engine();
    let payload = engine.prepare_with_search(&Period::new("2024Q2"), "metta");

    assert_eq!(payload.highlighted.len(), 1);
    assert_eq!(payload.nodes[payload.highlighted[0]].theme, "metta");
}

#[test]
fn serialized_payload_exposes_consumer_fields() {
    let payload = sample_engine().prepare_key("2024Q1");
    let json: Value = serde_json::from_str(&payload.to_json(false).unwrap()).unwrap();

    for field in ["total_nodes", "total_edges", "connected_count", "co_occurrence_rate"] {
        assert!(json.get(field).is_some(), "missing {field}");
    }
    for field in ["x0", "y0", "x1", "y1", "weight", "color", "hover_text"] {
        assert!(json["edges"][0].get(field).is_some(), "edge missing {field}");
    }
    for field in ["x", "y", "size", "color", "cluster", "hover_text"] {
        assert!(json["nodes"][0].get(field).is_some(), "node missing {field}");
    }
    for field in ["x", "y", "text", "color"] {
        assert!(json["labels"][0].get(field).is_some(), "label missing {field}");
    }
    assert_eq!(json["cluster_color_map"]["Awareness"], "#1f77b4");
    assert_eq!(json["cluster_color_map"]["Self-Regulation"], "#808000");
}

#[test]
fn period_index_defaults_to_latest_and_clamps() {
    let mut periods = sample_engine().periods();

    assert_eq!(periods.labels(), vec!["2024Q1", "2024Q2"]);
    assert_eq!(periods.current().map(|p| p.key.as_str()), Some("2024Q2"));
    assert_eq!(periods.select(17).map(|p| p.key.as_str()), Some("2024Q2"));
}

fn engine_without_sentiment() -> NarrativeEngine {
    let mut nodes = vec![
        node("2024Q1", 0.0, 0.0, "Awareness", "breath"),
        node("2024Q1", 1.0, 0.0, "Self-Regulation", "urges"),
        node("2024Q2", 0.0, 0.0, "Awareness", "noting"),
    ];
    let mut edges = vec![
        edge("2024Q1", (0.0, 0.0), (1.0, 0.0), 10.0),
        edge("2024Q2", (0.0, 0.0), (0.0, 0.0), 10.0),
    ];
    for row in nodes.iter_mut().chain(edges.iter_mut()) {
        row.as_object_mut().unwrap().remove("sentiment");
    }
    engine(Value::Array(nodes), Value::Array(edges))
}

#[test]
fn period_report_carries_each_notice_once() {
    let engine = engine_without_sentiment();
    let payload = engine.prepare_key("2024Q1");
    let rendered = engine.report(&payload).to_json(false).unwrap();

    assert_eq!(rendered.matches("Sentiment data not found in nodes").count(), 1);
    assert_eq!(rendered.matches("Sentiment data not found in edges").count(), 1);

    let json: Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(json["notices"][0]["table"], "nodes");
    assert_eq!(json["notices"][1]["table"], "edges");
    assert_eq!(json["total_nodes"], 2);
}

#[test]
fn batch_report_does_not_repeat_notices_per_period() {
    let engine = engine_without_sentiment();
    let payloads = engine.prepare_all();
    let rendered = engine.batch_report(&payloads).to_json(true).unwrap();

    assert_eq!(rendered.matches("Sentiment data not found in nodes").count(), 1);
    assert_eq!(rendered.matches("Sentiment data not found in edges").count(), 1);

    let json: Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(json["periods"].as_array().map(Vec::len), Some(2));
    assert!(json["periods"][0].get("notices").is_none());
}

#[test]
fn clean_tables_report_an_empty_notice_list() {
    let engine = sample_engine();
    let payload = engine.prepare_key("2024Q1");
    let json: Value = serde_json::from_str(&engine.report(&payload).to_json(false).unwrap()).unwrap();

    assert_eq!(json["notices"], json!([]));
}

#[test]
fn prepare_all_keeps_period_order_across_many_periods() {
    let nodes = (2000..2060)
        .map(|year| node(&format!("{year}Q1"), 0.0, 0.0, "Awareness", "breath"))
        .collect::<Vec<_>>();
    let engine = engine(Value::Array(nodes), json!([]));

    let keys = engine
        .prepare_all()
        .into_iter()
        .map(|payload| payload.period.key)
        .collect::<Vec<_>>();
    let expected = (2000..2060).map(|year| format!("{year}Q1")).collect::<Vec<_>>();
    assert_eq!(keys, expected);
}
