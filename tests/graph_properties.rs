use activity_graph_canvas::{
	ActivityDocument, GraphBuilder, GraphError, GraphModel, GraphOptions, HIT_PADDING, NodeKind,
	Point, animated_position, hit_test,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde_json::{Value, json};

fn summary(languages: Value, extensions: Value) -> Value {
	json!({
		"total_repos": 2,
		"total_commits": 40,
		"total_lines_changed": 2000,
		"languages": languages,
		"contribution_types": { "production_code": 300, "tests": 100 },
		"file_extensions": extensions
	})
}

fn two_repo_document() -> ActivityDocument {
	ActivityDocument::from_value(json!({
		"summary": summary(json!({ "Rust": 400 }), json!({ "rs": 400 })),
		"repositories": [
			{ "name": "alpha", "total_commits": 10, "languages": { "Rust": 100 }, "file_extensions": { "rs": 100 } },
			{ "name": "beta", "total_commits": 30, "languages": { "Rust": 300 }, "file_extensions": { "rs": 300 } }
		]
	}))
	.unwrap()
}

fn build(doc: &ActivityDocument, options: &GraphOptions, w: f64, h: f64, seed: u64) -> GraphModel {
	GraphBuilder::new(options, w, h).build(doc, &mut SmallRng::seed_from_u64(seed))
}

#[test]
fn layout_is_deterministic() {
	let doc = two_repo_document();
	let options = GraphOptions::default();
	let a = build(&doc, &options, 900.0, 700.0, 11);
	let b = build(&doc, &options, 900.0, 700.0, 99);
	let positions = |m: &GraphModel| -> Vec<(String, u64, u64)> {
		m.nodes()
			.iter()
			.map(|n| (n.id.clone(), n.position.x.to_bits(), n.position.y.to_bits()))
			.collect()
	};
	assert_eq!(positions(&a), positions(&b));
}

#[test]
fn every_link_resolves_to_indexed_nodes() {
	let doc = ActivityDocument::from_value(json!({
		"summary": summary(json!({ "Rust": 400, "Go": 5 }), json!({ "rs": 400 })),
		"repositories": [
			{
				"name": "alpha",
				"languages": { "Rust": 100, "Elm": 40 },
				"contribution_types": { "production_code": 100, "design": 12 },
				"file_extensions": { "rs": 100, "elm": 40 }
			}
		]
	}))
	.unwrap();
	let model = build(&doc, &GraphOptions::default(), 800.0, 600.0, 1);
	assert_eq!(model.links().len(), 3);
	for link in model.links() {
		assert!(model.get(&link.source_id).is_some());
		assert!(model.get(&link.target_id).is_some());
		assert!((0.0..=1.0).contains(&link.weight));
	}
}

#[test]
fn radius_is_monotonic_and_bounded_per_kind() {
	let languages: serde_json::Map<String, Value> = (0..10)
		.map(|i| (format!("L{i}"), json!(10u64.pow(i))))
		.collect();
	let doc = ActivityDocument::from_value(json!({
		"summary": summary(Value::Object(languages), json!({}))
	}))
	.unwrap();
	let model = build(&doc, &GraphOptions::default(), 800.0, 600.0, 1);
	let style = NodeKind::Language.style();
	let mut langs: Vec<_> = model
		.nodes()
		.iter()
		.filter(|n| n.kind == NodeKind::Language)
		.collect();
	langs.sort_by(|a, b| a.magnitude.total_cmp(&b.magnitude));
	for pair in langs.windows(2) {
		assert!(pair[0].radius <= pair[1].radius);
	}
	for n in &langs {
		assert!(n.radius >= style.min_radius && n.radius <= style.max_radius);
	}
	assert_eq!(langs.first().unwrap().radius, style.min_radius);
	assert_eq!(langs.last().unwrap().radius, style.max_radius);
}

#[test]
fn extension_cap_keeps_the_largest() {
	let doc = ActivityDocument::from_value(json!({
		"summary": summary(
			json!({ "Rust": 1 }),
			json!({ "rs": 500, "toml": 20, "md": 300, "yml": 5, "json": 80 })
		)
	}))
	.unwrap();
	let options = GraphOptions {
		max_extensions: 2,
		..GraphOptions::default()
	};
	let model = build(&doc, &options, 800.0, 600.0, 1);
	let mut ids: Vec<&str> = model
		.nodes()
		.iter()
		.filter(|n| n.kind == NodeKind::FileExtension)
		.map(|n| n.id.as_str())
		.collect();
	ids.sort();
	assert_eq!(ids, vec!["ext:md", "ext:rs"]);
}

#[test]
fn language_cap_applies_only_when_exceeded() {
	let many: serde_json::Map<String, Value> =
		(0..20).map(|i| (format!("L{i:02}"), json!(100 + i))).collect();
	let doc = ActivityDocument::from_value(json!({
		"summary": summary(Value::Object(many), json!({ "rs": 1 }))
	}))
	.unwrap();
	let model = build(&doc, &GraphOptions::default(), 800.0, 600.0, 1);
	assert_eq!(model.count_of(NodeKind::Language), 12);
	assert!(model.get("lang:L19").is_some());
	assert!(model.get("lang:L07").is_none());

	let few = build(&two_repo_document(), &GraphOptions::default(), 800.0, 600.0, 1);
	assert_eq!(few.count_of(NodeKind::Language), 1);
}

#[test]
fn shared_language_scenario() {
	let model = build(&two_repo_document(), &GraphOptions::default(), 800.0, 600.0, 5);
	let rust = model.get("lang:Rust").unwrap();
	assert_eq!(rust.magnitude, 400.0);
	assert_eq!(model.count_of(NodeKind::Language), 1);

	let weights: Vec<(&str, f64)> = model
		.links()
		.iter()
		.filter(|l| l.target_id == "lang:Rust")
		.map(|l| (l.source_id.as_str(), l.weight))
		.collect();
	assert_eq!(weights, vec![("repo:alpha", 0.25), ("repo:beta", 0.75)]);
}

#[test]
fn resize_preserves_ids_and_scales_positions() {
	let doc = two_repo_document();
	let options = GraphOptions::default();
	let small = build(&doc, &options, 400.0, 400.0, 3);
	let large = build(&doc, &options, 800.0, 800.0, 3);

	let ids = |m: &GraphModel| -> Vec<(String, NodeKind)> {
		m.nodes().iter().map(|n| (n.id.clone(), n.kind)).collect()
	};
	assert_eq!(ids(&small), ids(&large));

	for (a, b) in small.nodes().iter().zip(large.nodes()) {
		let (da, db) = (
			a.position.distance(Point::new(200.0, 200.0)),
			b.position.distance(Point::new(400.0, 400.0)),
		);
		assert!((db - 2.0 * da).abs() < 1e-9, "{}", a.id);
	}
}

#[test]
fn hover_resolves_center_and_misses_far_pointer() {
	let model = build(&two_repo_document(), &GraphOptions::default(), 800.0, 600.0, 8);
	let clock = 12.5;
	for (idx, node) in model.nodes().iter().enumerate() {
		let at = animated_position(node, clock);
		let hit = hit_test(&model, at, clock).unwrap();
		// Overlaps resolve to the earliest node, never a later one.
		assert!(hit <= idx);
	}
	assert_eq!(hit_test(&model, Point::new(-500.0, -500.0), clock), None);

	let repo = model.get("repo:alpha").unwrap();
	let at = animated_position(repo, clock);
	let edge = Point::new(at.x, at.y - (repo.radius + HIT_PADDING - 0.5));
	assert_eq!(hit_test(&model, edge, clock), model.index_of("repo:alpha"));
}

#[test]
fn missing_summary_is_reported() {
	let err = ActivityDocument::from_value(json!({ "repositories": [] })).unwrap_err();
	assert!(matches!(err, GraphError::DataFormat(_)));
}
