use leptos::prelude::*;
use serde_json::{Map, Value, json};

use crate::components::activity_graph::{ActivityGraphCanvas, GraphOptions};

const LANGUAGES: &[&str] = &[
	"Rust", "TypeScript", "Python", "Go", "Shell", "Nix", "CSS", "HTML", "SQL", "Lua", "C", "Zig",
	"Haskell", "Elixir",
];
const CONTRIBUTIONS: &[&str] = &[
	"production_code",
	"tests",
	"documentation",
	"specs_config",
	"infrastructure",
	"styling",
];
const EXTENSIONS: &[&str] = &[
	"rs", "ts", "tsx", "py", "go", "sh", "nix", "css", "html", "sql", "lua", "c", "h", "zig", "hs",
	"ex", "md", "toml", "yaml", "json",
];

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// Pick `count` names from `pool` with pseudo-random line counts.
fn sample_breakdown(pool: &[&str], seed: usize, count: usize, scale: f64) -> Map<String, Value> {
	(0..count)
		.map(|i| {
			let name = pool[(seed * 7 + i * 3) % pool.len()];
			let lines = (rand_simple(seed * 31 + i) * scale) as u64 + 1;
			(name.to_string(), json!(lines))
		})
		.collect()
}

fn merge_into(total: &mut Map<String, Value>, part: &Map<String, Value>) {
	for (name, value) in part {
		let add = value.as_u64().unwrap_or(0);
		let prev = total.get(name).and_then(Value::as_u64).unwrap_or(0);
		total.insert(name.clone(), json!(prev + add));
	}
}

/// Generate a sample activity document for `n` repositories.
fn generate_sample_document(n: usize) -> Value {
	let (mut languages, mut contributions, mut extensions) = (Map::new(), Map::new(), Map::new());
	let (mut commits, mut lines) = (0u64, 0u64);

	let repositories: Vec<Value> = (0..n)
		.map(|i| {
			let repo_languages = sample_breakdown(LANGUAGES, i, 2 + i % 3, 40_000.0);
			let repo_contributions = sample_breakdown(CONTRIBUTIONS, i, 3, 30_000.0);
			let repo_extensions = sample_breakdown(EXTENSIONS, i, 3 + i % 4, 30_000.0);
			merge_into(&mut languages, &repo_languages);
			merge_into(&mut contributions, &repo_contributions);
			merge_into(&mut extensions, &repo_extensions);

			let repo_commits = (rand_simple(i * 13) * 900.0) as u64 + 10;
			let added = (rand_simple(i * 17) * 80_000.0) as u64;
			let removed = added / 3;
			commits += repo_commits;
			lines += added + removed;
			json!({
				"name": format!("project-{i}"),
				"total_commits": repo_commits,
				"total_lines_added": added,
				"total_lines_removed": removed,
				"languages": repo_languages,
				"contribution_types": repo_contributions,
				"file_extensions": repo_extensions,
			})
		})
		.collect();

	json!({
		"summary": {
			"total_repos": n,
			"total_commits": commits,
			"total_lines_changed": lines,
			"languages": languages,
			"contribution_types": contributions,
			"file_extensions": extensions,
		},
		"repositories": repositories,
	})
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let document = Signal::derive(move || Some(generate_sample_document(8)));

	view! {
		<div class="fullscreen-graph" style="width: 100vw; height: 100vh;">
			<ActivityGraphCanvas document=document options=GraphOptions::default() />
			<div class="graph-overlay">
				<h1>"Git Activity"</h1>
				<p class="subtitle">"Hover a node to see its commits and line counts."</p>
			</div>
		</div>
	}
}
