use std::collections::{BTreeMap, HashSet};
use std::f64::consts::{PI, TAU};

use log::{debug, warn};
use rand::Rng;

use super::model::{GraphModel, Node, NodeKind, NodePayload, Point, SummaryStats};
use super::options::GraphOptions;
use super::scale::{contribution_label, percentage, sqrt_radius};
use super::types::{ActivityDocument, RepositoryEntry};

/// Builds a [`GraphModel`] with a deterministic radial layout.
///
/// Node positions are a pure function of the document and the canvas size.
/// The random source only feeds each node's animation phase.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphBuilder {
	pub width: f64,
	pub height: f64,
	pub max_languages: usize,
	pub max_extensions: usize,
}

/// One ranked summary entry.
struct Entry<'a> {
	name: &'a str,
	value: u64,
	percentage: f64,
}

impl GraphBuilder {
	pub fn new(options: &GraphOptions, width: f64, height: f64) -> Self {
		Self {
			width,
			height,
			max_languages: options.max_languages,
			max_extensions: options.max_extensions,
		}
	}

	pub fn center(&self) -> Point {
		Point::new(self.width / 2.0, self.height / 2.0)
	}

	/// Radius of the ring on which nodes of `kind` are placed.
	pub fn ring_radius(&self, kind: NodeKind) -> f64 {
		self.width.min(self.height).max(0.0) * kind.style().ring
	}

	fn ring_position(&self, kind: NodeKind, i: usize, count: usize) -> Point {
		let angle = (i as f64 / count.max(1) as f64) * 2.0 * PI + kind.style().offset;
		let (c, r) = (self.center(), self.ring_radius(kind));
		Point::new(c.x + r * angle.cos(), c.y + r * angle.sin())
	}

	pub fn build<R: Rng>(&self, doc: &ActivityDocument, rng: &mut R) -> GraphModel {
		let summary = &doc.summary;
		let mut model = GraphModel::new(SummaryStats {
			repos: summary.total_repos,
			commits: summary.total_commits,
			lines_changed: summary.total_lines_changed,
			languages: summary.languages.len(),
			generated_at: doc.generated_at.clone(),
		});

		let repos = unique_repositories(&doc.repositories);
		for (i, repo) in repos.iter().enumerate() {
			let kind = NodeKind::Repository;
			let style = kind.style();
			let magnitude = repo.total_commits as f64;
			model.push_node(Node {
				id: kind.node_id(&repo.name),
				kind,
				label: repo.name.clone(),
				position: self.ring_position(kind, i, repos.len()),
				radius: sqrt_radius(magnitude, style.scale, style.min_radius, style.max_radius),
				magnitude,
				phase: rng.random_range(0.0..TAU),
				payload: NodePayload::Repository {
					commits: repo.total_commits,
					lines_added: repo.total_lines_added,
					lines_removed: repo.total_lines_removed,
				},
			});
		}

		let rings = [
			(
				NodeKind::ContributionCategory,
				ranked(
					&summary.contribution_types,
					&summary.contribution_percentages,
					usize::MAX,
				),
			),
			(
				NodeKind::Language,
				ranked(
					&summary.languages,
					&summary.language_percentages,
					self.max_languages,
				),
			),
			(
				NodeKind::FileExtension,
				ranked(
					&summary.file_extensions,
					&summary.file_extension_percentages,
					self.max_extensions,
				),
			),
		];

		for (kind, entries) in &rings {
			let style = kind.style();
			for (i, entry) in entries.iter().enumerate() {
				let magnitude = entry.value as f64;
				let label = match kind {
					NodeKind::ContributionCategory => contribution_label(entry.name),
					_ => entry.name.to_string(),
				};
				model.push_node(Node {
					id: kind.node_id(entry.name),
					kind: *kind,
					label,
					position: self.ring_position(*kind, i, entries.len()),
					radius: sqrt_radius(magnitude, style.scale, style.min_radius, style.max_radius),
					magnitude,
					phase: rng.random_range(0.0..TAU),
					payload: NodePayload::Share {
						lines: entry.value,
						percentage: entry.percentage,
					},
				});
			}
		}

		for repo in &repos {
			let source_id = NodeKind::Repository.node_id(&repo.name);
			let references = [
				(NodeKind::Language, &repo.languages),
				(NodeKind::ContributionCategory, &repo.contribution_types),
				(NodeKind::FileExtension, &repo.file_extensions),
			];
			for (kind, values) in references {
				for (name, &value) in values.iter().filter(|(_, v)| **v > 0) {
					let target_id = kind.node_id(name);
					let Some(target) = model.get(&target_id) else {
						debug!("dropping link {source_id} -> {target_id}: target not shown");
						continue;
					};
					let weight = if target.magnitude > 0.0 {
						value as f64 / target.magnitude
					} else {
						1.0
					};
					model.push_link(&source_id, &target_id, weight);
				}
			}
		}

		debug!(
			"built graph: {} nodes, {} links ({}x{})",
			model.nodes().len(),
			model.links().len(),
			self.width,
			self.height
		);
		model
	}
}

/// Repositories in document order, skipping repeated names.
fn unique_repositories(repos: &[RepositoryEntry]) -> Vec<&RepositoryEntry> {
	let mut seen = HashSet::new();
	repos
		.iter()
		.filter(|repo| {
			let fresh = seen.insert(repo.name.as_str());
			if !fresh {
				warn!("skipping duplicate repository {:?}", repo.name);
			}
			fresh
		})
		.collect()
}

/// Entries sorted by value descending (ties by name), capped to `cap`.
fn ranked<'a>(
	values: &'a BTreeMap<String, u64>,
	percentages: &BTreeMap<String, f64>,
	cap: usize,
) -> Vec<Entry<'a>> {
	let total = values.values().fold(0u64, |sum, v| sum.saturating_add(*v));
	let mut entries: Vec<Entry<'a>> = values
		.iter()
		.map(|(name, &value)| Entry {
			name,
			value,
			percentage: percentages
				.get(name)
				.copied()
				.unwrap_or_else(|| percentage(value, total)),
		})
		.collect();
	entries.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(b.name)));
	entries.truncate(cap);
	entries
}
