use std::collections::HashMap;

/// A 2D point in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance(self, other: Point) -> f64 {
		let (dx, dy) = (self.x - other.x, self.y - other.y);
		(dx * dx + dy * dy).sqrt()
	}
}

/// The closed set of node categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
	Repository,
	Language,
	ContributionCategory,
	FileExtension,
}

/// Per-kind drawing and layout constants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KindStyle {
	pub id_prefix: &'static str,
	pub color: &'static str,
	/// Highlight color for the gradient center.
	pub light: &'static str,
	/// Ring radius as a fraction of `min(width, height)`.
	pub ring: f64,
	/// Angular offset of the ring, in radians.
	pub offset: f64,
	pub scale: f64,
	pub min_radius: f64,
	pub max_radius: f64,
}

const REPOSITORY: KindStyle = KindStyle {
	id_prefix: "repo",
	color: "#4f8cff",
	light: "#b5d0ff",
	ring: 0.10,
	offset: 0.0,
	scale: 1.5,
	min_radius: 12.0,
	max_radius: 36.0,
};

const LANGUAGE: KindStyle = KindStyle {
	id_prefix: "lang",
	color: "#ff7f50",
	light: "#ffd2c2",
	ring: 0.25,
	offset: 0.2,
	scale: 0.12,
	min_radius: 6.0,
	max_radius: 28.0,
};

const CONTRIBUTION_CATEGORY: KindStyle = KindStyle {
	id_prefix: "type",
	color: "#a371f7",
	light: "#e0ccff",
	ring: 0.175,
	offset: 0.8,
	scale: 0.12,
	min_radius: 6.0,
	max_radius: 26.0,
};

const FILE_EXTENSION: KindStyle = KindStyle {
	id_prefix: "ext",
	color: "#3fb950",
	light: "#b9f0c2",
	ring: 0.325,
	offset: 1.5,
	scale: 0.10,
	min_radius: 4.0,
	max_radius: 20.0,
};

impl NodeKind {
	pub const ALL: [NodeKind; 4] = [
		NodeKind::Repository,
		NodeKind::ContributionCategory,
		NodeKind::Language,
		NodeKind::FileExtension,
	];

	pub const fn style(self) -> &'static KindStyle {
		match self {
			NodeKind::Repository => &REPOSITORY,
			NodeKind::Language => &LANGUAGE,
			NodeKind::ContributionCategory => &CONTRIBUTION_CATEGORY,
			NodeKind::FileExtension => &FILE_EXTENSION,
		}
	}

	pub const fn display_name(self) -> &'static str {
		match self {
			NodeKind::Repository => "Repository",
			NodeKind::Language => "Language",
			NodeKind::ContributionCategory => "Contribution",
			NodeKind::FileExtension => "File type",
		}
	}

	pub fn node_id(self, name: &str) -> String {
		format!("{}:{}", self.style().id_prefix, name)
	}
}

/// Tooltip metadata. Never used for layout.
#[derive(Clone, Debug, PartialEq)]
pub enum NodePayload {
	Repository {
		commits: u64,
		lines_added: u64,
		lines_removed: u64,
	},
	Share {
		lines: u64,
		percentage: f64,
	},
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: String,
	pub kind: NodeKind,
	pub label: String,
	pub position: Point,
	pub radius: f64,
	pub magnitude: f64,
	/// Offset into the floating animation, in `[0, 2π)`.
	pub phase: f64,
	pub payload: NodePayload,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Link {
	pub source_id: String,
	pub target_id: String,
	pub weight: f64,
	pub(crate) source: usize,
	pub(crate) target: usize,
}

impl Link {
	pub fn source_index(&self) -> usize {
		self.source
	}

	pub fn target_index(&self) -> usize {
		self.target
	}

	pub fn touches(&self, idx: usize) -> bool {
		self.source == idx || self.target == idx
	}
}

/// Totals shown in the stats panel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SummaryStats {
	pub repos: u64,
	pub commits: u64,
	pub lines_changed: u64,
	pub languages: usize,
	/// When the exporter produced the document, as written there.
	pub generated_at: Option<String>,
}

/// Nodes, links, and an id index. Immutable once built.
#[derive(Clone, Debug, Default)]
pub struct GraphModel {
	nodes: Vec<Node>,
	links: Vec<Link>,
	index: HashMap<String, usize>,
	pub stats: SummaryStats,
}

impl GraphModel {
	pub fn new(stats: SummaryStats) -> Self {
		Self {
			stats,
			..Self::default()
		}
	}

	/// Insert a node, returning its index. A node whose id already exists is
	/// rejected and `None` is returned.
	pub(crate) fn push_node(&mut self, node: Node) -> Option<usize> {
		if self.index.contains_key(&node.id) {
			return None;
		}
		let idx = self.nodes.len();
		self.index.insert(node.id.clone(), idx);
		self.nodes.push(node);
		Some(idx)
	}

	/// Insert a link between two existing ids. Dangling links are dropped.
	pub(crate) fn push_link(&mut self, source_id: &str, target_id: &str, weight: f64) -> bool {
		let (Some(&source), Some(&target)) = (self.index.get(source_id), self.index.get(target_id))
		else {
			return false;
		};
		self.links.push(Link {
			source_id: source_id.to_string(),
			target_id: target_id.to_string(),
			weight: weight.clamp(0.0, 1.0),
			source,
			target,
		});
		true
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn links(&self) -> &[Link] {
		&self.links
	}

	pub fn node(&self, idx: usize) -> Option<&Node> {
		self.nodes.get(idx)
	}

	pub fn get(&self, id: &str) -> Option<&Node> {
		self.index.get(id).map(|&idx| &self.nodes[idx])
	}

	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	pub fn count_of(&self, kind: NodeKind) -> usize {
		self.nodes.iter().filter(|n| n.kind == kind).count()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Reuse the animation phase of every node that also exists in
	/// `previous`, so a relayout does not make floating nodes jump.
	pub(crate) fn inherit_phases(&mut self, previous: &GraphModel) {
		for node in &mut self.nodes {
			if let Some(old) = previous.get(&node.id) {
				node.phase = old.phase;
			}
		}
	}
}
