use super::model::{GraphModel, Node, Point};

/// Amplitude of the idle floating motion, in CSS pixels.
pub const FLOAT_AMPLITUDE: f64 = 3.0;
/// Extra distance beyond a node's radius that still counts as a hit.
pub const HIT_PADDING: f64 = 8.0;

/// Position of `node` at `clock` seconds, including the floating offset.
///
/// Periodic in `clock`, so long-running loops never drift.
pub fn animated_position(node: &Node, clock: f64) -> Point {
	let t = clock + node.phase;
	Point::new(
		node.position.x + t.sin() * FLOAT_AMPLITUDE,
		node.position.y + t.cos() * FLOAT_AMPLITUDE,
	)
}

/// First node, in insertion order, whose animated center lies within
/// `radius + HIT_PADDING` of `point`.
pub fn hit_test(model: &GraphModel, point: Point, clock: f64) -> Option<usize> {
	model
		.nodes()
		.iter()
		.position(|node| point.distance(animated_position(node, clock)) < node.radius + HIT_PADDING)
}

/// Pointer position and the node currently under it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InteractionState {
	pointer: Option<Point>,
	hover: Option<usize>,
}

impl InteractionState {
	pub fn pointer(&self) -> Option<Point> {
		self.pointer
	}

	pub fn hover_index(&self) -> Option<usize> {
		self.hover
	}

	/// Record a pointer move and resolve the hover target against the
	/// positions drawn at `clock`.
	pub fn update_pointer(&mut self, x: f64, y: f64, model: Option<&GraphModel>, clock: f64) {
		self.pointer = Some(Point::new(x, y));
		self.refresh(model, clock);
	}

	/// Re-resolve the hover target for a stationary pointer.
	pub fn refresh(&mut self, model: Option<&GraphModel>, clock: f64) {
		self.hover = match (self.pointer, model) {
			(Some(p), Some(m)) => hit_test(m, p, clock),
			_ => None,
		};
	}

	pub fn current_hover<'a>(&self, model: &'a GraphModel) -> Option<&'a Node> {
		self.hover.and_then(|idx| model.node(idx))
	}

	/// Pointer left the canvas or the touch ended.
	pub fn clear(&mut self) {
		self.pointer = None;
		self.hover = None;
	}

	/// The model was replaced; the hover index no longer refers to anything.
	pub fn invalidate(&mut self) {
		self.hover = None;
	}
}

#[cfg(test)]
mod tests {
	use std::f64::consts::TAU;

	use super::*;
	use crate::components::activity_graph::model::{NodeKind, NodePayload};

	fn node(name: &str, x: f64, y: f64, radius: f64, phase: f64) -> Node {
		Node {
			id: NodeKind::Language.node_id(name),
			kind: NodeKind::Language,
			label: name.to_string(),
			position: Point::new(x, y),
			radius,
			magnitude: 1.0,
			phase,
			payload: NodePayload::Share {
				lines: 1,
				percentage: 100.0,
			},
		}
	}

	fn model(nodes: Vec<Node>) -> GraphModel {
		let mut m = GraphModel::default();
		for n in nodes {
			m.push_node(n);
		}
		m
	}

	#[test]
	fn floating_motion_is_periodic() {
		let n = node("Rust", 100.0, 100.0, 10.0, 1.3);
		let a = animated_position(&n, 2.0);
		let b = animated_position(&n, 2.0 + TAU);
		assert!(a.distance(b) < 1e-9);
		assert!(a.distance(n.position) <= FLOAT_AMPLITUDE + 1e-9);
	}

	#[test]
	fn pointer_at_animated_center_hits() {
		let m = model(vec![node("Rust", 100.0, 100.0, HIT_PADDING, 0.4)]);
		let clock = 7.25;
		let center = animated_position(&m.nodes()[0], clock);
		assert_eq!(hit_test(&m, center, clock), Some(0));
	}

	#[test]
	fn pointer_beyond_padding_misses() {
		let m = model(vec![node("Rust", 100.0, 100.0, 10.0, 0.0)]);
		let far = Point::new(100.0 + 10.0 + HIT_PADDING + FLOAT_AMPLITUDE + 0.5, 100.0);
		assert_eq!(hit_test(&m, far, 0.0), None);
		assert_eq!(hit_test(&m, far, 1.7), None);
	}

	#[test]
	fn overlapping_nodes_resolve_to_first_inserted() {
		let m = model(vec![
			node("Rust", 100.0, 100.0, 10.0, 0.0),
			node("Go", 104.0, 100.0, 10.0, 0.0),
		]);
		let over_go = animated_position(&m.nodes()[1], 0.0);
		assert_eq!(hit_test(&m, over_go, 0.0), Some(0));
	}

	#[test]
	fn hover_follows_pointer_and_clears() {
		let m = model(vec![node("Rust", 50.0, 50.0, 10.0, 0.0)]);
		let mut state = InteractionState::default();
		state.update_pointer(50.0, 53.0, Some(&m), 0.0);
		assert_eq!(state.current_hover(&m).map(|n| n.id.as_str()), Some("lang:Rust"));

		state.update_pointer(300.0, 300.0, Some(&m), 0.0);
		assert!(state.current_hover(&m).is_none());

		state.update_pointer(50.0, 53.0, Some(&m), 0.0);
		state.clear();
		assert_eq!(state.pointer(), None);
		assert_eq!(state.hover_index(), None);
	}

	#[test]
	fn invalidate_keeps_pointer_for_the_next_frame() {
		let m = model(vec![node("Rust", 50.0, 50.0, 10.0, 0.0)]);
		let mut state = InteractionState::default();
		state.update_pointer(50.0, 53.0, Some(&m), 0.0);
		state.invalidate();
		assert_eq!(state.hover_index(), None);
		state.refresh(Some(&m), 0.0);
		assert_eq!(state.hover_index(), Some(0));
		state.refresh(None, 0.0);
		assert_eq!(state.hover_index(), None);
	}
}
