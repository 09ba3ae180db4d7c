use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::model::{GraphModel, Node, NodePayload, Point, SummaryStats};
use super::scale::{format_compact, format_grouped};
use super::state::animated_position;

pub const HOVER_SCALE: f64 = 1.3;
/// Nodes at least this large get a label without being hovered.
pub const LABEL_MIN_RADIUS: f64 = 10.0;
pub const TOOLTIP_OFFSET: f64 = 14.0;
pub const TOOLTIP_MARGIN: f64 = 8.0;
const TOOLTIP_PADDING: f64 = 10.0;
const TOOLTIP_LINE_HEIGHT: f64 = 17.0;
const STATS_LINE_HEIGHT: f64 = 18.0;
const STATS_WIDTH: f64 = 200.0;
const LINK_COLOR: &str = "rgb(140, 180, 255)";

/// Everything one frame needs to draw.
#[derive(Clone, Copy, Debug, Default)]
pub struct Frame<'a> {
	pub model: Option<&'a GraphModel>,
	pub hover: Option<usize>,
	pub pointer: Option<Point>,
	pub clock: f64,
	pub error: Option<&'a str>,
	pub captions: Option<&'a Captions>,
}

/// Text derived from the model, rebuilt only when the model or the hovered
/// node changes so steady frames draw without formatting.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Captions {
	stats: Vec<(&'static str, String)>,
	hover: Option<usize>,
	tooltip: Vec<String>,
}

impl Captions {
	/// The model was replaced.
	pub fn reset(&mut self, model: Option<&GraphModel>) {
		self.stats = model.map(|m| stats_lines(&m.stats)).unwrap_or_default();
		self.hover = None;
		self.tooltip.clear();
	}

	/// Recompute the tooltip text if the hovered node changed.
	pub fn sync_hover(&mut self, model: Option<&GraphModel>, hover: Option<usize>) {
		if hover == self.hover {
			return;
		}
		self.hover = hover;
		self.tooltip = hover
			.and_then(|idx| model.and_then(|m| m.node(idx)))
			.map(tooltip_lines)
			.unwrap_or_default();
	}

	pub fn stats(&self) -> &[(&'static str, String)] {
		&self.stats
	}

	pub fn tooltip(&self) -> &[String] {
		&self.tooltip
	}
}

/// Draws frames to a canvas 2D context sized in CSS pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct Renderer {
	pub width: f64,
	pub height: f64,
	pub show_labels: bool,
	pub show_stats: bool,
}

impl Renderer {
	pub fn draw(&self, ctx: &CanvasRenderingContext2d, frame: &Frame) {
		self.draw_background(ctx);
		match frame.model {
			Some(model) => {
				self.draw_links(ctx, model, frame.hover, frame.clock);
				self.draw_nodes(ctx, model, frame.hover, frame.clock);
				let (stats, tooltip) = match frame.captions {
					Some(c) => (c.stats(), c.tooltip()),
					None => (&[][..], &[][..]),
				};
				if self.show_stats && !stats.is_empty() {
					self.draw_stats(ctx, stats);
				}
				if let (Some(node), Some(pointer), false) = (
					frame.hover.and_then(|i| model.node(i)),
					frame.pointer,
					tooltip.is_empty(),
				) {
					self.draw_tooltip(ctx, node, tooltip, pointer);
				}
			}
			None if frame.error.is_none() => {
				ctx.set_fill_style_str("rgba(255, 255, 255, 0.6)");
				ctx.set_font("14px sans-serif");
				ctx.set_text_align("center");
				let _ = ctx.fill_text(
					"Loading activity data\u{2026}",
					self.width / 2.0,
					self.height / 2.0,
				);
				ctx.set_text_align("start");
			}
			None => {}
		}
		if let Some(message) = frame.error {
			self.draw_error(ctx, message);
		}
	}

	fn draw_background(&self, ctx: &CanvasRenderingContext2d) {
		let (cx, cy) = (self.width / 2.0, self.height / 2.0);
		ctx.clear_rect(0.0, 0.0, self.width, self.height);
		match ctx.create_radial_gradient(cx, cy, 0.0, cx, cy, cx.max(cy)) {
			Ok(gradient) => {
				let _ = gradient.add_color_stop(0.0, "#232946");
				let _ = gradient.add_color_stop(1.0, "#0f0f1e");
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
			}
			Err(_) => ctx.set_fill_style_str("#1a1a2e"),
		}
		ctx.fill_rect(0.0, 0.0, self.width, self.height);
	}

	fn draw_links(
		&self,
		ctx: &CanvasRenderingContext2d,
		model: &GraphModel,
		hover: Option<usize>,
		clock: f64,
	) {
		let nodes = model.nodes();
		ctx.set_stroke_style_str(LINK_COLOR);
		for link in model.links() {
			let (a, b) = (
				animated_position(&nodes[link.source_index()], clock),
				animated_position(&nodes[link.target_index()], clock),
			);
			let highlighted = hover.is_some_and(|h| link.touches(h));
			let (alpha, width) = link_style(link.weight, highlighted);
			ctx.set_global_alpha(alpha);
			ctx.set_line_width(width);
			ctx.begin_path();
			ctx.move_to(a.x, a.y);
			ctx.line_to(b.x, b.y);
			ctx.stroke();
		}
		ctx.set_global_alpha(1.0);
	}

	fn draw_nodes(
		&self,
		ctx: &CanvasRenderingContext2d,
		model: &GraphModel,
		hover: Option<usize>,
		clock: f64,
	) {
		for (idx, node) in model.nodes().iter().enumerate() {
			let hovered = hover == Some(idx);
			let p = animated_position(node, clock);
			let radius = if hovered {
				node.radius * HOVER_SCALE
			} else {
				node.radius
			};
			let style = node.kind.style();

			match ctx.create_radial_gradient(
				p.x - radius * 0.3,
				p.y - radius * 0.3,
				radius * 0.1,
				p.x,
				p.y,
				radius,
			) {
				Ok(gradient) => {
					let _ = gradient.add_color_stop(0.0, style.light);
					let _ = gradient.add_color_stop(1.0, style.color);
					#[allow(deprecated)]
					ctx.set_fill_style(&gradient);
				}
				Err(_) => ctx.set_fill_style_str(style.color),
			}
			ctx.begin_path();
			let _ = ctx.arc(p.x, p.y, radius, 0.0, 2.0 * PI);
			ctx.fill();

			if hovered {
				ctx.set_stroke_style_str("rgba(255, 255, 255, 0.8)");
				ctx.set_line_width(2.0);
				ctx.stroke();
			}

			if should_label(node, hovered, self.show_labels) {
				ctx.set_fill_style_str(if hovered {
					"white"
				} else {
					"rgba(255, 255, 255, 0.85)"
				});
				ctx.set_font(if hovered {
					"bold 12px sans-serif"
				} else {
					"11px sans-serif"
				});
				ctx.set_text_align("center");
				let _ = ctx.fill_text(&node.label, p.x, p.y + radius + 13.0);
				ctx.set_text_align("start");
			}
		}
	}

	fn draw_stats(&self, ctx: &CanvasRenderingContext2d, lines: &[(&'static str, String)]) {
		let height = TOOLTIP_PADDING * 2.0 + STATS_LINE_HEIGHT * lines.len() as f64;
		ctx.set_fill_style_str("rgba(10, 12, 28, 0.7)");
		ctx.fill_rect(12.0, 12.0, STATS_WIDTH, height);
		ctx.set_stroke_style_str("rgba(140, 180, 255, 0.25)");
		ctx.set_line_width(1.0);
		ctx.stroke_rect(12.0, 12.0, STATS_WIDTH, height);

		ctx.set_font("12px sans-serif");
		ctx.set_text_baseline("top");
		for (i, (name, value)) in lines.iter().enumerate() {
			let y = 12.0 + TOOLTIP_PADDING + STATS_LINE_HEIGHT * i as f64;
			ctx.set_fill_style_str("rgba(255, 255, 255, 0.6)");
			let _ = ctx.fill_text(name, 12.0 + TOOLTIP_PADDING, y);
			ctx.set_fill_style_str("white");
			ctx.set_text_align("right");
			let _ = ctx.fill_text(value, 12.0 + STATS_WIDTH - TOOLTIP_PADDING, y);
			ctx.set_text_align("start");
		}
		ctx.set_text_baseline("alphabetic");
	}

	fn draw_tooltip(
		&self,
		ctx: &CanvasRenderingContext2d,
		node: &Node,
		lines: &[String],
		pointer: Point,
	) {
		ctx.set_font("12px sans-serif");
		let text_width = lines
			.iter()
			.filter_map(|line| ctx.measure_text(line).ok())
			.map(|m| m.width())
			.fold(0.0, f64::max);
		let (w, h) = (
			text_width + TOOLTIP_PADDING * 2.0,
			TOOLTIP_LINE_HEIGHT * lines.len() as f64 + TOOLTIP_PADDING * 2.0,
		);
		let at = place_tooltip(pointer, w, h, self.width, self.height);

		ctx.set_fill_style_str("rgba(10, 12, 28, 0.92)");
		ctx.fill_rect(at.x, at.y, w, h);
		ctx.set_stroke_style_str(node.kind.style().color);
		ctx.set_line_width(1.0);
		ctx.stroke_rect(at.x, at.y, w, h);

		ctx.set_text_baseline("top");
		for (i, line) in lines.iter().enumerate() {
			ctx.set_fill_style_str(if i == 0 {
				"white"
			} else {
				"rgba(255, 255, 255, 0.75)"
			});
			ctx.set_font(if i == 0 {
				"bold 12px sans-serif"
			} else {
				"12px sans-serif"
			});
			let _ = ctx.fill_text(
				line,
				at.x + TOOLTIP_PADDING,
				at.y + TOOLTIP_PADDING + TOOLTIP_LINE_HEIGHT * i as f64,
			);
		}
		ctx.set_text_baseline("alphabetic");
	}

	fn draw_error(&self, ctx: &CanvasRenderingContext2d, message: &str) {
		ctx.set_fill_style_str("rgba(180, 40, 60, 0.9)");
		ctx.fill_rect(0.0, 0.0, self.width, 32.0);
		ctx.set_fill_style_str("white");
		ctx.set_font("13px sans-serif");
		ctx.set_text_baseline("middle");
		let _ = ctx.fill_text(message, 12.0, 16.0);
		ctx.set_text_baseline("alphabetic");
	}
}

/// Stroke alpha and width for a link of `weight`.
pub fn link_style(weight: f64, highlighted: bool) -> (f64, f64) {
	let weight = weight.clamp(0.0, 1.0);
	let (alpha, width) = (0.12 + 0.45 * weight, 0.6 + 1.6 * weight);
	if highlighted {
		((alpha + 0.35).min(1.0), width * 2.0)
	} else {
		(alpha, width)
	}
}

pub fn should_label(node: &Node, hovered: bool, show_labels: bool) -> bool {
	hovered || (show_labels && node.radius >= LABEL_MIN_RADIUS)
}

pub fn tooltip_lines(node: &Node) -> Vec<String> {
	let mut lines = vec![node.label.clone(), node.kind.display_name().to_string()];
	match &node.payload {
		NodePayload::Repository {
			commits,
			lines_added,
			lines_removed,
		} => {
			lines.push(format!("Commits: {}", format_grouped(*commits)));
			lines.push(format!(
				"Lines: +{} / -{}",
				format_grouped(*lines_added),
				format_grouped(*lines_removed)
			));
		}
		NodePayload::Share { lines: n, percentage } => {
			lines.push(format!("Lines: {}", format_grouped(*n)));
			lines.push(format!("Share: {percentage:.1}%"));
		}
	}
	lines
}

pub fn stats_lines(stats: &SummaryStats) -> Vec<(&'static str, String)> {
	let mut lines = vec![
		("Repositories", stats.repos.to_string()),
		("Commits", format_compact(stats.commits)),
		("Lines changed", format_compact(stats.lines_changed)),
		("Languages", stats.languages.to_string()),
	];
	if let Some(at) = &stats.generated_at {
		lines.push(("Generated", at.clone()));
	}
	lines
}

/// Top-left corner of a `w`×`h` tooltip near `anchor`, flipped away from the
/// right/bottom edges and clamped inside the canvas.
pub fn place_tooltip(anchor: Point, w: f64, h: f64, width: f64, height: f64) -> Point {
	let mut x = anchor.x + TOOLTIP_OFFSET;
	if x + w > width - TOOLTIP_MARGIN {
		x = anchor.x - TOOLTIP_OFFSET - w;
	}
	let mut y = anchor.y + TOOLTIP_OFFSET;
	if y + h > height - TOOLTIP_MARGIN {
		y = anchor.y - TOOLTIP_OFFSET - h;
	}
	Point::new(
		x.min(width - TOOLTIP_MARGIN - w).max(TOOLTIP_MARGIN),
		y.min(height - TOOLTIP_MARGIN - h).max(TOOLTIP_MARGIN),
	)
}
