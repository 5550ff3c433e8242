use std::collections::HashSet;

use super::config::GraphConfig;
use super::graph::{HIT_MARGIN, NoteGraph};
use super::simulation::Simulation;
use super::types::NoteIndex;

pub const MIN_SCALE: f64 = 0.5;
pub const MAX_SCALE: f64 = 2.0;

/// Seconds for one node to fly from the center to its target.
const BURST_DURATION: f64 = 0.9;
/// Seconds between consecutive node launches.
const BURST_STAGGER: f64 = 0.012;
/// Cap on total launch stagger so large gardens do not wait.
const BURST_MAX_STAGGER: f64 = 0.6;
const HOVER_SPEED: f64 = 12.0;
const SQUASH_SPEED: f64 = 10.0;

pub fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// CSS pixel size of the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
	pub pixel_ratio: f64,
}

impl Viewport {
	pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Self {
		Self {
			width,
			height,
			pixel_ratio,
		}
	}
}

/// Pan and zoom: screen = graph * k + (x, y).
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor, clamped to `MIN_SCALE..=MAX_SCALE`.
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<usize>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f64,
	pub node_start_y: f64,
	/// Last pointer position, screen space.
	pub last_x: f64,
	pub last_y: f64,
	/// Touch-start timestamp in ms, for tap detection.
	pub started_at: Option<f64>,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PinchState {
	pub active: bool,
	pub start_distance: f64,
	pub start_scale: f64,
}

/// Everything one open graph view owns. Built fresh on every open.
pub struct NoteGraphState {
	pub graph: NoteGraph,
	pub simulation: Simulation,
	pub config: GraphConfig,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub pinch: PinchState,
	pub hover: Option<usize>,
	/// Node of the note open in the reader, if it is in the graph.
	pub current: Option<usize>,
	pub width: f64,
	pub height: f64,
	pub pixel_ratio: f64,
	/// Seconds since open.
	pub clock: f64,
}

impl NoteGraphState {
	pub fn new(
		index: &NoteIndex,
		viewport: Viewport,
		config: GraphConfig,
		current_note: Option<&str>,
	) -> Self {
		let graph =
			NoteGraph::build(index, viewport.width, viewport.height, config.entry_animation);
		let current = current_note.and_then(|id| graph.node_index(id));
		Self {
			simulation: Simulation::new(config.simulation.clone()),
			graph,
			config,
			transform: ViewTransform::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			pinch: PinchState::default(),
			hover: None,
			current,
			width: viewport.width,
			height: viewport.height,
			pixel_ratio: viewport.pixel_ratio,
			clock: 0.0,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Radius as drawn this frame, in graph space.
	pub fn rendered_radius(&self, idx: usize) -> f64 {
		let Some(node) = self.graph.nodes.get(idx) else {
			return 0.0;
		};
		let entry = 0.4 + 0.6 * ease_out_cubic(node.burst_progress.clamp(0.0, 1.0));
		let hover = 1.0 + 0.25 * node.hover_amount;
		let squash = 1.0 - 0.3 * node.squash;
		node.base_radius() * entry * hover * squash
	}

	/// Topmost node under a screen point. Nodes draw in index order, so the
	/// search runs backwards.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let margin = HIT_MARGIN / self.transform.k;
		(0..self.graph.len()).rev().find(|&idx| {
			let node = &self.graph.nodes[idx];
			let (dx, dy) = (node.x - gx, node.y - gy);
			(dx * dx + dy * dy).sqrt() < self.rendered_radius(idx) + margin
		})
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		self.hover = node;
	}

	/// The hovered node and its neighbors, or nothing.
	pub fn connected_set(&self) -> HashSet<usize> {
		self.hover
			.map(|idx| self.graph.connected_set(idx))
			.unwrap_or_default()
	}

	pub fn dragged(&self) -> Option<usize> {
		self.drag.node_idx.filter(|_| self.drag.active)
	}

	pub fn is_animating_entry(&self) -> bool {
		!self.graph.burst_complete()
	}

	/// One animation frame: entry animation or physics, then cosmetic easing.
	pub fn tick(&mut self, dt: f64) {
		self.clock += dt;

		if self.is_animating_entry() {
			self.advance_burst();
		} else {
			let pinned = self.dragged();
			self.simulation.step(&mut self.graph, pinned, self.width, self.height);
		}

		let hover_factor = 1.0 - (-HOVER_SPEED * dt).exp();
		let squash_decay = (-SQUASH_SPEED * dt).exp();
		for (idx, node) in self.graph.nodes.iter_mut().enumerate() {
			let target = if self.hover == Some(idx) { 1.0 } else { 0.0 };
			node.hover_amount += (target - node.hover_amount) * hover_factor;
			if node.hover_amount < 0.005 {
				node.hover_amount = 0.0;
			}
			node.squash *= squash_decay;
			if node.squash < 0.01 {
				node.squash = 0.0;
			}
		}
	}

	fn advance_burst(&mut self) {
		let (cx, cy) = self.graph.origin;
		for (idx, node) in self.graph.nodes.iter_mut().enumerate() {
			if node.is_settled() {
				continue;
			}
			let launch = (idx as f64 * BURST_STAGGER).min(BURST_MAX_STAGGER);
			node.burst_progress = ((self.clock - launch) / BURST_DURATION).clamp(0.0, 1.0);
			let t = ease_out_cubic(node.burst_progress);
			node.x = cx + (node.target_x - cx) * t;
			node.y = cy + (node.target_y - cy) * t;
		}
	}

	/// Longest time the entry animation can take.
	pub fn burst_duration(&self) -> f64 {
		let last = self.graph.len().saturating_sub(1) as f64;
		(last * BURST_STAGGER).min(BURST_MAX_STAGGER) + BURST_DURATION
	}

	/// Adopt a new surface size, keeping transform and simulation.
	pub fn resize(&mut self, viewport: Viewport) {
		self.width = viewport.width;
		self.height = viewport.height;
		self.pixel_ratio = viewport.pixel_ratio;
	}
}
