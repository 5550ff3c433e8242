//! Pointer and touch handling. Coordinates are canvas-local CSS pixels.
//!
//! Panning and dragging are exclusive; hover is tracked alongside both.

use super::state::{
	DragState, MAX_SCALE, MIN_SCALE, NoteGraphState, PanState, PinchState, ViewTransform,
};

/// Movement in either axis at or beyond this turns a press into a drag.
pub const CLICK_SLOP: f64 = 5.0;
/// Longest touch that still counts as a tap, in ms.
pub const TAP_MAX_MS: f64 = 300.0;
const ZOOM_IN: f64 = 1.1;
const ZOOM_OUT: f64 = 0.9;

/// What a pointer or touch release amounted to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Release {
	/// A node was clicked; carries its note id.
	Click(String),
	Drag,
	Pan,
	None,
}

impl NoteGraphState {
	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		self.pinch = PinchState::default();
		match self.node_at_position(sx, sy) {
			Some(idx) => self.begin_drag(idx, sx, sy, None),
			None => self.begin_pan(sx, sy),
		}
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		if self.drag.active {
			if let Some(idx) = self.drag.node_idx {
				let (dx, dy) = (
					(sx - self.drag.start_x) / self.transform.k,
					(sy - self.drag.start_y) / self.transform.k,
				);
				let (nx, ny) = (self.drag.node_start_x + dx, self.drag.node_start_y + dy);
				if let Some(node) = self.graph.nodes.get_mut(idx) {
					node.x = nx;
					node.y = ny;
					node.vx = 0.0;
					node.vy = 0.0;
				}
			}
			self.drag.last_x = sx;
			self.drag.last_y = sy;
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
		}

		let hovered = if self.drag.active {
			self.drag.node_idx
		} else {
			self.node_at_position(sx, sy)
		};
		self.set_hover(hovered);
	}

	pub fn pointer_up(&mut self, sx: f64, sy: f64) -> Release {
		if self.drag.active {
			return self.finish_drag(sx, sy, true);
		}
		self.finish_pan()
	}

	/// Pointer left the canvas: abandon whatever was in progress.
	pub fn pointer_leave(&mut self) {
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.pinch = PinchState::default();
		self.set_hover(None);
	}

	/// Reset the view on empty canvas. Returns whether anything happened.
	pub fn double_click(&mut self, sx: f64, sy: f64) -> bool {
		if self.node_at_position(sx, sy).is_some() {
			return false;
		}
		self.transform = ViewTransform::default();
		true
	}

	/// One wheel tick; positive `delta_y` zooms out. Horizontal-only scrolls
	/// (`delta_y == 0`) leave the zoom alone.
	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 {
			ZOOM_OUT
		} else if delta_y < 0.0 {
			ZOOM_IN
		} else {
			return;
		};
		self.zoom_at(sx, sy, self.transform.k * factor);
	}

	/// Set the scale, keeping the graph point under `(sx, sy)` in place.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, scale: f64) {
		let new_k = scale.clamp(MIN_SCALE, MAX_SCALE);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn touch_start(&mut self, touches: &[(f64, f64)], time_ms: f64) {
		match touches {
			[a, b, ..] if self.config.supports_pinch_zoom => {
				self.drag = DragState::default();
				self.pan = PanState::default();
				self.pinch = PinchState {
					active: true,
					start_distance: distance(*a, *b).max(1.0),
					start_scale: self.transform.k,
				};
			}
			[(x, y), ..] => {
				self.pinch = PinchState::default();
				match self.node_at_position(*x, *y) {
					Some(idx) => self.begin_drag(idx, *x, *y, Some(time_ms)),
					None => self.begin_pan(*x, *y),
				}
			}
			[] => {}
		}
	}

	pub fn touch_move(&mut self, touches: &[(f64, f64)]) {
		if self.pinch.active {
			if let [a, b, ..] = touches {
				let (mx, my) = ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0);
				let ratio = distance(*a, *b) / self.pinch.start_distance;
				self.zoom_at(mx, my, self.pinch.start_scale * ratio);
			}
			return;
		}
		if let Some(&(x, y)) = touches.first() {
			self.pointer_move(x, y);
		}
	}

	/// `remaining` are the fingers still down after this touch ended.
	pub fn touch_end(&mut self, remaining: &[(f64, f64)], time_ms: f64) -> Release {
		if self.pinch.active {
			if remaining.len() < 2 {
				self.pinch = PinchState::default();
			}
			return Release::None;
		}
		if self.drag.active {
			let quick = self
				.drag
				.started_at
				.is_some_and(|started| time_ms - started < TAP_MAX_MS);
			let (x, y) = (self.drag.last_x, self.drag.last_y);
			return self.finish_drag(x, y, quick);
		}
		self.finish_pan()
	}

	fn begin_drag(&mut self, idx: usize, sx: f64, sy: f64, started_at: Option<f64>) {
		let Some(node) = self.graph.nodes.get_mut(idx) else {
			return;
		};
		node.finish_burst();
		node.vx = 0.0;
		node.vy = 0.0;
		self.drag = DragState {
			active: true,
			node_idx: Some(idx),
			start_x: sx,
			start_y: sy,
			node_start_x: node.x,
			node_start_y: node.y,
			last_x: sx,
			last_y: sy,
			started_at,
		};
		self.pan = PanState::default();
		self.simulation.reheat();
		self.set_hover(Some(idx));
	}

	fn begin_pan(&mut self, sx: f64, sy: f64) {
		self.drag = DragState::default();
		self.pan = PanState {
			active: true,
			start_x: sx,
			start_y: sy,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	fn finish_drag(&mut self, sx: f64, sy: f64, may_click: bool) -> Release {
		let drag = std::mem::take(&mut self.drag);
		let moved =
			(sx - drag.start_x).abs() >= CLICK_SLOP || (sy - drag.start_y).abs() >= CLICK_SLOP;
		let Some(node) = drag.node_idx.and_then(|idx| self.graph.nodes.get_mut(idx)) else {
			return Release::None;
		};
		if moved || !may_click {
			return Release::Drag;
		}
		node.squash = 1.0;
		Release::Click(node.id.clone())
	}

	fn finish_pan(&mut self) -> Release {
		let was_panning = self.pan.active;
		self.pan = PanState::default();
		if was_panning { Release::Pan } else { Release::None }
	}
}

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
	((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::note_graph::config::GraphConfig;
	use crate::components::note_graph::state::Viewport;
	use crate::components::note_graph::types::{NoteEntry, NoteIndex};

	/// Three nodes at known positions: "a" (200, 200), "b" (400, 300), "c" (404, 300).
	fn state_with(config: GraphConfig) -> NoteGraphState {
		let mut index = NoteIndex::new();
		for id in ["a", "b", "c"] {
			index.insert(
				id,
				NoteEntry {
					links: vec!["a".to_string()],
					..NoteEntry::default()
				},
			);
		}
		let mut state = NoteGraphState::new(&index, Viewport::new(800.0, 600.0, 1.0), config, None);
		for (node, (x, y)) in state
			.graph
			.nodes
			.iter_mut()
			.zip([(200.0, 200.0), (400.0, 300.0), (404.0, 300.0)])
		{
			node.x = x;
			node.y = y;
			node.finish_burst();
		}
		state
	}

	fn state() -> NoteGraphState {
		state_with(GraphConfig::windowed())
	}

	#[test]
	fn click_in_place_is_a_click() {
		let mut s = state();
		s.pointer_down(200.0, 200.0);
		assert_eq!(s.dragged(), Some(0));
		assert_eq!(s.pointer_up(202.0, 197.0), Release::Click("a".into()));
		assert_eq!(s.graph.nodes[0].squash, 1.0);
		assert!(s.dragged().is_none());
	}

	#[test]
	fn moving_five_pixels_is_a_drag() {
		for (dx, dy) in [(5.0, 0.0), (0.0, -5.0), (30.0, 40.0)] {
			let mut s = state();
			s.pointer_down(200.0, 200.0);
			s.pointer_move(200.0 + dx, 200.0 + dy);
			assert_eq!(s.pointer_up(200.0 + dx, 200.0 + dy), Release::Drag);
			assert_eq!(s.graph.nodes[0].squash, 0.0);
		}
	}

	#[test]
	fn drag_moves_node_in_graph_space_and_reheats() {
		let mut s = state();
		s.simulation.alpha = 0.01;
		s.zoom_at(0.0, 0.0, 2.0);
		// "a" now sits at screen (400, 400).
		s.pointer_down(400.0, 400.0);
		assert_eq!(s.simulation.alpha, 0.8);
		s.pointer_move(440.0, 420.0);
		let node = &s.graph.nodes[0];
		assert_eq!((node.x, node.y), (220.0, 210.0));
		assert_eq!((node.vx, node.vy), (0.0, 0.0));
		assert_eq!(s.hover, Some(0));

		s.tick(0.016);
		let node = &s.graph.nodes[0];
		assert_eq!((node.x, node.y), (220.0, 210.0));
	}

	#[test]
	fn hit_test_prefers_topmost_node() {
		let s = state();
		assert_eq!(s.node_at_position(402.0, 300.0), Some(2));
		assert_eq!(s.node_at_position(200.0 + 6.0 + 4.0, 200.0), Some(0));
		assert_eq!(s.node_at_position(200.0 + 6.0 + 6.0, 200.0), None);
	}

	#[test]
	fn empty_canvas_pans() {
		let mut s = state();
		s.pointer_down(600.0, 100.0);
		assert!(s.pan.active && s.dragged().is_none());
		s.pointer_move(650.0, 80.0);
		assert_eq!((s.transform.x, s.transform.y), (50.0, -20.0));
		s.pointer_move(610.0, 130.0);
		assert_eq!((s.transform.x, s.transform.y), (10.0, 30.0));
		assert_eq!(s.pointer_up(610.0, 130.0), Release::Pan);
		assert!(!s.pan.active);
		assert_eq!(s.pointer_up(610.0, 130.0), Release::None);
	}

	#[test]
	fn hover_tracks_pointer() {
		let mut s = state();
		s.pointer_move(200.0, 200.0);
		assert_eq!(s.hover, Some(0));
		s.pointer_move(700.0, 500.0);
		assert_eq!(s.hover, None);
		s.pointer_move(200.0, 200.0);
		s.pointer_leave();
		assert_eq!(s.hover, None);
	}

	#[test]
	fn leaving_mid_drag_cancels_it() {
		let mut s = state();
		s.pointer_down(200.0, 200.0);
		s.pointer_move(230.0, 200.0);
		assert_eq!(s.dragged(), Some(0));
		s.pointer_leave();
		assert!(s.dragged().is_none());
		assert_eq!(s.hover, None);

		s.pointer_move(260.0, 200.0);
		assert_eq!(s.graph.nodes[0].x, 230.0);
		assert_eq!(s.pointer_up(260.0, 200.0), Release::None);
		assert_eq!(s.graph.nodes[0].squash, 0.0);
	}

	#[test]
	fn leaving_mid_pan_cancels_it() {
		let mut s = state();
		s.pointer_down(600.0, 100.0);
		s.pointer_move(640.0, 120.0);
		assert!(s.pan.active);
		s.pointer_leave();
		assert!(!s.pan.active);

		s.pointer_move(700.0, 200.0);
		assert_eq!((s.transform.x, s.transform.y), (40.0, 20.0));
		assert_eq!(s.pointer_up(700.0, 200.0), Release::None);
	}

	#[test]
	fn zoom_stays_clamped() {
		let mut s = state();
		for _ in 0..50 {
			s.wheel(300.0, 200.0, -1.0);
			assert!(s.transform.k <= MAX_SCALE);
		}
		assert_eq!(s.transform.k, MAX_SCALE);
		for _ in 0..50 {
			s.wheel(300.0, 200.0, 1.0);
			assert!(s.transform.k >= MIN_SCALE);
		}
		assert_eq!(s.transform.k, MIN_SCALE);
	}

	#[test]
	fn horizontal_scroll_does_not_zoom() {
		let mut s = state();
		s.transform = ViewTransform { x: 15.0, y: 5.0, k: 1.2 };
		for _ in 0..10 {
			s.wheel(400.0, 300.0, 0.0);
		}
		assert_eq!(s.transform, ViewTransform { x: 15.0, y: 5.0, k: 1.2 });
	}

	#[test]
	fn zoom_keeps_cursor_point_fixed() {
		let mut s = state();
		s.transform = ViewTransform { x: 30.0, y: -10.0, k: 1.0 };
		let before = s.screen_to_graph(250.0, 180.0);
		s.wheel(250.0, 180.0, -3.0);
		let after = s.screen_to_graph(250.0, 180.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
		assert!((s.transform.k - 1.1).abs() < 1e-12);
	}

	#[test]
	fn double_click_resets_only_on_empty_canvas() {
		let mut s = state();
		s.transform = ViewTransform { x: 40.0, y: 25.0, k: 1.0 };
		assert!(!s.double_click(240.0, 225.0));
		assert_eq!(s.transform.x, 40.0);
		s.transform.k = 1.7;
		assert!(s.double_click(700.0, 20.0));
		assert_eq!(s.transform, ViewTransform::default());
	}

	#[test]
	fn quick_still_tap_is_a_click() {
		let mut s = state();
		s.touch_start(&[(200.0, 200.0)], 1000.0);
		assert_eq!(s.touch_end(&[], 1120.0), Release::Click("a".into()));
	}

	#[test]
	fn slow_or_moved_touch_is_a_drag() {
		let mut s = state();
		s.touch_start(&[(200.0, 200.0)], 1000.0);
		assert_eq!(s.touch_end(&[], 1400.0), Release::Drag);

		s.touch_start(&[(200.0, 200.0)], 2000.0);
		s.touch_move(&[(230.0, 200.0)]);
		assert_eq!(s.graph.nodes[0].x, 230.0);
		assert_eq!(s.touch_end(&[], 2050.0), Release::Drag);
	}

	#[test]
	fn pinch_scales_from_the_start_scale() {
		let mut s = state_with(GraphConfig::terminal());
		s.touch_start(&[(300.0, 100.0), (400.0, 100.0)], 0.0);
		assert!(s.pinch.active);
		s.touch_move(&[(275.0, 100.0), (425.0, 100.0)]);
		assert!((s.transform.k - 1.5).abs() < 1e-9);
		s.touch_move(&[(200.0, 100.0), (500.0, 100.0)]);
		assert_eq!(s.transform.k, MAX_SCALE);
		s.touch_move(&[(340.0, 100.0), (360.0, 100.0)]);
		assert_eq!(s.transform.k, MIN_SCALE);
		assert_eq!(s.touch_end(&[(340.0, 100.0)], 10.0), Release::None);
		assert!(!s.pinch.active);
	}

	#[test]
	fn two_fingers_without_pinch_support_pan() {
		let mut s = state();
		s.touch_start(&[(600.0, 100.0), (700.0, 100.0)], 0.0);
		assert!(!s.pinch.active);
		assert!(s.pan.active);
		s.touch_move(&[(620.0, 110.0), (720.0, 110.0)]);
		assert_eq!((s.transform.x, s.transform.y), (20.0, 10.0));
		assert_eq!(s.touch_end(&[], 50.0), Release::Pan);
	}

	#[test]
	fn dragging_mid_burst_ends_that_nodes_burst() {
		let mut s = state_with(GraphConfig::terminal());
		for node in &mut s.graph.nodes {
			node.burst_progress = 0.5;
		}
		s.pointer_down(200.0, 200.0);
		assert!(s.graph.nodes[0].is_settled());
		assert!(!s.graph.nodes[1].is_settled());
	}
}
