//! Per-frame force simulation: short-range repulsion, center gravity and edge
//! springs, throttled by a decaying `alpha`.
//!
//! Velocities are accumulated node by node and positions move in place, so a
//! node sees the already-updated positions of the nodes before it in the same
//! frame.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use super::graph::NoteGraph;

/// Physics constants. Distances are graph-space pixels.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationParams {
	/// Nodes closer than this push each other apart.
	pub repulsion_distance: f64,
	pub repulsion_strength: f64,
	pub gravity: f64,
	/// Rest length of an edge spring.
	pub link_distance: f64,
	pub link_strength: f64,
	/// Velocity multiplier applied every frame.
	pub velocity_decay: f64,
	pub alpha_decay: f64,
	/// Physics stops once alpha falls to this.
	pub alpha_min: f64,
	/// Alpha floor applied when a drag starts.
	pub reheat_alpha: f64,
	/// Settled nodes are kept this far inside the viewport.
	pub padding: f64,
}

impl Default for SimulationParams {
	fn default() -> Self {
		Self {
			repulsion_distance: 80.0,
			repulsion_strength: 0.5,
			gravity: 0.001,
			link_distance: 100.0,
			link_strength: 0.002,
			velocity_decay: 0.9,
			alpha_decay: 0.99,
			alpha_min: 1e-3,
			reheat_alpha: 0.8,
			padding: 50.0,
		}
	}
}

#[derive(Clone, Debug)]
pub struct Simulation {
	pub alpha: f64,
	pub params: SimulationParams,
}

impl Simulation {
	pub fn new(params: SimulationParams) -> Self {
		Self { alpha: 1.0, params }
	}

	pub fn is_active(&self) -> bool {
		self.alpha > self.params.alpha_min
	}

	/// Raise alpha to at least the reheat floor. Never lowers it.
	pub fn reheat(&mut self) {
		self.alpha = self.alpha.max(self.params.reheat_alpha);
	}

	/// Advance one frame. `pinned` is the node under the pointer, which physics
	/// leaves alone. Returns whether anything moved.
	pub fn step(
		&mut self,
		graph: &mut NoteGraph,
		pinned: Option<usize>,
		width: f64,
		height: f64,
	) -> bool {
		if !self.is_active() {
			return false;
		}

		let p = &self.params;
		let alpha = self.alpha;
		let (cx, cy) = (width / 2.0, height / 2.0);
		let (min_x, max_x) = (p.padding, (width - p.padding).max(p.padding));
		let (min_y, max_y) = (p.padding, (height - p.padding).max(p.padding));

		for i in 0..graph.nodes.len() {
			if Some(i) == pinned {
				let node = &mut graph.nodes[i];
				node.vx = 0.0;
				node.vy = 0.0;
				continue;
			}

			let (x, y) = (graph.nodes[i].x, graph.nodes[i].y);
			let (mut ax, mut ay) = (0.0, 0.0);

			for (j, other) in graph.nodes.iter().enumerate() {
				if j == i {
					continue;
				}
				let (mut dx, mut dy) = (x - other.x, y - other.y);
				let mut dist = (dx * dx + dy * dy).sqrt();
				if dist == 0.0 {
					// Coincident: split along a fixed per-pair direction.
					let angle = ((i as f64) * 0.618_034 + (j as f64) * 0.414_214) * TAU;
					(dx, dy) = (angle.cos(), angle.sin());
					dist = 1.0;
				}
				if dist < p.repulsion_distance {
					let force = (p.repulsion_distance - dist) / dist * p.repulsion_strength * alpha;
					ax += dx * force;
					ay += dy * force;
				}
			}

			ax += (cx - x) * p.gravity * alpha;
			ay += (cy - y) * p.gravity * alpha;

			for &j in graph.neighbors(i) {
				if j == i {
					continue;
				}
				let other = &graph.nodes[j];
				let (dx, dy) = (other.x - x, other.y - y);
				let dist = (dx * dx + dy * dy).sqrt().max(1.0);
				let force = (dist - p.link_distance) * p.link_strength * alpha;
				ax += dx / dist * force;
				ay += dy / dist * force;
			}

			let node = &mut graph.nodes[i];
			node.vx = (node.vx + ax) * p.velocity_decay;
			node.vy = (node.vy + ay) * p.velocity_decay;
			node.x = (node.x + node.vx).clamp(min_x, max_x);
			node.y = (node.y + node.vy).clamp(min_y, max_y);
		}

		self.alpha *= p.alpha_decay;
		true
	}

	/// Frames from the current alpha until physics stops, with no reheating.
	pub fn frames_remaining(&self) -> usize {
		let mut alpha = self.alpha;
		let mut frames = 0;
		while alpha > self.params.alpha_min {
			alpha *= self.params.alpha_decay;
			frames += 1;
		}
		frames
	}
}
