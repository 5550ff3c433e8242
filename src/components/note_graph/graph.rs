//! Node and edge construction from a note index snapshot.

use std::collections::{HashMap, HashSet};
use std::f64::consts::TAU;

use super::config::EntryAnimation;
use super::types::{NoteIndex, Stage};

pub const BASE_RADIUS: f64 = 6.0;
pub const RADIUS_PER_BACKLINK: f64 = 2.0;
pub const MAX_RADIUS: f64 = 20.0;
/// Extra pointer tolerance around a node, in screen pixels.
pub const HIT_MARGIN: f64 = 5.0;

/// Layout circle radius as a fraction of the smaller viewport side.
const SPREAD_FRACTION: f64 = 0.32;

/// Rendered radius before hover/entry scaling: grows with backlinks, capped.
pub fn base_radius(backlink_count: usize) -> f64 {
	(BASE_RADIUS + RADIUS_PER_BACKLINK * backlink_count as f64).min(MAX_RADIUS)
}

/// Simple pseudo-random number in [0, 1), deterministic per seed.
fn rand_simple(seed: usize) -> f64 {
	let x = (seed.wrapping_add(1).wrapping_mul(9301).wrapping_add(49297)) % 233280;
	(x as f64) / 233280.0
}

#[derive(Clone, Debug)]
pub struct GraphNode {
	pub id: String,
	pub title: String,
	pub stage: Stage,
	pub backlink_count: usize,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Where the burst animation delivers this node.
	pub target_x: f64,
	pub target_y: f64,
	/// 0 at the center, 1 once the node has arrived.
	pub burst_progress: f64,
	pub hover_amount: f64,
	/// Click feedback, 1 right after a click, decays to 0.
	pub squash: f64,
}

impl GraphNode {
	pub fn base_radius(&self) -> f64 {
		base_radius(self.backlink_count)
	}

	pub fn is_settled(&self) -> bool {
		self.burst_progress >= 1.0
	}

	/// Jump to the end of the entry animation, leaving the node where it is.
	pub fn finish_burst(&mut self) {
		self.burst_progress = 1.0;
	}
}

/// Index pair into [`NoteGraph::nodes`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GraphEdge {
	pub source: usize,
	pub target: usize,
}

impl GraphEdge {
	pub fn touches(&self, idx: usize) -> bool {
		self.source == idx || self.target == idx
	}
}

/// Nodes and edges of one open graph view.
#[derive(Clone, Debug, Default)]
pub struct NoteGraph {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
	/// Viewport center at build time, where the burst starts.
	pub origin: (f64, f64),
	index_of: HashMap<String, usize>,
	neighbors: Vec<Vec<usize>>,
}

impl NoteGraph {
	/// Lay out every note of `index` inside a `width` x `height` viewport.
	pub fn build(index: &NoteIndex, width: f64, height: f64, entry: EntryAnimation) -> Self {
		let total = index.len();
		let (cx, cy) = (width / 2.0, height / 2.0);
		let spread = SPREAD_FRACTION * width.min(height);
		let slice = if total > 0 { TAU / total as f64 } else { 0.0 };

		let mut nodes = Vec::with_capacity(total);
		let mut index_of = HashMap::with_capacity(total);
		for (i, (id, note)) in index.iter().enumerate() {
			// Up to a third of a slice of angular jitter, +-15% radial.
			let angle = i as f64 * slice + (rand_simple(2 * i) - 0.5) * slice * 0.66;
			let radius = spread * (0.85 + 0.3 * rand_simple(2 * i + 1));
			let (target_x, target_y) = (cx + radius * angle.cos(), cy + radius * angle.sin());
			let ((x, y), burst_progress) = match entry {
				EntryAnimation::Burst => ((cx, cy), 0.0),
				EntryAnimation::CircularSpread => ((target_x, target_y), 1.0),
			};

			nodes.push(GraphNode {
				id: id.to_string(),
				title: note.title_or(id).to_string(),
				stage: note.stage,
				backlink_count: note.backlinks.len(),
				x,
				y,
				vx: 0.0,
				vy: 0.0,
				target_x,
				target_y,
				burst_progress,
				hover_amount: 0.0,
				squash: 0.0,
			});
			index_of.insert(id.to_string(), i);
		}

		let mut edges = Vec::new();
		let mut seen = HashSet::new();
		let mut neighbors = vec![Vec::new(); total];
		for (id, note) in index.iter() {
			let Some(&source) = index_of.get(id) else {
				continue;
			};
			for link in &note.links {
				let Some(&target) = index_of.get(link) else {
					continue;
				};
				let edge = GraphEdge { source, target };
				if !seen.insert(edge) {
					continue;
				}
				edges.push(edge);
				neighbors[source].push(target);
				if source != target {
					neighbors[target].push(source);
				}
			}
		}

		Self {
			nodes,
			edges,
			origin: (cx, cy),
			index_of,
			neighbors,
		}
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn node_index(&self, id: &str) -> Option<usize> {
		self.index_of.get(id).copied()
	}

	/// Nodes sharing an edge with `idx`, once per edge.
	pub fn neighbors(&self, idx: usize) -> &[usize] {
		self.neighbors.get(idx).map(Vec::as_slice).unwrap_or(&[])
	}

	/// `idx` and everything joined to it by an edge.
	pub fn connected_set(&self, idx: usize) -> HashSet<usize> {
		let mut set: HashSet<usize> = self.neighbors(idx).iter().copied().collect();
		set.insert(idx);
		set
	}

	pub fn burst_complete(&self) -> bool {
		self.nodes.iter().all(GraphNode::is_settled)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::note_graph::types::NoteEntry;

	fn note(title: &str, backlinks: &[&str], links: &[&str]) -> NoteEntry {
		NoteEntry {
			title: title.to_string(),
			backlinks: backlinks.iter().map(|s| s.to_string()).collect(),
			links: links.iter().map(|s| s.to_string()).collect(),
			..NoteEntry::default()
		}
	}

	fn sample_index() -> NoteIndex {
		let mut index = NoteIndex::new();
		index.insert("a", note("A", &["c"], &["b", "missing", "b"]));
		index.insert("b", note("B", &["a", "c"], &["c"]));
		index.insert("c", note("C", &["b"], &["a", "b", "private/draft"]));
		index
	}

	#[test]
	fn edges_only_join_known_nodes() {
		let index = sample_index();
		let graph = NoteGraph::build(&index, 800.0, 600.0, EntryAnimation::CircularSpread);

		assert_eq!(graph.len(), 3);
		for edge in &graph.edges {
			assert!(edge.source < graph.len());
			assert!(edge.target < graph.len());
		}

		let mut expected = Vec::new();
		for (id, entry) in index.iter() {
			for link in &entry.links {
				if let Some(target) = graph.node_index(link) {
					let edge = GraphEdge {
						source: graph.node_index(id).unwrap(),
						target,
					};
					if !expected.contains(&edge) {
						expected.push(edge);
					}
				}
			}
		}
		assert_eq!(graph.edges, expected);
		assert_eq!(graph.edges.len(), 4);
	}

	#[test]
	fn radius_grows_with_backlinks_and_caps() {
		assert_eq!(base_radius(0), 6.0);
		assert_eq!(base_radius(3), 12.0);
		assert_eq!(base_radius(7), 20.0);
		assert_eq!(base_radius(100), 20.0);
		for count in 0..50 {
			assert!(base_radius(count) <= base_radius(count + 1));
			assert!(base_radius(count) <= MAX_RADIUS);
		}
	}

	#[test]
	fn node_fields_come_from_the_index() {
		let graph = NoteGraph::build(&sample_index(), 800.0, 600.0, EntryAnimation::Burst);
		let b = &graph.nodes[graph.node_index("b").unwrap()];
		assert_eq!(b.title, "B");
		assert_eq!(b.backlink_count, 2);
		assert_eq!(b.base_radius(), 10.0);
	}

	#[test]
	fn empty_index_builds_empty_graph() {
		let graph = NoteGraph::build(&NoteIndex::new(), 800.0, 600.0, EntryAnimation::Burst);
		assert!(graph.nodes.is_empty());
		assert!(graph.edges.is_empty());
		assert!(graph.burst_complete());
		assert_eq!(graph.neighbors(0), &[] as &[usize]);
	}

	#[test]
	fn circular_spread_places_nodes_around_center() {
		let mut index = NoteIndex::new();
		for i in 0..12 {
			index.insert(format!("n{i}"), NoteEntry::default());
		}
		let graph = NoteGraph::build(&index, 1000.0, 600.0, EntryAnimation::CircularSpread);
		let spread = SPREAD_FRACTION * 600.0;

		let mut distances = Vec::new();
		for node in &graph.nodes {
			let d = ((node.x - 500.0).powi(2) + (node.y - 300.0).powi(2)).sqrt();
			assert!(d >= spread * 0.85 - 1e-9 && d <= spread * 1.15 + 1e-9);
			assert!(node.is_settled());
			distances.push(d);
		}
		// Jittered, not a perfect circle.
		assert!(distances.iter().any(|d| (d - distances[0]).abs() > 1.0));
	}

	#[test]
	fn burst_starts_at_center_with_targets_on_the_circle() {
		let graph = NoteGraph::build(&sample_index(), 800.0, 600.0, EntryAnimation::Burst);
		assert!(!graph.burst_complete());
		for node in &graph.nodes {
			assert_eq!((node.x, node.y), (400.0, 300.0));
			assert_eq!(node.burst_progress, 0.0);
			assert!((node.target_x - 400.0).abs() + (node.target_y - 300.0).abs() > 50.0);
		}
	}

	#[test]
	fn connected_set_includes_both_directions() {
		let graph = NoteGraph::build(&sample_index(), 800.0, 600.0, EntryAnimation::Burst);
		let a = graph.node_index("a").unwrap();
		let b = graph.node_index("b").unwrap();
		let c = graph.node_index("c").unwrap();
		let set = graph.connected_set(a);
		assert!(set.contains(&a) && set.contains(&b) && set.contains(&c));
		assert!(graph.edges.iter().any(|e| e.touches(a)));
	}

	#[test]
	fn self_link_is_a_single_neighbor_entry() {
		let mut index = NoteIndex::new();
		index.insert("loop", note("Loop", &["loop"], &["loop"]));
		let graph = NoteGraph::build(&index, 400.0, 400.0, EntryAnimation::Burst);
		assert_eq!(graph.edges.len(), 1);
		assert_eq!(graph.neighbors(0), &[0]);
	}
}
