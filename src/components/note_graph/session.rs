//! Open/close lifecycle of the graph overlay and the deferred navigation that
//! follows a node click.
//!
//! Every open builds a fresh [`NoteGraphState`] and bumps the session counter.
//! A click hands out a [`NavigationTicket`] stamped with the session; when the
//! click-feedback delay elapses the ticket is redeemed, and it only navigates
//! if that same session is still open.

use log::{debug, info};

use super::config::GraphConfig;
use super::state::{NoteGraphState, Viewport};
use super::types::NoteIndex;

/// Receives "open this note" requests from the graph.
pub trait Navigator {
	fn navigate_to_note(&self, id: &str);
}

impl<F: Fn(&str)> Navigator for F {
	fn navigate_to_note(&self, id: &str) {
		self(id)
	}
}

/// A pending navigation, valid only for the session that issued it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationTicket {
	session: u64,
	note_id: String,
}

impl NavigationTicket {
	pub fn note_id(&self) -> &str {
		&self.note_id
	}
}

pub struct GraphView {
	config: GraphConfig,
	navigator: Box<dyn Navigator>,
	state: Option<NoteGraphState>,
	session: u64,
	closing: bool,
}

impl GraphView {
	pub fn new(config: GraphConfig, navigator: impl Navigator + 'static) -> Self {
		Self {
			config,
			navigator: Box::new(navigator),
			state: None,
			session: 0,
			closing: true,
		}
	}

	/// Build a fresh graph, discarding anything left from an earlier open.
	pub fn open(
		&mut self,
		index: &NoteIndex,
		viewport: Viewport,
		current_note: Option<&str>,
	) -> &mut NoteGraphState {
		self.session += 1;
		self.closing = false;
		let state = NoteGraphState::new(index, viewport, self.config.clone(), current_note);
		info!(
			"note graph: opened session {} with {} nodes, {} edges",
			self.session,
			state.graph.len(),
			state.graph.edges.len()
		);
		debug!(
			"note graph: entry takes {:.2}s, layout settles within {} frames",
			if state.is_animating_entry() { state.burst_duration() } else { 0.0 },
			state.simulation.frames_remaining()
		);
		self.state.insert(state)
	}

	pub fn close(&mut self) {
		if self.closing {
			return;
		}
		self.closing = true;
		self.state = None;
		info!("note graph: closed session {}", self.session);
	}

	pub fn is_closing(&self) -> bool {
		self.closing
	}

	pub fn state(&self) -> Option<&NoteGraphState> {
		self.state.as_ref().filter(|_| !self.is_closing())
	}

	pub fn state_mut(&mut self) -> Option<&mut NoteGraphState> {
		if self.is_closing() {
			return None;
		}
		self.state.as_mut()
	}

	/// Advance one frame. Returns `false` once the view is closing, meaning no
	/// further frames should be requested.
	pub fn frame(&mut self, dt: f64) -> bool {
		match self.state_mut() {
			Some(state) => {
				state.tick(dt);
				true
			}
			None => false,
		}
	}

	pub fn ticket(&self, note_id: impl Into<String>) -> NavigationTicket {
		NavigationTicket {
			session: self.session,
			note_id: note_id.into(),
		}
	}

	/// Close the view and navigate, unless the ticket's session has since been
	/// closed or replaced. Returns whether navigation happened.
	pub fn redeem(&mut self, ticket: NavigationTicket) -> bool {
		if self.is_closing() || ticket.session != self.session {
			debug!("note graph: dropped stale navigation to {}", ticket.note_id());
			return false;
		}
		self.close();
		info!("note graph: navigating to {}", ticket.note_id());
		self.navigator.navigate_to_note(ticket.note_id());
		true
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::rc::Rc;

	use super::*;
	use crate::components::note_graph::interaction::Release;
	use crate::components::note_graph::types::NoteEntry;

	fn index() -> NoteIndex {
		let mut index = NoteIndex::new();
		index.insert(
			"a",
			NoteEntry {
				links: vec!["b".into()],
				..NoteEntry::default()
			},
		);
		index.insert("b", NoteEntry::default());
		index
	}

	fn view() -> (GraphView, Rc<RefCell<Vec<String>>>) {
		let visited = Rc::new(RefCell::new(Vec::new()));
		let log = visited.clone();
		let view = GraphView::new(GraphConfig::windowed(), move |id: &str| {
			log.borrow_mut().push(id.to_string())
		});
		(view, visited)
	}

	fn viewport() -> Viewport {
		Viewport::new(800.0, 600.0, 1.0)
	}

	/// Press and release on node `idx` without moving.
	fn click(view: &mut GraphView, idx: usize) -> Release {
		let state = view.state_mut().unwrap();
		let (x, y) = (state.graph.nodes[idx].x, state.graph.nodes[idx].y);
		state.pointer_down(x, y);
		state.pointer_up(x, y)
	}

	#[test]
	fn starts_closed() {
		let (mut view, _) = view();
		assert!(view.is_closing());
		assert!(view.state().is_none());
		assert!(!view.frame(0.016));
	}

	#[test]
	fn reopening_resets_everything() {
		let (mut view, _) = view();
		let state = view.open(&index(), viewport(), None);
		let (x, y) = (state.graph.nodes[1].x, state.graph.nodes[1].y);
		state.pointer_down(x, y);
		assert_eq!(state.dragged(), Some(1));
		state.transform.k = 1.8;
		state.transform.x = 120.0;
		state.simulation.alpha = 0.02;
		state.set_hover(Some(0));

		let state = view.open(&index(), viewport(), None);
		assert_eq!(state.simulation.alpha, 1.0);
		assert_eq!(state.transform.k, 1.0);
		assert_eq!((state.transform.x, state.transform.y), (0.0, 0.0));
		assert!(state.dragged().is_none());
		assert!(state.hover.is_none());
		assert!(!state.pan.active);
	}

	#[test]
	fn click_navigates_once_after_redeem() {
		let (mut view, visited) = view();
		view.open(&index(), viewport(), None);
		let Release::Click(id) = click(&mut view, 1) else {
			panic!("expected a click");
		};
		let ticket = view.ticket(id);
		assert!(visited.borrow().is_empty());

		assert!(view.redeem(ticket.clone()));
		assert_eq!(*visited.borrow(), ["b"]);
		assert!(view.is_closing());
		assert!(!view.frame(0.016));

		assert!(!view.redeem(ticket));
		assert_eq!(visited.borrow().len(), 1);
	}

	#[test]
	fn drag_does_not_navigate() {
		let (mut view, visited) = view();
		view.open(&index(), viewport(), None);
		let state = view.state_mut().unwrap();
		let (x, y) = (state.graph.nodes[0].x, state.graph.nodes[0].y);
		state.pointer_down(x, y);
		state.pointer_move(x + 12.0, y);
		assert_eq!(state.pointer_up(x + 12.0, y), Release::Drag);
		assert!(visited.borrow().is_empty());
	}

	#[test]
	fn closing_before_the_deferred_navigate_drops_it() {
		let (mut view, visited) = view();
		view.open(&index(), viewport(), None);
		let Release::Click(id) = click(&mut view, 0) else {
			panic!("expected a click");
		};
		let ticket = view.ticket(id);
		view.close();

		assert!(!view.redeem(ticket));
		assert!(visited.borrow().is_empty());
	}

	#[test]
	fn ticket_from_an_earlier_session_is_stale() {
		let (mut view, visited) = view();
		view.open(&index(), viewport(), None);
		let Release::Click(id) = click(&mut view, 0) else {
			panic!("expected a click");
		};
		let ticket = view.ticket(id);
		view.close();
		view.open(&index(), viewport(), None);

		assert!(!view.redeem(ticket));
		assert!(visited.borrow().is_empty());
		assert!(!view.is_closing());
	}

	#[test]
	fn frames_run_only_while_open() {
		let (mut view, _) = view();
		view.open(&NoteIndex::new(), viewport(), None);
		for _ in 0..3 {
			assert!(view.frame(0.016));
		}
		view.close();
		view.close();
		assert!(!view.frame(0.016));
		assert!(view.state().is_none());
	}
}
