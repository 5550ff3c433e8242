use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent, TouchList,
	WheelEvent, Window,
};

use super::config::GraphConfig;
use super::error::GraphError;
use super::frame::{Debounced, FrameLoop, set_timeout};
use super::interaction::Release;
use super::render;
use super::session::GraphView;
use super::state::Viewport;
use super::types::NoteIndex;

/// Squash feedback plays this long before navigating.
const CLICK_FEEDBACK_MS: i32 = 180;
const RESIZE_DEBOUNCE_MS: i32 = 150;

type SharedView = Rc<RefCell<GraphView>>;
type SharedFrames = Rc<RefCell<FrameLoop>>;

struct WindowListeners {
	_resize: Closure<dyn FnMut()>,
	_keydown: Closure<dyn FnMut(KeyboardEvent)>,
}

fn window() -> Result<Window, GraphError> {
	web_sys::window().ok_or(GraphError::NoWindow)
}

fn measure(window: &Window) -> Result<Viewport, GraphError> {
	let width = window.inner_width()?.as_f64().unwrap_or(800.0);
	let height = window.inner_height()?.as_f64().unwrap_or(600.0);
	Ok(Viewport::new(width, height, window.device_pixel_ratio().max(1.0)))
}

fn size_canvas(canvas: &HtmlCanvasElement, viewport: Viewport) {
	canvas.set_width((viewport.width * viewport.pixel_ratio) as u32);
	canvas.set_height((viewport.height * viewport.pixel_ratio) as u32);
	// `ElementExt::style` from the leptos prelude shadows the inherent getter.
	let style = web_sys::HtmlElement::style(canvas);
	let _ = style.set_property("width", &format!("{}px", viewport.width));
	let _ = style.set_property("height", &format!("{}px", viewport.height));
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, GraphError> {
	canvas
		.get_context("2d")?
		.ok_or(GraphError::NoContext)?
		.dyn_into()
		.map_err(|_| GraphError::NoContext)
}

fn local_point(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(client_x as f64 - rect.left(), client_y as f64 - rect.top())
}

fn touch_points(canvas: &HtmlCanvasElement, touches: &TouchList) -> Vec<(f64, f64)> {
	(0..touches.length())
		.filter_map(|i| touches.get(i))
		.map(|touch| local_point(canvas, touch.client_x(), touch.client_y()))
		.collect()
}

fn open_graph(
	canvas: &HtmlCanvasElement,
	view: &SharedView,
	frames: &SharedFrames,
	index: &NoteIndex,
	current_note: Option<&str>,
) -> Result<(), GraphError> {
	let window = window()?;
	let ctx = context_2d(canvas)?;
	let viewport = measure(&window)?;
	size_canvas(canvas, viewport);
	view.borrow_mut().open(index, viewport, current_note);

	let view = view.clone();
	frames.borrow_mut().start(move |dt| {
		let mut view = view.borrow_mut();
		if !view.frame(dt) {
			return false;
		}
		if let Some(state) = view.state() {
			render::render(state, &ctx);
		}
		true
	})
}

fn install_listeners(
	canvas_ref: NodeRef<leptos::html::Canvas>,
	view: &SharedView,
	open: RwSignal<bool>,
) -> Result<WindowListeners, GraphError> {
	let win = window()?;

	let view = view.clone();
	let resize = Debounced::new(RESIZE_DEBOUNCE_MS, move || {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let viewport = match window().and_then(|w| measure(&w)) {
			Ok(viewport) => viewport,
			Err(err) => {
				warn!("note graph: resize skipped: {err}");
				return;
			}
		};
		if let Some(state) = view.borrow_mut().state_mut() {
			size_canvas(&canvas, viewport);
			state.resize(viewport);
			debug!("note graph: resized to {}x{}", viewport.width, viewport.height);
		}
	});
	let on_resize = Closure::<dyn FnMut()>::new(move || {
		if let Err(err) = resize.trigger() {
			warn!("note graph: could not schedule resize: {err}");
		}
	});
	win.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;

	let on_keydown = Closure::<dyn FnMut(KeyboardEvent)>::new(move |ev: KeyboardEvent| {
		if ev.key() == "Escape" && open.get_untracked() {
			open.set(false);
		}
	});
	win.add_event_listener_with_callback("keydown", on_keydown.as_ref().unchecked_ref())?;

	Ok(WindowListeners {
		_resize: on_resize,
		_keydown: on_keydown,
	})
}

/// Let the click feedback play, then navigate if this graph session is still
/// the one on screen.
fn schedule_navigation(
	view: &SharedView,
	frames: &SharedFrames,
	open: RwSignal<bool>,
	note_id: String,
) {
	let ticket = view.borrow().ticket(note_id);
	let (view, frames) = (view.clone(), frames.clone());
	let scheduled = set_timeout(
		move || {
			let navigated = view.borrow_mut().redeem(ticket);
			if navigated {
				frames.borrow_mut().stop();
				open.set(false);
			}
		},
		CLICK_FEEDBACK_MS,
	);
	if let Err(err) = scheduled {
		warn!("note graph: could not schedule navigation: {err}");
	}
}

/// Full-window overlay drawing the garden's link graph.
///
/// Mount it once; `open` shows and hides it. Every show builds a fresh graph
/// from `index`. Clicking a node calls `on_navigate` with the note id and
/// closes the overlay. Escape closes it too.
#[component]
pub fn NoteGraphOverlay<F>(
	/// Shows the overlay. The overlay clears it when it closes itself.
	open: RwSignal<bool>,
	/// Note index snapshot used at open time.
	#[prop(into)]
	index: Signal<NoteIndex>,
	/// Note open in the reader, highlighted in the graph.
	#[prop(into)]
	current_note: Signal<Option<String>>,
	/// Variant configuration; defaults to the terminal style.
	#[prop(optional)]
	config: Option<GraphConfig>,
	/// Called with the id of a clicked note.
	on_navigate: F,
) -> impl IntoView
where
	F: Fn(String) + 'static,
{
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let view: SharedView = Rc::new(RefCell::new(GraphView::new(
		config.unwrap_or_default(),
		move |id: &str| on_navigate(id.to_string()),
	)));
	let frames: SharedFrames = Rc::new(RefCell::new(FrameLoop::default()));
	let listeners: Rc<RefCell<Option<WindowListeners>>> = Rc::new(RefCell::new(None));

	let (view_fx, frames_fx) = (view.clone(), frames.clone());
	Effect::new(move |_| {
		let is_open = open.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		if listeners.borrow().is_none() {
			match install_listeners(canvas_ref, &view_fx, open) {
				Ok(installed) => *listeners.borrow_mut() = Some(installed),
				Err(err) => warn!("note graph: window listeners unavailable: {err}"),
			}
		}

		if !is_open {
			frames_fx.borrow_mut().stop();
			view_fx.borrow_mut().close();
			return;
		}

		let current = current_note.get_untracked();
		let opened = index.with_untracked(|index| {
			open_graph(&canvas, &view_fx, &frames_fx, index, current.as_deref())
		});
		if let Err(err) = opened {
			warn!("note graph: not drawing: {err}");
			view_fx.borrow_mut().close();
		}
	});

	let view_md = view.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let (x, y) = local_point(&canvas, ev.client_x(), ev.client_y());
		if let Some(s) = view_md.borrow_mut().state_mut() {
			s.pointer_down(x, y);
		}
	};

	let view_mm = view.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let (x, y) = local_point(&canvas, ev.client_x(), ev.client_y());
		if let Some(s) = view_mm.borrow_mut().state_mut() {
			s.pointer_move(x, y);
		}
	};

	let (view_mu, frames_mu) = (view.clone(), frames.clone());
	let on_mouseup = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let (x, y) = local_point(&canvas, ev.client_x(), ev.client_y());
		let release = match view_mu.borrow_mut().state_mut() {
			Some(s) => s.pointer_up(x, y),
			None => return,
		};
		if let Release::Click(id) = release {
			schedule_navigation(&view_mu, &frames_mu, open, id);
		}
	};

	let view_ml = view.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(s) = view_ml.borrow_mut().state_mut() {
			s.pointer_leave();
		}
	};

	let view_dc = view.clone();
	let on_dblclick = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let (x, y) = local_point(&canvas, ev.client_x(), ev.client_y());
		if let Some(s) = view_dc.borrow_mut().state_mut() {
			s.double_click(x, y);
		}
	};

	let view_wh = view.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let (x, y) = local_point(&canvas, ev.client_x(), ev.client_y());
		if let Some(s) = view_wh.borrow_mut().state_mut() {
			s.wheel(x, y, ev.delta_y());
		}
	};

	let view_ts = view.clone();
	let on_touchstart = move |ev: TouchEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let points = touch_points(&canvas, &ev.touches());
		if let Some(s) = view_ts.borrow_mut().state_mut() {
			s.touch_start(&points, ev.time_stamp());
		}
	};

	let view_tm = view.clone();
	let on_touchmove = move |ev: TouchEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let points = touch_points(&canvas, &ev.touches());
		if let Some(s) = view_tm.borrow_mut().state_mut() {
			s.touch_move(&points);
		}
	};

	let (view_te, frames_te) = (view.clone(), frames.clone());
	let on_touchend = move |ev: TouchEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let remaining = touch_points(&canvas, &ev.touches());
		let release = match view_te.borrow_mut().state_mut() {
			Some(s) => s.touch_end(&remaining, ev.time_stamp()),
			None => return,
		};
		if let Release::Click(id) = release {
			schedule_navigation(&view_te, &frames_te, open, id);
		}
	};

	let view_tc = view.clone();
	let on_touchcancel = move |_: TouchEvent| {
		if let Some(s) = view_tc.borrow_mut().state_mut() {
			s.pointer_leave();
		}
	};

	view! {
		<div class="note-graph-overlay" class:open=move || open.get()>
			<canvas
				node_ref=canvas_ref
				class="note-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:dblclick=on_dblclick
				on:wheel=on_wheel
				on:touchstart=on_touchstart
				on:touchmove=on_touchmove
				on:touchend=on_touchend
				on:touchcancel=on_touchcancel
				style="display: block; cursor: grab;"
			/>
			<button class="note-graph-close" title="Close (Esc)" on:click=move |_| open.set(false)>
				"×"
			</button>
		</div>
	}
}
