//! Browser timing: the `requestAnimationFrame` loop and `setTimeout` helpers.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use super::error::GraphError;

const DEFAULT_DT: f64 = 1.0 / 60.0;
/// Longer gaps (a backgrounded tab) are treated as this many seconds.
const MAX_DT: f64 = 0.1;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// An owned animation loop. `stop` cancels the pending frame and releases the
/// callback; `start` replaces any loop already running.
#[derive(Default)]
pub struct FrameLoop {
	callback: FrameCallback,
	handle: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
	/// Call `on_frame(dt_seconds)` every frame until it returns `false`.
	pub fn start(
		&mut self,
		mut on_frame: impl FnMut(f64) -> bool + 'static,
	) -> Result<(), GraphError> {
		self.stop();
		let window = web_sys::window().ok_or(GraphError::NoWindow)?;

		let (callback, handle) = (self.callback.clone(), self.handle.clone());
		let last = Cell::new(None::<f64>);
		*self.callback.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
			handle.set(None);
			let dt = last
				.replace(Some(timestamp))
				.map_or(DEFAULT_DT, |prev| ((timestamp - prev) / 1000.0).clamp(0.0, MAX_DT));
			if !on_frame(dt) {
				return;
			}
			if let Some(ref cb) = *callback.borrow() {
				if let Some(window) = web_sys::window() {
					if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
						handle.set(Some(id));
					}
				}
			}
		}));

		if let Some(ref cb) = *self.callback.borrow() {
			let id = window.request_animation_frame(cb.as_ref().unchecked_ref())?;
			self.handle.set(Some(id));
		}
		Ok(())
	}

	pub fn stop(&mut self) {
		if let Some(id) = self.handle.take() {
			if let Some(window) = web_sys::window() {
				let _ = window.cancel_animation_frame(id);
			}
		}
		self.callback.borrow_mut().take();
	}
}

/// Run `f` once after `ms` milliseconds. Returns the timeout handle.
pub fn set_timeout(f: impl FnOnce() + 'static, ms: i32) -> Result<i32, GraphError> {
	let window = web_sys::window().ok_or(GraphError::NoWindow)?;
	let cb: js_sys::Function = Closure::once_into_js(f).unchecked_into();
	Ok(window.set_timeout_with_callback_and_timeout_and_arguments_0(&cb, ms)?)
}

/// A callback that fires `delay_ms` after the last `trigger`.
pub struct Debounced {
	handle: Rc<Cell<Option<i32>>>,
	callback: Closure<dyn FnMut()>,
	delay_ms: i32,
}

impl Debounced {
	pub fn new(delay_ms: i32, mut f: impl FnMut() + 'static) -> Self {
		let handle = Rc::new(Cell::new(None));
		let fired = handle.clone();
		Self {
			handle,
			callback: Closure::new(move || {
				fired.set(None);
				f();
			}),
			delay_ms,
		}
	}

	pub fn trigger(&self) -> Result<(), GraphError> {
		let window = web_sys::window().ok_or(GraphError::NoWindow)?;
		if let Some(id) = self.handle.take() {
			window.clear_timeout_with_handle(id);
		}
		let id = window.set_timeout_with_callback_and_timeout_and_arguments_0(
			self.callback.as_ref().unchecked_ref(),
			self.delay_ms,
		)?;
		self.handle.set(Some(id));
		Ok(())
	}
}
