use thiserror::Error;

/// Reasons the graph view cannot attach to the page.
///
/// None of these are fatal: the component logs them and skips drawing.
#[derive(Debug, Error)]
pub enum GraphError {
	/// No global `window` (not running in a browser).
	#[error("no global window")]
	NoWindow,
	/// An expected DOM element has not been mounted yet.
	#[error("element `{0}` not found")]
	MissingElement(&'static str),
	/// The canvas refused to hand out a 2d context.
	#[error("2d canvas context unavailable")]
	NoContext,
	/// The embedded note index is not valid JSON.
	#[error("invalid note index: {0}")]
	InvalidIndex(#[from] serde_json::Error),
	/// A browser API call threw.
	#[error("browser call failed: {0}")]
	Js(String),
}

impl From<wasm_bindgen::JsValue> for GraphError {
	fn from(value: wasm_bindgen::JsValue) -> Self {
		GraphError::Js(format!("{value:?}"))
	}
}
