//! Digital garden client: note pages plus the link graph overlay.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::hooks::use_navigate;
use leptos_router::path;
use log::{Level, debug, info, warn};
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

// Modules
mod components;
mod pages;

use crate::components::note_graph::{GraphConfig, GraphError, NoteGraphOverlay, NoteIndex};
// Top-Level pages
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;
use crate::pages::note::NotePage;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Shared garden state, provided as context to every page.
#[derive(Clone, Copy)]
pub(crate) struct Garden {
	/// Note index embedded in the page by the garden build.
	pub index: Signal<NoteIndex>,
	/// Whether the graph overlay is showing.
	pub graph_open: RwSignal<bool>,
	/// Note currently open in the reader.
	pub current_note: RwSignal<Option<String>>,
}

impl Garden {
	/// Nothing open yet. The index is stored once and only ever borrowed.
	fn new(index: NoteIndex) -> Self {
		Self {
			index: Signal::stored(index),
			graph_open: RwSignal::new(false),
			current_note: RwSignal::new(None),
		}
	}
}

/// Route to a note's page.
pub fn note_href(id: &str) -> String {
	format!("/note/{}", id.trim_start_matches('/'))
}

fn script_text(id: &'static str) -> Result<String, GraphError> {
	let document = web_sys::window()
		.ok_or(GraphError::NoWindow)?
		.document()
		.ok_or(GraphError::MissingElement("document"))?;
	let script: HtmlScriptElement = document
		.get_element_by_id(id)
		.ok_or(GraphError::MissingElement(id))?
		.dyn_into()
		.map_err(|_| GraphError::MissingElement(id))?;
	Ok(script.text()?)
}

/// Load the note index from a script element with id="note-index".
fn load_note_index() -> NoteIndex {
	match script_text("note-index").and_then(|json| NoteIndex::from_json(&json)) {
		Ok(index) => {
			info!("garden: loaded {} notes, {} links", index.len(), index.link_count());
			index
		}
		Err(e) => {
			warn!("garden: no usable note index: {}", e);
			NoteIndex::default()
		}
	}
}

/// Load graph settings from an optional script element with id="graph-config".
fn load_graph_config() -> GraphConfig {
	let Ok(json) = script_text("graph-config") else {
		debug!("garden: no graph config, using defaults");
		return GraphConfig::default();
	};
	GraphConfig::from_json(&json).unwrap_or_else(|e| {
		warn!("garden: invalid graph config, using defaults: {}", e);
		GraphConfig::default()
	})
}

/// The graph overlay, wired to the router.
#[component]
fn GardenGraph(config: GraphConfig) -> impl IntoView {
	let garden = expect_context::<Garden>();
	let navigate = use_navigate();

	view! {
		<NoteGraphOverlay
			open=garden.graph_open
			index=garden.index
			current_note=garden.current_note
			config=config
			on_navigate=move |id: String| navigate(&note_href(&id), Default::default())
		/>
	}
}

/// An app router which renders the garden pages and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	provide_context(Garden::new(load_note_index()));
	let config = load_graph_config();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		// sets the document title
		<Title text="Digital Garden" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<main>
				<Routes fallback=|| view! { <NotFound /> }>
					<Route path=path!("/") view=Home />
					<Route path=path!("/note/*id") view=NotePage />
				</Routes>
			</main>
			<GardenGraph config=config />
		</Router>
	}
}
