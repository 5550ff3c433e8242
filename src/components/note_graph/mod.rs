//! Force-directed graph of the garden's notes and the links between them.

mod component;
pub mod config;
mod error;
mod frame;
pub mod graph;
pub mod interaction;
mod render;
pub mod session;
pub mod simulation;
pub mod state;
pub mod types;

pub use component::NoteGraphOverlay;
pub use config::GraphConfig;
pub use error::GraphError;
pub use types::{NoteEntry, NoteIndex, Stage};
