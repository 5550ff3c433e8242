//! Reusable view components.

pub mod note_graph;
