//! The note index the graph is built from.
//!
//! The index is produced offline by the garden build step and embedded in the
//! page as a JSON object mapping note id to note metadata. Parsing is lenient:
//! a missing or wrongly typed field takes its default instead of failing the
//! whole index.

use std::collections::HashMap;
use std::fmt;

use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use super::error::GraphError;

/// Content maturity of a note. Only used for color coding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
	Seedling,
	Growing,
	Evergreen,
	#[default]
	#[serde(other)]
	Unknown,
}

impl Stage {
	/// Human-readable name, as shown on the note page.
	pub fn label(self) -> &'static str {
		match self {
			Stage::Seedling => "seedling",
			Stage::Growing => "growing",
			Stage::Evergreen => "evergreen",
			Stage::Unknown => "unsorted",
		}
	}
}

/// Metadata for one note.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct NoteEntry {
	#[serde(default, deserialize_with = "lenient")]
	pub title: String,
	#[serde(default, deserialize_with = "lenient")]
	pub stage: Stage,
	#[serde(default, deserialize_with = "lenient")]
	pub tags: Vec<String>,
	/// Ids of notes linking to this one.
	#[serde(default, deserialize_with = "lenient")]
	pub backlinks: Vec<String>,
	/// Ids this note links to. May name notes that do not exist.
	#[serde(default, deserialize_with = "lenient")]
	pub links: Vec<String>,
}

impl NoteEntry {
	/// `title`, or `id` when the note has none.
	pub fn title_or<'a>(&'a self, id: &'a str) -> &'a str {
		if self.title.is_empty() { id } else { &self.title }
	}
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: DeserializeOwned + Default,
{
	let value = serde_json::Value::deserialize(deserializer)?;
	Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Read-only, ordered directory of notes keyed by id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NoteIndex {
	entries: Vec<(String, NoteEntry)>,
	/// Id to position in `entries`.
	positions: HashMap<String, usize>,
}

impl NoteIndex {
	pub fn new() -> Self {
		Self::default()
	}

	/// Parse the JSON object emitted by the garden build.
	pub fn from_json(json: &str) -> Result<Self, GraphError> {
		Ok(serde_json::from_str(json)?)
	}

	/// Add a note, replacing any earlier entry with the same id in place.
	pub fn insert(&mut self, id: impl Into<String>, entry: NoteEntry) {
		let id = id.into();
		match self.positions.get(&id) {
			Some(&pos) => self.entries[pos].1 = entry,
			None => {
				self.positions.insert(id.clone(), self.entries.len());
				self.entries.push((id, entry));
			}
		}
	}

	pub fn get(&self, id: &str) -> Option<&NoteEntry> {
		self.positions.get(id).map(|&pos| &self.entries[pos].1)
	}

	/// Display title for a note, falling back to its id.
	pub fn title_of<'a>(&'a self, id: &'a str) -> &'a str {
		self.get(id).map_or(id, |entry| entry.title_or(id))
	}

	/// Notes in index order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &NoteEntry)> {
		self.entries.iter().map(|(id, entry)| (id.as_str(), entry))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Total forward links, resolved or not.
	pub fn link_count(&self) -> usize {
		self.entries.iter().map(|(_, entry)| entry.links.len()).sum()
	}
}

impl<'de> Deserialize<'de> for NoteIndex {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		struct IndexVisitor;

		impl<'de> Visitor<'de> for IndexVisitor {
			type Value = NoteIndex;

			fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
				f.write_str("an object mapping note ids to note metadata")
			}

			fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<NoteIndex, A::Error> {
				let mut index = NoteIndex::new();
				while let Some((id, entry)) = map.next_entry::<String, Lenient<NoteEntry>>()? {
					index.insert(id, entry.0);
				}
				Ok(index)
			}
		}

		deserializer.deserialize_map(IndexVisitor)
	}
}

// A note whose value is not an object at all still gets a node.
struct Lenient<T>(T);

impl<'de, T: DeserializeOwned + Default> Deserialize<'de> for Lenient<T> {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		lenient(deserializer).map(Lenient)
	}
}
