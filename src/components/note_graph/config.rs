//! Variant configuration. The windowed and terminal garden views share one
//! component and differ only in these knobs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::simulation::SimulationParams;
use super::types::Stage;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeStyle {
	Straight,
	#[default]
	Curved,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryAnimation {
	/// Nodes appear already spread around the layout circle.
	CircularSpread,
	/// Nodes fly out from the center to the layout circle.
	#[default]
	Burst,
}

/// CSS colors used by the renderer.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Palette {
	pub seedling: String,
	pub growing: String,
	pub evergreen: String,
	pub unknown: String,
	pub background: String,
	pub edge: String,
	/// Ring around the note currently open in the reader.
	pub accent: String,
	pub label: String,
}

impl Palette {
	pub fn terminal() -> Self {
		Self {
			seedling: "#7fff7f".into(),
			growing: "#ffd866".into(),
			evergreen: "#33ccff".into(),
			unknown: "#8a8a8a".into(),
			background: "#0a0f0a".into(),
			edge: "#4f7f4f".into(),
			accent: "#ff6ac1".into(),
			label: "#d0ffd0".into(),
		}
	}

	pub fn windowed() -> Self {
		Self {
			seedling: "#8bc34a".into(),
			growing: "#ffb300".into(),
			evergreen: "#2e7d32".into(),
			unknown: "#9e9e9e".into(),
			background: "#1a1a2e".into(),
			edge: "#64b4ff".into(),
			accent: "#ff4081".into(),
			label: "#ffffff".into(),
		}
	}

	pub fn stage_color(&self, stage: Stage) -> &str {
		match stage {
			Stage::Seedling => &self.seedling,
			Stage::Growing => &self.growing,
			Stage::Evergreen => &self.evergreen,
			Stage::Unknown => &self.unknown,
		}
	}
}

impl Default for Palette {
	fn default() -> Self {
		Self::terminal()
	}
}

/// Named starting point for a JSON config.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
	Windowed,
	#[default]
	Terminal,
}

impl Preset {
	pub fn config(self) -> GraphConfig {
		match self {
			Preset::Windowed => GraphConfig::windowed(),
			Preset::Terminal => GraphConfig::terminal(),
		}
	}
}

/// Full graph view configuration. Every field is optional in JSON.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GraphConfig {
	pub edge_style: EdgeStyle,
	pub entry_animation: EntryAnimation,
	pub palette: Palette,
	pub supports_pinch_zoom: bool,
	pub simulation: SimulationParams,
}

impl GraphConfig {
	/// The note browser embedded in a desktop window.
	pub fn windowed() -> Self {
		Self {
			edge_style: EdgeStyle::Straight,
			entry_animation: EntryAnimation::CircularSpread,
			palette: Palette::windowed(),
			supports_pinch_zoom: false,
			simulation: SimulationParams::default(),
		}
	}

	/// The standalone terminal-styled garden.
	pub fn terminal() -> Self {
		Self {
			edge_style: EdgeStyle::Curved,
			entry_animation: EntryAnimation::Burst,
			palette: Palette::terminal(),
			supports_pinch_zoom: true,
			simulation: SimulationParams::default(),
		}
	}

	/// Parse a partial config. An optional `"preset"` key picks the config the
	/// remaining keys are laid over; it defaults to the terminal preset.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		let mut overrides: Value = serde_json::from_str(json)?;
		let preset = match overrides.as_object_mut().and_then(|o| o.remove("preset")) {
			Some(preset) => serde_json::from_value(preset)?,
			None => Preset::default(),
		};
		let mut merged = serde_json::to_value(preset.config())?;
		merge(&mut merged, overrides);
		serde_json::from_value(merged)
	}
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self::terminal()
	}
}

/// Lay `overrides` over `base`, object by object.
fn merge(base: &mut Value, overrides: Value) {
	match (base, overrides) {
		(Value::Object(base), Value::Object(overrides)) => {
			for (key, value) in overrides {
				merge(base.entry(key).or_insert(Value::Null), value);
			}
		}
		(base, overrides) => *base = overrides,
	}
}
