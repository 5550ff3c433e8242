use std::collections::HashSet;
use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::config::EdgeStyle;
use super::state::NoteGraphState;

/// Perpendicular control point offset, as a fraction of edge length.
const CURVE_BEND: f64 = 0.12;
const LABEL_SIZE: f64 = 11.0;
/// Unhovered nodes this large get a label when zoomed in enough.
const LABEL_MIN_RADIUS: f64 = 12.0;
const LABEL_MIN_SCALE: f64 = 0.8;
const PULSE_SPEED: f64 = 3.0;

pub fn render(state: &NoteGraphState, ctx: &CanvasRenderingContext2d) {
	let dpr = state.pixel_ratio;
	let _ = ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
	ctx.set_global_alpha(1.0);
	ctx.set_fill_style_str(&state.config.palette.background);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	if state.graph.is_empty() {
		return;
	}

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	let connected = state.connected_set();
	draw_edges(state, ctx);
	draw_nodes(state, ctx, &connected);
	ctx.restore();
}

fn draw_edges(state: &NoteGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let nodes = &state.graph.nodes;
	ctx.set_stroke_style_str(&state.config.palette.edge);

	for edge in &state.graph.edges {
		if edge.source == edge.target {
			continue;
		}
		let (a, b) = (&nodes[edge.source], &nodes[edge.target]);
		let touching = state.hover.is_some_and(|idx| edge.touches(idx));
		// Hovered edges stand out, the rest fade while anything is hovered.
		let (alpha, width) = match (state.hover, touching) {
			(_, true) => (0.9, 2.0),
			(Some(_), false) => (0.08, 1.0),
			(None, _) => (0.35, 1.0),
		};
		ctx.set_global_alpha(alpha);
		ctx.set_line_width(width / k);

		ctx.begin_path();
		ctx.move_to(a.x, a.y);
		match state.config.edge_style {
			EdgeStyle::Straight => ctx.line_to(b.x, b.y),
			EdgeStyle::Curved => {
				let (mx, my) = ((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
				let (dx, dy) = (b.x - a.x, b.y - a.y);
				ctx.quadratic_curve_to(mx - dy * CURVE_BEND, my + dx * CURVE_BEND, b.x, b.y);
			}
		}
		ctx.stroke();
	}
	ctx.set_global_alpha(1.0);
}

fn draw_nodes(state: &NoteGraphState, ctx: &CanvasRenderingContext2d, connected: &HashSet<usize>) {
	let k = state.transform.k;
	let palette = &state.config.palette;
	let pulse = 0.5 + 0.5 * (state.clock * PULSE_SPEED).sin();
	ctx.set_font(&format!("{}px monospace", LABEL_SIZE / k.max(0.5)));
	ctx.set_text_align("center");
	ctx.set_text_baseline("top");

	for (idx, node) in state.graph.nodes.iter().enumerate() {
		let (x, y) = (node.x, node.y);
		let radius = state.rendered_radius(idx);
		let color = palette.stage_color(node.stage);
		let faded = state.hover.is_some() && !connected.contains(&idx);
		let alpha = if faded { 0.25 } else { 1.0 };

		if let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.5, x, y, radius * 2.4) {
			let _ = gradient.add_color_stop(0.0, color);
			let _ = gradient.add_color_stop(1.0, "rgba(0, 0, 0, 0)");
			ctx.set_global_alpha(alpha * 0.35);
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius * 2.4, 0.0, 2.0 * PI);
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
			ctx.fill();
		}

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(color);
		ctx.fill();

		if node.hover_amount > 0.01 {
			ctx.set_global_alpha(node.hover_amount);
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 3.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str("white");
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		let is_current = state.current == Some(idx);
		if is_current {
			ctx.set_global_alpha(0.4 + 0.6 * pulse);
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + (4.0 + 3.0 * pulse) / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&palette.accent);
			ctx.set_line_width(2.0 / k);
			ctx.stroke();
		}

		let is_hovered = state.hover == Some(idx);
		let roomy = !faded && radius >= LABEL_MIN_RADIUS && k >= LABEL_MIN_SCALE;
		if is_hovered || is_current || roomy {
			ctx.set_global_alpha(if is_hovered || is_current { 1.0 } else { 0.75 });
			ctx.set_fill_style_str(&palette.label);
			let _ = ctx.fill_text(&node.title, x, y + radius + 4.0 / k);
		}
	}
	ctx.set_global_alpha(1.0);
}
