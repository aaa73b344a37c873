use std::collections::BTreeSet;
use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{CanvasSession, NODE_RADIUS};
use crate::editor::{EdgeId, MenuTarget};

pub fn render(session: &CanvasSession, ctx: &CanvasRenderingContext2d) {
	let host = &session.host;
	ctx.set_fill_style_str("#1a1a2e");
	ctx.fill_rect(0.0, 0.0, host.width, host.height);
	draw_edges(session, ctx);
	draw_nodes(session, ctx);
}

fn draw_edges(session: &CanvasSession, ctx: &CanvasRenderingContext2d) {
	let (host, editor) = (&session.host, &session.editor);
	// Edges following the dragged node are drawn dashed.
	let moving: BTreeSet<EdgeId> = editor
		.dragged()
		.map(|n| editor.store().incident_edges(n).collect())
		.unwrap_or_default();
	let selected = match editor.menu().map(|m| m.target) {
		Some(MenuTarget::Edge(edge)) => Some(edge),
		_ => None,
	};

	for line in host.scene.lines() {
		let mut points = line.coordinates.iter().map(|c| host.view.to_screen(*c));
		let Some(first) = points.next() else {
			continue;
		};

		let (color, width) = if selected == Some(line.edge) {
			("rgba(255, 200, 80, 0.95)", 3.0)
		} else {
			("rgba(100, 180, 255, 0.8)", 2.0)
		};
		ctx.set_stroke_style_str(color);
		ctx.set_line_width(width);
		if moving.contains(&line.edge) {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(6.0),
				&JsValue::from_f64(4.0),
			));
		}

		ctx.begin_path();
		ctx.move_to(first.x, first.y);
		for p in points {
			ctx.line_to(p.x, p.y);
		}
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());
	}
}

fn draw_nodes(session: &CanvasSession, ctx: &CanvasRenderingContext2d) {
	let (host, editor) = (&session.host, &session.editor);
	let (hovered, dragged) = (editor.hovered(), editor.dragged());
	let selected = match editor.menu().map(|m| m.target) {
		Some(MenuTarget::Node(node)) => Some(node),
		_ => None,
	};

	for point in host.scene.points() {
		let s = host.view.to_screen(point.position);
		let emphasised =
			hovered == Some(point.node) || dragged == Some(point.node) || selected == Some(point.node);
		let radius = if emphasised { NODE_RADIUS * 1.6 } else { NODE_RADIUS };

		ctx.begin_path();
		let _ = ctx.arc(s.x, s.y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(if dragged == Some(point.node) {
			"#ffd166"
		} else {
			"#e0e6f0"
		});
		ctx.fill();

		if emphasised {
			ctx.begin_path();
			let _ = ctx.arc(s.x, s.y, radius + 2.0, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str("rgba(255, 255, 255, 0.7)");
			ctx.set_line_width(1.5);
			ctx.stroke();
		}
	}
}
