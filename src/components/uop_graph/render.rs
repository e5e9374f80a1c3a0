use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{BOX_HEIGHT, NODE_RADIUS, NodeInfo, UOpGraphState};

const BACKGROUND: &str = "#16161d";

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &UOpGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

/// Parent -> child arrows with a slow dash animation toward the child.
fn draw_edges(state: &UOpGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let (line_width, dash, gap, arrow) = (1.2 / k, 6.0 / k, 4.0 / k, 7.0 / k);
	let offset = -(state.flow_time * 20.0) % (dash + gap);
	let t = ease_out_cubic(state.hover.highlight_t);
	let stop = NODE_RADIUS + BOX_HEIGHT / 2.0;

	state.graph.visit_edges(|parent, child, _| {
		let (x1, y1) = (parent.x() as f64, parent.y() as f64);
		let (x2, y2) = (child.x() as f64, child.y() as f64);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let len = dx.hypot(dy);
		if len <= stop * 2.0 {
			return;
		}

		let lit = state.is_highlighted(parent.index()) && state.is_highlighted(child.index());
		let alpha = if lit { 0.55 + 0.4 * t } else { 0.55 - 0.4 * t };
		let stroke = format!("rgba(180, 190, 210, {alpha})");

		let (ux, uy) = (dx / len, dy / len);
		let (tip_x, tip_y) = (x2 - ux * stop, y2 - uy * stop);

		ctx.set_stroke_style_str(&stroke);
		ctx.set_line_width(if lit { line_width * (1.0 + 0.5 * t) } else { line_width });
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(dash),
			&JsValue::from_f64(gap),
		));
		ctx.set_line_dash_offset(offset);
		ctx.begin_path();
		ctx.move_to(x1 + ux * stop, y1 + uy * stop);
		ctx.line_to(tip_x - ux * arrow, tip_y - uy * arrow);
		ctx.stroke();

		let _ = ctx.set_line_dash(&js_sys::Array::new());
		let (back_x, back_y) = (tip_x - ux * arrow, tip_y - uy * arrow);
		let (px, py) = (-uy * arrow * 0.5, ux * arrow * 0.5);
		ctx.set_fill_style_str(&stroke);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	});
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

/// Nodes are label boxes filled with the uop color. Dimmed nodes are drawn
/// first so the highlighted neighbourhood sits on top.
fn draw_nodes(state: &UOpGraphState, ctx: &CanvasRenderingContext2d) {
	let highlight = state.has_active_highlight();
	let t = ease_out_cubic(state.hover.highlight_t);
	let k = state.transform.k;
	ctx.set_font("11px monospace");
	ctx.set_text_baseline("middle");
	ctx.set_text_align("center");

	for pass_lit in [false, true] {
		state.graph.visit_nodes(|node| {
			let idx = node.index();
			let lit = highlight && state.is_highlighted(idx);
			if lit != pass_lit {
				return;
			}
			let alpha = if highlight && !lit { 1.0 - 0.7 * t } else { 1.0 };
			let outline = if lit && state.is_hovered(idx) {
				Some(format!("rgba(255, 255, 255, {})", 0.4 + 0.6 * t))
			} else {
				None
			};
			draw_box(
				ctx,
				&node.data.user_data,
				node.x() as f64,
				node.y() as f64,
				alpha,
				outline.as_deref(),
				k,
			);
		});
	}
	ctx.set_global_alpha(1.0);
}

fn draw_box(
	ctx: &CanvasRenderingContext2d,
	info: &NodeInfo,
	x: f64,
	y: f64,
	alpha: f64,
	outline: Option<&str>,
	k: f64,
) {
	let label = info.caption();
	let (w, h) = info.box_size();
	let (left, top) = (x - w / 2.0, y - h / 2.0);

	ctx.set_global_alpha(alpha);
	ctx.begin_path();
	ctx.rect(left, top, w, h);
	ctx.set_fill_style_str(&info.color);
	ctx.fill();
	ctx.set_stroke_style_str(outline.unwrap_or("rgba(0, 0, 0, 0.6)"));
	ctx.set_line_width(if outline.is_some() { 2.0 / k } else { 1.0 / k });
	ctx.stroke();

	ctx.set_fill_style_str("#111");
	let _ = ctx.fill_text(label, x, y);
}
