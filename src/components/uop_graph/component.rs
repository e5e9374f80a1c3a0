use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::{NodeInfo, UOpGraphState};
use super::types::GraphData;

type Shared<T> = Rc<RefCell<Option<T>>>;

fn window() -> Result<Window, JsValue> {
	web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

fn inner_size(win: &Window) -> Option<(f64, f64)> {
	Some((
		win.inner_width().ok()?.as_f64()?,
		win.inner_height().ok()?.as_f64()?,
	))
}

/// Pointer position relative to the canvas.
fn pointer(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Size the canvas, hook window resizes and start the frame loop. Runs once
/// per mounted canvas; the graph itself is swapped in by the data effect.
fn start(
	canvas: &HtmlCanvasElement,
	fullscreen: bool,
	size: (Option<f64>, Option<f64>),
	state: &Shared<UOpGraphState>,
	animate: &Shared<Closure<dyn FnMut()>>,
	resize_cb: &Shared<Closure<dyn FnMut()>>,
) -> Result<(), JsValue> {
	let win = window()?;
	let (w, h) = if fullscreen {
		inner_size(&win).unwrap_or((800.0, 600.0))
	} else {
		let parent = canvas.parent_element();
		(
			size.0.unwrap_or_else(|| {
				parent.as_ref().map(|p| p.client_width() as f64).unwrap_or(800.0)
			}),
			size.1.unwrap_or_else(|| {
				parent.as_ref().map(|p| p.client_height() as f64).unwrap_or(600.0)
			}),
		)
	};
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);

	let ctx: CanvasRenderingContext2d = canvas
		.get_context("2d")?
		.ok_or_else(|| JsValue::from_str("2d context unavailable"))?
		.dyn_into()?;

	if fullscreen {
		let (state_resize, canvas_resize) = (state.clone(), canvas.clone());
		*resize_cb.borrow_mut() = Some(Closure::new(move || {
			let Some((nw, nh)) = web_sys::window().as_ref().and_then(inner_size) else {
				return;
			};
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb.borrow() {
			win.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref())?;
		}
	}

	let (state_anim, animate_inner) = (state.clone(), animate.clone());
	*animate.borrow_mut() = Some(Closure::new(move || {
		if let Some(ref mut s) = *state_anim.borrow_mut() {
			if s.animation_running {
				s.tick(0.016);
			}
			render::render(s, &ctx);
		}
		if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
			let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	}));
	if let Some(ref cb) = *animate.borrow() {
		win.request_animation_frame(cb.as_ref().unchecked_ref())?;
	}
	Ok(())
}

/// Force-directed canvas for a uop graph. Rebuilds the simulation whenever
/// `data` changes; pan and zoom survive the rebuild.
#[component]
pub fn UOpGraphCanvas(
	/// Graph to draw.
	#[prop(into)]
	data: Signal<GraphData>,
	/// Fill the window and follow its resizes.
	#[prop(default = false)]
	fullscreen: bool,
	/// Fixed width; defaults to the parent's.
	#[prop(default = None)]
	width: Option<f64>,
	/// Fixed height; defaults to the parent's.
	#[prop(default = None)]
	height: Option<f64>,
	/// Called with the hovered node, or `None` when the pointer leaves it.
	#[prop(optional, into)]
	on_hover: Option<Callback<Option<NodeInfo>>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Shared<UOpGraphState> = Rc::new(RefCell::new(None));
	let animate: Shared<Closure<dyn FnMut()>> = Rc::new(RefCell::new(None));
	let resize_cb: Shared<Closure<dyn FnMut()>> = Rc::new(RefCell::new(None));
	let started = Rc::new(Cell::new(false));
	let notify = move |info: Option<NodeInfo>| {
		if let Some(cb) = on_hover {
			cb.run(info);
		}
	};

	let state_fx = state.clone();
	Effect::new(move |_| {
		let graph = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		if !started.get() {
			match start(&canvas, fullscreen, (width, height), &state_fx, &animate, &resize_cb) {
				Ok(()) => started.set(true),
				Err(e) => {
					error!("failed to start graph canvas: {e:?}");
					return;
				}
			}
		}

		let (w, h) = (canvas.width() as f64, canvas.height() as f64);
		let mut slot = state_fx.borrow_mut();
		let next = UOpGraphState::rebuild(slot.as_ref(), &graph, w, h);
		debug!(
			"graph rebuilt: {} nodes, {} edges",
			next.node_count(),
			next.edge_count()
		);
		*slot = Some(next);
		drop(slot);
		notify(None);
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			if let Some(idx) = s.node_at_position(x, y) {
				let mut start = (0.0, 0.0);
				s.graph.visit_nodes(|node| {
					if node.index() == idx {
						start = (node.x(), node.y());
					}
				});
				s.drag.active = true;
				s.drag.node_idx = Some(idx);
				s.drag.start_x = x;
				s.drag.start_y = y;
				(s.drag.node_start_x, s.drag.node_start_y) = start;
			} else {
				s.pan.active = true;
				s.pan.start_x = x;
				s.pan.start_y = y;
				s.pan.transform_start_x = s.transform.x;
				s.pan.transform_start_y = s.transform.y;
			}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		let hovered = {
			let mut slot = state_mm.borrow_mut();
			let Some(s) = slot.as_mut() else {
				return;
			};

			let mut changed = None;
			if !s.drag.active {
				let idx = s.node_at_position(x, y);
				if s.set_hover(idx) {
					changed = Some(s.hovered_info());
				}
			}

			if s.drag.active {
				if let Some(idx) = s.drag.node_idx {
					let (dx, dy) = (
						(x - s.drag.start_x) / s.transform.k,
						(y - s.drag.start_y) / s.transform.k,
					);
					let (nx, ny) = (
						s.drag.node_start_x + dx as f32,
						s.drag.node_start_y + dy as f32,
					);
					s.graph.visit_nodes_mut(|node| {
						if node.index() == idx {
							node.data.x = nx;
							node.data.y = ny;
							node.data.is_anchor = true;
						}
					});
				}
			} else if s.pan.active {
				s.transform.x = s.pan.transform_start_x + (x - s.pan.start_x);
				s.transform.y = s.pan.transform_start_y + (y - s.pan.start_y);
			}
			changed
		};
		if let Some(info) = hovered {
			notify(info);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			// a dragged node stays pinned where it was dropped
			s.drag.active = false;
			s.drag.node_idx = None;
			s.pan.active = false;
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		let changed = match *state_ml.borrow_mut() {
			Some(ref mut s) => {
				s.drag.active = false;
				s.drag.node_idx = None;
				s.pan.active = false;
				s.set_hover(None)
			}
			None => false,
		};
		if changed {
			notify(None);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			s.zoom_at(x, y, factor);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="uop-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
