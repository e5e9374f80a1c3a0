use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_query_map;
use log::{debug, error};

use crate::components::uop_graph::{GraphData, NodeInfo, UOpGraphCanvas};
use crate::viewer::{FetchRequest, LoadStatus, Viewer, ViewerConfig, fetch_graph};

/// Details of the uop under the pointer.
#[component]
fn NodeDetails(node: NodeInfo) -> impl IntoView {
	let swatch = format!("background: {};", node.color);
	view! {
		<dl class="node-details">
			<dt>"id"</dt>
			<dd>{node.id}</dd>
			<dt>"op"</dt>
			<dd>
				<span class="swatch" style=swatch></span>
				{node.label.unwrap_or_default()}
			</dd>
			<dt>"dtype"</dt>
			<dd>{node.dtype.unwrap_or_default()}</dd>
			<dt>"arg"</dt>
			<dd>{node.arg.unwrap_or_default()}</dd>
		</dl>
	}
}

/// Step-through uop graph viewer. `?step=N` picks the first step.
#[component]
pub fn Home() -> impl IntoView {
	let query = use_query_map();
	let step = query.with_untracked(|q| q.get("step"));
	let viewer = StoredValue::new(Viewer::new(
		ViewerConfig::default().with_step_param(step.as_deref()),
	));

	let graph = RwSignal::new(GraphData::default());
	let status = RwSignal::new(LoadStatus::Loading(viewer.with_value(Viewer::cursor)));
	let hovered = RwSignal::new(None::<NodeInfo>);

	let run = move |req: FetchRequest| {
		status.set(LoadStatus::Loading(req.cursor));
		spawn_local(async move {
			let result = fetch_graph(&req.url).await;
			if !viewer.with_value(|v| v.is_current(req.ticket)) {
				debug!(
					"discarding stale result for step {} (#{})",
					req.cursor,
					req.ticket.generation()
				);
				return;
			}
			match result {
				Ok(response) => {
					let data = response.into_graph_data();
					status.set(LoadStatus::Ready {
						cursor: req.cursor,
						nodes: data.nodes.len(),
						edges: data.links.len(),
					});
					graph.set(data);
				}
				Err(e) => {
					error!("step {}: {e}", req.cursor);
					status.set(LoadStatus::Failed {
						cursor: req.cursor,
						message: e.to_string(),
					});
				}
			}
		});
	};

	if let Some(req) = viewer.try_update_value(|v| v.load()) {
		run(req);
	}

	let keys = window_event_listener(ev::keydown, move |ev| {
		if let Some(req) = viewer.try_update_value(|v| v.handle_key(&ev.key())).flatten() {
			run(req);
		}
	});
	on_cleanup(move || keys.remove());

	view! {
		<div class="fullscreen-graph">
			<UOpGraphCanvas
				data=graph
				fullscreen=true
				on_hover=Callback::new(move |info: Option<NodeInfo>| hovered.set(info))
			/>
			<div class="graph-overlay">
				<h1>"uop graph"</h1>
				<p class="status" class:error=move || status.with(LoadStatus::is_error)>
					{move || status.with(LoadStatus::describe)}
				</p>
				<p class="subtitle">
					"← / → to step. Drag nodes to reposition. Scroll to zoom. Drag background to pan."
				</p>
			</div>
			{move || hovered.get().map(|node| view! { <NodeDetails node=node /> })}
		</div>
	}
}
