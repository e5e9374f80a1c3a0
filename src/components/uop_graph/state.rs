use std::collections::{HashMap, HashSet, VecDeque};

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::types::{GraphData, GraphNode};
use crate::viewer::response::DEFAULT_COLOR;

pub const NODE_RADIUS: f64 = 6.0;
pub const BOX_HEIGHT: f64 = 18.0;
pub const BOX_PAD: f64 = 6.0;
/// Advance of one glyph in the 11px monospace label font.
pub const CHAR_WIDTH: f64 = 6.6;
const LAYER_GAP: f64 = 70.0;
const SIBLING_GAP: f64 = 60.0;

/// Per-node payload carried through the simulation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeInfo {
	/// Node id.
	pub id: String,
	/// Caption, if any.
	pub label: Option<String>,
	/// Resolved fill color.
	pub color: String,
	/// Result dtype.
	pub dtype: Option<String>,
	/// Op argument.
	pub arg: Option<String>,
}

impl From<&GraphNode> for NodeInfo {
	fn from(node: &GraphNode) -> Self {
		Self {
			id: node.id.clone(),
			label: node.label.clone(),
			color: node
				.color
				.clone()
				.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
			dtype: node.dtype.clone(),
			arg: node.arg.clone(),
		}
	}
}

impl NodeInfo {
	/// Text drawn in the node box; the id when there is no label.
	pub fn caption(&self) -> &str {
		self.label.as_deref().unwrap_or(&self.id)
	}

	/// World-space size of the label box, shared by drawing and hit testing.
	pub fn box_size(&self) -> (f64, f64) {
		(
			self.caption().chars().count() as f64 * CHAR_WIDTH + BOX_PAD * 2.0,
			BOX_HEIGHT,
		)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	delay_t: f64,
}

pub struct UOpGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub flow_time: f64,
	edges: Vec<(DefaultNodeIdx, DefaultNodeIdx)>,
	info: HashMap<DefaultNodeIdx, NodeInfo>,
}

/// Longest distance from a root for every node, following parent -> child
/// links. Walks the graph in topological order so deep chains need no stack;
/// nodes on or below a cycle never become ready and sit at depth 0.
pub fn layer_depths(data: &GraphData) -> HashMap<String, usize> {
	let mut depths: HashMap<&str, usize> = data.nodes.iter().map(|n| (n.id.as_str(), 0)).collect();
	let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
	let mut pending: HashMap<&str, usize> = HashMap::new();

	for link in &data.links {
		let (parent, child) = (link.source.as_str(), link.target.as_str());
		if !depths.contains_key(parent) || !depths.contains_key(child) {
			continue;
		}
		children.entry(parent).or_default().push(child);
		*pending.entry(child).or_default() += 1;
	}

	let mut ready: VecDeque<&str> = data
		.nodes
		.iter()
		.map(|n| n.id.as_str())
		.filter(|id| !pending.contains_key(id))
		.collect();
	let mut settled: HashMap<&str, usize> = HashMap::new();

	while let Some(id) = ready.pop_front() {
		let depth = depths[id];
		if settled.insert(id, depth).is_some() {
			continue;
		}
		for &child in children.get(id).into_iter().flatten() {
			let d = depths.entry(child).or_default();
			*d = (*d).max(depth + 1);
			if let Some(left) = pending.get_mut(child).filter(|left| **left > 0) {
				*left -= 1;
				if *left == 0 {
					ready.push_back(child);
				}
			}
		}
	}

	depths
		.into_keys()
		.map(|id| (id.to_string(), settled.get(id).copied().unwrap_or(0)))
		.collect()
}

impl UOpGraphState {
	pub fn new(data: &GraphData, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut id_to_idx = HashMap::new();
		let mut info = HashMap::new();
		let mut edges = Vec::new();

		// Seed positions layer by layer so the simulation starts top-down.
		let depths = layer_depths(data);
		let max_depth = depths.values().copied().max().unwrap_or(0);
		let mut layer_sizes: HashMap<usize, usize> = HashMap::new();
		for d in depths.values() {
			*layer_sizes.entry(*d).or_default() += 1;
		}
		let mut layer_fill: HashMap<usize, usize> = HashMap::new();

		for node in &data.nodes {
			let depth = depths.get(&node.id).copied().unwrap_or(0);
			let slot = layer_fill.entry(depth).or_default();
			let row = layer_sizes.get(&depth).copied().unwrap_or(1) as f64;
			let (x, y) = (
				((*slot as f64) - (row - 1.0) / 2.0) * SIBLING_GAP,
				((depth as f64) - (max_depth as f64) / 2.0) * LAYER_GAP,
			);
			*slot += 1;

			let node_info = NodeInfo::from(node);
			let idx = graph.add_node(NodeData {
				x: x as f32,
				y: y as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: node_info.clone(),
			});
			id_to_idx.insert(node.id.clone(), idx);
			info.insert(idx, node_info);
		}

		for link in &data.links {
			if let (Some(&src), Some(&tgt)) =
				(id_to_idx.get(&link.source), id_to_idx.get(&link.target))
			{
				graph.add_edge(src, tgt, EdgeData::default());
				edges.push((src, tgt));
			}
		}

		Self {
			graph,
			edges,
			info,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			animation_running: true,
			flow_time: 0.0,
		}
	}

	/// Rebuild for a new graph while keeping the user's pan and zoom.
	pub fn rebuild(previous: Option<&Self>, data: &GraphData, width: f64, height: f64) -> Self {
		let mut next = Self::new(data, width, height);
		if let Some(prev) = previous {
			next.transform = prev.transform.clone();
		}
		next
	}

	pub fn node_count(&self) -> usize {
		self.info.len()
	}

	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node whose label box contains the screen point.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (w, h) = node.data.user_data.box_size();
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			if dx.abs() <= w / 2.0 && dy.abs() <= h / 2.0 {
				found = Some(node.index());
			}
		});
		found
	}

	/// Returns true when the hovered node changed.
	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) -> bool {
		if self.hover.node == node {
			return false;
		}
		let was_hovering = self.hover.node.is_some();

		// Keep the old highlight around so it can fade out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for &(src, tgt) in &self.edges {
				if src == idx {
					self.hover.neighbors.insert(tgt);
				} else if tgt == idx {
					self.hover.neighbors.insert(src);
				}
			}
		}
		true
	}

	pub fn hovered_info(&self) -> Option<NodeInfo> {
		self.hover.node.and_then(|idx| self.info.get(&idx).cloned())
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.flow_time += dt as f64;

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Zoom about a screen point, clamped to 0.1..=10.
	pub fn zoom_at(&mut self, x: f64, y: f64, factor: f64) {
		let new_k = (self.transform.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}
}
