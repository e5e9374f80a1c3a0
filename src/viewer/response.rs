//! Wire model of the per-step graph document.
//!
//! The endpoint answers with a JSON object keyed by node id. Each value is a
//! fixed five element array `[label, dtype, parents, arg, color]`; only the
//! label, parents and color drive the drawing.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use log::warn;
use serde::Deserialize;
use serde_json::Value;

use crate::components::uop_graph::{GraphData, GraphLink, GraphNode};

/// Fill used when a node arrives without a color.
pub const DEFAULT_COLOR: &str = "#ffffff";

/// Node ids show up as strings for map keys but as bare integers inside
/// parent lists, so accept both and normalise to text.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
	Text(String),
	Number(serde_json::Number),
}

impl From<RawId> for String {
	fn from(id: RawId) -> Self {
		match id {
			RawId::Text(s) => s,
			RawId::Number(n) => n.to_string(),
		}
	}
}

#[derive(Deserialize)]
struct RawUOp(String, Value, Vec<RawId>, Value, String);

/// A single uop.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "RawUOp")]
pub struct UOpNode {
	/// Op name, drawn in the node box.
	pub label: String,
	/// Result dtype as sent by the server.
	pub dtype: Value,
	/// Source node ids, in operand order.
	pub parents: Vec<String>,
	/// Op argument as sent by the server.
	pub arg: Value,
	/// CSS fill color.
	pub color: String,
}

impl From<RawUOp> for UOpNode {
	fn from(RawUOp(label, dtype, parents, arg, color): RawUOp) -> Self {
		Self {
			label,
			dtype,
			parents: parents.into_iter().map(String::from).collect(),
			arg,
			color,
		}
	}
}

/// All uops reachable at one step, keyed by node id.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct GraphResponse {
	/// Node id to uop.
	pub nodes: BTreeMap<String, UOpNode>,
}

impl GraphResponse {
	/// Parse a response body.
	pub fn from_json(text: &str) -> serde_json::Result<Self> {
		serde_json::from_str(text)
	}

	/// Flatten into canvas data. Edges run parent -> child. A parent id with
	/// no matching key is dropped, and repeated `(parent, child)` pairs
	/// collapse into a single edge.
	pub fn into_graph_data(self) -> GraphData {
		let known: HashSet<&str> = self.nodes.keys().map(String::as_str).collect();
		let mut seen = BTreeSet::new();
		let mut links = Vec::new();
		let mut dangling = 0usize;

		for (id, node) in &self.nodes {
			for parent in &node.parents {
				if !known.contains(parent.as_str()) {
					dangling += 1;
					continue;
				}
				if seen.insert((parent.as_str(), id.as_str())) {
					links.push(GraphLink {
						source: parent.clone(),
						target: id.clone(),
					});
				}
			}
		}
		if dangling > 0 {
			warn!("dropped {dangling} edge(s) whose parent is not in the graph");
		}

		let nodes = self
			.nodes
			.into_iter()
			.map(|(id, node)| GraphNode {
				id,
				label: Some(node.label),
				color: Some(if node.color.is_empty() {
					DEFAULT_COLOR.to_string()
				} else {
					node.color
				}),
				dtype: Some(display_value(&node.dtype)),
				arg: Some(display_value(&node.arg)),
			})
			.collect();

		GraphData { nodes, links }
	}
}

/// Strings print bare, everything else as compact JSON.
fn display_value(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const TWO_NODES: &str = r#"{"a": ["A",0,[],0,"red"], "b": ["B",0,["a"],0,"blue"]}"#;

	#[test]
	fn two_nodes_one_edge() {
		let data = GraphResponse::from_json(TWO_NODES).unwrap().into_graph_data();

		assert_eq!(data.nodes.len(), 2);
		let a = &data.nodes[0];
		let b = &data.nodes[1];
		assert_eq!((a.id.as_str(), a.label.as_deref(), a.color.as_deref()), ("a", Some("A"), Some("red")));
		assert_eq!((b.id.as_str(), b.label.as_deref(), b.color.as_deref()), ("b", Some("B"), Some("blue")));

		assert_eq!(
			data.links,
			vec![GraphLink {
				source: "a".into(),
				target: "b".into()
			}]
		);
	}

	#[test]
	fn integer_parent_ids_match_string_keys() {
		let json = r##"{
			"140001": ["CONST", "dtypes.int", [], "1", "#e0e0e0"],
			"140002": ["ALU", "dtypes.int", [140001, 140001], "BinaryOps.ADD", "#ffffc0"]
		}"##;
		let data = GraphResponse::from_json(json).unwrap().into_graph_data();

		assert_eq!(data.links.len(), 1, "duplicate parent collapses to one edge");
		assert_eq!(data.links[0].source, "140001");
		assert_eq!(data.links[0].target, "140002");

		let alu = data.nodes.iter().find(|n| n.id == "140002").unwrap();
		assert_eq!(alu.dtype.as_deref(), Some("dtypes.int"));
		assert_eq!(alu.arg.as_deref(), Some("BinaryOps.ADD"));
	}

	#[test]
	fn dangling_parents_are_dropped() {
		let json = r#"{"b": ["B", null, ["a", "ghost"], null, "blue"], "a": ["A", null, [], null, "red"]}"#;
		let data = GraphResponse::from_json(json).unwrap().into_graph_data();

		assert_eq!(data.nodes.len(), 2);
		assert_eq!(data.links.len(), 1);
		assert_eq!(data.links[0].source, "a");
	}

	#[test]
	fn empty_color_falls_back_to_white() {
		let data = GraphResponse::from_json(r#"{"x": ["X", 0, [], 0, ""]}"#)
			.unwrap()
			.into_graph_data();
		assert_eq!(data.nodes[0].color.as_deref(), Some(DEFAULT_COLOR));
		assert_eq!(data.nodes[0].dtype.as_deref(), Some("0"));
	}

	#[test]
	fn empty_object_is_an_empty_graph() {
		let data = GraphResponse::from_json("{}").unwrap().into_graph_data();
		assert!(data.nodes.is_empty());
		assert!(data.links.is_empty());
	}

	#[test]
	fn malformed_entries_are_rejected() {
		assert!(GraphResponse::from_json(r#"{"a": ["A", 0, [], 0]}"#).is_err());
		assert!(GraphResponse::from_json(r#"{"a": {"label": "A"}}"#).is_err());
		assert!(GraphResponse::from_json(r#"["A", 0, [], 0, "red"]"#).is_err());
		assert!(GraphResponse::from_json(r#"{"a": ["A", 0, [true], 0, "red"]}"#).is_err());
	}
}
