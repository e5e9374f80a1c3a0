/// One node as handed to the canvas. `dtype` and `arg` are informational and
/// only surface in the hover details.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphNode {
	/// Unique node id.
	pub id: String,
	/// Box caption; the id is shown when absent.
	pub label: Option<String>,
	/// CSS fill color.
	pub color: Option<String>,
	/// Result dtype, for the details panel.
	pub dtype: Option<String>,
	/// Op argument, for the details panel.
	pub arg: Option<String>,
}

/// Directed edge, `source` is the parent.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GraphLink {
	/// Parent id.
	pub source: String,
	/// Child id.
	pub target: String,
}

/// Everything the canvas draws for one step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	/// Nodes, in seeding order.
	pub nodes: Vec<GraphNode>,
	/// Directed edges between `nodes`.
	pub links: Vec<GraphLink>,
}
