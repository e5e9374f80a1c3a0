//! Canvas rendering of a uop graph.

mod component;
mod render;
mod state;
mod types;

pub use component::UOpGraphCanvas;
pub use state::NodeInfo;
pub use types::{GraphData, GraphLink, GraphNode};
