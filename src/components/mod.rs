//! Reusable view components.

pub mod uop_graph;
