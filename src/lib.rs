//! Trellis: an in-memory directed object graph
//!
//! A mutable graph container where nodes are arbitrary caller-supplied
//! values exposing a unique string identifier, and directed edges carry a
//! set of hashable attribute values. The graph enforces referential
//! integrity on every mutation and supports depth-first reachability
//! iteration from a set of designated root nodes.
//!
//! # Core Concepts
//!
//! - **Nodes**: any type implementing [`Identifiable`], stored behind
//!   [`std::sync::Arc`] so callers can hold handles across later mutation
//! - **Edges**: deduplicated by (source, destination, attribute); repeated
//!   additions collapse into one attribute set per node pair
//! - **Roots**: identifiers marking traversal entry points; removing a
//!   node drops it from the roots and from every touching edge
//!
//! # Example
//!
//! ```
//! use trellis::{Graph, Identifiable};
//!
//! struct Module {
//!     name: String,
//! }
//!
//! impl Identifiable for Module {
//!     fn identifier(&self) -> &str {
//!         &self.name
//!     }
//! }
//!
//! let mut graph: Graph<Module, &str> = Graph::new();
//! graph.add_node(Module { name: "core".into() })?;
//! graph.add_node(Module { name: "util".into() })?;
//! graph.add_edge("core", "util", "depends on")?;
//! graph.add_root("core")?;
//!
//! let reachable: Vec<String> = graph
//!     .iter_graph()?
//!     .map(|module| module.identifier().to_owned())
//!     .collect();
//! assert_eq!(reachable, ["core", "util"]);
//! # Ok::<(), trellis::GraphError>(())
//! ```

mod error;
mod graph;
mod node;
mod traverse;

pub use error::{GraphError, GraphResult};
pub use graph::Graph;
pub use node::{Identifiable, NodeRef};
pub use traverse::Traversal;

// Edge attribute sets are exposed directly in the API (`edge_data`,
// `edges`, `outgoing`, `incoming`).
pub use indexmap::IndexSet;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
