//! The graph container: node table, edge table, and root set

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use tracing::trace;

use crate::error::{GraphError, GraphResult};
use crate::node::{Identifiable, NodeRef};
use crate::traverse::Traversal;

/// A mutable directed graph of identifier-keyed nodes.
///
/// Nodes are arbitrary values implementing [`Identifiable`]; the graph
/// stores them behind [`Arc`] handles so callers can keep a node alive
/// across later mutation. Edges carry a set of attribute values and are
/// collapsed by (source, destination, attribute): adding the same
/// attribute to the same node pair twice is a no-op. A set of root
/// identifiers marks the entry points for reachability traversal.
///
/// Structural invariants, upheld by every operation:
///
/// * node identifiers are unique;
/// * every root identifier refers to a stored node;
/// * both endpoints of every edge key refer to stored nodes;
/// * an edge key exists only while its attribute set is non-empty.
///
/// Iteration over nodes, edges, and roots follows insertion order. Callers
/// must not depend on any particular order; it is merely deterministic.
///
/// The graph performs no internal synchronization. Concurrent use requires
/// external serialization, e.g. a reader-writer lock around the whole
/// structure.
pub struct Graph<N, E> {
    roots: IndexSet<String>,
    nodes: IndexMap<String, Arc<N>>,
    edges: IndexMap<(String, String), IndexSet<E>>,
}

impl<N, E> Default for Graph<N, E> {
    fn default() -> Self {
        Self {
            roots: IndexSet::new(),
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
        }
    }
}

impl<N: Identifiable, E: Hash + Eq> Graph<N, E> {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node under its identifier.
    ///
    /// Accepts the node by value or as an existing [`Arc`] handle.
    ///
    /// # Errors
    ///
    /// [`GraphError::DuplicateNode`] if a node with the same identifier is
    /// already registered.
    pub fn add_node(&mut self, node: impl Into<Arc<N>>) -> GraphResult<()> {
        let node = node.into();
        let id = node.identifier().to_owned();
        if self.nodes.contains_key(&id) {
            return Err(GraphError::DuplicateNode(id));
        }

        trace!(node = %id, "node added");
        self.nodes.insert(id, node);
        Ok(())
    }

    /// Mark an existing node as a traversal root. Idempotent.
    ///
    /// # Errors
    ///
    /// [`GraphError::NodeNotFound`] if the argument does not resolve to a
    /// registered node.
    pub fn add_root<'a>(&mut self, node: impl Into<NodeRef<'a>>) -> GraphResult<()> {
        let node = node.into();
        let id = self
            .resolve(node)
            .ok_or_else(|| GraphError::NodeNotFound(node.identifier().to_owned()))?
            .identifier()
            .to_owned();

        trace!(root = %id, "root added");
        self.roots.insert(id);
        Ok(())
    }

    /// Remove an identifier from the root set, without removing the node.
    ///
    /// This is strict, not remove-if-present: a registered node that is not
    /// currently a root is still an error.
    ///
    /// # Errors
    ///
    /// [`GraphError::RootNotFound`] if the identifier is not a root.
    pub fn remove_root<'a>(&mut self, node: impl Into<NodeRef<'a>>) -> GraphResult<()> {
        let id = node.into().identifier();
        if !self.roots.shift_remove(id) {
            return Err(GraphError::RootNotFound(id.to_owned()));
        }

        trace!(root = %id, "root removed");
        Ok(())
    }

    /// Remove a node and everything referring to it.
    ///
    /// Cascades: the identifier is dropped from the root set if present,
    /// and every edge where the node is source or destination is deleted.
    /// Unrelated nodes and edges are untouched. Returns the removed handle.
    ///
    /// # Errors
    ///
    /// [`GraphError::NodeNotFound`] if the argument does not resolve to a
    /// registered node.
    pub fn remove_node<'a>(&mut self, node: impl Into<NodeRef<'a>>) -> GraphResult<Arc<N>> {
        let id = node.into().identifier().to_owned();
        let removed = self
            .nodes
            .shift_remove(&id)
            .ok_or_else(|| GraphError::NodeNotFound(id.clone()))?;

        self.roots.shift_remove(&id);
        self.edges.retain(|(src, dst), _| *src != id && *dst != id);

        trace!(node = %id, "node removed");
        Ok(removed)
    }

    /// Insert `attribute` into the edge set between `source` and
    /// `destination`, creating the edge key on first use.
    ///
    /// Attributes are set-collapsed: inserting one that is already present
    /// is a no-op. Self-loops are permitted.
    ///
    /// # Errors
    ///
    /// [`GraphError::SourceNotFound`] or
    /// [`GraphError::DestinationNotFound`], source checked first.
    pub fn add_edge<'a>(
        &mut self,
        source: impl Into<NodeRef<'a>>,
        destination: impl Into<NodeRef<'a>>,
        attribute: E,
    ) -> GraphResult<()> {
        let key = self.resolve_endpoints(source.into(), destination.into())?;

        trace!(source = %key.0, destination = %key.1, "edge attribute added");
        self.edges
            .entry(key)
            .or_insert_with(IndexSet::new)
            .insert(attribute);
        Ok(())
    }

    /// Remove one attribute from the edge between `source` and
    /// `destination`, deleting the edge key if its set becomes empty.
    ///
    /// # Errors
    ///
    /// [`GraphError::SourceNotFound`] / [`GraphError::DestinationNotFound`]
    /// for missing endpoints; [`GraphError::EdgeNotFound`] when there is no
    /// edge key for the pair or the attribute is not in its set.
    pub fn remove_edge<'a>(
        &mut self,
        source: impl Into<NodeRef<'a>>,
        destination: impl Into<NodeRef<'a>>,
        attribute: &E,
    ) -> GraphResult<()> {
        let key = self.resolve_endpoints(source.into(), destination.into())?;

        let Some(attributes) = self.edges.get_mut(&key) else {
            return Err(GraphError::EdgeNotFound {
                source: key.0,
                destination: key.1,
            });
        };
        if !attributes.shift_remove(attribute) {
            return Err(GraphError::EdgeNotFound {
                source: key.0,
                destination: key.1,
            });
        }

        trace!(source = %key.0, destination = %key.1, "edge attribute removed");
        if attributes.is_empty() {
            self.edges.shift_remove(&key);
        }
        Ok(())
    }

    /// Delete the entire attribute set between `source` and `destination`.
    ///
    /// # Errors
    ///
    /// [`GraphError::SourceNotFound`] / [`GraphError::DestinationNotFound`]
    /// for missing endpoints; [`GraphError::EdgeNotFound`] when no edge key
    /// exists for the pair.
    pub fn remove_all_edges<'a>(
        &mut self,
        source: impl Into<NodeRef<'a>>,
        destination: impl Into<NodeRef<'a>>,
    ) -> GraphResult<()> {
        let key = self.resolve_endpoints(source.into(), destination.into())?;

        if self.edges.shift_remove(&key).is_none() {
            return Err(GraphError::EdgeNotFound {
                source: key.0,
                destination: key.1,
            });
        }

        trace!(source = %key.0, destination = %key.1, "edge removed");
        Ok(())
    }

    /// Look up the stored node for a node-or-identifier argument.
    ///
    /// A node-shaped argument is resolved by its identifier, so the result
    /// is the graph's own handle, which may be a different value than the
    /// argument. Never errors.
    pub fn find_node<'a>(&self, node: impl Into<NodeRef<'a>>) -> Option<&Arc<N>> {
        self.resolve(node.into())
    }

    /// Whether a node with this identifier is registered.
    pub fn contains<'a>(&self, node: impl Into<NodeRef<'a>>) -> bool {
        self.find_node(node).is_some()
    }

    /// The attribute set for the edge between `source` and `destination`.
    ///
    /// # Errors
    ///
    /// [`GraphError::SourceNotFound`] / [`GraphError::DestinationNotFound`]
    /// for missing endpoints; [`GraphError::EdgeNotFound`] when no edge
    /// exists between them.
    pub fn edge_data<'a>(
        &self,
        source: impl Into<NodeRef<'a>>,
        destination: impl Into<NodeRef<'a>>,
    ) -> GraphResult<&IndexSet<E>> {
        let key = self.resolve_endpoints(source.into(), destination.into())?;

        self.edges.get(&key).ok_or(GraphError::EdgeNotFound {
            source: key.0,
            destination: key.1,
        })
    }

    /// Iterate over the root nodes.
    pub fn roots(&self) -> impl Iterator<Item = &Arc<N>> + '_ {
        self.roots.iter().filter_map(move |id| self.nodes.get(id))
    }

    /// Iterate over all nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &Arc<N>> + '_ {
        self.nodes.values()
    }

    /// Iterate over all edges as (source, destination, attribute set)
    /// triples, one per distinct node pair.
    pub fn edges(&self) -> impl Iterator<Item = (&Arc<N>, &Arc<N>, &IndexSet<E>)> + '_ {
        self.edges.iter().filter_map(move |((src, dst), attributes)| {
            Some((self.nodes.get(src)?, self.nodes.get(dst)?, attributes))
        })
    }

    /// Iterate over (attribute set, destination node) pairs for every edge
    /// leaving `source`.
    ///
    /// Lenient by design: an unknown `source` yields an empty iterator
    /// rather than an error, so traversal code can probe freely.
    pub fn outgoing<'a, 's>(
        &'s self,
        source: impl Into<NodeRef<'a>>,
    ) -> impl Iterator<Item = (&'s IndexSet<E>, &'s Arc<N>)> + 's {
        let id = self.resolve(source.into()).map(|node| node.identifier());
        self.edges.iter().filter_map(move |((src, dst), attributes)| {
            if Some(src.as_str()) != id {
                return None;
            }
            Some((attributes, self.nodes.get(dst)?))
        })
    }

    /// Iterate over (attribute set, source node) pairs for every edge
    /// arriving at `destination`.
    ///
    /// Lenient like [`outgoing`](Graph::outgoing): unknown destinations
    /// yield an empty iterator.
    pub fn incoming<'a, 's>(
        &'s self,
        destination: impl Into<NodeRef<'a>>,
    ) -> impl Iterator<Item = (&'s IndexSet<E>, &'s Arc<N>)> + 's {
        let id = self
            .resolve(destination.into())
            .map(|node| node.identifier());
        self.edges.iter().filter_map(move |((src, dst), attributes)| {
            if Some(dst.as_str()) != id {
                return None;
            }
            Some((attributes, self.nodes.get(src)?))
        })
    }

    /// Depth-first traversal of everything reachable from the graph roots.
    ///
    /// Roots are processed in their stored order with one shared visited
    /// set, so a node reachable from several roots is yielded exactly once,
    /// by whichever root reaches it first. See
    /// [`iter_graph_from`](Graph::iter_graph_from) for the traversal order.
    ///
    /// # Errors
    ///
    /// [`GraphError::NodeNotFound`] if a root fails to resolve. The root
    /// invariant makes this unreachable in practice; it is checked anyway
    /// rather than skipped silently.
    pub fn iter_graph(&self) -> GraphResult<Traversal<'_, N, E>> {
        let mut entry_points = Vec::with_capacity(self.roots.len());
        for id in &self.roots {
            let node = self
                .nodes
                .get(id)
                .ok_or_else(|| GraphError::NodeNotFound(id.clone()))?;
            entry_points.push(node);
        }
        Ok(Traversal::new(self, entry_points))
    }

    /// Depth-first traversal of everything reachable from `start`.
    ///
    /// Pre-order: each node is yielded exactly once, the moment it is first
    /// discovered, before its successors. Successors follow the edge
    /// table's iteration order, fixed for the duration of the call. The
    /// visited set spans the whole traversal, so cycles terminate.
    ///
    /// Every call starts from fresh visited state.
    ///
    /// # Errors
    ///
    /// [`GraphError::NodeNotFound`] if `start` does not resolve to a
    /// registered node.
    pub fn iter_graph_from<'a>(
        &self,
        start: impl Into<NodeRef<'a>>,
    ) -> GraphResult<Traversal<'_, N, E>> {
        let start = start.into();
        let node = self
            .resolve(start)
            .ok_or_else(|| GraphError::NodeNotFound(start.identifier().to_owned()))?;
        Ok(Traversal::new(self, vec![node]))
    }

    /// Number of registered nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct edge keys (node pairs, not attributes).
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of roots.
    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// Whether the graph holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn resolve(&self, node: NodeRef<'_>) -> Option<&Arc<N>> {
        self.nodes.get(node.identifier())
    }

    /// Resolve both edge endpoints, source first, into an owned edge key.
    fn resolve_endpoints(
        &self,
        source: NodeRef<'_>,
        destination: NodeRef<'_>,
    ) -> GraphResult<(String, String)> {
        let src = self
            .resolve(source)
            .ok_or_else(|| GraphError::SourceNotFound(source.identifier().to_owned()))?;
        let dst = self
            .resolve(destination)
            .ok_or_else(|| GraphError::DestinationNotFound(destination.identifier().to_owned()))?;
        Ok((src.identifier().to_owned(), dst.identifier().to_owned()))
    }

    /// Successor nodes of `id`, in edge-table order. Used by traversal.
    pub(crate) fn successors(&self, id: &str) -> Vec<&Arc<N>> {
        self.edges
            .keys()
            .filter(|(src, _)| src.as_str() == id)
            .filter_map(|(_, dst)| self.nodes.get(dst))
            .collect()
    }
}

impl<N, E> fmt::Display for Graph<N, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Graph with {} roots, {} nodes and {} edges",
            self.roots.len(),
            self.nodes.len(),
            self.edges.len()
        )
    }
}

// Manual impl: summarizes counts so `N` and `E` need not be `Debug`.
impl<N, E> fmt::Debug for Graph<N, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("roots", &self.roots.len())
            .field("nodes", &self.nodes.len())
            .field("edges", &self.edges.len())
            .finish()
    }
}
