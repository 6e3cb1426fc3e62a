//! The node capability contract and node-or-identifier arguments

use std::sync::Arc;

/// Capability a type must provide to be stored as a graph node.
///
/// The returned identifier must be stable for as long as the node is a
/// member of a [`Graph`](crate::Graph): the graph indexes nodes by this
/// string and never re-indexes a registered node.
pub trait Identifiable {
    /// The unique identifier of this node.
    fn identifier(&self) -> &str;
}

impl<N: Identifiable + ?Sized> Identifiable for Arc<N> {
    fn identifier(&self) -> &str {
        (**self).identifier()
    }
}

/// A node argument: either a raw identifier or a node value.
///
/// Most graph operations accept both forms, so they take
/// `impl Into<NodeRef<'_>>`. String-ish arguments convert to [`NodeRef::Id`],
/// node handles to [`NodeRef::Node`]; both resolve against the graph's node
/// table through the same lookup.
#[derive(Clone, Copy)]
pub enum NodeRef<'a> {
    /// A bare node identifier.
    Id(&'a str),
    /// A node value; only its identifier is consulted.
    Node(&'a dyn Identifiable),
}

impl<'a> NodeRef<'a> {
    /// The identifier this argument refers to.
    pub fn identifier(&self) -> &'a str {
        match *self {
            NodeRef::Id(id) => id,
            NodeRef::Node(node) => node.identifier(),
        }
    }
}

impl<'a> From<&'a str> for NodeRef<'a> {
    fn from(id: &'a str) -> Self {
        NodeRef::Id(id)
    }
}

impl<'a> From<&'a String> for NodeRef<'a> {
    fn from(id: &'a String) -> Self {
        NodeRef::Id(id)
    }
}

impl<'a, N: Identifiable> From<&'a Arc<N>> for NodeRef<'a> {
    fn from(node: &'a Arc<N>) -> Self {
        NodeRef::Node(node.as_ref())
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeRef::Id(id) => f.debug_tuple("Id").field(id).finish(),
            NodeRef::Node(node) => f.debug_tuple("Node").field(&node.identifier()).finish(),
        }
    }
}
