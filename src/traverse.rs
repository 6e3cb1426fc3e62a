//! Depth-first reachability traversal

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;

use crate::graph::Graph;
use crate::node::Identifiable;

/// Lazy depth-first iterator over the nodes reachable from a set of entry
/// points, created by [`Graph::iter_graph`] and [`Graph::iter_graph_from`].
///
/// Nodes are yielded in pre-order, exactly once each: a node appears the
/// moment it is first discovered, before any of its successors. The
/// visited set is shared across all entry points, so later entry points
/// only contribute nodes that earlier ones did not reach, and cycles
/// terminate. The traversal uses an explicit stack rather than recursion,
/// so depth is bounded by memory, not the call stack.
pub struct Traversal<'g, N, E> {
    graph: &'g Graph<N, E>,
    entry_points: std::vec::IntoIter<&'g Arc<N>>,
    stack: Vec<&'g Arc<N>>,
    visited: HashSet<&'g str>,
}

impl<'g, N: Identifiable, E: Hash + Eq> Traversal<'g, N, E> {
    pub(crate) fn new(graph: &'g Graph<N, E>, entry_points: Vec<&'g Arc<N>>) -> Self {
        Self {
            graph,
            entry_points: entry_points.into_iter(),
            stack: Vec::new(),
            visited: HashSet::new(),
        }
    }
}

impl<'g, N: Identifiable, E: Hash + Eq> Iterator for Traversal<'g, N, E> {
    type Item = Arc<N>;

    fn next(&mut self) -> Option<Arc<N>> {
        loop {
            while let Some(node) = self.stack.pop() {
                if !self.visited.insert(node.identifier()) {
                    continue;
                }

                // Reversed so the first outgoing edge is descended first,
                // matching recursive pre-order.
                let successors = self.graph.successors(node.identifier());
                for successor in successors.into_iter().rev() {
                    if !self.visited.contains(successor.identifier()) {
                        self.stack.push(successor);
                    }
                }

                return Some(Arc::clone(node));
            }

            let entry = self.entry_points.next()?;
            self.stack.push(entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;

    struct TestNode {
        id: String,
    }

    impl TestNode {
        fn new(id: &str) -> Arc<Self> {
            Arc::new(Self { id: id.into() })
        }
    }

    impl Identifiable for TestNode {
        fn identifier(&self) -> &str {
            &self.id
        }
    }

    fn reached(traversal: Traversal<'_, TestNode, i32>) -> Vec<String> {
        traversal.map(|n| n.identifier().to_owned()).collect()
    }

    /// Two roots with partially overlapping reachable sets:
    ///
    /// ```text
    /// n1 <-> n3 -> n4        n2 -> n6 <-> n7
    ///         \--> n5 -> n4
    ///              n5 -> n1
    /// ```
    fn two_root_graph() -> Graph<TestNode, i32> {
        let mut graph: Graph<TestNode, i32> = Graph::new();

        for id in ["n1", "n2", "n3", "n4", "n5", "n6", "n7"] {
            graph.add_node(TestNode::new(id)).unwrap();
        }

        graph.add_root("n1").unwrap();
        graph.add_root("n2").unwrap();

        graph.add_edge("n1", "n3", 0).unwrap();
        graph.add_edge("n3", "n1", 0).unwrap();
        graph.add_edge("n3", "n4", 0).unwrap();
        graph.add_edge("n3", "n5", 0).unwrap();
        graph.add_edge("n5", "n4", 0).unwrap();
        graph.add_edge("n5", "n1", 0).unwrap();

        graph.add_edge("n2", "n6", 0).unwrap();
        graph.add_edge("n6", "n7", 0).unwrap();
        graph.add_edge("n7", "n6", 0).unwrap();

        graph
    }

    #[test]
    fn preorder_from_explicit_start() {
        let graph = two_root_graph();

        assert_eq!(
            reached(graph.iter_graph_from("n2").unwrap()),
            ["n2", "n6", "n7"]
        );
        assert_eq!(reached(graph.iter_graph_from("n7").unwrap()), ["n7", "n6"]);

        // Sibling order among n4/n5 is unspecified, but the result must be
        // one valid DFS pre-order.
        let from_n1 = reached(graph.iter_graph_from("n1").unwrap());
        assert!(
            from_n1 == ["n1", "n3", "n4", "n5"] || from_n1 == ["n1", "n3", "n5", "n4"],
            "not a DFS pre-order: {from_n1:?}"
        );
    }

    #[test]
    fn unknown_start_is_an_error() {
        let graph = two_root_graph();
        assert!(matches!(
            graph.iter_graph_from("n8"),
            Err(GraphError::NodeNotFound(id)) if id == "n8"
        ));
    }

    #[test]
    fn all_roots_share_one_visited_set() {
        let mut graph = two_root_graph();

        let mut all = reached(graph.iter_graph().unwrap());
        assert_eq!(all.len(), 7, "every node exactly once: {all:?}");
        all.sort();
        assert_eq!(all, ["n1", "n2", "n3", "n4", "n5", "n6", "n7"]);

        // Making n2 reachable from n1 must not change the reachable set or
        // introduce duplicates.
        graph.add_edge("n1", "n2", 0).unwrap();
        let mut all = reached(graph.iter_graph().unwrap());
        assert_eq!(all.len(), 7);
        all.sort();
        assert_eq!(all, ["n1", "n2", "n3", "n4", "n5", "n6", "n7"]);
    }

    #[test]
    fn two_cycle_terminates() {
        let mut graph: Graph<TestNode, i32> = Graph::new();
        graph.add_node(TestNode::new("a")).unwrap();
        graph.add_node(TestNode::new("b")).unwrap();
        graph.add_edge("a", "b", 0).unwrap();
        graph.add_edge("b", "a", 0).unwrap();

        assert_eq!(reached(graph.iter_graph_from("a").unwrap()), ["a", "b"]);
    }

    #[test]
    fn each_call_starts_from_fresh_state() {
        let graph = two_root_graph();

        let first = reached(graph.iter_graph_from("n2").unwrap());
        let second = reached(graph.iter_graph_from("n2").unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn traversal_is_lazy_over_a_live_borrow() {
        let graph = two_root_graph();

        let mut traversal = graph.iter_graph_from("n2").unwrap();
        let first = traversal.next().unwrap();
        assert_eq!(first.identifier(), "n2");

        // The yielded handle shares ownership with the graph's own entry.
        assert!(Arc::ptr_eq(&first, graph.find_node("n2").unwrap()));
    }
}
