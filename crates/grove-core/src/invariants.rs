//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::forest::{Forest, ForestNode, NodeId};

impl Forest {
    pub(crate) fn ensure_node(&self, id: NodeId) -> &ForestNode {
        self.nodes.get(id.index()).unwrap_or_else(|| {
            panic!(
                "Forest: node {id} not found ({} nodes; ids must come from the same forest)",
                self.nodes.len()
            )
        })
    }

    pub(crate) fn ensure_node_mut(&mut self, id: NodeId) -> &mut ForestNode {
        let len = self.nodes.len();
        self.nodes.get_mut(id.index()).unwrap_or_else(|| {
            panic!("Forest: node {id} not found ({len} nodes; ids must come from the same forest)")
        })
    }

    pub(crate) fn assert_alternatives(&self, alternatives: &[NodeId]) {
        assert!(
            !alternatives.is_empty(),
            "Forest: ambiguity node needs at least one alternative"
        );
    }

    pub(crate) fn assert_opt_children(&self, children: &[NodeId]) {
        assert!(
            children.len() <= 1,
            "Forest: optional node takes at most one child, got {}",
            children.len()
        );
    }
}
