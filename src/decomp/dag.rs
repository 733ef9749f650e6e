// Copyright 2023 John Nunley
//
// This file is part of trapmap.
//
// trapmap is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or (at your
// option) any later version.
//
// trapmap is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License
// for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with trapmap. If not, see <https://www.gnu.org/licenses/>.

//! The point-location search structure.
//!
//! The structure is a rooted DAG over three node kinds: x-nodes split the
//! plane by the x coordinate of a vertex, y-nodes split it by the side of
//! an edge, and leaves hold trapezoids. Nodes live in an arena and refer to
//! each other by index; a node replaced in place keeps its index, so every
//! parent that referenced it sees the replacement without being visited.

use crate::edge::Edge;
use crate::point::Point;
use crate::ApproxEq;

use alloc::vec;
use alloc::vec::Vec;

use num_traits::real::Real;

use super::{NodeId, TrapId};

/// A node of the search structure.
#[derive(Debug, Clone)]
pub(crate) enum Node<Num: Copy> {
    /// Split by the x coordinate of a vertex: `left` covers x ≤ v.x,
    /// `right` covers x > v.x.
    X {
        vertex: Point<Num>,
        left: NodeId,
        right: NodeId,
    },

    /// Split by an edge: `below` covers points on or below the edge,
    /// `above` covers points strictly above it.
    Y {
        edge: Edge<Num>,
        below: NodeId,
        above: NodeId,
    },

    /// A live trapezoid.
    Leaf { trap: TrapId },
}

/// The arena-backed search DAG.
#[derive(Debug)]
pub(crate) struct SearchDag<Num: Copy> {
    pub(crate) nodes: Vec<Node<Num>>,
    root: NodeId,
}

impl<Num: Copy> SearchDag<Num> {
    /// Create a search structure holding a single trapezoid.
    pub(crate) fn with_root_leaf(trap: TrapId) -> Self {
        SearchDag {
            nodes: vec![Node::Leaf { trap }],
            root: NodeId(0),
        }
    }

    /// Get the root of the structure.
    pub(crate) fn root(&self) -> NodeId {
        self.root
    }

    /// Get the node behind an identifier.
    pub(crate) fn node(&self, id: NodeId) -> &Node<Num> {
        &self.nodes[id.0]
    }

    /// Allocate a new node.
    pub(crate) fn alloc(&mut self, node: Node<Num>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Replace a leaf in place with the given node content.
    ///
    /// The slot keeps its identifier, so every parent edge that pointed at
    /// the leaf now reaches the replacement; this is what lets a leaf with
    /// several parents be grafted over in one step.
    pub(crate) fn replace(&mut self, leaf: NodeId, content: Node<Num>) {
        self.nodes[leaf.0] = content;
    }

    /// Get the trapezoid of a leaf node.
    pub(crate) fn leaf_trap(&self, id: NodeId) -> Option<TrapId> {
        match self.node(id) {
            Node::Leaf { trap } => Some(*trap),
            _ => None,
        }
    }

    /// Collect every leaf reachable from the root, deduplicated.
    ///
    /// Shared leaves under merged trapezoids are reachable along several
    /// paths but reported once.
    pub(crate) fn leaves(&self) -> Vec<NodeId> {
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![self.root];
        let mut leaves = Vec::new();

        while let Some(id) = stack.pop() {
            if visited[id.0] {
                continue;
            }
            visited[id.0] = true;

            match self.node(id) {
                Node::X { left, right, .. } => {
                    stack.push(*left);
                    stack.push(*right);
                }
                Node::Y { below, above, .. } => {
                    stack.push(*below);
                    stack.push(*above);
                }
                Node::Leaf { .. } => leaves.push(id),
            }
        }

        leaves
    }
}

impl<Num: Real + ApproxEq> SearchDag<Num> {
    /// Run a point-location query from the root.
    ///
    /// X-nodes send x ≤ v.x to the left; y-nodes send points strictly above
    /// their edge upward, everything else downward, and points lying on the
    /// edge down both children. The result is a deduplicated set of leaves;
    /// it is a singleton except when the query point sits exactly on a
    /// structure boundary, and the caller resolves such ties.
    pub(crate) fn locate(&self, vertex: Point<Num>) -> Vec<NodeId> {
        let mut stack = vec![self.root];
        let mut matches = Vec::new();

        while let Some(id) = stack.pop() {
            match self.node(id) {
                Node::X {
                    vertex: split,
                    left,
                    right,
                } => {
                    if vertex.x() <= split.x() {
                        stack.push(*left);
                    } else {
                        stack.push(*right);
                    }
                }
                Node::Y { edge, below, above } => {
                    if edge.point_on(vertex) {
                        stack.push(*below);
                        stack.push(*above);
                    } else if edge.point_above(vertex) {
                        stack.push(*above);
                    } else {
                        stack.push(*below);
                    }
                }
                Node::Leaf { .. } => {
                    if !matches.contains(&id) {
                        matches.push(id);
                    }
                }
            }
        }

        matches
    }
}
