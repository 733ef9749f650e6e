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

//! Scenario and invariant tests for the incremental construction.

use super::dag::Node;
use super::{same_segment, Decomposition, EdgeKind, TrapId};
use crate::bbox::BoundingBox;
use crate::edge::{Edge, Side};
use crate::error::Error;
use crate::point::Point;
use crate::trapezoid::Trapezoid;

use alloc::vec::Vec;

fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Edge<f64> {
    Edge::new(Point::new(x1, y1), Point::new(x2, y2), Side::Right)
}

fn live(decomp: &Decomposition<f64>) -> Vec<TrapId> {
    decomp.trapezoids().map(|(id, _)| id).collect()
}

fn on_boundary(trap: &Trapezoid<f64>, vertex: Point<f64>) -> bool {
    trap.top_segment().point_on(vertex)
        || trap.bottom_segment().point_on(vertex)
        || trap.left_edge().map_or(false, |wall| wall.point_on(vertex))
        || trap.right_edge().map_or(false, |wall| wall.point_on(vertex))
        || trap.top_left() == vertex
        || trap.top_right() == vertex
        || trap.bottom_left() == vertex
        || trap.bottom_right() == vertex
}

/// Check every testable map invariant against the current state.
fn assert_invariants(decomp: &Decomposition<f64>, inserted: &[Edge<f64>]) {
    let live = live(decomp);

    // Leaf <-> trapezoid bijection, checked against the leaves actually
    // reachable from the DAG root.
    let leaves = decomp.dag.leaves();
    assert_eq!(leaves.len(), live.len());
    for &leaf in &leaves {
        let trap = decomp.dag.leaf_trap(leaf).unwrap();
        assert_eq!(decomp.trapezoid(trap).leaf, Some(leaf));
    }

    let mut area = 0.0;
    for &id in &live {
        let trap = decomp.trapezoid(id);

        assert!(trap.leftp().x() < trap.rightp().x(), "{:?}", trap);

        let mid_x = (trap.leftp().x() + trap.rightp().x()) / 2.0;
        let top_y = trap.top().y_at(mid_x).unwrap();
        let bottom_y = trap.bottom().y_at(mid_x).unwrap();
        assert!(top_y > bottom_y, "top does not clear bottom: {:?}", trap);

        // Neighbor lists are symmetric and only name live trapezoids.
        for &left in &trap.left_neighbors {
            assert!(live.contains(&left));
            assert!(decomp.trapezoid(left).right_neighbors.contains(&id));
        }
        for &right in &trap.right_neighbors {
            assert!(live.contains(&right));
            assert!(decomp.trapezoid(right).left_neighbors.contains(&id));
        }

        let height_left = trap.top_left().y() - trap.bottom_left().y();
        let height_right = trap.top_right().y() - trap.bottom_right().y();
        area += (height_left + height_right) / 2.0 * (trap.rightp().x() - trap.leftp().x());

        // A centroid query comes back to exactly this trapezoid.
        let hits = decomp.locate(trap.centroid());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0], id);
    }

    // Interior-disjoint trapezoids tiling the box add up to its area.
    assert!((area - decomp.bbox().area()).abs() < 1e-6);

    for edge in inserted {
        // Every inserted edge bounds at least one live trapezoid.
        assert!(live.iter().any(|&id| {
            let trap = decomp.trapezoid(id);
            trap.top() == *edge || trap.bottom() == *edge
        }));

        // Every polygon vertex locates to a trapezoid holding it on its
        // boundary.
        for vertex in [edge.p1(), edge.p2()] {
            let hits = decomp.locate(vertex);
            assert!(!hits.is_empty());
            assert!(hits
                .iter()
                .any(|&id| on_boundary(decomp.trapezoid(id), vertex)));
        }
    }
}

/// Insert the edges in order, re-checking the invariants after each one.
fn build_checked(edges: &[Edge<f64>]) -> Decomposition<f64> {
    let bbox = BoundingBox::around_edges(edges, 2.0);
    let mut decomp = Decomposition::new(bbox);

    for (index, edge) in edges.iter().enumerate() {
        decomp.insert(*edge).unwrap();
        assert_invariants(&decomp, &edges[..=index]);
    }

    decomp
}

#[test]
fn test_single_edge_splits_into_four() {
    // An edge strictly inside the initial trapezoid produces a rectangle
    // on each side and a fragment above and below.
    let segment = seg(2.0, 2.0, 6.0, 4.0);
    let decomp = build_checked(&[segment]);

    assert_eq!(decomp.trapezoid_count(), 4);

    let live = live(&decomp);
    assert!(live
        .iter()
        .any(|&id| decomp.trapezoid(id).rightp() == Point::new(2.0, 2.0)));
    assert!(live
        .iter()
        .any(|&id| decomp.trapezoid(id).leftp() == Point::new(6.0, 4.0)));
    assert!(live.iter().any(|&id| decomp.trapezoid(id).bottom() == segment));
    assert!(live.iter().any(|&id| decomp.trapezoid(id).top() == segment));

    // The edge itself comes back tagged as a polygon edge.
    let produced = decomp.edges();
    let (_, kind) = produced
        .iter()
        .find(|(edge, _)| same_segment(edge, &segment))
        .unwrap();
    assert_eq!(*kind, EdgeKind::Polygon);
}

#[test]
fn test_triangle() {
    let e1 = seg(1.0, 1.0, 5.0, 1.0);
    let e2 = seg(5.0, 1.0, 3.0, 5.0);
    let e3 = seg(3.0, 5.0, 1.0, 1.0);
    let decomp = build_checked(&[e1, e2, e3]);

    // Left wedge, right wedge, one trapezoid below the base, two above
    // the apex wall, two inside split by the apex wall.
    assert_eq!(decomp.trapezoid_count(), 7);
    assert!(decomp.trapezoid_count() <= 4 * 3 + 1);

    // The interior point (3, 3) lands in a trapezoid resting on the base
    // and capped by one of the diagonals.
    let hits = decomp.locate(Point::new(3.0, 3.0));
    assert_eq!(hits.len(), 1);
    let interior = decomp.trapezoid(hits[0]);
    assert_eq!(interior.bottom(), e1);
    assert!(interior.top() == e2 || interior.top() == e3);

    let live = live(&decomp);
    let bbox = decomp.bbox();

    // The wedges left and right of the triangle span the full box height.
    assert!(live.iter().any(|&id| {
        let trap = decomp.trapezoid(id);
        trap.leftp() == bbox.top_left() && trap.rightp() == Point::new(1.0, 1.0)
    }));
    assert!(live.iter().any(|&id| {
        let trap = decomp.trapezoid(id);
        trap.leftp() == Point::new(5.0, 1.0) && trap.rightp() == bbox.bottom_right()
    }));

    // Below the base: one full-width trapezoid topped by the base edge.
    assert!(live.iter().any(|&id| {
        let trap = decomp.trapezoid(id);
        trap.top() == e1
            && trap.leftp() == Point::new(1.0, 1.0)
            && trap.rightp() == Point::new(5.0, 1.0)
    }));

    // Above: one trapezoid over each diagonal.
    assert!(live.iter().any(|&id| decomp.trapezoid(id).bottom() == e2));
    assert!(live.iter().any(|&id| decomp.trapezoid(id).bottom() == e3));
}

#[test]
fn test_quadrilateral_inner_trapezoid() {
    // The axis-aligned square's vertical sides cannot be inserted (and
    // would be rejected); decomposing the two horizontal edges leaves an
    // interior trapezoid bounded by exactly the four polygon sides, plus
    // a slab above, a slab below and one box slab on either side.
    let bottom = seg(0.0, 0.0, 4.0, 0.0);
    let top = seg(4.0, 4.0, 0.0, 4.0);
    let decomp = build_checked(&[bottom, top]);

    assert_eq!(decomp.trapezoid_count(), 5);

    let hits = decomp.locate(Point::new(2.0, 2.0));
    assert_eq!(hits.len(), 1);
    let interior = decomp.trapezoid(hits[0]);

    assert_eq!(interior.top(), top);
    assert_eq!(interior.bottom(), bottom);
    assert!(same_segment(
        &interior.top_segment(),
        &seg(0.0, 4.0, 4.0, 4.0)
    ));
    assert!(same_segment(
        &interior.bottom_segment(),
        &seg(0.0, 0.0, 4.0, 0.0)
    ));
    assert!(same_segment(
        &interior.left_edge().unwrap(),
        &seg(0.0, 0.0, 0.0, 4.0)
    ));
    assert!(same_segment(
        &interior.right_edge().unwrap(),
        &seg(4.0, 0.0, 4.0, 4.0)
    ));
}

#[test]
fn test_concave_polygon_reflex_wall() {
    // The concave chain (0,0) (6,0) (6,6) (3,3) (0,6), less its vertical
    // sides. The reflex vertex at (3,3) drops a wall to the bottom edge.
    let base = seg(0.0, 0.0, 6.0, 0.0);
    let right_diag = seg(6.0, 6.0, 3.0, 3.0);
    let left_diag = seg(3.0, 3.0, 0.0, 6.0);
    let decomp = build_checked(&[base, right_diag, left_diag]);

    assert_eq!(decomp.trapezoid_count(), 7);

    let produced = decomp.edges();
    let descending_wall = seg(3.0, 0.0, 3.0, 3.0);
    let (_, kind) = produced
        .iter()
        .find(|(edge, _)| same_segment(edge, &descending_wall))
        .unwrap();
    assert_eq!(*kind, EdgeKind::Wall);

    // The polygon's own edges come back tagged as such.
    assert!(produced
        .iter()
        .any(|(_, kind)| *kind == EdgeKind::Polygon));
}

#[test]
fn test_shared_vertex_becomes_x_node() {
    // Two edges meeting at (5, 3); after both insertions the vertex is an
    // x-node of the DAG and any query with it resolves to trapezoids that
    // carry it on their boundary.
    let e1 = seg(1.0, 1.0, 5.0, 3.0);
    let e2 = seg(5.0, 3.0, 9.0, 1.0);
    let decomp = build_checked(&[e1, e2]);

    let vertex = Point::new(5.0, 3.0);
    assert!(decomp
        .dag
        .nodes
        .iter()
        .any(|node| matches!(node, Node::X { vertex: split, .. } if *split == vertex)));

    let hits = decomp.locate(vertex);
    assert!(!hits.is_empty());
    for &id in hits.iter() {
        assert!(on_boundary(decomp.trapezoid(id), vertex));
    }
}

#[test]
fn test_vertical_edge_rejected_without_mutation() {
    let mut decomp = {
        let base = [seg(1.0, 1.0, 5.0, 1.0)];
        let bbox = BoundingBox::around_edges(&base, 2.0);
        let mut decomp = Decomposition::new(bbox);
        decomp.insert(base[0]).unwrap();
        decomp
    };

    let traps_before = decomp.traps.len();
    let nodes_before = decomp.dag.nodes.len();
    let live_before = decomp.trapezoid_count();

    let vertical = seg(3.0, 1.0, 3.0, 5.0);
    let error = decomp.insert(vertical).unwrap_err();
    assert!(matches!(error, Error::UnsupportedEdge(rejected) if rejected == vertical));

    // Neither the map nor the DAG moved.
    assert_eq!(decomp.traps.len(), traps_before);
    assert_eq!(decomp.dag.nodes.len(), nodes_before);
    assert_eq!(decomp.trapezoid_count(), live_before);
}

#[test]
fn test_merged_fragments_share_one_leaf() {
    // An edge crossing three trapezoids whose lower fragments all merge:
    // the merged trapezoid keeps a single leaf referenced by all three
    // grafted sub-DAGs.
    let high = seg(1.0, 5.0, 3.0, 6.0);
    let low = seg(0.0, 1.0, 4.0, 2.0);
    let decomp = build_checked(&[high, low]);

    assert_eq!(decomp.trapezoid_count(), 7);

    let hits = decomp.locate(Point::new(2.0, 0.0));
    assert_eq!(hits.len(), 1);
    let merged = decomp.trapezoid(hits[0]);
    assert_eq!(merged.top(), low);
    assert_eq!(merged.leftp(), Point::new(0.0, 1.0));
    assert_eq!(merged.rightp(), Point::new(4.0, 2.0));

    // Three parents: one per split record that contributed a fragment.
    let leaf = merged.leaf.unwrap();
    let parents = decomp
        .dag
        .nodes
        .iter()
        .filter(|node| match node {
            Node::X { left, right, .. } => *left == leaf || *right == leaf,
            Node::Y { below, above, .. } => *below == leaf || *above == leaf,
            Node::Leaf { .. } => false,
        })
        .count();
    assert_eq!(parents, 3);
}

#[test]
fn test_same_seed_same_decomposition() {
    let edges = [
        seg(1.0, 1.0, 5.0, 1.0),
        seg(5.0, 1.0, 3.0, 5.0),
        seg(3.0, 5.0, 1.0, 1.0),
    ];

    let first = Decomposition::build(&edges, 42).unwrap();
    let second = Decomposition::build(&edges, 42).unwrap();
    assert_eq!(first.edges(), second.edges());

    // Whatever the insertion order, the finished map is the same
    // subdivision and every invariant holds.
    for seed in 0..8 {
        let decomp = Decomposition::build(&edges, seed).unwrap();
        assert_invariants(&decomp, &edges);
        assert_eq!(decomp.trapezoid_count(), 7);
    }
}

#[test]
fn test_build_from_parsed_polygon() {
    let edges = crate::polygon::parse_polygon("3\n1 1\n5 1\n3 5\n").unwrap();
    crate::polygon::check_general_position(&edges).unwrap();

    let decomp = Decomposition::build(&edges, 3).unwrap();
    assert_eq!(decomp.trapezoid_count(), 7);

    // The counting bound for a simple polygon with n edges.
    assert!(decomp.trapezoid_count() <= 4 * edges.len() + 1);
}
