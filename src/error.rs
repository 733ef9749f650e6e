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

use crate::decomp::TrapId;
use crate::edge::Edge;
use crate::point::Point;

use alloc::string::String;
use core::fmt;

/// The insertion phase an invariant violation was detected in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Locating the trapezoids crossed by the new edge.
    Locate,

    /// Splitting the crossed trapezoids.
    Split,

    /// Merging fragments separated by fictitious walls.
    Merge,

    /// Grafting the replacement sub-DAGs into the search structure.
    Graft,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Phase::Locate => "locate",
            Phase::Split => "split",
            Phase::Merge => "merge",
            Phase::Graft => "graft",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by the decomposition and its input boundary.
///
/// None of these are retried: the construction is deterministic for a given
/// seed, so a retry could only reproduce the failure.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error<Num: Copy + fmt::Debug> {
    /// A vertical input edge was passed to the inserter.
    ///
    /// Recoverable only by the caller, by preprocessing the polygon.
    #[error("vertical edges are unsupported: {0:?}")]
    UnsupportedEdge(Edge<Num>),

    /// The polygon input could not be parsed.
    #[error("malformed input at line {line}: {reason}")]
    MalformedInput {
        /// One-based line number the parse failed at.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },

    /// An internal invariant of the map or the search structure failed.
    ///
    /// This indicates a bug in the construction, not in the input.
    #[error("invariant broken in the {phase} phase of {edge:?} (trapezoid {trap:?}): {detail}")]
    InvariantBroken {
        /// The insertion phase the violation was detected in.
        phase: Phase,
        /// The edge being inserted.
        edge: Edge<Num>,
        /// The trapezoid being operated on, when one was at hand.
        trap: Option<TrapId>,
        /// What went wrong.
        detail: &'static str,
    },

    /// Two distinct input vertices share an x coordinate, which the core
    /// does not handle.
    #[error("input not in general position: {0:?} and {1:?} share an x coordinate")]
    DegeneracyViolation(Point<Num>, Point<Num>),
}

#[cfg(test)]
mod tests {
    use super::{Error, Phase};
    use crate::edge::{Edge, Side};
    use crate::point::Point;

    use alloc::format;

    #[test]
    fn test_messages_name_the_offender() {
        let edge = Edge::new(Point::new(3.0, 1.0), Point::new(3.0, 5.0), Side::Right);
        let message = format!("{}", Error::UnsupportedEdge(edge));
        assert!(message.contains("vertical"));
        assert!(message.contains("3.0"));

        let broken: Error<f64> = Error::InvariantBroken {
            phase: Phase::Split,
            edge,
            trap: None,
            detail: "no fragment lined up",
        };
        let message = format!("{}", broken);
        assert!(message.contains("split"));
        assert!(message.contains("no fragment lined up"));
    }
}
