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

//! The plain-text polygon boundary.
//!
//! A polygon file is a vertex count on the first non-empty line followed by
//! one `x y` integer pair per line. The vertices form a closed chain
//! traversed so that the interior lies to the right of every edge.

use crate::edge::{Edge, Side};
use crate::error::Error;
use crate::point::Point;
use crate::ApproxEq;

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use core::cmp::Ordering;
use core::fmt;
use core::fmt::Write as _;

use num_traits::real::Real;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Parse a polygon file into its closed edge chain.
///
/// Every edge carries `Side::Right`: callers guarantee the chain is
/// traversed with the interior on the right.
pub fn parse_polygon(input: &str) -> Result<Vec<Edge<f64>>, Error<f64>> {
    let mut lines = input
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (count_line, count_text) = lines.next().ok_or_else(|| Error::MalformedInput {
        line: 1,
        reason: "empty input".to_string(),
    })?;
    let count: usize = count_text.parse().map_err(|_| Error::MalformedInput {
        line: count_line,
        reason: format!("expected a vertex count, found {:?}", count_text),
    })?;
    if count < 3 {
        return Err(Error::MalformedInput {
            line: count_line,
            reason: format!("a polygon needs at least 3 vertices, got {}", count),
        });
    }

    let mut vertices = Vec::with_capacity(count);
    let mut last_line = count_line;
    for _ in 0..count {
        let (line, text) = lines.next().ok_or_else(|| Error::MalformedInput {
            line: last_line,
            reason: format!("expected {} vertices, found {}", count, vertices.len()),
        })?;
        last_line = line;

        let mut tokens = text.split_whitespace();
        let x = parse_coordinate(tokens.next(), line)?;
        let y = parse_coordinate(tokens.next(), line)?;
        if tokens.next().is_some() {
            return Err(Error::MalformedInput {
                line,
                reason: "expected exactly two coordinates".to_string(),
            });
        }

        vertices.push(Point::new(x, y));
    }

    if let Some((line, _)) = lines.next() {
        return Err(Error::MalformedInput {
            line,
            reason: "trailing data after the last vertex".to_string(),
        });
    }

    Ok(vertices
        .iter()
        .enumerate()
        .map(|(index, &vertex)| Edge::new(vertex, vertices[(index + 1) % count], Side::Right))
        .collect())
}

fn parse_coordinate(token: Option<&str>, line: usize) -> Result<f64, Error<f64>> {
    let token = token.ok_or_else(|| Error::MalformedInput {
        line,
        reason: "expected two whitespace-separated integers".to_string(),
    })?;

    let value: i64 = token.parse().map_err(|_| Error::MalformedInput {
        line,
        reason: format!("{:?} is not an integer", token),
    })?;
    Ok(value as f64)
}

/// Reject inputs whose vertices violate the general-position assumption.
///
/// The core assumes no two distinct vertices share an x coordinate; a
/// violation surfaces here as [`Error::DegeneracyViolation`] before any
/// construction work happens. Robust callers run this before building.
pub fn check_general_position<Num>(edges: &[Edge<Num>]) -> Result<(), Error<Num>>
where
    Num: Real + ApproxEq + fmt::Debug,
{
    let mut vertices: Vec<Point<Num>> = Vec::with_capacity(edges.len() * 2);
    for edge in edges {
        for vertex in [edge.p1(), edge.p2()] {
            if !vertices.contains(&vertex) {
                vertices.push(vertex);
            }
        }
    }

    vertices.sort_by(|a, b| a.x().partial_cmp(&b.x()).unwrap_or(Ordering::Equal));
    for pair in vertices.windows(2) {
        if pair[0].x().approx_eq(&pair[1].x()) {
            return Err(Error::DegeneracyViolation(pair[0], pair[1]));
        }
    }

    Ok(())
}

/// Generate a random polygon file with `count` vertices drawn uniformly
/// from `[min, max)`.
///
/// The output is raw: vertices may repeat or self-intersect, exactly like
/// the test inputs the decomposition was originally exercised with. The
/// seed makes generation reproducible.
pub fn random_polygon(count: usize, min: i64, max: i64, seed: u64) -> String {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut out = String::new();

    let _ = writeln!(out, "{}", count);
    for _ in 0..count {
        let x = rng.random_range(min..max);
        let y = rng.random_range(min..max);
        let _ = writeln!(out, "{} {}", x, y);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::{check_general_position, parse_polygon, random_polygon};
    use crate::edge::Side;
    use crate::error::Error;
    use crate::point::Point;

    #[test]
    fn test_parse_triangle() {
        let edges = parse_polygon("3\n1 1\n5 1\n3 5\n").unwrap();
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[0].p1(), Point::new(1.0, 1.0));
        assert_eq!(edges[0].p2(), Point::new(5.0, 1.0));
        assert_eq!(edges[2].p1(), Point::new(3.0, 5.0));
        assert_eq!(edges[2].p2(), Point::new(1.0, 1.0));
        assert!(edges.iter().all(|edge| edge.side() == Side::Right));
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let edges = parse_polygon("\n3\n\n1 1\n5 1\n\n3 5\n\n").unwrap();
        assert_eq!(edges.len(), 3);
    }

    #[test]
    fn test_parse_rejects_short_input() {
        let error = parse_polygon("3\n1 1\n5 1\n").unwrap_err();
        assert!(matches!(error, Error::MalformedInput { .. }));
    }

    #[test]
    fn test_parse_rejects_bad_coordinates() {
        let error = parse_polygon("3\n1 1\nfive 1\n3 5\n").unwrap_err();
        assert!(matches!(error, Error::MalformedInput { line: 3, .. }));
    }

    #[test]
    fn test_parse_rejects_bad_count() {
        assert!(parse_polygon("").is_err());
        assert!(parse_polygon("nope\n").is_err());
        assert!(parse_polygon("2\n0 0\n1 1\n").is_err());
    }

    #[test]
    fn test_general_position() {
        let good = parse_polygon("3\n1 1\n5 1\n3 5\n").unwrap();
        assert!(check_general_position(&good).is_ok());

        // (0, 0) and (0, 4) share an x coordinate.
        let bad = parse_polygon("4\n0 0\n4 1\n7 5\n0 4\n").unwrap();
        assert!(matches!(
            check_general_position(&bad),
            Err(Error::DegeneracyViolation(..))
        ));
    }

    #[test]
    fn test_random_polygon_parses_back() {
        let text = random_polygon(12, 0, 100, 7);
        let edges = parse_polygon(&text).unwrap();
        assert_eq!(edges.len(), 12);

        // Same seed, same polygon.
        assert_eq!(text, random_polygon(12, 0, 100, 7));
    }
}
