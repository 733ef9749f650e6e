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

//! Command-line driver for the trapezoidal decomposition.
//!
//! Reads a polygon file, builds the decomposition with a seed-controlled
//! random insertion order and prints one tagged edge per line. Exits with
//! status 0 on success and 1 on any surfaced error.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use trapmap::{check_general_position, parse_polygon, random_polygon, Decomposition, EdgeKind};

#[derive(Parser)]
#[command(
    name = "trapmap",
    about = "Compute the trapezoidal decomposition of a simple polygon"
)]
struct Args {
    /// Polygon file: a vertex count followed by one `x y` pair per line.
    input: Option<PathBuf>,

    /// Seed controlling the random insertion order.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Generate a random polygon file with this many vertices instead of
    /// decomposing one.
    #[arg(long, value_name = "COUNT")]
    generate: Option<usize>,

    /// Lower coordinate bound for --generate.
    #[arg(long, default_value_t = 0)]
    min: i64,

    /// Upper coordinate bound for --generate.
    #[arg(long, default_value_t = 100)]
    max: i64,
}

fn main() {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    if let Err(error) = run(&args) {
        eprintln!("error: {}", error);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(count) = args.generate {
        print!("{}", random_polygon(count, args.min, args.max, args.seed));
        return Ok(());
    }

    let path = args.input.as_ref().ok_or("an input file is required")?;
    let text = std::fs::read_to_string(path)?;

    let edges = parse_polygon(&text)?;
    check_general_position(&edges)?;

    let decomposition = Decomposition::build(&edges, args.seed)?;
    for (edge, kind) in decomposition.edges() {
        let tag = match kind {
            EdgeKind::Polygon => "polygon",
            EdgeKind::Wall => "wall",
        };
        println!(
            "{} ({}, {}) ({}, {})",
            tag,
            edge.p1().x(),
            edge.p1().y(),
            edge.p2().x(),
            edge.p2().y()
        );
    }

    Ok(())
}
