//! Instance parser.
//!
//! The on-disk format is two adjacency-matrix blocks, each a vertex count
//! on its own line followed by that many rows of space-separated edge
//! multiplicities, optionally separated by blank lines.

use crate::{GraphError, Multigraph};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{digit1, space0, space1},
    combinator::{map_res, opt},
    multi::{many1, separated_list1},
    sequence::{preceded, terminated},
    IResult,
};
use std::path::Path;

/// Parse line ending (handles both \n and \r\n)
fn line_ending(input: &str) -> IResult<&str, &str> {
    alt((tag("\n"), tag("\r\n")))(input)
}

/// Parse a vertex count
fn parse_usize(input: &str) -> IResult<&str, usize> {
    map_res(digit1, |s: &str| s.parse::<usize>())(input)
}

/// Parse a single multiplicity; values above the 8-bit cap are rejected
fn parse_weight(input: &str) -> IResult<&str, u8> {
    map_res(digit1, |s: &str| s.parse::<u8>())(input)
}

/// Parse a row of space-separated multiplicities
fn parse_row(input: &str) -> IResult<&str, Vec<u8>> {
    preceded(space0, separated_list1(space1, parse_weight))(input)
}

/// Parse a complete adjacency matrix (n rows of n elements each)
fn parse_adjacency_matrix(input: &str, n: usize) -> IResult<&str, Vec<Vec<u8>>> {
    let mut rows = Vec::with_capacity(n);
    let mut remaining = input;

    for _ in 0..n {
        let (rest, row) = terminated(parse_row, opt(line_ending))(remaining)?;

        if row.len() != n {
            return Err(nom::Err::Failure(nom::error::Error::new(
                input,
                nom::error::ErrorKind::LengthValue,
            )));
        }

        rows.push(row);
        remaining = rest;
    }

    Ok((remaining, rows))
}

/// Parse a single graph: vertex count followed by its adjacency matrix
fn parse_graph(input: &str) -> IResult<&str, Multigraph> {
    let (input, n) = terminated(preceded(space0, parse_usize), line_ending)(input)?;
    let (input, adj) = parse_adjacency_matrix(input, n)?;

    // row widths were checked above, so construction cannot fail
    match Multigraph::from_adjacency(adj) {
        Ok(graph) => Ok((input, graph)),
        Err(_) => Err(nom::Err::Failure(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Verify,
        ))),
    }
}

/// Parse two graphs, in file order
pub fn parse_two_graphs(input: &str) -> IResult<&str, (Multigraph, Multigraph)> {
    let (input, first) = parse_graph(input)?;
    // allow optional blank lines between the two blocks
    let (input, _) = opt(many1(line_ending))(input)?;
    let (input, second) = parse_graph(input)?;

    Ok((input, (first, second)))
}

/// Load an instance file and return (pattern, target).
///
/// Whichever graph is smaller by (vertex count, edge count) becomes the
/// pattern, regardless of file order.
pub fn load_input_file(path: &Path) -> Result<(Multigraph, Multigraph), GraphError> {
    let content = std::fs::read_to_string(path).map_err(|err| GraphError::Io {
        path: path.to_path_buf(),
        err,
    })?;

    let (first, second) = match parse_two_graphs(&content) {
        Ok((_, graphs)) => graphs,
        Err(e) => return Err(GraphError::Parse(e.to_string())),
    };

    let first_rank = (first.vertex_count(), first.edge_count());
    let second_rank = (second.vertex_count(), second.edge_count());
    if second_rank < first_rank {
        Ok((second, first))
    } else {
        Ok((first, second))
    }
}
