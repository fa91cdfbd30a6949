use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by graph construction and instance loading.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("adjacency matrix is not square: row {row} has {found} entries, expected {expected}")]
    NotSquare {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error(
        "edge multiplicity overflow on ({source}, {destination}): {current} + {added} exceeds the 8-bit cap"
    )]
    EdgeOverflow {
        source: usize,
        destination: usize,
        current: u8,
        added: u8,
    },

    #[error("could not read {}: {}", .path.display(), .err)]
    Io {
        path: PathBuf,
        #[source]
        err: io::Error,
    },

    #[error("malformed graph description: {0}")]
    Parse(String),
}
