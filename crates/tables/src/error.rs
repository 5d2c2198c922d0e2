use std::{io, num::ParseFloatError, path::PathBuf};

use nucleon_core::CapacityError;
use thiserror::Error;

use crate::GeometryError;

/// Errors that can occur while loading an NSE table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("invalid table geometry")]
    Geometry(#[from] GeometryError),

    #[error("too many species for a state vector")]
    Capacity(#[from] CapacityError),

    #[error("{what} have shape {found:?}, expected {expected:?}")]
    Shape {
        what: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("unable to open NSE table `{}`", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read line {line} of NSE table")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },

    #[error("NSE table ended at line {line}, expected {expected} data rows")]
    Truncated { line: usize, expected: usize },

    #[error("blank data row at line {line} of NSE table")]
    BlankLine { line: usize },

    #[error("line {line} of NSE table has {found} values, expected at least {expected}")]
    MissingValues {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("unparsable value `{value}` in column {column} at line {line} of NSE table")]
    Parse {
        line: usize,
        column: usize,
        value: String,
        #[source]
        source: ParseFloatError,
    },
}
