//! This module contains all custom errors used in this library.

use std::fmt;
use std::error::Error;

#[derive(Debug)]
pub enum ImportError {
    IoError(std::io::Error),
    InputMalformedError,
    BadIntError(std::num::ParseIntError),
    /// The sparse6 header or bit stream could not be decoded.
    Sparse6Error(String),
}

impl From<std::io::Error> for ImportError {
    fn from(e: std::io::Error) -> ImportError {
        ImportError::IoError(e)
    }
}

impl From<std::num::ParseIntError> for ImportError {
    fn from(e: std::num::ParseIntError) -> ImportError {
        ImportError::BadIntError(e)
    }
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "Import: IoError ({})", e),
            Self::InputMalformedError => write!(f, "Import: Input is malformed."),
            Self::BadIntError(e) => write!(f, "Import: Integer is malformed ({}).", e),
            Self::Sparse6Error(msg) => write!(f, "Import: Bad sparse6 input: {}", msg),
        }
    }
}

impl Error for ImportError {}

#[derive(Debug, PartialEq, Eq)]
pub enum ProcessingError {
    /// The exact solver was handed a graph whose coloring walk produced a non-empty octset.
    NotBipartite { octset_size: usize },
    InvalidParameter(String),
    InvalidSolution(String),
}

impl fmt::Display for ProcessingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotBipartite { octset_size } => {
                write!(f, "Not bipartite: coloring left {} conflicting vertices", octset_size)
            },
            Self::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            Self::InvalidSolution(msg) => write!(f, "InvalidSolution: {}", msg),
        }
    }
}

impl Error for ProcessingError {}
