//! Error types for OBJ/MTL parsing and source loading.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Fatal error for a single parse call. Line numbers are 1-based.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("line {line}: '{directive}' expected a number, found '{token}'")]
    MalformedNumber {
        line: usize,
        directive: String,
        token: String,
    },
    #[error("line {line}: '{directive}' is missing an operand")]
    MissingOperand { line: usize, directive: String },
    #[error("line {line}: '{directive}' index '{token}' is out of range (pool size {len})")]
    IndexOutOfRange {
        line: usize,
        directive: String,
        token: String,
        len: usize,
    },
    #[error("line {line}: '{directive}' has {corners} corner(s), at least 3 are required")]
    DegenerateFace {
        line: usize,
        directive: String,
        corners: usize,
    },
    #[error("line {line}: '{directive}' appears before any 'newmtl'")]
    OrphanProperty { line: usize, directive: String },
    #[error("line {line}: '{directive}' grows the geometry past {} vertices", u32::MAX)]
    TooManyVertices { line: usize, directive: String },
}

impl ParseError {
    /// Line the error was raised on.
    pub fn line(&self) -> usize {
        match self {
            Self::MalformedNumber { line, .. }
            | Self::MissingOperand { line, .. }
            | Self::IndexOutOfRange { line, .. }
            | Self::DegenerateFace { line, .. }
            | Self::OrphanProperty { line, .. }
            | Self::TooManyVertices { line, .. } => *line,
        }
    }

    /// Same error reported at a different line.
    pub(crate) fn at_line(mut self, new_line: usize) -> Self {
        match &mut self {
            Self::MalformedNumber { line, .. }
            | Self::MissingOperand { line, .. }
            | Self::IndexOutOfRange { line, .. }
            | Self::DegenerateFace { line, .. }
            | Self::OrphanProperty { line, .. }
            | Self::TooManyVertices { line, .. } => *line = new_line,
        }
        self
    }
}

/// Failure while turning files on disk into parsed assets.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {}", path.display())]
    UnreadableSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
    #[error("failed to read source stream")]
    UnreadableStream {
        #[source]
        source: io::Error,
    },
    #[error("failed to parse source stream")]
    InvalidStream {
        #[source]
        source: ParseError,
    },
}

impl AssetError {
    /// `true` for read failures, `false` for malformed content.
    pub fn is_unreadable(&self) -> bool {
        matches!(
            self,
            Self::UnreadableSource { .. } | Self::UnreadableStream { .. }
        )
    }
}
