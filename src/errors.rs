use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to classify a password export header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("empty CSV file")]
    EmptyFile,
    #[error("unknown CSV format, no supported password manager export matched the header")]
    UnsupportedFormat,
}

/// Why a single field could not be turned into a registrable domain.
///
/// Loaders treat every variant as "skip this row".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("URL has no host")]
    MissingHost,
    #[error("host {0} is an IP address")]
    IpAddress(String),
    #[error("host {0} has no registrable domain")]
    NotRegistrable(String),
}

/// Which of the two inputs a load was working on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corpus {
    PasswordExport,
    LeakList,
}

impl fmt::Display for Corpus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Corpus::PasswordExport => f.write_str("password export"),
            Corpus::LeakList => f.write_str("leak list"),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadErrorKind {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// A fatal error that aborted loading one input file.
#[derive(Debug, Error)]
#[error("failed to load {corpus} from {}", path.display())]
pub struct LoadError {
    pub corpus: Corpus,
    pub path: PathBuf,
    #[source]
    pub kind: LoadErrorKind,
}

impl LoadError {
    pub fn new(corpus: Corpus, path: impl Into<PathBuf>, kind: impl Into<LoadErrorKind>) -> Self {
        Self {
            corpus,
            path: path.into(),
            kind: kind.into(),
        }
    }
}
