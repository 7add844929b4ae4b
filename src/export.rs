//! Export functionality for node diagrams.
//!
//! Exporters are ordinary [`Painter`](crate::draw::Painter) implementations
//! fed through the one-way paint contract: the manager walks its nodes and
//! connectors, the exporter records what it is told to draw, and the result
//! is written out as a file.

/// SVG export backend.
pub mod svg;

/// Errors that can occur during diagram export.
///
/// This type is converted into [`TrellisError::Export`] at the crate
/// boundary.
///
/// [`TrellisError::Export`]: crate::TrellisError::Export
#[derive(Debug)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
    /// An I/O error encountered while writing output.
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<Error> for crate::TrellisError {
    fn from(err: Error) -> Self {
        Self::Export(Box::new(err))
    }
}
