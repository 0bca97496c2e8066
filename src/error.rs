//! Error types for X3D parsing and geometry synthesis
//!
//! Only the parse step can abort a load. Everything that goes wrong while
//! building a scene is downgraded to a [`Diagnostic`](crate::builder::Diagnostic)
//! so traversal always completes.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for the crate's fallible entry points
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error returned by [`load_str`](crate::load_str) and friends
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Failure to turn markup text into a [`SceneNode`](crate::document::SceneNode) tree
#[derive(Error, Debug)]
pub enum ParseError {
    /// Input was empty or whitespace only
    #[error("document is empty")]
    Empty,

    /// The markup contained no element at all
    #[error("document has no root element")]
    NoRootElement,

    /// A second top-level element followed the root
    #[error("unexpected second root element <{0}>")]
    MultipleRoots(String),

    /// Character data outside the root element
    #[error("unexpected text outside the root element at byte {0}")]
    TextOutsideRoot(u64),

    /// Input ended while elements were still open
    #[error("unexpected end of document, <{0}> is not closed")]
    Unclosed(String),

    /// A closing tag with no open element
    #[error("closing tag </{0}> has no matching open element")]
    UnmatchedEnd(String),

    /// A closing tag that does not match the open element
    #[error("closing tag </{found}> does not match <{expected}>")]
    MismatchedEnd { expected: String, found: String },

    /// Tokenizer-level syntax error
    #[error("xml syntax error at byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    /// Element or attribute name that is not valid UTF-8
    #[error("invalid utf-8 in element or attribute name at byte {0}")]
    InvalidName(u64),

    /// File could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure to decode a single attribute value
///
/// Never escapes the builder: the field falls back to its default instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("malformed numeric token {0:?}")]
    Malformed(String),

    #[error("expected {expected} values, found {found}")]
    Arity { expected: usize, found: usize },

    #[error("malformed boolean {0:?}")]
    Boolean(String),
}

/// Reasons a geometry builder could not produce a buffer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("geometry has no coordinates")]
    MissingCoordinates,

    #[error("geometry has no index data")]
    MissingIndices,

    #[error("index {index} is out of range for {len} coordinates")]
    IndexOutOfRange { index: i32, len: usize },

    #[error("grid dimensions {x_dimension}x{z_dimension} are too small")]
    InvalidDimensions { x_dimension: i32, z_dimension: i32 },

    #[error("extrusion needs at least 2 cross-section points and 2 spine points")]
    DegenerateExtrusion,

    #[error("geometry produced no triangles")]
    Empty,

    #[error("geometry needs more than {limit} vertices")]
    TooManyVertices { limit: usize },

    #[error("{attribute} has {found} entries for {expected} vertices")]
    AttributeMismatch {
        attribute: &'static str,
        expected: usize,
        found: usize,
    },
}
