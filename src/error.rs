//! Error types shared by every component.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by structural canvas operations, the dither engine,
/// the font rasterizer and the import/export boundary.
///
/// Out-of-bounds reads never produce an error; they return a documented
/// default instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Requested canvas dimensions exceed the implementation limits.
    #[error("invalid canvas size {width}x{height}")]
    InvalidSize {
        /// Requested width.
        width: u64,
        /// Requested height.
        height: u64,
    },

    /// Bitmap geometry (depth, dimensions, pitch) is unusable.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Frame index out of range, or removal of the last frame.
    #[error("frame index {index} out of range ({count} frames)")]
    InvalidRange {
        /// Requested index.
        index: i64,
        /// Frame count at the time of the request.
        count: usize,
    },

    /// Unknown strategy or format key.
    #[error("unknown {kind} option: {key:?}")]
    InvalidOption {
        /// Which option family was being set.
        kind: &'static str,
        /// The rejected key.
        key: String,
    },

    /// A numeric tuning value is out of its accepted domain.
    #[error("invalid value for {name}: {value}")]
    InvalidValue {
        /// Parameter name.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },

    /// Raw colour index is not one of the ANSI colours.
    #[error("invalid ANSI colour index {0:#04x}")]
    InvalidColor(u8),

    /// The canvas is attached to a display and cannot change size.
    #[error("canvas is in use by a display")]
    Busy,

    /// No canvas is available for the operation.
    #[error("missing canvas")]
    MissingCanvas,

    /// A named resource (builtin font, display attachment) does not exist.
    #[error("missing resource: {0}")]
    MissingResource(String),

    /// Blit mask size differs from the source canvas size.
    #[error("mask canvas size differs from source canvas size")]
    MaskMismatch,

    /// Caller-supplied buffer cannot hold the requested data.
    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall {
        /// Minimum number of bytes required.
        needed: usize,
        /// Bytes actually supplied.
        actual: usize,
    },

    /// Font data is malformed.
    #[error("invalid font data: {0}")]
    InvalidFont(String),

    /// I/O failure while reading an import source.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn option(kind: &'static str, key: &str) -> Self {
        Self::InvalidOption {
            kind,
            key: key.to_string(),
        }
    }
}
