use thiserror::Error;

/// Errors raised by the analysis engine.
///
/// Arithmetic edge cases (empty tower sets, zero-sized areas) are not errors;
/// they resolve to zeroed metrics instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The bounding box is not a usable rectangle.
    #[error("invalid bounding box: {bound} {reason}")]
    InvalidGeometry { bound: &'static str, reason: String },

    /// A raw tower record has no usable coordinates.
    #[error("malformed tower record: {field} {reason}")]
    MalformedRecord { field: &'static str, reason: String },
}

impl Error {
    /// Short camelCase identifier, suitable for machine-readable error payloads.
    pub fn reason(&self) -> &'static str {
        match self {
            Error::InvalidGeometry { .. } => "invalidGeometry",
            Error::MalformedRecord { .. } => "malformedRecord",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
