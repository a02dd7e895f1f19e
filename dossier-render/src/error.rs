//! Error types for the rendering pipeline

use thiserror::Error;

/// Errors raised while turning a report into presentation output.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The document nests deeper than the renderer is willing to walk.
    #[error("document nesting exceeds the limit of {limit} levels")]
    NestingTooDeep { limit: usize },

    /// Requested output format is not registered.
    #[error("format '{0}' not found")]
    FormatNotFound(String),

    /// Building or writing the output failed.
    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Validation failures for an outgoing research request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("topic must not be empty")]
    EmptyTopic,

    #[error("topic is {len} characters long, the limit is {max}")]
    TopicTooLong { len: usize, max: usize },

    #[error("depth {0} is outside the supported range 1..=5")]
    DepthOutOfRange(u8),

    #[error("at most {max} focus areas are allowed")]
    TooManyFocusAreas { max: usize },

    #[error("focus area '{0}' is empty or too long")]
    InvalidFocusArea(String),

    #[error("focus area '{0}' is listed twice")]
    DuplicateFocusArea(String),
}
