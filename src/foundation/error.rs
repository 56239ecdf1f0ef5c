use std::path::PathBuf;

/// Convenience result type used throughout pendviz.
pub type PendvizResult<T> = Result<T, PendvizError>;

/// Top-level error type for pendviz.
///
/// Display strings carry stable prefixes so the binary (and logs) can be grepped by category.
#[derive(thiserror::Error, Debug)]
pub enum PendvizError {
    /// The primary trace is missing or could not be parsed.
    #[error("input error: {0}")]
    Input(String),

    /// The primary trace parsed to zero samples; nothing is rendered.
    #[error("empty trace: '{}' contains no samples", path.display())]
    EmptyTrace {
        /// Trace file that produced no samples.
        path: PathBuf,
    },

    /// Raster or sequence encoding failed, optionally at a specific scheduled frame.
    #[error("encoding error{}: {message}", frame.map(|f| format!(" at frame {f}")).unwrap_or_default())]
    Encoding {
        /// Position of the failing frame in the schedule, when one applies.
        frame: Option<usize>,
        /// Human-readable description.
        message: String,
    },

    /// Invalid configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PendvizError {
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding {
            frame: None,
            message: msg.into(),
        }
    }

    pub fn encoding_at(frame: usize, msg: impl Into<String>) -> Self {
        Self::Encoding {
            frame: Some(frame),
            message: msg.into(),
        }
    }

    pub fn is_empty_trace(&self) -> bool {
        matches!(self, Self::EmptyTrace { .. })
    }

    /// Failing frame for encoding errors.
    pub fn frame(&self) -> Option<usize> {
        match self {
            Self::Encoding { frame, .. } => *frame,
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
