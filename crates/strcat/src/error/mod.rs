use thiserror::Error as ThisError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(ThisError, Debug)]
pub enum Error {
    #[error("invalid benchtime {0:?}: expected a duration like 1s or 250ms, or a count like 100x")]
    InvalidBenchTime(String),

    #[error("invalid benchmark selection {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid size {0:?}: expected a positive integer")]
    InvalidSize(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("failed to write report: {0}")]
    Report(#[from] std::io::Error),

    #[error("failed to encode report: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidBenchTime(_) => "INVALID_BENCHTIME",
            Self::InvalidPattern { .. } => "INVALID_PATTERN",
            Self::InvalidSize(_) => "INVALID_SIZE",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Report(_) => "IO_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_message() {
        let err = Error::configuration("count must be at least 1");
        assert_eq!(err.to_string(), "Configuration error: count must be at least 1");
        assert_eq!(err.code(), "CONFIGURATION_ERROR");
    }

    #[test]
    fn test_invalid_pattern_keeps_source() {
        let pattern = "(".to_string();
        let source = regex::Regex::new(&pattern).unwrap_err();
        let err = Error::InvalidPattern { pattern, source };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("invalid benchmark selection \"(\""));
    }

    #[test]
    fn test_io_error_converts() {
        let err: Error = std::io::Error::other("closed").into();
        assert_eq!(err.code(), "IO_ERROR");
    }
}
