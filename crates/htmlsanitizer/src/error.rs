// ABOUTME: Error types for the sanitizer including ErrorCode enum and SanitizeError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing the categories of sanitizer failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The input stream could not be consumed.
    Read,
    /// A policy configuration document could not be loaded.
    Config,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::Read => "read error",
            ErrorCode::Config => "configuration error",
        };
        write!(f, "{}", s)
    }
}

/// The error type returned by every fallible sanitizer operation.
#[derive(Debug, thiserror::Error)]
pub struct SanitizeError {
    pub code: ErrorCode,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for SanitizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "htmlsanitizer: {}: {}", self.op, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl SanitizeError {
    /// Create a Read error.
    pub fn read(op: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self {
            code: ErrorCode::Read,
            op: op.into(),
            source,
        }
    }

    /// Create a Config error.
    pub fn config(op: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self {
            code: ErrorCode::Config,
            op: op.into(),
            source,
        }
    }

    /// Returns true if this is a Read error.
    pub fn is_read(&self) -> bool {
        self.code == ErrorCode::Read
    }

    /// Returns true if this is a Config error.
    pub fn is_config(&self) -> bool {
        self.code == ErrorCode::Config
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SanitizeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_op_code_and_source() {
        let err = SanitizeError::read("sanitize_reader", Some(anyhow::anyhow!("broken pipe")));
        assert_eq!(
            err.to_string(),
            "htmlsanitizer: sanitize_reader: read error: broken pipe"
        );
        assert!(err.is_read());
        assert!(!err.is_config());
    }

    #[test]
    fn display_without_source() {
        let err = SanitizeError::config("load policy", None);
        assert_eq!(err.to_string(), "htmlsanitizer: load policy: configuration error");
        assert!(err.is_config());
    }
}
