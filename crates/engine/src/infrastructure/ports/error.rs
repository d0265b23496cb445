//! Error types for port operations.

/// Dialogue proxy transport failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request never produced a response (connect, timeout, body read).
    #[error("Proxy request failed: {0}")]
    RequestFailed(String),

    /// The proxy answered with a non-success status.
    #[error("Proxy error: {status} {body}")]
    Status { status: u16, body: String },
}

impl TransportError {
    pub fn request_failed(message: impl ToString) -> Self {
        Self::RequestFailed(message.to_string())
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }
}

/// Save slot failures - includes operation name for tracing.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("Save I/O error in {operation}: {message}")]
    Io {
        operation: &'static str,
        message: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SaveError {
    pub fn io(operation: &'static str, message: impl ToString) -> Self {
        Self::Io {
            operation,
            message: message.to_string(),
        }
    }

    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_carries_code_and_body() {
        let err = TransportError::status(503, "upstream down");
        assert_eq!(err.to_string(), "Proxy error: 503 upstream down");
    }

    #[test]
    fn io_error_names_the_operation() {
        let err = SaveError::io("write world.json", "disk full");
        assert!(err.to_string().contains("write world.json"));
        assert!(err.to_string().contains("disk full"));
    }
}
