use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can stop a submission from producing an insight.
///
/// The `Display` text of each variant is the detail line shown under the
/// failure headline, so it must stay user-readable.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// Query was empty after trimming. Never reaches the network.
    #[error("Please enter a query to analyze.")]
    Validation,

    /// Request could not be sent or the response body could not be read.
    #[error("{0}")]
    Network(#[from] reqwest::Error),

    /// HTTP status outside 200..=299.
    #[error("Server responded with status {}: {body}", .status.as_u16())]
    Server { status: StatusCode, body: String },

    /// 2xx response whose payload reports a failure or carries no report.
    #[error("{0}")]
    Application(String),

    /// 2xx response whose body is not JSON.
    #[error("{0}")]
    InvalidResponse(#[from] serde_json::Error),
}

impl AnalyzeError {
    pub fn is_validation(&self) -> bool {
        matches!(self, AnalyzeError::Validation)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AnalyzeError::Validation => "validation",
            AnalyzeError::Network(_) => "network",
            AnalyzeError::Server { .. } => "server",
            AnalyzeError::Application(_) => "application",
            AnalyzeError::InvalidResponse(_) => "invalid_response",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_message_has_code_and_body() {
        let err = AnalyzeError::Server {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "internal error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Server responded with status 500: internal error"
        );
        assert_eq!(err.kind(), "server");
    }

    #[test]
    fn test_application_error_message_is_verbatim() {
        let err = AnalyzeError::Application("quota exceeded".to_string());
        assert_eq!(err.to_string(), "quota exceeded");
        assert!(!err.is_validation());
    }

    #[test]
    fn test_invalid_response_wraps_decoder_error() {
        let decode = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let expected = decode.to_string();
        let err = AnalyzeError::from(decode);
        assert_eq!(err.kind(), "invalid_response");
        assert_eq!(err.to_string(), expected);
    }
}
