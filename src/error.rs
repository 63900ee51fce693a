use thiserror::Error;

/// Every failure a request can end in. Each variant maps to one HTTP status.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Upstream request failed: {0}")]
    UpstreamUnavailable(String),

    #[error("Upstream returned an empty reply")]
    UpstreamEmptyReply,

    #[error("Upstream reply is malformed: {0}")]
    UpstreamFormat(String),
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidInput(_) => 400,
            ApiError::MethodNotAllowed => 405,
            ApiError::Configuration(_)
            | ApiError::UpstreamUnavailable(_)
            | ApiError::UpstreamEmptyReply
            | ApiError::UpstreamFormat(_) => 500,
        }
    }

    /// Short title used as the `error` field of the JSON body.
    pub fn title(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "Invalid input",
            ApiError::MethodNotAllowed => "Method not allowed",
            ApiError::Configuration(_) => "Server configuration error",
            ApiError::UpstreamUnavailable(_) => "AI service request failed",
            ApiError::UpstreamEmptyReply => "No response from AI service",
            ApiError::UpstreamFormat(_) => "Invalid response from AI service",
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::UpstreamUnavailable(err.to_string())
    }
}

#[cfg(feature = "http-server")]
mod response {
    use super::ApiError;
    use axum::{
        http::StatusCode,
        response::{IntoResponse, Response},
        Json,
    };

    impl IntoResponse for ApiError {
        fn into_response(self) -> Response {
            let status = StatusCode::from_u16(self.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

            if status.is_server_error() {
                log::error!("❌ {}", self);
            } else {
                log::warn!("⚠️ {}", self);
            }

            let body = serde_json::json!({
                "error": self.title(),
                "details": self.to_string(),
            });

            (status, Json(body)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::InvalidInput("x".into()).status_code(), 400);
        assert_eq!(ApiError::MethodNotAllowed.status_code(), 405);
        assert_eq!(ApiError::Configuration("x".into()).status_code(), 500);
        assert_eq!(ApiError::UpstreamUnavailable("x".into()).status_code(), 500);
        assert_eq!(ApiError::UpstreamEmptyReply.status_code(), 500);
        assert_eq!(ApiError::UpstreamFormat("x".into()).status_code(), 500);
    }

    #[test]
    fn test_format_and_unavailable_are_distinct() {
        let format = ApiError::UpstreamFormat("bad json".into());
        let unavailable = ApiError::UpstreamUnavailable("timeout".into());

        assert_ne!(format.title(), unavailable.title());
        assert!(format.to_string().contains("bad json"));
    }
}
