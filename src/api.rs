use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::models::HistoryEntry;

/// Request bodies above this size are rejected as invalid input.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Decoded `POST /categorize-ingredient` body.
#[derive(Debug, PartialEq)]
pub struct CategorizeInput {
    pub ingredient_name: String,
    pub user_history: Vec<HistoryEntry>,
}

/// Decoded `POST /parse-ingredients` body.
#[derive(Debug, PartialEq)]
pub struct ParseInput {
    pub text: String,
}

fn decode_object(body: &[u8]) -> Result<Map<String, Value>, ApiError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ApiError::InvalidInput("request body must be a JSON object".to_string())),
        Err(e) => Err(ApiError::InvalidInput(format!("request body is not valid JSON: {}", e))),
    }
}

fn required_string(body: &Map<String, Value>, field: &str) -> Result<String, ApiError> {
    match body.get(field) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        _ => Err(ApiError::InvalidInput(format!("{} must be a non-empty string", field))),
    }
}

impl CategorizeInput {
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        let body = decode_object(body)?;
        let ingredient_name = required_string(&body, "ingredientName")?;

        let user_history = match body.get("userHistory") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(entries)) => entries.iter().map(HistoryEntry::from_value).collect(),
            Some(_) => {
                return Err(ApiError::InvalidInput("userHistory must be an array".to_string()))
            }
        };

        Ok(Self {
            ingredient_name,
            user_history,
        })
    }
}

impl ParseInput {
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        let body = decode_object(body)?;
        let text = required_string(&body, "text")?;
        Ok(Self { text })
    }
}

// Axum integration
#[cfg(feature = "http-server")]
pub mod server {
    use super::*;
    use axum::{
        body::{Body, Bytes},
        extract::State,
        http::{header, Method, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use std::sync::Arc;
    use tower_http::cors::{Any, CorsLayer};

    use crate::handlers::{IngredientCategorizer, IngredientParser};
    use crate::models::{CategorizeResponse, ParseResponse};

    pub struct AppState {
        pub categorizer: Arc<IngredientCategorizer>,
        pub parser: Arc<IngredientParser>,
    }

    pub fn create_router(
        categorizer: Arc<IngredientCategorizer>,
        parser: Arc<IngredientParser>,
    ) -> Router {
        let state = Arc::new(AppState { categorizer, parser });

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

        Router::new()
            .route("/", get(root_handler))
            .route("/health", get(health_check))
            .route(
                "/categorize-ingredient",
                post(categorize_handler)
                    .options(preflight)
                    .fallback(method_not_allowed),
            )
            .route(
                "/parse-ingredients",
                post(parse_handler)
                    .options(preflight)
                    .fallback(method_not_allowed),
            )
            .layer(cors)
            .with_state(state)
    }

    /// Reads the raw body so oversized or non-UTF-8 payloads still get a JSON error.
    async fn read_body(body: Body) -> Result<Bytes, ApiError> {
        axum::body::to_bytes(body, MAX_BODY_BYTES).await.map_err(|e| {
            ApiError::InvalidInput(format!("could not read request body: {}", e))
        })
    }

    async fn categorize_handler(
        State(state): State<Arc<AppState>>,
        body: Body,
    ) -> Result<Json<CategorizeResponse>, ApiError> {
        let body = read_body(body).await?;
        log::info!("🔔 POST /categorize-ingredient ({} bytes)", body.len());

        let input = CategorizeInput::from_body(&body)?;
        let response = state
            .categorizer
            .categorize(&input.ingredient_name, &input.user_history)
            .await?;

        Ok(Json(response))
    }

    async fn parse_handler(
        State(state): State<Arc<AppState>>,
        body: Body,
    ) -> Result<Json<ParseResponse>, ApiError> {
        let body = read_body(body).await?;
        log::info!("🔔 POST /parse-ingredients ({} bytes)", body.len());

        let input = ParseInput::from_body(&body)?;
        let response = state.parser.parse(&input.text).await?;

        Ok(Json(response))
    }

    async fn preflight() -> StatusCode {
        StatusCode::OK
    }

    async fn method_not_allowed() -> ApiError {
        ApiError::MethodNotAllowed
    }

    async fn root_handler() -> &'static str {
        "Pantry Assistant - POST /categorize-ingredient or /parse-ingredients"
    }

    async fn health_check() -> &'static str {
        "OK"
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_input_with_history() {
        let body = r#"{"ingredientName":"kale","userHistory":[{"name":"spinach","category":"Vegetables"}]}"#;
        let input = CategorizeInput::from_body(body.as_bytes()).unwrap();

        assert_eq!(input.ingredient_name, "kale");
        assert_eq!(
            input.user_history,
            vec![HistoryEntry {
                name: "spinach".to_string(),
                category: "Vegetables".to_string(),
            }]
        );
    }

    #[test]
    fn test_categorize_input_null_history() {
        let body = r#"{"ingredientName":"kale","userHistory":null}"#;
        let input = CategorizeInput::from_body(body.as_bytes()).unwrap();
        assert!(input.user_history.is_empty());
    }

    #[test]
    fn test_categorize_input_rejects() {
        for body in [
            "",
            "{",
            "\"kale\"",
            "{}",
            r#"{"ingredientName":""}"#,
            r#"{"ingredientName":"  "}"#,
            r#"{"ingredientName":["kale"]}"#,
            r#"{"ingredientName":"kale","userHistory":{}}"#,
        ] {
            let err = CategorizeInput::from_body(body.as_bytes()).unwrap_err();
            assert!(matches!(err, ApiError::InvalidInput(_)), "body: {}", body);
        }
    }

    #[test]
    fn test_invalid_utf8_is_invalid_input() {
        assert!(matches!(
            ParseInput::from_body(&[0xff, 0xfe, b'{']),
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_parse_input() {
        assert_eq!(
            ParseInput::from_body(r#"{"text":"2 eggs"}"#.as_bytes()).unwrap(),
            ParseInput { text: "2 eggs".to_string() }
        );
        assert!(matches!(
            ParseInput::from_body(r#"{"text":42}"#.as_bytes()),
            Err(ApiError::InvalidInput(_))
        ));
        assert!(matches!(
            ParseInput::from_body(r#"{"body":"2 eggs"}"#.as_bytes()),
            Err(ApiError::InvalidInput(_))
        ));
    }
}
