pub mod categorizer;
pub mod parser;

pub use categorizer::IngredientCategorizer;
pub use parser::IngredientParser;

use crate::error::ApiError;
use crate::services::Completion;

/// Decoded reply value plus the provider's usage block.
type DecodedReply = (serde_json::Value, Option<serde_json::Value>);

/// Decodes the provider's text as JSON. The value itself is still untrusted.
fn decode_reply(completion: Completion) -> Result<DecodedReply, ApiError> {
    let content = completion.content.ok_or(ApiError::UpstreamEmptyReply)?;

    let value = serde_json::from_str(&content).map_err(|e| {
        log::error!("❌ Upstream reply is not JSON: {}", content);
        ApiError::UpstreamFormat(format!("reply is not valid JSON: {}", e))
    })?;

    Ok((value, completion.usage))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_reply_empty() {
        let err = decode_reply(Completion::default()).unwrap_err();
        assert!(matches!(err, ApiError::UpstreamEmptyReply));
    }

    #[test]
    fn test_decode_reply_not_json() {
        let completion = Completion {
            content: Some("Sure! The category is Dairy.".to_string()),
            usage: None,
        };
        let err = decode_reply(completion).unwrap_err();
        assert!(matches!(err, ApiError::UpstreamFormat(_)));
    }

    #[test]
    fn test_decode_reply_passes_usage_through() {
        let completion = Completion {
            content: Some("{\"ok\":true}".to_string()),
            usage: Some(json!({"total_tokens": 3})),
        };
        let (value, usage) = decode_reply(completion).unwrap();

        assert_eq!(value, json!({"ok": true}));
        assert_eq!(usage, Some(json!({"total_tokens": 3})));
    }
}
