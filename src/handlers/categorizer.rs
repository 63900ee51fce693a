use serde_json::Value;
use std::sync::Arc;

use super::decode_reply;
use crate::error::ApiError;
use crate::models::{CategorizationResult, CategorizeResponse, Category, HistoryEntry};
use crate::services::{CompletionProvider, CompletionRequest};

/// Only the most recent entries are sent upstream as context.
pub const MAX_HISTORY: usize = 20;

const DEFAULT_CONFIDENCE: f64 = 0.8;
const FALLBACK_CONFIDENCE: f64 = 0.5;

pub struct IngredientCategorizer {
    ai: Arc<dyn CompletionProvider>,
}

impl IngredientCategorizer {
    pub fn new(ai: Arc<dyn CompletionProvider>) -> Self {
        Self { ai }
    }

    pub async fn categorize(
        &self,
        ingredient_name: &str,
        history: &[HistoryEntry],
    ) -> Result<CategorizeResponse, ApiError> {
        let name = ingredient_name.trim();
        if name.is_empty() {
            return Err(ApiError::InvalidInput(
                "ingredientName must be a non-empty string".to_string(),
            ));
        }

        log::info!("🏷️ Categorizing ingredient '{}' ({} history entries)", name, history.len());

        let request = CompletionRequest {
            system: build_system_prompt(history),
            user: format!("Categorize this ingredient: \"{}\"", name),
            temperature: 0.3,
            max_tokens: 150,
            json_mode: true,
        };

        let completion = self.ai.complete(&request).await?;
        let (reply, usage) = decode_reply(completion)?;
        let result = normalize_categorization(&reply);

        log::info!(
            "✅ '{}' categorized as {} ({:.2})",
            name,
            result.category,
            result.confidence
        );

        Ok(CategorizeResponse { result, usage })
    }
}

fn build_system_prompt(history: &[HistoryEntry]) -> String {
    let mut prompt = format!(
        "You are a kitchen assistant that sorts pantry ingredients into categories.\n\
         \n\
         Available categories: {}\n\
         \n\
         Rules:\n\
         - Pick exactly one category from the list above for the ingredient.\n\
         - Use \"Other\" when nothing fits.\n\
         - confidence is a number between 0 and 1.\n\
         - suggestions lists up to 2 alternative categories from the same list, most likely first.\n\
         \n\
         Respond with a JSON object only, in this format:\n\
         {{\"category\": \"Vegetables\", \"confidence\": 0.95, \"suggestions\": [\"Fruits\"]}}",
        Category::taxonomy_list()
    );

    let recent = &history[history.len().saturating_sub(MAX_HISTORY)..];
    if !recent.is_empty() {
        prompt.push_str("\n\nThe user has recently categorized these ingredients:\n");
        let lines = recent
            .iter()
            .map(|entry| format!("- {}: {}", entry.name, entry.category))
            .collect::<Vec<_>>()
            .join("\n");
        prompt.push_str(&lines);
    }

    prompt
}

/// Turns whatever JSON the provider produced into a valid result. Never fails.
pub fn normalize_categorization(reply: &Value) -> CategorizationResult {
    let category = reply
        .get("category")
        .and_then(Value::as_str)
        .and_then(Category::from_string);

    let confidence = match category {
        Some(_) => reply
            .get("confidence")
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_CONFIDENCE)
            .clamp(0.0, 1.0),
        None => {
            log::warn!(
                "⚠️ Category {:?} is outside the taxonomy, falling back to Other",
                reply.get("category")
            );
            FALLBACK_CONFIDENCE
        }
    };

    let suggestions = reply
        .get("suggestions")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .filter_map(Category::from_string)
                .collect()
        })
        .unwrap_or_default();

    CategorizationResult {
        category: category.unwrap_or(Category::Other),
        confidence,
        suggestions,
    }
}
