use serde_json::Value;
use std::sync::Arc;

use super::decode_reply;
use crate::error::ApiError;
use crate::models::{Category, ParseResponse, ParsedIngredient};
use crate::services::{CompletionProvider, CompletionRequest};

pub struct IngredientParser {
    ai: Arc<dyn CompletionProvider>,
}

impl IngredientParser {
    pub fn new(ai: Arc<dyn CompletionProvider>) -> Self {
        Self { ai }
    }

    pub async fn parse(&self, text: &str) -> Result<ParseResponse, ApiError> {
        if text.trim().is_empty() {
            return Err(ApiError::InvalidInput("text must be a non-empty string".to_string()));
        }

        log::info!(
            "📝 Parsing ingredient description ({} chars)",
            text.chars().count()
        );

        let request = CompletionRequest {
            system: build_system_prompt(),
            user: format!(
                "Parse the following ingredient description into structured JSON format: \"{}\"",
                text
            ),
            temperature: 0.3,
            max_tokens: 1000,
            json_mode: true,
        };

        let completion = self.ai.complete(&request).await?;
        let (reply, usage) = decode_reply(completion)?;
        let ingredients = sanitize_ingredients(&reply)?;

        log::info!("✅ Parsed {} ingredient(s)", ingredients.len());

        Ok(ParseResponse { ingredients, usage })
    }
}

fn build_system_prompt() -> String {
    format!(
        "You are a kitchen assistant that extracts ingredients from free text.\n\
         \n\
         For every ingredient mentioned:\n\
         - name: singular form, first letter capitalized (\"tomatoes\" -> \"Tomato\").\n\
         - quantity: a number. Use 1 when no amount is given.\n\
         - unit: short canonical form (g, kg, ml, l, tsp, tbsp, cup, oz, lb). Use \"pieces\" for countable items or when no unit is given.\n\
         - category: exactly one of: {}\n\
         \n\
         Respond with a JSON object only, in this format:\n\
         {{\"ingredients\": [{{\"name\": \"Apple\", \"quantity\": 3, \"unit\": \"pieces\", \"category\": \"Fruits\"}}]}}",
        Category::taxonomy_list()
    )
}

/// Keeps well-typed entries in order, trimmed and clamped. Ill-typed entries are dropped.
///
/// Categories are trimmed but deliberately not coerced into the taxonomy.
pub fn sanitize_ingredients(reply: &Value) -> Result<Vec<ParsedIngredient>, ApiError> {
    let entries = reply
        .get("ingredients")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            ApiError::UpstreamFormat("reply has no \"ingredients\" array".to_string())
        })?;

    let ingredients: Vec<ParsedIngredient> = entries.iter().filter_map(sanitize_entry).collect();

    let dropped = entries.len() - ingredients.len();
    if dropped > 0 {
        log::warn!("⚠️ Dropped {} malformed ingredient entries", dropped);
    }

    Ok(ingredients)
}

fn sanitize_entry(entry: &Value) -> Option<ParsedIngredient> {
    let name = entry.get("name")?.as_str()?.trim();
    if name.is_empty() {
        return None;
    }
    let quantity = entry.get("quantity")?.as_f64()?;
    let unit = entry.get("unit")?.as_str()?;
    let category = entry.get("category")?.as_str()?;

    Some(ParsedIngredient {
        name: name.to_string(),
        quantity: quantity.max(0.0),
        unit: unit.trim().to_string(),
        category: category.trim().to_string(),
    })
}
