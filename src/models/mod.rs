use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    Vegetables,
    Fruits,
    Meat,
    Dairy,
    Grains,
    Spices,
    Condiments,
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Vegetables,
        Category::Fruits,
        Category::Meat,
        Category::Dairy,
        Category::Grains,
        Category::Spices,
        Category::Condiments,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Vegetables => "Vegetables",
            Category::Fruits => "Fruits",
            Category::Meat => "Meat",
            Category::Dairy => "Dairy",
            Category::Grains => "Grains",
            Category::Spices => "Spices",
            Category::Condiments => "Condiments",
            Category::Other => "Other",
        }
    }

    /// Exact, case-sensitive match against the taxonomy.
    pub fn from_string(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }

    /// Comma separated list for prompts, e.g. "Vegetables, Fruits, ...".
    pub fn taxonomy_list() -> String {
        Self::ALL
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorizationResult {
    pub category: Category,
    pub confidence: f64,
    pub suggestions: Vec<Category>,
}

/// A previous categorization supplied by the caller. Only used as prompt context.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub name: String,
    pub category: String,
}

impl HistoryEntry {
    /// Lenient read: strings verbatim, other JSON values as their JSON text, missing as "".
    pub fn from_value(value: &serde_json::Value) -> Self {
        let field = |key: &str| match value.get(key) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };

        Self {
            name: field("name"),
            category: field("category"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedIngredient {
    pub name: String,
    #[serde(serialize_with = "serialize_quantity")]
    pub quantity: f64,
    pub unit: String,
    /// Trimmed but not checked against the taxonomy.
    pub category: String,
}

// Whole quantities go out as integers so "3" does not come back as "3.0".
fn serialize_quantity<S>(quantity: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if quantity.fract() == 0.0 && quantity.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*quantity as i64)
    } else {
        serializer.serialize_f64(*quantity)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorizeResponse {
    #[serde(flatten)]
    pub result: CategorizationResult,
    pub usage: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParseResponse {
    pub ingredients: Vec<ParsedIngredient>,
    pub usage: Option<serde_json::Value>,
}
