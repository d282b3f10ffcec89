use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One ingredient pulled out of an assistant reply.
///
/// `id` is generated per parse and is not part of equality: two parses of the
/// same text compare equal even though their ids differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedIngredient {
    pub id: Uuid,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    /// Day the ingredient is expected to go off
    pub expiration_date: NaiveDate,
}

impl PartialEq for ParsedIngredient {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.quantity == other.quantity
            && self.unit == other.unit
            && self.expiration_date == other.expiration_date
    }
}

/// Structured recipe extracted from one assistant message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedRecipe {
    pub title: Option<String>,
    pub ingredients: Vec<ParsedIngredient>,
    pub steps: Vec<String>,
    pub link: Option<String>,
    pub tips: Option<String>,
    pub unparsed_content: Option<String>,
}

impl ParsedRecipe {
    /// Recipe for a message in which no section marker was recognized.
    pub fn unstructured(message: &str) -> Self {
        ParsedRecipe {
            unparsed_content: Some(message.to_string()),
            ..Default::default()
        }
    }

    /// True when at least one structured field was populated.
    pub fn has_structure(&self) -> bool {
        self.title.is_some()
            || !self.ingredients.is_empty()
            || !self.steps.is_empty()
            || self.link.is_some()
            || self.tips.is_some()
    }
}

/// An assistant answer stored under its normalized prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedResponse {
    pub id: Uuid,
    /// User whose live call produced this answer
    pub user_id: String,
    pub normalized_prompt: String,
    pub response: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One entry of a session transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Present on assistant messages only
    pub parsed_recipe: Option<ParsedRecipe>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            id: Uuid::new_v4(),
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
            parsed_recipe: None,
        }
    }

    pub fn assistant(content: impl Into<String>, recipe: ParsedRecipe) -> Self {
        ChatMessage {
            id: Uuid::new_v4(),
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
            parsed_recipe: Some(recipe),
        }
    }
}
