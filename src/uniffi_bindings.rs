//! UniFFI bindings for fridgechef
//!
//! This module provides FFI-compatible types and functions for use with iOS and Android.
//! Only the pure parsing side is exported; the mobile shell owns networking and storage.

use chrono::NaiveTime;

use crate::model::{ParsedIngredient, ParsedRecipe};
use crate::parser::{MarkerMatching, RecipeParser};

// Re-export UniFFI macro
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();

/// FFI-compatible ingredient
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiParsedIngredient {
    pub id: String,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    /// Expiration day as seconds since the Unix epoch, at midnight UTC
    pub expiration_timestamp: i64,
}

impl From<ParsedIngredient> for FfiParsedIngredient {
    fn from(ingredient: ParsedIngredient) -> Self {
        FfiParsedIngredient {
            id: ingredient.id.to_string(),
            name: ingredient.name,
            quantity: ingredient.quantity,
            unit: ingredient.unit,
            expiration_timestamp: ingredient
                .expiration_date
                .and_time(NaiveTime::MIN)
                .and_utc()
                .timestamp(),
        }
    }
}

/// FFI-compatible recipe structure
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiParsedRecipe {
    pub title: Option<String>,
    pub ingredients: Vec<FfiParsedIngredient>,
    pub steps: Vec<String>,
    pub link: Option<String>,
    pub tips: Option<String>,
    pub unparsed_content: Option<String>,
}

impl From<ParsedRecipe> for FfiParsedRecipe {
    fn from(recipe: ParsedRecipe) -> Self {
        FfiParsedRecipe {
            title: recipe.title,
            ingredients: recipe.ingredients.into_iter().map(Into::into).collect(),
            steps: recipe.steps,
            link: recipe.link,
            tips: recipe.tips,
            unparsed_content: recipe.unparsed_content,
        }
    }
}

/// Parser options accepted across the FFI boundary
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiParseConfig {
    /// Days until parsed ingredients expire (uses default if not specified)
    pub expiration_days: Option<i64>,
    /// Recognize section markers anywhere in a line, not only at its start
    pub match_markers_anywhere: bool,
}

/// Parse an assistant reply into a recipe
///
/// # Arguments
/// * `message` - The full assistant reply text
/// * `config` - Optional parser settings
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn parse_recipe_message(message: String, config: Option<FfiParseConfig>) -> FfiParsedRecipe {
    let config = config.unwrap_or_default();

    let mut parser = RecipeParser::default();
    if let Some(days) = config.expiration_days {
        parser = parser.with_expiration_days(days);
    }
    if config.match_markers_anywhere {
        parser = parser.with_marker_matching(MarkerMatching::Contains);
    }

    parser.parse(&message).into()
}

/// Cache key for a prompt
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn normalize_prompt(prompt: String) -> String {
    crate::normalize_prompt(&prompt)
}

/// Get the library version
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recipe_message() {
        let recipe = parse_recipe_message(
            "🥙 Recipe Name: Salad\n🥬【Ingredients】\n• 1 head lettuce".to_string(),
            None,
        );
        assert_eq!(recipe.title.as_deref(), Some("Salad"));
        assert_eq!(recipe.ingredients.len(), 1);
        assert_eq!(recipe.ingredients[0].unit, "head");
        assert!(!recipe.ingredients[0].id.is_empty());
    }

    #[test]
    fn test_parse_config_is_applied() {
        let message = "Step list: 【Cooking Steps】\n1. Chop".to_string();
        let anchored = parse_recipe_message(message.clone(), None);
        assert!(anchored.steps.is_empty());

        let anywhere = parse_recipe_message(
            message,
            Some(FfiParseConfig {
                expiration_days: Some(1),
                match_markers_anywhere: true,
            }),
        );
        assert_eq!(anywhere.steps, vec!["Chop"]);
    }

    #[test]
    fn test_normalize_prompt_ffi() {
        assert_eq!(normalize_prompt("  Apple ".to_string()), "Apple");
    }

    #[test]
    fn test_get_version() {
        let version = get_version();
        assert!(!version.is_empty());
    }
}
