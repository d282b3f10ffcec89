pub mod builder;
pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod providers;
pub mod session;
pub mod uniffi_bindings;

// Re-export key types for convenience
pub use builder::ChatSessionBuilder;
pub use cache::{CacheKey, CacheScope, CacheStore, JsonFileCacheStore, MemoryCacheStore, ResponseCache};
pub use config::AppConfig;
pub use error::AssistantError;
pub use model::{CachedResponse, ChatMessage, ParsedIngredient, ParsedRecipe, Role};
pub use parser::{MarkerMatching, RecipeParser};
pub use providers::{ChatProvider, OpenAIProvider, PromptMessage, RECIPE_ASSISTANT_PROMPT};
pub use session::{ChatReply, ChatSession, SessionContext};

/// Parse an assistant reply with the default parser settings.
///
/// Never fails: text without any section marker comes back with only
/// `unparsed_content` set.
///
/// # Example
/// ```
/// let recipe = fridgechef::parse_recipe("🥙 Recipe Name: Toast\n🥬【Ingredients】\n• 2 slices bread");
/// assert_eq!(recipe.title.as_deref(), Some("Toast"));
/// assert_eq!(recipe.ingredients[0].unit, "slices");
/// ```
pub fn parse_recipe(message: &str) -> ParsedRecipe {
    RecipeParser::default().parse(message)
}

/// Cache key for a user prompt: surrounding whitespace removed, case kept.
///
/// # Example
/// ```
/// assert_eq!(fridgechef::normalize_prompt("  Apple pie \n"), "Apple pie");
/// ```
pub fn normalize_prompt(prompt: &str) -> String {
    CacheKey::normalize(prompt).as_str().to_string()
}
