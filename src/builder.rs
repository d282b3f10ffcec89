use std::sync::Arc;

use crate::cache::{CacheStore, JsonFileCacheStore, MemoryCacheStore, ResponseCache};
use crate::config::AppConfig;
use crate::parser::RecipeParser;
use crate::providers::{build_system_prompt, ChatProvider, OpenAIProvider};
use crate::session::{ChatSession, SessionContext};
use crate::AssistantError;

/// Builder for configuring a [`ChatSession`]
#[derive(Default)]
pub struct ChatSessionBuilder {
    config: Option<AppConfig>,
    user_id: Option<String>,
    provider: Option<Arc<dyn ChatProvider>>,
    store: Option<Arc<dyn CacheStore>>,
    language: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
}

impl ChatSessionBuilder {
    /// Use an explicit configuration instead of the defaults
    ///
    /// # Example
    /// ```
    /// use fridgechef::{AppConfig, ChatSession};
    ///
    /// let builder = ChatSession::builder().config(AppConfig::default());
    /// ```
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Act on behalf of a signed-in user
    ///
    /// Without a user the session still answers, but never writes the cache.
    ///
    /// # Example
    /// ```
    /// use fridgechef::ChatSession;
    ///
    /// let builder = ChatSession::builder().user("uid-123");
    /// ```
    pub fn user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Use a custom assistant backend instead of OpenAI
    pub fn provider(mut self, provider: Arc<dyn ChatProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Use a custom cache store instead of the configured one
    pub fn cache_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Ask the assistant to write recipe content in `language`
    ///
    /// # Example
    /// ```
    /// use fridgechef::ChatSession;
    ///
    /// let builder = ChatSession::builder().language("Traditional Chinese");
    /// ```
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set the API key for the assistant
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the model name for the assistant
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Build the session
    ///
    /// # Errors
    /// Returns `AssistantError` if:
    /// - No provider was given and no API key is configured
    /// - The configured cache file cannot be read
    ///
    /// # Example
    /// ```no_run
    /// # use fridgechef::ChatSession;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let session = ChatSession::builder()
    ///     .user("uid-123")
    ///     .api_key("sk-...")
    ///     .build()
    ///     .await?;
    /// let reply = session.send("I have eggs and tomatoes").await?;
    /// println!("{:?}", reply.recipe.title);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build(self) -> Result<ChatSession, AssistantError> {
        let mut config = self.config.unwrap_or_default();
        if let Some(key) = self.api_key {
            config.assistant.api_key = Some(key);
        }
        if let Some(model) = self.model {
            config.assistant.model = model;
        }

        let provider = match self.provider {
            Some(provider) => provider,
            None => Arc::new(OpenAIProvider::new(&config.assistant)?),
        };

        let cache = if config.cache.enabled {
            let store: Arc<dyn CacheStore> = match (self.store, &config.cache.path) {
                (Some(store), _) => store,
                (None, Some(path)) => Arc::new(JsonFileCacheStore::open(path).await?),
                (None, None) => Arc::new(MemoryCacheStore::new()),
            };
            Some(ResponseCache::new(store, config.cache.scope))
        } else {
            if self.store.is_some() {
                return Err(AssistantError::Builder(
                    "A cache store was given but the cache is disabled".to_string(),
                ));
            }
            None
        };

        let context = SessionContext {
            user_id: self.user_id,
        };

        Ok(ChatSession::new(
            context,
            provider,
            cache,
            RecipeParser::new(&config.parser),
            build_system_prompt(self.language.as_deref()),
            config.assistant.history_limit,
        ))
    }
}
