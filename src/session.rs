//! Per-user chat session.
//!
//! A session owns the transcript, the response cache policy and the
//! background cache writes it started. Each [`ChatSession::send`] runs one
//! chain: lookup, then on a miss the live call and a cache write, then the
//! parse. Cache writes run as tracked tasks; [`ChatSession::close`] or
//! dropping the session aborts the ones still in flight.

use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinSet;

use crate::cache::{CacheKey, ResponseCache};
use crate::error::AssistantError;
use crate::model::{ChatMessage, ParsedRecipe, Role};
use crate::parser::RecipeParser;
use crate::providers::{ChatProvider, PromptMessage};

/// Who the session acts for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    /// Signed-in user; `None` means cache writes are skipped
    pub user_id: Option<String>,
}

impl SessionContext {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

/// Outcome of one [`ChatSession::send`].
#[derive(Debug, Clone)]
pub struct ChatReply {
    /// Assistant message as recorded in the transcript
    pub message: ChatMessage,
    pub recipe: ParsedRecipe,
    /// True when the text came from the cache instead of a live call
    pub from_cache: bool,
}

pub struct ChatSession {
    context: SessionContext,
    provider: Arc<dyn ChatProvider>,
    cache: Option<ResponseCache>,
    parser: RecipeParser,
    system_prompt: String,
    history_limit: usize,
    transcript: Mutex<Vec<ChatMessage>>,
    pending_writes: Mutex<JoinSet<()>>,
    closed: AtomicBool,
}

impl ChatSession {
    pub(crate) fn new(
        context: SessionContext,
        provider: Arc<dyn ChatProvider>,
        cache: Option<ResponseCache>,
        parser: RecipeParser,
        system_prompt: String,
        history_limit: usize,
    ) -> Self {
        Self {
            context,
            provider,
            cache,
            parser,
            system_prompt,
            history_limit,
            transcript: Mutex::new(Vec::new()),
            pending_writes: Mutex::new(JoinSet::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Creates a new builder for a session
    pub fn builder() -> crate::builder::ChatSessionBuilder {
        crate::builder::ChatSessionBuilder::default()
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn parser(&self) -> &RecipeParser {
        &self.parser
    }

    /// Send a user prompt and return the parsed assistant reply.
    ///
    /// Cache lookup failures fall through to a live call. A failed live
    /// call is returned as an error; a failed cache write is only logged.
    pub async fn send(&self, prompt: &str) -> Result<ChatReply, AssistantError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(AssistantError::SessionClosed);
        }

        let key = CacheKey::normalize(prompt);
        if key.is_empty() {
            return Err(AssistantError::EmptyPrompt);
        }

        let history = self.history().await;
        self.record(ChatMessage::user(key.as_str())).await;

        let user_id = self.context.user_id.as_deref();
        let cached = match &self.cache {
            Some(cache) => match cache.lookup(&key, user_id).await {
                Ok(hit) => hit,
                Err(e) => {
                    warn!("Cache lookup failed, calling assistant: {}", e);
                    None
                }
            },
            None => None,
        };

        let (text, from_cache) = match cached {
            Some(entry) => (entry.response, true),
            None => {
                let mut messages = history;
                messages.push(PromptMessage::new(Role::User, key.as_str()));

                info!(
                    "Calling {} with {} messages",
                    self.provider.provider_name(),
                    messages.len()
                );
                let text = self.provider.complete(&messages).await.map_err(|e| {
                    error!("Assistant call failed: {}", e);
                    e
                })?;

                self.spawn_cache_write(key, text.clone()).await;
                (text, false)
            }
        };

        let recipe = self.parser.parse(&text);
        let message = ChatMessage::assistant(text, recipe.clone());
        self.record(message.clone()).await;

        Ok(ChatReply {
            message,
            recipe,
            from_cache,
        })
    }

    /// Snapshot of the transcript, oldest first.
    pub async fn transcript(&self) -> Vec<ChatMessage> {
        let mut messages = self.transcript.lock().await.clone();
        messages.sort_by_key(|m| m.timestamp);
        messages
    }

    /// Wait for every background cache write started so far.
    pub async fn flush(&self) {
        let mut pending = self.pending_writes.lock().await;
        while let Some(result) = pending.join_next().await {
            if let Err(e) = result {
                if !e.is_cancelled() {
                    warn!("Cache write task failed: {}", e);
                }
            }
        }
    }

    /// Refuse further prompts and abort cache writes still in flight.
    pub async fn close(&self) {
        self.closed.store(true, Ordering::Release);
        let mut pending = self.pending_writes.lock().await;
        if !pending.is_empty() {
            debug!("Aborting {} pending cache writes", pending.len());
        }
        pending.abort_all();
        while pending.join_next().await.is_some() {}
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// System prompt plus the most recent non-blank transcript messages.
    async fn history(&self) -> Vec<PromptMessage> {
        let transcript = self.transcript.lock().await;
        let recent: Vec<&ChatMessage> = transcript
            .iter()
            .filter(|m| !m.content.trim().is_empty())
            .collect();
        let start = recent.len().saturating_sub(self.history_limit);

        let mut messages = Vec::with_capacity(recent.len() - start + 2);
        messages.push(PromptMessage::new(Role::System, self.system_prompt.as_str()));
        messages.extend(recent[start..].iter().map(|m| PromptMessage::from(*m)));
        messages
    }

    async fn record(&self, message: ChatMessage) {
        self.transcript.lock().await.push(message);
    }

    async fn spawn_cache_write(&self, key: CacheKey, text: String) {
        let Some(cache) = self.cache.clone() else {
            return;
        };
        let Some(user_id) = self.context.user_id.clone() else {
            warn!("No user is signed in, not caching response for {:?}", key.as_str());
            return;
        };

        let mut pending = self.pending_writes.lock().await;
        // close() may have run while the live call was in flight
        if self.closed.load(Ordering::Acquire) {
            debug!("Session closed, not caching response for {:?}", key.as_str());
            return;
        }
        // Reap writes that already finished
        while pending.try_join_next().is_some() {}

        pending.spawn(async move {
            match cache.store(&key, &text, Some(&user_id)).await {
                Ok(entry) => info!("Saved cache response {}", entry.id),
                Err(e) => warn!("Cannot save cache response: {}", e),
            }
        });
    }
}
