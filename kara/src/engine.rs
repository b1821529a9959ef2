//! ConversationEngine - the in-progress conversation
//!
//! Holds the turns of one conversation plus at most one pending choice. The
//! engine is a cheap-clone handle: clones share state, so a shell can fire an
//! `advance()` on a spawned task and keep reading `turns()` meanwhile.
//!
//! Remote calls are never cancelled. Each `start`/`advance` applies the history
//! it saw when it was called plus its new turn, so when calls overlap the one
//! that resolves last determines the conversation.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::advisor::Advisor;
use crate::domain::{Choice, Thread, Topic, Turn};
use crate::error::{KaraError, PreconditionError};

#[derive(Debug, Default)]
struct ConversationState {
    /// Topic the conversation was started from
    origin: Option<Topic>,
    turns: Vec<Turn>,
    /// Choice to follow on the next `advance()`
    selected: Option<Choice>,
}

/// Handle to one in-progress conversation
#[derive(Clone)]
pub struct ConversationEngine {
    advisor: Arc<dyn Advisor>,
    state: Arc<Mutex<ConversationState>>,
}

impl ConversationEngine {
    pub fn new(advisor: Arc<dyn Advisor>) -> Self {
        debug!("ConversationEngine::new: called");
        Self {
            advisor,
            state: Arc::new(Mutex::new(ConversationState::default())),
        }
    }

    /// Begin a new conversation from `topic`
    ///
    /// Clears any existing turns and selection immediately. On failure the
    /// conversation stays empty.
    pub async fn start(&self, topic: Topic) -> Result<Turn, KaraError> {
        debug!(topic = %topic.title(), "ConversationEngine::start: called");
        {
            let mut state = self.state.lock().await;
            state.turns.clear();
            state.selected = None;
            state.origin = Some(topic.clone());
        }

        let recommendation = self.advisor.fetch_recommendation(&topic, &[]).await.map_err(|e| {
            warn!(topic = %topic.title(), error = %e, "ConversationEngine::start: recommendation failed");
            e
        })?;

        let turn = Turn {
            topic_title: topic.title().to_string(),
            topic_description: topic.description().to_string(),
            recommendation,
        };

        let mut state = self.state.lock().await;
        state.turns = vec![turn.clone()];
        state.origin = Some(topic);
        info!(topic = %turn.topic_title, "Conversation started");
        Ok(turn)
    }

    /// Mark choice `index` of the last turn as the next step
    pub async fn select_choice(&self, index: usize) -> Result<Choice, KaraError> {
        debug!(%index, "ConversationEngine::select_choice: called");
        let mut state = self.state.lock().await;
        let last = state.turns.last().ok_or(PreconditionError::EmptyConversation)?;
        let choice = last
            .recommendation
            .choices
            .get(index)
            .cloned()
            .ok_or(PreconditionError::ChoiceOutOfRange {
                index,
                len: last.recommendation.choices.len(),
            })?;
        state.selected = Some(choice.clone());
        Ok(choice)
    }

    /// Follow the pending choice
    ///
    /// Returns `Ok(None)` without contacting the advisor when nothing is
    /// selected. On failure the selection is put back (unless a newer one was
    /// made meanwhile) so calling `advance()` again retries.
    pub async fn advance(&self) -> Result<Option<Turn>, KaraError> {
        debug!("ConversationEngine::advance: called");
        let (choice, snapshot) = {
            let mut state = self.state.lock().await;
            let Some(choice) = state.selected.take() else {
                debug!("ConversationEngine::advance: no selection");
                return Ok(None);
            };
            (choice, state.turns.clone())
        };

        let topic = Topic::from_choice(&choice);
        let prior_titles: Vec<String> = snapshot.iter().map(|t| t.topic_title.clone()).collect();

        match self.advisor.fetch_recommendation(&topic, &prior_titles).await {
            Ok(recommendation) => {
                let turn = Turn {
                    topic_title: topic.title().to_string(),
                    topic_description: topic.description().to_string(),
                    recommendation,
                };
                let mut turns = snapshot;
                turns.push(turn.clone());

                let mut state = self.state.lock().await;
                state.turns = turns;
                info!(topic = %turn.topic_title, depth = state.turns.len(), "Conversation advanced");
                Ok(Some(turn))
            }
            Err(e) => {
                warn!(topic = %topic.title(), error = %e, "ConversationEngine::advance: recommendation failed");
                let mut state = self.state.lock().await;
                if state.selected.is_none() {
                    state.selected = Some(choice);
                }
                Err(e)
            }
        }
    }

    /// Snapshot the conversation as a new thread
    ///
    /// The conversation itself is left untouched.
    pub async fn bookmark(&self) -> Result<Thread, KaraError> {
        debug!("ConversationEngine::bookmark: called");
        let state = self.state.lock().await;
        let first = state.turns.first().ok_or(PreconditionError::EmptyConversation)?;
        let thread = Thread::new(first.topic_title.clone(), state.turns.clone());
        info!(thread_id = %thread.id, turns = thread.turns.len(), "Conversation bookmarked");
        Ok(thread)
    }

    /// Drop all turns, the selection and the origin
    pub async fn reset(&self) {
        debug!("ConversationEngine::reset: called");
        *self.state.lock().await = ConversationState::default();
    }

    pub async fn turns(&self) -> Vec<Turn> {
        self.state.lock().await.turns.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.turns.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.turns.is_empty()
    }

    pub async fn selected(&self) -> Option<Choice> {
        self.state.lock().await.selected.clone()
    }

    pub async fn origin(&self) -> Option<Topic> {
        self.state.lock().await.origin.clone()
    }
}
