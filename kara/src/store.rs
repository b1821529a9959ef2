//! ThreadStore - bookmarked threads for this session
//!
//! Threads are kept most-recent-first. Deep research runs against a snapshot of
//! the thread's turns; the `synthesis_in_progress` flag is set before the
//! remote call and cleared when it resolves, whatever the outcome.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::advisor::Advisor;
use crate::domain::{Synthesis, Thread, ThreadId, WorkshopContent};
use crate::error::{KaraError, PreconditionError};

/// Handle to the session's saved threads
#[derive(Clone)]
pub struct ThreadStore {
    advisor: Arc<dyn Advisor>,
    threads: Arc<Mutex<Vec<Thread>>>,
}

impl ThreadStore {
    pub fn new(advisor: Arc<dyn Advisor>) -> Self {
        debug!("ThreadStore::new: called");
        Self {
            advisor,
            threads: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Save a thread at the front of the list
    pub async fn add(&self, thread: Thread) -> ThreadId {
        debug!(thread_id = %thread.id, "ThreadStore::add: called");
        let id = thread.id.clone();
        self.threads.lock().await.insert(0, thread);
        info!(thread_id = %id, "Thread saved");
        id
    }

    /// Run deep research over a saved thread
    ///
    /// On success the nuances are stored ascending by importance. On failure
    /// any earlier synthesis is kept.
    pub async fn request_synthesis(&self, id: &ThreadId) -> Result<Synthesis, KaraError> {
        debug!(thread_id = %id, "ThreadStore::request_synthesis: called");
        let (title, turns) = {
            let mut threads = self.threads.lock().await;
            let thread = threads
                .iter_mut()
                .find(|t| &t.id == id)
                .ok_or_else(|| PreconditionError::ThreadNotFound(id.clone()))?;
            thread.synthesis_in_progress = true;
            (thread.original_topic_title.clone(), thread.turns.clone())
        };

        let result = self
            .advisor
            .fetch_synthesis(&title, &turns)
            .await
            .map(|s| Synthesis::ranked(s.summary, s.nuances));

        let mut threads = self.threads.lock().await;
        let thread = threads
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| PreconditionError::ThreadNotFound(id.clone()))?;
        thread.synthesis_in_progress = false;

        match result {
            Ok(synthesis) => {
                info!(thread_id = %id, nuances = synthesis.nuances.len(), "Deep research complete");
                thread.synthesis = Some(synthesis.clone());
                Ok(synthesis)
            }
            Err(e) => {
                warn!(thread_id = %id, error = %e, "Deep research failed");
                Err(e)
            }
        }
    }

    /// Replace the workshop content of nuance `index`
    pub async fn update_nuance_workshop(
        &self,
        id: &ThreadId,
        index: usize,
        content: WorkshopContent,
    ) -> Result<(), KaraError> {
        debug!(thread_id = %id, %index, "ThreadStore::update_nuance_workshop: called");
        let mut threads = self.threads.lock().await;
        let thread = threads
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| PreconditionError::ThreadNotFound(id.clone()))?;
        let synthesis = thread
            .synthesis
            .as_mut()
            .ok_or_else(|| PreconditionError::NoSynthesis(id.clone()))?;
        let len = synthesis.nuances.len();
        let nuance = synthesis
            .nuances
            .get_mut(index)
            .ok_or(PreconditionError::NuanceOutOfRange { index, len })?;

        nuance.workshop = Some(content);
        info!(thread_id = %id, %index, nuance = %nuance.title, "Workshop saved");
        Ok(())
    }

    pub async fn find(&self, id: &ThreadId) -> Option<Thread> {
        self.threads.lock().await.iter().find(|t| &t.id == id).cloned()
    }

    /// All threads, most recent first
    pub async fn list(&self) -> Vec<Thread> {
        self.threads.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.threads.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.threads.lock().await.is_empty()
    }
}
