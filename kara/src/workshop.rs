//! WorkshopSession - guidance workshop for one nuance
//!
//! Three editable planning fields, each of which can ask the advisor for
//! replacement text. Different fields generate concurrently; a second request
//! for a field that is already generating is rejected.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::advisor::Advisor;
use crate::domain::{FieldMap, Nuance, ThreadId, WorkshopContent, WorkshopField};
use crate::error::{KaraError, PreconditionError};
use crate::store::ThreadStore;

/// Generation state of one field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldStatus {
    #[default]
    Idle,
    Generating,
}

/// Current state of one field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldView {
    pub text: String,
    pub status: FieldStatus,
    /// Message from the last failed generation, cleared on the next attempt
    pub error: Option<String>,
}

/// The nuance a session is editing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkshopTarget {
    pub thread_id: ThreadId,
    pub nuance_index: usize,
    pub nuance_title: String,
    pub nuance_detail: String,
}

#[derive(Debug, Default)]
struct WorkshopState {
    target: Option<WorkshopTarget>,
    fields: FieldMap<FieldView>,
    /// Bumped whenever the target changes; results from an older epoch are dropped
    epoch: u64,
}

/// Handle to the workshop session
#[derive(Clone)]
pub struct WorkshopSession {
    advisor: Arc<dyn Advisor>,
    state: Arc<Mutex<WorkshopState>>,
}

impl WorkshopSession {
    pub fn new(advisor: Arc<dyn Advisor>) -> Self {
        debug!("WorkshopSession::new: called");
        Self {
            advisor,
            state: Arc::new(Mutex::new(WorkshopState::default())),
        }
    }

    /// Open the workshop on nuance `index` of a thread
    ///
    /// Fields start from the nuance's saved content, or empty.
    pub async fn load_nuance(&self, thread_id: ThreadId, index: usize, nuance: &Nuance) {
        debug!(thread_id = %thread_id, %index, nuance = %nuance.title, "WorkshopSession::load_nuance: called");
        let saved = nuance.workshop.clone().unwrap_or_default();

        let mut state = self.state.lock().await;
        state.epoch += 1;
        state.target = Some(WorkshopTarget {
            thread_id,
            nuance_index: index,
            nuance_title: nuance.title.clone(),
            nuance_detail: nuance.detail.clone(),
        });
        for field in WorkshopField::ALL {
            *state.fields.get_mut(field) = FieldView {
                text: saved.get(field).to_string(),
                ..Default::default()
            };
        }
        info!(nuance = %nuance.title, "Workshop opened");
    }

    /// Replace a field's text
    pub async fn edit_field(&self, field: WorkshopField, text: impl Into<String>) {
        debug!(%field, "WorkshopSession::edit_field: called");
        self.state.lock().await.fields.get_mut(field).text = text.into();
    }

    /// Ask the advisor to rewrite one field
    ///
    /// The current text is sent along. On success it is replaced wholesale; on
    /// failure it is kept and the field records the error message.
    pub async fn generate_field(&self, field: WorkshopField) -> Result<String, KaraError> {
        debug!(%field, "WorkshopSession::generate_field: called");
        let (nuance_title, existing, epoch) = {
            let mut state = self.state.lock().await;
            let nuance_title = state
                .target
                .as_ref()
                .map(|t| t.nuance_title.clone())
                .ok_or(PreconditionError::NoWorkshopTarget)?;
            let epoch = state.epoch;
            let view = state.fields.get_mut(field);
            if view.status == FieldStatus::Generating {
                return Err(PreconditionError::AlreadyGenerating(field).into());
            }
            view.status = FieldStatus::Generating;
            view.error = None;
            (nuance_title, view.text.clone(), epoch)
        };

        let result = self
            .advisor
            .fetch_field_enhancement(&nuance_title, field, &existing)
            .await;

        let mut state = self.state.lock().await;
        if state.epoch != epoch {
            debug!(%field, "WorkshopSession::generate_field: target changed, dropping result");
            return result;
        }
        let view = state.fields.get_mut(field);
        view.status = FieldStatus::Idle;
        match &result {
            Ok(text) => {
                view.text = text.clone();
                info!(%field, nuance = %nuance_title, "Workshop field generated");
            }
            Err(e) => {
                warn!(%field, error = %e, "Workshop field generation failed");
                view.error = Some(e.user_message());
            }
        }
        result
    }

    /// Generate all three fields concurrently
    pub async fn generate_all(&self) -> Vec<(WorkshopField, Result<String, KaraError>)> {
        debug!("WorkshopSession::generate_all: called");
        let results = join_all(WorkshopField::ALL.iter().map(|f| self.generate_field(*f))).await;
        WorkshopField::ALL.into_iter().zip(results).collect()
    }

    /// Store the fields on the target nuance and close the session
    ///
    /// If the store rejects the update the session stays open.
    pub async fn save(&self, store: &ThreadStore) -> Result<WorkshopContent, KaraError> {
        debug!("WorkshopSession::save: called");
        let (target, content, epoch) = {
            let state = self.state.lock().await;
            let target = state.target.clone().ok_or(PreconditionError::NoWorkshopTarget)?;
            (target, Self::collect(&state), state.epoch)
        };

        store
            .update_nuance_workshop(&target.thread_id, target.nuance_index, content.clone())
            .await?;

        let mut state = self.state.lock().await;
        if state.epoch == epoch {
            Self::clear(&mut state);
        }
        Ok(content)
    }

    /// Close the session without saving
    pub async fn close(&self) {
        debug!("WorkshopSession::close: called");
        Self::clear(&mut *self.state.lock().await);
    }

    pub async fn field(&self, field: WorkshopField) -> FieldView {
        self.state.lock().await.fields.get(field).clone()
    }

    /// Current text of all three fields
    pub async fn content(&self) -> WorkshopContent {
        Self::collect(&*self.state.lock().await)
    }

    pub async fn target(&self) -> Option<WorkshopTarget> {
        self.state.lock().await.target.clone()
    }

    pub async fn is_open(&self) -> bool {
        self.state.lock().await.target.is_some()
    }

    fn collect(state: &WorkshopState) -> WorkshopContent {
        let mut content = WorkshopContent::default();
        for field in WorkshopField::ALL {
            content.set(field, state.fields.get(field).text.clone());
        }
        content
    }

    fn clear(state: &mut WorkshopState) {
        state.epoch += 1;
        state.target = None;
        state.fields = FieldMap::default();
    }
}
