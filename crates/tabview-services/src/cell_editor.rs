//! Inline cell editor
//!
//! Single-cell edit state machine:
//!
//! ```text
//! Idle --begin--> Editing --commit--> Saving --ok--> Idle (+ re-fetch)
//!                  ^  |                  |
//!                  |  +--cancel--> Idle  +--err--> Failed --acknowledge--> Editing
//!                  +----------------------------------------------------------+
//! ```
//!
//! At most one session exists. The grid is never patched locally: a
//! successful save asks for a re-fetch and the engine's answer is what the
//! user sees.
//!
//! A session in Saving can be cancelled or replaced by a new edit. The
//! request already sent still completes; its answer is then detached from
//! any session and the browser reports a failure as a notice.

use std::sync::Arc;

use tabview_core::{QueryEngine, Record, cell_text, record_id};

use crate::error::{RemoteOperation, ServiceError, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditStatus {
    #[default]
    Idle,
    Editing,
    Saving,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellEditSession {
    pub record_id: String,
    pub field_name: String,
    pub original_value: String,
    pub pending_value: String,
    pub status: EditStatus,
    /// Validation message or failure alert to surface next to the cell
    pub message: Option<String>,
}

impl CellEditSession {
    fn is_cell(&self, record_id: &str, field_name: &str) -> bool {
        self.record_id == record_id && self.field_name == field_name
    }
}

/// The request a commit produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldUpdate {
    pub record_id: String,
    pub field_name: String,
    /// Trimmed, never empty
    pub value: String,
}

impl FieldUpdate {
    /// Prepare the update for sending without holding on to the editor
    pub fn into_pending(self, engine: Arc<dyn QueryEngine>, session_id: &str) -> PendingSave {
        PendingSave {
            update: self,
            engine,
            session_id: session_id.to_string(),
        }
    }
}

pub struct PendingSave {
    update: FieldUpdate,
    engine: Arc<dyn QueryEngine>,
    session_id: String,
}

impl PendingSave {
    pub fn update(&self) -> &FieldUpdate {
        &self.update
    }

    #[tracing::instrument(skip(self), fields(record_id = %self.update.record_id, field = %self.update.field_name))]
    pub async fn resolve(self) -> SaveCompletion {
        let outcome = self
            .engine
            .update_field(
                &self.session_id,
                &self.update.record_id,
                &self.update.field_name,
                &self.update.value,
            )
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "field update failed");
                ServiceError::remote(RemoteOperation::Update, &e)
            });
        SaveCompletion {
            update: self.update,
            outcome,
        }
    }
}

#[derive(Debug)]
pub struct SaveCompletion {
    pub update: FieldUpdate,
    pub outcome: Result<(), ServiceError>,
}

/// What a finished save means for the editor
#[derive(Debug, Clone, PartialEq)]
pub enum SaveResolution {
    /// The update was stored; the grid must be re-fetched
    Saved,
    /// The update failed and the session now shows the alert
    Failed,
    /// The update failed after its session was cancelled or replaced
    Detached(ServiceError),
}

#[derive(Debug, Default)]
pub struct InlineCellEditor {
    session: Option<CellEditSession>,
}

impl InlineCellEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&CellEditSession> {
        self.session.as_ref()
    }

    pub fn status(&self) -> EditStatus {
        self.session
            .as_ref()
            .map(|s| s.status)
            .unwrap_or(EditStatus::Idle)
    }

    pub fn is_editing(&self, record_id: &str, field_name: &str) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.is_cell(record_id, field_name))
    }

    /// Start editing `field_name` of `record`.
    ///
    /// Fails without any transition if the row has no `id`/`_id`. Any other
    /// session is dropped unsaved; a Saving one is detached from its request.
    pub fn begin(&mut self, record: &Record, field_name: &str) -> Result<(), ValidationError> {
        let Some(id) = record_id(record) else {
            tracing::warn!(field = field_name, "cannot edit a row without id or _id");
            return Err(ValidationError::MissingRecordId);
        };

        if self.is_editing(&id, field_name) {
            return Ok(());
        }

        if let Some(previous) = self.session.take() {
            tracing::debug!(
                record_id = %previous.record_id,
                field = %previous.field_name,
                status = ?previous.status,
                "previous edit dropped unsaved"
            );
        }

        let original_value = cell_text(record, field_name);
        self.session = Some(CellEditSession {
            record_id: id,
            field_name: field_name.to_string(),
            pending_value: original_value.clone(),
            original_value,
            status: EditStatus::Editing,
            message: None,
        });
        Ok(())
    }

    /// Replace the pending value as the user types
    pub fn set_value(&mut self, value: impl Into<String>) -> Result<(), ValidationError> {
        let session = self.editing_session_mut()?;
        session.pending_value = value.into();
        session.message = None;
        Ok(())
    }

    /// Discard the edit. A Saving session is detached from its request.
    pub fn cancel(&mut self) -> Option<CellEditSession> {
        self.session.take()
    }

    /// Commit the pending value.
    ///
    /// - empty after trimming: rejected, session stays in Editing with a message
    /// - otherwise: session moves to Saving and the update to send is returned
    pub fn commit(&mut self) -> Result<FieldUpdate, ValidationError> {
        let session = self.editing_session_mut()?;
        let value = session.pending_value.trim().to_string();

        if value.is_empty() {
            session.message = Some(ValidationError::EmptyEditValue.to_string());
            return Err(ValidationError::EmptyEditValue);
        }

        session.status = EditStatus::Saving;
        session.message = None;
        Ok(FieldUpdate {
            record_id: session.record_id.clone(),
            field_name: session.field_name.clone(),
            value,
        })
    }

    /// Losing focus saves, like pressing enter
    pub fn blur(&mut self) -> Result<FieldUpdate, ValidationError> {
        self.commit()
    }

    /// Record the engine's answer to `completion.update`.
    ///
    /// A completion for a session that has since been cancelled or replaced
    /// leaves the current session alone.
    pub fn complete_save(&mut self, completion: &SaveCompletion) -> SaveResolution {
        let update = &completion.update;
        let owns_session = self.session.as_ref().is_some_and(|s| {
            s.status == EditStatus::Saving && s.is_cell(&update.record_id, &update.field_name)
        });

        match &completion.outcome {
            Ok(()) => {
                if owns_session {
                    self.session = None;
                }
                SaveResolution::Saved
            }
            Err(e) => match self.session.as_mut().filter(|_| owns_session) {
                Some(session) => {
                    session.status = EditStatus::Failed;
                    session.message = Some(e.to_string());
                    SaveResolution::Failed
                }
                None => SaveResolution::Detached(e.clone()),
            },
        }
    }

    /// Dismiss the failure alert and return to Editing with the failed value
    pub fn acknowledge_failure(&mut self) -> Option<String> {
        let session = self.session.as_mut()?;
        if session.status != EditStatus::Failed {
            return None;
        }
        session.status = EditStatus::Editing;
        session.message.take()
    }

    fn editing_session_mut(&mut self) -> Result<&mut CellEditSession, ValidationError> {
        match self.session.as_mut() {
            Some(session) if session.status == EditStatus::Editing => Ok(session),
            _ => Err(ValidationError::NotEditing),
        }
    }
}
