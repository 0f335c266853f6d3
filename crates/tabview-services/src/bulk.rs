//! Bulk delete, export and clear requests

use std::sync::Arc;

use tabview_core::{DeleteOutcome, ExportOutcome, QueryDescriptor, QueryEngine};

use crate::error::{RemoteOperation, ServiceError};

/// Delete every row matching a descriptor snapshot
pub struct PendingDelete {
    descriptor: Arc<QueryDescriptor>,
    engine: Arc<dyn QueryEngine>,
    session_id: String,
}

impl PendingDelete {
    pub(crate) fn new(
        descriptor: Arc<QueryDescriptor>,
        engine: Arc<dyn QueryEngine>,
        session_id: &str,
    ) -> Self {
        Self {
            descriptor,
            engine,
            session_id: session_id.to_string(),
        }
    }

    pub fn descriptor(&self) -> &Arc<QueryDescriptor> {
        &self.descriptor
    }

    #[tracing::instrument(skip(self), fields(filters = self.descriptor.filters.len()))]
    pub async fn resolve(self) -> Result<DeleteOutcome, ServiceError> {
        self.engine
            .delete_by_query(&self.session_id, &self.descriptor)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "delete by query failed");
                ServiceError::remote(RemoteOperation::Delete, &e)
            })
    }
}

/// Export the session's table on the engine host
pub struct PendingExport {
    engine: Arc<dyn QueryEngine>,
    session_id: String,
}

impl PendingExport {
    pub(crate) fn new(engine: Arc<dyn QueryEngine>, session_id: &str) -> Self {
        Self {
            engine,
            session_id: session_id.to_string(),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn resolve(self) -> Result<ExportOutcome, ServiceError> {
        self.engine
            .export_table(&self.session_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "export failed");
                ServiceError::remote(RemoteOperation::Export, &e)
            })
    }
}

/// Drop every row of the session's table
pub struct PendingClear {
    engine: Arc<dyn QueryEngine>,
    session_id: String,
}

impl PendingClear {
    pub(crate) fn new(engine: Arc<dyn QueryEngine>, session_id: &str) -> Self {
        Self {
            engine,
            session_id: session_id.to_string(),
        }
    }

    #[tracing::instrument(skip(self), fields(session = %self.session_id))]
    pub async fn resolve(self) -> Result<(), ServiceError> {
        self.engine
            .clear_session(&self.session_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "clearing session data failed");
                ServiceError::remote(RemoteOperation::Clear, &e)
            })
    }
}
