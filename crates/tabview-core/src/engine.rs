//! Contract with the remote query engine

use async_trait::async_trait;

use crate::{
    ColumnDefinition, DeleteOutcome, ExportOutcome, HealthStatus, Metrics, QueryDescriptor,
    QueryResult, Result, SessionStatus,
};

/// The remote service that owns the table and executes every query.
///
/// Implementations only move descriptors and replies; they never evaluate
/// filters or sorts themselves.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    /// Short name of the engine backend, for logs (e.g. "http")
    fn engine_name(&self) -> &str;

    /// Execute `descriptor` and return the requested page.
    ///
    /// The result echoes the `current_page` and `page_size` the engine
    /// actually applied.
    async fn execute_query(
        &self,
        session_id: &str,
        descriptor: &QueryDescriptor,
    ) -> Result<QueryResult>;

    /// Column definitions for the session's table
    async fn get_schema(&self, session_id: &str) -> Result<Vec<ColumnDefinition>>;

    /// Set one field of one record. `value` is always trimmed and non-empty.
    async fn update_field(
        &self,
        session_id: &str,
        record_id: &str,
        field_name: &str,
        value: &str,
    ) -> Result<()>;

    /// Delete every row matching `descriptor` (paging is ignored by the engine)
    async fn delete_by_query(
        &self,
        session_id: &str,
        descriptor: &QueryDescriptor,
    ) -> Result<DeleteOutcome>;

    /// Export the whole table to a file on the engine host
    async fn export_table(&self, session_id: &str) -> Result<ExportOutcome>;

    /// Observational metrics; nothing in the browser depends on their contents
    async fn get_metrics(&self, session_id: &str) -> Result<Metrics>;

    /// Ids of every session the engine holds
    async fn list_sessions(&self) -> Result<Vec<String>>;

    /// Drop the session's table data; the session itself stays
    async fn clear_session(&self, session_id: &str) -> Result<()>;

    /// Whether the session has data loaded
    async fn session_status(&self, session_id: &str) -> Result<SessionStatus>;

    /// Engine liveness probe
    async fn health(&self) -> Result<HealthStatus>;
}
