//! Common test utilities and mocks

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tabview_core::{
    ColumnDefinition, ColumnType, DeleteOutcome, ExportOutcome, HealthStatus, Metrics,
    QueryDescriptor, QueryEngine, QueryResult, Record, Result, SessionStatus, TabviewError,
    cell_text, record_id,
};

/// In-memory engine for testing service-layer logic without a server.
///
/// Pages and search are applied so results look realistic. Filters and sorts
/// are only recorded; tests assert on the descriptors the engine received.
pub struct MockEngine {
    pub schema: Vec<ColumnDefinition>,
    pub rows: Arc<parking_lot::Mutex<Vec<Record>>>,
    /// When set, every query fails with this message
    pub query_failure: Arc<parking_lot::Mutex<Option<String>>>,
    pub update_failure: Option<String>,
    /// Fails both deletes and session clears
    pub delete_failure: Option<String>,
    /// Artificial latency keyed by search term
    pub latency: HashMap<String, Duration>,
    /// Log of all descriptors executed, for assertion in tests
    pub query_log: Arc<parking_lot::Mutex<Vec<QueryDescriptor>>>,
    /// (record_id, field, value) for every update received
    pub update_log: Arc<parking_lot::Mutex<Vec<(String, String, String)>>>,
    pub delete_log: Arc<parking_lot::Mutex<Vec<QueryDescriptor>>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            schema: vec![],
            rows: Arc::new(parking_lot::Mutex::new(Vec::new())),
            query_failure: Arc::new(parking_lot::Mutex::new(None)),
            update_failure: None,
            delete_failure: None,
            latency: HashMap::new(),
            query_log: Arc::new(parking_lot::Mutex::new(Vec::new())),
            update_log: Arc::new(parking_lot::Mutex::new(Vec::new())),
            delete_log: Arc::new(parking_lot::Mutex::new(Vec::new())),
        }
    }

    /// Users table: `id`, `name`, `age`, an unsortable `notes`, and a hidden `_version`
    pub fn with_users(mut self, count: u64) -> Self {
        self.schema = vec![
            ColumnDefinition::new("id", ColumnType::Long),
            ColumnDefinition::new("name", ColumnType::String),
            ColumnDefinition::new("age", ColumnType::Integer),
            ColumnDefinition {
                sortable: false,
                filterable: false,
                ..ColumnDefinition::new("notes", ColumnType::String)
            },
        ];
        let rows = (1..=count)
            .map(|i| {
                record(json!({
                    "id": i,
                    "name": format!("user{}", i),
                    "age": 20 + (i % 50),
                    "notes": "",
                    "_version": 1,
                }))
            })
            .collect();
        *self.rows.lock() = rows;
        self
    }

    pub fn with_query_failure(self, message: impl Into<String>) -> Self {
        self.set_query_failure(Some(message.into()));
        self
    }

    pub fn with_update_failure(mut self, message: impl Into<String>) -> Self {
        self.update_failure = Some(message.into());
        self
    }

    pub fn with_delete_failure(mut self, message: impl Into<String>) -> Self {
        self.delete_failure = Some(message.into());
        self
    }

    /// Delay queries whose search term is `term`
    pub fn with_latency(mut self, term: impl Into<String>, delay: Duration) -> Self {
        self.latency.insert(term.into(), delay);
        self
    }

    pub fn set_query_failure(&self, message: Option<String>) {
        *self.query_failure.lock() = message;
    }

    pub fn query_count(&self) -> usize {
        self.query_log.lock().len()
    }

    pub fn query_log(&self) -> Vec<QueryDescriptor> {
        self.query_log.lock().clone()
    }

    pub fn update_log(&self) -> Vec<(String, String, String)> {
        self.update_log.lock().clone()
    }

    fn matching_rows(&self, search_term: &str) -> Vec<Record> {
        let term = search_term.trim().to_lowercase();
        self.rows
            .lock()
            .iter()
            .filter(|row| {
                term.is_empty()
                    || row
                        .keys()
                        .any(|key| cell_text(row, key).to_lowercase().contains(&term))
            })
            .cloned()
            .collect()
    }
}

pub fn record(value: Value) -> Record {
    value.as_object().cloned().unwrap_or_default()
}

#[async_trait]
impl QueryEngine for MockEngine {
    fn engine_name(&self) -> &str {
        "mock"
    }

    async fn execute_query(
        &self,
        _session_id: &str,
        descriptor: &QueryDescriptor,
    ) -> Result<QueryResult> {
        self.query_log.lock().push(descriptor.clone());

        if let Some(delay) = self.latency.get(&descriptor.search_term) {
            tokio::time::sleep(*delay).await;
        }

        let failure = self.query_failure.lock().clone();
        if let Some(message) = failure {
            return Err(TabviewError::Query(message));
        }

        let matching = self.matching_rows(&descriptor.search_term);
        let total_elements = matching.len() as u64;
        let rows = matching
            .into_iter()
            .skip(descriptor.offset() as usize)
            .take(descriptor.page_size as usize)
            .collect();

        Ok(QueryResult {
            rows,
            total_elements,
            total_pages: total_elements.div_ceil(descriptor.page_size.max(1)),
            current_page: descriptor.page,
            page_size: descriptor.page_size,
            implementation_label: "Mock".to_string(),
            query_time_ms: 1.5,
        })
    }

    async fn get_schema(&self, _session_id: &str) -> Result<Vec<ColumnDefinition>> {
        Ok(self.schema.clone())
    }

    async fn update_field(
        &self,
        _session_id: &str,
        record_id_value: &str,
        field_name: &str,
        value: &str,
    ) -> Result<()> {
        self.update_log.lock().push((
            record_id_value.to_string(),
            field_name.to_string(),
            value.to_string(),
        ));

        if let Some(message) = &self.update_failure {
            return Err(TabviewError::Update(message.clone()));
        }

        let mut rows = self.rows.lock();
        let row = rows
            .iter_mut()
            .find(|row| record_id(row).as_deref() == Some(record_id_value))
            .ok_or_else(|| TabviewError::NotFound(format!("record {}", record_id_value)))?;
        row.insert(field_name.to_string(), Value::String(value.to_string()));
        Ok(())
    }

    async fn delete_by_query(
        &self,
        _session_id: &str,
        descriptor: &QueryDescriptor,
    ) -> Result<DeleteOutcome> {
        self.delete_log.lock().push(descriptor.clone());

        if let Some(message) = &self.delete_failure {
            return Err(TabviewError::Delete(message.clone()));
        }

        let doomed: Vec<String> = self
            .matching_rows(&descriptor.search_term)
            .iter()
            .filter_map(record_id)
            .collect();
        self.rows
            .lock()
            .retain(|row| record_id(row).is_none_or(|id| !doomed.contains(&id)));

        Ok(DeleteOutcome {
            deleted_count: doomed.len() as u64,
            message: Some("Records deleted successfully".to_string()),
        })
    }

    async fn export_table(&self, _session_id: &str) -> Result<ExportOutcome> {
        Ok(ExportOutcome {
            file_name: "export_users.parquet".to_string(),
            file_path: "/tmp/export_users.parquet".to_string(),
            format: "parquet".to_string(),
        })
    }

    async fn get_metrics(&self, _session_id: &str) -> Result<Metrics> {
        let mut metrics = Metrics::new();
        metrics.insert("rowCount".into(), json!(self.rows.lock().len()));
        metrics.insert("totalQueries".into(), json!(self.query_count()));
        Ok(metrics)
    }

    async fn list_sessions(&self) -> Result<Vec<String>> {
        Ok(vec!["s1".to_string()])
    }

    async fn clear_session(&self, _session_id: &str) -> Result<()> {
        if let Some(message) = &self.delete_failure {
            return Err(TabviewError::Delete(message.clone()));
        }
        self.rows.lock().clear();
        Ok(())
    }

    async fn session_status(&self, _session_id: &str) -> Result<SessionStatus> {
        Ok(SessionStatus {
            has_data: !self.rows.lock().is_empty(),
            implementation: "Mock".to_string(),
            column_count: self.schema.len() as u64,
        })
    }

    async fn health(&self) -> Result<HealthStatus> {
        Ok(HealthStatus {
            status: "UP".to_string(),
            implementation: "Mock".to_string(),
        })
    }
}
