//! Table browser
//!
//! The one owned state object behind a table view. It holds the schema, the
//! query state controller, the executor and the cell editor, and wires UI
//! gestures through them:
//!
//! ```text
//! gesture -> partial update -> controller (new descriptor) -> executor (PendingQuery)
//!         -> caller awaits PendingQuery::resolve() -> browser.receive(completion)
//! ```
//!
//! State-changing methods are synchronous. Every remote call is handed back
//! as a self-contained pending value, so the caller can await it without
//! borrowing the browser and keep handling other gestures meanwhile.

use std::sync::Arc;

use tabview_core::{
    ColumnDefinition, DeleteOutcome, ExportOutcome, QueryDescriptor, QueryEngine, QueryResult,
    Record,
};

use crate::bulk::{PendingClear, PendingDelete, PendingExport};
use crate::cell_editor::{InlineCellEditor, PendingSave, SaveCompletion, SaveResolution};
use crate::error::{RemoteOperation, ServiceError, ServiceResult, ValidationError};
use crate::executor::{Delivery, PendingQuery, QueryCompletion, RemoteQueryExecutor};
use crate::filter_builder::{self, FilterBuilder, FilterDraft};
use crate::notices::Notice;
use crate::pagination::Pagination;
use crate::query_state::{DescriptorUpdate, QueryStateController};
use crate::sort_cycle::SortCycle;

pub struct TableBrowser {
    schema: Vec<ColumnDefinition>,
    filter_builder: FilterBuilder,
    sort_cycle: SortCycle,
    state: QueryStateController,
    executor: RemoteQueryExecutor,
    editor: InlineCellEditor,
    notices: Vec<Notice>,
}

impl TableBrowser {
    pub fn new(engine: Arc<dyn QueryEngine>, session_id: impl Into<String>) -> Self {
        Self::with_descriptor(engine, session_id, QueryDescriptor::default())
    }

    pub fn with_descriptor(
        engine: Arc<dyn QueryEngine>,
        session_id: impl Into<String>,
        initial: QueryDescriptor,
    ) -> Self {
        Self {
            schema: Vec::new(),
            filter_builder: FilterBuilder::default(),
            sort_cycle: SortCycle::default(),
            state: QueryStateController::new(initial),
            executor: RemoteQueryExecutor::new(engine, session_id),
            editor: InlineCellEditor::new(),
            notices: Vec::new(),
        }
    }

    pub fn session_id(&self) -> &str {
        self.executor.session_id()
    }

    // ---- schema ----

    pub fn schema(&self) -> &[ColumnDefinition] {
        &self.schema
    }

    pub fn set_schema(&mut self, schema: Vec<ColumnDefinition>) {
        self.filter_builder.set_schema(&schema);
        self.sort_cycle.set_schema(&schema);
        self.schema = schema;
    }

    /// Fetch the schema from the engine and install it
    pub async fn load_schema(&mut self) -> ServiceResult<()> {
        let engine = Arc::clone(self.executor.engine());
        let schema = engine
            .get_schema(self.executor.session_id())
            .await
            .map_err(|e| ServiceError::remote(RemoteOperation::Schema, &e))?;
        tracing::info!(columns = schema.len(), "schema loaded");
        self.set_schema(schema);
        Ok(())
    }

    // ---- descriptor ----

    pub fn descriptor(&self) -> &Arc<QueryDescriptor> {
        self.state.current()
    }

    /// Merge `update` into the descriptor and issue the new descriptor
    pub fn apply_update(&mut self, update: DescriptorUpdate) -> PendingQuery {
        let descriptor = self.state.apply_update(update);
        self.executor.issue(descriptor)
    }

    /// Install a complete descriptor (page included) and issue it
    pub fn replace_descriptor(&mut self, descriptor: QueryDescriptor) -> PendingQuery {
        let descriptor = self.state.reset(descriptor);
        self.executor.issue(descriptor)
    }

    /// Re-issue the current descriptor unchanged
    pub fn refresh(&mut self) -> PendingQuery {
        let descriptor = Arc::clone(self.state.current());
        self.executor.issue(descriptor)
    }

    /// Re-issue after a failed query; `None` if nothing failed
    pub fn retry(&mut self) -> Option<PendingQuery> {
        self.executor.last_error()?;
        self.executor.clear_error();
        Some(self.refresh())
    }

    pub fn set_search(&mut self, term: impl Into<String>) -> PendingQuery {
        self.apply_update(DescriptorUpdate::search(term))
    }

    pub fn set_page_size(&mut self, page_size: u64) -> PendingQuery {
        self.apply_update(DescriptorUpdate::page_size(page_size))
    }

    // ---- sorting ----

    pub fn sort_cycle(&self) -> &SortCycle {
        &self.sort_cycle
    }

    /// Header click. `None` for columns the schema does not allow sorting on.
    pub fn toggle_sort(&mut self, column: &str) -> Option<PendingQuery> {
        let sorts = match self.sort_cycle.toggle(&self.descriptor().sorts, column) {
            Ok(sorts) => sorts,
            Err(e) => {
                tracing::debug!(error = %e, "sort toggle ignored");
                return None;
            }
        };
        Some(self.apply_update(DescriptorUpdate::sorts(sorts)))
    }

    // ---- filtering ----

    pub fn filter_builder(&self) -> &FilterBuilder {
        &self.filter_builder
    }

    pub fn filter_builder_mut(&mut self) -> &mut FilterBuilder {
        &mut self.filter_builder
    }

    /// Add `draft` as a filter; `None` when the draft is not submittable
    pub fn add_filter(&mut self, draft: &FilterDraft) -> Option<PendingQuery> {
        let filters = self
            .filter_builder
            .add_filter(&self.descriptor().filters, draft)?;
        Some(self.apply_update(DescriptorUpdate::filters(filters)))
    }

    /// Submit the filter builder's own draft
    pub fn submit_filter(&mut self) -> Option<PendingQuery> {
        let current = Arc::clone(self.state.current());
        let filters = self.filter_builder.submit(&current.filters)?;
        Some(self.apply_update(DescriptorUpdate::filters(filters)))
    }

    pub fn remove_filter(&mut self, index: usize) -> Option<PendingQuery> {
        let filters = filter_builder::remove_filter(&self.descriptor().filters, index)?;
        Some(self.apply_update(DescriptorUpdate::filters(filters)))
    }

    pub fn clear_filters(&mut self) -> PendingQuery {
        self.apply_update(DescriptorUpdate::filters(filter_builder::clear_all()))
    }

    // ---- results & paging ----

    /// Deliver a finished query
    pub fn receive(&mut self, completion: QueryCompletion) -> Delivery {
        let current = Arc::clone(self.state.current());
        let delivery = self.executor.receive(completion, &current);
        if let Delivery::Applied = delivery
            && let Some(result) = self.executor.displayed()
        {
            tracing::info!(
                rows = result.rows.len(),
                total = result.total_elements,
                page = result.current_page,
                implementation = %result.implementation_label,
                "results displayed"
            );
        }
        delivery
    }

    /// Await `pending` and deliver it
    pub async fn run(&mut self, pending: PendingQuery) -> Delivery {
        let completion = pending.resolve().await;
        self.receive(completion)
    }

    pub fn result(&self) -> Option<&Arc<QueryResult>> {
        self.executor.displayed()
    }

    /// Retryable banner text for the last query failure
    pub fn query_error(&self) -> Option<&ServiceError> {
        self.executor.last_error()
    }

    pub fn is_loading(&self) -> bool {
        self.executor.is_loading()
    }

    pub fn pagination(&self) -> Option<Pagination> {
        self.result().map(|r| Pagination::from_result(r))
    }

    pub fn next_page(&mut self) -> Option<PendingQuery> {
        let update = self.pagination()?.next()?;
        Some(self.apply_update(update))
    }

    pub fn previous_page(&mut self) -> Option<PendingQuery> {
        let update = self.pagination()?.previous()?;
        Some(self.apply_update(update))
    }

    pub fn go_to_page(&mut self, page: u64) -> Option<PendingQuery> {
        let update = self.pagination()?.go_to(page)?;
        Some(self.apply_update(update))
    }

    // ---- inline editing ----

    pub fn editor(&self) -> &InlineCellEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut InlineCellEditor {
        &mut self.editor
    }

    /// Start editing a cell of the displayed page
    pub fn begin_edit(&mut self, row_index: usize, field_name: &str) -> Result<(), ValidationError> {
        let record: Record = self
            .result()
            .and_then(|r| r.rows.get(row_index))
            .cloned()
            .ok_or(ValidationError::RowOutOfRange(row_index))?;
        self.editor.begin(&record, field_name)
    }

    /// Commit the active edit and hand back the save to await
    pub fn commit_edit(&mut self) -> Result<PendingSave, ValidationError> {
        let update = self.editor.commit()?;
        Ok(update.into_pending(Arc::clone(self.executor.engine()), self.executor.session_id()))
    }

    /// Deliver a finished save. A successful save re-fetches the current query.
    ///
    /// A failure whose session was cancelled or replaced meanwhile has no cell
    /// to show its alert, so it becomes an error notice.
    pub fn complete_edit(&mut self, completion: SaveCompletion) -> Option<PendingQuery> {
        match self.editor.complete_save(&completion) {
            SaveResolution::Saved => {
                tracing::info!(
                    record_id = %completion.update.record_id,
                    field = %completion.update.field_name,
                    "field updated, re-fetching"
                );
                Some(self.refresh())
            }
            SaveResolution::Failed => None,
            SaveResolution::Detached(e) => {
                tracing::warn!(
                    record_id = %completion.update.record_id,
                    field = %completion.update.field_name,
                    "update failed after its edit was closed"
                );
                self.notices.push(Notice::error(&e));
                None
            }
        }
    }

    // ---- bulk operations ----

    pub fn prepare_delete(&self) -> PendingDelete {
        PendingDelete::new(
            Arc::clone(self.state.current()),
            Arc::clone(self.executor.engine()),
            self.executor.session_id(),
        )
    }

    /// Deliver a finished delete. On success the first page is re-fetched.
    pub fn complete_delete(
        &mut self,
        outcome: Result<DeleteOutcome, ServiceError>,
    ) -> Option<PendingQuery> {
        match outcome {
            Ok(deleted) => {
                tracing::info!(deleted = deleted.deleted_count, "records deleted");
                self.notices.push(Notice::info(format!(
                    "Deleted {} records",
                    deleted.deleted_count
                )));
                Some(self.apply_update(DescriptorUpdate::page(0)))
            }
            Err(e) => {
                self.notices.push(Notice::error(&e));
                None
            }
        }
    }

    pub fn prepare_export(&self) -> PendingExport {
        PendingExport::new(
            Arc::clone(self.executor.engine()),
            self.executor.session_id(),
        )
    }

    pub fn complete_export(&mut self, outcome: Result<ExportOutcome, ServiceError>) {
        let notice = match outcome {
            Ok(export) => Notice::info(format!(
                "Table exported to {} ({})",
                export.file_name, export.format
            )),
            Err(e) => Notice::error(&e),
        };
        self.notices.push(notice);
    }

    pub fn prepare_clear(&self) -> PendingClear {
        PendingClear::new(
            Arc::clone(self.executor.engine()),
            self.executor.session_id(),
        )
    }

    /// Deliver a finished clear. On success the first page is re-fetched.
    pub fn complete_clear(&mut self, outcome: Result<(), ServiceError>) -> Option<PendingQuery> {
        match outcome {
            Ok(()) => {
                tracing::info!(session = %self.executor.session_id(), "session data cleared");
                self.notices.push(Notice::info("Session data cleared"));
                Some(self.apply_update(DescriptorUpdate::page(0)))
            }
            Err(e) => {
                self.notices.push(Notice::error(&e));
                None
            }
        }
    }

    // ---- notices ----

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn dismiss_notice(&mut self, index: usize) -> Option<Notice> {
        (index < self.notices.len()).then(|| self.notices.remove(index))
    }
}
