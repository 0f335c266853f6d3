use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Input rejected locally, before any request is issued
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Select a column to filter on")]
    MissingColumn,

    #[error("Column '{0}' cannot be filtered")]
    ColumnNotFilterable(String),

    #[error("Column '{0}' cannot be sorted")]
    ColumnNotSortable(String),

    #[error("A value is required for this filter")]
    EmptyFilterValue,

    #[error("Value cannot be empty")]
    EmptyEditValue,

    #[error("Row {0} is not on the displayed page")]
    RowOutOfRange(usize),

    #[error("Row has no id or _id; it cannot be edited")]
    MissingRecordId,

    #[error("No cell is being edited")]
    NotEditing,
}

/// Service-level errors with user-friendly messages
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{operation} failed: {message}")]
    RemoteExecution {
        operation: RemoteOperation,
        message: String,
    },
}

/// The remote calls that can suspend the browser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteOperation {
    Query,
    Update,
    Delete,
    Export,
    Clear,
    Schema,
    Metrics,
}

impl RemoteOperation {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Query => "Query",
            Self::Update => "Update",
            Self::Delete => "Delete operation",
            Self::Export => "Export",
            Self::Clear => "Clearing session data",
            Self::Schema => "Schema loading",
            Self::Metrics => "Metrics refresh",
        }
    }

    /// Message shown when the engine gave no usable reason
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::Query => "Error loading data",
            Self::Update => "Failed to update field",
            Self::Delete => "Failed to delete records",
            Self::Export => "Failed to export table",
            Self::Clear => "Failed to clear session data",
            Self::Schema => "Failed to load schema",
            Self::Metrics => "Failed to load metrics",
        }
    }
}

impl std::fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl ServiceError {
    /// Wrap an engine error, keeping the server's own message when it has one
    pub fn remote(operation: RemoteOperation, err: &tabview_core::TabviewError) -> Self {
        let message = err
            .server_message()
            .map(str::to_string)
            .unwrap_or_else(|| operation.fallback_message().to_string());
        Self::RemoteExecution { operation, message }
    }
}
