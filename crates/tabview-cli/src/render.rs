//! Terminal rendering with comfy-table

use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use tabview_core::{ColumnDefinition, HealthStatus, QueryDescriptor, QueryResult, SessionStatus, cell_text};
use tabview_services::{MetricCategory, MetricLine, Notice, Pagination, header_label};

fn table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn flag(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

pub fn schema(columns: &[ColumnDefinition]) -> Table {
    let mut table = table();
    table.set_header(vec!["Column", "Type", "Sortable", "Filterable", "Searchable", "Width"]);
    for column in columns {
        table.add_row(vec![
            column.name.clone(),
            column.column_type.label().to_string(),
            flag(column.sortable).to_string(),
            flag(column.filterable).to_string(),
            flag(column.searchable).to_string(),
            column.width.map(|w| w.to_string()).unwrap_or_default(),
        ]);
    }
    table
}

/// One page of rows; sorted headers carry an arrow
pub fn page(result: &QueryResult, descriptor: &QueryDescriptor) -> Table {
    let columns = result.visible_columns();
    let mut table = table();
    table.set_header(
        columns
            .iter()
            .map(|c| header_label(&descriptor.sorts, c))
            .collect::<Vec<_>>(),
    );
    for row in &result.rows {
        table.add_row(columns.iter().map(|c| cell_text(row, c)).collect::<Vec<_>>());
    }
    table
}

/// "Showing 1 to 100 of 250 entries · Page 1 of 3 · 12ms (Arrow)"
pub fn footer(result: &QueryResult) -> String {
    let pagination = Pagination::from_result(result);
    format!(
        "{} · {} · {}ms ({})",
        pagination.summary(),
        pagination.page_label(),
        result.query_time_ms,
        result.implementation_label
    )
}

pub fn active_filters(descriptor: &QueryDescriptor) -> Vec<String> {
    descriptor
        .filters
        .iter()
        .enumerate()
        .map(|(i, clause)| {
            if i == 0 {
                clause.summary()
            } else {
                format!("{} {}", clause.logical_operator.sql(), clause.summary())
            }
        })
        .collect()
}

pub fn metrics(groups: &[(MetricCategory, Vec<MetricLine>)]) -> Table {
    let mut table = table();
    table.set_header(vec!["Category", "Metric", "Value"]);
    for (category, lines) in groups {
        for line in lines {
            table.add_row(vec![
                category.title().to_string(),
                line.label.clone(),
                line.value.clone(),
            ]);
        }
    }
    table
}

pub fn status(health: &HealthStatus, session_id: &str, session: &SessionStatus) -> Table {
    let mut table = table();
    table.set_header(vec!["Property", "Value"]);
    table.add_row(vec!["Engine".to_string(), health.status.clone()]);
    table.add_row(vec!["Implementation".to_string(), health.implementation.clone()]);
    table.add_row(vec!["Session".to_string(), session_id.to_string()]);
    table.add_row(vec!["Has data".to_string(), flag(session.has_data).to_string()]);
    table.add_row(vec!["Columns".to_string(), session.column_count.to_string()]);
    table
}

/// Session ids, the active one marked
pub fn sessions(ids: &[String], active: &str) -> Table {
    let mut table = table();
    table.set_header(vec!["Session", "Active"]);
    for id in ids {
        let marker = if id == active { "*" } else { "" };
        table.add_row(vec![id.clone(), marker.to_string()]);
    }
    table
}

pub fn notice(notice: &Notice) -> String {
    if notice.is_error() {
        format!("error: {}", notice.message)
    } else {
        notice.message.clone()
    }
}
