//! Query flags shared by `query`, `edit` and `delete`

use anyhow::{Context, Result, bail};
use clap::Args;
use tabview_core::{FilterOperation, LogicalOperator, QueryDescriptor, SortDirection};
use tabview_services::{FilterDraft, TableBrowser, direction_of};

use crate::settings::Settings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortArg {
    pub column: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Default, Args)]
pub struct QueryArgs {
    /// Filter as `column:OPERATION[:value][:AND|OR]`, e.g. `age:GREATER_THAN:30`
    #[arg(long = "filter", value_name = "FILTER", value_parser = parse_filter)]
    pub filters: Vec<FilterDraft>,

    /// Sort as `column[:asc|desc]`; repeat for secondary sorts
    #[arg(long = "sort", value_name = "SORT", value_parser = parse_sort)]
    pub sorts: Vec<SortArg>,

    /// Free-text search across all columns
    #[arg(long)]
    pub search: Option<String>,

    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: u64,

    #[arg(long)]
    pub page_size: Option<u64>,

    /// Print the SQL-like form of the query before the results
    #[arg(long)]
    pub explain: bool,
}

pub fn parse_filter(arg: &str) -> Result<FilterDraft, String> {
    let mut parts = arg.splitn(3, ':');
    let column = parts.next().unwrap_or_default().trim();
    if column.is_empty() {
        return Err(format!("missing column in filter '{}'", arg));
    }
    let code = parts
        .next()
        .ok_or_else(|| format!("expected column:OPERATION[:value] in '{}'", arg))?;
    let operation = FilterOperation::from_code(code)
        .ok_or_else(|| format!("unknown filter operation '{}'", code))?;
    let rest = parts.next().unwrap_or_default();

    let trailing_logic = rest
        .rsplit_once(':')
        .and_then(|(value, tail)| LogicalOperator::from_code(tail).map(|op| (value, op)));
    let (value, logical_operator) = match trailing_logic {
        Some(split) => split,
        None => match LogicalOperator::from_code(rest) {
            Some(op) if !operation.requires_value() => ("", op),
            _ => (rest, LogicalOperator::And),
        },
    };

    Ok(FilterDraft::new(column, operation, value, logical_operator))
}

pub fn parse_sort(arg: &str) -> Result<SortArg, String> {
    let (column, direction) = match arg.rsplit_once(':') {
        Some((column, dir)) => {
            let direction = match dir.trim().to_ascii_lowercase().as_str() {
                "asc" => SortDirection::Ascending,
                "desc" => SortDirection::Descending,
                other => return Err(format!("unknown sort direction '{}'", other)),
            };
            (column, direction)
        }
        None => (arg, SortDirection::Ascending),
    };
    let column = column.trim();
    if column.is_empty() {
        return Err(format!("missing column in sort '{}'", arg));
    }
    Ok(SortArg {
        column: column.to_string(),
        direction,
    })
}

impl QueryArgs {
    /// Validate the flags against the loaded schema and build the descriptor
    pub fn descriptor(&self, browser: &TableBrowser, settings: &Settings) -> Result<QueryDescriptor> {
        let mut filters = Vec::with_capacity(self.filters.len());
        for draft in &self.filters {
            let clause = browser
                .filter_builder()
                .validate(draft)
                .with_context(|| format!("Invalid filter on '{}'", draft.column))?;
            filters.push(clause);
        }

        // Each column goes through the header-click cycle: once for ASC, twice for DESC
        let mut sorts = Vec::new();
        for sort in &self.sorts {
            if direction_of(&sorts, &sort.column).is_some() {
                bail!("Column '{}' is sorted more than once", sort.column);
            }
            sorts = browser.sort_cycle().toggle(&sorts, &sort.column)?;
            if sort.direction == SortDirection::Descending {
                sorts = browser.sort_cycle().toggle(&sorts, &sort.column)?;
            }
        }

        Ok(QueryDescriptor {
            filters,
            sorts,
            search_term: self.search.clone().unwrap_or_default(),
            page: self.page.saturating_sub(1),
            page_size: settings.check_page_size(self.page_size)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_filter_forms() {
        assert_eq!(
            parse_filter("age:GREATER_THAN:30").unwrap(),
            FilterDraft::new("age", FilterOperation::GreaterThan, "30", LogicalOperator::And)
        );
        assert_eq!(
            parse_filter("status:in:active,pending:or").unwrap(),
            FilterDraft::new("status", FilterOperation::In, "active,pending", LogicalOperator::Or)
        );
        assert_eq!(
            parse_filter("email:IS_NULL:OR").unwrap(),
            FilterDraft::new("email", FilterOperation::IsNull, "", LogicalOperator::Or)
        );
        assert_eq!(
            parse_filter("email:is-not-null").unwrap(),
            FilterDraft::new("email", FilterOperation::IsNotNull, "", LogicalOperator::And)
        );
    }

    #[test]
    fn test_filter_value_may_contain_colons() {
        let draft = parse_filter("created:STARTS_WITH:2024-01-01T10:30").unwrap();
        assert_eq!(draft.value, "2024-01-01T10:30");
        assert_eq!(draft.logical_operator, LogicalOperator::And);
    }

    #[test]
    fn test_parse_filter_errors() {
        assert!(parse_filter("age").is_err());
        assert!(parse_filter(":EQUALS:1").is_err());
        assert!(parse_filter("age:LIKE:1").is_err());
    }

    #[test]
    fn test_parse_sort() {
        assert_eq!(
            parse_sort("name").unwrap(),
            SortArg {
                column: "name".into(),
                direction: SortDirection::Ascending
            }
        );
        assert_eq!(
            parse_sort("age:DESC").unwrap().direction,
            SortDirection::Descending
        );
        assert!(parse_sort("age:sideways").is_err());
        assert!(parse_sort(":desc").is_err());
    }
}
