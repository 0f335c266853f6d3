//! Metrics presentation
//!
//! The engine reports a flat map of named values. These helpers group and
//! label them for display; nothing else in the browser reads them.

use serde_json::Value;
use tabview_core::{Metrics, QueryEngine};

use crate::error::{RemoteOperation, ServiceError, ServiceResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricCategory {
    General,
    Performance,
    Memory,
}

impl MetricCategory {
    pub fn title(&self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Performance => "Query Performance",
            Self::Memory => "Memory Statistics",
        }
    }

    pub fn of(key: &str) -> Self {
        if key.contains("Memory") || key.contains("memoryUsage") || key.contains("arrow") {
            Self::Memory
        } else if key.contains("Time") || key.contains("Ms") || key == "totalQueries" {
            Self::Performance
        } else {
            Self::General
        }
    }
}

/// Human label for a metric key; unknown keys are shown as-is
pub fn metric_label(key: &str) -> &str {
    match key {
        "loadTimeMs" => "Load Time",
        "avgQueryTimeMs" => "Avg Query Time",
        "stdDevQueryTimeMs" => "Query Time Std Dev",
        "minQueryTimeMs" => "Min Query Time",
        "maxQueryTimeMs" => "Max Query Time",
        "totalQueries" => "Total Queries",
        "rowCount" => "Row Count",
        "implementation" => "Implementation",
        "totalMemoryMB" => "Total Memory",
        "usedMemoryMB" => "Used Memory",
        "freeMemoryMB" => "Free Memory",
        "maxMemoryMB" => "Max Memory",
        "memoryUsagePercent" => "Memory Usage",
        "arrowAllocatedMB" => "Arrow Allocated",
        "arrowPeakMB" => "Arrow Peak",
        "arrowLimitMB" => "Arrow Limit",
        "totalMemoryUsedMB" => "Total Memory Used",
        other => other,
    }
}

/// Format a metric value with the unit its key implies
pub fn format_metric(key: &str, value: &Value) -> String {
    let Value::Number(number) = value else {
        return match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
    };

    if key.contains("Time") || key.contains("Ms") {
        return format!("{}ms", number);
    }
    if key.contains("MB") {
        if key == "arrowLimitMB" && number.as_i64() == Some(-1) {
            return "Unlimited".to_string();
        }
        return format!("{}MB", number);
    }
    if key.contains("Percent") {
        return format!("{}%", number);
    }
    if (key == "rowCount" || key == "totalQueries")
        && let Some(n) = number.as_u64()
    {
        return group_thousands(n);
    }
    number.to_string()
}

pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricLine {
    pub key: String,
    pub label: String,
    pub value: String,
}

/// Group metrics by category (General, Performance, Memory), keeping the
/// engine's order within each group. Empty groups are omitted.
pub fn group_metrics(metrics: &Metrics) -> Vec<(MetricCategory, Vec<MetricLine>)> {
    let mut groups: Vec<(MetricCategory, Vec<MetricLine>)> = Vec::new();
    for (key, value) in metrics {
        let line = MetricLine {
            key: key.clone(),
            label: metric_label(key).to_string(),
            value: format_metric(key, value),
        };
        let category = MetricCategory::of(key);
        match groups.iter_mut().find(|(c, _)| *c == category) {
            Some((_, lines)) => lines.push(line),
            None => groups.push((category, vec![line])),
        }
    }
    groups.sort_by_key(|(category, _)| *category);
    groups
}

/// Fetch the engine's metrics for a session
pub async fn load_metrics(engine: &dyn QueryEngine, session_id: &str) -> ServiceResult<Metrics> {
    engine
        .get_metrics(session_id)
        .await
        .map_err(|e| ServiceError::remote(RemoteOperation::Metrics, &e))
}
