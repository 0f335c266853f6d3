//! `QueryEngine` over the engine's JSON HTTP API

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tabview_core::{
    ColumnDefinition, DeleteOutcome, ExportOutcome, HealthStatus, Metrics, QueryDescriptor,
    QueryEngine, QueryResult, Result, SessionStatus, TabviewError,
};
use url::Url;

use crate::config::RemoteConfig;
use crate::error::{RemoteError, RemoteResult, status_message};

/// Body of `/query` and `/delete`: the descriptor plus the session it targets
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QueryRequest<'a> {
    pub session_id: &'a str,
    #[serde(flatten)]
    pub descriptor: &'a QueryDescriptor,
}

#[derive(Debug, Serialize)]
struct FieldValue<'a> {
    value: &'a str,
}

pub struct HttpEngine {
    client: Client,
    root: Url,
    config: RemoteConfig,
}

impl HttpEngine {
    pub fn new(config: RemoteConfig) -> RemoteResult<Self> {
        let root = config.api_root()?;
        let client = Client::builder().timeout(config.timeout).build()?;
        tracing::debug!(base_url = %root, timeout = ?config.timeout, "http engine created");
        Ok(Self {
            client,
            root,
            config,
        })
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    /// `<root>/sessions/<segments...>`, each segment percent-encoded
    pub fn endpoint(&self, segments: &[&str]) -> RemoteResult<Url> {
        let mut url = self.root.clone();
        url.path_segments_mut()
            .map_err(|()| RemoteError::InvalidConfig("base URL cannot take path segments".into()))?
            .pop_if_empty()
            .push("sessions")
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> RemoteResult<RequestBuilder> {
        let url = self.endpoint(segments)?;
        tracing::debug!(%method, %url, "engine request");
        Ok(self.client.request(method, url))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> RemoteResult<T> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = status_message(status.as_u16(), &body);
            tracing::warn!(status = status.as_u16(), %message, "engine returned an error");
            return Err(RemoteError::Status {
                status: status.as_u16(),
                message,
            });
        }
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

#[async_trait]
impl QueryEngine for HttpEngine {
    fn engine_name(&self) -> &str {
        "http"
    }

    #[tracing::instrument(skip(self, descriptor), fields(page = descriptor.page, page_size = descriptor.page_size))]
    async fn execute_query(
        &self,
        session_id: &str,
        descriptor: &QueryDescriptor,
    ) -> Result<QueryResult> {
        let body = QueryRequest {
            session_id,
            descriptor,
        };
        let request = self
            .request(Method::POST, &[session_id, "query"])
            .map_err(|e| e.into_tabview(TabviewError::Query))?
            .json(&body);
        self.send(request)
            .await
            .map_err(|e| e.into_tabview(TabviewError::Query))
    }

    async fn get_schema(&self, session_id: &str) -> Result<Vec<ColumnDefinition>> {
        let request = self
            .request(Method::GET, &[session_id, "schema"])
            .map_err(|e| e.into_tabview(TabviewError::Schema))?;
        self.send(request)
            .await
            .map_err(|e| e.into_tabview(TabviewError::Schema))
    }

    #[tracing::instrument(skip(self, value))]
    async fn update_field(
        &self,
        session_id: &str,
        record_id: &str,
        field_name: &str,
        value: &str,
    ) -> Result<()> {
        let request = self
            .request(
                Method::PUT,
                &[session_id, "record", record_id, "field", field_name],
            )
            .map_err(|e| e.into_tabview(TabviewError::Update))?
            .json(&FieldValue { value });
        self.send::<serde_json::Value>(request)
            .await
            .map(|_| ())
            .map_err(|e| e.into_tabview(TabviewError::Update))
    }

    #[tracing::instrument(skip(self, descriptor), fields(filters = descriptor.filters.len()))]
    async fn delete_by_query(
        &self,
        session_id: &str,
        descriptor: &QueryDescriptor,
    ) -> Result<DeleteOutcome> {
        let body = QueryRequest {
            session_id,
            descriptor,
        };
        let request = self
            .request(Method::POST, &[session_id, "delete"])
            .map_err(|e| e.into_tabview(TabviewError::Delete))?
            .json(&body);
        self.send(request)
            .await
            .map_err(|e| e.into_tabview(TabviewError::Delete))
    }

    async fn export_table(&self, session_id: &str) -> Result<ExportOutcome> {
        let request = self
            .request(Method::POST, &[session_id, "export"])
            .map_err(|e| e.into_tabview(TabviewError::Export))?;
        self.send(request)
            .await
            .map_err(|e| e.into_tabview(TabviewError::Export))
    }

    async fn get_metrics(&self, session_id: &str) -> Result<Metrics> {
        let request = self
            .request(Method::GET, &[session_id, "metrics"])
            .map_err(|e| e.into_tabview(TabviewError::Other))?;
        self.send(request)
            .await
            .map_err(|e| e.into_tabview(TabviewError::Other))
    }

    async fn list_sessions(&self) -> Result<Vec<String>> {
        // The engine serves the listing at `sessions/`, trailing slash included
        let request = self
            .request(Method::GET, &[""])
            .map_err(|e| e.into_tabview(TabviewError::Other))?;
        self.send(request)
            .await
            .map_err(|e| e.into_tabview(TabviewError::Other))
    }

    #[tracing::instrument(skip(self))]
    async fn clear_session(&self, session_id: &str) -> Result<()> {
        let request = self
            .request(Method::DELETE, &[session_id, "data"])
            .map_err(|e| e.into_tabview(TabviewError::Delete))?;
        self.send::<serde_json::Value>(request)
            .await
            .map(|_| ())
            .map_err(|e| e.into_tabview(TabviewError::Delete))
    }

    async fn session_status(&self, session_id: &str) -> Result<SessionStatus> {
        let request = self
            .request(Method::GET, &[session_id, "status"])
            .map_err(|e| e.into_tabview(TabviewError::Other))?;
        self.send(request)
            .await
            .map_err(|e| e.into_tabview(TabviewError::Other))
    }

    async fn health(&self) -> Result<HealthStatus> {
        let request = self
            .request(Method::GET, &["health"])
            .map_err(|e| e.into_tabview(TabviewError::Connection))?;
        self.send(request)
            .await
            .map_err(|e| e.into_tabview(TabviewError::Connection))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tabview_core::{
        FilterClause, FilterOperation, LogicalOperator, SortClause, SortDirection,
    };

    fn engine(base_url: &str) -> HttpEngine {
        HttpEngine::new(RemoteConfig::default().with_base_url(base_url)).unwrap()
    }

    #[test]
    fn test_endpoint_paths() {
        let engine = engine("http://localhost:8080/api/v1");
        assert_eq!(
            engine.endpoint(&["s1", "query"]).unwrap().as_str(),
            "http://localhost:8080/api/v1/sessions/s1/query"
        );
        assert_eq!(
            engine.endpoint(&["health"]).unwrap().as_str(),
            "http://localhost:8080/api/v1/sessions/health"
        );
        assert_eq!(
            engine.endpoint(&[""]).unwrap().as_str(),
            "http://localhost:8080/api/v1/sessions/"
        );
        assert_eq!(
            engine.endpoint(&["s1", "data"]).unwrap().path(),
            "/api/v1/sessions/s1/data"
        );
    }

    #[test]
    fn test_endpoint_segments_are_encoded() {
        let engine = engine("http://localhost:8080/api/v1/");
        let url = engine
            .endpoint(&["my session", "record", "a/b", "field", "first name"])
            .unwrap();
        assert_eq!(
            url.path(),
            "/api/v1/sessions/my%20session/record/a%2Fb/field/first%20name"
        );
    }

    #[test]
    fn test_query_request_body() {
        let descriptor = QueryDescriptor {
            filters: vec![FilterClause {
                column: "status".into(),
                operation: FilterOperation::In,
                values: vec!["active".into(), "pending".into()],
                logical_operator: LogicalOperator::And,
            }],
            sorts: vec![SortClause::new("age", SortDirection::Descending, 1)],
            search_term: "smith".into(),
            page: 2,
            page_size: 50,
        };
        let body = serde_json::to_value(QueryRequest {
            session_id: "s1",
            descriptor: &descriptor,
        })
        .unwrap();

        assert_eq!(
            body,
            json!({
                "sessionId": "s1",
                "filters": [{
                    "column": "status",
                    "operation": "IN",
                    "values": ["active", "pending"],
                    "logicalOperator": "AND"
                }],
                "sorts": [{"column": "age", "direction": "DESC", "priority": 1}],
                "searchTerm": "smith",
                "page": 2,
                "pageSize": 50
            })
        );
    }

    #[test]
    fn test_field_value_body() {
        let body = serde_json::to_value(FieldValue { value: "Alice" }).unwrap();
        assert_eq!(body, json!({"value": "Alice"}));
    }
}
