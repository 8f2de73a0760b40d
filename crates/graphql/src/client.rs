//! HTTP client for the Virtual Andon GraphQL endpoint.
//!
//! Each operation is a single `POST` round trip: no retries, no batching,
//! and list results are limited to the first page the backend returns.

use std::time::Duration;

use andon_core::entity::{EntityInput, EntityKind, EntityRecord};
use andon_core::types::EntityId;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::documents::{create_document, delete_document, list_document, update_document};
use crate::error::{ApiError, GraphQlError};
use crate::records::{decode_items, decode_record, encode_input};

/// How requests authenticate against the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiAuth {
    /// AppSync API key, sent as `x-api-key`.
    ApiKey(String),
    /// User-pool token, sent as `Authorization`.
    Bearer(String),
    /// No credentials (local mocks).
    None,
}

/// Raw GraphQL response envelope.
#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

/// GraphQL client for one deployment.
pub struct AndonApi {
    client: reqwest::Client,
    endpoint: String,
    auth: ApiAuth,
}

impl AndonApi {
    /// Create a client for a GraphQL endpoint.
    ///
    /// * `endpoint` - full URL, e.g. `https://xyz.appsync-api.region.amazonaws.com/graphql`.
    pub fn new(endpoint: impl Into<String>, auth: ApiAuth) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            auth,
        }
    }

    /// Create a client whose requests time out after `timeout`.
    pub fn with_timeout(
        endpoint: impl Into<String>,
        auth: ApiAuth,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, endpoint, auth))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>, auth: ApiAuth) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            auth,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Execute one GraphQL document and return the `data.<operation>` value.
    ///
    /// GraphQL errors in the response are returned unmodified as
    /// [`ApiError::GraphQl`].
    pub async fn execute(
        &self,
        operation: &str,
        document: &str,
        variables: Value,
    ) -> Result<Value, ApiError> {
        let body = json!({
            "query": document,
            "variables": variables,
        });

        let request = self.client.post(&self.endpoint).json(&body);
        let request = match &self.auth {
            ApiAuth::ApiKey(key) => request.header("x-api-key", key),
            ApiAuth::Bearer(token) => request.header(reqwest::header::AUTHORIZATION, token),
            ApiAuth::None => request,
        };

        tracing::debug!(operation, endpoint = %self.endpoint, "GraphQL request");
        let response = Self::ensure_success(request.send().await?).await?;
        let envelope: GraphQlResponse = response.json().await?;

        if !envelope.errors.is_empty() {
            tracing::debug!(operation, errors = envelope.errors.len(), "GraphQL errors");
            return Err(ApiError::GraphQl(envelope.errors));
        }

        match envelope.data.and_then(|mut data| data.get_mut(operation).map(Value::take)) {
            Some(Value::Null) | None => Err(ApiError::MissingData(operation.to_string())),
            Some(value) => Ok(value),
        }
    }

    /// List every record of `kind`, scoped to `parent_id` for child kinds.
    pub async fn list(
        &self,
        kind: EntityKind,
        parent_id: Option<&str>,
    ) -> Result<Vec<EntityRecord>, ApiError> {
        let operation = kind.list_operation();
        let mut variables = serde_json::Map::new();
        if let (Some(arg), Some(parent_id)) = (kind.parent_argument(), parent_id) {
            variables.insert(arg.to_string(), Value::String(parent_id.to_string()));
        }
        let variables = Value::Object(variables);

        // An empty list comes back as `null` from some resolvers.
        let data = match self.execute(&operation, &list_document(kind), variables).await {
            Err(ApiError::MissingData(_)) => Value::Null,
            other => other?,
        };
        decode_items(kind, &data)
    }

    /// Create one record and return it as stored by the backend.
    pub async fn create(
        &self,
        kind: EntityKind,
        input: &EntityInput,
    ) -> Result<EntityRecord, ApiError> {
        input.validate_for(kind)?;
        let variables = json!({ "input": encode_input(kind, input, None) });
        let data = self
            .execute(&kind.create_operation(), &create_document(kind), variables)
            .await?;
        decode_record(kind, &data)
    }

    /// Update the editable fields of one record.
    pub async fn update(
        &self,
        kind: EntityKind,
        id: &str,
        input: &EntityInput,
    ) -> Result<EntityRecord, ApiError> {
        input.validate_for(kind)?;
        let variables = json!({ "input": encode_input(kind, input, Some(id)) });
        let data = self
            .execute(&kind.update_operation(), &update_document(kind), variables)
            .await?;
        decode_record(kind, &data)
    }

    /// Delete one record. Returns the deleted id.
    ///
    /// Deleting a site, area, process or station also deletes its
    /// descendants on the backend.
    pub async fn delete(&self, kind: EntityKind, id: &str) -> Result<EntityId, ApiError> {
        let variables = json!({ "id": id });
        let data = self
            .execute(&kind.delete_operation(), &delete_document(kind), variables)
            .await?;
        Ok(data
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or(id)
            .to_string())
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code, or return an
    /// [`ApiError::Http`] with the status and body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}
