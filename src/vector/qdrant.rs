use crate::model::{RawRow, VectorError};
use crate::vector::traits::{FieldFilter, RecordKind, VectorIndex};

use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct ScrollResponse {
    result: ScrollResult,
}

#[derive(Debug, Deserialize)]
struct ScrollResult {
    points: Vec<ScrollPoint>,
}

#[derive(Debug, Deserialize)]
struct ScrollPoint {
    #[serde(default)]
    payload: Option<Map<String, Value>>,
}

/// Qdrant REST client restricted to filtered scrolls.
pub struct QdrantIndex {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl QdrantIndex {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self, VectorError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("offer-composer/0.1")
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header("api-key", key),
            None => builder,
        }
    }

    /// Lists collections to confirm the backend is reachable.
    pub async fn ping(&self) -> Result<(), VectorError> {
        let url = format!("{}/collections", self.base_url);
        let response = self.authorize(self.client.get(&url)).send().await?;
        if !response.status().is_success() {
            return Err(VectorError::Status(response.status().as_u16()));
        }
        Ok(())
    }

    fn scroll_body(kind: RecordKind, filters: &[FieldFilter], limit: usize) -> Value {
        let must: Vec<Value> = std::iter::once(FieldFilter::new("type", kind.as_str()))
            .chain(filters.iter().cloned())
            .map(|f| json!({ "key": f.key, "match": { "value": f.value } }))
            .collect();

        json!({
            "filter": { "must": must },
            "limit": limit,
            "with_payload": true,
            "with_vector": false,
        })
    }
}

#[async_trait::async_trait]
impl VectorIndex for QdrantIndex {
    async fn query(
        &self,
        collection: &str,
        kind: RecordKind,
        filters: &[FieldFilter],
        limit: usize,
    ) -> Result<Vec<RawRow>, VectorError> {
        let url = format!("{}/collections/{}/points/scroll", self.base_url, collection);
        let body = Self::scroll_body(kind, filters, limit);
        debug!("Qdrant scroll {}: {}", collection, body);

        let response = self
            .authorize(self.client.post(&url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(VectorError::Status(status.as_u16()));
        }

        let parsed: ScrollResponse = response
            .json()
            .await
            .map_err(|e| VectorError::InvalidResponse(e.to_string()))?;

        Ok(parsed
            .result
            .points
            .into_iter()
            .map(|p| payload_to_row(p.payload.unwrap_or_default()))
            .collect())
    }
}

/// Flattens a JSON payload into string cells. Nulls and nested values are dropped.
pub fn payload_to_row(payload: Map<String, Value>) -> RawRow {
    payload
        .into_iter()
        .filter_map(|(key, value)| {
            let cell = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null | Value::Array(_) | Value::Object(_) => return None,
            };
            Some((key, cell))
        })
        .collect()
}
