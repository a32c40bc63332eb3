use crate::model::{RawRow, VectorError};

/// Kind of record stored in a collection, matched against the payload `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Offer,
    Smartphone,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Offer => "offre",
            RecordKind::Smartphone => "smartphone",
        }
    }
}

/// Exact-match condition on a payload field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    pub key: String,
    pub value: String,
}

impl FieldFilter {
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// Filtered lookup over an external vector index.
#[async_trait::async_trait]
pub trait VectorIndex: Send + Sync {
    /// Returns at most `limit` payloads whose `type` is `kind` and that match every filter.
    async fn query(
        &self,
        collection: &str,
        kind: RecordKind,
        filters: &[FieldFilter],
        limit: usize,
    ) -> Result<Vec<RawRow>, VectorError>;
}
