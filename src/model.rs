// Core structs: catalog records, requests, composed payload, errors
use crate::normalizer::safe_cast;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A flat `column -> cell` view of one source row, whether it came from a CSV
/// line or from a vector index payload.
pub type RawRow = HashMap<String, String>;

fn text(row: &RawRow, key: &str) -> Option<String> {
    row.get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn number(row: &RawRow, key: &str) -> Option<f64> {
    row.get(key).and_then(|v| safe_cast(v))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfferRecord {
    pub id: Option<String>,
    pub cta: Option<String>,
    pub famille: Option<String>,
    pub libelle: Option<String>,
    pub volume_mb: Option<f64>,
    pub minutes: Option<f64>,
    pub sms_count: Option<f64>,
    pub validity_days: Option<f64>,
    pub price: Option<f64>,
    pub zone: Option<String>,
    pub link: Option<String>,
    pub catalog_version: Option<String>,
}

impl OfferRecord {
    pub fn from_row(row: &RawRow) -> Self {
        Self {
            id: text(row, "id"),
            cta: text(row, "cta"),
            famille: text(row, "famille"),
            libelle: text(row, "libelle"),
            volume_mb: number(row, "volume"),
            minutes: number(row, "minutes"),
            sms_count: number(row, "sms"),
            validity_days: number(row, "validite_jours"),
            price: number(row, "prix_dh"),
            zone: text(row, "zone"),
            link: text(row, "link"),
            catalog_version: text(row, "version_catalogue"),
        }
    }

    pub fn cta_is(&self, cta: &str) -> bool {
        self.cta.as_deref() == Some(cta)
    }

    pub fn famille_is(&self, famille: &str) -> bool {
        self.famille.as_deref() == Some(famille)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmartphoneRecord {
    pub id: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub capacity: Option<String>,
    pub price: Option<f64>,
    pub range_tag: Option<String>,
    pub link: Option<String>,
    pub cta: Option<String>,
    pub catalog_version: Option<String>,
}

impl SmartphoneRecord {
    pub fn from_row(row: &RawRow) -> Self {
        Self {
            id: text(row, "id"),
            brand: text(row, "marque"),
            model: text(row, "modele"),
            capacity: text(row, "capacite"),
            price: number(row, "prix_dh"),
            range_tag: text(row, "gamme"),
            link: text(row, "link"),
            cta: text(row, "cta"),
            catalog_version: text(row, "version_catalogue"),
        }
    }

    /// Case-insensitive comparison against an already normalized brand token.
    pub fn brand_is(&self, brand: &str) -> bool {
        self.brand
            .as_deref()
            .is_some_and(|b| b.to_uppercase() == brand)
    }
}

/// Read-only snapshot of the catalog, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub offers: Vec<OfferRecord>,
    pub smartphones: Vec<SmartphoneRecord>,
    pub version: Option<String>,
}

impl Catalog {
    pub fn new(offers: Vec<OfferRecord>, smartphones: Vec<SmartphoneRecord>) -> Self {
        let version = offers
            .iter()
            .find_map(|o| o.catalog_version.clone())
            .or_else(|| smartphones.iter().find_map(|s| s.catalog_version.clone()));
        Self {
            offers,
            smartphones,
            version,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty() && self.smartphones.is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OfferRequest {
    pub persona: String,
    pub famille: String,
    #[serde(alias = "tag_offre")]
    pub cta: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EquipmentRequest {
    pub persona: String,
    pub famille: String,
    #[serde(default, alias = "hset_brand")]
    pub handset_brand: String,
}

/// One entry of a request batch, tagged by its `kind`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ComposeRequest {
    #[serde(alias = "offre")]
    Offer(OfferRequest),
    #[serde(alias = "equipment")]
    Smartphone(EquipmentRequest),
}

/// Display fields handed to the text-generation layer. Absent values are
/// omitted from the serialized form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OfferContext {
    pub offre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validite: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prix_dh: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destinations: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modele: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacite: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PromoContext {
    pub prix_promo_dh: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Links {
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposedPayload {
    pub persona: String,
    pub famille: String,
    pub cta: String,
    pub deadline: String,
    pub offer_context: OfferContext,
    pub promo_context: Option<PromoContext>,
    pub links: Links,
}

/// Serialized payload plus the bookkeeping fields callers keep alongside it.
#[derive(Debug, Clone, Serialize)]
pub struct ComposeResponse {
    pub llm_input_json: String,
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: String,
    pub vector_backend: String,
    pub catalog_version: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("malformed csv in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

#[derive(Debug, thiserror::Error)]
pub enum VectorError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend responded with status {0}")]
    Status(u16),
    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("cannot serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),
}
