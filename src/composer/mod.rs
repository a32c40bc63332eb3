// Compose context: the per-process dependencies every request handler shares.

pub mod payload;

pub use payload::to_llm_response;

use crate::config::AppConfig;
use crate::model::{
    Catalog, ComposeRequest, ComposedPayload, EquipmentRequest, HealthReport, OfferRecord, OfferRequest,
    SmartphoneRecord,
};
use crate::normalizer::normalize_brand;
use crate::ranking::{rank_offers, select_offer, select_smartphone};
use crate::resolver::CandidateResolver;
use crate::storage::CsvCatalogStore;
use crate::utils::current_deadline;
use crate::vector::{QdrantIndex, VectorIndex};
use payload::{DEFAULT_OFFER_LINK, DEFAULT_SMARTPHONE_LINK, offer_payload, smartphone_payload};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Read-only catalog snapshot plus the optional vector backend. Built once,
/// then shared (e.g. behind an `Arc`) by concurrent requests.
pub struct ComposeContext {
    catalog: Arc<Catalog>,
    resolver: CandidateResolver,
    default_offer_link: String,
    default_smartphone_link: String,
}

impl ComposeContext {
    pub fn new(catalog: Catalog, index: Option<Arc<dyn VectorIndex>>) -> Self {
        let catalog = Arc::new(catalog);
        Self {
            resolver: CandidateResolver::new(catalog.clone(), index),
            catalog,
            default_offer_link: DEFAULT_OFFER_LINK.to_string(),
            default_smartphone_link: DEFAULT_SMARTPHONE_LINK.to_string(),
        }
    }

    /// Loads the catalog and connects the vector backend described by `config`.
    /// Neither step is fatal: failures leave an empty catalog or no backend.
    pub async fn initialize(config: &AppConfig) -> Self {
        let catalog = match CsvCatalogStore::new(&config.catalog_path).load() {
            Ok(c) => c,
            Err(e) => {
                warn!("Catalog load failed, starting empty: {}", e);
                Catalog::default()
            }
        };
        let index = connect_index(config).await;

        let catalog = Arc::new(catalog);
        let resolver = CandidateResolver::new(catalog.clone(), index)
            .with_collections(&config.qdrant_offres_collection, &config.qdrant_smartphones_collection)
            .with_limit(config.vector_limit);
        Self {
            catalog,
            resolver,
            default_offer_link: config.default_offer_link.clone(),
            default_smartphone_link: config.default_smartphone_link.clone(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn health(&self) -> HealthReport {
        HealthReport {
            status: "ok".to_string(),
            vector_backend: if self.resolver.has_index() { "connected" } else { "offline" }.to_string(),
            catalog_version: self.catalog.version.clone(),
        }
    }

    pub async fn compose(&self, request: &ComposeRequest) -> ComposedPayload {
        match request {
            ComposeRequest::Offer(r) => self.compose_offer(r).await,
            ComposeRequest::Smartphone(r) => self.compose_smartphone(r).await,
        }
    }

    pub async fn compose_offer(&self, request: &OfferRequest) -> ComposedPayload {
        let candidates = self
            .resolver
            .resolve_offers(&request.famille, &request.cta)
            .await;
        self.offer_from_candidates(request, candidates, current_deadline(), &mut rand::rng())
    }

    pub async fn compose_smartphone(&self, request: &EquipmentRequest) -> ComposedPayload {
        let brand = normalize_brand(&request.handset_brand);
        let candidates = self.resolver.resolve_smartphones(&brand).await;
        self.smartphone_from_candidates(request, &brand, &candidates, current_deadline(), &mut rand::rng())
    }

    /// Ranking, selection and assembly for already resolved offers.
    pub fn offer_from_candidates<R: Rng + ?Sized>(
        &self,
        request: &OfferRequest,
        candidates: Vec<OfferRecord>,
        deadline: String,
        rng: &mut R,
    ) -> ComposedPayload {
        let ranked = rank_offers(candidates, &request.persona, &request.famille, &request.cta);
        let chosen = select_offer(&ranked, &request.persona, &request.famille, rng);
        info!(
            "Offer for {}/{}/{}: {:?} out of {}",
            request.persona,
            request.famille,
            request.cta,
            chosen.and_then(|o| o.id.as_deref()),
            ranked.len()
        );
        offer_payload(request, chosen, deadline, &self.default_offer_link)
    }

    pub fn smartphone_from_candidates<R: Rng + ?Sized>(
        &self,
        request: &EquipmentRequest,
        brand: &str,
        candidates: &[SmartphoneRecord],
        deadline: String,
        rng: &mut R,
    ) -> ComposedPayload {
        let chosen = select_smartphone(candidates, &request.persona, brand, rng);
        info!(
            "Smartphone for {}/{} brand={:?}: {:?} out of {}",
            request.persona,
            request.famille,
            brand,
            chosen.and_then(|s| s.id.as_deref()),
            candidates.len()
        );
        smartphone_payload(request, chosen, deadline, &self.default_smartphone_link)
    }
}

/// Builds and probes the Qdrant client. Any failure means running without it.
async fn connect_index(config: &AppConfig) -> Option<Arc<dyn VectorIndex>> {
    let url = config.qdrant_url.as_deref()?;
    let timeout = Duration::from_millis(config.vector_timeout_ms);
    let index = match QdrantIndex::new(url, config.qdrant_api_key.clone(), timeout) {
        Ok(i) => i,
        Err(e) => {
            warn!("Cannot build Qdrant client for {}: {}", url, e);
            return None;
        }
    };
    match index.ping().await {
        Ok(()) => {
            info!("Connected to Qdrant at {}", url);
            Some(Arc::new(index))
        }
        Err(e) => {
            warn!("Unable to reach Qdrant at {}: {}", url, e);
            None
        }
    }
}
