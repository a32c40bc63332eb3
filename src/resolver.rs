// Candidate lookup: vector index first, local catalog snapshot as fallback
use crate::model::{Catalog, OfferRecord, RawRow, SmartphoneRecord};
use crate::vector::{FieldFilter, RecordKind, VectorIndex};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_QUERY_LIMIT: usize = 50;

/// Ascending price order where an absent price counts as 0.
pub fn cmp_price_absent_first(a: Option<f64>, b: Option<f64>) -> Ordering {
    a.unwrap_or(0.0).total_cmp(&b.unwrap_or(0.0))
}

pub struct CandidateResolver {
    catalog: Arc<Catalog>,
    index: Option<Arc<dyn VectorIndex>>,
    offers_collection: String,
    smartphones_collection: String,
    limit: usize,
}

impl CandidateResolver {
    pub fn new(catalog: Arc<Catalog>, index: Option<Arc<dyn VectorIndex>>) -> Self {
        Self {
            catalog,
            index,
            offers_collection: "offres".to_string(),
            smartphones_collection: "smartphones".to_string(),
            limit: DEFAULT_QUERY_LIMIT,
        }
    }

    pub fn with_collections(mut self, offers: &str, smartphones: &str) -> Self {
        self.offers_collection = offers.to_string();
        self.smartphones_collection = smartphones.to_string();
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    pub fn has_index(&self) -> bool {
        self.index.is_some()
    }

    /// Offers for a CTA, narrowed to the famille when possible. Never fails:
    /// index errors degrade to the local catalog.
    pub async fn resolve_offers(&self, famille: &str, cta: &str) -> Vec<OfferRecord> {
        let strict = [FieldFilter::new("cta", cta), FieldFilter::new("famille", famille)];
        let mut rows = self
            .query_index(&self.offers_collection, RecordKind::Offer, &strict)
            .await;
        if rows.is_empty() && self.has_index() {
            debug!("No indexed offer for cta={} famille={}, relaxing famille", cta, famille);
            rows = self
                .query_index(&self.offers_collection, RecordKind::Offer, &strict[..1])
                .await;
        }

        if rows.is_empty() {
            debug!("Falling back to local offers for cta={}", cta);
            return self.local_offers(famille, cta);
        }

        let mut offers: Vec<OfferRecord> = rows.iter().map(OfferRecord::from_row).collect();
        offers.sort_by(|a, b| cmp_price_absent_first(a.price, b.price));
        offers
    }

    /// Smartphones, optionally restricted to a canonical brand token.
    pub async fn resolve_smartphones(&self, brand: &str) -> Vec<SmartphoneRecord> {
        let filters: Vec<FieldFilter> = if brand.is_empty() {
            Vec::new()
        } else {
            vec![FieldFilter::new("marque", brand)]
        };
        let rows = self
            .query_index(&self.smartphones_collection, RecordKind::Smartphone, &filters)
            .await;

        if rows.is_empty() {
            debug!("Falling back to local smartphones for brand={:?}", brand);
            return self.local_smartphones(brand);
        }

        let mut phones: Vec<SmartphoneRecord> = rows.iter().map(SmartphoneRecord::from_row).collect();
        phones.sort_by(|a, b| cmp_price_absent_first(a.price, b.price));
        phones
    }

    async fn query_index(
        &self,
        collection: &str,
        kind: RecordKind,
        filters: &[FieldFilter],
    ) -> Vec<RawRow> {
        let Some(index) = &self.index else {
            return Vec::new();
        };
        match index.query(collection, kind, filters, self.limit).await {
            Ok(mut rows) => {
                rows.truncate(self.limit);
                debug!("Vector index returned {} rows from {}", rows.len(), collection);
                rows
            }
            Err(e) => {
                warn!("Vector query on {} failed, using local catalog: {}", collection, e);
                Vec::new()
            }
        }
    }

    fn local_offers(&self, famille: &str, cta: &str) -> Vec<OfferRecord> {
        let by_cta: Vec<&OfferRecord> = self.catalog.offers.iter().filter(|o| o.cta_is(cta)).collect();
        let strict: Vec<&OfferRecord> = by_cta.iter().copied().filter(|o| o.famille_is(famille)).collect();
        let chosen = if strict.is_empty() { by_cta } else { strict };
        let mut offers: Vec<OfferRecord> = chosen.into_iter().cloned().collect();
        offers.sort_by(|a, b| cmp_price_absent_first(a.price, b.price));
        offers
    }

    fn local_smartphones(&self, brand: &str) -> Vec<SmartphoneRecord> {
        let all = &self.catalog.smartphones;
        let mut phones: Vec<SmartphoneRecord> = if brand.is_empty() {
            all.clone()
        } else {
            let filtered: Vec<SmartphoneRecord> = all.iter().filter(|s| s.brand_is(brand)).cloned().collect();
            if filtered.is_empty() { all.clone() } else { filtered }
        };
        phones.sort_by(|a, b| cmp_price_absent_first(a.price, b.price));
        phones
    }
}
