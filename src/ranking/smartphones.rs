use crate::model::SmartphoneRecord;
use crate::ranking::pick_uniform;
use rand::Rng;
use tracing::debug;

pub const PRICE_POOL_SIZE: usize = 15;
pub const NEW_RELEASE_POOL_SIZE: usize = 3;

/// Cheapest first. Unlike the resolver's ordering, an absent price sorts last.
fn ascending_by_price(candidates: &[SmartphoneRecord]) -> Vec<&SmartphoneRecord> {
    let mut sorted: Vec<&SmartphoneRecord> = candidates.iter().collect();
    sorted.sort_by(|a, b| {
        a.price
            .unwrap_or(f64::INFINITY)
            .total_cmp(&b.price.unwrap_or(f64::INFINITY))
    });
    sorted
}

/// Most expensive first. Records without a price follow every priced one,
/// in reverse of their incoming order.
fn descending_by_price<'a>(candidates: &[&'a SmartphoneRecord]) -> Vec<&'a SmartphoneRecord> {
    let (mut priced, unpriced): (Vec<&SmartphoneRecord>, Vec<&SmartphoneRecord>) =
        candidates.iter().copied().partition(|s| s.price.is_some());
    priced.sort_by(|a, b| b.price.unwrap_or(0.0).total_cmp(&a.price.unwrap_or(0.0)));
    priced.extend(unpriced.into_iter().rev());
    priced
}

/// The set a smartphone is drawn from for `persona`. `brand` is a canonical
/// token, empty when the customer's brand is unknown.
pub fn smartphone_pool<'a>(candidates: &'a [SmartphoneRecord], persona: &str, brand: &str) -> Vec<&'a SmartphoneRecord> {
    let sorted_asc = ascending_by_price(candidates);

    let pool: Vec<&SmartphoneRecord> = match persona {
        "OPPORTUNITE_AchatSmartphone" => sorted_asc.iter().copied().take(PRICE_POOL_SIZE).collect(),
        "OPPORTUNITE_PerformanceSmartphone" => descending_by_price(&sorted_asc)
            .into_iter()
            .take(PRICE_POOL_SIZE)
            .collect(),
        "OPPORTUNITE_AchatNouveaute" if !brand.is_empty() => {
            let brand_items: Vec<&SmartphoneRecord> = candidates.iter().filter(|s| s.brand_is(brand)).collect();
            let priced: Vec<&SmartphoneRecord> = brand_items.iter().copied().filter(|s| s.price.is_some()).collect();
            if priced.is_empty() {
                brand_items.into_iter().take(NEW_RELEASE_POOL_SIZE).collect()
            } else {
                descending_by_price(&priced)
                    .into_iter()
                    .take(NEW_RELEASE_POOL_SIZE)
                    .collect()
            }
        }
        _ => sorted_asc.clone(),
    };

    if pool.is_empty() {
        debug!("Empty smartphone pool for {}, using full price list", persona);
        return sorted_asc;
    }
    pool
}

pub fn select_smartphone<'a, R: Rng + ?Sized>(
    candidates: &'a [SmartphoneRecord],
    persona: &str,
    brand: &str,
    rng: &mut R,
) -> Option<&'a SmartphoneRecord> {
    let pool = smartphone_pool(candidates, persona, brand);
    pick_uniform(&pool, rng).copied()
}
