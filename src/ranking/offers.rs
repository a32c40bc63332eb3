use crate::model::OfferRecord;
use crate::ranking::pick_uniform;
use crate::resolver::cmp_price_absent_first;
use rand::Rng;
use std::cmp::Ordering;
use tracing::debug;

/// CTAs whose offers rotate: incoming order is kept and the pick is random.
pub const ROTATING_CTAS: [&str; 9] = ["*6", "*5", "*4", "*3", "*2", "*1", "*22", "*88", "Forfait_Business"];

const ECONOME: &str = "PROFIL_Econome";
const EQUIPMENT_FAMILLE: &str = "OPPORTUNITE_Achat_Equipement";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingPolicy {
    /// Most generous data volume first.
    DataVolumeDesc,
    /// Cheapest first, absent price counted as 0.
    PriceAsc,
    Rotating,
    AsListed,
}

impl RankingPolicy {
    /// First matching rule wins.
    pub fn for_request(persona: &str, famille: &str, cta: &str) -> Self {
        if famille == "USAGE_Internet" && matches!(persona, "PROFIL_Internet" | "PROFIL_ReseauxSociaux") {
            RankingPolicy::DataVolumeDesc
        } else if famille.starts_with("RISQUE_") || persona.starts_with("CHURN_") || persona == ECONOME {
            RankingPolicy::PriceAsc
        } else if ROTATING_CTAS.iter().any(|c| *c == cta) {
            RankingPolicy::Rotating
        } else {
            RankingPolicy::AsListed
        }
    }
}

pub fn rank_offers(mut candidates: Vec<OfferRecord>, persona: &str, famille: &str, cta: &str) -> Vec<OfferRecord> {
    let policy = RankingPolicy::for_request(persona, famille, cta);
    debug!("Ranking {} offers with {:?}", candidates.len(), policy);
    match policy {
        RankingPolicy::DataVolumeDesc => candidates.sort_by(|a, b| match (a.volume_mb, b.volume_mb) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }),
        RankingPolicy::PriceAsc => candidates.sort_by(|a, b| cmp_price_absent_first(a.price, b.price)),
        RankingPolicy::Rotating | RankingPolicy::AsListed => {}
    }
    candidates
}

/// Econome customers get the cheapest priced offer; other non-equipment
/// families get a random ranked offer for variety; otherwise the top one.
pub fn select_offer<'a, R: Rng + ?Sized>(
    ranked: &'a [OfferRecord],
    persona: &str,
    famille: &str,
    rng: &mut R,
) -> Option<&'a OfferRecord> {
    if persona == ECONOME {
        return ranked.iter().min_by(|a, b| {
            a.price
                .unwrap_or(f64::INFINITY)
                .total_cmp(&b.price.unwrap_or(f64::INFINITY))
        });
    }
    if famille != EQUIPMENT_FAMILLE && ranked.len() > 1 {
        return pick_uniform(ranked, rng);
    }
    ranked.first()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawRow;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn offer(id: &str, price: Option<f64>, volume: Option<f64>) -> OfferRecord {
        let mut row = RawRow::new();
        row.insert("id".into(), id.into());
        if let Some(p) = price {
            row.insert("prix_dh".into(), p.to_string());
        }
        if let Some(v) = volume {
            row.insert("volume".into(), v.to_string());
        }
        OfferRecord::from_row(&row)
    }

    fn prices(offers: &[OfferRecord]) -> Vec<Option<f64>> {
        offers.iter().map(|o| o.price).collect()
    }

    #[test]
    fn policy_rules_are_ordered() {
        use RankingPolicy::*;
        assert_eq!(RankingPolicy::for_request("PROFIL_Internet", "USAGE_Internet", "*3"), DataVolumeDesc);
        assert_eq!(RankingPolicy::for_request("PROFIL_ReseauxSociaux", "USAGE_Internet", "*3"), DataVolumeDesc);
        assert_eq!(RankingPolicy::for_request("PROFIL_Econome", "USAGE_Internet", "*3"), PriceAsc);
        assert_eq!(RankingPolicy::for_request("PROFIL_Internet", "RISQUE_Churn", "*3"), PriceAsc);
        assert_eq!(RankingPolicy::for_request("CHURN_Competiteur", "USAGE_Voix", "*3"), PriceAsc);
        assert_eq!(RankingPolicy::for_request("PROFIL_Voix", "USAGE_Voix", "*22"), Rotating);
        assert_eq!(RankingPolicy::for_request("PROFIL_Voix", "USAGE_Voix", "*78"), AsListed);
    }

    #[test]
    fn internet_profiles_rank_by_volume_desc() {
        let ranked = rank_offers(
            vec![
                offer("a", None, Some(500.0)),
                offer("b", None, Some(2000.0)),
                offer("c", None, Some(1000.0)),
            ],
            "PROFIL_Internet",
            "USAGE_Internet",
            "*3",
        );
        let volumes: Vec<Option<f64>> = ranked.iter().map(|o| o.volume_mb).collect();
        assert_eq!(volumes, vec![Some(2000.0), Some(1000.0), Some(500.0)]);
    }

    #[test]
    fn absent_volume_ranks_below_negative_volume() {
        let ranked = rank_offers(
            vec![
                offer("unlimited", None, Some(-1.0)),
                offer("absent", None, None),
                offer("big", None, Some(2048.0)),
            ],
            "PROFIL_Internet",
            "USAGE_Internet",
            "*6",
        );
        let order: Vec<&str> = ranked.iter().filter_map(|o| o.id.as_deref()).collect();
        assert_eq!(order, vec!["big", "unlimited", "absent"]);
    }

    #[test]
    fn risk_families_rank_by_price_asc() {
        let ranked = rank_offers(
            vec![
                offer("a", Some(50.0), None),
                offer("b", Some(10.0), None),
                offer("c", Some(30.0), None),
            ],
            "anything",
            "RISQUE_Churn",
            "*78",
        );
        assert_eq!(prices(&ranked), vec![Some(10.0), Some(30.0), Some(50.0)]);
    }

    #[test]
    fn rotating_and_default_keep_incoming_order() {
        let incoming = vec![offer("a", Some(50.0), None), offer("b", Some(10.0), None)];
        let rotating = rank_offers(incoming.clone(), "PROFIL_Voix", "USAGE_Voix", "*5");
        assert_eq!(rotating, incoming);
        let listed = rank_offers(incoming.clone(), "PROFIL_Voix", "USAGE_Voix", "*78");
        assert_eq!(listed, incoming);
    }

    #[test]
    fn econome_always_gets_cheapest_priced() {
        let ranked = vec![
            offer("none", None, None),
            offer("80", Some(80.0), None),
            offer("50", Some(50.0), None),
            offer("65", Some(65.0), None),
        ];
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let chosen = select_offer(&ranked, "PROFIL_Econome", "RISQUE_Churn", &mut rng).unwrap();
            assert_eq!(chosen.price, Some(50.0));
        }
    }

    #[test]
    fn econome_with_no_prices_takes_first() {
        let ranked = vec![offer("x", None, None), offer("y", None, None)];
        let mut rng = StdRng::seed_from_u64(3);
        let chosen = select_offer(&ranked, "PROFIL_Econome", "RISQUE_Churn", &mut rng).unwrap();
        assert_eq!(chosen.id.as_deref(), Some("x"));
    }

    #[test]
    fn other_personas_pick_among_ranked() {
        let ranked = vec![offer("a", Some(1.0), None), offer("b", Some(2.0), None), offer("c", Some(3.0), None)];
        let mut rng = StdRng::seed_from_u64(5);
        let mut picked = std::collections::HashSet::new();
        for _ in 0..100 {
            let chosen = select_offer(&ranked, "PROFIL_Voix", "USAGE_Voix", &mut rng).unwrap();
            picked.insert(chosen.id.clone().unwrap());
        }
        assert_eq!(picked.len(), 3);
    }

    #[test]
    fn equipment_family_and_singletons_take_first() {
        let ranked = vec![offer("a", Some(1.0), None), offer("b", Some(2.0), None)];
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..20 {
            let chosen = select_offer(&ranked, "PROFIL_Voix", EQUIPMENT_FAMILLE, &mut rng).unwrap();
            assert_eq!(chosen.id.as_deref(), Some("a"));
        }
        let single = &ranked[1..];
        let chosen = select_offer(single, "PROFIL_Voix", "USAGE_Voix", &mut rng).unwrap();
        assert_eq!(chosen.id.as_deref(), Some("b"));
        assert!(select_offer(&[], "PROFIL_Voix", "USAGE_Voix", &mut rng).is_none());
    }
}
