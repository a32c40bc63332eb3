use crate::formatter::{format_minutes, format_sms, format_validity, format_volume, promo_price};
use crate::model::{
    ComposeError, ComposeResponse, ComposedPayload, EquipmentRequest, Links, OfferContext, OfferRecord,
    OfferRequest, PromoContext, SmartphoneRecord,
};
use std::collections::BTreeMap;

pub const DEFAULT_OFFER_LINK: &str = "https://bit.ly/Recharge_IAM";
pub const DEFAULT_SMARTPHONE_LINK: &str = "https://offres.iam.ma/smartphones";
pub const GENERIC_SMARTPHONE_NAME: &str = "Smartphone";

fn assemble(
    persona: &str,
    famille: &str,
    cta: &str,
    deadline: String,
    offer_context: OfferContext,
    link: String,
    price: Option<f64>,
) -> ComposedPayload {
    ComposedPayload {
        persona: persona.to_string(),
        famille: famille.to_string(),
        cta: cta.to_string(),
        deadline,
        offer_context,
        promo_context: promo_price(price).map(|prix_promo_dh| PromoContext { prix_promo_dh }),
        links: Links { details: link },
    }
}

/// Builds the offer payload. Without a chosen offer the context still names a
/// generic `Pass <cta>`.
pub fn offer_payload(
    request: &OfferRequest,
    chosen: Option<&OfferRecord>,
    deadline: String,
    default_link: &str,
) -> ComposedPayload {
    let mut context = OfferContext {
        offre: format!("Pass {}", request.cta),
        ..OfferContext::default()
    };
    let mut price = None;

    if let Some(offer) = chosen {
        if let Some(libelle) = &offer.libelle {
            context.offre = libelle.clone();
        }
        price = offer.price;
        context.volume = format_volume(offer.volume_mb);
        context.minutes = format_minutes(offer.minutes);
        context.sms = format_sms(offer.sms_count);
        context.validite = format_validity(offer.validity_days);
        context.prix_dh = offer.price;
        context.destinations = offer.zone.clone();
        context.details = offer.link.clone();
    }

    let link = context
        .details
        .clone()
        .unwrap_or_else(|| default_link.to_string());
    assemble(
        &request.persona,
        &request.famille,
        &request.cta,
        deadline,
        context,
        link,
        price,
    )
}

pub fn smartphone_payload(
    request: &EquipmentRequest,
    chosen: Option<&SmartphoneRecord>,
    deadline: String,
    default_link: &str,
) -> ComposedPayload {
    let mut context = OfferContext {
        offre: GENERIC_SMARTPHONE_NAME.to_string(),
        ..OfferContext::default()
    };
    let mut price = None;
    let mut cta = String::new();
    let mut link = default_link.to_string();

    if let Some(phone) = chosen {
        context.modele = phone.model.clone();
        context.capacite = phone.capacity.clone();
        context.prix_dh = phone.price;
        price = phone.price;
        if let Some(l) = &phone.link {
            link = l.clone();
        }
        if let Some(c) = &phone.cta {
            cta = c.clone();
        }
    }

    assemble(&request.persona, &request.famille, &cta, deadline, context, link, price)
}

/// Wraps a payload into the envelope handed to the text-generation layer.
pub fn to_llm_response(payload: &ComposedPayload) -> Result<ComposeResponse, ComposeError> {
    let llm_input_json = serde_json::to_string(payload)?;
    let mut metadata = BTreeMap::new();
    metadata.insert("deadline".to_string(), payload.deadline.clone());
    metadata.insert("cta".to_string(), payload.cta.clone());
    Ok(ComposeResponse {
        llm_input_json,
        metadata,
    })
}
