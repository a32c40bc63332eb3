//! Marketing SMS payload composer: picks an offer or smartphone for a
//! persona/famille request and assembles the payload for text generation.

pub mod composer;
pub mod config;
pub mod formatter;
pub mod model;
pub mod normalizer;
pub mod ranking;
pub mod resolver;
pub mod storage;
pub mod utils;
pub mod vector;

pub use composer::{ComposeContext, to_llm_response};
pub use model::{Catalog, ComposeRequest, ComposedPayload, EquipmentRequest, OfferRequest};
