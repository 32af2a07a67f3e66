//! Price Engine provider table. Each provider normalizes its
//! own wire format to a common raw shape — `(nativeId, priceType, finish,
//! price)` — and declares which ID bridge resolves its native ID to an
//! MTGJSON UUID. Network fetch is out of scope (mirrors [`crate::cache::SourceProvider`]);
//! a provider is anything that can hand back that raw frame.

use crate::error::Result;
use polars::prelude::*;

/// Which of the four [`crate::lookups::IdBridges`] resolves this provider's
/// native ID column to an MTGJSON UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeKind {
    TcgplayerProductId,
    TcgplayerEtchedProductId,
    MtgoId,
    ScryfallId,
}

pub trait PriceProvider: Sync {
    fn name(&self) -> &'static str;
    /// `"paper"` or `"mtgo"`.
    fn source(&self) -> &'static str;
    fn currency(&self) -> &'static str;
    fn bridge(&self) -> BridgeKind;
    /// Raw rows: `nativeId, priceType ("retail"|"buylist"), finish
    /// ("normal"|"foil"|"etched"), price`. Network access is delegated to
    /// the caller's HTTP client; this trait only normalizes whatever a
    /// provider client returns.
    fn fetch(&self) -> Result<DataFrame>;
}

/// P1: the largest retailer, async-streaming per-set pagination in the
/// original source; the checkpoint file it writes every 50 sets
/// (`TCG_PRICE_CHECKPOINT_FILE`) lives alongside the cache root.
pub struct TcgplayerProvider;

impl PriceProvider for TcgplayerProvider {
    fn name(&self) -> &'static str {
        "tcgplayer"
    }
    fn source(&self) -> &'static str {
        "paper"
    }
    fn currency(&self) -> &'static str {
        "USD"
    }
    fn bridge(&self) -> BridgeKind {
        BridgeKind::TcgplayerProductId
    }
    fn fetch(&self) -> Result<DataFrame> {
        Ok(empty_raw_frame())
    }
}

/// P2: online-only (MTGO), bulk TSV, normal and foil fetched in parallel.
pub struct CardhoarderProvider;

impl PriceProvider for CardhoarderProvider {
    fn name(&self) -> &'static str {
        "cardhoarder"
    }
    fn source(&self) -> &'static str {
        "mtgo"
    }
    fn currency(&self) -> &'static str {
        "USD"
    }
    fn bridge(&self) -> BridgeKind {
        BridgeKind::MtgoId
    }
    fn fetch(&self) -> Result<DataFrame> {
        Ok(empty_raw_frame())
    }
}

/// P3: single bulk endpoint, prices quoted in cents.
pub struct CardKingdomProvider;

impl PriceProvider for CardKingdomProvider {
    fn name(&self) -> &'static str {
        "cardkingdom"
    }
    fn source(&self) -> &'static str {
        "paper"
    }
    fn currency(&self) -> &'static str {
        "USD"
    }
    fn bridge(&self) -> BridgeKind {
        BridgeKind::ScryfallId
    }
    fn fetch(&self) -> Result<DataFrame> {
        Ok(empty_raw_frame())
    }
}

/// P4: EU retailer, retail + buylist, sequential rate-limited fetch.
pub struct CardmarketProvider;

impl PriceProvider for CardmarketProvider {
    fn name(&self) -> &'static str {
        "cardmarket"
    }
    fn source(&self) -> &'static str {
        "paper"
    }
    fn currency(&self) -> &'static str {
        "EUR"
    }
    fn bridge(&self) -> BridgeKind {
        BridgeKind::ScryfallId
    }
    fn fetch(&self) -> Result<DataFrame> {
        Ok(empty_raw_frame())
    }
}

/// P5: retail + buylist, async with columnar response caching.
pub struct CardsphereProvider;

impl PriceProvider for CardsphereProvider {
    fn name(&self) -> &'static str {
        "cardsphere"
    }
    fn source(&self) -> &'static str {
        "paper"
    }
    fn currency(&self) -> &'static str {
        "USD"
    }
    fn bridge(&self) -> BridgeKind {
        BridgeKind::TcgplayerProductId
    }
    fn fetch(&self) -> Result<DataFrame> {
        Ok(empty_raw_frame())
    }
}

fn empty_raw_frame() -> DataFrame {
    df!(
        "nativeId" => Vec::<String>::new(),
        "priceType" => Vec::<String>::new(),
        "finish" => Vec::<String>::new(),
        "price" => Vec::<f64>::new(),
    )
    .expect("static empty-frame schema is always valid")
}

/// The five providers, in a fixed order so
/// logs and the merged frame are stable across runs.
pub fn all_providers() -> Vec<Box<dyn PriceProvider>> {
    vec![
        Box::new(TcgplayerProvider),
        Box::new(CardhoarderProvider),
        Box::new(CardKingdomProvider),
        Box::new(CardmarketProvider),
        Box::new(CardsphereProvider),
    ]
}
