//! Referral/URL Builder (component F): maps a 16-hex-char hash to a
//! purchase URL so a front-end redirector can serve `/links/{hash}` without
//! exposing the destination (and, incidentally, without needing the
//! destination baked into every card JSON blob).

use crate::assembly;
use crate::error::Result;
use crate::models::CardSet;
use sha2::{Digest, Sha256};
use std::io::Write as _;
use std::path::Path;

/// One of the three providers this crate derives referral hashes for.
/// Each provider salts its hash differently, so the same UUID yields three
/// distinct hashes — one per provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferralProvider {
    CardKingdom,
    Tcgplayer,
    Cardmarket,
}

impl ReferralProvider {
    fn salt(self) -> &'static str {
        match self {
            ReferralProvider::CardKingdom => "cardatlas-card-kingdom",
            ReferralProvider::Tcgplayer => "cardatlas-tcgplayer",
            ReferralProvider::Cardmarket => "cardatlas-cardmarket",
        }
    }
}

/// A single `hash -> destination URL` entry for the referral map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferralEntry {
    pub hash: String,
    pub destination: String,
}

/// Deterministic 16-hex-char hash of `providerSalt || identifier || uuid [|| extra]`.
/// Identical inputs always yield the identical hash, so repeat builds don't
/// reshuffle existing front-end links.
pub fn referral_hash(provider: ReferralProvider, identifier: &str, uuid: &str, extra: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(provider.salt().as_bytes());
    hasher.update(identifier.as_bytes());
    hasher.update(uuid.as_bytes());
    if let Some(extra) = extra {
        hasher.update(extra.as_bytes());
    }
    let digest = hasher.finalize();
    hex::encode(digest)[..16].to_string()
}

/// Builds one [`ReferralEntry`] per `(provider, identifier, destination)`
/// triple the caller has resolved from a card's `purchaseUrls`.
pub fn build_referral_map(
    links: &[(ReferralProvider, String, String, String)],
) -> Vec<ReferralEntry> {
    links
        .iter()
        .map(|(provider, identifier, uuid, destination)| ReferralEntry {
            hash: referral_hash(*provider, identifier, uuid, None),
            destination: destination.clone(),
        })
        .collect()
}

/// One `(destination key in purchaseUrls, provider, identifier key in
/// identifiers, finish discriminator)` row. The finish discriminator folds
/// into the hash's `extra` slot so `cardKingdom`/`cardKingdomFoil`/
/// `cardKingdomEtched` (same provider, same underlying card) still hash
/// distinctly.
const PURCHASE_URL_KEYS: &[(&str, ReferralProvider, &str, Option<&str>)] = &[
    ("cardKingdom", ReferralProvider::CardKingdom, "cardKingdomId", None),
    (
        "cardKingdomFoil",
        ReferralProvider::CardKingdom,
        "cardKingdomFoilId",
        Some("foil"),
    ),
    (
        "cardKingdomEtched",
        ReferralProvider::CardKingdom,
        "cardKingdomEtchedId",
        Some("etched"),
    ),
    ("tcgplayer", ReferralProvider::Tcgplayer, "tcgplayerProductId", None),
    (
        "tcgplayerEtched",
        ReferralProvider::Tcgplayer,
        "tcgplayerEtchedProductId",
        Some("etched"),
    ),
    ("cardmarket", ReferralProvider::Cardmarket, "mcmId", None),
];

/// Derives every [`ReferralEntry`] a single compiled card supports, reading
/// its already-resolved `purchaseUrls` (the destination) against its
/// `identifiers` (the provider-native ID the hash is salted with). A card
/// with no `purchaseUrls` at all (§8 boundary behavior: the column is
/// absent, not `{}`) contributes nothing.
pub fn referral_entries_for_card(card: &CardSet) -> Vec<ReferralEntry> {
    let Some(urls) = card.purchase_urls.as_ref().and_then(|v| v.as_object()) else {
        return Vec::new();
    };
    let identifiers = card.identifiers.as_ref().and_then(|v| v.as_object());

    let mut entries = Vec::new();
    for (url_key, provider, id_key, extra) in PURCHASE_URL_KEYS {
        let Some(destination) = urls.get(*url_key).and_then(|v| v.as_str()) else {
            continue;
        };
        let identifier = identifiers
            .and_then(|obj| obj.get(*id_key))
            .and_then(|v| v.as_str())
            .unwrap_or("");
        entries.push(ReferralEntry {
            hash: referral_hash(*provider, identifier, &card.uuid, *extra),
            destination: destination.to_string(),
        });
    }
    entries
}

/// Walks every set the card pipeline has written a partition for, collects
/// every card's referral entries, and writes the spec's flat redirect map
/// (`/links/{16-hex-hash} -> destination URL;`, one entry per line, sorted
/// by hash so reruns against the same source snapshot produce a stable
/// diff) to `output_root/ReferralMap.txt`. Duplicate hashes (the same
/// provider/identifier/uuid/finish resolved twice, e.g. via a variation)
/// keep the first destination seen after sorting.
pub fn write_referral_map(cache_root: &Path, output_root: &Path) -> Result<()> {
    let mut entries = Vec::new();
    for set_code in assembly::discover_set_codes(cache_root)? {
        for card in assembly::cards_for_set(cache_root, &set_code)? {
            entries.extend(referral_entries_for_card(&card));
        }
    }
    entries.sort_by(|a, b| a.hash.cmp(&b.hash));
    entries.dedup_by(|a, b| a.hash == b.hash);

    std::fs::create_dir_all(output_root)?;
    let path = output_root.join("ReferralMap.txt");
    let mut file = std::fs::File::create(&path)?;
    for entry in &entries {
        writeln!(file, "/links/{} -> {};", entry.hash, entry.destination)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_sixteen_hex_chars() {
        let hash = referral_hash(ReferralProvider::Tcgplayer, "12345", "uuid-a", None);
        assert_eq!(hash.len(), 16);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn same_inputs_yield_same_hash() {
        let a = referral_hash(ReferralProvider::CardKingdom, "9", "uuid-b", None);
        let b = referral_hash(ReferralProvider::CardKingdom, "9", "uuid-b", None);
        assert_eq!(a, b);
    }

    #[test]
    fn different_providers_yield_different_hashes_for_same_uuid() {
        let ck = referral_hash(ReferralProvider::CardKingdom, "1", "uuid-c", None);
        let tcg = referral_hash(ReferralProvider::Tcgplayer, "1", "uuid-c", None);
        assert_ne!(ck, tcg);
    }
}
