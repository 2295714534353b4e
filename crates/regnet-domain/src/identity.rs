//! Identity canonicalization
//!
//! Every node id is a pure function of the entity's logical identity, so
//! re-ingesting the same company, person or address from any provider
//! resolves to the same node. Ids for named entities are content-addressed:
//! the canonicalized key tuple is hashed with SHA-1 and the first 12 hex
//! digits are kept.
//!
//! # Examples
//!
//! ```
//! use regnet_domain::identity::{person_id, normalize};
//!
//! assert_eq!(normalize("  Ján   NOVÁK, Ing. "), "jan novak ing.");
//! assert_eq!(
//!     person_id("SK", "Ján Novák", ""),
//!     person_id("SK", "JAN  NOVAK", ""),
//! );
//! ```

use sha1::{Digest, Sha1};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Number of hex digits kept from the SHA-1 digest
pub const ID_HASH_HEX_LEN: usize = 12;

/// Legal-form tokens, in normalized form with a leading space
///
/// A token matches when it occurs in the space-prefixed normalized name and
/// is not immediately followed by another letter or digit.
pub const LEGAL_ENTITY_TOKENS: &[&str] = &[
    " s.r.o",
    " s. r. o",
    " a.s",
    " k.s",
    " v.o.s",
    " se",
    " b.v",
    " gmbh",
    " ag",
    " ltd",
    " inc",
    " s.a",
    " sas",
    " sp. z o.o",
    " spolka",
    " społka",
    " oy",
    " ab",
];

/// Whether a name denotes a natural person or a legal entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A natural person
    Person,
    /// A company or other registered legal form
    LegalEntity,
}

/// Canonicalize free text for identity keys
///
/// Strips diacritics, lowercases, collapses whitespace runs to a single
/// space, then removes punctuation other than `.`, `-` and `/`. The steps run
/// in this order so that ids stay compatible with previously stored data.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();

    let mut collapsed = String::with_capacity(folded.len());
    let mut in_space = false;
    for c in folded.trim().chars() {
        if c.is_whitespace() {
            if !in_space {
                collapsed.push(' ');
            }
            in_space = true;
        } else {
            collapsed.push(c);
            in_space = false;
        }
    }

    collapsed
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == ' ' || matches!(c, '.' | '-' | '/'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Classify a shareholder/owner name by its legal-form suffix
pub fn classify_entity(name: &str) -> EntityKind {
    let padded = format!(" {}", normalize(name));

    let has_token = LEGAL_ENTITY_TOKENS
        .iter()
        .any(|token| contains_token(&padded, token));

    if has_token || padded.contains("b.v") {
        EntityKind::LegalEntity
    } else {
        EntityKind::Person
    }
}

fn contains_token(haystack: &str, token: &str) -> bool {
    haystack.match_indices(token).any(|(pos, _)| {
        haystack[pos + token.len()..]
            .chars()
            .next()
            .map_or(true, |next| !next.is_alphanumeric())
    })
}

/// First 12 hex digits of the SHA-1 digest of `key`
pub fn short_hash(key: &str) -> String {
    let digest = Sha1::digest(key.as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(ID_HASH_HEX_LEN);
    hex
}

/// Node id of a natural person
///
/// `pers_<cc>_<hash(country|name|birth_date)>`. An empty birth date is a
/// valid (and common) input; two namesakes without birth dates collapse into
/// one node.
pub fn person_id(country: &str, name: &str, birth_date: &str) -> String {
    let key = format!("{}|{}|{}", country, normalize(name), normalize(birth_date));
    format!("pers_{}_{}", country.to_lowercase(), short_hash(&key))
}

/// Node id of a legal-entity owner referenced only by name
pub fn owner_id(country: &str, name: &str) -> String {
    let key = format!("{}|{}", country, normalize(name));
    format!("own_{}_{}", country.to_lowercase(), short_hash(&key))
}

/// Node id of a company resolved to its registry record
///
/// The registry id is already a stable natural key, so it is used verbatim.
pub fn company_id(country: &str, registry_id: &str) -> String {
    format!("{}_{}", country.to_lowercase(), registry_id)
}

/// Node id of an address, keyed by its canonicalized label
pub fn address_id(country: &str, label: &str) -> String {
    let key = format!("{}|{}", country, normalize(label));
    format!("addr_{}_{}", country.to_lowercase(), short_hash(&key))
}

/// Node id of the debt record attached to a company
pub fn debt_id(country: &str, registry_id: &str) -> String {
    format!("debt_{}_{}", country.to_lowercase(), registry_id)
}

/// Node id of a former company name
pub fn history_id(country: &str, registry_id: &str, name: &str) -> String {
    let key = format!("{}|{}|{}", country, registry_id, normalize(name));
    format!("hist_{}_{}", country.to_lowercase(), short_hash(&key))
}
