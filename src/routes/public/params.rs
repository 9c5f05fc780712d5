//! Explicit request parsing for the public endpoints.
//!
//! No generic binder: each operation validates and constructs its typed
//! input here, and every parse failure becomes `InvalidInput` before any
//! business logic runs. Repeated `l` keys (list UUIDs) are the reason this
//! is hand-rolled; derive-based form extraction cannot express them.

use crate::domain::PublicId;
use crate::utils::PublicError;

/// Decodes an urlencoded query or form body into key/value pairs.
pub fn parse_pairs(raw: &str) -> Result<Vec<(String, String)>, PublicError> {
    serde_urlencoded::from_str::<Vec<(String, String)>>(raw)
        .map_err(|e| PublicError::InvalidInput(e.to_string()))
}

/// All values for the repeated `l` key, parsed as identifiers. Any
/// malformed entry poisons the whole set.
pub fn list_filter(pairs: &[(String, String)]) -> Result<Vec<PublicId>, PublicError> {
    pairs
        .iter()
        .filter(|(key, _)| key == "l")
        .map(|(_, value)| PublicId::parse(value).map_err(PublicError::InvalidInput))
        .collect()
}

/// Boolean intent flags as posted by HTML forms.
pub fn flag(pairs: &[(String, String)], key: &str) -> bool {
    pairs
        .iter()
        .any(|(k, v)| k == key && matches!(v.as_str(), "true" | "1" | "t" | "on"))
}

pub fn value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Path identifiers; malformed ones surface as `InvalidInput`, which the
/// page layer renders exactly like `NotFound`.
pub fn public_id(raw: &str) -> Result<PublicId, PublicError> {
    PublicId::parse(raw).map_err(PublicError::InvalidInput)
}
