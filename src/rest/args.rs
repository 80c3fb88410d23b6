use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::rest::error::ApiError;

/// Value of a single request argument.
///
/// `Text` covers every scalar (the wire encoding is stringly-typed anyway);
/// `File` is an explicit reference to on-disk content for upload fields.
/// Keys ending in `_file` with a `Text` value are promoted to uploads by the
/// client, see [`crate::rest::client::EvdbClient::call`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Text(String),
    File(PathBuf),
}

impl ArgValue {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<u64> for ArgValue {
    fn from(value: u64) -> Self {
        Self::Text(value.to_string())
    }
}

/// Caller-supplied argument collection, in either of the two shapes the API
/// accepts: an ordered pair sequence or a keyed mapping.
///
/// Both shapes normalize to the same canonical entry list when they encode
/// the same key/value associations; only the iteration order may differ
/// (input order for `Pairs`, key order for `Map`).
#[derive(Debug, Clone)]
pub enum RequestArgs {
    Pairs(Vec<(String, ArgValue)>),
    Map(BTreeMap<String, ArgValue>),
}

impl RequestArgs {
    /// Empty argument list, for methods that only need the injected
    /// credential defaults.
    pub fn none() -> Self {
        Self::Pairs(Vec::new())
    }

    /// Build from a flat alternating `[key, value, key, value, ...]` list.
    ///
    /// This mirrors the wire-facing calling convention of the service's
    /// method catalog. A list with an odd number of items has no pair
    /// interpretation and is rejected.
    pub fn pairs<I, S>(flat: I) -> Result<Self, ApiError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<String> = flat.into_iter().map(Into::into).collect();
        if items.len() % 2 != 0 {
            return Err(ApiError::Argument(format!(
                "flat pair list has odd length {}",
                items.len()
            )));
        }
        let mut out = Vec::with_capacity(items.len() / 2);
        let mut iter = items.into_iter();
        while let (Some(key), Some(value)) = (iter.next(), iter.next()) {
            out.push((key, ArgValue::Text(value)));
        }
        Ok(Self::Pairs(out))
    }
}

impl Default for RequestArgs {
    fn default() -> Self {
        Self::none()
    }
}

impl From<Vec<(String, ArgValue)>> for RequestArgs {
    fn from(pairs: Vec<(String, ArgValue)>) -> Self {
        Self::Pairs(pairs)
    }
}

impl<const N: usize> From<[(&str, ArgValue); N]> for RequestArgs {
    fn from(pairs: [(&str, ArgValue); N]) -> Self {
        Self::Pairs(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }
}

impl<const N: usize> From<[(&str, &str); N]> for RequestArgs {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self::Pairs(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), ArgValue::from(v)))
                .collect(),
        )
    }
}

impl From<BTreeMap<String, ArgValue>> for RequestArgs {
    fn from(map: BTreeMap<String, ArgValue>) -> Self {
        Self::Map(map)
    }
}

/// Canonical ordered entry list produced from [`RequestArgs`].
///
/// Preserves the caller's order and supports presence testing so injected
/// credential defaults never shadow explicit values.
#[derive(Debug, Clone, Default)]
pub struct CanonicalArgs {
    entries: Vec<(String, ArgValue)>,
}

impl CanonicalArgs {
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// First value recorded for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Append a default entry unless the key is already present. Explicit
    /// caller values always take precedence over client defaults.
    pub fn push_default(&mut self, key: &str, value: &str) {
        if !self.contains_key(key) {
            self.entries
                .push((key.to_string(), ArgValue::Text(value.to_string())));
        }
    }

    pub fn entries(&self) -> &[(String, ArgValue)] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<(String, ArgValue)> {
        self.entries
    }
}

/// Flatten either argument shape into the canonical ordered entry list.
pub fn normalize(args: RequestArgs) -> CanonicalArgs {
    let entries = match args {
        RequestArgs::Pairs(pairs) => pairs,
        RequestArgs::Map(map) => map.into_iter().collect(),
    };
    CanonicalArgs { entries }
}
