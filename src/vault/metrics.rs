//! Ordered metrics record produced by `describe()`

use serde::ser::{Serialize, SerializeMap, Serializer};

pub const VAULT_BALANCE: &str = "vault balance";
pub const SHARE_PRICE: &str = "share price";
pub const VAULT_TOTAL: &str = "vault total";
pub const STRATEGY_BALANCE: &str = "strategy balance";
pub const AVAILABLE: &str = "available";
pub const STRATEGY_BUFFER: &str = "strategy buffer";
pub const EARNED: &str = "earned";
pub const LIFETIME_EARNED: &str = "lifetime earned";
pub const REWARD_RATE: &str = "reward rate";
pub const YGOV_BALANCE: &str = "ygov balance";
pub const YGOV_TOTAL: &str = "ygov total";
pub const TOKEN_PRICE: &str = "token price";
pub const TVL: &str = "tvl";

/// Key/value pairs in insertion order.
///
/// Re-inserting a key replaces its value where it already sits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsRecord {
    entries: Vec<(String, f64)>,
}

impl MetricsRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: f64) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn extend<I, K>(&mut self, fields: I)
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        for (key, value) in fields {
            self.insert(key.as_ref(), value);
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for MetricsRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
