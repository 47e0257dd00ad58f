//! Optional method surfaces a bound contract may expose

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// One optional operation (or operation group) on a vault or strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Vault: `available()`
    Available,
    /// Vault: buffer `min()`
    Min,
    /// Vault: buffer `max()`
    Max,
    /// Vault: `underlying()` of a delegated / wrapped vault
    Underlying,
    /// Strategy: Curve voter proxy (`proxy()`, `voter()`, `curve()`, `gauge()`)
    Proxy,
    /// Strategy: lifetime `earned()`
    Earned,
    /// Strategy: governance staking contract via `gov()`
    Governance,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Available => write!(f, "available"),
            Capability::Min => write!(f, "min"),
            Capability::Max => write!(f, "max"),
            Capability::Underlying => write!(f, "underlying"),
            Capability::Proxy => write!(f, "proxy"),
            Capability::Earned => write!(f, "earned"),
            Capability::Governance => write!(f, "governance"),
        }
    }
}

/// Capability set fixed at bind time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilitySet(BTreeSet<Capability>);

impl CapabilitySet {
    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    /// True when every capability in `all` is present
    pub fn contains_all(&self, all: &[Capability]) -> bool {
        all.iter().all(|c| self.0.contains(c))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> From<[Capability; N]> for CapabilitySet {
    fn from(caps: [Capability; N]) -> Self {
        Self(caps.into_iter().collect())
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.0.iter().map(|c| c.to_string()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_all_requires_every_member() {
        let caps = CapabilitySet::from([Capability::Available, Capability::Min]);
        assert!(caps.contains(Capability::Min));
        assert!(!caps.contains_all(&[Capability::Min, Capability::Max]));

        let buffered = CapabilitySet::from([Capability::Min, Capability::Max]);
        assert!(buffered.contains_all(&[Capability::Min, Capability::Max]));
    }

    #[test]
    fn test_capabilities_parse_from_snake_case() {
        #[derive(Deserialize)]
        struct Row {
            caps: CapabilitySet,
        }
        let row: Row = toml::from_str(r#"caps = ["proxy", "earned"]"#).unwrap();
        assert!(row.caps.contains(Capability::Proxy));
        assert!(row.caps.contains(Capability::Earned));
        assert_eq!(row.caps.to_string(), "[proxy, earned]");
    }
}
