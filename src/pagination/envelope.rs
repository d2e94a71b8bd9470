//! Response envelope normalization.
//!
//! List endpoints wrap their records in differently named fields
//! (`{"devices": [...], "pageDetails": {...}}`, `{"sites": [...]}`, ...).
//! [`Envelopes`] is an ordered table of `(key, extractor)` rules; the first
//! rule whose extractor yields items wins.

use serde_json::Value;

/// Pulls the item list out of the value stored under an envelope key.
pub type Extractor = fn(&Value) -> Option<Vec<Value>>;

/// Envelope keys probed by default, highest priority first.
pub const DEFAULT_ENVELOPE_KEYS: &[&str] = &[
    "sites",
    "devices",
    "users",
    "components",
    "alerts",
    "variables",
    "data",
];

/// Default extractor: the value must be a JSON array.
pub fn array_items(value: &Value) -> Option<Vec<Value>> {
    value.as_array().cloned()
}

/// One envelope rule.
#[derive(Clone, Debug)]
pub struct EnvelopeRule {
    pub key: String,
    pub extract: Extractor,
}

/// Ordered envelope table used to normalize a page response.
#[derive(Clone, Debug)]
pub struct Envelopes {
    rules: Vec<EnvelopeRule>,
}

impl Default for Envelopes {
    fn default() -> Self {
        Self::keys(DEFAULT_ENVELOPE_KEYS)
    }
}

impl Envelopes {
    /// Table with no rules; every object response is wrapped as one item.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Table of array-valued keys, in priority order.
    pub fn keys(keys: &[&str]) -> Self {
        Self {
            rules: keys
                .iter()
                .map(|key| EnvelopeRule {
                    key: key.to_string(),
                    extract: array_items,
                })
                .collect(),
        }
    }

    /// Adds an array-valued key probed before all existing rules.
    pub fn with_key(self, key: &str) -> Self {
        self.with_rule(key, array_items)
    }

    /// Adds a rule probed before all existing rules.
    pub fn with_rule(mut self, key: &str, extract: Extractor) -> Self {
        self.rules.insert(
            0,
            EnvelopeRule {
                key: key.to_string(),
                extract,
            },
        );
        self
    }

    pub fn rules(&self) -> &[EnvelopeRule] {
        &self.rules
    }

    /// Extracts the records of one page.
    ///
    /// A top-level array is used as-is; otherwise the first matching rule
    /// wins; with no match the whole response becomes a single record.
    pub fn extract(&self, response: &Value) -> Vec<Value> {
        if let Value::Array(items) = response {
            return items.clone();
        }
        self.rules
            .iter()
            .find_map(|rule| response.get(&rule.key).and_then(rule.extract))
            .unwrap_or_else(|| vec![response.clone()])
    }
}

/// Server-reported total across all pages (`pageDetails.totalCount`).
pub fn total_count(response: &Value) -> Option<u64> {
    response
        .get("pageDetails")
        .and_then(|details| details.get("totalCount"))
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite())
        .map(|n| n.max(0.0).ceil() as u64)
}
