//! Client-side record filtering.
//!
//! Conditions arrive as loosely-typed JSON (`{"field", "operator", "value",
//! "numericValue", "booleanValue"}`), are validated into
//! [`FilterCondition`]s, and are evaluated against already-fetched records:
//!
//! ```
//! use rmm::filter::{apply, validate, CombineMode};
//! use serde_json::json;
//!
//! let devices = vec![
//!     json!({"hostname": "DESKTOP-1", "online": true}),
//!     json!({"hostname": "SERVER-1", "online": false}),
//! ];
//! let conditions = validate(&json!([
//!     {"field": "online", "operator": "equals", "booleanValue": true}
//! ]));
//!
//! let online = apply(devices, &conditions, CombineMode::And);
//! assert_eq!(online, vec![json!({"hostname": "DESKTOP-1", "online": true})]);
//! ```
//!
//! Filtering never fails. Anything that cannot be evaluated (missing
//! field, non-numeric value, malformed pattern, unknown operator) simply
//! does not match.

mod condition;
mod evaluate;
mod select;

pub use condition::{validate, CombineMode, FilterCondition, Operator};
pub use evaluate::{resolve_path, to_number, to_text};
pub use select::select_fields;

use evaluate::PreparedCondition;
use serde_json::Value;

#[cfg(test)]
mod tests;

impl FilterCondition {
    /// Evaluates this condition against one record.
    pub fn matches(&self, record: &Value) -> bool {
        PreparedCondition::new(self).matches(record)
    }
}

/// Keeps the records satisfying `conditions` under `mode`, in order.
///
/// With no conditions the records are returned untouched.
pub fn apply(mut records: Vec<Value>, conditions: &[FilterCondition], mode: CombineMode) -> Vec<Value> {
    if conditions.is_empty() {
        return records;
    }

    let prepared: Vec<PreparedCondition<'_>> =
        conditions.iter().map(PreparedCondition::new).collect();
    records.retain(|record| match mode {
        CombineMode::And => prepared.iter().all(|c| c.matches(record)),
        CombineMode::Or => prepared.iter().any(|c| c.matches(record)),
    });
    records
}

/// Validated conditions plus their combination mode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    pub conditions: Vec<FilterCondition>,
    pub mode: CombineMode,
}

impl FilterSet {
    pub fn new(conditions: Vec<FilterCondition>, mode: CombineMode) -> Self {
        Self { conditions, mode }
    }

    /// Validates raw conditions (see [`validate`]).
    pub fn from_raw(raw: &Value, mode: CombineMode) -> Self {
        Self::new(validate(raw), mode)
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn apply(&self, records: Vec<Value>) -> Vec<Value> {
        apply(records, &self.conditions, self.mode)
    }
}
