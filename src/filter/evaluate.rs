//! Operator semantics.
//!
//! Evaluation is total: missing fields, type mismatches and malformed
//! regex patterns make a condition false instead of failing.

use super::condition::{FilterCondition, Operator};
use regex::{Regex, RegexBuilder};
use serde_json::Value;

/// Walks a dot-separated path. Object keys and array indices are
/// followed; anything else ends the walk with `None`.
pub fn resolve_path<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(record, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Text form of a value: strings verbatim, numbers without a trailing
/// `.0`, arrays comma-joined, objects as `[object Object]`.
pub fn to_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.to_string(),
            None => match n.as_u64() {
                Some(u) => u.to_string(),
                None => n.as_f64().map(|f| f.to_string()).unwrap_or_default(),
            },
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => to_text(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Numeric form of a value; `NaN` when there is none.
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_number(s),
        Value::Array(_) => parse_number(&to_text(value)),
        Value::Object(_) => f64::NAN,
    }
}

/// Numeric form of a string: blank is 0, `0x`/`0o`/`0b` prefixes select
/// the radix, anything unparseable is `NaN`.
pub(crate) fn parse_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    let radix = match trimmed.get(..2).map(str::to_ascii_lowercase).as_deref() {
        Some("0x") => 16,
        Some("0o") => 8,
        Some("0b") => 2,
        _ => return trimmed.parse::<f64>().unwrap_or(f64::NAN),
    };
    let digits = &trimmed[2..];
    if digits.starts_with('+') {
        return f64::NAN;
    }
    u64::from_str_radix(digits, radix).map_or(f64::NAN, |n| n as f64)
}

/// A condition with its operands prepared for repeated evaluation.
pub(crate) struct PreparedCondition<'a> {
    condition: &'a FilterCondition,
    value_lower: String,
    regex: Option<Regex>,
}

impl<'a> PreparedCondition<'a> {
    pub(crate) fn new(condition: &'a FilterCondition) -> Self {
        let regex = match (&condition.operator, &condition.value) {
            (Operator::Regex, Some(pattern)) => {
                match RegexBuilder::new(pattern).case_insensitive(true).build() {
                    Ok(regex) => Some(regex),
                    Err(e) => {
                        tracing::debug!(
                            field = %condition.field,
                            error = %e,
                            "Invalid regex in filter condition, condition never matches"
                        );
                        None
                    }
                }
            }
            _ => None,
        };

        Self {
            condition,
            value_lower: condition
                .value
                .as_deref()
                .unwrap_or_default()
                .to_lowercase(),
            regex,
        }
    }

    pub(crate) fn matches(&self, record: &Value) -> bool {
        let condition = self.condition;
        let value = match resolve_path(record, &condition.field) {
            Some(v) if !v.is_null() => v,
            _ => return condition.operator == Operator::IsEmpty,
        };

        match &condition.operator {
            Operator::Equals => match value {
                Value::Bool(b) => condition.boolean_value == Some(*b),
                _ => self.text_lower(value) == self.value_lower,
            },
            Operator::NotEquals => match value {
                Value::Bool(b) => condition.boolean_value != Some(*b),
                _ => self.text_lower(value) != self.value_lower,
            },
            Operator::Contains => self.text_lower(value).contains(&self.value_lower),
            Operator::NotContains => !self.text_lower(value).contains(&self.value_lower),
            Operator::StartsWith => self.text_lower(value).starts_with(&self.value_lower),
            Operator::EndsWith => self.text_lower(value).ends_with(&self.value_lower),
            Operator::IsEmpty => is_empty_text(&self.text_lower(value)),
            Operator::IsNotEmpty => !is_empty_text(&self.text_lower(value)),
            Operator::GreaterThan => self.compare(value, |a, b| a > b),
            Operator::LessThan => self.compare(value, |a, b| a < b),
            Operator::GreaterThanOrEqual => self.compare(value, |a, b| a >= b),
            Operator::LessThanOrEqual => self.compare(value, |a, b| a <= b),
            Operator::Regex => self
                .regex
                .as_ref()
                .is_some_and(|regex| regex.is_match(&to_text(value))),
            Operator::Unknown(_) => false,
        }
    }

    fn text_lower(&self, value: &Value) -> String {
        to_text(value).to_lowercase()
    }

    fn compare(&self, value: &Value, op: fn(f64, f64) -> bool) -> bool {
        let n = to_number(value);
        if !n.is_finite() {
            return false;
        }
        op(n, self.condition.numeric_value.unwrap_or(0.0))
    }
}

fn is_empty_text(text: &str) -> bool {
    text.is_empty() || text == "null" || text == "undefined"
}
