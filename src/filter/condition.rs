use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Comparison applied by a [`FilterCondition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    IsEmpty,
    IsNotEmpty,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    Regex,
    /// Unrecognized operator name; never matches.
    Unknown(String),
}

impl Operator {
    pub fn name(&self) -> &str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "notEquals",
            Operator::Contains => "contains",
            Operator::NotContains => "notContains",
            Operator::StartsWith => "startsWith",
            Operator::EndsWith => "endsWith",
            Operator::IsEmpty => "isEmpty",
            Operator::IsNotEmpty => "isNotEmpty",
            Operator::GreaterThan => "greaterThan",
            Operator::LessThan => "lessThan",
            Operator::GreaterThanOrEqual => "greaterThanOrEqual",
            Operator::LessThanOrEqual => "lessThanOrEqual",
            Operator::Regex => "regex",
            Operator::Unknown(name) => name,
        }
    }
}

impl From<&str> for Operator {
    fn from(name: &str) -> Self {
        match name {
            "equals" => Operator::Equals,
            "notEquals" => Operator::NotEquals,
            "contains" => Operator::Contains,
            "notContains" => Operator::NotContains,
            "startsWith" => Operator::StartsWith,
            "endsWith" => Operator::EndsWith,
            "isEmpty" => Operator::IsEmpty,
            "isNotEmpty" => Operator::IsNotEmpty,
            "greaterThan" => Operator::GreaterThan,
            "lessThan" => Operator::LessThan,
            "greaterThanOrEqual" => Operator::GreaterThanOrEqual,
            "lessThanOrEqual" => Operator::LessThanOrEqual,
            "regex" => Operator::Regex,
            other => Operator::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How the conditions of a set are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CombineMode {
    /// Every condition must hold
    #[default]
    And,
    /// At least one condition must hold
    Or,
}

impl FromStr for CombineMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(CombineMode::And),
            "OR" => Ok(CombineMode::Or),
            _ => Err(format!("unknown combine mode '{}' (expected AND or OR)", s)),
        }
    }
}

impl fmt::Display for CombineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombineMode::And => f.write_str("AND"),
            CombineMode::Or => f.write_str("OR"),
        }
    }
}

/// One validated filter condition.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCondition {
    /// Dot-separated path into the record (e.g. `deviceType.category`)
    pub field: String,
    pub operator: Operator,
    /// Operand for string comparisons and `regex`
    pub value: Option<String>,
    /// Operand for numeric comparisons (0 when absent)
    pub numeric_value: Option<f64>,
    /// Operand for `equals`/`notEquals` against boolean fields
    pub boolean_value: Option<bool>,
}

impl FilterCondition {
    pub fn new(field: impl Into<String>, operator: Operator) -> Self {
        Self {
            field: field.into(),
            operator,
            value: None,
            numeric_value: None,
            boolean_value: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_numeric_value(mut self, value: f64) -> Self {
        self.numeric_value = Some(value);
        self
    }

    pub fn with_boolean_value(mut self, value: bool) -> Self {
        self.boolean_value = Some(value);
        self
    }

    /// Reads a condition from loosely-typed input.
    ///
    /// Returns `None` when `field` or `operator` is missing, empty or not a
    /// string. Operands are coerced into their slot rather than kept
    /// verbatim:
    /// - `value`: any non-null scalar or array becomes its text form
    /// - `numericValue`: numbers, and strings that parse as numbers
    ///   (including `0x`/`0o`/`0b` prefixed integers)
    /// - `booleanValue`: booleans, and the strings `"true"` / `"false"`
    ///
    /// An operand that does not coerce is treated as absent.
    pub fn from_value(raw: &Value) -> Option<Self> {
        let field = non_empty_str(raw.get("field"))?;
        let operator = non_empty_str(raw.get("operator"))?;

        Some(Self {
            field: field.to_string(),
            operator: Operator::from(operator),
            value: raw.get("value").and_then(string_operand),
            numeric_value: raw.get("numericValue").and_then(numeric_operand),
            boolean_value: raw.get("booleanValue").and_then(boolean_operand),
        })
    }
}

/// Keeps the well-formed entries of `raw`; anything but an array yields none.
///
/// Operands are coerced as described on [`FilterCondition::from_value`], so
/// `{"booleanValue": "true"}` behaves like `{"booleanValue": true}`.
pub fn validate(raw: &Value) -> Vec<FilterCondition> {
    match raw.as_array() {
        Some(entries) => entries.iter().filter_map(FilterCondition::from_value).collect(),
        None => Vec::new(),
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn string_operand(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(super::evaluate::to_text(other)),
    }
}

fn numeric_operand(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if !s.trim().is_empty() => {
            Some(super::evaluate::parse_number(s)).filter(|n| !n.is_nan())
        }
        _ => None,
    }
}

fn boolean_operand(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.trim().parse::<bool>().ok(),
        _ => None,
    }
}
