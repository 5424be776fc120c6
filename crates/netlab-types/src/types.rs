use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A raw value entered into a calculator field.
///
/// Form widgets usually deliver text, so numeric fields accept `Text` as long as it
/// parses as a finite number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum InputValue {
    /// Whole number value
    Integer(i64),
    /// Floating point value
    Number(f64),
    /// Free text, either a string field or unparsed numeric text
    Text(String),
}

impl InputValue {
    /// Numeric view of this value. Text is trimmed and parsed; non-finite values yield `None`.
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            Self::Integer(i) => *i as f64,
            Self::Number(f) => *f,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        n.is_finite().then_some(n)
    }

    /// Integer view of this value. Floats and numeric text qualify only when integral.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::Text(s) => s.trim().parse::<i64>().ok().or_else(|| float_to_integer(self.as_number()?)),
            Self::Number(f) => float_to_integer(*f),
        }
    }

    /// Text view of this value; numbers are not implicitly stringified.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Type name used in validation messages
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
        }
    }
}

fn float_to_integer(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f.abs() <= i64::MAX as f64).then_some(f as i64)
}

impl fmt::Display for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "\"{s}\""),
        }
    }
}

impl From<i64> for InputValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for InputValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for InputValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for InputValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for InputValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for InputValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl TryFrom<&serde_json::Value> for InputValue {
    type Error = anyhow::Error;

    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        Ok(match value {
            serde_json::Value::String(s) => Self::Text(s.clone()),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    Self::Number(f)
                } else {
                    return Err(anyhow!("Unsupported number value: {}", n));
                }
            }
            other => return Err(anyhow!("Unsupported input value: {}", other)),
        })
    }
}

/// The raw values of one calculator widget, keyed by `InputSpec::key`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputValues {
    fields: HashMap<String, InputValue>,
}

impl InputValues {
    /// Creates an empty value set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for tests and fixed presets.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<InputValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Replaces the value of one field, as a widget does on every edit.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<InputValue>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Removes a field, returning its previous value.
    pub fn clear(&mut self, key: &str) -> Option<InputValue> {
        self.fields.remove(key)
    }

    /// Looks up a field value.
    pub fn get(&self, key: &str) -> Option<&InputValue> {
        self.fields.get(key)
    }

    /// Number of populated fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field is populated
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Builds a value set from a JSON object of form values. `null` entries are
    /// treated as absent fields.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| anyhow!("Calculator inputs must be a JSON object, got {}", value))?;

        let mut fields = HashMap::with_capacity(map.len());
        for (key, raw) in map {
            if raw.is_null() {
                continue;
            }
            let parsed = InputValue::try_from(raw)
                .map_err(|e| anyhow!("Input '{}' could not be read: {}", key, e))?;
            fields.insert(key.clone(), parsed);
        }
        Ok(Self { fields })
    }
}

impl<K: Into<String>, V: Into<InputValue>> FromIterator<(K, V)> for InputValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

/// What kind of editor a field needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// Real number
    Number,
    /// Whole number
    Integer,
    /// Free text
    Text,
}

/// One end of a numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Limit {
    /// Boundary value
    pub value: f64,
    /// Whether the boundary itself is allowed
    pub inclusive: bool,
}

impl Limit {
    /// A boundary that admits its own value.
    pub const fn inclusive(value: f64) -> Self {
        Self { value, inclusive: true }
    }

    /// A boundary that excludes its own value.
    pub const fn exclusive(value: f64) -> Self {
        Self { value, inclusive: false }
    }

    fn admits_above(&self, candidate: f64) -> bool {
        if self.inclusive { candidate >= self.value } else { candidate > self.value }
    }

    fn admits_below(&self, candidate: f64) -> bool {
        if self.inclusive { candidate <= self.value } else { candidate < self.value }
    }
}

/// Schema of one editable calculator field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputSpec {
    /// Key under which the value is stored in `InputValues`
    pub key: String,
    /// Human readable label
    pub label: String,
    /// Editor kind
    pub kind: InputKind,
    /// Value the widget starts with
    pub default: InputValue,
    /// Lower bound for numeric kinds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Limit>,
    /// Upper bound for numeric kinds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Limit>,
    /// Regular expression a text value is classified against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl InputSpec {
    fn build(key: &str, label: &str, kind: InputKind, default: InputValue) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind,
            default,
            min: None,
            max: None,
            pattern: None,
        }
    }

    /// A real-valued field.
    pub fn number(key: &str, label: &str, default: f64) -> Self {
        Self::build(key, label, InputKind::Number, InputValue::Number(default))
    }

    /// A whole-number field.
    pub fn integer(key: &str, label: &str, default: i64) -> Self {
        Self::build(key, label, InputKind::Integer, InputValue::Integer(default))
    }

    /// A free text field.
    pub fn text(key: &str, label: &str, default: &str) -> Self {
        Self::build(key, label, InputKind::Text, InputValue::from(default))
    }

    /// Requires `value >= min`.
    #[must_use]
    pub fn at_least(mut self, min: f64) -> Self {
        self.min = Some(Limit::inclusive(min));
        self
    }

    /// Requires `value > min`.
    #[must_use]
    pub fn above(mut self, min: f64) -> Self {
        self.min = Some(Limit::exclusive(min));
        self
    }

    /// Requires `value <= max`.
    #[must_use]
    pub fn at_most(mut self, max: f64) -> Self {
        self.max = Some(Limit::inclusive(max));
        self
    }

    /// Attaches a classification pattern to a text field.
    #[must_use]
    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.to_string());
        self
    }

    /// Whether a numeric value falls within the declared bounds.
    pub fn admits(&self, value: f64) -> bool {
        self.min.is_none_or(|min| min.admits_above(value))
            && self.max.is_none_or(|max| max.admits_below(value))
    }

    /// Human readable form of the bounds, e.g. `>= 0` or `in [16,30]`.
    pub fn range_constraint(&self) -> Option<String> {
        match (self.min, self.max) {
            (Some(min), Some(max)) => Some(format!(
                "in {}{},{}{}",
                if min.inclusive { '[' } else { '(' },
                min.value,
                max.value,
                if max.inclusive { ']' } else { ')' }
            )),
            (Some(min), None) => {
                Some(format!("{} {}", if min.inclusive { ">=" } else { ">" }, min.value))
            }
            (None, Some(max)) => {
                Some(format!("{} {}", if max.inclusive { "<=" } else { "<" }, max.value))
            }
            (None, None) => None,
        }
    }
}

/// Descriptor of a calculator used to render its form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorSpec {
    /// Stable identifier passed to `compute`
    pub id: String,
    /// Display title
    pub title: String,
    /// Field schemas in display order
    pub inputs: Vec<InputSpec>,
}

/// Computed value of a calculator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ResultValue {
    /// Whole number result
    Integer(i64),
    /// Real number result
    Number(f64),
    /// Textual or classification result
    Text(String),
}

impl ResultValue {
    /// Numeric view of the value
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Number(f) => Some(*f),
            Self::Text(_) => None,
        }
    }

    /// Integer view of the value
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Text view of the value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ResultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<ResultValue> for serde_json::Value {
    fn from(value: ResultValue) -> Self {
        match value {
            ResultValue::Integer(i) => Self::Number(serde_json::Number::from(i)),
            ResultValue::Number(f) => serde_json::Number::from_f64(f).map_or(Self::Null, Self::Number),
            ResultValue::Text(s) => Self::String(s),
        }
    }
}

/// Outcome of a MAC address classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacStatus {
    /// Nothing entered yet
    Awaiting,
    /// Well-formed six-octet address
    Valid,
    /// Anything else
    Invalid,
}

impl MacStatus {
    /// Lowercase name, also used as the result value
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Awaiting => "awaiting",
            Self::Valid => "valid",
            Self::Invalid => "invalid",
        }
    }
}

impl fmt::Display for MacStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one `compute` call. Derived fresh every time and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorResult {
    /// Primary value
    pub value: ResultValue,
    /// Unit of the primary value, empty for classifications
    pub unit: String,
    /// Whether the value represents a positive outcome; always true for formulas
    pub valid: bool,
    /// Pre-formatted display string
    pub display: String,
    /// Secondary named values
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, ResultValue>,
}

impl CalculatorResult {
    /// A formula result.
    pub fn new(value: ResultValue, unit: &str, display: String) -> Self {
        Self { value, unit: unit.to_string(), valid: true, display, details: BTreeMap::new() }
    }

    /// A classification result; only `MacStatus::Valid` is marked valid.
    pub fn classification(status: MacStatus) -> Self {
        Self {
            value: ResultValue::Text(status.as_str().to_string()),
            unit: String::new(),
            valid: status == MacStatus::Valid,
            display: status.as_str().to_string(),
            details: BTreeMap::new(),
        }
    }

    /// Attaches a secondary value.
    #[must_use]
    pub fn with_detail(mut self, key: &str, value: ResultValue) -> Self {
        self.details.insert(key.to_string(), value);
        self
    }
}
