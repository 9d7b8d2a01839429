use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

/// Read-only view over a stored document with zero-value defaults for absent or malformed keys.
#[derive(Debug, Clone, Copy)]
pub struct AttributeMap<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> AttributeMap<'a> {
    pub fn new(fields: &'a Map<String, Value>) -> Self {
        Self { fields }
    }

    /// `None` unless the value is a JSON object.
    pub fn from_value(value: &'a Value) -> Option<Self> {
        value.as_object().map(Self::new)
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.fields.get(key).filter(|value| !value.is_null())
    }

    /// First key that carries a non-null value.
    pub fn first(&self, keys: &[&str]) -> Option<&'a Value> {
        keys.iter().find_map(|key| self.get(key))
    }

    pub fn text(&self, key: &str) -> String {
        self.get(key).map(value_text).unwrap_or_default()
    }

    pub fn text_any(&self, keys: &[&str]) -> String {
        self.first(keys).map(value_text).unwrap_or_default()
    }

    pub fn number(&self, key: &str) -> f64 {
        self.optional_number(key).unwrap_or(0.0)
    }

    /// Numbers and numeric strings; anything else is `None`.
    pub fn optional_number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(value_number)
    }

    pub fn flag(&self, key: &str) -> bool {
        self.optional_flag(key).unwrap_or(false)
    }

    pub fn optional_flag(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            Value::Bool(value) => Some(*value),
            Value::Number(number) => number.as_f64().map(|value| value != 0.0),
            Value::String(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "y" | "1" => Some(true),
                "false" | "no" | "n" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Non-blank strings from an array; a single string becomes a one-element list.
    pub fn strings(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .map(value_text)
                .filter(|item| !item.is_empty())
                .collect(),
            Some(Value::String(raw)) if !raw.trim().is_empty() => vec![raw.trim().to_string()],
            _ => Vec::new(),
        }
    }

    /// Object members of an array; other members are skipped.
    pub fn objects(&self, key: &str) -> Vec<AttributeMap<'a>> {
        match self.get(key) {
            Some(Value::Array(items)) => {
                items.iter().filter_map(AttributeMap::from_value).collect()
            }
            _ => Vec::new(),
        }
    }

    pub fn object(&self, key: &str) -> Option<AttributeMap<'a>> {
        self.get(key).and_then(AttributeMap::from_value)
    }

    pub fn array(&self, key: &str) -> Option<&'a Vec<Value>> {
        self.get(key).and_then(Value::as_array)
    }

    /// RFC 3339 strings, `YYYY-MM-DD` dates, or epoch seconds.
    pub fn timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        match self.get(key)? {
            Value::String(raw) => parse_timestamp(raw),
            Value::Number(number) => number
                .as_i64()
                .and_then(|seconds| DateTime::<Utc>::from_timestamp(seconds, 0)),
            Value::Object(fields) => fields
                .get("seconds")
                .or_else(|| fields.get("_seconds"))
                .and_then(Value::as_i64)
                .and_then(|seconds| DateTime::<Utc>::from_timestamp(seconds, 0)),
            _ => None,
        }
    }

    pub fn date(&self, key: &str) -> Option<NaiveDate> {
        self.timestamp(key).map(|timestamp| timestamp.date_naive())
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(raw) => raw.trim().to_string(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => String::new(),
    }
}

fn value_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(timestamp.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
