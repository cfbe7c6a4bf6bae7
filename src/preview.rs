//! Preview Projections
//!
//! A preview selects a few values out of a document by dotted path and hands
//! them to a pure `prepare` function that builds the studio list label.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Shown for a selected string that is absent from the document.
pub const MISSING_TEXT: &str = "n/a";

/// Shown when the title selection itself is absent.
pub const UNTITLED: &str = "Untitled";

pub type PrepareFn = fn(&Selection) -> PreviewOutput;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewOutput {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

impl PreviewOutput {
    pub fn new(title: String, subtitle: String) -> Self {
        Self {
            title,
            subtitle: Some(subtitle),
        }
    }

    pub fn titled(title: String) -> Self {
        Self {
            title,
            subtitle: None,
        }
    }
}

#[derive(Clone, Serialize)]
pub struct Preview {
    /// Display key -> dotted field path
    pub select: BTreeMap<String, String>,
    #[serde(skip)]
    pub prepare: PrepareFn,
}

impl Preview {
    pub fn new(select: &[(&str, &str)], prepare: PrepareFn) -> Self {
        Self {
            select: select
                .iter()
                .map(|(key, path)| (key.to_string(), path.to_string()))
                .collect(),
            prepare,
        }
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.select.values().map(String::as_str)
    }

    /// Pull the selected values out of a document. Unresolved paths are
    /// left out of the selection.
    pub fn selection(&self, document: &Value) -> Selection {
        let mut selection = Selection::default();
        for (key, path) in &self.select {
            if let Some(value) = lookup(document, path) {
                selection.insert(key, value.clone());
            }
        }
        selection
    }

    pub fn project(&self, document: &Value) -> PreviewOutput {
        (self.prepare)(&self.selection(document))
    }
}

impl fmt::Debug for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preview")
            .field("select", &self.select)
            .finish_non_exhaustive()
    }
}

/// Values handed to a `prepare` function, keyed by display key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    values: BTreeMap<String, Value>,
}

impl Selection {
    /// Build from a JSON object; keys absent from the object stay absent.
    pub fn from_value(value: &Value) -> Self {
        let values = value
            .as_object()
            .map(|map| map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();
        Self { values }
    }

    pub fn insert(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key).filter(|v| !v.is_null())
    }

    /// Selected value as display text. A reference shows its target id.
    pub fn text(&self, key: &str) -> String {
        match self.get(key) {
            None => MISSING_TEXT.to_string(),
            Some(value) => display_text(value),
        }
    }

    /// Like [`Selection::text`] but falls back to [`UNTITLED`].
    pub fn title(&self, key: &str) -> String {
        match self.get(key) {
            None => UNTITLED.to_string(),
            Some(value) => display_text(value),
        }
    }

    /// Selected value as a number; absent, null, zero, NaN and `false` all
    /// show as `0`.
    pub fn number(&self, key: &str) -> String {
        match self.get(key) {
            Some(Value::Number(n)) => match n.as_f64() {
                Some(v) if v != 0.0 && !v.is_nan() => display_number(v),
                _ => "0".to_string(),
            },
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Bool(true)) => "true".to_string(),
            _ => "0".to_string(),
        }
    }
}

fn display_text(value: &Value) -> String {
    match value {
        Value::Null => MISSING_TEXT.to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.as_f64().map_or_else(|| n.to_string(), display_number),
        Value::Object(map) => match map.get("_ref").and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => value.to_string(),
        },
        Value::Array(items) => items
            .iter()
            .map(display_text)
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// Integral values print without a fractional part (`2500`, not `2500.0`).
pub fn display_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Follow a dotted path through nested JSON objects.
pub fn lookup<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(document, |current, segment| current.get(segment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_defaults_to_zero() {
        let selection = Selection::from_value(&json!({"a": 0, "b": null, "c": 12.5, "d": 2500.0}));
        assert_eq!(selection.number("a"), "0");
        assert_eq!(selection.number("b"), "0");
        assert_eq!(selection.number("missing"), "0");
        assert_eq!(selection.number("c"), "12.5");
        assert_eq!(selection.number("d"), "2500");
    }

    #[test]
    fn test_text_placeholder_and_reference() {
        let selection = Selection::from_value(&json!({
            "avatar": {"_type": "reference", "_ref": "av-9"},
            "name": "",
        }));
        assert_eq!(selection.text("avatar"), "av-9");
        assert_eq!(selection.text("name"), "");
        assert_eq!(selection.text("missing"), MISSING_TEXT);
        assert_eq!(selection.title("missing"), UNTITLED);
    }

    #[test]
    fn test_selection_follows_nested_paths() {
        fn prepare(selection: &Selection) -> PreviewOutput {
            PreviewOutput::new(selection.title("title"), selection.number("total"))
        }
        let preview = Preview::new(&[("title", "title"), ("total", "metrics.total")], prepare);
        let output = preview.project(&json!({"title": "T", "metrics": {"total": 7}}));
        assert_eq!(output, PreviewOutput::new("T".into(), "7".into()));

        let output = preview.project(&json!({"title": "T"}));
        assert_eq!(output.subtitle.as_deref(), Some("0"));
    }

    #[test]
    fn test_preview_serializes_select_only() {
        fn prepare(_: &Selection) -> PreviewOutput {
            PreviewOutput::titled(String::new())
        }
        let preview = Preview::new(&[("title", "name")], prepare);
        let value = serde_json::to_value(&preview).unwrap();
        assert_eq!(value, json!({"select": {"title": "name"}}));
    }
}
