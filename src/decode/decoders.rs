//! JSON page decoder
//!
//! Splits a response document into typed items and a continuation token.

use super::types::{DecodeFailure, PageLayout};
use crate::pagination::Page;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decodes JSON page documents laid out per a [`PageLayout`]
#[derive(Debug, Clone, Default)]
pub struct JsonPageDecoder {
    layout: PageLayout,
}

impl JsonPageDecoder {
    /// Create a decoder for the default `data` / `next` layout
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with a custom layout
    pub fn with_layout(layout: PageLayout) -> Self {
        Self { layout }
    }

    /// The layout this decoder reads
    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    /// Decode a response body into a page of `T`
    pub fn decode<T: DeserializeOwned>(&self, body: &[u8]) -> Result<Page<T>, DecodeFailure> {
        let document: Value = serde_json::from_slice(body)
            .map_err(|e| DecodeFailure::new(format!("Failed to parse JSON: {e}")))?;
        self.decode_value(document)
    }

    /// Decode an already parsed document
    pub fn decode_value<T: DeserializeOwned>(
        &self,
        mut document: Value,
    ) -> Result<Page<T>, DecodeFailure> {
        let next = self.extract_next(&document)?;

        let items = match take_path(&mut document, &self.layout.items_path) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(values)) => values
                .into_iter()
                .enumerate()
                .map(|(index, value)| {
                    serde_json::from_value(value).map_err(|e| {
                        DecodeFailure::new(format!(
                            "Item {index} at '{}' has unexpected shape: {e}",
                            self.layout.items_path
                        ))
                    })
                })
                .collect::<Result<Vec<T>, _>>()?,
            Some(other) => {
                return Err(DecodeFailure::new(format!(
                    "Expected an array at '{}', found {}",
                    self.layout.items_path,
                    type_name(&other)
                )))
            }
        };

        Ok(Page { items, next })
    }

    fn extract_next(&self, document: &Value) -> Result<Option<String>, DecodeFailure> {
        match get_path(document, &self.layout.next_path) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(token)) if token.is_empty() => Ok(None),
            Some(Value::String(token)) => Ok(Some(token.clone())),
            Some(other) => Err(DecodeFailure::new(format!(
                "Expected a string continuation at '{}', found {}",
                self.layout.next_path,
                type_name(other)
            ))),
        }
    }
}

/// Walk a dot path (optional `$.` prefix) through nested objects
pub(crate) fn get_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Some(value);
    }

    let mut current = value;
    for part in path.split('.') {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// Like [`get_path`], but moves the value out of the document
fn take_path(value: &mut Value, path: &str) -> Option<Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Some(value.take());
    }

    let mut current = value;
    for part in path.split('.') {
        current = current.as_object_mut()?.get_mut(part)?;
    }
    Some(current.take())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
