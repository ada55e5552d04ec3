//! Decoder types
//!
//! Describes where a page keeps its items and its continuation token.

use serde::{Deserialize, Serialize};

/// Location of the item array and continuation token inside a page document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLayout {
    /// Dot path to the item array (e.g. `data`, `results.songs.data`)
    #[serde(default = "default_items_path")]
    pub items_path: String,
    /// Dot path to the continuation token (e.g. `next`)
    #[serde(default = "default_next_path")]
    pub next_path: String,
}

fn default_items_path() -> String {
    "data".to_string()
}

fn default_next_path() -> String {
    "next".to_string()
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            items_path: default_items_path(),
            next_path: default_next_path(),
        }
    }
}

impl PageLayout {
    /// Create a layout from explicit paths
    pub fn new(items_path: impl Into<String>, next_path: impl Into<String>) -> Self {
        Self {
            items_path: items_path.into(),
            next_path: next_path.into(),
        }
    }

    /// Layout for `{"items": [...], "next": ...}` documents
    pub fn items_next() -> Self {
        Self::new("items", "next")
    }

    /// Layout for one result group of a search document:
    /// `{"results": {"<group>": {"data": [...], "next": ...}}}`
    pub fn search_group(group: &str) -> Self {
        Self::new(
            format!("results.{group}.data"),
            format!("results.{group}.next"),
        )
    }
}

/// Why a page body could not be decoded
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct DecodeFailure(pub String);

impl DecodeFailure {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
