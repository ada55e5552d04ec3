//! Library and catalog resource types

use crate::decode::{get_path, DecodeFailure, JsonPageDecoder};
use crate::error::{Error, Result};
use crate::pagination::Page;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Resources
// ============================================================================

/// A resource object as the service returns it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Resource identifier
    pub id: String,
    /// Resource type (e.g. `songs`, `library-playlists`)
    #[serde(rename = "type")]
    pub kind: String,
    /// Relative location of the resource
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Type-specific attributes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Value>,
}

impl Resource {
    /// The `name` attribute, when present
    pub fn name(&self) -> Option<&str> {
        self.attributes.as_ref()?.get("name")?.as_str()
    }
}

/// A playlist in the user's library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryPlaylist {
    /// Library identifier (`p.` prefixed)
    pub id: String,
    /// Always `library-playlists`
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<PlaylistAttributes>,
}

impl LibraryPlaylist {
    /// Playlist name
    pub fn name(&self) -> Option<&str> {
        self.attributes.as_ref().map(|a| a.name.as_str())
    }

    /// When the playlist was added to the library
    pub fn date_added(&self) -> Option<DateTime<Utc>> {
        self.attributes.as_ref()?.date_added
    }

    /// When the playlist was last played
    pub fn last_played_date(&self) -> Option<DateTime<Utc>> {
        self.attributes.as_ref()?.last_played_date
    }
}

/// Attributes of a library playlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistAttributes {
    pub name: String,
    #[serde(default)]
    pub can_edit: bool,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub has_catalog: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_played_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_params: Option<Value>,
}

/// Editorial or user-written description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
}

// ============================================================================
// Library Resource Kinds
// ============================================================================

/// Kinds of resources stored in the user's library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LibraryResource {
    Playlists,
    Songs,
    Albums,
    Artists,
    MusicVideos,
}

impl LibraryResource {
    /// All library resource kinds
    pub const ALL: [LibraryResource; 5] = [
        Self::Playlists,
        Self::Songs,
        Self::Albums,
        Self::Artists,
        Self::MusicVideos,
    ];

    /// Path segment under `/v1/me/library`
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Playlists => "playlists",
            Self::Songs => "songs",
            Self::Albums => "albums",
            Self::Artists => "artists",
            Self::MusicVideos => "music-videos",
        }
    }

    /// Type name used by library search (`library-songs`, ...)
    pub fn search_type(self) -> &'static str {
        match self {
            Self::Playlists => "library-playlists",
            Self::Songs => "library-songs",
            Self::Albums => "library-albums",
            Self::Artists => "library-artists",
            Self::MusicVideos => "library-music-videos",
        }
    }
}

impl fmt::Display for LibraryResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LibraryResource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        let normalized = normalized.strip_prefix("library-").unwrap_or(&normalized);
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| Error::config(format!("Unknown library resource: {s}")))
    }
}

// ============================================================================
// Catalog Search Kinds
// ============================================================================

/// Kinds of items a catalog search can return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchKind {
    Songs,
    Albums,
    Playlists,
    Artists,
    Stations,
    RecordLabels,
    MusicVideos,
    Curators,
    RadioShows,
}

impl SearchKind {
    /// All search kinds
    pub const ALL: [SearchKind; 9] = [
        Self::Songs,
        Self::Albums,
        Self::Playlists,
        Self::Artists,
        Self::Stations,
        Self::RecordLabels,
        Self::MusicVideos,
        Self::Curators,
        Self::RadioShows,
    ];

    /// Value of the `types` query parameter and key of the result group
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Songs => "songs",
            Self::Albums => "albums",
            Self::Playlists => "playlists",
            Self::Artists => "artists",
            Self::Stations => "stations",
            Self::RecordLabels => "record-labels",
            Self::MusicVideos => "music-videos",
            Self::Curators => "curators",
            Self::RadioShows => "radio-shows",
        }
    }

    /// Kinds only served by newer API revisions
    pub fn is_extended(self) -> bool {
        matches!(self, Self::MusicVideos | Self::Curators | Self::RadioShows)
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| Error::config(format!("Unknown search type: {s}")))
    }
}

// ============================================================================
// Search Results
// ============================================================================

/// Search response grouped by result type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Result groups keyed by type (`songs`, `library-playlists`, ...)
    #[serde(rename = "results")]
    pub groups: BTreeMap<String, Page<Resource>>,
}

impl SearchResults {
    /// Parse a `{"results": {"<group>": {"data": [...], "next": ...}}}` document
    pub fn from_slice(body: &[u8]) -> std::result::Result<Self, DecodeFailure> {
        let document: Value = serde_json::from_slice(body)
            .map_err(|e| DecodeFailure(format!("Failed to parse JSON: {e}")))?;

        let results = match get_path(&document, "results") {
            None | Some(Value::Null) => return Ok(Self::default()),
            Some(Value::Object(groups)) => groups,
            Some(_) => return Err(DecodeFailure("Expected an object at 'results'".to_string())),
        };

        let decoder = JsonPageDecoder::new();
        let mut groups = BTreeMap::new();
        for (key, group) in results {
            let page = decoder
                .decode_value(group.clone())
                .map_err(|e| DecodeFailure(format!("Result group '{key}': {e}")))?;
            groups.insert(key.clone(), page);
        }
        Ok(Self { groups })
    }

    /// Results for one group
    pub fn get(&self, group: &str) -> Option<&Page<Resource>> {
        self.groups.get(group)
    }

    /// Total number of items across groups
    pub fn total_items(&self) -> usize {
        self.groups.values().map(Page::len).sum()
    }

    /// Check if no group carries any item
    pub fn is_empty(&self) -> bool {
        self.total_items() == 0
    }
}

// ============================================================================
// Search Suggestions
// ============================================================================

/// One entry of a search suggestions response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Suggestion {
    /// A completed search term
    #[serde(rename = "terms", rename_all = "camelCase")]
    Term {
        /// Term to search for
        search_term: String,
        /// Term as it should be shown
        #[serde(default)]
        display_term: String,
    },
    /// A catalog item matching the term so far
    #[serde(rename = "topResults")]
    TopResult { content: Resource },
}

/// Search suggestions in server order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchSuggestions {
    pub suggestions: Vec<Suggestion>,
}

impl SearchSuggestions {
    /// Parse a `{"results": {"suggestions": [...]}}` document
    pub fn from_slice(body: &[u8]) -> std::result::Result<Self, DecodeFailure> {
        let document: Value = serde_json::from_slice(body)
            .map_err(|e| DecodeFailure(format!("Failed to parse JSON: {e}")))?;

        match get_path(&document, "results.suggestions") {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(suggestions) => serde_json::from_value(suggestions.clone())
                .map(|suggestions| Self { suggestions })
                .map_err(|e| DecodeFailure(format!("Invalid suggestions: {e}"))),
        }
    }

    /// Suggested search terms
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.suggestions.iter().filter_map(|s| match s {
            Suggestion::Term { search_term, .. } => Some(search_term.as_str()),
            Suggestion::TopResult { .. } => None,
        })
    }

    /// Top catalog results
    pub fn top_results(&self) -> impl Iterator<Item = &Resource> {
        self.suggestions.iter().filter_map(|s| match s {
            Suggestion::TopResult { content } => Some(content),
            Suggestion::Term { .. } => None,
        })
    }

    /// Check if there are no suggestions
    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }
}
