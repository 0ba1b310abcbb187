use serde::{Deserialize, Serialize};

/// A configured performer.  Drives which archive collection is searched and
/// how candidates are disambiguated when two artists share one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    /// Display label, unique within the artist list.
    pub name: String,
    /// Archive collection to search.
    pub collection_id: String,
    /// Opaque id for the setlist API.  Empty disables setlist lookup.
    #[serde(default)]
    pub external_id: String,
    /// When set, a candidate must contain this (case-insensitive) in its
    /// identifier or title to count as this artist's show.
    #[serde(default)]
    pub collection_filter_keyword: String,
    /// When set, a candidate containing this is rejected.
    #[serde(default)]
    pub exclude_keyword: String,
}

impl Artist {
    pub fn filter_keyword(&self) -> Option<&str> {
        non_empty(&self.collection_filter_keyword)
    }

    pub fn exclude_keyword(&self) -> Option<&str> {
        non_empty(&self.exclude_keyword)
    }

    pub fn setlist_enabled(&self) -> bool {
        !self.external_id.trim().is_empty()
    }
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

/// One raw search-result row.  The archive guarantees neither the presence
/// nor the format of `title` and `date`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ShowCandidate {
    pub identifier: String,
    #[serde(default)]
    pub title: String,
    /// Nominally `YYYY-MM-DD`, but not guaranteed.
    #[serde(default)]
    pub date: String,
}

/// A selected show.  Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Show {
    pub identifier: String,
    pub title: String,
    pub date: String,
    /// True when selection fell back to a pseudo-random pick rather than a
    /// date match.
    pub is_random: bool,
}

impl Show {
    pub fn from_candidate(candidate: ShowCandidate, is_random: bool) -> Self {
        Self {
            identifier: candidate.identifier,
            title: candidate.title,
            date: candidate.date,
            is_random,
        }
    }
}

/// One playable file of a resolved show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Track {
    /// Archive file name, stable within the show.
    pub name: String,
    /// Human label from the manifest; may be empty.
    pub title: String,
    /// Fully qualified streaming address.
    pub url: String,
}

impl Track {
    /// Label for display: the title when present, the file name otherwise.
    pub fn display_text(&self) -> &str {
        if self.title.is_empty() {
            &self.name
        } else {
            &self.title
        }
    }
}
