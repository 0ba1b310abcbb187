//! Optional setlist overlay for a selected show, fetched from a second
//! read-only API keyed by the artist's external id and the show date.

use serde::Deserialize;
use tracing::debug;

use crate::error::RequestError;
use crate::model::{Artist, Show};

/// A setlist for one show: songs grouped into sets, in performance order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setlist {
    pub venue: String,
    pub sets: Vec<SetlistSet>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetlistSet {
    pub name: String,
    pub songs: Vec<String>,
}

impl Setlist {
    pub fn song_count(&self) -> usize {
        self.sets.iter().map(|set| set.songs.len()).sum()
    }

    /// Multi-line rendering for display.
    pub fn format(&self) -> String {
        let mut lines = Vec::new();
        if !self.venue.is_empty() {
            lines.push(self.venue.clone());
        }
        for set in &self.sets {
            lines.push(format!("{}:", set.name));
            for song in &set.songs {
                lines.push(format!("  {}", song));
            }
        }
        lines.join("\n")
    }
}

/// The show's `YYYY-MM-DD` date reformatted to the setlist API's
/// `DD-MM-YYYY`.  `None` when the date is missing or malformed — lookup is
/// simply skipped for such shows.
pub fn query_date(show_date: &str) -> Option<String> {
    let date = chrono::NaiveDate::parse_from_str(show_date, "%Y-%m-%d").ok()?;
    Some(date.format("%d-%m-%Y").to_string())
}

pub struct SetlistClient {
    http: reqwest::Client,
    root: String,
    api_key: String,
}

// Wire shapes, defaulting throughout: an entry with no sets or songs is a
// legitimate (if useless) setlist, not a protocol error.

#[derive(Debug, Default, Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    setlist: Vec<SetlistEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct SetlistEntry {
    #[serde(default)]
    venue: Option<Venue>,
    #[serde(default)]
    sets: Sets,
}

#[derive(Debug, Default, Deserialize)]
struct Venue {
    #[serde(default)]
    name: String,
    #[serde(default)]
    city: Option<City>,
}

#[derive(Debug, Default, Deserialize)]
struct City {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct Sets {
    #[serde(default)]
    set: Vec<Set>,
}

#[derive(Debug, Default, Deserialize)]
struct Set {
    #[serde(default)]
    name: String,
    #[serde(default)]
    encore: Option<u32>,
    #[serde(default)]
    song: Vec<Song>,
}

#[derive(Debug, Default, Deserialize)]
struct Song {
    #[serde(default)]
    name: String,
}

impl SetlistClient {
    pub fn new(
        root: &str,
        api_key: &str,
        timeout: std::time::Duration,
    ) -> anyhow::Result<Self> {
        use anyhow::Context;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            root: root.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Look up the setlist for `show`.  `Ok(None)` covers everything that is
    /// not a hard failure: lookup disabled for the artist, no API key, an
    /// undated show, or the service simply not knowing the show.
    pub async fn find_setlist(
        &self,
        artist: &Artist,
        show: &Show,
    ) -> Result<Option<Setlist>, RequestError> {
        if !artist.setlist_enabled() || self.api_key.is_empty() {
            return Ok(None);
        }
        let Some(date) = query_date(&show.date) else {
            debug!("{}: undated show, skipping setlist lookup", show.identifier);
            return Ok(None);
        };

        let url = format!("{}/search/setlists", self.root);
        let response = self
            .http
            .get(&url)
            .header("x-api-key", &self.api_key)
            .header("Accept", "application/json")
            .query(&[("artistMbid", artist.external_id.as_str()), ("date", &date)])
            .send()
            .await?;

        // The service answers 404 for "no setlist on that date".
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = response.error_for_status()?.text().await?;

        let envelope: SearchEnvelope =
            serde_json::from_str(&body).map_err(|source| RequestError::Decode { url, source })?;
        Ok(envelope.setlist.into_iter().next().map(setlist_from_entry))
    }
}

fn setlist_from_entry(entry: SetlistEntry) -> Setlist {
    let venue = entry
        .venue
        .map(|v| match v.city {
            Some(city) if !city.name.is_empty() && !v.name.is_empty() => {
                format!("{}, {}", v.name, city.name)
            }
            Some(city) if !city.name.is_empty() => city.name,
            _ => v.name,
        })
        .unwrap_or_default();

    let mut set_number = 0;
    let sets = entry
        .sets
        .set
        .into_iter()
        .map(|set| {
            let name = if !set.name.is_empty() {
                set.name
            } else if set.encore.is_some() {
                "Encore".to_string()
            } else {
                set_number += 1;
                format!("Set {}", set_number)
            };
            SetlistSet {
                name,
                songs: set
                    .song
                    .into_iter()
                    .map(|s| s.name)
                    .filter(|n| !n.is_empty())
                    .collect(),
            }
        })
        .collect();

    Setlist { venue, sets }
}
