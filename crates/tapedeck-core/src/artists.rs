//! The configured artist list: a TOML file of `[[artist]]` tables, with a
//! built-in list used when no file exists.

use std::path::Path;

use anyhow::Context;
use tracing::warn;

use crate::model::Artist;
use crate::platform;

/// Intermediate struct matching the TOML `[[artist]]` table.  Kept separate
/// from `Artist` so the file schema can diverge from the in-memory type.
#[derive(Debug, serde::Deserialize)]
struct TomlArtistFile {
    artist: Vec<TomlArtist>,
}

#[derive(Debug, serde::Deserialize)]
struct TomlArtist {
    name: String,
    collection: String,
    #[serde(default)]
    setlist_id: String,
    #[serde(default)]
    filter_keyword: String,
    #[serde(default)]
    exclude_keyword: String,
}

pub fn parse_artists_from_toml_str(content: &str) -> anyhow::Result<Vec<Artist>> {
    let file: TomlArtistFile = toml::from_str(content)?;
    let artists: Vec<Artist> = file
        .artist
        .into_iter()
        .map(|a| Artist {
            name: a.name,
            collection_id: a.collection,
            external_id: a.setlist_id,
            collection_filter_keyword: a.filter_keyword,
            exclude_keyword: a.exclude_keyword,
        })
        .collect();

    for (i, artist) in artists.iter().enumerate() {
        if artist.name.trim().is_empty() || artist.collection_id.trim().is_empty() {
            anyhow::bail!("artist entry {} needs both a name and a collection", i + 1);
        }
        if artists[..i].iter().any(|other| other.name == artist.name) {
            anyhow::bail!("duplicate artist name: {}", artist.name);
        }
    }

    Ok(artists)
}

pub fn load_artists(path: &Path) -> anyhow::Result<Vec<Artist>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_artists_from_toml_str(&content)
}

/// Artist list from `<config dir>/artists.toml`, falling back to the
/// built-in list when the file is absent or unreadable.
pub fn load_or_default() -> Vec<Artist> {
    let path = platform::config_dir().join("artists.toml");
    if !path.exists() {
        return builtin_artists();
    }
    match load_artists(&path) {
        Ok(artists) if !artists.is_empty() => artists,
        Ok(_) => {
            warn!("{} lists no artists, using built-ins", path.display());
            builtin_artists()
        }
        Err(e) => {
            warn!("ignoring {}: {:#}", path.display(), e);
            builtin_artists()
        }
    }
}

/// Default artists.  The two Garcia entries share one collection and are
/// told apart by the `jgb` keyword: the band requires it, the duo excludes
/// it.
pub fn builtin_artists() -> Vec<Artist> {
    vec![
        Artist {
            name: "Grateful Dead".into(),
            collection_id: "GratefulDead".into(),
            external_id: "6faa7ca7-0d99-4a5e-bfa6-1fd5037520c6".into(),
            collection_filter_keyword: String::new(),
            exclude_keyword: String::new(),
        },
        Artist {
            name: "Jerry Garcia Band".into(),
            collection_id: "JerryGarcia".into(),
            external_id: String::new(),
            collection_filter_keyword: "jgb".into(),
            exclude_keyword: String::new(),
        },
        Artist {
            name: "Jerry Garcia & Merl Saunders".into(),
            collection_id: "JerryGarcia".into(),
            external_id: String::new(),
            collection_filter_keyword: String::new(),
            exclude_keyword: "jgb".into(),
        },
    ]
}
