//! Show selection: a layered search cascade from exact date match down to a
//! pseudo-random pick from the artist's collection.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::archive::{ArchiveApi, SearchQuery};
use crate::error::RequestError;
use crate::model::{Artist, Show, ShowCandidate};

const EXACT_DATE_ROWS: u32 = 50;
const IDENTIFIER_ROWS: u32 = 100;
const KEYWORD_ROWS: u32 = 100;
/// Widening page sizes for the random-from-collection fallback.  Each is a
/// fresh request, never a continuation, and pages are never merged.
const RANDOM_PAGE_ROWS: [u32; 3] = [1000, 3000, 5000];
const RANDOM_KEYWORD_ROWS: u32 = 500;

/// Find the best show for `artist` on the given `MM-DD` day marker.
///
/// Stages, in order, stopping at the first that yields a post-filter hit:
/// exact date match in the collection, day marker embedded in the identifier,
/// archive-wide identifier search by day marker + filter keyword, then the
/// random fallbacks (widening collection pages, keyword matches anywhere).
///
/// `Ok(None)` means the cascade exhausted with no candidates — a first-class
/// outcome, not an error.  Transport and decode failures propagate; the only
/// retry the selector ever performs is the deliberate page widening.
pub async fn select_show<A: ArchiveApi>(
    api: &A,
    artist: &Artist,
    day_marker: &str,
    rng: &mut impl Rng,
) -> Result<Option<Show>, RequestError> {
    // Exact date match within the artist's collection.
    let query = SearchQuery::new(EXACT_DATE_ROWS)
        .in_collection(&artist.collection_id)
        .date_ending(day_marker);
    let candidates = apply_artist_filter(artist, api.search(&query).await?);
    if let Some(show) = pick_newest(candidates) {
        debug!("{}: exact date match for {}", artist.name, day_marker);
        return Ok(Some(show));
    }

    // Identifiers frequently embed the date positionally, which recovers
    // items whose date field is missing or malformed.
    let query = SearchQuery::new(IDENTIFIER_ROWS)
        .in_collection(&artist.collection_id)
        .identifier_contains(day_marker);
    let candidates = apply_artist_filter(artist, api.search(&query).await?);
    if let Some(show) = pick_newest(candidates) {
        debug!("{}: identifier match for {}", artist.name, day_marker);
        return Ok(Some(show));
    }

    // Archive-wide search for artists whose material is scattered outside
    // their primary collection.
    if let Some(keyword) = artist.filter_keyword() {
        let query = SearchQuery::new(KEYWORD_ROWS)
            .identifier_contains(day_marker)
            .identifier_contains(keyword);
        let candidates = apply_artist_filter(artist, api.search(&query).await?);
        if let Some(show) = pick_newest(candidates) {
            debug!("{}: keyword match for {}", artist.name, day_marker);
            return Ok(Some(show));
        }
    }

    info!(
        "{}: nothing on {}, falling back to a random show",
        artist.name, day_marker
    );

    // Random pick from the collection, widening the page until something
    // survives the filter.
    for rows in RANDOM_PAGE_ROWS {
        let query = SearchQuery::new(rows).in_collection(&artist.collection_id);
        let candidates = apply_artist_filter(artist, api.search(&query).await?);
        if let Some(show) = pick_random(candidates, rng) {
            return Ok(Some(show));
        }
    }

    // Last resort: a random keyword match from anywhere in the archive.
    if let Some(keyword) = artist.filter_keyword() {
        let query = SearchQuery::new(RANDOM_KEYWORD_ROWS).identifier_contains(keyword);
        let candidates = apply_artist_filter(artist, api.search(&query).await?);
        if let Some(show) = pick_random(candidates, rng) {
            return Ok(Some(show));
        }
    }

    Ok(None)
}

/// Caller recovery for a "not found" day: try the configured artists in
/// uniformly random order and surface the first success.
pub async fn select_show_any<A: ArchiveApi>(
    api: &A,
    artists: &[Artist],
    day_marker: &str,
    rng: &mut impl Rng,
) -> Result<Option<(Artist, Show)>, RequestError> {
    let mut order: Vec<&Artist> = artists.iter().collect();
    order.shuffle(rng);

    for artist in order {
        if let Some(show) = select_show(api, artist, day_marker, &mut *rng).await? {
            return Ok(Some((artist.clone(), show)));
        }
        info!("{}: no show found, trying another artist", artist.name);
    }
    Ok(None)
}

/// Keep only candidates that look like this artist's shows, matching the
/// keywords case-insensitively against identifier + title.
///
/// Fail-open: when filtering would eliminate every candidate, the unfiltered
/// input is returned instead, so an overly narrow keyword degrades to "show
/// everything" rather than "show nothing".  Do not tighten this.
pub fn apply_artist_filter(
    artist: &Artist,
    candidates: Vec<ShowCandidate>,
) -> Vec<ShowCandidate> {
    let filter = artist.filter_keyword().map(str::to_lowercase);
    let exclude = artist.exclude_keyword().map(str::to_lowercase);
    if filter.is_none() && exclude.is_none() {
        return candidates;
    }

    let kept: Vec<ShowCandidate> = candidates
        .iter()
        .filter(|candidate| {
            let haystack =
                format!("{}{}", candidate.identifier, candidate.title).to_lowercase();
            if let Some(word) = &exclude {
                if haystack.contains(word.as_str()) {
                    return false;
                }
            }
            if let Some(word) = &filter {
                if !haystack.contains(word.as_str()) {
                    return false;
                }
            }
            true
        })
        .cloned()
        .collect();

    if kept.is_empty() {
        candidates
    } else {
        kept
    }
}

/// Sort newest-first by the raw date string.  Intentionally ordinal, not
/// calendar-aware: correct only for well-formed `YYYY-MM-DD`, and malformed
/// dates sort unpredictably.  Changing this would change which show wins on
/// edge-case data.
fn sort_newest_first(candidates: &mut [ShowCandidate]) {
    candidates.sort_by(|a, b| b.date.cmp(&a.date));
}

fn pick_newest(mut candidates: Vec<ShowCandidate>) -> Option<Show> {
    sort_newest_first(&mut candidates);
    candidates
        .into_iter()
        .next()
        .map(|candidate| Show::from_candidate(candidate, false))
}

fn pick_random(mut candidates: Vec<ShowCandidate>, rng: &mut impl Rng) -> Option<Show> {
    if candidates.is_empty() {
        return None;
    }
    let idx = rng.gen_range(0..candidates.len());
    Some(Show::from_candidate(candidates.swap_remove(idx), true))
}
