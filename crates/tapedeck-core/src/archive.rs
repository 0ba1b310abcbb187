//! Archive search and metadata API client.

use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use tracing::debug;

use crate::error::RequestError;
use crate::model::ShowCandidate;

/// One row of a show's file manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ArchiveFile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub title: String,
}

/// A search expression for the archive's advanced-search endpoint: AND-joined
/// clauses plus a row cap.  The projection (`identifier,title,date`) and the
/// date-descending sort are fixed; every caller wants the same columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    clauses: Vec<String>,
    rows: u32,
}

impl SearchQuery {
    pub fn new(rows: u32) -> Self {
        Self {
            clauses: Vec::new(),
            rows,
        }
    }

    /// Scope to one collection.
    pub fn in_collection(mut self, collection: &str) -> Self {
        self.clauses.push(format!("collection:({})", collection));
        self
    }

    /// Match items whose date field ends in `-MM-DD`.
    pub fn date_ending(mut self, day_marker: &str) -> Self {
        self.clauses.push(format!("date:*-{}", day_marker));
        self
    }

    /// Match items whose identifier contains the literal fragment.
    pub fn identifier_contains(mut self, fragment: &str) -> Self {
        self.clauses.push(format!("identifier:*{}*", fragment));
        self
    }

    pub fn expression(&self) -> String {
        self.clauses.join(" AND ")
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }
}

/// The remote archive boundary.  A trait so tests can substitute a double
/// and instrument which queries were issued.
#[allow(async_fn_in_trait)]
pub trait ArchiveApi {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<ShowCandidate>, RequestError>;

    async fn file_manifest(&self, identifier: &str) -> Result<Vec<ArchiveFile>, RequestError>;

    /// Streaming address for one file of a show: the archive's download base
    /// plus the file name, percent-encoded as a single path segment.
    fn download_url(&self, identifier: &str, file_name: &str) -> String;
}

/// Live HTTP implementation.
pub struct ArchiveClient {
    http: reqwest::Client,
    root: reqwest::Url,
}

impl ArchiveClient {
    pub fn new(root: &str, timeout: Duration) -> anyhow::Result<Self> {
        let root = reqwest::Url::parse(root)
            .with_context(|| format!("invalid archive root: {}", root))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { http, root })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.root.as_str().trim_end_matches('/'), path)
    }
}

// Wire shapes.  Every level defaults so that a response missing
// `response.docs` or `files` reads as zero results — a collection with no
// items is a legitimate archive state, not a protocol error.

#[derive(Debug, Default, Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    response: SearchResponse,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<ShowCandidate>,
}

#[derive(Debug, Default, Deserialize)]
struct ManifestEnvelope {
    #[serde(default)]
    files: Vec<ArchiveFile>,
}

impl ArchiveApi for ArchiveClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<ShowCandidate>, RequestError> {
        let url = self.endpoint("advancedsearch.php");
        let rows = query.rows().to_string();
        let expression = query.expression();
        debug!("archive search: {} (rows {})", expression, rows);

        let body = self
            .http
            .get(&url)
            .query(&[
                ("q", expression.as_str()),
                ("fl[]", "identifier"),
                ("fl[]", "title"),
                ("fl[]", "date"),
                ("sort[]", "date desc"),
                ("rows", rows.as_str()),
                ("page", "1"),
                ("output", "json"),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let envelope: SearchEnvelope =
            serde_json::from_str(&body).map_err(|source| RequestError::Decode { url, source })?;
        Ok(envelope.response.docs)
    }

    async fn file_manifest(&self, identifier: &str) -> Result<Vec<ArchiveFile>, RequestError> {
        let url = self.endpoint(&format!("metadata/{}", identifier));
        debug!("archive manifest: {}", identifier);

        let body = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let envelope: ManifestEnvelope =
            serde_json::from_str(&body).map_err(|source| RequestError::Decode { url, source })?;
        Ok(envelope.files)
    }

    fn download_url(&self, identifier: &str, file_name: &str) -> String {
        let mut url = self.root.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["download", identifier, file_name]);
        }
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_expressions_match_each_cascade_shape() {
        let exact = SearchQuery::new(50)
            .in_collection("GratefulDead")
            .date_ending("05-08");
        assert_eq!(
            exact.expression(),
            "collection:(GratefulDead) AND date:*-05-08"
        );
        assert_eq!(exact.rows(), 50);

        let substring = SearchQuery::new(100)
            .in_collection("GratefulDead")
            .identifier_contains("05-08");
        assert_eq!(
            substring.expression(),
            "collection:(GratefulDead) AND identifier:*05-08*"
        );

        let keyword = SearchQuery::new(100)
            .identifier_contains("02-20")
            .identifier_contains("jgb");
        assert_eq!(
            keyword.expression(),
            "identifier:*02-20* AND identifier:*jgb*"
        );
    }

    #[test]
    fn missing_docs_deserializes_to_zero_results() {
        let empty: SearchEnvelope = serde_json::from_str("{}").unwrap();
        assert!(empty.response.docs.is_empty());

        let no_docs: SearchEnvelope = serde_json::from_str(r#"{"response":{}}"#).unwrap();
        assert!(no_docs.response.docs.is_empty());

        let one: SearchEnvelope = serde_json::from_str(
            r#"{"response":{"docs":[{"identifier":"gd1977-05-08","title":"Barton Hall"}]}}"#,
        )
        .unwrap();
        assert_eq!(one.response.docs.len(), 1);
        assert_eq!(one.response.docs[0].identifier, "gd1977-05-08");
        assert_eq!(one.response.docs[0].date, "");
    }

    #[test]
    fn missing_files_deserializes_to_zero_tracks() {
        let empty: ManifestEnvelope = serde_json::from_str("{}").unwrap();
        assert!(empty.files.is_empty());

        let one: ManifestEnvelope = serde_json::from_str(
            r#"{"files":[{"name":"d1t01.mp3","format":"VBR MP3","title":"Bertha"}]}"#,
        )
        .unwrap();
        assert_eq!(one.files.len(), 1);
        assert_eq!(one.files[0].format, "VBR MP3");
    }

    #[test]
    fn download_url_encodes_the_file_name_as_one_segment() {
        let client =
            ArchiveClient::new("https://archive.org", Duration::from_secs(15)).unwrap();
        assert_eq!(
            client.download_url("gd1977-05-08", "gd77-05-08 d1t01.mp3"),
            "https://archive.org/download/gd1977-05-08/gd77-05-08%20d1t01.mp3"
        );
        // A slash in a file name must not create an extra path segment.
        assert_eq!(
            client.download_url("gd1977-05-08", "a/b.mp3"),
            "https://archive.org/download/gd1977-05-08/a%2Fb.mp3"
        );
    }
}
