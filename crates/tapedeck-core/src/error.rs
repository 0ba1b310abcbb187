use thiserror::Error;

/// A failed request against one of the remote APIs.
///
/// Only transport and decode failures are errors.  "No show found" and
/// "no playable tracks" are ordinary return values (`None` / an empty list)
/// so callers can branch on them without digging through an error chain.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Network unreachable, timeout, or a non-success HTTP status.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not valid JSON.  A *valid* body that merely
    /// lacks the expected fields is not a decode error; it deserializes to
    /// an empty result set instead.
    #[error("unparseable response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}
