//! Web search and page extraction.
//!
//! The exploration phase talks to the remote service only through the
//! [`SearchExtract`] trait, so tests and alternative backends can stand in
//! for [`ParallelClient`].

mod error;
mod parallel;

pub use error::UpstreamError;
pub use parallel::ParallelClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One result of a search call. Only the URL matters downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl SearchHit {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            title: None,
        }
    }
}

/// One page returned by an extract call, with its quoted excerpts in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractHit {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub excerpts: Vec<String>,
}

impl ExtractHit {
    pub fn new<I, S>(url: impl Into<String>, excerpts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            url: Some(url.into()),
            excerpts: excerpts.into_iter().map(Into::into).collect(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Remote search + extract operations.
///
/// Implementations do not retry; a failed call surfaces as an
/// [`UpstreamError`] and the caller decides what it means for the run.
#[async_trait]
pub trait SearchExtract: Send + Sync {
    /// Finds pages relevant to `objective`.
    async fn search(
        &self,
        objective: &str,
        max_results: usize,
        max_excerpt_chars: usize,
    ) -> Result<Vec<SearchHit>, UpstreamError>;

    /// Pulls excerpts relevant to `objective` out of `urls`.
    ///
    /// `urls` must be non-empty.
    async fn extract(
        &self,
        urls: &[String],
        objective: &str,
        max_excerpt_chars: usize,
    ) -> Result<Vec<ExtractHit>, UpstreamError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hits_tolerate_missing_fields() {
        let hit: SearchHit = serde_json::from_str(r#"{"title": "no url"}"#).unwrap();
        assert_eq!(hit.url, None);

        let hit: ExtractHit = serde_json::from_str(r#"{"url": "https://a.io", "excerpts": null}"#).unwrap();
        assert!(hit.excerpts.is_empty());

        let hit: ExtractHit = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(hit, ExtractHit::default());
    }
}
