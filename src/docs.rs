use std::path::{Component, Path, PathBuf};

use reqwest::Client;
use thiserror::Error;

use crate::cache::{MemoCache, cache_key};
use crate::options::Options;

/// Failures raised while retrieving documentation content.
///
/// Variants are `Clone` so a settled failure can live inside a cache entry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DocsError {
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Documentation file not found: {path}")]
    NotFound { path: String },
}

/// Where a token's content comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Remote,
    Local,
}

impl Source {
    /// Classifies a single token: absolute `http(s)://` URLs are remote,
    /// everything else is a path under the documentation root.
    pub fn classify(token: &str) -> Self {
        if has_prefix(token, "http://") || has_prefix(token, "https://") {
            Source::Remote
        } else {
            Source::Local
        }
    }
}

fn has_prefix(token: &str, prefix: &str) -> bool {
    token
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Retrieves documentation content for path/URL tokens, memoizing each
/// source independently.
pub struct DocFetcher {
    client: Client,
    docs_path: PathBuf,
    separator: String,
    url_cache: MemoCache<String, DocsError>,
    file_cache: MemoCache<String, DocsError>,
}

impl DocFetcher {
    pub fn new(options: &Options) -> Self {
        Self {
            client: Client::new(),
            docs_path: options.docs_path.clone(),
            separator: options.separator.clone(),
            url_cache: MemoCache::new(options.fetch_url_memo),
            file_cache: MemoCache::new(options.read_file_memo),
        }
    }

    /// Resolves an ordered token list into a single document bundle.
    ///
    /// Blank tokens are discarded. Each surviving token is fetched
    /// sequentially in input order, trimmed, and joined with the configured
    /// separator. The first fetch or read failure aborts the whole call;
    /// a partially assembled bundle is never returned.
    pub async fn resolve(&self, tokens: &[String]) -> Result<String, DocsError> {
        let survivors: Vec<&str> = tokens
            .iter()
            .map(|token| token.as_str())
            .filter(|token| !token.trim().is_empty())
            .collect();

        if survivors.is_empty() {
            return Ok(String::new());
        }

        let mut pieces = Vec::with_capacity(survivors.len());
        for token in survivors {
            let text = match Source::classify(token) {
                Source::Remote => {
                    self.url_cache
                        .get_or_compute(&cache_key([token]), || self.fetch_url(token))
                        .await?
                }
                Source::Local => {
                    self.file_cache
                        .get_or_compute(&cache_key([token]), || self.read_file(token))
                        .await?
                }
            };
            pieces.push(text.trim().to_string());
        }

        Ok(pieces.join(&self.separator))
    }

    async fn fetch_url(&self, url: &str) -> Result<String, DocsError> {
        let fetch_failure = |reason: String| DocsError::Fetch {
            url: url.to_string(),
            reason,
        };

        let parsed = url::Url::parse(url).map_err(|err| fetch_failure(err.to_string()))?;
        tracing::debug!("Fetching documentation from {url}");

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|err| fetch_failure(err.to_string()))?;

        if !response.status().is_success() {
            return Err(fetch_failure(format!("status {}", response.status())));
        }

        response
            .text()
            .await
            .map_err(|err| fetch_failure(err.to_string()))
    }

    async fn read_file(&self, path: &str) -> Result<String, DocsError> {
        let relative = confined_relative(path).ok_or_else(|| DocsError::NotFound {
            path: path.to_string(),
        })?;
        let full_path = self.docs_path.join(relative);
        tracing::debug!("Reading documentation file {}", full_path.display());

        tokio::fs::read_to_string(&full_path)
            .await
            .map_err(|_| DocsError::NotFound {
                path: full_path.display().to_string(),
            })
    }
}

/// Restricts a token to a path inside the documentation root.
///
/// `Path::join` replaces the base when handed an absolute path, and `..`
/// segments walk out of it, so both are treated as nonexistent documents.
fn confined_relative(token: &str) -> Option<&Path> {
    let path = Path::new(token);
    let confined = path
        .components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
    confined.then_some(path)
}
