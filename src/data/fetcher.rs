//! Stats Page Fetcher
//! Downloads basketball-reference per-game pages over HTTP.

use crate::config::SourceConfig;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Regular season or playoffs. Selects the source path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Stage {
    #[default]
    RegularSeason,
    Playoffs,
}

impl Stage {
    pub const ALL: [Stage; 2] = [Stage::RegularSeason, Stage::Playoffs];

    /// URL path segment for this stage.
    pub fn path_segment(self) -> &'static str {
        match self {
            Stage::RegularSeason => "leagues",
            Stage::Playoffs => "playoffs",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::RegularSeason => "Regular season",
            Stage::Playoffs => "Playoffs",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Blocking HTTP client bound to one source site.
pub struct StatsFetcher {
    client: Client,
    base_url: String,
}

impl StatsFetcher {
    pub fn new(config: &SourceConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Per-game stats page for a season and stage.
    pub fn page_url(&self, year: i32, stage: Stage) -> String {
        format!(
            "{}/{}/NBA_{}_per_game.html",
            self.base_url,
            stage.path_segment(),
            year
        )
    }

    /// GET the page and return its body. Non-2xx responses are errors.
    pub fn fetch_html(&self, year: i32, stage: Stage) -> Result<String, FetchError> {
        let url = self.page_url(year, stage);
        log::info!("Fetching {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|source| FetchError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(|source| FetchError::Request {
            url: url.clone(),
            source,
        })?;
        log::debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_follows_stage_segment() {
        let fetcher = StatsFetcher::new(&SourceConfig {
            base_url: "https://example.test/".to_string(),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            fetcher.page_url(2021, Stage::RegularSeason),
            "https://example.test/leagues/NBA_2021_per_game.html"
        );
        assert_eq!(
            fetcher.page_url(1998, Stage::Playoffs),
            "https://example.test/playoffs/NBA_1998_per_game.html"
        );
    }

    #[test]
    fn unreachable_host_is_a_request_error() {
        let fetcher = StatsFetcher::new(&SourceConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..Default::default()
        })
        .unwrap();

        let err = fetcher.fetch_html(2020, Stage::RegularSeason).unwrap_err();
        assert!(matches!(err, FetchError::Request { .. }));
    }
}
