//! iNaturalist API client
//!
//! Rate-limited HTTP client for fetching observations and searching taxa.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::{sleep, Instant};

use super::types::{ApiResponse, ObservationRecord};
use crate::config::NearbyConfig;
use crate::error::FetchError;
use crate::finder::ObservationSource;
use crate::reference::ObservationId;
use crate::resolver::GenusLookup;
use crate::taxonomy::{Rank, Taxon};

/// iNaturalist API client
pub struct INatClient {
    http: Client,
    api_base: String,
    rate_limit: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl INatClient {
    /// Create a client from configuration
    pub fn new(config: &NearbyConfig) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            rate_limit: config.rate_limit,
            last_request: Mutex::new(None),
        })
    }

    /// Create a client from environment configuration
    pub fn from_env() -> anyhow::Result<Self> {
        let config = NearbyConfig::from_env()?;
        Ok(Self::new(&config)?)
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Enforce the minimum gap between requests
    async fn rate_limit(&self) {
        let wait = {
            let mut last = self
                .last_request
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let now = Instant::now();
            let wait = (*last)
                .map(|prev| (prev + self.rate_limit).saturating_duration_since(now))
                .unwrap_or_default();
            *last = Some(now + wait);
            wait
        };

        if !wait.is_zero() {
            sleep(wait).await;
        }
    }

    /// GET `path` with query parameters and decode the JSON body.
    /// A 404 maps to `FetchError::NotFound { entity, key }`.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        entity: &'static str,
        key: &str,
    ) -> Result<T, FetchError> {
        self.rate_limit().await;

        let url = format!("{}{}", self.api_base, path);
        tracing::debug!(url = %url, "GET");

        let response = self
            .http
            .get(&url)
            .query(query)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::not_found(entity, key));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
                body: body.chars().take(200).collect(),
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| FetchError::Decode {
            url,
            message: format!(
                "{} (first 200 chars: {})",
                e,
                text.chars().take(200).collect::<String>()
            ),
        })
    }

    /// Fetch a single observation by id
    pub async fn get_observation(
        &self,
        id: &ObservationId,
    ) -> Result<ObservationRecord, FetchError> {
        let response: ApiResponse<ObservationRecord> = self
            .get(
                &format!("/observations/{}", id),
                &[],
                "observation",
                id.as_str(),
            )
            .await?;

        response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::not_found("observation", id.as_str()))
    }

    /// Search active taxa of the given rank by name
    pub async fn search_taxa(&self, query: &str, rank: &Rank) -> Result<Vec<Taxon>, FetchError> {
        let response: ApiResponse<Taxon> = self
            .get(
                "/taxa",
                &[("q", query), ("rank", rank.as_str()), ("is_active", "true")],
                "taxon",
                query,
            )
            .await?;

        tracing::debug!(
            query = %query,
            results = response.results.len(),
            "Taxa search returned"
        );
        Ok(response.results)
    }
}

#[async_trait]
impl GenusLookup for INatClient {
    /// First exact, case-sensitive, genus-rank match in service order
    async fn find_genus_id(&self, name: &str) -> Result<u64, FetchError> {
        let results = self.search_taxa(name, &Rank::Genus).await?;

        let chosen = results
            .into_iter()
            .find(|t| t.name == name && t.rank.is_genus())
            .ok_or_else(|| FetchError::not_found("genus", name))?;

        tracing::debug!(
            genus_id = chosen.id,
            genus_name = %chosen.name,
            "Found exact genus match"
        );
        Ok(chosen.id)
    }
}

#[async_trait]
impl ObservationSource for INatClient {
    async fn fetch_observation(
        &self,
        id: &ObservationId,
    ) -> Result<ObservationRecord, FetchError> {
        self.get_observation(id).await
    }
}
