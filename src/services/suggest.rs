// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::search::{ResourceType, ResultSet, SuggestEnvelope};
use crate::models::settings::SearchSettings;
use futures::future::BoxFuture;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Error, Debug)]
pub enum SuggestError {
    #[error("suggest request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("suggest endpoint returned HTTP {0}")]
    Status(u16),

    #[error("malformed suggest response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid suggest URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Source of typed search suggestions for a query.
pub trait SuggestClient: Send + Sync {
    fn suggest<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<ResultSet, SuggestError>>;
}

impl<T: SuggestClient + ?Sized> SuggestClient for std::sync::Arc<T> {
    fn suggest<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<ResultSet, SuggestError>> {
        (**self).suggest(query)
    }
}

/// Client for the storefront's `GET /search/suggest.json` endpoint
pub struct StorefrontSuggestClient {
    client: reqwest::Client,
    endpoint: Url,
    resource_types: Vec<ResourceType>,
    limit: u8,
}

impl StorefrontSuggestClient {
    /// Build a client from search settings
    pub fn new(settings: &SearchSettings) -> Result<Self, SuggestError> {
        let client = reqwest::Client::builder()
            .user_agent(format!("storefront-search/{}", crate::VERSION))
            .timeout(settings.request_timeout)
            .build()?;

        Self::with_client(client, settings)
    }

    /// Build around an existing reqwest client
    pub fn with_client(client: reqwest::Client, settings: &SearchSettings) -> Result<Self, SuggestError> {
        Ok(Self {
            client,
            endpoint: settings.storefront_path("/search/suggest.json")?,
            resource_types: settings.resource_types.clone(),
            limit: settings.result_limit,
        })
    }

    /// Full request URL for `query`
    pub fn request_url(&self, query: &str) -> Url {
        let types = self
            .resource_types
            .iter()
            .map(ResourceType::as_param)
            .collect::<Vec<_>>()
            .join(",");

        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("q", query)
            .append_pair("resources[type]", &types)
            .append_pair("resources[limit]", &self.limit.to_string());
        url
    }

    async fn fetch(&self, query: &str) -> Result<ResultSet, SuggestError> {
        let url = self.request_url(query);
        let started = std::time::Instant::now();

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SuggestError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let envelope: SuggestEnvelope = serde_json::from_slice(&body)?;
        let results = ResultSet::from(envelope);

        debug!(
            results = results.len(),
            elapsed_ms = elapsed_ms(started.elapsed()),
            "Suggest response decoded"
        );
        Ok(results)
    }
}

impl SuggestClient for StorefrontSuggestClient {
    fn suggest<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<ResultSet, SuggestError>> {
        Box::pin(self.fetch(query))
    }
}

fn elapsed_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
