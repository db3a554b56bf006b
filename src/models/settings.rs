// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::money::DEFAULT_MONEY_FORMAT;
use crate::models::search::ResourceType;
use anyhow::{anyhow, Context, Result};
use std::time::Duration;
use url::Url;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
pub const DEFAULT_MIN_QUERY_LENGTH: usize = 2;
pub const DEFAULT_RESULT_LIMIT: u8 = 8;
pub const DEFAULT_HISTORY_LIMIT: usize = 10;
pub const DEFAULT_HISTORY_KEY: &str = "recent-searches";
pub const DEFAULT_FALLBACK_PATH: &str = "/collections/all";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_POPULAR_SEARCHES: [&str; 4] = ["New arrivals", "Sale", "Gift cards", "Best sellers"];

/// The suggest endpoint accepts at most ten results per request
const MAX_RESULT_LIMIT: u8 = 10;

/// Configuration for the predictive search controller
#[derive(Debug, Clone)]
pub struct SearchSettings {
    /// Storefront origin; endpoint and navigation paths are resolved against it
    pub storefront_url: Url,
    pub debounce: Duration,
    /// Trimmed queries shorter than this show suggestions instead of fetching
    pub min_query_length: usize,
    /// Combined `resources[limit]` sent to the suggest endpoint
    pub result_limit: u8,
    pub resource_types: Vec<ResourceType>,
    pub history_limit: usize,
    /// Key under which recent searches are persisted
    pub history_key: String,
    pub popular_searches: Vec<String>,
    /// Storefront money template, e.g. `${{amount}}`
    pub money_format: String,
    /// Path offered as a way out when nothing matches
    pub fallback_path: String,
    pub request_timeout: Duration,
}

impl SearchSettings {
    /// Settings with defaults for everything except the storefront origin
    pub fn new(storefront_url: Url) -> Self {
        Self {
            storefront_url,
            debounce: DEFAULT_DEBOUNCE,
            min_query_length: DEFAULT_MIN_QUERY_LENGTH,
            result_limit: DEFAULT_RESULT_LIMIT,
            resource_types: ResourceType::ALL.to_vec(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            history_key: DEFAULT_HISTORY_KEY.to_string(),
            popular_searches: DEFAULT_POPULAR_SEARCHES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            money_format: DEFAULT_MONEY_FORMAT.to_string(),
            fallback_path: DEFAULT_FALLBACK_PATH.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Parse the storefront origin and build default settings for it
    pub fn for_storefront(storefront_url: &str) -> Result<Self> {
        let url = Url::parse(storefront_url)
            .with_context(|| format!("Invalid storefront URL: {}", storefront_url))?;
        Ok(Self::new(url))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let storefront = std::env::var("STOREFRONT_URL")
            .map_err(|_| anyhow!("STOREFRONT_URL environment variable not set"))?;
        Self::for_storefront(&storefront)?.apply_env()
    }

    /// Override defaults with any `SEARCH_*` environment variables that are set
    pub fn apply_env(mut self) -> Result<Self> {
        if let Some(ms) = env_parse::<u64>("SEARCH_DEBOUNCE_MS")? {
            self.debounce = Duration::from_millis(ms);
        }
        if let Some(len) = env_parse::<usize>("SEARCH_MIN_QUERY_LENGTH")? {
            self = self.with_min_query_length(len);
        }
        if let Some(limit) = env_parse::<u8>("SEARCH_RESULT_LIMIT")? {
            self = self.with_result_limit(limit);
        }
        if let Some(limit) = env_parse::<usize>("SEARCH_HISTORY_LIMIT")? {
            self.history_limit = limit;
        }
        if let Ok(key) = std::env::var("SEARCH_HISTORY_KEY") {
            self.history_key = key;
        }
        if let Ok(types) = std::env::var("SEARCH_RESOURCE_TYPES") {
            self.resource_types = parse_resource_types(&types)?;
        }
        if let Ok(popular) = std::env::var("SEARCH_POPULAR") {
            self.popular_searches = parse_list(&popular);
        }
        if let Ok(format) = std::env::var("SEARCH_MONEY_FORMAT") {
            self.money_format = format;
        }
        if let Ok(path) = std::env::var("SEARCH_FALLBACK_URL") {
            self.fallback_path = path;
        }
        if let Some(ms) = env_parse::<u64>("SEARCH_REQUEST_TIMEOUT_MS")? {
            self.request_timeout = Duration::from_millis(ms);
        }

        Ok(self)
    }

    /// Set the result limit, clamped to what the endpoint accepts
    pub fn with_result_limit(mut self, limit: u8) -> Self {
        self.result_limit = limit.clamp(1, MAX_RESULT_LIMIT);
        self
    }

    /// Set the fetch threshold; at least one character so blank queries never dispatch
    pub fn with_min_query_length(mut self, len: usize) -> Self {
        self.min_query_length = len.max(1);
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_popular_searches(mut self, popular: Vec<String>) -> Self {
        self.popular_searches = popular;
        self
    }

    pub fn with_money_format(mut self, format: impl Into<String>) -> Self {
        self.money_format = format.into();
        self
    }

    /// Absolute URL of a storefront path such as `/search`
    pub fn storefront_path(&self, path: &str) -> Result<Url, url::ParseError> {
        self.storefront_url.join(path)
    }
}

fn env_parse<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow!("{} must be a valid number: {}", name, e)),
        Err(_) => Ok(None),
    }
}

/// Split a comma-separated list, dropping blank entries
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a comma-separated list of resource types, e.g. `product,article`
pub fn parse_resource_types(raw: &str) -> Result<Vec<ResourceType>> {
    let mut types = Vec::new();
    for name in parse_list(raw) {
        let resource = name.parse::<ResourceType>().map_err(|e| anyhow!(e))?;
        if !types.contains(&resource) {
            types.push(resource);
        }
    }
    if types.is_empty() {
        return Err(anyhow!("at least one resource type is required"));
    }
    Ok(types)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = SearchSettings::for_storefront("https://shop.example.com").unwrap();
        assert_eq!(settings.debounce, Duration::from_millis(300));
        assert_eq!(settings.min_query_length, 2);
        assert_eq!(settings.result_limit, 8);
        assert_eq!(settings.history_limit, 10);
        assert_eq!(settings.resource_types, ResourceType::ALL.to_vec());
        assert_eq!(settings.money_format, "${{amount}}");
    }

    #[test]
    fn test_invalid_storefront_url() {
        assert!(SearchSettings::for_storefront("not a url").is_err());
    }

    #[test]
    fn test_result_limit_is_clamped() {
        let settings = SearchSettings::for_storefront("https://shop.example.com").unwrap();
        assert_eq!(settings.clone().with_result_limit(0).result_limit, 1);
        assert_eq!(settings.clone().with_result_limit(50).result_limit, 10);
        assert_eq!(settings.with_result_limit(4).result_limit, 4);
    }

    #[test]
    fn test_min_query_length_is_at_least_one() {
        let settings = SearchSettings::for_storefront("https://shop.example.com").unwrap();
        assert_eq!(settings.clone().with_min_query_length(0).min_query_length, 1);
        assert_eq!(settings.with_min_query_length(3).min_query_length, 3);
    }

    #[test]
    fn test_storefront_path() {
        let settings = SearchSettings::for_storefront("https://shop.example.com/en").unwrap();
        assert_eq!(
            settings.storefront_path("/search").unwrap().as_str(),
            "https://shop.example.com/search"
        );
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_list(" a, ,b ,"), vec!["a".to_string(), "b".to_string()]);
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn test_parse_resource_types() {
        assert_eq!(
            parse_resource_types("article, product,article").unwrap(),
            vec![ResourceType::Article, ResourceType::Product]
        );
        assert!(parse_resource_types("page").is_err());
        assert!(parse_resource_types(" , ").is_err());
    }
}
