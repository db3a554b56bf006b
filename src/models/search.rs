// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Resource categories the storefront suggest endpoint can return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Product,
    Collection,
    Article,
}

impl ResourceType {
    /// All categories in the order they are requested and rendered
    pub const ALL: [ResourceType; 3] = [
        ResourceType::Product,
        ResourceType::Collection,
        ResourceType::Article,
    ];

    /// Value used in the `resources[type]` query parameter
    pub fn as_param(&self) -> &'static str {
        match self {
            ResourceType::Product => "product",
            ResourceType::Collection => "collection",
            ResourceType::Article => "article",
        }
    }

    /// Section heading shown above this category's results
    pub fn heading(&self) -> &'static str {
        match self {
            ResourceType::Product => "Products",
            ResourceType::Collection => "Collections",
            ResourceType::Article => "Articles",
        }
    }
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "product" => Ok(ResourceType::Product),
            "collection" => Ok(ResourceType::Collection),
            "article" => Ok(ResourceType::Article),
            other => Err(format!(
                "resource type must be 'product', 'collection', or 'article', got: {}",
                other
            )),
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_param())
    }
}

// ---------------------------------------------------------------------------
// Wire format of GET /search/suggest.json
// ---------------------------------------------------------------------------

/// Top-level envelope returned by the suggest endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestEnvelope {
    #[serde(default)]
    pub resources: SuggestResources,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestResources {
    #[serde(default)]
    pub results: SuggestResults,
}

/// Per-category result arrays; any of them may be missing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestResults {
    #[serde(default)]
    pub products: Vec<ProductHit>,
    #[serde(default)]
    pub collections: Vec<CollectionHit>,
    #[serde(default)]
    pub articles: Vec<ArticleHit>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeaturedImage {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductHit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    /// Price in minor currency units
    #[serde(default, deserialize_with = "deserialize_minor_units")]
    pub price: Option<i64>,
    #[serde(default)]
    pub featured_image: Option<FeaturedImage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionHit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub products_count: Option<u64>,
    #[serde(default)]
    pub featured_image: Option<FeaturedImage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleHit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    /// Article summary; Shopify sends this as an HTML fragment
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub featured_image: Option<FeaturedImage>,
}

/// Accept integer minor units, a string of minor units, or a decimal string in major units.
fn deserialize_minor_units<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_minor_units))
}

fn parse_minor_units(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(round_to_minor_units)),
        Value::String(s) => parse_price_string(s.trim()),
        _ => None,
    }
}

/// Fractional minor units are rounded; anything outside the `i64` range is unusable
fn round_to_minor_units(f: f64) -> Option<i64> {
    const LIMIT: f64 = 9_007_199_254_740_992.0;
    let rounded = f.round();
    if rounded.is_finite() && rounded.abs() <= LIMIT {
        Some(rounded as i64)
    } else {
        None
    }
}

fn parse_price_string(s: &str) -> Option<i64> {
    match s.split_once('.') {
        None => s.parse().ok(),
        Some((major, minor)) => {
            let negative = major.starts_with('-');
            let major: i64 = if major.is_empty() || major == "-" {
                0
            } else {
                major.parse().ok()?
            };
            if minor.is_empty() || minor.len() > 2 || !minor.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let mut cents: i64 = minor.parse().ok()?;
            if minor.len() == 1 {
                cents *= 10;
            }
            let total = major.checked_abs()?.checked_mul(100)?.checked_add(cents)?;
            Some(if negative { -total } else { total })
        }
    }
}

// ---------------------------------------------------------------------------
// Display model
// ---------------------------------------------------------------------------

/// Category-specific secondary line of a result record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemDetail {
    /// Product price in minor units, if the endpoint sent a usable one
    Price(Option<i64>),
    /// Number of products in a collection
    ProductCount(u64),
    /// Plain-text article summary
    Summary(String),
}

/// One display record inside a result section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultItem {
    pub title: String,
    pub url: String,
    /// Empty when the hit carries no image
    pub image_url: String,
    pub detail: ItemDetail,
}

/// Typed result set produced from one suggest response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    pub products: Vec<ResultItem>,
    pub collections: Vec<ResultItem>,
    pub articles: Vec<ResultItem>,
}

impl ResultSet {
    /// True when no category holds a single record
    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.collections.is_empty() && self.articles.is_empty()
    }

    /// Records for one category
    pub fn items(&self, resource: ResourceType) -> &[ResultItem] {
        match resource {
            ResourceType::Product => &self.products,
            ResourceType::Collection => &self.collections,
            ResourceType::Article => &self.articles,
        }
    }

    /// Non-empty categories in render order
    pub fn sections(&self) -> impl Iterator<Item = (ResourceType, &[ResultItem])> {
        ResourceType::ALL
            .into_iter()
            .map(|resource| (resource, self.items(resource)))
            .filter(|(_, items)| !items.is_empty())
    }

    /// Total number of records across categories
    pub fn len(&self) -> usize {
        self.products.len() + self.collections.len() + self.articles.len()
    }
}

fn image_of(image: Option<FeaturedImage>) -> String {
    image.and_then(|i| i.url).unwrap_or_default()
}

impl From<SuggestEnvelope> for ResultSet {
    fn from(envelope: SuggestEnvelope) -> Self {
        let results = envelope.resources.results;

        let products = results
            .products
            .into_iter()
            .map(|hit| ResultItem {
                title: hit.title,
                url: hit.url,
                image_url: image_of(hit.featured_image),
                detail: ItemDetail::Price(hit.price),
            })
            .collect();

        let collections = results
            .collections
            .into_iter()
            .map(|hit| ResultItem {
                title: hit.title,
                url: hit.url,
                image_url: image_of(hit.featured_image),
                detail: ItemDetail::ProductCount(hit.products_count.unwrap_or(0)),
            })
            .collect();

        let articles = results
            .articles
            .into_iter()
            .map(|hit| ResultItem {
                title: hit.title,
                url: hit.url,
                image_url: image_of(hit.featured_image),
                detail: ItemDetail::Summary(hit.summary.unwrap_or_default()),
            })
            .collect();

        ResultSet {
            products,
            collections,
            articles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> ResultSet {
        let envelope: SuggestEnvelope = serde_json::from_str(json).unwrap();
        ResultSet::from(envelope)
    }

    #[test]
    fn test_decode_full_envelope() {
        let set = decode(
            r#"{"resources":{"results":{
                "products":[{"title":"Shoe","url":"/products/shoe","price":2500,
                             "featured_image":{"url":"/cdn/shoe.jpg"}}],
                "collections":[{"title":"Boots","url":"/collections/boots","products_count":12}],
                "articles":[{"title":"Care guide","url":"/blogs/news/care","summary":"<p>Oil often</p>"}]
            }}}"#,
        );

        assert_eq!(set.len(), 3);
        assert_eq!(set.products[0].title, "Shoe");
        assert_eq!(set.products[0].image_url, "/cdn/shoe.jpg");
        assert_eq!(set.products[0].detail, ItemDetail::Price(Some(2500)));
        assert_eq!(set.collections[0].detail, ItemDetail::ProductCount(12));
        assert_eq!(
            set.articles[0].detail,
            ItemDetail::Summary("<p>Oil often</p>".to_string())
        );
    }

    #[test]
    fn test_missing_fields_fall_back() {
        let set = decode(
            r#"{"resources":{"results":{
                "products":[{"title":"Hat","url":"/products/hat"}],
                "collections":[{"title":"Sale","url":"/collections/sale","featured_image":null}]
            }}}"#,
        );

        assert_eq!(set.products[0].image_url, "");
        assert_eq!(set.products[0].detail, ItemDetail::Price(None));
        assert_eq!(set.collections[0].detail, ItemDetail::ProductCount(0));
        assert!(set.articles.is_empty());
    }

    #[test]
    fn test_missing_categories_yield_empty_set() {
        assert!(decode("{}").is_empty());
        assert!(decode(r#"{"resources":{}}"#).is_empty());
        assert!(decode(r#"{"resources":{"results":{}}}"#).is_empty());
    }

    #[test]
    fn test_price_accepts_minor_and_major_units() {
        assert_eq!(parse_minor_units(&serde_json::json!(2500)), Some(2500));
        assert_eq!(parse_minor_units(&serde_json::json!("2500")), Some(2500));
        assert_eq!(parse_minor_units(&serde_json::json!("25.00")), Some(2500));
        assert_eq!(parse_minor_units(&serde_json::json!("25.5")), Some(2550));
        assert_eq!(parse_minor_units(&serde_json::json!("-1.25")), Some(-125));
    }

    #[test]
    fn test_price_rejects_garbage() {
        assert_eq!(parse_minor_units(&serde_json::json!("free")), None);
        assert_eq!(parse_minor_units(&serde_json::json!("25.001")), None);
        assert_eq!(parse_minor_units(&serde_json::json!(true)), None);
        assert_eq!(parse_minor_units(&Value::Null), None);
    }

    #[test]
    fn test_price_out_of_range_has_no_price() {
        for raw in [
            r#""99999999999999999.00""#,
            r#""-9223372036854775808.00""#,
            r#""9223372036854775807.99""#,
            "1e30",
            "18446744073709551615",
        ] {
            let set = decode(&format!(
                r#"{{"resources":{{"results":{{"products":[{{"title":"X","url":"/x","price":{}}}]}}}}}}"#,
                raw
            ));
            assert_eq!(set.products[0].detail, ItemDetail::Price(None), "price {}", raw);
        }
        assert_eq!(parse_minor_units(&serde_json::json!(2500.4)), Some(2500));
    }

    #[test]
    fn test_sections_skip_empty_categories() {
        let set = decode(
            r#"{"resources":{"results":{"articles":[{"title":"A","url":"/a"}]}}}"#,
        );
        let sections: Vec<_> = set.sections().map(|(r, _)| r).collect();
        assert_eq!(sections, vec![ResourceType::Article]);
    }

    #[test]
    fn test_resource_type_parse() {
        assert_eq!("product".parse::<ResourceType>(), Ok(ResourceType::Product));
        assert_eq!(" article ".parse::<ResourceType>(), Ok(ResourceType::Article));
        assert!("page".parse::<ResourceType>().is_err());
    }

    #[test]
    fn test_resource_type_display() {
        assert_eq!(ResourceType::Collection.to_string(), "collection");
        assert_eq!(ResourceType::Product.heading(), "Products");
    }
}
