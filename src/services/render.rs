// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Builds the suggestion, loading and result panels.
//!
//! Every value that came from the network or from the user is attached as a
//! text node or an escaped attribute, never spliced into markup.

use crate::models::money::format_money;
use crate::models::search::{ItemDetail, ResourceType, ResultItem, ResultSet};
use crate::models::settings::SearchSettings;
use crate::services::markup::{fragment_text, truncate_chars, Element, Node};
use url::form_urlencoded;

/// Longest article summary shown under a result
const SUMMARY_MAX_CHARS: usize = 120;

/// Site-relative path of the full search page for `query`
pub fn search_page_path(query: &str) -> String {
    let encoded = form_urlencoded::Serializer::new(String::new())
        .append_pair("q", query)
        .finish();
    format!("/search?{}", encoded)
}

/// Accept site-relative paths and absolute http(s) URLs only
pub fn safe_link(url: &str) -> Option<&str> {
    let url = url.trim();
    if let Some(rest) = url.strip_prefix('/') {
        // Browsers read `/\host` like `//host`
        if rest.starts_with(['/', '\\']) {
            return None;
        }
        return Some(url);
    }
    match url::Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Some(url),
        _ => None,
    }
}

/// Renders panels with the storefront's money format and fallback link
#[derive(Debug, Clone)]
pub struct PanelRenderer {
    money_format: String,
    fallback_path: String,
}

impl PanelRenderer {
    pub fn new(money_format: impl Into<String>, fallback_path: impl Into<String>) -> Self {
        Self {
            money_format: money_format.into(),
            fallback_path: fallback_path.into(),
        }
    }

    pub fn from_settings(settings: &SearchSettings) -> Self {
        Self::new(&settings.money_format, &settings.fallback_path)
    }

    /// Recent and popular searches shown while the query is too short
    pub fn suggestions(&self, recent: &[String], popular: &[String]) -> Node {
        let mut panel = Element::new("div")
            .class("predictive-search__suggestions")
            .attr("data-panel", "suggestions");

        if !recent.is_empty() {
            panel = panel.child(suggestion_group("Recent searches", "recent", recent));
        }
        if !popular.is_empty() {
            panel = panel.child(suggestion_group("Popular searches", "popular", popular));
        }
        panel.into()
    }

    /// Placeholder shown while a fetch is in flight
    pub fn loading(&self, query: &str) -> Node {
        Element::new("div")
            .class("predictive-search__loading")
            .attr("data-panel", "loading")
            .attr("aria-busy", "true")
            .text(format!("Searching for “{}”…", query))
            .into()
    }

    /// Result panel for `results`, or the no-results placeholder when every category is empty
    pub fn results(&self, results: &ResultSet, query: &str) -> Node {
        let mut panel = Element::new("div")
            .class("predictive-search__results")
            .attr("data-panel", "results");

        if results.is_empty() {
            panel = panel.child(self.no_results(query));
        } else {
            panel = panel.children(
                results
                    .sections()
                    .map(|(resource, items)| self.section(resource, items)),
            );
        }

        panel
            .child(
                Element::new("a")
                    .class("predictive-search__view-all")
                    .attr("href", search_page_path(query))
                    .text(format!("View all results for “{}”", query)),
            )
            .into()
    }

    fn no_results(&self, query: &str) -> Node {
        Element::new("div")
            .class("predictive-search__empty")
            .child(
                Element::new("p").text(format!("No results found for “{}”", query)),
            )
            .child(
                Element::new("a")
                    .class("predictive-search__fallback")
                    .attr("href", safe_link(&self.fallback_path).unwrap_or("/"))
                    .text("Browse all products"),
            )
            .into()
    }

    fn section(&self, resource: ResourceType, items: &[ResultItem]) -> Node {
        Element::new("section")
            .class("predictive-search__section")
            .attr("data-resource", resource.as_param())
            .child(
                Element::new("h3")
                    .class("predictive-search__heading")
                    .text(resource.heading()),
            )
            .child(
                Element::new("ul")
                    .class("predictive-search__list")
                    .children(items.iter().map(|item| self.item(item))),
            )
            .into()
    }

    fn item(&self, item: &ResultItem) -> Node {
        let mut link = Element::new("a")
            .class("predictive-search__item")
            .attr("href", safe_link(&item.url).unwrap_or("#"));

        if let Some(src) = safe_link(&item.image_url) {
            link = link.child(
                Element::new("img")
                    .class("predictive-search__image")
                    .attr("src", src)
                    .attr("alt", item.title.as_str())
                    .attr("loading", "lazy"),
            );
        }

        link = link.child(
            Element::new("span")
                .class("predictive-search__title")
                .text(item.title.as_str()),
        );

        if let Some(detail) = self.detail_line(&item.detail) {
            link = link.child(detail);
        }

        Element::new("li").child(link).into()
    }

    fn detail_line(&self, detail: &ItemDetail) -> Option<Node> {
        let (class, text) = match detail {
            ItemDetail::Price(Some(minor)) => (
                "predictive-search__price",
                format_money(*minor, &self.money_format),
            ),
            ItemDetail::Price(None) => return None,
            ItemDetail::ProductCount(count) => (
                "predictive-search__count",
                match count {
                    1 => "1 product".to_string(),
                    n => format!("{} products", n),
                },
            ),
            ItemDetail::Summary(html) => {
                let text = truncate_chars(&fragment_text(html), SUMMARY_MAX_CHARS);
                if text.is_empty() {
                    return None;
                }
                ("predictive-search__summary", text)
            }
        };
        Some(Element::new("span").class(class).text(text).into())
    }
}

fn suggestion_group(title: &str, kind: &'static str, queries: &[String]) -> Node {
    Element::new("div")
        .class("predictive-search__suggestion-group")
        .attr("data-group", kind)
        .child(Element::new("h4").text(title))
        .child(
            Element::new("ul").children(queries.iter().map(|query| {
                Element::new("li")
                    .child(
                        Element::new("a")
                            .class("predictive-search__suggestion")
                            .attr("href", search_page_path(query))
                            .text(query.as_str()),
                    )
                    .into()
            })),
        )
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn renderer() -> PanelRenderer {
        PanelRenderer::new("${{amount}}", "/collections/all")
    }

    fn product(title: &str, price: Option<i64>) -> ResultItem {
        ResultItem {
            title: title.to_string(),
            url: "/products/item".to_string(),
            image_url: String::new(),
            detail: ItemDetail::Price(price),
        }
    }

    fn select<'a>(doc: &'a Html, selector: &str) -> Vec<scraper::ElementRef<'a>> {
        doc.select(&Selector::parse(selector).unwrap()).collect()
    }

    #[test]
    fn test_product_section_with_price() {
        let results = ResultSet {
            products: vec![product("Shoe", Some(2500))],
            ..Default::default()
        };
        let html = renderer().results(&results, "sh").to_html();
        let doc = Html::parse_fragment(&html);

        let sections = select(&doc, "section.predictive-search__section");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].value().attr("data-resource"), Some("product"));

        let titles = select(&doc, ".predictive-search__title");
        assert_eq!(titles[0].text().collect::<String>(), "Shoe");
        let prices = select(&doc, ".predictive-search__price");
        assert_eq!(prices[0].text().collect::<String>(), "$25.00");
    }

    #[test]
    fn test_hostile_title_stays_text() {
        let hostile = "<img src=x onerror=alert(1)><script>alert(2)</script>";
        let results = ResultSet {
            products: vec![product(hostile, None)],
            ..Default::default()
        };
        let html = renderer().results(&results, hostile).to_html();
        let doc = Html::parse_fragment(&html);

        assert!(select(&doc, "script").is_empty());
        assert!(select(&doc, "img").is_empty());
        let titles = select(&doc, ".predictive-search__title");
        assert_eq!(titles[0].text().collect::<String>(), hostile);
    }

    #[test]
    fn test_empty_results_render_fallback_once() {
        let html = renderer().results(&ResultSet::default(), "zzz").to_html();
        let doc = Html::parse_fragment(&html);

        assert_eq!(select(&doc, ".predictive-search__empty").len(), 1);
        assert!(select(&doc, "h3").is_empty());
        let fallback = select(&doc, "a.predictive-search__fallback");
        assert_eq!(fallback[0].value().attr("href"), Some("/collections/all"));
    }

    #[test]
    fn test_view_all_link_always_present() {
        for results in [
            ResultSet::default(),
            ResultSet {
                products: vec![product("Shoe", Some(1))],
                ..Default::default()
            },
        ] {
            let node = renderer().results(&results, "red shoes");
            let links = node.find_by_class("predictive-search__view-all");
            assert_eq!(links.len(), 1);
            assert_eq!(links[0].get_attr("href"), Some("/search?q=red+shoes"));
        }
    }

    #[test]
    fn test_sections_in_category_order() {
        let results = ResultSet {
            articles: vec![ResultItem {
                title: "Care guide".to_string(),
                url: "/blogs/news/care".to_string(),
                image_url: String::new(),
                detail: ItemDetail::Summary("<p>Oil <em>often</em></p>".to_string()),
            }],
            collections: vec![ResultItem {
                title: "Boots".to_string(),
                url: "/collections/boots".to_string(),
                image_url: "/cdn/boots.jpg".to_string(),
                detail: ItemDetail::ProductCount(1),
            }],
            ..Default::default()
        };
        let node = renderer().results(&results, "bo");
        let headings: Vec<String> = node
            .find_by_class("predictive-search__heading")
            .into_iter()
            .map(|h| Node::Element(h.clone()).text_content())
            .collect();
        assert_eq!(headings, vec!["Collections", "Articles"]);

        let text = node.text_content();
        assert!(text.contains("1 product"));
        assert!(text.contains("Oil often"));
        assert_eq!(node.find_by_class("predictive-search__image").len(), 1);
    }

    #[test]
    fn test_unsafe_links_are_neutralised() {
        let results = ResultSet {
            products: vec![ResultItem {
                title: "Bad".to_string(),
                url: "javascript:alert(1)".to_string(),
                image_url: "data:image/svg+xml,<svg onload=alert(1)>".to_string(),
                detail: ItemDetail::Price(None),
            }],
            ..Default::default()
        };
        let node = renderer().results(&results, "ba");
        let items = node.find_by_class("predictive-search__item");
        assert_eq!(items[0].get_attr("href"), Some("#"));
        assert!(node.find_by_class("predictive-search__image").is_empty());
        assert!(node.find_by_class("predictive-search__price").is_empty());
    }

    #[test]
    fn test_safe_link() {
        assert_eq!(safe_link("/products/a"), Some("/products/a"));
        assert_eq!(safe_link("https://cdn.example.com/a.jpg"), Some("https://cdn.example.com/a.jpg"));
        assert_eq!(safe_link("//evil.example.com"), None);
        assert_eq!(safe_link("/\\evil.example.com"), None);
        assert_eq!(safe_link("/\\/evil.example.com"), None);
        assert_eq!(safe_link("javascript:alert(1)"), None);
        assert_eq!(safe_link(""), None);
    }

    #[test]
    fn test_suggestions_panel() {
        let recent = vec!["boots".to_string()];
        let popular = vec!["Sale".to_string(), "Gift cards".to_string()];
        let node = renderer().suggestions(&recent, &popular);

        let links = node.find_by_class("predictive-search__suggestion");
        assert_eq!(links.len(), 3);
        assert_eq!(links[0].get_attr("href"), Some("/search?q=boots"));
        assert!(node.text_content().contains("Recent searches"));
    }

    #[test]
    fn test_suggestions_without_history_omit_recent_group() {
        let node = renderer().suggestions(&[], &["Sale".to_string()]);
        assert!(!node.text_content().contains("Recent searches"));
        assert!(node.text_content().contains("Popular searches"));
    }

    #[test]
    fn test_search_page_path_encodes_query() {
        assert_eq!(search_page_path("a&b=c"), "/search?q=a%26b%3Dc");
        assert_eq!(search_page_path("shoe"), "/search?q=shoe");
    }
}
