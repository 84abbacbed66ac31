use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use url::Url;

use super::readability::estimate_readability;
use crate::domain::models::PageSignals;

/// Elements whose text never renders.
const INVISIBLE_ELEMENTS: [&str; 5] = ["script", "style", "noscript", "template", "svg"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Internal,
    External,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkCounts {
    pub internal: usize,
    pub external: usize,
}

pub struct PageExtractor;

impl PageExtractor {
    /// Extract signals from a fetch outcome. `None` (the fetcher's "no data")
    /// skips extraction entirely.
    pub fn extract_page(html: Option<&str>, site_domain: &str) -> Option<PageSignals> {
        html.map(|html| Self::extract(html, site_domain))
    }

    /// Extract every signal independently; a missing element only empties
    /// its own field.
    pub fn extract(html: &str, site_domain: &str) -> PageSignals {
        let document = Html::parse_document(html);

        let body_text = Self::extract_body_text(&document);
        let word_count = body_text.split_whitespace().count();
        let readability_score = estimate_readability(&body_text);
        let links = Self::count_links(&document, site_domain);

        PageSignals {
            title: Self::extract_title(&document),
            meta_description: Self::extract_meta_description(&document),
            h1: Self::extract_h1(&document),
            canonical_url: Self::extract_canonical(&document),
            word_count,
            og_title: Self::extract_meta_property(&document, "og:title"),
            og_image: Self::extract_meta_property(&document, "og:image"),
            has_structured_data: Self::has_structured_data(&document),
            missing_alt_image_count: Self::count_missing_alt(&document),
            internal_link_count: links.internal,
            external_link_count: links.external,
            readability_score,
            body_text,
        }
    }

    pub fn extract_title(html: &Html) -> String {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| Selector::parse("title").unwrap());
        html.select(selector)
            .next()
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .unwrap_or_default()
    }

    pub fn extract_meta_description(html: &Html) -> String {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector =
            SELECTOR.get_or_init(|| Selector::parse("meta[name='description']").unwrap());
        html.select(selector)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    }

    pub fn extract_h1(html: &Html) -> String {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| Selector::parse("h1").unwrap());
        html.select(selector)
            .next()
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .unwrap_or_default()
    }

    pub fn extract_canonical(html: &Html) -> String {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| Selector::parse("link[rel='canonical']").unwrap());
        html.select(selector)
            .next()
            .and_then(|el| el.value().attr("href"))
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    }

    /// Content of `<meta property="...">`, as used by Open Graph tags.
    pub fn extract_meta_property(html: &Html, property: &str) -> String {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| Selector::parse("meta[property]").unwrap());
        html.select(selector)
            .find(|el| el.value().attr("property") == Some(property))
            .and_then(|el| el.value().attr("content"))
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    }

    pub fn has_structured_data(html: &Html) -> bool {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| Selector::parse("script[type]").unwrap());
        html.select(selector).any(|el| {
            el.value()
                .attr("type")
                .map(|t| t.trim().eq_ignore_ascii_case("application/ld+json"))
                .unwrap_or(false)
        })
    }

    /// Images that declare a source but no usable alt text.
    pub fn count_missing_alt(html: &Html) -> usize {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| Selector::parse("img[src]").unwrap());
        html.select(selector)
            .filter(|img| {
                img.value()
                    .attr("alt")
                    .map(|alt| alt.trim().is_empty())
                    .unwrap_or(true)
            })
            .count()
    }

    pub fn count_links(html: &Html, site_domain: &str) -> LinkCounts {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| Selector::parse("a[href]").unwrap());

        let mut counts = LinkCounts::default();
        for href in html.select(selector).filter_map(|a| a.value().attr("href")) {
            match classify_link(href, site_domain) {
                Some(LinkKind::Internal) => counts.internal += 1,
                Some(LinkKind::External) => counts.external += 1,
                None => {}
            }
        }
        counts
    }

    /// Visible text of `<body>`, whitespace-collapsed.
    pub fn extract_body_text(html: &Html) -> String {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| Selector::parse("body").unwrap());

        let Some(body) = html.select(selector).next() else {
            return String::new();
        };

        let mut text = String::new();
        for node in body.descendants() {
            let Some(fragment) = node.value().as_text() else {
                continue;
            };
            let hidden = node.ancestors().any(|ancestor| {
                ElementRef::wrap(ancestor)
                    .map(|el| INVISIBLE_ELEMENTS.contains(&el.value().name()))
                    .unwrap_or(false)
            });
            if !hidden {
                text.push(' ');
                text.push_str(fragment);
            }
        }
        collapse_whitespace(&text)
    }
}

/// Classify an anchor href relative to the site's own domain.
///
/// Relative hrefs are internal, absolute `http(s)` hrefs are internal when
/// their host is the site domain or one of its subdomains. Fragment-only,
/// `javascript:`, `mailto:`, `tel:` and other non-web schemes are neither.
pub fn classify_link(href: &str, site_domain: &str) -> Option<LinkKind> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let absolute = if href.starts_with("//") {
        Url::parse(&format!("https:{}", href)).ok()
    } else {
        match Url::parse(href) {
            Ok(url) => Some(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => return Some(LinkKind::Internal),
            Err(_) => None,
        }
    };

    let url = absolute?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }

    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    if is_same_site(&host, site_domain) {
        Some(LinkKind::Internal)
    } else {
        Some(LinkKind::External)
    }
}

fn is_same_site(host: &str, site_domain: &str) -> bool {
    let domain = site_domain.trim().trim_start_matches("www.").to_ascii_lowercase();
    if domain.is_empty() {
        return false;
    }
    host == domain || host.ends_with(&format!(".{}", domain))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOMAIN: &str = "terracotta.example";

    #[test]
    fn test_extract_head_signals() {
        let html = r#"
            <html><head>
                <title>  Premium   Terracotta Facade Tiles </title>
                <meta name="description" content=" Hand-fired facade tiles. ">
                <link rel="canonical" href="https://terracotta.example/tiles">
                <meta property="og:title" content="Terracotta Tiles">
                <meta property="og:image" content="https://terracotta.example/og.jpg">
                <script type="application/ld+json">{"@type": "Product"}</script>
            </head><body><h1>Facade <em>Tiles</em></h1></body></html>
        "#;
        let signals = PageExtractor::extract(html, DOMAIN);

        assert_eq!(signals.title, "Premium Terracotta Facade Tiles");
        assert_eq!(signals.meta_description, "Hand-fired facade tiles.");
        assert_eq!(signals.canonical_url, "https://terracotta.example/tiles");
        assert_eq!(signals.og_title, "Terracotta Tiles");
        assert_eq!(signals.og_image, "https://terracotta.example/og.jpg");
        assert_eq!(signals.h1, "Facade Tiles");
        assert!(signals.has_structured_data);
    }

    #[test]
    fn test_missing_elements_default_independently() {
        let html = "<html><head><title>Only a title here</title></head><body></body></html>";
        let signals = PageExtractor::extract(html, DOMAIN);

        assert_eq!(signals.title, "Only a title here");
        assert_eq!(signals.canonical_url, "");
        assert_eq!(signals.meta_description, "");
        assert_eq!(signals.h1, "");
        assert_eq!(signals.og_title, "");
        assert_eq!(signals.og_image, "");
        assert!(!signals.has_structured_data);
        assert_eq!(signals.word_count, 0);
        assert_eq!(signals.internal_link_count, 0);
        assert_eq!(signals.external_link_count, 0);
    }

    #[test]
    fn test_garbage_input_does_not_fail() {
        let signals = PageExtractor::extract("<<<not html>>> <div", DOMAIN);
        assert_eq!(signals.title, "");
        assert!(signals.readability_score <= 100);
    }

    #[test]
    fn test_no_data_skips_extraction() {
        assert!(PageExtractor::extract_page(None, DOMAIN).is_none());
        assert!(PageExtractor::extract_page(Some("<p>hi</p>"), DOMAIN).is_some());
    }

    #[test]
    fn test_body_text_skips_scripts_and_collapses_whitespace() {
        let html = r#"<html><body>
            <p>Red   clay
               tiles.</p>
            <script>var hidden = "nope";</script>
            <style>p { color: red }</style>
            <p>Fired twice.</p>
        </body></html>"#;
        let signals = PageExtractor::extract(html, DOMAIN);

        assert_eq!(signals.body_text, "Red clay tiles. Fired twice.");
        assert_eq!(signals.word_count, 5);
        assert_eq!(
            signals.readability_score,
            estimate_readability("Red clay tiles. Fired twice.")
        );
    }

    #[test]
    fn test_count_missing_alt() {
        let html = r#"<html><body>
            <img src="a.jpg" alt="A tile">
            <img src="b.jpg">
            <img src="c.jpg" alt="  ">
            <img alt="no source">
        </body></html>"#;
        let signals = PageExtractor::extract(html, DOMAIN);
        assert_eq!(signals.missing_alt_image_count, 2);
    }

    #[test]
    fn test_link_counts() {
        let html = r##"<html><body>
            <a href="/products">Products</a>
            <a href="about">About</a>
            <a href="https://terracotta.example/contact">Contact</a>
            <a href="https://www.terracotta.example/blog">Blog</a>
            <a href="https://supplier.example/clay">Supplier</a>
            <a href="//cdn.other.example/file.pdf">Spec sheet</a>
            <a href="#top">Top</a>
            <a href="mailto:sales@terracotta.example">Mail</a>
            <a href="javascript:void(0)">Menu</a>
            <a>No href</a>
        </body></html>"##;
        let signals = PageExtractor::extract(html, DOMAIN);
        assert_eq!(signals.internal_link_count, 4);
        assert_eq!(signals.external_link_count, 2);
    }

    #[test]
    fn test_classify_link() {
        assert_eq!(classify_link("/a", DOMAIN), Some(LinkKind::Internal));
        assert_eq!(classify_link("?page=2", DOMAIN), Some(LinkKind::Internal));
        assert_eq!(
            classify_link("http://shop.terracotta.example/x", DOMAIN),
            Some(LinkKind::Internal)
        );
        assert_eq!(
            classify_link("https://notterracotta.example/x", DOMAIN),
            Some(LinkKind::External)
        );
        assert_eq!(classify_link("tel:+123", DOMAIN), None);
        assert_eq!(classify_link("", DOMAIN), None);
    }

    #[test]
    fn test_structured_data_type_is_case_insensitive() {
        let html = r#"<html><head><script type="Application/LD+JSON">{}</script></head></html>"#;
        assert!(PageExtractor::extract(html, DOMAIN).has_structured_data);

        let html = r#"<html><head><script type="text/javascript">{}</script></head></html>"#;
        assert!(!PageExtractor::extract(html, DOMAIN).has_structured_data);
    }
}
