//! Shared fixtures for unit tests, integration tests and benches.

pub mod fixtures {
    use crate::domain::models::PageSignals;

    pub const SITE_DOMAIN: &str = "terracotta.example";
    pub const SITE_URL: &str = "https://terracotta.example/";
    pub const FOCUS_KEYWORD: &str = "Terracotta Facade";

    /// Signals that pass every rule for [`FOCUS_KEYWORD`].
    pub fn perfect_signals() -> PageSignals {
        PageSignals {
            title: "Premium Terracotta Facade Tiles".to_string(),
            meta_description: "d".repeat(150),
            h1: "Premium Terracotta Facade Tiles".to_string(),
            canonical_url: "https://terracotta.example/facade-tiles".to_string(),
            body_text: "Premium terracotta facade tiles.".to_string(),
            word_count: 800,
            og_title: "Premium Terracotta Facade Tiles".to_string(),
            og_image: "https://terracotta.example/og/facade.jpg".to_string(),
            has_structured_data: true,
            missing_alt_image_count: 0,
            internal_link_count: 5,
            external_link_count: 1,
            readability_score: 65,
        }
    }

    /// An empty, barely written page: scores 25 for any non-empty keyword.
    pub fn thin_signals() -> PageSignals {
        PageSignals {
            word_count: 40,
            readability_score: 20,
            ..PageSignals::default()
        }
    }

    /// Markup builder for pages with a known audit outcome.
    #[derive(Debug, Clone)]
    pub struct PageHtml {
        pub title: String,
        pub description: String,
        pub h1: String,
        pub canonical: bool,
        pub open_graph: bool,
        pub json_ld: bool,
        pub sentences: usize,
        pub internal_links: usize,
        pub images_without_alt: usize,
    }

    impl PageHtml {
        /// Scores 100 for [`FOCUS_KEYWORD`] on [`SITE_DOMAIN`].
        pub fn perfect() -> Self {
            Self {
                title: "Premium Terracotta Facade Tiles".to_string(),
                description: "Hand-fired terracotta facade tiles for ventilated rainscreen cladding. "
                    .repeat(3)
                    .trim()
                    .to_string(),
                h1: "Premium Terracotta Facade Tiles".to_string(),
                canonical: true,
                open_graph: true,
                json_ld: true,
                sentences: 80,
                internal_links: 3,
                images_without_alt: 0,
            }
        }

        /// Only a short paragraph: scores 30 for any keyword.
        pub fn thin() -> Self {
            Self {
                title: String::new(),
                description: String::new(),
                h1: String::new(),
                canonical: false,
                open_graph: false,
                json_ld: false,
                sentences: 0,
                internal_links: 0,
                images_without_alt: 0,
            }
        }

        pub fn render(&self) -> String {
            let mut head = String::new();
            if !self.title.is_empty() {
                head.push_str(&format!("<title>{}</title>", self.title));
            }
            if !self.description.is_empty() {
                head.push_str(&format!(
                    r#"<meta name="description" content="{}">"#,
                    self.description
                ));
            }
            if self.canonical {
                head.push_str(r#"<link rel="canonical" href="https://terracotta.example/facade">"#);
            }
            if self.open_graph {
                head.push_str(&format!(
                    r#"<meta property="og:title" content="{}"><meta property="og:image" content="https://terracotta.example/og.jpg">"#,
                    self.title
                ));
            }
            if self.json_ld {
                head.push_str(r#"<script type="application/ld+json">{"@type":"Product"}</script>"#);
            }

            let mut body = String::new();
            if !self.h1.is_empty() {
                body.push_str(&format!("<h1>{}</h1>", self.h1));
            }
            if self.sentences == 0 {
                body.push_str("<p>Nothing here yet.</p>");
            } else {
                body.push_str(&format!("<p>{}</p>", "We make red clay tiles. ".repeat(self.sentences)));
            }
            for i in 0..self.internal_links {
                body.push_str(&format!(r#"<a href="/range/{}">Range</a>"#, i));
            }
            for i in 0..self.images_without_alt {
                body.push_str(&format!(r#"<img src="/img/{}.jpg">"#, i));
            }

            format!("<html><head>{}</head><body>{}</body></html>", head, body)
        }
    }
}

pub mod fetchers {
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::service::fetcher::PageFetcher;

    /// Serves canned HTML by URL; unknown URLs behave like failed fetches.
    #[derive(Debug, Default)]
    pub struct CannedFetcher {
        pages: HashMap<String, String>,
        delays: HashMap<String, Duration>,
        calls: AtomicUsize,
    }

    impl CannedFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
            self.pages.insert(url.into(), html.into());
            self
        }

        pub fn with_delay(mut self, url: impl Into<String>, delay: Duration) -> Self {
            self.delays.insert(url.into(), delay);
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PageFetcher for CannedFetcher {
        async fn fetch(&self, url: &str) -> Option<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delays.get(url) {
                tokio::time::sleep(*delay).await;
            }
            self.pages.get(url).cloned()
        }
    }
}
