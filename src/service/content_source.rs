//! Read-side seam to the content repository that lists auditable items.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::AuditConfig;
use crate::domain::models::TargetType;
use crate::error::{AuditError, Result};
use crate::extractor::page_extractor::{classify_link, LinkKind};
use crate::extractor::sitemap::{extract_url_from_sitemap, SITE_MAP_PATH};
use crate::service::http::create_client;

/// Placeholder replaced by an item's slug in a collection path template.
pub const SLUG_PLACEHOLDER: &str = "{slug}";

/// One published item as the content repository describes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ContentItem {
    pub id: String,
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
}

/// All items of one content type plus the path template they publish under,
/// e.g. `/products/{slug}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ContentCollection {
    #[serde(rename = "type")]
    pub target_type: TargetType,
    pub path_template: String,
    #[serde(default)]
    pub items: Vec<ContentItem>,
}

#[async_trait]
pub trait ContentSource: Send + Sync {
    /// List every dynamically audited collection. Errors mean the source is
    /// misconfigured or down and abort the run.
    async fn list_collections(&self) -> Result<Vec<ContentCollection>>;

    fn name(&self) -> &'static str;
}

/// In-memory source, for callers that already hold the listing.
#[derive(Debug, Clone, Default)]
pub struct StaticContentSource {
    collections: Vec<ContentCollection>,
}

impl StaticContentSource {
    pub fn new(collections: Vec<ContentCollection>) -> Self {
        Self { collections }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentSource for StaticContentSource {
    async fn list_collections(&self) -> Result<Vec<ContentCollection>> {
        Ok(self.collections.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Lists the site's own `sitemap.xml` entries as one collection.
///
/// Sitemap entries carry no title or keywords, so their focus keyword always
/// falls back to the configured generic one.
pub struct SitemapContentSource {
    client: Client,
    site_url: Url,
    site_domain: String,
    target_type: TargetType,
}

impl SitemapContentSource {
    pub fn new(config: &AuditConfig, target_type: TargetType) -> Result<Self> {
        Ok(Self {
            client: create_client(config)?,
            site_url: config.base_url()?,
            site_domain: config.site_domain(),
            target_type,
        })
    }

    async fn fetch_sitemap(&self) -> Result<String> {
        let sitemap_url = self.site_url.join(SITE_MAP_PATH)?;
        tracing::debug!("[SITEMAP] Fetching {}", sitemap_url);

        let response = self.client.get(sitemap_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AuditError::HttpStatus(status.as_u16()));
        }
        Ok(response.text().await?)
    }

    /// Keep only this site's pages, as absolute URLs.
    fn to_items(&self, urls: Vec<String>) -> Vec<ContentItem> {
        urls.into_iter()
            .filter(|u| classify_link(u, &self.site_domain) == Some(LinkKind::Internal))
            .filter_map(|u| self.site_url.join(&u).ok())
            .map(|u| ContentItem {
                id: u.path().to_string(),
                slug: u.to_string(),
                title: String::new(),
                keywords: None,
            })
            .collect()
    }
}

#[async_trait]
impl ContentSource for SitemapContentSource {
    async fn list_collections(&self) -> Result<Vec<ContentCollection>> {
        let body = self
            .fetch_sitemap()
            .await
            .map_err(|e| AuditError::content_source(self.name(), e.to_string()))?;

        let items = self.to_items(extract_url_from_sitemap(&body));
        tracing::info!("[SITEMAP] Listed {} pages", items.len());

        Ok(vec![ContentCollection {
            target_type: self.target_type,
            path_template: SLUG_PLACEHOLDER.to_string(),
            items,
        }])
    }

    fn name(&self) -> &'static str {
        "sitemap"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_source_returns_listing() {
        let source = StaticContentSource::new(vec![ContentCollection {
            target_type: TargetType::Product,
            path_template: "/products/{slug}".to_string(),
            items: vec![ContentItem {
                id: "p1".to_string(),
                slug: "red-tile".to_string(),
                title: "Red Tile".to_string(),
                keywords: None,
            }],
        }]);

        let collections = source.list_collections().await.unwrap();
        assert_eq!(collections.len(), 1);
        assert_eq!(collections[0].items[0].slug, "red-tile");
        assert!(StaticContentSource::empty().list_collections().await.unwrap().is_empty());
    }

    #[test]
    fn test_collection_deserializes_without_keywords() {
        let collection: ContentCollection = serde_json::from_str(
            r#"{ "type": "article", "path_template": "/journal/{slug}",
                 "items": [ { "id": "7", "slug": "firing", "title": "Firing | Journal" } ] }"#,
        )
        .unwrap();
        assert_eq!(collection.target_type, TargetType::Article);
        assert!(collection.items[0].keywords.is_none());
    }

    #[tokio::test]
    async fn test_sitemap_source_lists_own_pages() {
        let mut server = mockito::Server::new_async().await;
        let body = format!(
            "<urlset><url><loc>{0}/</loc></url><url><loc>{0}/products</loc></url>\
             <url><loc>https://elsewhere.example/x</loc></url></urlset>",
            server.url()
        );
        let _mock = server
            .mock("GET", "/sitemap.xml")
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let config = AuditConfig::for_site(format!("{}/", server.url()));
        let source = SitemapContentSource::new(&config, TargetType::Page).unwrap();
        let collections = source.list_collections().await.unwrap();

        assert_eq!(collections.len(), 1);
        assert_eq!(collections[0].path_template, SLUG_PLACEHOLDER);
        let slugs: Vec<_> = collections[0].items.iter().map(|i| i.slug.as_str()).collect();
        assert_eq!(
            slugs,
            vec![
                format!("{}/", server.url()).as_str(),
                format!("{}/products", server.url()).as_str(),
            ]
        );
        assert_eq!(collections[0].items[1].id, "/products");
    }

    #[tokio::test]
    async fn test_missing_sitemap_fails_loudly() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/sitemap.xml")
            .with_status(404)
            .create_async()
            .await;

        let config = AuditConfig::for_site(format!("{}/", server.url()));
        let source = SitemapContentSource::new(&config, TargetType::Page).unwrap();
        let err = source.list_collections().await.unwrap_err();
        assert!(matches!(
            err,
            AuditError::ContentSource { source_name: "sitemap", .. }
        ));
    }
}
