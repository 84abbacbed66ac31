//! Builds the audit target list from static site pages and the content source.

use std::sync::Arc;
use url::Url;

use crate::config::{AuditConfig, StaticTarget};
use crate::domain::models::AuditTarget;
use crate::error::{AuditError, Result};
use crate::service::content_source::{ContentCollection, ContentItem, ContentSource, SLUG_PLACEHOLDER};

pub struct TargetEnumerator {
    base_url: Url,
    static_targets: Vec<StaticTarget>,
    fallback_keyword: String,
    source: Arc<dyn ContentSource>,
}

impl TargetEnumerator {
    pub fn new(config: &AuditConfig, source: Arc<dyn ContentSource>) -> Result<Self> {
        Ok(Self {
            base_url: config.base_url()?,
            static_targets: config.static_targets.clone(),
            fallback_keyword: config.fallback_keyword.clone(),
            source,
        })
    }

    /// Static targets first, then every listed content item in source order.
    pub async fn enumerate(&self) -> Result<Vec<AuditTarget>> {
        let mut targets = self.static_audit_targets()?;

        let collections = self.source.list_collections().await?;
        let dynamic = self.collection_targets(&collections)?;
        tracing::info!(
            "[TARGETS] {} static + {} from {} source",
            targets.len(),
            dynamic.len(),
            self.source.name()
        );

        targets.extend(dynamic);
        Ok(targets)
    }

    pub fn static_audit_targets(&self) -> Result<Vec<AuditTarget>> {
        self.static_targets
            .iter()
            .map(|t| {
                let url = self.resolve(&t.path)?;
                let keyword = if t.focus_keyword.trim().is_empty() {
                    self.fallback_keyword.clone()
                } else {
                    t.focus_keyword.trim().to_string()
                };
                Ok(AuditTarget::new(url, t.target_type, keyword))
            })
            .collect()
    }

    pub fn collection_targets(&self, collections: &[ContentCollection]) -> Result<Vec<AuditTarget>> {
        let mut targets = Vec::new();
        for collection in collections {
            if !collection.path_template.contains(SLUG_PLACEHOLDER) {
                return Err(AuditError::InvalidTemplate(format!(
                    "'{}' has no {} placeholder",
                    collection.path_template, SLUG_PLACEHOLDER
                )));
            }

            for item in &collection.items {
                let path = collection.path_template.replace(SLUG_PLACEHOLDER, &item.slug);
                let url = self.resolve(&path)?;
                let keyword = resolve_focus_keyword(item, &self.fallback_keyword);
                targets.push(
                    AuditTarget::new(url, collection.target_type, keyword).with_source_id(&item.id),
                );
            }
        }
        Ok(targets)
    }

    fn resolve(&self, path: &str) -> Result<String> {
        self.base_url
            .join(path)
            .map(|u| u.to_string())
            .map_err(|e| AuditError::InvalidUrl(format!("{} (from '{}')", e, path)))
    }
}

/// Keyword for a content item: its first explicit keyword, else its title up to
/// the first `|`, else `fallback`.
pub fn resolve_focus_keyword(item: &ContentItem, fallback: &str) -> String {
    if let Some(first) = item.keywords.as_ref().and_then(|k| k.first()) {
        let first = first.trim();
        if !first.is_empty() {
            return first.to_string();
        }
    }

    let from_title = item.title.split('|').next().unwrap_or_default().trim();
    if !from_title.is_empty() {
        return from_title.to_string();
    }

    fallback.to_string()
}
