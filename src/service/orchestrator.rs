//! Audit orchestration: enumerate -> fetch -> extract -> check -> sort.

use futures::stream::{self, StreamExt};
use std::sync::Arc;

use crate::config::AuditConfig;
use crate::domain::models::{AuditBatchResult, AuditTarget, PageAuditReport};
use crate::error::Result;
use crate::extractor::page_extractor::PageExtractor;
use crate::service::auditor::audit_page;
use crate::service::content_source::ContentSource;
use crate::service::fetcher::{HttpFetcher, PageFetcher};
use crate::service::targets::TargetEnumerator;

/// Runs one audit batch. Each target is an independent unit; a unit whose
/// fetch fails is dropped without affecting the rest.
pub struct AuditOrchestrator {
    enumerator: TargetEnumerator,
    fetcher: Arc<dyn PageFetcher>,
    site_domain: String,
    max_concurrency: Option<usize>,
}

impl AuditOrchestrator {
    pub fn new(
        config: &AuditConfig,
        source: Arc<dyn ContentSource>,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            enumerator: TargetEnumerator::new(config, source)?,
            fetcher,
            site_domain: config.site_domain(),
            max_concurrency: config.max_concurrency,
        })
    }

    /// Orchestrator backed by the HTTP fetcher built from `config`.
    pub fn with_http(config: &AuditConfig, source: Arc<dyn ContentSource>) -> Result<Self> {
        let fetcher = Arc::new(HttpFetcher::new(config)?);
        Self::new(config, source, fetcher)
    }

    /// Audit every enumerated target. Fails only when target enumeration does.
    pub async fn run(&self) -> Result<AuditBatchResult> {
        let targets = self.enumerator.enumerate().await?;
        Ok(self.run_targets(targets).await)
    }

    /// Audit an explicit target list.
    pub async fn run_targets(&self, targets: Vec<AuditTarget>) -> AuditBatchResult {
        let timer = BatchTimer::start();
        let total = targets.len();
        tracing::info!("[AUDIT] Starting batch of {} targets", total);

        // launch all by default; the optional cap only paces the fan-out.
        // `buffered` yields in input order, so ties never depend on timing.
        let limit = self.max_concurrency.unwrap_or(total).max(1);
        let reports: Vec<PageAuditReport> = stream::iter(targets)
            .map(|target| self.audit_target(target))
            .buffered(limit)
            .filter_map(|report| async move { report })
            .collect()
            .await;

        let audited = reports.len();
        let batch = AuditBatchResult::from_reports(reports);
        tracing::info!(
            "[AUDIT] Batch complete: {} audited, {} unreachable in {}ms",
            audited,
            total - audited,
            timer.elapsed_ms()
        );
        batch
    }

    /// One unit of work. `None` when the page could not be fetched.
    async fn audit_target(&self, target: AuditTarget) -> Option<PageAuditReport> {
        let html = self.fetcher.fetch(&target.url).await;

        // parsing holds non-Send scraper types, keep it after the last await
        let signals = PageExtractor::extract_page(html.as_deref(), &self.site_domain)?;
        let report = audit_page(&target, &signals);
        tracing::debug!(
            "[AUDIT] {} scored {} ({} words)",
            report.url,
            report.score,
            report.meta.word_count
        );
        Some(report)
    }
}

struct BatchTimer {
    start: std::time::Instant,
}

impl BatchTimer {
    fn start() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }

    fn elapsed_ms(&self) -> u128 {
        self.start.elapsed().as_millis()
    }
}
