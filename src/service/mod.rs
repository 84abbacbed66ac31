pub mod auditor;
pub mod content_source;
pub mod fetcher;
pub mod http;
pub mod orchestrator;
pub mod targets;

pub use auditor::{audit_page, run_checks, CheckOutcome};
pub use content_source::{
    ContentCollection, ContentItem, ContentSource, SitemapContentSource, StaticContentSource,
};
pub use fetcher::{CacheBuster, HttpFetcher, PageFetcher};
pub use orchestrator::AuditOrchestrator;
pub use targets::{resolve_focus_keyword, TargetEnumerator};
