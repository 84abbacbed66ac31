//! Content audit engine.
//!
//! Enumerates published pages, fetches their rendered HTML, extracts SEO
//! signals and scores each page with a fixed rule battery. Results come back
//! as an [`AuditBatchResult`] ordered worst page first.

pub mod config;
pub mod domain;
pub mod error;
pub mod extractor;
pub mod lifecycle;
pub mod service;
pub mod test_utils;

pub use config::{AuditConfig, StaticTarget};
pub use domain::models::{
    AuditBatchResult, AuditTarget, BatchSummary, CheckResult, CheckStatus, PageAuditReport,
    PageSignals, ReportMeta, TargetType,
};
pub use error::{AuditError, Result};
pub use service::{AuditOrchestrator, ContentSource, HttpFetcher, PageFetcher};
