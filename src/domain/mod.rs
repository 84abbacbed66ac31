pub mod models;

pub use models::{
    AuditBatchResult, AuditTarget, BatchSummary, CheckResult, CheckStatus, PageAuditReport,
    PageSignals, ReportMeta, TargetType,
};
