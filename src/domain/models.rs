//! Audit domain entities - targets in, reports out

use serde::{Deserialize, Serialize};

// ====== Enums ======

/// Kind of published content a target represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    #[default]
    Page,
    Product,
    Article,
    Category,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::Page => "page",
            TargetType::Product => "product",
            TargetType::Article => "article",
            TargetType::Category => "category",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Warning,
    Fail,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Pass => "pass",
            CheckStatus::Warning => "warning",
            CheckStatus::Fail => "fail",
        }
    }
}

// ====== Inputs ======

/// One page to audit. `url` + `target_type` form the natural key; duplicates
/// are kept as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AuditTarget {
    pub url: String,
    #[serde(rename = "type")]
    pub target_type: TargetType,
    pub focus_keyword: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
}

impl AuditTarget {
    pub fn new(
        url: impl Into<String>,
        target_type: TargetType,
        focus_keyword: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            target_type,
            focus_keyword: focus_keyword.into(),
            source_id: None,
        }
    }

    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }
}

/// Normalized signals extracted from one fetched page.
///
/// Missing markup resolves to empty strings and zero counts; the check
/// pipeline scores those as failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PageSignals {
    pub title: String,
    pub meta_description: String,
    pub h1: String,
    pub canonical_url: String,
    pub body_text: String,
    pub word_count: usize,
    pub og_title: String,
    pub og_image: String,
    pub has_structured_data: bool,
    pub missing_alt_image_count: usize,
    pub internal_link_count: usize,
    pub external_link_count: usize,
    pub readability_score: u8,
}

// ====== Outputs ======

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CheckResult {
    pub id: String,
    pub label: String,
    pub status: CheckStatus,
    pub message: String,
}

impl CheckResult {
    pub fn passed(&self) -> bool {
        self.status == CheckStatus::Pass
    }
}

/// Summary metadata shown next to a page's score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ReportMeta {
    pub title: String,
    pub description: String,
    pub h1: String,
    pub word_count: usize,
    pub canonical_url: String,
    pub readability_score: u8,
    pub internal_link_count: usize,
    pub external_link_count: usize,
}

impl From<&PageSignals> for ReportMeta {
    fn from(signals: &PageSignals) -> Self {
        Self {
            title: signals.title.clone(),
            description: signals.meta_description.clone(),
            h1: signals.h1.clone(),
            word_count: signals.word_count,
            canonical_url: signals.canonical_url.clone(),
            readability_score: signals.readability_score,
            internal_link_count: signals.internal_link_count,
            external_link_count: signals.external_link_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PageAuditReport {
    pub url: String,
    #[serde(rename = "type")]
    pub target_type: TargetType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub focus_keyword: String,
    /// Always within 0..=100.
    pub score: u8,
    pub checks: Vec<CheckResult>,
    pub meta: ReportMeta,
}

impl PageAuditReport {
    /// Points lost against a perfect page.
    pub fn deduction(&self) -> u8 {
        100 - self.score
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.checks
            .iter()
            .filter(|c| c.status == CheckStatus::Fail)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &CheckResult> {
        self.checks
            .iter()
            .filter(|c| c.status == CheckStatus::Warning)
    }
}

/// Headline numbers for one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BatchSummary {
    pub pages: usize,
    pub average_score: f64,
    pub failing_checks: usize,
    pub warning_checks: usize,
    pub passing_checks: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worst_url: Option<String>,
}

/// Reports for one engine run, most urgent (lowest score) first.
/// Unreachable targets are absent rather than scored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditBatchResult {
    reports: Vec<PageAuditReport>,
}

impl AuditBatchResult {
    /// Builds a batch, ordering reports ascending by score. The sort is stable
    /// so equal scores keep their input order.
    pub fn from_reports(mut reports: Vec<PageAuditReport>) -> Self {
        reports.sort_by_key(|r| r.score);
        Self { reports }
    }

    pub fn reports(&self) -> &[PageAuditReport] {
        &self.reports
    }

    pub fn into_reports(self) -> Vec<PageAuditReport> {
        self.reports
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PageAuditReport> {
        self.reports.iter()
    }

    pub fn scores(&self) -> Vec<u8> {
        self.reports.iter().map(|r| r.score).collect()
    }

    pub fn summary(&self) -> BatchSummary {
        let pages = self.reports.len();
        let average_score = if pages == 0 {
            0.0
        } else {
            let total: f64 = self.reports.iter().map(|r| r.score as f64).sum();
            ((total / pages as f64) * 10.0).round() / 10.0
        };

        let mut failing_checks = 0;
        let mut warning_checks = 0;
        let mut passing_checks = 0;
        for check in self.reports.iter().flat_map(|r| r.checks.iter()) {
            match check.status {
                CheckStatus::Fail => failing_checks += 1,
                CheckStatus::Warning => warning_checks += 1,
                CheckStatus::Pass => passing_checks += 1,
            }
        }

        BatchSummary {
            pages,
            average_score,
            failing_checks,
            warning_checks,
            passing_checks,
            worst_url: self.reports.first().map(|r| r.url.clone()),
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl IntoIterator for AuditBatchResult {
    type Item = PageAuditReport;
    type IntoIter = std::vec::IntoIter<PageAuditReport>;

    fn into_iter(self) -> Self::IntoIter {
        self.reports.into_iter()
    }
}

impl<'a> IntoIterator for &'a AuditBatchResult {
    type Item = &'a PageAuditReport;
    type IntoIter = std::slice::Iter<'a, PageAuditReport>;

    fn into_iter(self) -> Self::IntoIter {
        self.reports.iter()
    }
}
