//! Check pipeline: scores one page's signals against its focus keyword.
//!
//! Every rule in [`RULES`] contributes exactly one `CheckResult`, in table
//! order. The score starts at 100 and only loses points; it is a pure
//! function of `(signals, focus_keyword)`.

mod rules;

pub use rules::{contains_keyword, Outcome, Rule, RULES};

use crate::domain::models::{AuditTarget, CheckResult, PageAuditReport, PageSignals, ReportMeta};

pub const MAX_SCORE: u8 = 100;

/// Score and ordered check list for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub score: u8,
    pub checks: Vec<CheckResult>,
}

pub fn run_checks(signals: &PageSignals, focus_keyword: &str) -> CheckOutcome {
    let mut deductions: u32 = 0;
    let checks = RULES
        .iter()
        .map(|rule| {
            let outcome = (rule.evaluate)(signals, focus_keyword);
            deductions += outcome.deduction as u32;
            CheckResult {
                id: rule.id.to_string(),
                label: rule.label.to_string(),
                status: outcome.status,
                message: outcome.message,
            }
        })
        .collect();

    let score = (MAX_SCORE as u32).saturating_sub(deductions) as u8;
    CheckOutcome { score, checks }
}

/// Build the full report for a target whose page was fetched and extracted.
pub fn audit_page(target: &AuditTarget, signals: &PageSignals) -> PageAuditReport {
    let CheckOutcome { score, checks } = run_checks(signals, &target.focus_keyword);

    PageAuditReport {
        url: target.url.clone(),
        target_type: target.target_type,
        id: target.source_id.clone(),
        focus_keyword: target.focus_keyword.clone(),
        score,
        checks,
        meta: ReportMeta::from(signals),
    }
}
