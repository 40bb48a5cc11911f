pub mod audit;
pub mod lists;
pub mod page;
pub mod sections;

use crate::record::{AuditIssue, ErrorLists};

/// Everything extracted from one audit report, minus file metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    pub errors: ErrorLists,
    pub audit_issues: Vec<AuditIssue>,
}

/// Two-part pipeline: category sections → bullet lists, then the audit table scan.
pub fn parse_document(text: &str) -> ParsedDocument {
    let mut errors = ErrorLists::default();
    for (category, body) in sections::extract_sections(text) {
        *errors.get_mut(category) = lists::bullet_items(body);
    }

    ParsedDocument {
        errors,
        audit_issues: audit::parse_audit_issues(text),
    }
}

// ── Tests ──
