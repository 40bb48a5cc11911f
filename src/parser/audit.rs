use crate::record::AuditIssue;

/// Heading text that opens the question review table.
pub const AUDIT_SECTION_MARKER: &str = "Question Quality Audit Report";

/// Prefix of the heading that closes it.
const NEXT_SECTION_PREFIX: &str = "###";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    Outside,
    InsideAuditSection,
}

/// Line-at-a-time scanner over the audit report table.
#[derive(Debug, Default)]
pub struct AuditScanner {
    state: ScanState,
}

impl AuditScanner {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Advance over one line, returning an issue if the line is a flagged row.
    pub fn feed(&mut self, line: &str) -> Option<AuditIssue> {
        if line.contains(AUDIT_SECTION_MARKER) {
            self.state = ScanState::InsideAuditSection;
            return None;
        }

        match self.state {
            ScanState::Outside => None,
            ScanState::InsideAuditSection if line.starts_with(NEXT_SECTION_PREFIX) => {
                self.state = ScanState::Outside;
                None
            }
            ScanState::InsideAuditSection => {
                if line.trim().starts_with('|') {
                    parse_row(line)
                } else {
                    None
                }
            }
        }
    }
}

/// Parse one markdown table row. Only rows whose status cell says rewrite or
/// discard become issues; headers, separators and retained rows are dropped.
pub fn parse_row(line: &str) -> Option<AuditIssue> {
    let cells: Vec<&str> = line
        .split('|')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect();
    if cells.len() < 3 {
        return None;
    }

    let status = cells[1].to_lowercase();
    if !(status.contains("rewrite") || status.contains("discard")) {
        return None;
    }

    Some(AuditIssue {
        status: cells[1].to_string(),
        question: cells[0].to_string(),
        reason: cells[2].to_string(),
    })
}

pub fn parse_audit_issues(text: &str) -> Vec<AuditIssue> {
    let mut scanner = AuditScanner::new();
    text.lines().filter_map(|line| scanner.feed(line)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
### **4. Question Quality Audit Report**

| Question | Status | Reason |
|---|---|---|
| Q1 | Rewrite | bad wording |
| Q2 | Retain | fine |
| Q3 | **DISCARD** | out of syllabus |
";

    #[test]
    fn flagged_rows_only() {
        let issues = parse_audit_issues(TABLE);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].question, "Q1");
        assert_eq!(issues[0].status, "Rewrite");
        assert_eq!(issues[0].reason, "bad wording");
        assert_eq!(issues[1].status, "**DISCARD**");
    }

    #[test]
    fn status_case_preserved() {
        let issue = parse_row("| Q7 | rEwRiTe needed | vague |").unwrap();
        assert_eq!(issue.status, "rEwRiTe needed");
    }

    #[test]
    fn short_rows_dropped() {
        assert!(parse_row("| Q1 | Rewrite |").is_none());
        assert!(parse_row("| Q1 | | Rewrite |").is_none());
    }

    #[test]
    fn rows_outside_section_ignored() {
        let md = "| Q0 | Rewrite | before the section |\n".to_string() + TABLE;
        let issues = parse_audit_issues(&md);
        assert!(issues.iter().all(|i| i.question != "Q0"));
    }

    #[test]
    fn next_heading_closes_section() {
        let md = format!("{TABLE}### **5. Summary**\n| Q9 | Rewrite | after the section |\n");
        let issues = parse_audit_issues(&md);
        assert!(issues.iter().all(|i| i.question != "Q9"));
    }

    #[test]
    fn heading_prefix_is_literal() {
        let mut scanner = AuditScanner::new();
        scanner.feed("## 4. Question Quality Audit Report");
        assert_eq!(scanner.state(), ScanState::InsideAuditSection);

        // Only an unindented `###` prefix closes the section.
        scanner.feed("  ### indented");
        assert_eq!(scanner.state(), ScanState::InsideAuditSection);
        scanner.feed("#### nested");
        assert_eq!(scanner.state(), ScanState::Outside);
    }

    #[test]
    fn marker_line_opens() {
        let mut scanner = AuditScanner::new();
        assert_eq!(scanner.state(), ScanState::Outside);
        assert!(scanner.feed("| Q | Rewrite | r |").is_none());
        scanner.feed("Question Quality Audit Report");
        assert!(scanner.feed("| Q | Rewrite | r |").is_some());
    }

    #[test]
    fn no_table() {
        assert!(parse_audit_issues("### **4. Question Quality Audit Report**\nNo questions.").is_empty());
    }
}
