use serde::Serialize;

use crate::parser::sections::Category;
use crate::parser::ParsedDocument;

/// A question from the review table flagged for rewrite or discard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditIssue {
    pub status: String,
    pub question: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorLists {
    pub editorial: Vec<String>,
    pub factual: Vec<String>,
    pub pedagogical: Vec<String>,
}

impl ErrorLists {
    pub fn get(&self, category: Category) -> &[String] {
        match category {
            Category::Editorial => &self.editorial,
            Category::Factual => &self.factual,
            Category::Pedagogical => &self.pedagogical,
        }
    }

    pub fn get_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Editorial => &mut self.editorial,
            Category::Factual => &mut self.factual,
            Category::Pedagogical => &mut self.pedagogical,
        }
    }

    pub fn total(&self) -> usize {
        self.editorial.len() + self.factual.len() + self.pedagogical.len()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub editorial: usize,
    pub factual: usize,
    pub pedagogical: usize,
}

impl From<&ErrorLists> for Stats {
    fn from(errors: &ErrorLists) -> Self {
        Stats {
            total: errors.total(),
            editorial: errors.editorial.len(),
            factual: errors.factual.len(),
            pedagogical: errors.pedagogical.len(),
        }
    }
}

/// One parsed audit report, as written to `errata_data.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditRecord {
    pub id: String,
    pub class: String,
    pub subject: String,
    pub image: String,
    pub page: String,
    pub stats: Stats,
    pub errors: ErrorLists,
    pub audit_issues: Vec<AuditIssue>,
}

impl AuditRecord {
    pub fn build(class: &str, subject: &str, filename: &str, parsed: ParsedDocument, page: String) -> Self {
        let stats = Stats::from(&parsed.errors);
        AuditRecord {
            id: format!("{}_{}_{}", class, subject, filename),
            class: class.to_string(),
            subject: subject.to_string(),
            image: filename.to_string(),
            page,
            stats,
            errors: parsed.errors,
            audit_issues: parsed.audit_issues,
        }
    }

    pub fn has_findings(&self) -> bool {
        self.stats.total > 0 || !self.audit_issues.is_empty()
    }

    /// Source image name: the report filename without its `.md` extension.
    pub fn image_name(&self) -> &str {
        self.image.strip_suffix(".md").unwrap_or(&self.image)
    }
}

/// Gallery entry in `data.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedImage {
    pub id: String,
    pub file_name: String,
    pub page_number: String,
    pub errors: ErrorLists,
    pub total_errors: usize,
}

impl From<&AuditRecord> for RankedImage {
    fn from(record: &AuditRecord) -> Self {
        let name = record.image_name().to_string();
        RankedImage {
            id: name.clone(),
            file_name: name,
            page_number: record.page.clone(),
            errors: record.errors.clone(),
            total_errors: record.stats.total,
        }
    }
}
