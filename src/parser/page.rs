use std::sync::LazyLock;

use regex::Regex;

/// Page value used when neither the filename nor the content carries one.
pub const NOT_AVAILABLE: &str = "N/A";

static FILENAME_PAGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_([0-9]+)\.png\.md$").unwrap());

// "Sub-Domain-6: ALGEBRAIC EXPRESSIONS **93**" or "Sub-Domain-5: SETS 69".
// Digits are ASCII only. The non-digit before the capture keeps "Sub-Domain-6" from matching unless it is the last number.
static SUB_DOMAIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Sub-Domain.*?[^0-9]([0-9]+)(?:\s*\*\*|\s*)?$").unwrap());

/// Page number embedded in a `*_<digits>.png.md` filename.
pub fn page_from_filename(name: &str) -> Option<String> {
    FILENAME_PAGE_RE.captures(name).map(|c| c[1].to_string())
}

/// Page number from the last `Sub-Domain ... <digits>` line of the document.
pub fn page_from_content(text: &str) -> Option<String> {
    text.lines()
        .rev()
        .find_map(|line| SUB_DOMAIN_RE.captures(line.trim()).map(|c| c[1].to_string()))
}

/// Both page signals for one file. They often disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEvidence {
    pub from_filename: Option<String>,
    pub from_content: Option<String>,
}

impl PageEvidence {
    pub fn collect(name: &str, text: &str) -> Self {
        Self {
            from_filename: page_from_filename(name),
            from_content: page_from_content(text),
        }
    }

    /// Filename wins, then content, then `"N/A"`.
    pub fn resolved(&self) -> String {
        self.from_filename
            .as_deref()
            .or(self.from_content.as_deref())
            .unwrap_or(NOT_AVAILABLE)
            .to_string()
    }

    /// Both signals present with different numeric values.
    pub fn is_mismatch(&self) -> bool {
        match self.numeric() {
            Some((filename, content)) => filename != content,
            None => false,
        }
    }

    /// `(filename, content)` as numbers, when both are present.
    pub fn numeric(&self) -> Option<(u64, u64)> {
        let filename = self.from_filename.as_deref()?.parse().ok()?;
        let content = self.from_content.as_deref()?.parse().ok()?;
        Some((filename, content))
    }
}

/// Resolve the canonical page string for a file.
pub fn resolve_page(name: &str, text: &str) -> String {
    PageEvidence::collect(name, text).resolved()
}
