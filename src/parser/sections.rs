use std::sync::LazyLock;

use regex::Regex;

// Bold markers may wrap the numeral or only the title, and the colon may sit
// on either side of the closing marker: `**(i) Editorial Errors:**`, `(i) **Editorial Errors**:`.
static EDITORIAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\*\*)?[ \t]*\(i\)[ \t]*(?:\*\*)?[ \t]*Editorial Errors[ \t]*(?:\*\*)?[ \t]*:?(?:\*\*)?").unwrap()
});
static FACTUAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\*\*)?[ \t]*\(ii\)[ \t]*(?:\*\*)?[ \t]*Factual Errors[ \t]*(?:\*\*)?[ \t]*:?(?:\*\*)?").unwrap()
});
static PEDAGOGICAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:\*\*)?[ \t]*\(iii\)[ \t]*(?:\*\*)?[ \t]*Pedagogical & Conceptual Flaws[ \t]*(?:\*\*)?[ \t]*:?(?:\*\*)?",
    )
    .unwrap()
});
/// Start of the next top-level section ("### **3. ...").
static SECTION_THREE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n###\s*\*\*3\.").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Editorial,
    Factual,
    Pedagogical,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Editorial, Category::Factual, Category::Pedagogical];

    fn header_re(self) -> &'static Regex {
        match self {
            Category::Editorial => &EDITORIAL_RE,
            Category::Factual => &FACTUAL_RE,
            Category::Pedagogical => &PEDAGOGICAL_RE,
        }
    }
}

/// Where a category header sits in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionMatch {
    pub category: Category,
    pub start: usize,
    pub len: usize,
}

impl SectionMatch {
    fn body_start(&self) -> usize {
        self.start + self.len
    }
}

/// First match of every category header present in `text`.
pub fn locate_headers(text: &str) -> Vec<SectionMatch> {
    Category::ALL
        .iter()
        .filter_map(|&category| {
            category.header_re().find(text).map(|m| SectionMatch {
                category,
                start: m.start(),
                len: m.len(),
            })
        })
        .collect()
}

/// Slice the body of each located header.
///
/// A body ends at the nearest other header that starts after this one, the
/// "section 3" boundary, or the end of the text, whichever comes first.
/// Headers may appear in any order; categories without a header are absent.
pub fn extract_sections(text: &str) -> Vec<(Category, &str)> {
    let headers = locate_headers(text);

    headers
        .iter()
        .map(|current| {
            let start = current.body_start();

            let mut end = headers
                .iter()
                .filter(|other| other.category != current.category && other.start > current.start)
                .map(|other| other.start)
                .min()
                .unwrap_or(text.len());

            if let Some(m) = SECTION_THREE_RE.find(&text[start..]) {
                end = end.min(start + m.start());
            }

            // A later header can overlap the end of this header's own match.
            let end = end.max(start);
            (current.category, &text[start..end])
        })
        .collect()
}

// ── Tests ──
