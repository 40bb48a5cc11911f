use std::path::Path;

use anyhow::Result;

use crate::parser::page::PageEvidence;
use crate::scan::{list_markdown, read_report, source_dir, Grid};

/// A report whose filename page and content page disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub dir: String,
    pub file: String,
    pub filename_page: u64,
    pub content_page: u64,
}

impl Mismatch {
    pub fn diff(&self) -> i128 {
        i128::from(self.filename_page) - i128::from(self.content_page)
    }
}

/// Compare filename and content page numbers for every report in the grid.
/// Files lacking either signal are skipped.
pub fn find_mismatches(root: &Path, grid: &Grid) -> Result<Vec<Mismatch>> {
    let mut found = Vec::new();

    for (class, subject) in grid.combinations() {
        let dir = source_dir(root, class, subject);
        let Some(names) = list_markdown(&dir)? else {
            continue;
        };

        for name in names {
            let path = dir.join(&name);
            let text = read_report(&path)?;
            let evidence = PageEvidence::collect(&name, &text);
            if !evidence.is_mismatch() {
                continue;
            }
            if let Some((filename_page, content_page)) = evidence.numeric() {
                found.push(Mismatch {
                    dir: format!("{}{}", class, subject),
                    file: name,
                    filename_page,
                    content_page,
                });
            }
        }
    }

    Ok(found)
}
