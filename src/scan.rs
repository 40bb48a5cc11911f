use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;
use tracing::{debug, info, warn};

use crate::parser::{self, page};
use crate::record::AuditRecord;

static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

const ANALYSIS_DIR: &str = "Phase_1a_Analysis";

pub const DEFAULT_CLASSES: &[&str] = &["Class6", "Class7", "Class8"];
pub const DEFAULT_SUBJECTS: &[&str] = &["Algebra", "Sets"];

/// The class × subject combinations to scan, classes outer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub classes: Vec<String>,
    pub subjects: Vec<String>,
}

impl Default for Grid {
    fn default() -> Self {
        Grid {
            classes: DEFAULT_CLASSES.iter().map(|s| s.to_string()).collect(),
            subjects: DEFAULT_SUBJECTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Grid {
    pub fn combinations(&self) -> impl Iterator<Item = (&str, &str)> {
        self.classes
            .iter()
            .flat_map(move |c| self.subjects.iter().map(move |s| (c.as_str(), s.as_str())))
    }
}

/// Records for one class/subject pair. `records` is `None` when the directory is missing.
#[derive(Debug, Clone)]
pub struct CombinationScan {
    pub class: String,
    pub subject: String,
    pub records: Option<Vec<AuditRecord>>,
}

impl CombinationScan {
    pub fn records(&self) -> &[AuditRecord] {
        self.records.as_deref().unwrap_or(&[])
    }
}

pub fn source_dir(root: &Path, class: &str, subject: &str) -> PathBuf {
    root.join(format!("{}{}", class, subject)).join(ANALYSIS_DIR)
}

/// Numeric sort key: the last digit run in the name, 0 if there is none.
fn numeric_key(name: &str) -> u64 {
    DIGITS_RE
        .find_iter(name)
        .last()
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// List `*.md` files in `dir`, sorted numerically. `None` if the directory does not exist.
pub fn list_markdown(dir: &Path) -> Result<Option<Vec<String>>> {
    if !dir.is_dir() {
        warn!("Directory not found: {}", dir.display());
        return Ok(None);
    }

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))? {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(".md") && entry.path().is_file() {
            names.push(name);
        }
    }

    names.sort_by(|a, b| numeric_key(a).cmp(&numeric_key(b)).then_with(|| a.cmp(b)));
    Ok(Some(names))
}

/// Read a report as text. Invalid UTF-8 is replaced with U+FFFD; I/O failures are errors.
pub fn read_report(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Read and parse one report. Read failures abort the run.
pub fn scan_file(class: &str, subject: &str, dir: &Path, name: &str) -> Result<AuditRecord> {
    let path = dir.join(name);
    let text = read_report(&path)?;

    let parsed = parser::parse_document(&text);
    let page = page::resolve_page(name, &text);
    let record = AuditRecord::build(class, subject, name, parsed, page);
    debug!(
        file = name,
        page = %record.page,
        total = record.stats.total,
        audit = record.audit_issues.len(),
        "parsed"
    );
    Ok(record)
}

/// Parse every report in one combination, keeping only those with findings.
pub fn scan_combination(root: &Path, class: &str, subject: &str) -> Result<CombinationScan> {
    let dir = source_dir(root, class, subject);
    let records = match list_markdown(&dir)? {
        None => None,
        Some(names) => {
            info!("Scanning {}{} ({} files)", class, subject, names.len());
            let pb = progress_bar(names.len())?;
            let mut kept = Vec::new();
            for name in &names {
                let record = scan_file(class, subject, &dir, name)?;
                if record.has_findings() {
                    kept.push(record);
                }
                pb.inc(1);
            }
            pb.finish_and_clear();
            Some(kept)
        }
    };

    Ok(CombinationScan {
        class: class.to_string(),
        subject: subject.to_string(),
        records,
    })
}

pub fn scan_grid(root: &Path, grid: &Grid) -> Result<Vec<CombinationScan>> {
    grid.combinations()
        .map(|(class, subject)| scan_combination(root, class, subject))
        .collect()
}

/// Highest error totals first; ties keep file order.
pub fn rank_top(records: &[AuditRecord], n: usize) -> Vec<&AuditRecord> {
    let mut ranked: Vec<&AuditRecord> = records.iter().collect();
    ranked.sort_by(|a, b| b.stats.total.cmp(&a.stats.total));
    ranked.truncate(n);
    ranked
}

fn progress_bar(len: usize) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, class: &str, subject: &str, name: &str, body: &str) {
        let dir = source_dir(root, class, subject);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(name), body).unwrap();
    }

    fn errors(n: usize) -> String {
        let mut s = String::from("(i) Editorial Errors:\n");
        for i in 0..n {
            s.push_str(&format!("* e{i}\n"));
        }
        s
    }

    #[test]
    fn numeric_order() {
        let tmp = TempDir::new().unwrap();
        for name in ["Class6_Algebra_100.png.md", "Class6_Algebra_93.png.md", "Class6_Algebra_7.png.md", "notes.md", "img.png"] {
            write(tmp.path(), "Class6", "Algebra", name, "");
        }
        let names = list_markdown(&source_dir(tmp.path(), "Class6", "Algebra")).unwrap().unwrap();
        assert_eq!(
            names,
            vec!["notes.md", "Class6_Algebra_7.png.md", "Class6_Algebra_93.png.md", "Class6_Algebra_100.png.md"]
        );
    }

    #[test]
    fn missing_directory_is_empty() {
        let tmp = TempDir::new().unwrap();
        let scan = scan_combination(tmp.path(), "Class8", "Sets").unwrap();
        assert!(scan.records.is_none());
        assert!(scan.records().is_empty());
    }

    #[test]
    fn records_without_findings_dropped() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "Class6", "Sets", "Class6_Sets_1.png.md", "nothing to report");
        write(tmp.path(), "Class6", "Sets", "Class6_Sets_2.png.md", &errors(1));
        write(
            tmp.path(),
            "Class6",
            "Sets",
            "Class6_Sets_3.png.md",
            "### 4. Question Quality Audit Report\n| Q1 | Discard | off topic |\n",
        );
        let scan = scan_combination(tmp.path(), "Class6", "Sets").unwrap();
        let images: Vec<_> = scan.records().iter().map(|r| r.image.as_str()).collect();
        assert_eq!(images, vec!["Class6_Sets_2.png.md", "Class6_Sets_3.png.md"]);
    }

    #[test]
    fn end_to_end_editorial_record() {
        let tmp = TempDir::new().unwrap();
        let body = std::fs::read_to_string("tests/fixtures/Class6_Algebra_93.png.md").unwrap();
        write(tmp.path(), "Class6", "Algebra", "Class6_Algebra_93.png.md", &body);

        let scans = scan_grid(tmp.path(), &Grid::default()).unwrap();
        assert_eq!(scans.len(), 6);
        let algebra = &scans[0];
        assert_eq!((algebra.class.as_str(), algebra.subject.as_str()), ("Class6", "Algebra"));

        let r = &algebra.records()[0];
        assert_eq!(r.stats.editorial, 2);
        assert_eq!(r.stats.total, 2);
        assert_eq!(r.page, "93");
        assert!(scans[1..].iter().all(|s| s.records.is_none()));
    }

    #[test]
    fn invalid_utf8_is_parsed_lossily() {
        let tmp = TempDir::new().unwrap();
        let dir = source_dir(tmp.path(), "Class6", "Sets");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("Class6_Sets_1.png.md"), errors(1)).unwrap();
        std::fs::write(dir.join("Class6_Sets_2.png.md"), b"(i) Editorial Errors:\n* caf\xe9\n").unwrap();

        let scan = scan_combination(tmp.path(), "Class6", "Sets").unwrap();
        let records = scan.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].errors.editorial, vec!["caf\u{FFFD}"]);
        assert_eq!(records[1].page, "2");
    }

    #[test]
    fn unreadable_file_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let dir = source_dir(tmp.path(), "Class7", "Algebra");
        // A directory with a report name cannot be read as a file.
        std::fs::create_dir_all(dir.join("x.md")).unwrap();
        let err = scan_file("Class7", "Algebra", &dir, "x.md").unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn numeric_key_ascii_only() {
        assert_eq!(numeric_key("Class6_Algebra_93.png.md"), 93);
        assert_eq!(numeric_key("page_\u{663}\u{664}.md"), 0);
        assert_eq!(numeric_key("page_7_\u{663}.md"), 7);
    }

    #[test]
    fn rank_top_orders_and_truncates() {
        let tmp = TempDir::new().unwrap();
        for (i, n) in [1, 4, 2, 4, 3, 5, 1].iter().enumerate() {
            write(tmp.path(), "Class7", "Sets", &format!("Class7_Sets_{}.png.md", i + 1), &errors(*n));
        }
        let scan = scan_combination(tmp.path(), "Class7", "Sets").unwrap();
        let top = rank_top(scan.records(), 5);
        let totals: Vec<_> = top.iter().map(|r| r.stats.total).collect();
        assert_eq!(totals, vec![5, 4, 4, 3, 2]);
        // Stable: the earlier of the two 4s comes first.
        assert_eq!(top[1].image, "Class7_Sets_2.png.md");
        assert_eq!(top[2].image, "Class7_Sets_4.png.md");
    }

    #[test]
    fn custom_grid_order() {
        let grid = Grid {
            classes: vec!["A".into(), "B".into()],
            subjects: vec!["x".into(), "y".into()],
        };
        let combos: Vec<_> = grid.combinations().collect();
        assert_eq!(combos, vec![("A", "x"), ("A", "y"), ("B", "x"), ("B", "y")]);
    }
}
