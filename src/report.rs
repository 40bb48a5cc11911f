use std::fmt::Write as _;

use crate::parser::sections::Category;
use crate::record::{AuditIssue, AuditRecord};
use crate::scan::CombinationScan;

const TITLE: &str = "Deep Audit Report - Errata Of Smart Education";

/// Longest excerpt of an error shown in the "key errors" column.
const EXCERPT_CHARS: usize = 100;
const HTML_EXCERPT_CHARS: usize = 150;

/// Render the Markdown report. Only existing directories get a table.
pub fn render_markdown(scans: &[CombinationScan], generated_at: &str) -> String {
    let mut md = format!("# {}\n\n> Generated on: {}\n\n", TITLE, generated_at);

    for (class, group) in by_class(scans) {
        let _ = writeln!(md, "## {}", class);
        for scan in group {
            let Some(records) = scan.records.as_deref() else {
                continue;
            };
            let _ = writeln!(md, "### {}\n", scan.subject);
            md.push_str("| Image / Page | Error Stats | Critical Issues (Rewrite/Discard) | Key Identified Errors |\n");
            md.push_str("|---|---|---|---|\n");
            for r in records {
                let _ = writeln!(
                    md,
                    "| {} | {} | {} | {} |",
                    md_cell(&format!("**{}**<br>Page: {}", r.image_name(), r.page)),
                    md_stats(r),
                    md_cell(&md_issues(&r.audit_issues)),
                    md_cell(&md_key_errors(r)),
                );
            }
            md.push('\n');
        }
    }

    md
}

/// Render the standalone HTML report.
pub fn render_html(scans: &[CombinationScan], generated_at: &str) -> String {
    let mut body = String::new();

    for (class, group) in by_class(scans) {
        let _ = write!(body, "<h2>{}</h2>", escape_html(class));
        for scan in group {
            let Some(records) = scan.records.as_deref() else {
                continue;
            };
            let _ = write!(body, "<h3>{}</h3>", escape_html(&scan.subject));
            body.push_str(concat!(
                "\n<table>\n<thead>\n<tr>",
                "<th style=\"width: 15%\">Image / Page</th>",
                "<th style=\"width: 15%\">Stats</th>",
                "<th style=\"width: 25%\">Critical Issues</th>",
                "<th style=\"width: 45%\">Key Identified Errors</th>",
                "</tr>\n</thead>\n<tbody>",
            ));
            for r in records {
                let _ = write!(
                    body,
                    concat!(
                        "\n<tr>\n<td><strong>{image}</strong><br><span class=\"page-num\">Page {page}</span></td>\n",
                        "<td><div class=\"stats-block\">Total: <strong>{total}</strong></div>",
                        "<div class=\"stats-block\">Ed: {ed}</div>",
                        "<div class=\"stats-block\">Fac: {fac}</div>",
                        "<div class=\"stats-block\">Ped: {ped}</div></td>\n",
                        "<td>{issues}</td>\n<td>{errors}</td>\n</tr>",
                    ),
                    image = escape_html(r.image_name()),
                    page = escape_html(&r.page),
                    total = r.stats.total,
                    ed = r.stats.editorial,
                    fac = r.stats.factual,
                    ped = r.stats.pedagogical,
                    issues = html_issues(&r.audit_issues),
                    errors = html_key_errors(r),
                );
            }
            body.push_str("</tbody></table>\n");
        }
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
{style}
    </style>
</head>
<body>
    <div class="container">
        <h1>Deep Audit Report</h1>
        <p style="color: #666;">Generated on: {generated_at}</p>
{body}
    </div>
</body>
</html>
"#,
        title = TITLE,
        style = STYLE,
        generated_at = escape_html(generated_at),
        body = body,
    )
}

/// Group consecutive combinations by class, keeping grid order.
fn by_class(scans: &[CombinationScan]) -> Vec<(&str, Vec<&CombinationScan>)> {
    let mut groups: Vec<(&str, Vec<&CombinationScan>)> = Vec::new();
    for scan in scans {
        if let Some((class, group)) = groups.last_mut() {
            if *class == scan.class {
                group.push(scan);
                continue;
            }
        }
        groups.push((scan.class.as_str(), vec![scan]));
    }
    groups
}

/// CSS class for a status badge.
pub fn badge_class(status: &str) -> &'static str {
    let lower = status.to_lowercase();
    if lower.contains("discard") {
        "badge-discard"
    } else if lower.contains("rewrite") {
        "badge-rewrite"
    } else {
        "badge-retain"
    }
}

fn md_stats(r: &AuditRecord) -> String {
    format!(
        "Total: {}<br>Ed: {}, Fac: {}, Ped: {}",
        r.stats.total, r.stats.editorial, r.stats.factual, r.stats.pedagogical
    )
}

fn md_issues(issues: &[AuditIssue]) -> String {
    if issues.is_empty() {
        return "None".to_string();
    }
    let items: String = issues
        .iter()
        .map(|i| format!("<li>[{}] {}: {}</li>", i.status, i.question, i.reason))
        .collect();
    format!("<ul>{}</ul>", items)
}

fn md_key_errors(r: &AuditRecord) -> String {
    let mut out = String::from("<ul>");
    for (label, category) in [
        ("Factual", Category::Factual),
        ("Pedagogy", Category::Pedagogical),
        ("Editorial", Category::Editorial),
    ] {
        if let Some(first) = r.errors.get(category).first() {
            let _ = write!(out, "<li><b>{}:</b> {}</li>", label, truncate(first, EXCERPT_CHARS));
        }
    }
    out.push_str("</ul>");
    out
}

fn html_issues(issues: &[AuditIssue]) -> String {
    if issues.is_empty() {
        return "None".to_string();
    }
    let items: String = issues
        .iter()
        .map(|i| {
            format!(
                "<li><span class=\"badge {}\">{}</span> {}: {}</li>",
                badge_class(&i.status),
                escape_html(&i.status),
                escape_html(&i.question),
                escape_html(&i.reason)
            )
        })
        .collect();
    format!("<ul>{}</ul>", items)
}

fn html_key_errors(r: &AuditRecord) -> String {
    let mut out = String::from("<ul>");
    if let Some(first) = r.errors.factual.first() {
        let _ = write!(
            out,
            "<li><strong style=\"color:#e74c3c\">Factual:</strong> {}</li>",
            escape_html(&truncate(first, HTML_EXCERPT_CHARS))
        );
    }
    if let Some(first) = r.errors.pedagogical.first() {
        let _ = write!(
            out,
            "<li><strong style=\"color:#f39c12\">Pedagogical:</strong> {}</li>",
            escape_html(&truncate(first, HTML_EXCERPT_CHARS))
        );
    }
    if let Some(first) = r.errors.editorial.first() {
        let _ = write!(
            out,
            "<li><strong>Editorial:</strong> {}</li>",
            escape_html(&truncate(first, EXCERPT_CHARS))
        );
    }
    out.push_str("</ul>");
    out
}

/// Keep a table cell on one line and stop `|` from splitting it.
fn md_cell(s: &str) -> String {
    s.replace('|', "\\|").replace(['\r', '\n'], " ")
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

const STYLE: &str = "        body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; line-height: 1.6; color: #333; background: #f4f6f8; margin: 0; padding: 20px; }
        .container { max-width: 1200px; margin: 0 auto; background: white; padding: 40px; border-radius: 12px; box-shadow: 0 4px 6px rgba(0,0,0,0.05); }
        h1 { color: #2c3e50; border-bottom: 2px solid #eee; padding-bottom: 15px; }
        h2 { color: #34495e; margin-top: 30px; background: #eef2f7; padding: 10px; border-radius: 6px; }
        h3 { color: #16a085; margin-top: 25px; border-bottom: 1px solid #eee; padding-bottom: 5px; }
        table { width: 100%; border-collapse: collapse; margin-top: 15px; font-size: 0.95rem; }
        th, td { padding: 12px 15px; border: 1px solid #ddd; text-align: left; vertical-align: top; }
        th { background: #f8f9fa; font-weight: 600; color: #555; }
        tr:nth-child(even) { background: #fcfcfc; }
        tr:hover { background: #f1f1f1; }
        .badge { display: inline-block; padding: 3px 8px; border-radius: 12px; font-size: 0.8rem; font-weight: bold; margin-bottom: 5px; }
        .badge-rewrite { background: #fff3cd; color: #856404; }
        .badge-discard { background: #f8d7da; color: #721c24; }
        .badge-retain { background: #d4edda; color: #155724; }
        .stats-block { font-size: 0.85rem; color: #666; }
        .page-num { display: inline-block; background: #e2e8f0; padding: 2px 6px; border-radius: 4px; font-size: 0.8rem; margin-top: 5px; }
        ul { margin: 0; padding-left: 20px; }
        li { margin-bottom: 5px; }";

// ── Tests ──
