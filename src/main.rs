mod assets;
mod output;
mod parser;
mod record;
mod report;
mod scan;
mod verify;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use scan::{CombinationScan, Grid};

#[derive(Parser)]
#[command(name = "errata_scan", about = "Build errata data and audit reports from page analysis markdown")]
struct Cli {
    /// Folder holding the <Class><Subject>/Phase_1a_Analysis directories
    #[arg(long, global = true, env = "ERRATA_ROOT", default_value = "..")]
    root: PathBuf,
    /// Class labels to scan
    #[arg(long, global = true, env = "ERRATA_CLASSES", value_delimiter = ',', default_values_t = default_classes())]
    classes: Vec<String>,
    /// Subject labels to scan
    #[arg(long, global = true, env = "ERRATA_SUBJECTS", value_delimiter = ',', default_values_t = default_subjects())]
    subjects: Vec<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the flat errata array for the errata viewer
    Errata(ErrataArgs),
    /// Write the ranked per-class/subject index and copy its images
    Data(DataArgs),
    /// Write the Markdown and HTML audit reports
    Report(ReportArgs),
    /// List files whose filename and content page numbers disagree
    Verify,
    /// Errata + data + report from a single scan
    All {
        #[command(flatten)]
        errata: ErrataArgs,
        #[command(flatten)]
        data: DataArgs,
        #[command(flatten)]
        report: ReportArgs,
    },
}

#[derive(Args)]
struct ErrataArgs {
    /// Errata JSON output path
    #[arg(id = "errata_out", long = "errata-out", default_value = "src/data/errata_data.json")]
    output: PathBuf,
}

#[derive(Args)]
struct DataArgs {
    /// Ranked index JSON output path
    #[arg(id = "data_out", long = "data-out", default_value = "src/data.json")]
    output: PathBuf,
    /// Source images folder (default: <root>/images)
    #[arg(long)]
    images: Option<PathBuf>,
    /// Public images folder the ranked images are copied into
    #[arg(long, default_value = "public/images")]
    public: PathBuf,
    /// Images kept per class/subject
    #[arg(short = 'n', long, default_value = "5")]
    top: usize,
}

#[derive(Args)]
struct ReportArgs {
    /// Folder for Audit_Report.md and Audit_Report.html
    #[arg(long = "report-dir", default_value = "Audit Report")]
    out_dir: PathBuf,
}

fn default_classes() -> Vec<String> {
    Grid::default().classes
}

fn default_subjects() -> Vec<String> {
    Grid::default().subjects
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let grid = Grid {
        classes: cli.classes,
        subjects: cli.subjects,
    };
    let root = cli.root;

    let result = match cli.command {
        Commands::Errata(args) => {
            let scans = scan::scan_grid(&root, &grid)?;
            write_errata(&scans, &args)
        }
        Commands::Data(args) => {
            let scans = scan::scan_grid(&root, &grid)?;
            write_data(&root, &scans, &args)
        }
        Commands::Report(args) => {
            let scans = scan::scan_grid(&root, &grid)?;
            write_report(&scans, &args)
        }
        Commands::Verify => {
            println!("Checking for mismatches between filename and content page number...");
            println!("{}", "-".repeat(63));
            let mismatches = verify::find_mismatches(&root, &grid)?;
            for m in &mismatches {
                println!("[MISMATCH] {}/{}", m.dir, m.file);
                println!("   -> Filename says: {}", m.filename_page);
                println!("   -> Content says:  {}", m.content_page);
                println!("   -> Diff: {}", m.diff());
            }
            println!("{}", "-".repeat(63));
            println!("Scan complete. {} mismatches.", mismatches.len());
            Ok(())
        }
        Commands::All { errata, data, report } => {
            let scans = scan::scan_grid(&root, &grid)?;
            write_errata(&scans, &errata)?;
            write_data(&root, &scans, &data)?;
            write_report(&scans, &report)
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn write_errata(scans: &[CombinationScan], args: &ErrataArgs) -> Result<()> {
    let records = output::flatten(scans);
    output::write_json(&args.output, &records)?;
    println!("JSON data generated at: {}", args.output.display());
    println!("Total records: {}", records.len());
    Ok(())
}

fn write_data(root: &Path, scans: &[CombinationScan], args: &DataArgs) -> Result<()> {
    let index = output::ranked_index(scans, args.top);
    let images = args.images.clone().unwrap_or_else(|| root.join("images"));
    let copied = assets::copy_ranked_images(&images, &args.public, &index)?;
    info!(copied = copied.copied, missing = copied.missing, "images copied");

    output::write_json(&args.output, &index)?;
    println!("Data generated at {}", args.output.display());
    println!("Copied {} images ({} missing).", copied.copied, copied.missing);
    Ok(())
}

fn write_report(scans: &[CombinationScan], args: &ReportArgs) -> Result<()> {
    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    let md_path = args.out_dir.join("Audit_Report.md");
    output::write_text(&md_path, &report::render_markdown(scans, &generated_at))?;
    println!("Markdown report generated at: {}", md_path.display());

    let html_path = args.out_dir.join("Audit_Report.html");
    output::write_text(&html_path, &report::render_html(scans, &generated_at))?;
    println!("HTML report generated at: {}", html_path.display());
    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
