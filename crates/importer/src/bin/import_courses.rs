use anyhow::{Context, bail};
use clap::Parser;
use database::{db::create_connection, services::academic_year::AcademicYearService};
use importer::{ImportReport, parse_courses, save_courses};
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "import-courses")]
#[command(about = "Import retake courses from a CSV file, one row per time slot", long_about = None)]
struct Cli {
    /// CSV file to import
    #[arg(long)]
    csv: PathBuf,
    /// Term for rows with a blank academic_year; defaults to the current term
    #[arg(long)]
    default_term: Option<String>,
    /// Parse and validate only, without touching the database
    #[arg(long)]
    dry_run: bool,
}

fn print_report(report: &ImportReport) {
    for line in &report.imported {
        println!("{line}");
    }
    for warning in &report.warnings {
        println!("warning: {warning}");
    }
    for error in &report.errors {
        println!("error: {error}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let input = std::fs::read(&cli.csv)
        .with_context(|| format!("failed to read {}", cli.csv.display()))?;

    if cli.dry_run {
        let batch = parse_courses(&input, cli.default_term.as_deref().unwrap_or_default())?;
        let mut report = ImportReport::from_batch(&batch);
        report.imported = batch
            .courses
            .iter()
            .map(|course| {
                format!(
                    "Would import {course} for {} with {} time slots",
                    course.academic_year,
                    course.time_slots.len()
                )
            })
            .collect();
        print_report(&report);
        return Ok(());
    }

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set to import courses")?;
    let db = create_connection(&database_url)
        .await
        .context("failed to connect to the database")?;

    let default_term = match cli.default_term {
        Some(term) => term,
        None => AcademicYearService::current(&db)
            .await?
            .map(|setting| setting.academic_year)
            .unwrap_or_default(),
    };
    info!("Importing {} with default term '{default_term}'", cli.csv.display());

    let batch = parse_courses(&input, &default_term)?;
    let report = save_courses(&db, batch).await;
    print_report(&report);

    if report.imported.is_empty() && report.has_errors() {
        bail!("no courses were imported");
    }

    Ok(())
}
