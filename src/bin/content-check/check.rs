use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use spdlog::info;

use content_schema::collection::Collection;
use content_schema::config::Config;
use content_schema::content::content_file::ContentEntry;
use content_schema::report::CheckReport;

use crate::{CheckArgs, ListArgs, ReportFormat};

fn content_path(config: &Config, path: Option<PathBuf>) -> PathBuf {
    path.unwrap_or_else(|| config.paths.content_dir.clone())
}

fn load(path: &Path) -> Result<Collection> {
    if path.is_file() {
        return Ok(Collection::load_single(path));
    }

    Collection::load(path)
        .with_context(|| format!("Error reading content directory {}", path.display()))
}

// Invalid files always fail the run, drafts only under --strict
fn check_failed(report: &CheckReport, strict: bool) -> bool {
    report.invalid > 0 || (strict && report.drafts > 0)
}

fn select_entries<'a>(collection: &'a Collection, drafts: bool, tag: Option<&str>) -> Vec<&'a ContentEntry> {
    collection.entries().iter()
        .filter(|e| drafts || !e.item.is_draft())
        .filter(|e| tag.map_or(true, |tag| e.item.has_tag(tag)))
        .collect()
}

pub fn check_cmd(config: &Config, args: CheckArgs) -> Result<ExitCode> {
    let path = content_path(config, args.path);
    info!("Checking content in {}", path.display());
    let collection = load(&path)?;
    let report = CheckReport::new(&collection);

    match args.format {
        ReportFormat::Text => print!("{}", report.render_text()),
        ReportFormat::Json => println!("{}", report.render_json()?),
    }

    Ok(if check_failed(&report, args.strict) { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

pub fn list_cmd(config: &Config, args: ListArgs) -> Result<ExitCode> {
    let path = content_path(config, args.path);
    let collection = load(&path)?;

    let entries = select_entries(&collection, args.drafts, args.tag.as_deref());
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(ExitCode::SUCCESS)
}

pub fn nav_cmd(config: &Config) -> Result<ExitCode> {
    let year = Local::now().year();
    let nav = config.navigation.resolve(&config.site.base_path, year);
    println!("{}", serde_json::to_string_pretty(&nav)?);
    Ok(ExitCode::SUCCESS)
}
