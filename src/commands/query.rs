use crate::clients::brew::Brew;
use crate::config::load_config_auto;
use crate::index::{first_installs_within, read_index, to_index_json, DayWindow, InstallationRecord};
use crate::utils;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

pub fn run(
    config_path: Option<&Path>,
    index_path: Option<&Path>,
    older_days: i64,
    newer_days: i64,
    json: bool,
    info: bool,
) -> Result<()> {
    if older_days < newer_days {
        anyhow::bail!(
            "X ({}) is the older bound and must be >= Y ({})",
            older_days,
            newer_days
        );
    }

    let config = load_config_auto(config_path)?;
    let brew = Brew::new();

    // Only ask brew where its repository is when no explicit index was given
    let index_path = match index_path {
        Some(path) => path.to_path_buf(),
        None => super::index_path(None, &config, &brew.repository()),
    };

    let window = DayWindow::days_ago(utils::now_epoch(), older_days, newer_days)
        .with_context(|| format!("Day range {}..{} is out of range", older_days, newer_days))?;

    let records = read_index(&index_path)?;
    let matches = first_installs_within(&records, window);
    log::debug!("{} of {} records match", matches.len(), records.len());

    if json {
        println!("{}", to_index_json(&matches)?);
        return Ok(());
    }

    for record in &matches {
        let row = format_row(record);
        if record.is_available() {
            println!("{}", row.yellow());
        } else {
            println!("{}", row);
        }
    }

    if info {
        println!("\n{}\n", "=".repeat(80));
        for record in &matches {
            println!("{}", format!("--- Info for {} ---", record.name).bold());
            if let Err(e) = brew.show_info(&record.name) {
                log::warn!("Error running info for {}: {:#}", record.name, e);
            }
            println!("\n");
        }
    }

    Ok(())
}

/// One table row: time, name, version, status, path
pub fn format_row(record: &InstallationRecord) -> String {
    let status = if record.is_available() {
        "(Available)"
    } else {
        ""
    };

    format!(
        "{:<25}  {:<30}  {:<15}  {:<12} {}",
        record.first_installed_time, record.name, record.version, status, record.install_path
    )
}
