use crate::available;
use crate::clients::{brew::Brew, gh::GhApi, git::GitCli};
use crate::config::{load_config_auto, Config};
use crate::history::{self, HistoryContext};
use crate::index::{resolve_first_installs, scan_caskroom, scan_cellar, write_index, InstallationRecord};
use crate::utils;
use anyhow::Result;
use std::collections::BTreeSet;
use std::path::Path;

pub fn run(config_path: Option<&Path>, index_path: Option<&Path>, enrich: bool, available: bool) -> Result<()> {
    let config = load_config_auto(config_path)?;
    let brew = Brew::new();

    let repository = brew.repository();
    let cellar = brew.cellar().map_err(|e| log::warn!("{:#}", e)).ok();
    let caskroom = brew.caskroom().map_err(|e| log::warn!("{:#}", e)).ok();

    if let Some(cellar) = &cellar {
        log::info!("Scanning Homebrew Cellar: {}", cellar.display());
    }

    let mut records = collect_installs(cellar.as_deref(), caskroom.as_deref());
    log::info!("Found {} installation records", records.len());

    if enrich {
        enrich_with_history(&brew, &config, &mut records);
    }

    if available {
        add_available(&repository, &config, &mut records);
    }

    let out = super::index_path(index_path, &config, &repository);
    write_index(&out, &mut records)?;

    println!("Index created: {}", out.display());
    Ok(())
}

/// Scan both install roots and resolve first installs
pub fn collect_installs(cellar: Option<&Path>, caskroom: Option<&Path>) -> Vec<InstallationRecord> {
    let mut records = Vec::new();

    if let Some(cellar) = cellar {
        records.extend(scan_cellar(cellar));
    }

    if let Some(caskroom) = caskroom {
        records.extend(scan_caskroom(caskroom));
    }

    resolve_first_installs(&mut records);
    records
}

fn enrich_with_history(brew: &Brew, config: &Config, records: &mut [InstallationRecord]) {
    if !utils::command_exists("gh") {
        log::warn!("gh not installed, skipping history enrichment");
        return;
    }

    log::info!("Enriching with GitHub history (this may take a while)...");

    let ctx = HistoryContext::load(brew, &config.taps);
    log::info!(
        "Loaded {} taps and {} installed info records",
        ctx.taps.len(),
        ctx.installed.len()
    );

    let names: BTreeSet<String> = records.iter().map(|r| r.name.clone()).collect();
    log::info!("Processing {} unique packages for enrichment", names.len());

    match history::fetch_all(&ctx, &GhApi::new(), &names, config.settings.max_parallel) {
        Ok(found) => {
            log::info!("Enrichment complete. Found history for {} packages.", found.len());
            history::apply_history(records, &found);
        }
        Err(e) => log::warn!("History enrichment failed: {:#}", e),
    }
}

fn add_available(repository: &Path, config: &Config, records: &mut Vec<InstallationRecord>) {
    log::info!(
        "Scanning for available packages added since {}...",
        config.settings.available_since
    );

    let taps_dir = repository.join("Library/Taps");
    let additions = available::scan_taps(&GitCli::new(), &taps_dir, &config.settings.available_since);
    log::info!("Found {} recently added packages.", additions.len());

    let extra = available::available_records(&additions, records);
    log::info!("Adding {} packages not installed here", extra.len());
    records.extend(extra);
}
