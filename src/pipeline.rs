//! One merge run: ingest → reduce → filter → override → VCS → write.

use std::path::PathBuf;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::config::Settings;
use crate::ingest::{ingest_dir, load_overrides};
use crate::models::Tables;
use crate::transform::{apply_overrides, filter_modules, reduce_licenses};
use crate::vcs::goget::GoGetDetector;
use crate::vcs::local::LocalDetector;
use crate::vcs::{resolve_vcs, DetectorChain, VcsDetector};
use crate::writer::write_bom;

pub const BOM_FILE: &str = "bom.json";
pub const BOM_ERROR_FILE: &str = "bom_error.json";

/// What a finished run produced, for the terminal report.
#[derive(Debug)]
pub struct MergeOutcome {
    pub tables: Tables,
    pub files_read: usize,
    pub filtered: usize,
    pub overridden: usize,
    pub vcs_resolved: usize,
    pub bom_path: PathBuf,
    pub error_path: PathBuf,
}

/// Local checkouts first, then go-get lookups unless `--offline`.
pub fn build_detector(settings: &Settings) -> Result<DetectorChain> {
    let mut detectors: Vec<Box<dyn VcsDetector>> =
        vec![Box::new(LocalDetector::new(&settings.search_root))];
    if settings.online {
        detectors.push(Box::new(GoGetDetector::new(settings.timeout)?));
    }
    Ok(DetectorChain::new(detectors))
}

pub fn run(settings: &Settings, detector: &dyn VcsDetector) -> Result<MergeOutcome> {
    let overrides = load_overrides(settings.override_file.as_deref())?;

    let mut tables = Tables::default();
    let files_read = ingest_dir(&settings.input_dir, &mut tables)?;

    reduce_licenses(&mut tables.resolved);
    let filtered = filter_modules(&mut tables.resolved, &settings.filter_modules);
    let overridden = apply_overrides(&mut tables.resolved, &overrides);

    let progress = settings
        .progress
        .then(|| progress_bar((tables.resolved.len() + tables.errors.len()) as u64))
        .transpose()?;
    resolve_vcs(
        &mut tables.resolved,
        detector,
        &settings.fallback_hosts,
        progress.as_ref(),
    )?;
    resolve_vcs(
        &mut tables.errors,
        detector,
        &settings.fallback_hosts,
        progress.as_ref(),
    )?;
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    let vcs_resolved = count_with_vcs(&tables);

    std::fs::create_dir_all(&settings.output_dir).with_context(|| {
        format!("creating output directory {}", settings.output_dir.display())
    })?;
    let bom_path = settings.output_dir.join(BOM_FILE);
    let error_path = settings.output_dir.join(BOM_ERROR_FILE);
    write_bom(&bom_path, &tables.resolved)?;
    write_bom(&error_path, &tables.errors)?;

    info!(
        resolved = tables.resolved.len(),
        errors = tables.errors.len(),
        "merge complete"
    );

    Ok(MergeOutcome {
        files_read,
        filtered,
        overridden,
        vcs_resolved,
        tables,
        bom_path,
        error_path,
    })
}

/// Records in either table that carry a VCS root, whatever its source.
fn count_with_vcs(tables: &Tables) -> usize {
    tables
        .resolved
        .values()
        .chain(tables.errors.values())
        .filter(|r| r.vcs.as_deref().is_some_and(|v| !v.is_empty()))
        .count()
}

fn progress_bar(len: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    pb.set_message("resolving VCS roots");
    Ok(pb)
}
