//! Version-control root discovery for project identifiers.
//!
//! - [`local`]: finds VCS metadata under a checkout directory.
//! - [`goget`]: asks the hosting server through `?go-get=1` meta tags.
//!
//! When no detector answers, identifiers on a known hosting prefix fall back
//! to their first three path segments (`host/owner/repo`).

use anyhow::Result;
use indicatif::ProgressBar;
use tracing::{debug, info};

use crate::error::BomError;
use crate::models::Table;

pub mod goget;
pub mod local;

pub trait VcsDetector {
    /// Return the VCS root for `project`, or `None` when it cannot be told.
    ///
    /// An `Err` is a hard failure and aborts the run.
    fn detect_root(&self, project: &str) -> Result<Option<String>>;
}

/// Tries each detector in turn; the first non-empty answer wins.
pub struct DetectorChain {
    detectors: Vec<Box<dyn VcsDetector>>,
}

impl DetectorChain {
    pub fn new(detectors: Vec<Box<dyn VcsDetector>>) -> Self {
        Self { detectors }
    }
}

#[cfg(test)]
impl DetectorChain {
    pub fn len(&self) -> usize {
        self.detectors.len()
    }
}

impl VcsDetector for DetectorChain {
    fn detect_root(&self, project: &str) -> Result<Option<String>> {
        for detector in &self.detectors {
            if let Some(root) = detector.detect_root(project)? {
                if !root.is_empty() {
                    return Ok(Some(root));
                }
            }
        }
        Ok(None)
    }
}

/// How many records got a root from each source.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct VcsStats {
    pub detected: usize,
    pub fallback: usize,
}

/// Fill in `vcs` for every record of `table`.
///
/// A record nobody can place keeps the `vcs` it already had.
pub fn resolve_vcs(
    table: &mut Table,
    detector: &dyn VcsDetector,
    fallback_hosts: &[String],
    progress: Option<&ProgressBar>,
) -> Result<VcsStats, BomError> {
    let mut stats = VcsStats::default();

    for (project, record) in table.iter_mut() {
        let detected = detector
            .detect_root(project)
            .map_err(|source| BomError::Vcs {
                project: project.clone(),
                source,
            })?;

        match detected.filter(|root| !root.is_empty()) {
            Some(root) => {
                record.vcs = Some(root);
                stats.detected += 1;
            }
            None => {
                if let Some(root) = fallback_root(project, fallback_hosts) {
                    debug!(project = %project, root = %root, "using hosting prefix fallback");
                    record.vcs = Some(root);
                    stats.fallback += 1;
                }
            }
        }

        if let Some(pb) = progress {
            pb.inc(1);
        }
    }

    info!(
        records = table.len(),
        detected = stats.detected,
        fallback = stats.fallback,
        "resolved VCS roots"
    );
    Ok(stats)
}

/// `host/owner/repo` for identifiers under one of `hosts`.
///
/// Identifiers with fewer than three segments have no fallback.
pub fn fallback_root(project: &str, hosts: &[String]) -> Option<String> {
    let on_host = hosts.iter().any(|host| {
        let host = host.trim_end_matches('/');
        !host.is_empty()
            && project
                .strip_prefix(host)
                .is_some_and(|rest| rest.starts_with('/'))
    });
    if !on_host {
        return None;
    }

    let segments: Vec<&str> = project.splitn(4, '/').take(3).collect();
    if segments.len() < 3 {
        return None;
    }
    Some(segments.join("/"))
}
