//! In-memory transformations applied to the resolved table.

use tracing::{debug, info};

use crate::models::Table;

/// Collapse every multi-guess license list to its best guess.
///
/// The running maximum starts at 0 and only a strictly greater confidence
/// replaces it, so the first of several equal maxima wins and a list with no
/// positive confidence keeps its first entry.
pub fn reduce_licenses(table: &mut Table) {
    for record in table.values_mut() {
        if record.licenses.len() <= 1 {
            continue;
        }

        let mut score = 0.0;
        let mut best = 0;
        for (i, guess) in record.licenses.iter().enumerate() {
            if guess.confidence > score {
                score = guess.confidence;
                best = i;
            }
        }

        let chosen = record.licenses.swap_remove(best);
        record.licenses = vec![chosen];
    }
}

/// Drop every record whose identifier starts with one of `prefixes`.
///
/// Empty prefixes are ignored. Returns the number of records removed.
pub fn filter_modules(table: &mut Table, prefixes: &[String]) -> usize {
    let prefixes: Vec<&str> = prefixes
        .iter()
        .map(String::as_str)
        .filter(|p| !p.is_empty())
        .collect();
    if prefixes.is_empty() {
        return 0;
    }

    let before = table.len();
    table.retain(|project, _| {
        let keep = !prefixes.iter().any(|p| project.starts_with(p));
        if !keep {
            debug!(project, "filtered module");
        }
        keep
    });

    let removed = before - table.len();
    info!(removed, "applied module filter");
    removed
}

/// Replace records that have an override. Never adds new projects.
///
/// Returns the number of records replaced.
pub fn apply_overrides(table: &mut Table, overrides: &Table) -> usize {
    let mut replaced = 0;
    for (project, record) in table.iter_mut() {
        if let Some(over) = overrides.get(project) {
            *record = over.clone();
            replaced += 1;
        }
    }

    if replaced > 0 {
        info!(replaced, "applied overrides");
    }
    replaced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProjectRecord;

    fn table(records: Vec<ProjectRecord>) -> Table {
        records
            .into_iter()
            .map(|r| (r.project.clone(), r))
            .collect()
    }

    #[test]
    fn test_reduce_first_maximum_wins() {
        let mut t = table(vec![ProjectRecord::new("p")
            .with_license("A", 0.9)
            .with_license("B", 0.95)
            .with_license("C", 0.95)]);
        reduce_licenses(&mut t);
        assert_eq!(t["p"].licenses.len(), 1);
        assert_eq!(t["p"].licenses[0].license_type, "B");
        assert_eq!(t["p"].licenses[0].confidence, 0.95);
    }

    #[test]
    fn test_reduce_all_zero_keeps_first() {
        let mut t = table(vec![ProjectRecord::new("p")
            .with_license("A", 0.0)
            .with_license("B", 0.0)]);
        reduce_licenses(&mut t);
        assert_eq!(t["p"].licenses.len(), 1);
        assert_eq!(t["p"].licenses[0].license_type, "A");
    }

    #[test]
    fn test_reduce_leaves_short_lists() {
        let mut t = table(vec![
            ProjectRecord::new("none"),
            ProjectRecord::new("one").with_license("MIT", 0.2),
        ]);
        let before = t.clone();
        reduce_licenses(&mut t);
        assert_eq!(t, before);
    }

    #[test]
    fn test_filter_modules() {
        let mut t = table(vec![
            ProjectRecord::new("github.com/x/y"),
            ProjectRecord::new("gitlab.com/a/b"),
        ]);
        let removed = filter_modules(&mut t, &["github.com/x".to_string()]);
        assert_eq!(removed, 1);
        assert_eq!(t.keys().collect::<Vec<_>>(), vec!["gitlab.com/a/b"]);
    }

    #[test]
    fn test_filter_ignores_empty_prefix() {
        let mut t = table(vec![ProjectRecord::new("github.com/x/y")]);
        assert_eq!(filter_modules(&mut t, &[String::new()]), 0);
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn test_override_replaces_whole_record() {
        let mut t = table(vec![
            ProjectRecord::new("p").with_license("MIT", 0.9),
            ProjectRecord::new("q").with_license("MIT", 0.9),
        ]);
        let mut over = ProjectRecord::new("p").with_license("Apache-2.0", 1.0);
        over.vcs = Some("custom".to_string());
        let overrides = table(vec![over.clone(), ProjectRecord::new("not-scanned")]);

        let replaced = apply_overrides(&mut t, &overrides);
        assert_eq!(replaced, 1);
        assert_eq!(t["p"], over);
        assert_eq!(t["q"].licenses[0].license_type, "MIT");
        assert!(!t.contains_key("not-scanned"));
    }
}
