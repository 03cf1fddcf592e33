use std::collections::HashMap;

use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::{Table as BomTable, Tables};
use crate::pipeline::MergeOutcome;

/// Label used for resolved projects that carry no license guess.
const NO_LICENSE: &str = "(none)";

/// Render a colored terminal summary of a finished merge.
pub fn render(outcome: &MergeOutcome, verbose: bool, quiet: bool) {
    let Tables { resolved, errors } = &outcome.tables;

    if quiet {
        println!(
            "Files: {}  Resolved: {}  Errors: {}  Filtered: {}  Overridden: {}",
            outcome.files_read,
            resolved.len().to_string().green(),
            errors.len().to_string().red(),
            outcome.filtered,
            outcome.overridden,
        );
        return;
    }

    println!("\n {} v{}\n", "bom-merge".bold(), env!("CARGO_PKG_VERSION"));

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<50}│", "SUMMARY");
    println!(" │  {:<50}│", format!("Fragments read     : {:>6}", outcome.files_read));
    println!(" │  {:<50}│", format!("Resolved projects  : {:>6}", resolved.len()));
    println!(" │  {:<50}│", format!("Error projects     : {:>6}", errors.len()));
    println!(" │  {:<50}│", format!("Filtered modules   : {:>6}", outcome.filtered));
    println!(" │  {:<50}│", format!("Overridden         : {:>6}", outcome.overridden));
    println!(" │  {:<50}│", format!("With VCS root      : {:>6}", outcome.vcs_resolved));
    println!(" └────────────────────────────────────────────────────┘\n");

    println!(" {} {}", "→".cyan(), outcome.bom_path.display());
    println!(" {} {}\n", "→".cyan(), outcome.error_path.display());

    if verbose && !resolved.is_empty() {
        println!(" {} License breakdown:\n", "[BOM]".green().bold());
        render_license_table(resolved);
        println!();
    }

    if verbose && !errors.is_empty() {
        println!(" {} Projects the scanner could not resolve:\n", "[ERROR]".red().bold());
        render_error_table(errors);
        println!();
    }
}

fn render_license_table(resolved: &BomTable) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("License").add_attribute(Attribute::Bold),
            Cell::new("Projects").add_attribute(Attribute::Bold),
        ]);

    for (license, count) in license_counts(resolved) {
        let color = if license == NO_LICENSE {
            Color::DarkGrey
        } else {
            Color::Reset
        };
        table.add_row(vec![
            Cell::new(license).fg(color),
            Cell::new(count).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("{}", table);
}

fn render_error_table(errors: &BomTable) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Project").add_attribute(Attribute::Bold),
            Cell::new("VCS").add_attribute(Attribute::Bold),
            Cell::new("Error").add_attribute(Attribute::Bold),
        ]);

    for record in errors.values() {
        table.add_row(vec![
            Cell::new(&record.project),
            Cell::new(record.vcs.as_deref().unwrap_or("")),
            Cell::new(record.error.as_deref().unwrap_or("")).fg(Color::Red),
        ]);
    }

    println!("{}", table);
}

/// License type → project count, most common first, ties by name.
fn license_counts(resolved: &BomTable) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in resolved.values() {
        let license = record
            .licenses
            .first()
            .map(|l| l.license_type.as_str())
            .filter(|t| !t.is_empty())
            .unwrap_or(NO_LICENSE);
        *counts.entry(license.to_string()).or_insert(0) += 1;
    }

    let mut pairs: Vec<(String, usize)> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProjectRecord;

    #[test]
    fn test_license_counts_sorted() {
        let mut resolved = BomTable::new();
        for (name, license) in [("a", "MIT"), ("b", "Apache-2.0"), ("c", "MIT"), ("d", "")] {
            let mut record = ProjectRecord::new(name);
            if !license.is_empty() {
                record = record.with_license(license, 1.0);
            }
            resolved.insert(name.to_string(), record);
        }

        assert_eq!(
            license_counts(&resolved),
            vec![
                ("MIT".to_string(), 2),
                (NO_LICENSE.to_string(), 1),
                ("Apache-2.0".to_string(), 1),
            ]
        );
    }
}
