//! Loading of override files and BOM fragments.
//!
//! A BOM fragment is what one scanner invocation writes: a resolved-project
//! array followed by zero or more error-project arrays, concatenated as
//! separate top-level JSON values. Position, not content, decides which table
//! a document lands in.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::BomError;
use crate::models::{ProjectRecord, Table, Tables};

/// Load the override table. `None` or an empty path is a no-op.
pub fn load_overrides(path: Option<&Path>) -> Result<Table, BomError> {
    let mut overrides = Table::new();
    let Some(path) = path.filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(overrides);
    };

    let content = std::fs::read_to_string(path).map_err(|e| BomError::io(path, e))?;
    let records: Vec<ProjectRecord> =
        serde_json::from_str(&content).map_err(|e| BomError::parse(path, e))?;

    for record in records {
        if record.project.is_empty() {
            continue;
        }
        overrides.insert(record.project.clone(), record);
    }

    info!(path = %path.display(), count = overrides.len(), "loaded overrides");
    Ok(overrides)
}

/// Merge every regular file directly inside `dir` into `tables`.
///
/// Files are visited in file-name order, so when two fragments carry the
/// same project the one whose name sorts last wins. Returns the number of
/// files read.
pub fn ingest_dir(dir: &Path, tables: &mut Tables) -> Result<usize, BomError> {
    if !dir.is_dir() {
        return Err(BomError::InvalidInputDir(dir.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| BomError::io(dir, e))? {
        let entry = entry.map_err(|e| BomError::io(dir, e))?;
        let path = entry.path();
        if !path.is_dir() {
            files.push(path);
        }
    }
    files.sort();

    for path in &files {
        let file = File::open(path).map_err(|e| BomError::io(path, e))?;
        let docs = ingest_reader(BufReader::new(file), path, tables)?;
        debug!(file = %path.display(), documents = docs, "ingested fragment");
    }

    info!(
        files = files.len(),
        resolved = tables.resolved.len(),
        errors = tables.errors.len(),
        "ingested BOM fragments"
    );
    Ok(files.len())
}

/// Stream every JSON document out of `reader` into `tables`.
///
/// `origin` only labels parse errors. Returns the number of documents read.
pub fn ingest_reader<R: Read>(
    reader: R,
    origin: &Path,
    tables: &mut Tables,
) -> Result<usize, BomError> {
    let stream = serde_json::Deserializer::from_reader(reader)
        .into_iter::<Option<Vec<ProjectRecord>>>();

    let mut count = 0;
    for doc in stream {
        let records = doc.map_err(|e| BomError::parse(origin, e))?.unwrap_or_default();
        let target = if count == 0 {
            &mut tables.resolved
        } else {
            &mut tables.errors
        };
        for record in records {
            if record.project.is_empty() {
                continue;
            }
            target.insert(record.project.clone(), record);
        }
        count += 1;
    }

    Ok(count)
}
