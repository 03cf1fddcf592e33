use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::info;

use crate::error::BomError;
use crate::models::{ProjectRecord, Table};

/// Encode `table` as a two-space indented JSON array in identifier order,
/// terminated by a newline.
pub fn encode_bom(table: &Table) -> Result<Vec<u8>, serde_json::Error> {
    let records: Vec<&ProjectRecord> = table.values().collect();

    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"  "));
    records.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Write `table` to `path`, replacing any existing file.
pub fn write_bom(path: &Path, table: &Table) -> Result<(), BomError> {
    let data = encode_bom(table).map_err(|e| BomError::io(path, e.into()))?;
    std::fs::write(path, data).map_err(|e| BomError::io(path, e))?;
    info!(path = %path.display(), records = table.len(), "wrote BOM");
    Ok(())
}
