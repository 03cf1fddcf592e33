use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// One scanned project as emitted by the license scanner.
///
/// Field order here is the field order of the written BOM files.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub project: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub licenses: Vec<LicenseGuess>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub vcs: Option<String>,
}

#[cfg(test)]
impl ProjectRecord {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            ..Self::default()
        }
    }

    pub fn with_license(mut self, license_type: &str, confidence: f64) -> Self {
        self.licenses.push(LicenseGuess {
            license_type: license_type.to_string(),
            confidence,
        });
        self
    }
}

/// A single license guess with the scanner's confidence in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LicenseGuess {
    #[serde(
        rename = "type",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub license_type: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "is_zero")]
    pub confidence: f64,
}

/// Records keyed by project identifier. Iteration order is output order.
pub type Table = BTreeMap<String, ProjectRecord>;

/// The two accumulators threaded through every pipeline stage.
#[derive(Debug, Default)]
pub struct Tables {
    pub resolved: Table,
    pub errors: Table,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

fn is_zero(value: &f64) -> bool {
    *value == 0.0
}

/// The scanner writes `null` for zero values (empty strings, lists, numbers).
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
