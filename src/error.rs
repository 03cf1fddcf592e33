//! Fatal error taxonomy. Every variant aborts the run.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BomError {
    /// `--in` is missing or not a directory.
    #[error("input directory {} does not exist or is not a directory", .0.display())]
    InvalidInputDir(PathBuf),

    /// Malformed JSON in a BOM fragment or override file.
    #[error("failed to parse {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error at {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The VCS root detector failed hard for a project.
    #[error("VCS root detection failed for {project}")]
    Vcs {
        project: String,
        #[source]
        source: anyhow::Error,
    },
}

impl BomError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BomError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        BomError::Parse {
            path: path.into(),
            source,
        }
    }
}
