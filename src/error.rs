use crate::all::*;

use thiserror::Error;

/// Failure kinds of the pipeline. Carried on the `anyhow` chain so the exact
/// kind stays visible to callers.
#[derive(Debug, Error)]
pub enum PriorError {
  #[error("Input path does not exist: {0}")]
  MissingInput(PathBuf),

  #[error("Failed to read reference model: {0}")]
  ModelRead(String),

  #[error("Image directory has {images} images but the database has {rows} rows")]
  RowCountMismatch { images: usize, rows: usize },

  #[error("Database error: {0}")]
  Database(#[from] rusqlite::Error),
}
