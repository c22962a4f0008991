use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("Source file not found: {}", path.display())]
    SourceUnavailable { path: PathBuf },

    #[error("Worksheet '{sheet}' not found in NFA workbook")]
    SheetNotFound { sheet: String },

    #[error("Source layout does not match schema: {details}")]
    SchemaMismatch { details: String },

    #[error("Required column '{column}' not found in FX source")]
    MissingColumn { column: String },

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::XlsxError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
