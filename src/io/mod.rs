//! Document sources and sinks for both sides of a conversion.

pub mod json;
pub mod table;
pub mod xlsx;

use thiserror::Error;

/// An error that occurred while decoding or encoding a document
#[derive(Debug, Error)]
pub enum IoError {
    #[error("could not access the document")]
    Io(#[from] std::io::Error),
    #[error("could not parse the JSON document")]
    Json(#[from] serde_json::Error),
    #[error("could not parse the delimited table")]
    Csv(#[from] csv::Error),
    #[error("could not read the workbook")]
    Workbook(#[from] calamine::XlsxError),
    #[error("could not write the workbook")]
    WorkbookWrite(#[from] rust_xlsxwriter::XlsxError),
    #[error("the workbook has no worksheet")]
    NoWorksheet,
    #[error("a table of {rows} rows and {columns} columns does not fit in a worksheet")]
    SheetBounds { rows: usize, columns: usize },
    #[error("expected a JSON array of tracks, found {0}")]
    NotAnArray(&'static str),
}
