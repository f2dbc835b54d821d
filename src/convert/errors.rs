use thiserror::Error;

/// An error that aborts a whole conversion; no partial output is produced
#[derive(Debug, Error, PartialEq)]
pub enum ConvertError {
    /// A metadata value that is neither a string nor a `{name, color}` object
    #[error(
        "metadata format not recognized for key `{key}` of track #{index}: expected a string \
         or a {{name, color}} object, found {found}"
    )]
    Metadata {
        index: usize,
        key:   String,
        found: &'static str,
    },
}
