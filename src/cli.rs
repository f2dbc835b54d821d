use crate::io::table::TableFormat;
use crate::shell::Options as ShellOptions;
use std::error;
use std::fmt;
use std::path::PathBuf;

use clap::Parser;

/// CLI version loaded from Cargo, or none if not build with cargo
pub const VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");

/// Failure to parse a CLI value into one of the enumerated option types
#[derive(Debug, Clone)]
pub struct ParseFailure {
    target: String,
    given:  String,
}

impl ParseFailure {
    pub const fn new(target: String, given: String) -> Self { Self { target, given } }
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid {}: {}", self.target, self.given)
    }
}

impl error::Error for ParseFailure {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> { None }
}

/// Format of the input document, which also selects the conversion direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputFormat {
    /// Nested JSON datahub; flattened into a table
    Json,
    /// Delimited table; unflattened into a JSON datahub
    Table(TableFormat),
}

impl std::str::FromStr for InputFormat {
    type Err = ParseFailure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(InputFormat::Json),
            other => other
                .parse::<TableFormat>()
                .map(InputFormat::Table)
                .map_err(|_| ParseFailure::new(String::from("input format"), s.to_owned())),
        }
    }
}

/// Auto-parsed CLI options for hubconv, generated via clap
#[derive(Parser)]
#[clap(
    version = VERSION.unwrap_or("unknown"),
    about = "Converts genome browser datahub track lists between nested JSON and flat tables"
)]
pub struct Opts {
    /// Format of the input file (json, xlsx, csv, or tsv)
    #[clap(
        value_parser,
        help = "format of the input file: json flattens into a table, xlsx/csv/tsv unflattens \
                into JSON"
    )]
    pub format: InputFormat,

    /// Input file to convert
    #[clap(value_parser, help = "input file to convert")]
    pub input: PathBuf,

    /// Destination file; derived from the input path when omitted
    #[clap(
        value_parser,
        short = 'o',
        long = "output",
        help = "output file (defaults to the input path with the new extension)"
    )]
    pub output: Option<PathBuf>,

    /// Layout of the table written when flattening
    #[clap(
        value_parser,
        short = 't',
        long = "table-format",
        help = "table layout to write when flattening (xlsx, csv, or tsv); inferred from \
                --output when omitted"
    )]
    pub table_format: Option<TableFormat>,

    /// Whether to write single-line JSON when unflattening
    #[clap(
        action,
        long = "compact",
        help = "write single-line JSON instead of pretty-printed JSON"
    )]
    pub compact: bool,

    // Shell output-related options
    #[clap(flatten)]
    pub shell_options: ShellOptions,
}

impl Opts {
    /// Table layout used when flattening: explicit flag, then the output
    /// extension, then XLSX
    pub fn target_table_format(&self) -> TableFormat {
        self.table_format
            .or_else(|| self.output.as_deref().and_then(TableFormat::from_path))
            .unwrap_or(TableFormat::Xlsx)
    }

    /// Resolves the output path, replacing the input extension when no
    /// output was given
    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(output) => output.clone(),
            None => match self.format {
                InputFormat::Json => self
                    .input
                    .with_extension(self.target_table_format().extension()),
                InputFormat::Table(_) => self.input.with_extension("json"),
            },
        }
    }
}

/// Parses and resolves defaults for all CLI arguments. Additionally, handles
/// displaying help/version text if specified.
pub fn load() -> Opts {
    // Parse command line arguments (let clap fold in defaults)
    Opts::parse()
}
