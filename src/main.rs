use hubconv::cli::{self, InputFormat, Opts};
use hubconv::convert;
use hubconv::io::{json, table};
use hubconv::shell::Shell;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

/// Parses CLI args, then runs the conversion selected by the input format,
/// printing the error chain and exiting with a failure code if it fails
fn main() {
    human_panic::setup_panic!();

    // Parse command line arguments
    let opts: Opts = cli::load();
    let shell = Shell::new(&opts.shell_options);

    if let Err(err) = run(&opts, &shell) {
        shell.error(format!("{:#}", err));
        std::process::exit(1);
    }
}

/// Runs a single conversion from the input file to the resolved output file
fn run(opts: &Opts, shell: &Shell) -> Result<()> {
    let started = Instant::now();
    let output = opts.output_path();

    match opts.format {
        InputFormat::Json => flatten_file(opts, &output, shell)?,
        InputFormat::Table(format) => unflatten_file(opts, format, &output, shell)?,
    }

    shell.verbose(|sh| {
        sh.info(format!(
            "finished in {}",
            humantime::format_duration(started.elapsed())
        ))
    });
    Ok(())
}

/// Flattens a JSON datahub into a spreadsheet or delimited table
fn flatten_file(opts: &Opts, output: &Path, shell: &Shell) -> Result<()> {
    let input = File::open(&opts.input)
        .with_context(|| format!("could not open {}", opts.input.display()))?;
    let tracks = json::read_tracks(BufReader::new(input))
        .with_context(|| format!("could not read tracks from {}", opts.input.display()))?;
    shell.verbose(|sh| sh.info(format!("read {} tracks", tracks.len())));

    let flat = convert::flatten(&tracks)?;
    for (row, key) in convert::marked_entries(&flat) {
        shell.warn(format!(
            "track #{} has incomplete metadata for `{}`; marked as Error for manual correction",
            row, key
        ));
    }

    let format = opts.target_table_format();
    let mut writer = BufWriter::new(create(output)?);
    table::write_table(&mut writer, &flat, format)
        .with_context(|| format!("could not write table to {}", output.display()))?;
    writer.flush()?;

    shell.status(
        "Flattened",
        format!(
            "{} tracks into {} columns at {}",
            flat.len(),
            flat.columns().len(),
            output.display()
        ),
    );
    Ok(())
}

/// Unflattens a spreadsheet or delimited table into a JSON datahub
fn unflatten_file(
    opts: &Opts,
    format: table::TableFormat,
    output: &Path,
    shell: &Shell,
) -> Result<()> {
    let input = File::open(&opts.input)
        .with_context(|| format!("could not open {}", opts.input.display()))?;
    let flat = table::read_table(BufReader::new(input), format)
        .with_context(|| format!("could not read table from {}", opts.input.display()))?;
    shell.verbose(|sh| {
        sh.info(format!(
            "read {} rows across {} columns",
            flat.len(),
            flat.columns().len()
        ))
    });

    let tracks = convert::unflatten(&flat);
    let mut writer = BufWriter::new(create(output)?);
    json::write_tracks(&mut writer, &tracks, !opts.compact)
        .with_context(|| format!("could not write tracks to {}", output.display()))?;
    writer.flush()?;

    shell.status(
        "Unflattened",
        format!("{} tracks into {}", tracks.len(), output.display()),
    );
    Ok(())
}

fn create(path: &Path) -> Result<File> {
    File::create(path).with_context(|| format!("could not create {}", path.display()))
}
