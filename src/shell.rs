use clap::Args;
use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};
use strum_macros::EnumString;

use termcolor::{self, Color, ColorSpec, StandardStream, WriteColor};

/// Width the line label is padded to, so messages line up
const LABEL_WIDTH: usize = 12usize;

/// Console output options, flattened into every command's CLI options
#[derive(Args, Clone, Debug)]
pub struct Options {
    /// Whether to only display errors
    #[clap(
        action,
        short = 'q',
        long = "quiet",
        help = "run in quiet mode (only errors are printed)"
    )]
    pub quiet: bool,

    /// Whether to display extra output
    #[clap(
        action,
        short = 'v',
        long = "verbose",
        help = "run in verbose mode (prints per-track details)"
    )]
    pub verbose: bool,

    /// Color display mode for stdout/stderr output
    #[clap(
        value_parser,
        long = "color",
        help = "color display mode for stdout/stderr output (auto, always, never)",
        default_value = "auto"
    )]
    pub color_mode: ColorMode,
}

/// The requested verbosity of the program output
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verbosity {
    Verbose,
    Normal,
    Quiet,
}

impl Verbosity {
    fn from_opts(opts: &Options) -> Self {
        match (opts.quiet, opts.verbose) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        }
    }
}

/// Mode of the color output of the process, controllable via a CLI flag
#[derive(EnumString, Debug, Clone, Copy, PartialEq)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn choice(self, stream: atty::Stream) -> termcolor::ColorChoice {
        match self {
            ColorMode::Always => termcolor::ColorChoice::Always,
            ColorMode::Never => termcolor::ColorChoice::Never,
            ColorMode::Auto if atty::is(stream) => termcolor::ColorChoice::Auto,
            ColorMode::Auto => termcolor::ColorChoice::Never,
        }
    }
}

/// Handle to formatted console output. Status and info lines go to stdout,
/// warnings and errors to stderr.
pub struct Shell {
    verbosity: Verbosity,
    out:       Mutex<Sink>,
    err:       Mutex<Sink>,
}

impl Shell {
    /// Creates the shell for the process's standard streams from the CLI
    /// options
    pub fn new(opts: &Options) -> Self {
        Shell {
            verbosity: Verbosity::from_opts(opts),
            out:       Mutex::new(Sink::stream(opts.color_mode, atty::Stream::Stdout)),
            err:       Mutex::new(Sink::stream(opts.color_mode, atty::Stream::Stderr)),
        }
    }

    /// Prints a green status label followed by the message
    pub fn status<T, U>(&self, status: T, message: U)
    where
        T: fmt::Display,
        U: fmt::Display,
    {
        if self.verbosity != Verbosity::Quiet {
            emit(&self.out, &status.to_string(), &message, Color::Green, None);
        }
    }

    /// Prints a cyan 'info' line
    pub fn info<T: fmt::Display>(&self, message: T) {
        if self.verbosity != Verbosity::Quiet {
            emit(&self.out, "info", &message, Color::Cyan, None);
        }
    }

    /// Prints an amber 'warning' line
    pub fn warn<T: fmt::Display>(&self, message: T) {
        if self.verbosity != Verbosity::Quiet {
            emit(&self.err, "warning", &message, Color::Yellow, None);
        }
    }

    /// Prints a red 'error' line, even in quiet mode
    pub fn error<T: fmt::Display>(&self, message: T) {
        emit(&self.err, "error", &message, Color::Red, Some(Color::Red));
    }

    /// Runs the callback only in verbose mode
    pub fn verbose<F>(&self, callback: F)
    where
        F: Fn(&Shell),
    {
        if self.verbosity == Verbosity::Verbose {
            callback(self);
        }
    }
}

fn emit(
    sink: &Mutex<Sink>,
    label: &str,
    message: &dyn fmt::Display,
    label_color: Color,
    text_color: Option<Color>,
) {
    let mut sink = sink.lock().unwrap_or_else(PoisonError::into_inner);
    // Console output is best-effort
    let _ = sink.write_line(label, message, label_color, text_color);
}

struct Sink {
    stream:      Box<dyn WriteColor + Send>,
    /// Labels are right-aligned on terminals and left-aligned otherwise
    right_align: bool,
    /// Terminal width to wrap messages at, if known
    width:       Option<usize>,
}

impl Sink {
    fn stream(color_mode: ColorMode, stream_type: atty::Stream) -> Self {
        let choice = color_mode.choice(stream_type);
        let stream = match stream_type {
            atty::Stream::Stdout => StandardStream::stdout(choice),
            _ => StandardStream::stderr(choice),
        };
        let is_tty = atty::is(stream_type);

        Sink {
            stream:      Box::new(stream),
            right_align: is_tty,
            width:       if is_tty { imp::width(stream_type) } else { None },
        }
    }

    /// Writes the bold label padded to `LABEL_WIDTH`, then the message,
    /// wrapped and indented under the label when the width is known
    fn write_line(
        &mut self,
        label: &str,
        message: &dyn fmt::Display,
        label_color: Color,
        text_color: Option<Color>,
    ) -> io::Result<()> {
        let offset = LABEL_WIDTH.max(label.len());

        self.stream.reset()?;
        self.stream
            .set_color(ColorSpec::new().set_bold(true).set_fg(Some(label_color)))?;
        match self.right_align {
            true => write!(self.stream, "{:>width$}", label, width = offset)?,
            false => write!(self.stream, "{:width$}", label, width = offset)?,
        }

        self.stream.reset()?;
        if let Some(color) = text_color {
            self.stream.set_color(ColorSpec::new().set_fg(Some(color)))?;
        }

        let message = message.to_string();
        match self.width.map(|w| w.saturating_sub(offset + 1)) {
            None | Some(0) => writeln!(self.stream, " {}", message)?,
            Some(available) => {
                let indent = " ".repeat(offset);
                for (i, line) in textwrap::wrap(&message, available).iter().enumerate() {
                    match i {
                        0 => writeln!(self.stream, " {}", line)?,
                        _ => writeln!(self.stream, "{} {}", indent, line)?,
                    }
                }
            },
        }

        self.stream.reset()
    }
}

#[cfg(unix)]
mod imp {
    use std::mem;

    /// Columns of the terminal attached to the stream, via `TIOCGWINSZ`
    pub fn width(stream: atty::Stream) -> Option<usize> {
        let fileno = match stream {
            atty::Stream::Stdout => libc::STDOUT_FILENO,
            _ => libc::STDERR_FILENO,
        };

        let mut winsize: libc::winsize = unsafe { mem::zeroed() };
        if unsafe { libc::ioctl(fileno, libc::TIOCGWINSZ, &mut winsize) } < 0 {
            return None;
        }
        match winsize.ws_col {
            0 => None,
            cols => Some(cols as usize),
        }
    }
}

#[cfg(not(unix))]
mod imp {
    pub fn width(_stream: atty::Stream) -> Option<usize> { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use termcolor::NoColor;

    /// Shared in-memory sink so tests can inspect what the shell wrote
    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> { Ok(()) }
    }

    impl Capture {
        fn text(&self) -> String { String::from_utf8(self.0.lock().unwrap().clone()).unwrap() }

        fn sink(&self, width: Option<usize>) -> Mutex<Sink> {
            Mutex::new(Sink {
                stream: Box::new(NoColor::new(self.clone())),
                right_align: false,
                width,
            })
        }
    }

    fn shell(verbosity: Verbosity, out: &Capture, err: &Capture) -> Shell {
        Shell {
            verbosity,
            out: out.sink(None),
            err: err.sink(None),
        }
    }

    #[test]
    fn writes_status_and_errors_to_separate_sinks() {
        let (out, err) = (Capture::default(), Capture::default());
        let shell = shell(Verbosity::Normal, &out, &err);

        shell.status("Flattened", "3 tracks");
        shell.warn("incomplete metadata");
        shell.error("bad input");

        assert_eq!(out.text(), format!("{:12} 3 tracks\n", "Flattened"));
        assert_eq!(
            err.text(),
            format!("{:12} incomplete metadata\n{:12} bad input\n", "warning", "error")
        );
    }

    #[test]
    fn quiet_mode_keeps_only_errors() {
        let (out, err) = (Capture::default(), Capture::default());
        let shell = shell(Verbosity::Quiet, &out, &err);

        shell.status("Flattened", "3 tracks");
        shell.info("details");
        shell.warn("incomplete metadata");
        shell.error("bad input");

        assert_eq!(out.text(), "");
        assert!(!err.text().contains("incomplete metadata"));
        assert!(err.text().contains("bad input"));
    }

    #[test]
    fn verbose_callbacks_run_only_in_verbose_mode() {
        let out = Capture::default();
        shell(Verbosity::Normal, &out, &Capture::default()).verbose(|sh| sh.info("hidden"));
        shell(Verbosity::Verbose, &out, &Capture::default()).verbose(|sh| sh.info("details"));

        assert!(!out.text().contains("hidden"));
        assert!(out.text().contains("details"));
    }

    #[test]
    fn long_messages_wrap_under_the_label() {
        let out = Capture::default();
        let sink = out.sink(Some(40));
        sink.lock()
            .unwrap()
            .write_line("warning", &"track #3 has incomplete metadata", Color::Yellow, None)
            .unwrap();

        let indent = " ".repeat(LABEL_WIDTH);
        assert_eq!(
            out.text(),
            format!("{:12} track #3 has incomplete\n{} metadata\n", "warning", indent)
        );
    }

    #[test]
    fn color_mode_parses_case_insensitively() {
        assert_eq!("NEVER".parse::<ColorMode>().unwrap(), ColorMode::Never);
        assert!("sometimes".parse::<ColorMode>().is_err());
    }
}
