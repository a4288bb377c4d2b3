//! Colored terminal output.

use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Writes user-facing status lines, honoring verbose and quiet modes.
///
/// Quiet mode drops progress, warnings and headers; results and errors are
/// always written.
///
/// Errors go to stderr, everything else to stdout. Colors are disabled when
/// the stream is not a terminal.
#[derive(Debug, Clone, Copy)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
}

impl OutputManager {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Only printed in verbose mode.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if !self.verbose {
            return Ok(());
        }
        self.tagged(stdout(), "debug", Color::Cyan, message)
    }

    pub fn progress(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.tagged(stdout(), "=>", Color::Blue, message)
    }

    /// Result line. Printed in quiet mode too, like errors.
    pub fn success(&self, message: &str) -> io::Result<()> {
        self.tagged(stdout(), "ok", Color::Green, message)
    }

    pub fn warn(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.tagged(stdout(), "warning", Color::Yellow, message)
    }

    /// Always printed, even in quiet mode.
    pub fn error(&self, message: &str) -> io::Result<()> {
        self.tagged(StandardStream::stderr(color_choice()), "error", Color::Red, message)
    }

    /// Bold section header.
    pub fn section(&self, title: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut stdout = stdout();
        stdout.set_color(ColorSpec::new().set_bold(true))?;
        writeln!(stdout, "\n{title}")?;
        stdout.reset()
    }

    pub fn indent(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut stdout = stdout();
        writeln!(stdout, "    {message}")
    }

    fn tagged(
        &self,
        mut stream: StandardStream,
        tag: &str,
        color: Color,
        message: &str,
    ) -> io::Result<()> {
        stream.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(stream, "{tag}")?;
        stream.reset()?;
        writeln!(stream, " {message}")
    }
}

fn stdout() -> StandardStream {
    StandardStream::stdout(color_choice())
}

fn color_choice() -> ColorChoice {
    if std::io::IsTerminal::is_terminal(&io::stdout()) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}
