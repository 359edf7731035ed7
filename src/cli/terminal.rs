//! Console I/O boundary.
//!
//! The menu never touches stdin/stdout directly; it talks to a [`Terminal`]
//! over any `BufRead`/`Write` pair, so sessions can be scripted in tests.

use console::style;
use std::fmt::Display;
use std::io::{self, BufRead, Write};

/// Line-oriented prompt/response console.
pub struct Terminal<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Show a prompt and read one line, trimmed.
    ///
    /// Returns `None` once input is exhausted.
    pub fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Ask a yes/no question. Only `y` (any case) counts as yes.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        Ok(self
            .read_line(question)?
            .is_some_and(|answer| answer.eq_ignore_ascii_case("y")))
    }

    /// Print one line as is.
    pub fn println(&mut self, line: impl Display) -> io::Result<()> {
        writeln!(self.output, "{}", line)
    }

    /// Print an error message.
    pub fn error(&mut self, msg: impl Display) -> io::Result<()> {
        writeln!(self.output, "{} {}", style("Error:").red().bold(), msg)
    }

    /// Print a warning message.
    pub fn warn(&mut self, msg: impl Display) -> io::Result<()> {
        writeln!(self.output, "{} {}", style("Warning:").yellow().bold(), msg)
    }

    /// Print a success message.
    pub fn success(&mut self, msg: impl Display) -> io::Result<()> {
        writeln!(self.output, "{} {}", style("✓").green().bold(), msg)
    }

    /// Print an info message.
    pub fn info(&mut self, msg: impl Display) -> io::Result<()> {
        writeln!(self.output, "{} {}", style("ℹ").blue().bold(), msg)
    }

    /// Give back the underlying reader and writer.
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

/// Print a fatal error to stderr, for use when the console itself is gone.
pub fn print_error(msg: impl Display) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}
