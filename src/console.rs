//! Console capabilities
//!
//! The menu never touches stdin/stdout directly. It is handed a [`LineReader`]
//! and a [`LineWriter`], so the same code runs against the real terminal or
//! against scripted input in tests.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Source of input lines.
pub trait LineReader {
    /// Read one line without its trailing newline. `Ok(None)` means end of input.
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

/// Sink for output lines.
pub trait LineWriter {
    /// Write one complete line.
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    /// Write a prompt that the user answers on the same line.
    fn write_prompt(&mut self, prompt: &str) -> io::Result<()>;
}

/// Reader over any buffered input, stdin by default.
pub struct StdinReader<R = io::StdinLock<'static>> {
    inner: R,
    line: Vec<u8>,
}

impl StdinReader {
    pub fn new() -> Self {
        Self::from_reader(io::stdin().lock())
    }
}

impl Default for StdinReader {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: BufRead> StdinReader<R> {
    pub fn from_reader(inner: R) -> Self {
        Self {
            inner,
            line: Vec::new(),
        }
    }
}

/// Bytes that are not UTF-8 come through as U+FFFD rather than failing the read.
impl<R: BufRead> LineReader for StdinReader<R> {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        self.line.clear();
        if self.inner.read_until(b'\n', &mut self.line)? == 0 {
            return Ok(None);
        }
        let text = String::from_utf8_lossy(&self.line);
        Ok(Some(text.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Writer over stdout.
pub struct StdoutWriter {
    out: io::Stdout,
}

impl StdoutWriter {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for StdoutWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl LineWriter for StdoutWriter {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{}", line)
    }

    fn write_prompt(&mut self, prompt: &str) -> io::Result<()> {
        write!(self.out, "{}", prompt)?;
        self.out.flush()
    }
}

/// Pre-recorded input lines, consumed front to back.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
    failure: Option<io::ErrorKind>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            failure: None,
        }
    }

    /// Fail with `kind` once the scripted lines run out, instead of reporting
    /// end of input.
    pub fn failing_with(mut self, kind: io::ErrorKind) -> Self {
        self.failure = Some(kind);
        self
    }
}

impl LineReader for ScriptedInput {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        match self.lines.pop_front() {
            Some(line) => Ok(Some(line)),
            None => match self.failure {
                Some(kind) => Err(io::Error::new(kind, "scripted input failure")),
                None => Ok(None),
            },
        }
    }
}

/// Output captured in memory. Prompts are kept as their own entries.
#[derive(Debug, Clone, Default)]
pub struct CapturedOutput {
    pub lines: Vec<String>,
}

impl CapturedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured output joined with newlines.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// True if any captured line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }
}

impl LineWriter for CapturedOutput {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.lines.push(line.to_string());
        Ok(())
    }

    fn write_prompt(&mut self, prompt: &str) -> io::Result<()> {
        self.lines.push(prompt.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_input_then_eof() {
        let mut input = ScriptedInput::new(["1", "2"]);
        assert_eq!(input.read_line().unwrap().as_deref(), Some("1"));
        assert_eq!(input.read_line().unwrap().as_deref(), Some("2"));
        assert_eq!(input.read_line().unwrap(), None);
    }

    #[test]
    fn test_scripted_input_failure() {
        let mut input = ScriptedInput::new(Vec::<String>::new()).failing_with(io::ErrorKind::BrokenPipe);
        let err = input.read_line().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_stdin_reader_strips_newlines() {
        let data = io::Cursor::new("3\r\nhello\n");
        let mut reader = StdinReader::from_reader(data);
        assert_eq!(reader.read_line().unwrap().as_deref(), Some("3"));
        assert_eq!(reader.read_line().unwrap().as_deref(), Some("hello"));
        assert_eq!(reader.read_line().unwrap(), None);
    }

    #[test]
    fn test_stdin_reader_accepts_invalid_utf8() {
        let data = io::Cursor::new(b"\xff\nab\xfe\r\n".to_vec());
        let mut reader = StdinReader::from_reader(data);
        assert_eq!(reader.read_line().unwrap().as_deref(), Some("\u{FFFD}"));
        assert_eq!(reader.read_line().unwrap().as_deref(), Some("ab\u{FFFD}"));
        assert_eq!(reader.read_line().unwrap(), None);
    }

    #[test]
    fn test_captured_output() {
        let mut out = CapturedOutput::new();
        out.write_prompt("Enter your choice: ").unwrap();
        out.write_line("Invalid choice.").unwrap();
        assert!(out.contains("Invalid choice."));
        assert_eq!(out.text(), "Enter your choice: \nInvalid choice.");
    }
}
