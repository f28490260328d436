//! Ready-made line sources and sinks.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::traits::{LineRead, LineWrite};

/// Streams lines from a file on demand. The whole document is never held
/// in memory.
#[derive(Debug)]
pub struct FileReader {
    lines: io::Lines<BufReader<File>>,
}

impl FileReader {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            lines: BufReader::new(file).lines(),
        })
    }
}

impl LineRead for FileReader {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        self.lines.next().transpose()
    }
}

/// Reads lines from an in-memory document.
#[derive(Debug)]
pub struct LinesReader {
    lines: std::vec::IntoIter<String>,
}

impl LinesReader {
    pub fn new(text: &str) -> Self {
        Self {
            lines: text
                .lines()
                .map(str::to_string)
                .collect::<Vec<_>>()
                .into_iter(),
        }
    }
}

impl From<Vec<String>> for LinesReader {
    fn from(lines: Vec<String>) -> Self {
        Self {
            lines: lines.into_iter(),
        }
    }
}

impl LineRead for LinesReader {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.lines.next())
    }
}

/// Collects written lines in memory.
#[derive(Debug, Default)]
pub struct PrintWriter {
    lines: Vec<String>,
}

impl PrintWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// The collected document as text, newline-terminated when non-empty.
    pub fn text(&self) -> String {
        if self.lines.is_empty() {
            String::new()
        } else {
            self.lines.join("\n") + "\n"
        }
    }
}

impl LineWrite for PrintWriter {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.lines.push(line.to_string());
        Ok(())
    }
}

enum Sink {
    Immediate(BufWriter<File>),
    Deferred { path: PathBuf, lines: Vec<String> },
}

impl std::fmt::Debug for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sink::Immediate(_) => f.write_str("Immediate"),
            Sink::Deferred { path, lines } => f
                .debug_struct("Deferred")
                .field("path", path)
                .field("pending", &lines.len())
                .finish(),
        }
    }
}

/// Writes lines to a file, either as they arrive or all at once on flush.
///
/// Deferred mode does not touch the target path until [`LineWrite::flush`],
/// which is what a caller wants when the pass may still fail halfway
/// through.
#[derive(Debug)]
pub struct FileWriter {
    sink: Sink,
}

impl FileWriter {
    /// Creates (or truncates) the file right away and streams lines to it.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            sink: Sink::Immediate(BufWriter::new(file)),
        })
    }

    /// Holds lines in memory and writes the file only on flush.
    pub fn deferred(path: impl Into<PathBuf>) -> Self {
        Self {
            sink: Sink::Deferred {
                path: path.into(),
                lines: Vec::new(),
            },
        }
    }
}

impl LineWrite for FileWriter {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        match &mut self.sink {
            Sink::Immediate(writer) => writeln!(writer, "{line}"),
            Sink::Deferred { lines, .. } => {
                lines.push(line.to_string());
                Ok(())
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.sink {
            Sink::Immediate(writer) => writer.flush(),
            Sink::Deferred { path, lines } => {
                let mut writer = BufWriter::new(File::create(&path)?);
                for line in lines.iter() {
                    writeln!(writer, "{line}")?;
                }
                writer.flush()
            }
        }
    }
}
