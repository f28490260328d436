use std::io;

/// A source of document lines, yielded one at a time without their line
/// terminators.
///
/// The engine pulls lines through this trait so that files, in-memory
/// documents and anything else line-shaped all patch the same way.
pub trait LineRead {
    /// The next line, or `None` once the document is exhausted.
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

/// A sink for document lines.
///
/// Implementations decide what "write" means: append to a buffer, stream
/// to a file handle, or hold everything back until [`LineWrite::flush`].
pub trait LineWrite {
    /// Write one line; the sink supplies the line terminator.
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    /// Make all written lines durable. A no-op by default.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<R: LineRead + ?Sized> LineRead for &mut R {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        (**self).next_line()
    }
}

impl<W: LineWrite + ?Sized> LineWrite for &mut W {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        (**self).write_line(line)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}
