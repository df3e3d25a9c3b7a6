//! Destinations for the solver's report output.
//!
//! Progress lines and the `print_*` reports of a
//! [`Model`](crate::solver::Model) go to a single target, which can be
//! redirected at any time through [`ConfigurablePrintTarget`].

use std::fs::File;
use std::io::{stdout, Error, ErrorKind, Result, Write};
use std::path::Path;

#[derive(Default)]
pub(crate) enum PrintTarget {
    #[default]
    Stdout,
    File(File),
    Buffer(Vec<u8>),
    Stream(Box<dyn Write + Send + Sync>),
    Sink,
}

impl std::fmt::Debug for PrintTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PrintTarget::Stdout => "Stdout",
            PrintTarget::File(_) => "File",
            PrintTarget::Buffer(_) => "Buffer",
            PrintTarget::Stream(_) => "Stream",
            PrintTarget::Sink => "Sink",
        };
        write!(f, "PrintTarget::{}", name)
    }
}

impl Write for PrintTarget {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        match self {
            PrintTarget::Stdout => stdout().write(buf),
            PrintTarget::File(file) => file.write(buf),
            PrintTarget::Buffer(buffer) => {
                buffer.extend_from_slice(buf);
                Ok(buf.len())
            }
            PrintTarget::Stream(stream) => stream.write(buf),
            PrintTarget::Sink => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> Result<()> {
        match self {
            PrintTarget::Stdout => stdout().flush(),
            PrintTarget::File(file) => file.flush(),
            PrintTarget::Stream(stream) => stream.flush(),
            PrintTarget::Buffer(_) | PrintTarget::Sink => Ok(()),
        }
    }
}

/// Redirection of report output.
pub trait ConfigurablePrintTarget {
    fn print_to_stdout(&mut self);
    fn print_to_file(&mut self, file: File);
    fn print_to_stream(&mut self, stream: Box<dyn Write + Send + Sync>);
    /// Collect output in memory until [`get_print_buffer`](Self::get_print_buffer).
    fn print_to_buffer(&mut self);
    /// Discard all output.
    fn print_to_sink(&mut self);
    fn get_print_buffer(&mut self) -> Result<String>;

    /// Create (or truncate) the file at `path` and print to it. An empty
    /// path discards output.
    fn print_to_path<P: AsRef<Path>>(&mut self, path: P) -> Result<()>
    where
        Self: Sized,
    {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            self.print_to_sink();
        } else {
            self.print_to_file(File::create(path)?);
        }
        Ok(())
    }
}

impl ConfigurablePrintTarget for PrintTarget {
    fn print_to_stdout(&mut self) {
        *self = PrintTarget::Stdout;
    }

    fn print_to_file(&mut self, file: File) {
        *self = PrintTarget::File(file);
    }

    fn print_to_stream(&mut self, stream: Box<dyn Write + Send + Sync>) {
        *self = PrintTarget::Stream(stream);
    }

    fn print_to_buffer(&mut self) {
        *self = PrintTarget::Buffer(Vec::new());
    }

    fn print_to_sink(&mut self) {
        *self = PrintTarget::Sink;
    }

    /// Returns and clears the buffered text.
    fn get_print_buffer(&mut self) -> Result<String> {
        match self {
            PrintTarget::Buffer(buffer) => {
                let text = String::from_utf8_lossy(buffer).into_owned();
                buffer.clear();
                Ok(text)
            }
            _ => Err(Error::new(ErrorKind::Other, "output is not being buffered")),
        }
    }
}

#[test]
fn test_print_target_buffer() {
    let mut target = PrintTarget::default();
    assert!(target.get_print_buffer().is_err());

    target.print_to_buffer();
    write!(target, "objective {}", 1.5).unwrap();
    assert_eq!(target.get_print_buffer().unwrap(), "objective 1.5");
    assert_eq!(target.get_print_buffer().unwrap(), "");

    target.print_to_sink();
    writeln!(target, "dropped").unwrap();
    assert!(target.get_print_buffer().is_err());
}
