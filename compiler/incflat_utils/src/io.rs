//! IO module for opening the files an include expansion reads and writes
//!
//! This module provides functions to open input and output files, handling
//! standard output (denoted by "-") for the output side. It also provides
//! [`ByteLines`], a line iterator which keeps the raw bytes of every line so
//! that non-UTF-8 input can be copied through untouched.

use std::{
    fs,
    io::{self, BufRead, BufReader, Read, Write},
    path::Path,
};

/// Returns `true` if `path` is the "-" placeholder for standard input/output
#[must_use]
pub fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Opens a file for buffered reading
///
/// A directory reads as an empty file.
///
/// # Errors
///
/// If the file cannot be opened, an error is returned.
pub fn open_input(path: &Path) -> Result<BufReader<Box<dyn Read>>, io::Error> {
    let file = fs::File::open(path)?;
    Ok(BufReader::new(if file.metadata()?.is_dir() {
        Box::new(io::empty())
    } else {
        Box::new(file)
    }))
}

/// Opens the output file and returns a writer
///
/// If the path is "-", it writes to standard output.
/// If the path is a regular file, it opens (or creates) the file for writing,
/// truncating it if it already exists.
///
/// # Errors
///
/// If the file cannot be opened or created, an error is returned.
pub fn open_output(path: &Path) -> Result<Box<dyn Write>, io::Error> {
    Ok(if is_stdio(path) {
        Box::new(io::stdout())
    } else {
        Box::new(
            fs::OpenOptions::new()
                .write(true)
                .truncate(true)
                .create(true)
                .open(path)?,
        )
    })
}

/// An iterator over the lines of a [`BufRead`], as raw bytes
///
/// Both `\n` and `\r\n` terminators are stripped. A final line without a
/// terminator is still yielded; an empty trailing segment after the last
/// terminator is not.
#[derive(Debug)]
pub struct ByteLines<R> {
    /// The underlying reader
    reader: R,
}

impl<R: BufRead> ByteLines<R> {
    /// Wrap a reader
    #[must_use]
    pub const fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> Iterator for ByteLines<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buf = Vec::new();
        match self.reader.read_until(b'\n', &mut buf) {
            Ok(0) => None,
            Ok(_) => {
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                    if buf.last() == Some(&b'\r') {
                        buf.pop();
                    }
                }
                Some(Ok(buf))
            }
            Err(err) => Some(Err(err)),
        }
    }
}
