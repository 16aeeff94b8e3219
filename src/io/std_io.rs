//! Process standard streams.
//!
//! The command-line front-end streams stdin, writes results to stdout and
//! diagnostics to stderr. Stdout is buffered; stderr is not, so diagnostics
//! show up as they happen.

use std::io::{self, BufWriter, Read, Write};

use super::{InputProvider, OutputTarget};

/// Input provider for reading from stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinInput;

impl InputProvider for StdinInput {
    fn id(&self) -> &str {
        "-"
    }

    fn open(&self) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(io::stdin()))
    }
}

/// Output target for writing results to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutOutput;

impl OutputTarget for StdoutOutput {
    fn id(&self) -> &str {
        "-"
    }

    fn open(&self) -> io::Result<Box<dyn Write + Send>> {
        Ok(Box::new(BufWriter::new(io::stdout())))
    }
}

/// Output target for writing diagnostics to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrOutput;

impl OutputTarget for StderrOutput {
    fn id(&self) -> &str {
        "stderr"
    }

    fn open(&self) -> io::Result<Box<dyn Write + Send>> {
        Ok(Box::new(io::stderr()))
    }
}
