//! Input provider trait definition.

use std::fmt::Debug;
use std::io::Read;

/// Trait for the streaming input of a join.
///
/// Implementors provide a way to open a readable byte stream from various
/// sources such as files, stdin, or in-memory buffers.
pub trait InputProvider: Send + Sync + Debug {
    /// Returns an identifier for this input, used in logs.
    ///
    /// Convention: "-" for stdin, file path for files.
    fn id(&self) -> &str;

    /// Open and return a new readable stream.
    fn open(&self) -> std::io::Result<Box<dyn Read + Send>>;
}
