//! Output target trait definition.

use std::fmt::Debug;
use std::io::Write;

/// Trait for the result and diagnostics streams of a join.
pub trait OutputTarget: Send + Sync + Debug {
    /// Returns an identifier for this target, used in logs.
    ///
    /// Convention: "-" for stdout, "stderr" for stderr, file path for files.
    fn id(&self) -> &str;

    /// Open the target for writing.
    fn open(&self) -> std::io::Result<Box<dyn Write + Send>>;
}
