//! Result emission.
//!
//! Workers share one `Emitter`. Each output and diagnostics line is written
//! whole under its writer's lock, so lines from different workers never
//! interleave.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::result::{JoinResult, JoinType};

/// A writer shared between threads that only accepts whole lines.
#[derive(Debug)]
pub struct SharedWriter<W> {
    inner: Mutex<W>,
}

impl<W: Write> SharedWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner: Mutex::new(inner),
        }
    }

    /// Write `line` followed by a newline if it doesn't already end in one.
    pub fn write_line(&self, line: &[u8]) -> io::Result<()> {
        let mut w = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        w.write_all(line)?;
        if !line.ends_with(b"\n") {
            w.write_all(b"\n")?;
        }
        Ok(())
    }

    pub fn flush(&self) -> io::Result<()> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .flush()
    }

    pub fn into_inner(self) -> W {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Writes matching results to the output and, in verbose mode, reports
/// suppressed ones on the diagnostics channel.
#[derive(Debug)]
pub struct Emitter<O, D> {
    join_type: JoinType,
    verbose: bool,
    output: SharedWriter<O>,
    diagnostics: SharedWriter<D>,
    emitted: AtomicU64,
    suppressed: AtomicU64,
}

impl<O: Write, D: Write> Emitter<O, D> {
    pub fn new(join_type: JoinType, verbose: bool, output: O, diagnostics: D) -> Self {
        Self {
            join_type,
            verbose,
            output: SharedWriter::new(output),
            diagnostics: SharedWriter::new(diagnostics),
            emitted: AtomicU64::new(0),
            suppressed: AtomicU64::new(0),
        }
    }

    /// Emit or suppress `result` according to the join type.
    ///
    /// Returns whether the result was written to the output. Errors come
    /// only from the output writer.
    pub fn emit(&self, result: &JoinResult) -> io::Result<bool> {
        if result.is_match(self.join_type) {
            let line = result.to_json_line().map_err(io::Error::other)?;
            self.output.write_line(&line)?;
            self.emitted.fetch_add(1, Ordering::Relaxed);
            return Ok(true);
        }

        self.suppressed.fetch_add(1, Ordering::Relaxed);
        if let (true, Some(left)) = (self.verbose, &result.left) {
            tracing::debug!(key = %left.index, "no join");
            self.diagnostic(&format!("no join: {}", left.row));
        }
        Ok(false)
    }

    /// Write a human-readable line to the diagnostics channel.
    ///
    /// Failures to write diagnostics are logged and otherwise ignored.
    pub fn diagnostic(&self, message: &str) {
        if let Err(e) = self.diagnostics.write_line(message.as_bytes()) {
            tracing::warn!(error = %e, "failed to write diagnostics");
        }
    }

    pub fn emitted(&self) -> u64 {
        self.emitted.load(Ordering::Relaxed)
    }

    pub fn suppressed(&self) -> u64 {
        self.suppressed.load(Ordering::Relaxed)
    }

    pub fn flush(&self) -> io::Result<()> {
        // Diagnostics are best effort
        let _ = self.diagnostics.flush();
        self.output.flush()
    }
}
