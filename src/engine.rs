//! The join engine: one reader, a pool of join workers, one error sink.
//!
//! ```text
//! input ─► reader ─► bounded queue ─► worker × N ─► emitter ─► output
//!                                        │                └──► diagnostics
//!                                        └─► error sink ──────► diagnostics
//! ```
//!
//! The reader drops its queue sender at end of input, which closes the
//! queue. A worker leaves its loop once the queue is closed and drained. When
//! every worker has exited, the engine makes one last pass over the queue so
//! no batch that was still buffered is lost. A fatal error raises a halt flag:
//! the reader stops reading, workers stop taking batches, and lines already
//! being joined are allowed to finish.

use std::io::{Read, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};

use crate::config::JoinOptions;
use crate::emit::Emitter;
use crate::error::{ConfigError, ErrorPolicy, JoinError, SingleJoinError, Stage};
use crate::io::{InputProvider, OutputTarget};
use crate::resolve::{Resolver, RightIndex};
use crate::result::JoinResult;
use crate::stream::{self, ReadStop};

/// Counts for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinSummary {
    /// Lines read from the input
    pub lines: u64,
    /// Results written to the output
    pub emitted: u64,
    /// Results that did not satisfy the join type
    pub suppressed: u64,
    /// Per-line failures reported to the diagnostics channel
    pub errors: u64,
}

/// A configured join, ready to run against a stream.
#[derive(Debug)]
pub struct Joiner {
    options: JoinOptions,
    resolver: Resolver,
}

impl Joiner {
    /// Create a joiner from validated options and a built right-hand side.
    pub fn new(options: JoinOptions, resolver: Resolver) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self { options, resolver })
    }

    /// Get the run options.
    pub fn options(&self) -> &JoinOptions {
        &self.options
    }

    /// Get the right-hand side.
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Get the right-hand index, if this is an index join.
    pub fn index(&self) -> Option<&RightIndex> {
        self.resolver.index()
    }

    /// Join a single row: extract its key and resolve the right-hand side.
    ///
    /// A row whose key is empty yields a result with no left side.
    pub fn join_row(&self, row: &str) -> Result<JoinResult, SingleJoinError> {
        let key = self
            .options
            .left
            .extract(row)
            .map_err(|e| SingleJoinError::new(Stage::Extract, row, e))?;
        if key.is_empty() {
            return Ok(JoinResult::empty());
        }

        let right = self
            .resolver
            .resolve(&key)
            .map_err(|e| SingleJoinError::new(Stage::Resolve, row, e))?;
        Ok(JoinResult::new(key, row, right))
    }

    /// Open the given providers and run the join over them.
    pub fn run_with(
        &self,
        input: &dyn InputProvider,
        output: &dyn OutputTarget,
        diagnostics: &dyn OutputTarget,
    ) -> Result<JoinSummary, JoinError> {
        tracing::debug!(
            input = input.id(),
            output = output.id(),
            diagnostics = diagnostics.id(),
            "opening streams"
        );
        let reader = input.open().map_err(JoinError::Input)?;
        let out = output.open().map_err(JoinError::Output)?;
        let diag = diagnostics.open().map_err(JoinError::Output)?;
        self.run(reader, out, diag)
    }

    /// Stream `input` through the join, writing matching results to `output`
    /// and suppressed rows and per-line failures to `diagnostics`.
    ///
    /// Returns once the input is exhausted and every line has been handled,
    /// or with `JoinError::Aborted` carrying the first per-line failure under
    /// `ErrorPolicy::FastFail`.
    pub fn run<R, O, D>(
        &self,
        input: R,
        output: O,
        diagnostics: D,
    ) -> Result<JoinSummary, JoinError>
    where
        R: Read + Send + 'static,
        O: Write + Send,
        D: Write + Send,
    {
        let emitter = Emitter::new(
            self.options.join_type,
            self.options.verbose,
            output,
            diagnostics,
        );

        let mut summary = self.stream(input, &emitter)?;
        emitter.flush().map_err(JoinError::Output)?;

        summary.emitted = emitter.emitted();
        summary.suppressed = emitter.suppressed();
        tracing::info!(
            lines = summary.lines,
            emitted = summary.emitted,
            suppressed = summary.suppressed,
            errors = summary.errors,
            join = %self.options.join_type,
            right = self.resolver.kind(),
            "join finished"
        );
        Ok(summary)
    }

    fn stream<R, O, D>(&self, input: R, emitter: &Emitter<O, D>) -> Result<JoinSummary, JoinError>
    where
        R: Read + Send + 'static,
        O: Write + Send,
        D: Write + Send,
    {
        let (batch_tx, batch_rx) = bounded::<Vec<String>>(self.options.buffer_size);
        let (err_tx, err_rx) = unbounded::<SingleJoinError>();
        let halted = Arc::new(AtomicBool::new(false));
        let errors = AtomicU64::new(0);

        // The reader is not scoped: after a fatal error the run must be able
        // to return while the reader is still blocked on its input.
        let reader = {
            let halted = Arc::clone(&halted);
            let chunk_size = self.options.chunk_size;
            thread::spawn(move || {
                let res = stream::read_batches(input, chunk_size, &batch_tx, || {
                    halted.load(Ordering::Acquire)
                });
                if let Err(ReadStop::Io(e)) = &res {
                    tracing::error!(error = %e, "input read failed");
                    halted.store(true, Ordering::Release);
                }
                // batch_tx drops here, closing the queue
                res
            })
        };

        let (first_error, panicked) = thread::scope(|s| {
            let halted = &*halted;
            let errors = &errors;

            let sink = s.spawn(move || self.sink_errors(err_rx, emitter, halted, errors));

            let workers: Vec<_> = (0..self.options.concurrency)
                .map(|id| {
                    let rx = batch_rx.clone();
                    let err_tx = err_tx.clone();
                    s.spawn(move || self.work(id, rx, err_tx, emitter, halted))
                })
                .collect();

            let mut panicked = false;
            for handle in workers {
                panicked |= handle.join().is_err();
            }

            // Anything still queued after the workers exit is handled here
            // with the same logic. Never blocks: a halted reader may still
            // hold its sender.
            let mut leftover = 0usize;
            for batch in batch_rx.try_iter() {
                if halted.load(Ordering::Acquire) {
                    break;
                }
                leftover += batch.len();
                self.process_batch(&batch, &err_tx, emitter, halted);
            }
            if leftover > 0 {
                tracing::debug!(lines = leftover, "drained buffered lines after workers exited");
            }
            drop(batch_rx);

            drop(err_tx);
            (sink.join(), panicked)
        });
        let first_error = first_error.map_err(|_| JoinError::WorkerPanicked)?;

        let read = if halted.load(Ordering::Acquire) && !reader.is_finished() {
            tracing::debug!("leaving blocked reader behind after halt");
            Err(ReadStop::Halted)
        } else {
            reader.join().map_err(|_| JoinError::WorkerPanicked)?
        };

        let lines = match read {
            Ok(lines) => lines,
            Err(ReadStop::Io(e)) => return Err(JoinError::Input(e)),
            Err(ReadStop::Halted) => 0,
        };
        if let Some(err) = first_error {
            return Err(JoinError::Aborted(err));
        }
        if panicked {
            return Err(JoinError::WorkerPanicked);
        }

        Ok(JoinSummary {
            lines,
            errors: errors.load(Ordering::Relaxed),
            ..JoinSummary::default()
        })
    }

    fn work<O: Write, D: Write>(
        &self,
        id: usize,
        batches: Receiver<Vec<String>>,
        errors: Sender<SingleJoinError>,
        emitter: &Emitter<O, D>,
        halted: &AtomicBool,
    ) {
        tracing::debug!(worker = id, "join worker started");
        for batch in batches.iter() {
            if halted.load(Ordering::Acquire) {
                break;
            }
            self.process_batch(&batch, &errors, emitter, halted);
        }
        tracing::debug!(worker = id, "join worker exited");
    }

    fn process_batch<O: Write, D: Write>(
        &self,
        batch: &[String],
        errors: &Sender<SingleJoinError>,
        emitter: &Emitter<O, D>,
        halted: &AtomicBool,
    ) {
        for row in batch {
            if halted.load(Ordering::Acquire) {
                return;
            }
            let failure = match self.join_row(row) {
                Ok(result) => match emitter.emit(&result) {
                    Ok(_) => continue,
                    Err(e) => SingleJoinError::new(Stage::Emit, row.as_str(), e),
                },
                Err(e) => e,
            };
            // The sink only disconnects once every sender is gone
            let _ = errors.send(failure);
        }
    }

    /// Drain the error channel, reporting every failure and raising the halt
    /// flag on the first one that ends the run. Returns that failure.
    fn sink_errors<O: Write, D: Write>(
        &self,
        failures: Receiver<SingleJoinError>,
        emitter: &Emitter<O, D>,
        halted: &AtomicBool,
        count: &AtomicU64,
    ) -> Option<SingleJoinError> {
        let mut first = None;
        for err in failures.iter() {
            count.fetch_add(1, Ordering::Relaxed);
            let fatal = err.stage == Stage::Emit
                || matches!(self.options.error_policy, ErrorPolicy::FastFail);

            if !fatal {
                tracing::warn!(stage = %err.stage, error = %err.error, "skipping row");
                emitter.diagnostic(&format!("error: {err}"));
                continue;
            }
            if first.is_none() {
                tracing::error!(stage = %err.stage, error = %err.error, "fatal error in processing");
                emitter.diagnostic(&format!("fatal error in processing: {err}"));
                halted.store(true, Ordering::Release);
                first = Some(err);
            }
        }
        first
    }
}
