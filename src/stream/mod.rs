//! Line reconstruction for the streaming (left-hand) input.
//!
//! The input arrives as raw byte chunks of arbitrary size. `LineSplitter`
//! turns them into complete, whitespace-trimmed lines, carrying the tail of
//! any incomplete line over to the next chunk. `read_batches` drives a reader
//! through the splitter and pushes each chunk's lines onto a bounded queue.

use std::io::{self, Read};

use crossbeam_channel::Sender;

/// Default number of bytes requested from the input per read.
pub const DEFAULT_CHUNK_SIZE: usize = 5000;

/// Reassembles complete lines from arbitrarily chunked bytes.
///
/// The remainder is held as raw bytes so a multi-byte UTF-8 sequence split
/// across two chunks is decoded only once it is whole.
#[derive(Debug, Default)]
pub struct LineSplitter {
    remainder: Vec<u8>,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bytes of the current incomplete line.
    pub fn remainder(&self) -> &[u8] {
        &self.remainder
    }

    /// Feed one chunk and return every line it completes.
    ///
    /// Everything up to the last newline (prefixed by the previous remainder)
    /// is split into lines and trimmed; the bytes after the last newline
    /// become the new, untrimmed remainder.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let Some(last_nl) = chunk.iter().rposition(|&b| b == b'\n') else {
            self.remainder.extend_from_slice(chunk);
            return Vec::new();
        };

        let mut block = std::mem::take(&mut self.remainder);
        block.extend_from_slice(&chunk[..last_nl]);
        self.remainder.extend_from_slice(&chunk[last_nl + 1..]);

        block
            .split(|&b| b == b'\n')
            .filter_map(decode_line)
            .collect()
    }

    /// Flush the remainder as a final line once the input is exhausted.
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.remainder);
        decode_line(&rest)
    }
}

fn decode_line(raw: &[u8]) -> Option<String> {
    let line = String::from_utf8_lossy(raw);
    let trimmed = line.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Why the reader stopped before end of input.
#[derive(Debug)]
pub enum ReadStop {
    /// The input returned an error.
    Io(io::Error),
    /// The queue was disconnected or the run was halted.
    Halted,
}

/// Read `input` to the end in `chunk_size` reads, sending each non-empty
/// batch of complete lines to `queue`.
///
/// Sending blocks while the queue is full. `halted` is polled between reads
/// so a failed run stops consuming input. Returns the number of lines sent.
pub fn read_batches<R, F>(
    mut input: R,
    chunk_size: usize,
    queue: &Sender<Vec<String>>,
    halted: F,
) -> Result<u64, ReadStop>
where
    R: Read,
    F: Fn() -> bool,
{
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut splitter = LineSplitter::new();
    let mut sent = 0u64;

    loop {
        if halted() {
            return Err(ReadStop::Halted);
        }
        let n = match input.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ReadStop::Io(e)),
        };

        let lines = splitter.push(&buf[..n]);
        if lines.is_empty() {
            continue;
        }
        sent += lines.len() as u64;
        queue.send(lines).map_err(|_| ReadStop::Halted)?;
    }

    if let Some(last) = splitter.finish() {
        sent += 1;
        queue.send(vec![last]).map_err(|_| ReadStop::Halted)?;
    }

    tracing::debug!(lines = sent, "input exhausted");
    Ok(sent)
}
