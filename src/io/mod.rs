//! I/O abstractions for the three streams of a join run.
//!
//! This module provides:
//! - `InputProvider`: Trait for the streaming (left-hand) input
//! - `OutputTarget`: Trait for the result and diagnostics streams
//! - Standard implementations for stdin/stdout/stderr and files
//! - In-memory implementations for testing

mod file;
mod input;
mod memory;
mod output;
mod std_io;

pub use file::{FileInput, FileOutput};
pub use input::InputProvider;
pub use memory::{InMemorySink, InMemorySource};
pub use output::OutputTarget;
pub use std_io::{StderrOutput, StdinInput, StdoutOutput};
