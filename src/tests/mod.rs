//! Internal unit tests, grouped by area.

mod config;
mod engine;
mod error;
mod extract;
mod resolve;
mod result;
mod stream;
