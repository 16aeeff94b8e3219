//! Engine and emitter tests.

#[cfg(unix)]
mod exec_join_tests;
mod join_tests;
