//! Error type tests.
