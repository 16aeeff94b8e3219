//! Right-hand side tests.
