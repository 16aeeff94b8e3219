//! Join result and semantics tests.
