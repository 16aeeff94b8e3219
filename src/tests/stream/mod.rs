//! Line reconstruction tests.
