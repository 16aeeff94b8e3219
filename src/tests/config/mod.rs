//! Configuration tests.

mod file_tests;
