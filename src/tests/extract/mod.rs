//! Key extraction tests.

mod csv_tests;
