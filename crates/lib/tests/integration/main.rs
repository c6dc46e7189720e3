//! File-backed integration tests for qranchor-lib.

mod common;
mod restart_tests;
