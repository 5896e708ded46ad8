//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises one slice of the client
//! against the in-memory and capture transports. No daemon is required.

mod command_tests;
mod session_tests;
mod support;
mod worker_tests;
