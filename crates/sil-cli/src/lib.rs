//! Library surface of the `sil` binary, exposed for integration tests.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
