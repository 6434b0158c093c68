// Library root: re-exports all modules so integration tests can drive a run
// without the binary.

pub mod app;
pub mod config;
pub mod export;
pub mod input;
pub mod report;
