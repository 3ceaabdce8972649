// Library root: re-exports all modules so integration tests and external
// consumers can access the crate's public API.

pub mod app;
pub mod config;
pub mod llm;
pub mod provider;
pub mod stats;
pub mod tools;
