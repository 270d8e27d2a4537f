//! Configuration and error types shared by the harness

pub mod config;
pub mod error;
