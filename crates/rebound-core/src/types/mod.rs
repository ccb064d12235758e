//! Type definitions for retry policies and their configuration

mod retry_config;

pub use retry_config::*;
