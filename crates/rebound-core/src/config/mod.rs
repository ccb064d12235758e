//! Configuration loading

mod loader;

pub use loader::{ConfigLoader, ENV_BASE_DELAY_MS, ENV_MAX_ATTEMPTS};
