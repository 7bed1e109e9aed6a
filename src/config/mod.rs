//! Configuration Module
//!
//! Client settings and the loader that assembles them from files and the environment.

pub mod loader;
pub mod settings;

pub use loader::ConfigLoader;
pub use settings::{ClientConfig, DEFAULT_BASE_URL};
