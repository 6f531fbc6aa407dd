//! Configuration module for livelib-source
//!
//! This module handles loading and validating the TOML configuration that
//! replaces the original plugin's hard-coded site constants: base URL,
//! request pacing, timeouts, and the markup label used to locate the
//! publication year.
//!
//! # Example
//!
//! ```no_run
//! use livelib_source::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("livelib.toml")).unwrap();
//! println!("Fetching from: {}", config.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::SourceConfig;

// Re-export parser functions
pub use parser::load_config;
pub use validation::validate;
