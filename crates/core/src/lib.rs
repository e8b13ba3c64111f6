//! Core utilities for photogate
//!
//! Shared functionality used by the validation engine's hosts:
//!
//! - **Error handling**: errors with codes, context, and recovery suggestions
//! - **Configuration**: TOML-based configuration with validation
//! - **Field validation**: a fluent validator for configuration values
//!
//! # Example
//!
//! ```rust,no_run
//! use photogate_core::config::Config;
//!
//! let config = Config::load(None).expect("invalid configuration");
//! println!("max upload: {} bytes", config.schema.input.max_bytes);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod validation;

pub use error::{Error, ErrorCode, Result, ResultExt};
