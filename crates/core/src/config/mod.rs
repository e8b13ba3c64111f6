//! Configuration loading and schema definitions
//!
//! Host settings only. Validation rules are built into `photogate-image`
//! and are not configurable.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
