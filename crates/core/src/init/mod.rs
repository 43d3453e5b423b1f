//! Initialization module for creating `.trip-planner` directory structures.
//!
//! Generates a `.trip-planner/` directory with pre-configured templates for:
//! - Engine and stage settings (`config.toml`)
//! - Provider definitions (`providers/*.yaml`)
//!
//! # Example
//!
//! ```no_run
//! use tp_core::init::{InitOptions, generate_trip_planner_structure};
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = InitOptions {
//!     target_dir: PathBuf::from("."),
//!     force: false,
//!     minimal: false,
//! };
//!
//! generate_trip_planner_structure(options).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod generator;
pub mod templates;

pub use error::{InitError, InitResult};
pub use generator::{generate_trip_planner_structure, InitOptions};
pub use templates::{get_template, list_templates};
