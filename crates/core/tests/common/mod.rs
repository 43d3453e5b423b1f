//! Common test utilities shared by the integration tests.
//!
//! - Fixtures (sample requests, contexts, provider managers)
//! - Event assertions
//! - Scripted stages that wrap the real ones

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;
pub mod scripted;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use scripted::*;
