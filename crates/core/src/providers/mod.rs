//! Travel-data providers.
//!
//! This module provides the `ProviderAdapter` trait (Adapter Pattern), the
//! mock, HTTP and misconfigured adapters, and the `ApiServiceManager` that
//! routes typed queries to the adapter registered for each capability.

pub mod base;
pub mod factory;
pub mod http;
pub mod manager;
pub mod mock;

pub use base::{ProviderAdapter, ProviderError};
pub use factory::ProviderFactory;
pub use http::HttpProvider;
pub use manager::{ApiServiceManager, ApiServiceManagerBuilder};
pub use mock::{MisconfiguredProvider, MockBehavior, MockProvider};
