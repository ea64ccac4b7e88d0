//! Facebook Graph API client with typed error classification.

pub mod classifier;
pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use classifier::{classify, RequestContext};
pub use client::FacebookClient;
pub use config::GraphConfig;
pub use error::{ApiFailure, FailureCategory, GraphError, GraphResult};
pub use types::*;
