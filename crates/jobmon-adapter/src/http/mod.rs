/*
[INPUT]:  HTTP client configuration and Jobmon service routes
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new routes or changing client behavior
*/

pub mod client;
pub mod error;
pub mod error_log;
pub mod retry;
pub mod workflow;

pub use error::{JobmonError, Result};
pub use retry::RetryPolicy;

pub use client::{ClientConfig, JobmonClient, CLIENT_VERSION};
