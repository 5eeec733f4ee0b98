/*
[INPUT]:  HTTP client configuration and API endpoints
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod client;
pub mod disputes;
pub mod error;
pub mod tasks;
pub mod transactions;

pub use error::{LinguoError, Result};

pub use client::{ClientConfig, LinguoClient};
