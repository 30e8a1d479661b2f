//! Transport layer: stateless HTTP client over the backend REST surface,
//! plus the [`InteractionApi`] seam the workflow crates are written against.

pub mod api;
pub mod http;

pub use api::InteractionApi;
pub use http::{ApiClient, ApiError, Health, BASE_URL_ENV, DEFAULT_BASE_URL};
