//! GraphQL client for the Virtual Andon API.
//!
//! Provides the HTTP client ([`AndonApi`]), the documents it sends, record
//! (de)serialization, and the [`EntityService`] trait list views are
//! written against.

pub mod client;
pub mod documents;
pub mod error;
pub mod records;
pub mod service;

pub use client::{AndonApi, ApiAuth};
pub use error::{ApiError, GraphQlError};
pub use service::EntityService;
