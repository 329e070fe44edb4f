//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: the backend model actors are generated with
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;
