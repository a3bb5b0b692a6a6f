//! Error handling for the Dealboard backend.

pub mod domain;

pub use domain::DomainError;
