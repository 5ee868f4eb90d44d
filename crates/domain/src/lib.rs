//! Domain layer for the health tracker backend.
//!
//! This crate contains:
//! - Domain models (places, users, food/activity/visit/mood logs, triggers)
//! - Store traits describing what the services read from persistence
//! - Business logic services: proximity, trigger evaluation, aggregation
//! - Domain error types

pub mod error;
pub mod models;
pub mod services;
pub mod stores;

#[cfg(test)]
pub mod testing;

pub use error::DomainError;
