//! Persistence layer for the health tracker backend.
//!
//! This crate contains:
//! - Database connection management and migrations
//! - Entity definitions (database row mappings)
//! - Repository implementations, each backing a domain store trait

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
