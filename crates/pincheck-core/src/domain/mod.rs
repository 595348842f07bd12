//! Domain types for compliance runs
//!
//! This module contains the core domain types for pincheck:
//! - Newtypes for validated identifiers (CIDs, request ids, tokens)
//! - The service/token pair a run executes against
//! - Domain-specific error types

pub mod errors;
pub mod newtypes;

// Re-export commonly used types
pub use errors::DomainError;
pub use newtypes::*;
