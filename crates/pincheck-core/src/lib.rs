//! Core domain types and configuration for pincheck
//!
//! This crate provides the foundational types used across all pincheck
//! components:
//!
//! - Domain newtypes: [`Cid`], [`RequestId`], [`AccessToken`], [`ServiceEndpoint`]
//! - Service pairs: [`ServiceTokenPair`] binds an endpoint to a credential
//! - Configuration: [`Config`] with YAML loading and validation
//!
//! # Architecture
//!
//! Types here validate at construction and carry no async machinery. HTTP
//! concerns live in `pincheck-client`; orchestration in `pincheck-harness`.

pub mod config;
pub mod domain;

pub use config::{Config, HttpConfig, ReportConfig, ServiceEntry};
pub use domain::errors::DomainError;
pub use domain::newtypes::{AccessToken, Cid, RequestId, ServiceEndpoint, ServiceTokenPair};
