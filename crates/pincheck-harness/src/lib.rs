//! Pincheck harness - compliance check orchestration
//!
//! Glues the client crate into runnable compliance checks:
//!
//! - [`ApiCall`]: lazily executed, memoized client operations with
//!   attached expectations
//! - [`CheckEnv`]: the per-run environment (shared rate limit tracker,
//!   hooks, schemas, HTTP settings)
//! - [`Check`] / [`CheckRunner`]: the check contract and its orchestration
//! - [`report`]: serializable results from expectation up to run level
//!
//! ## Modules
//!
//! - [`api_call`] - Deferred API calls and expectation evaluation
//! - [`check`] - The check contract
//! - [`env`] - Shared run environment
//! - [`report`] - Run reports
//! - [`runner`] - Check orchestration
//! - [`schema`] - Response body schemas

pub mod api_call;
pub mod check;
pub mod env;
pub mod report;
pub mod runner;
pub mod schema;

pub use api_call::{ApiCall, CallOutcome};
pub use check::Check;
pub use env::CheckEnv;
pub use report::{CallReport, CheckOutcome, CheckRun, ExpectationReport, RunSummary};
pub use runner::CheckRunner;
pub use schema::{Schema, SchemaRegistry};
