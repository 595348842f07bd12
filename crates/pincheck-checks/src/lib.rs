//! Compliance check scripts for pinning services
//!
//! Each check is a thin script over the harness: it builds one or more
//! lazily executed API calls through the shared [`CheckEnv`], registers
//! expectations against their memoized outcomes, and returns the evaluated
//! reports. The checks own no transport or evaluation logic themselves.
//!
//! [`CheckEnv`]: pincheck_harness::CheckEnv

pub mod auth;
pub mod delete;
pub mod listing;
pub mod util;

pub use auth::InvalidBearerToken;
pub use delete::DeleteNewPin;
pub use listing::ListPins;

use pincheck_harness::Check;

/// Every shipped check, in the order a run executes them.
#[must_use]
pub fn all_checks() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(DeleteNewPin),
        Box::new(InvalidBearerToken),
        Box::new(ListPins),
    ]
}
