//! Welfare scheme recommendations for citizen eligibility profiles.
//!
//! Requests are answered by an external scorer process when it is healthy and by a
//! deterministic rule engine over the static scheme catalog when it is not.

pub mod config;
pub mod error;
pub mod recommendation;
pub mod telemetry;
