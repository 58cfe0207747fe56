//! Cooperative cancellation for in-flight relay requests.

mod token;

pub use token::CancellationToken;
