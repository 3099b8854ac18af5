//! # Resilience Module
//!
//! Fault tolerance for calls into external workers: every worker invocation
//! is bounded by a timeout and retried with exponential backoff.
//!
//! ## Usage
//!
//! ```rust
//! use agent_core::resilience::{execute_with_timeout_and_retry, RetryPolicy};
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let policy = RetryPolicy {
//!     max_attempts: 3,
//!     initial_delay: Duration::from_millis(5),
//!     backoff_multiplier: 2.0,
//!     max_delay: Duration::from_millis(50),
//! };
//!
//! let result = execute_with_timeout_and_retry(
//!     || async { Ok::<_, String>("published") },
//!     Duration::from_secs(1),
//!     &policy,
//!     "cms-agent",
//! )
//! .await;
//! assert_eq!(result.unwrap(), "published");
//! # });
//! ```

pub mod retry;

pub use retry::{
    execute_with_retry, execute_with_timeout, execute_with_timeout_and_retry, RetryError,
    RetryPolicy,
};
