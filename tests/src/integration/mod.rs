//! # Integration Scenarios
//!
//! Every test runs real loop threads: a [`ConnectionFixture`] per connection,
//! writes driven from external threads and from tasks on the loop, and the
//! recording transport as the observer.
//!
//! [`ConnectionFixture`]: ow_ordering::testing::ConnectionFixture

pub mod concurrency;
pub mod wrapping;

use std::time::Duration;

/// Upper bound on how long a test waits for a promise.
pub const WAIT: Duration = Duration::from_secs(5);
