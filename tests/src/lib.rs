//! # Ordered-Write Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/    # End-to-end ordering scenarios
//! │   ├── ordering_scenarios.rs
//! │   ├── wrapping.rs
//! │   ├── concurrency.rs
//! │   └── failures.rs
//! │
//! └── benches/            # Criterion benchmarks
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p ow-tests
//!
//! # By category
//! cargo test -p ow-tests integration::failures::
//!
//! # Benchmarks
//! cargo bench -p ow-tests
//! ```

pub mod integration;
