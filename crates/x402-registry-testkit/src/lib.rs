//! # x402 Registry Testkit
//!
//! Testing utilities for the x402 registry.
//!
//! ## Overview
//!
//! - **Fixtures**: record builders and an in-memory log preloaded with topics
//! - **Vectors**: known-valid and known-invalid documents with the
//!   violations each must produce
//! - **Generators**: proptest strategies for entries and directory logs
//!
//! ## Test Fixtures
//!
//! ```rust
//! use x402_registry_testkit::fixtures::{entry, TestLog};
//!
//! let log = TestLog::new();
//! log.publish_entry(&entry("weather", 10_000));
//! assert_eq!(log.log.messages(&log.directory).len(), 1);
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use x402_registry_testkit::generators::directory_log;
//!
//! proptest! {
//!     #[test]
//!     fn replay_is_deterministic(log in directory_log(20)) {
//!         // ...
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{entry, pointer, schema, TestLog};
