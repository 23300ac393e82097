//! # StaffDesk Test Suite
//!
//! Cross-crate flows: the store, the HTTP client and the event bus running
//! together against a mock backend.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs            # Mock backend, harness, token builder
//!     ├── store_flows.rs         # Lifecycles, merges, staleness guard
//!     ├── session_flows.rs       # Token expiry, login, remember-me, logout
//!     └── notification_flows.rs  # Assignment mail, password reset
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p sd-tests
//! cargo test -p sd-tests integration::session_flows::
//! ```

#![allow(dead_code)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod integration;
