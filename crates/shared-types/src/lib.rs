//! # Shared Types Crate
//!
//! Domain records, request payloads and the operation catalogue shared by
//! the HTTP client, the store and the admin CLI.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every wire type is defined here once.
//! - **Typed References**: foreign keys are [`Ref<T>`], which accepts both the
//!   bare identifier and the record joined by the server.
//! - **Partial Writes**: create and update bodies are `*Patch` types whose
//!   absent fields never reach the wire.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod entities;
pub mod errors;
pub mod operations;
pub mod payloads;

pub use entities::*;
pub use errors::*;
pub use operations::{Effect, OperationKind, ReadTarget, RequestSeq, SliceId};
pub use payloads::*;
