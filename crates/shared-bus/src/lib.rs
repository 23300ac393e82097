//! # Shared Bus - Store Event Bus
//!
//! Broadcast channel that carries store lifecycle events to observers such
//! as the assignment notifier, the CLI's progress output and tests.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │ Store task / │                    │  Notifier /  │
//! │ HTTP client  │    publish()       │  observers   │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! Publishing never blocks: a subscriber that falls more than
//! [`DEFAULT_CHANNEL_CAPACITY`] events behind skips the oldest ones.

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

pub use events::{EventFilter, EventTopic, StoreEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before it lags.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
