//! Store, client and bus wired together against a `wiremock` backend.

pub mod fixtures;
pub mod notification_flows;
pub mod session_flows;
pub mod store_flows;
