//! sd-admin: StaffDesk admin console
//!
//! Every command dispatches one or more store operations, waits for them to
//! settle and prints the slice they updated.
//!
//! ```text
//! sd-admin login --email admin@corp.io --password ... --remember
//! sd-admin skills update 64f0... --data '{"status":"Inactive"}'
//! sd-admin projects update 65a1... --data '{"employees":[...]}'
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod cli;
pub mod commands;
pub mod console;
pub mod render;

pub use cli::Cli;
pub use console::Console;
