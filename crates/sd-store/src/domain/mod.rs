//! Store domain: lifecycles and slices. No I/O.

pub(crate) mod collection;
pub mod slices;
pub mod status;

pub use status::{Lifecycle, RequestStatus};
