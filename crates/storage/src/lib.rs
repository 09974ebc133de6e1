//! Blob store client abstraction for blobmount.
//!
//! The remote store addresses objects by opaque IDs and finds them through
//! structured queries. This crate defines the client contract the mount layer
//! consumes, plus two helpers built on it:
//!
//! - **Query aggregation** - pages through a query until the server-reported
//!   total is reached
//! - **Memory store** - an in-process implementation for tests and demos

mod aggregate;
mod error;
mod memory;
mod traits;

pub use aggregate::{fetch_all, DEFAULT_PAGE_SIZE};
pub use error::StoreError;
pub use memory::MemoryBlobStore;
pub use traits::BlobStore;
