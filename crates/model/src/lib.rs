//! Value types shared by the blob store client and the mount resolver.
//!
//! - `blob` - Blob metadata (name, type, size, tags, attributes, parents)
//! - `expression` - Filter expression DSL and its JSON form
//! - `query` - Paged queries, hits, facets

pub mod blob;
pub mod error;
pub mod expression;
pub mod query;

pub use blob::{BlobMeta, BlobType};
pub use error::ModelError;
pub use expression::Expression;
pub use query::{Facets, Hit, Query, QueryResponse, DEFAULT_QUERY_SIZE};
