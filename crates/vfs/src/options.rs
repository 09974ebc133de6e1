//! Tuning knobs for mounts.

use blobmount_storage::DEFAULT_PAGE_SIZE;

/// Hits requested by each path-descent query.
pub const DEFAULT_LOOKUP_SIZE: usize = 1000;

/// Options shared by every mount built from one configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MountOptions {
    /// Page size used when aggregating full listings.
    pub page_size: usize,
    /// Maximum children fetched per descent step of the path walk-back.
    ///
    /// Directories with more children than this may fail to resolve names
    /// past the limit.
    pub lookup_size: usize,
}

impl Default for MountOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            lookup_size: DEFAULT_LOOKUP_SIZE,
        }
    }
}

impl MountOptions {
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_lookup_size(mut self, lookup_size: usize) -> Self {
        self.lookup_size = lookup_size;
        self
    }
}
