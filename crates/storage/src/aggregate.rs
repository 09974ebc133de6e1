//! Query aggregation across pages.

use blobmount_model::{Query, QueryResponse};

use crate::error::StoreError;
use crate::traits::BlobStore;

/// Page size used by the mount layer when fetching complete result sets.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Fetch every hit of a query by paging through the store.
///
/// URL signing is turned off: these results feed path resolution, not
/// downloads. The number of hits to collect is fixed by the total reported on
/// the first page, and a page that returns no hits before that total is
/// reached is treated as a protocol error, so the loop always terminates.
///
/// # Arguments
/// * `store` - Blob store to query
/// * `query` - Query whose `from`/`size` are overridden for paging
/// * `page_size` - Hits requested per call (at least 1)
///
/// # Returns
/// One response holding every hit in server order, with facets from the first
/// page. Any failed page discards the partial result.
pub async fn fetch_all(
    store: &dyn BlobStore,
    query: &Query,
    page_size: usize,
) -> Result<QueryResponse, StoreError> {
    let page: Query = query
        .clone()
        .with_sign_urls(false)
        .with_size(page_size.max(1));

    let mut response: QueryResponse = store.query(&page.clone().with_from(0)).await?;
    let total: usize = response.total;
    let next_page: Query = page.with_facets(false);

    while response.hits.len() < total {
        let retrieved: usize = response.hits.len();
        let more: QueryResponse = store.query(&next_page.clone().with_from(retrieved)).await?;
        if more.hits.is_empty() {
            return Err(StoreError::protocol(format!(
                "query returned no hits at offset {} of {} ({})",
                retrieved, total, query.expression
            )));
        }
        response.hits.extend(more.hits);
    }

    response.hits.truncate(total);
    response.count = response.hits.len();
    tracing::debug!(
        "fetched {} hits for {}",
        response.count,
        query.expression
    );
    Ok(response)
}
