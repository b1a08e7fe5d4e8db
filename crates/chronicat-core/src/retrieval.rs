//! Paged retrieval of changeset records.

use crate::changeset::ChangesetRecord;
use crate::errors::Result;
use crate::ports::{ChangesetLog, PageCursor, PageRequest};
use crate::window::ChangesetQuery;

/// Default number of records fetched per page.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Read every record matching `query`, page by page, until an empty page.
///
/// Records keep the log's ordering (newest first). Each page resumes after
/// the last record of the previous one, so a record is returned at most once
/// even when the log grows mid-read. A `page_size` of zero is treated as one.
///
/// # Errors
///
/// The first error returned by the log; no partial result is returned.
pub fn collect_all(
    log: &dyn ChangesetLog,
    query: &ChangesetQuery,
    page_size: usize,
) -> Result<Vec<ChangesetRecord>> {
    let size = page_size.max(1);
    let mut records = Vec::new();
    let mut request = PageRequest::first(size);

    loop {
        let page = log.fetch_page(query, request)?;
        let Some(last) = page.last() else {
            break;
        };
        request = PageRequest::after(PageCursor::of(last), size);
        records.extend(page);
    }

    tracing::debug!(result_len = records.len(), page_size = size, "collected changesets");
    Ok(records)
}
