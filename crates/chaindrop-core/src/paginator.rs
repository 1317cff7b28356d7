//! Paginator: fetch the complete result set of a grouped query, one page at
//! a time, until an empty page ends the scan.
//!
//! Pages are requested with a counter starting at 1 and a fixed page size.
//! A response without a result field is tolerated: it contributes no items,
//! the counter still advances, and whether to continue is inherited from the
//! last well-formed page. A misbehaving indexer can therefore keep the scan
//! alive, which is why `max_pages` bounds it.

use std::pin::pin;

use async_trait::async_trait;
use futures::stream::{self, Stream, StreamExt};
use serde::{Deserialize, Serialize};

use crate::error::{IndexError, PaginationError};

/// Default number of items requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 1000;
/// Default upper bound on pages requested by one scan.
pub const DEFAULT_MAX_PAGES: u32 = 10_000;

/// A grouped query: all assets whose `group_key` equals `group_value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupQuery {
    pub group_key: String,
    pub group_value: String,
    pub show_closed_accounts: bool,
    pub show_zero_balance: bool,
}

impl GroupQuery {
    pub fn new(group_key: impl Into<String>, group_value: impl Into<String>) -> Self {
        Self {
            group_key: group_key.into(),
            group_value: group_value.into(),
            show_closed_accounts: true,
            show_zero_balance: true,
        }
    }

    /// All assets of a collection.
    pub fn collection(collection: impl Into<String>) -> Self {
        Self::new("collection", collection)
    }
}

/// Remote indexing service capability.
#[async_trait]
pub trait IndexingService: Send + Sync {
    type Item: Send;

    /// Fetch one page. `Ok(None)` means the response carried no result field.
    async fn query_group(
        &self,
        query: &GroupQuery,
        page: u32,
        limit: u32,
    ) -> Result<Option<Vec<Self::Item>>, IndexError>;
}

/// Position of a scan. Local to one pagination run.
#[derive(Debug, Clone, Copy)]
struct PageCursor {
    next_page: u32,
    last_page_had_items: bool,
    finished: bool,
}

impl PageCursor {
    fn start() -> Self {
        Self {
            next_page: 1,
            last_page_had_items: false,
            finished: false,
        }
    }
}

pub struct Paginator<S> {
    service: S,
    page_size: u32,
    max_pages: u32,
}

impl<S: IndexingService> Paginator<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Lazy, finite stream of pages. The terminating empty page is yielded
    /// too; the first error ends the stream.
    pub fn pages<'a>(
        &'a self,
        query: &'a GroupQuery,
    ) -> impl Stream<Item = Result<Vec<S::Item>, PaginationError>> + 'a {
        stream::unfold(PageCursor::start(), move |mut cursor| async move {
            if cursor.finished {
                return None;
            }
            if cursor.next_page > self.max_pages {
                cursor.finished = true;
                return Some((
                    Err(PaginationError::PageLimitExceeded {
                        max_pages: self.max_pages,
                    }),
                    cursor,
                ));
            }

            let page = cursor.next_page;
            cursor.next_page += 1;

            match self.service.query_group(query, page, self.page_size).await {
                Ok(Some(items)) => {
                    cursor.last_page_had_items = !items.is_empty();
                    cursor.finished = items.is_empty();
                    tracing::debug!(page, items = items.len(), "fetched page");
                    Some((Ok(items), cursor))
                }
                Ok(None) => {
                    cursor.finished = !cursor.last_page_had_items;
                    tracing::warn!(
                        page,
                        group_value = %query.group_value,
                        "page response had no result; treating as empty"
                    );
                    Some((Ok(Vec::new()), cursor))
                }
                Err(source) => {
                    cursor.finished = true;
                    Some((Err(PaginationError::Service { page, source }), cursor))
                }
            }
        })
    }

    /// Collect every item of the group.
    pub async fn fetch_all(&self, query: &GroupQuery) -> Result<Vec<S::Item>, PaginationError> {
        let mut pages = pin!(self.pages(query));
        let mut all = Vec::new();
        let mut requests = 0u32;

        while let Some(page) = pages.next().await {
            requests += 1;
            all.extend(page?);
        }

        tracing::info!(
            group_key = %query.group_key,
            group_value = %query.group_value,
            items = all.len(),
            requests,
            "pagination complete"
        );
        Ok(all)
    }
}
