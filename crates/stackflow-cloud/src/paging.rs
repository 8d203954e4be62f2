//! Lazy walking over paginated remote listings
//!
//! The SDKs hand back one page at a time plus a continuation token. Callers
//! here only see individual items and decide per item whether they need
//! more, which keeps early-stop logic out of the page plumbing.

use crate::error::Result;
use std::future::Future;
use std::ops::ControlFlow;

/// One page of a remote listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,

    /// Token for the next page. `None` on the last page.
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_token: None,
        }
    }

    pub fn with_next(items: Vec<T>, next_token: impl Into<String>) -> Self {
        Self {
            items,
            next_token: Some(next_token.into()),
        }
    }
}

/// Item-by-item reader over a paginated listing
///
/// The next page is requested only when the items of the current one have
/// been consumed, so dropping the reader early skips the remaining pages.
/// A failed fetch keeps the continuation token: calling `next_item` again
/// retries the same page.
pub struct Pages<T, F> {
    fetch: F,
    buffer: std::vec::IntoIter<T>,
    next_token: Option<String>,
    exhausted: bool,
}

impl<T, F, Fut> Pages<T, F>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    pub fn new(fetch: F) -> Self {
        Self {
            fetch,
            buffer: Vec::new().into_iter(),
            next_token: None,
            exhausted: false,
        }
    }

    pub async fn next_item(&mut self) -> Result<Option<T>> {
        loop {
            if let Some(item) = self.buffer.next() {
                return Ok(Some(item));
            }
            if self.exhausted {
                return Ok(None);
            }

            let page = (self.fetch)(self.next_token.clone()).await?;
            self.exhausted = page.next_token.is_none();
            self.next_token = page.next_token;
            self.buffer = page.items.into_iter();
        }
    }
}

/// Feed items from successive pages to `consume` until it breaks or the
/// listing is exhausted. Pages are only fetched while the consumer wants more.
pub async fn walk_pages<T, F, Fut, C>(fetch: F, mut consume: C) -> Result<()>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
    C: FnMut(T) -> ControlFlow<()>,
{
    let mut pages = Pages::new(fetch);
    while let Some(item) = pages.next_item().await? {
        if consume(item).is_break() {
            break;
        }
    }
    Ok(())
}

/// Collect every item of a listing
pub async fn collect_all<T, F, Fut>(fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items = Vec::new();
    walk_pages(fetch, |item| {
        items.push(item);
        ControlFlow::Continue(())
    })
    .await?;
    Ok(items)
}
