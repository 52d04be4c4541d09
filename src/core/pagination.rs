//! Cursor-following driver over a [`CostPageSource`].

use std::time::Duration;

use crate::core::backoff::Sleeper;
use crate::core::cost_fetcher::{CostPageSource, PageRequest};
use crate::core::models::CostBucket;

/// Hard ceiling on pages fetched per query.
pub const MAX_PAGES: usize = 10;

/// Pause between consecutive page requests.
pub const PAGE_DELAY: Duration = Duration::from_millis(200);

/// Buckets accumulated across pages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paginated {
    /// Buckets in page order, then in-page order.
    pub buckets: Vec<CostBucket>,
    /// Pages successfully fetched.
    pub pages: usize,
    /// At least one page was synthesized.
    pub synthetic: bool,
    /// Stopped at [`MAX_PAGES`] while the API still reported more.
    pub truncated: bool,
}

/// Fetch pages until the API reports no more, up to [`MAX_PAGES`].
///
/// Stops early, keeping what has been gathered so far, when a page claims
/// more data without a continuation token or when a page fetch fails.
pub async fn fetch_all<P, S>(source: &P, sleeper: &S, request: PageRequest) -> Paginated
where
    P: CostPageSource,
    S: Sleeper,
{
    let mut request = request;
    request.page_token = None;

    let mut result = Paginated::default();
    let mut has_more = true;

    while has_more && result.pages < MAX_PAGES {
        let fetched = match source.fetch_page(&request).await {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    page = result.pages + 1,
                    buckets = result.buckets.len(),
                    "Page fetch failed, keeping buckets gathered so far"
                );
                return result;
            }
        };

        result.pages += 1;
        result.synthetic |= fetched.synthetic;
        result.buckets.extend(fetched.page.data);
        has_more = fetched.page.has_more;
        request.page_token = fetched.page.next_page;

        tracing::debug!(
            page = result.pages,
            buckets = result.buckets.len(),
            has_more,
            "Accumulated cost page"
        );

        if has_more && request.page_token.is_none() {
            tracing::warn!(
                page = result.pages,
                "API reported more data without a next page token, stopping"
            );
            return result;
        }

        if has_more && result.pages < MAX_PAGES {
            sleeper.sleep(PAGE_DELAY).await;
        }
    }

    if has_more {
        result.truncated = true;
        tracing::warn!(
            max_pages = MAX_PAGES,
            "Reached page limit, results may be incomplete"
        );
    }

    result
}
