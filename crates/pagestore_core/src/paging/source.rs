use super::page::Page;
use super::request::PageRequest;
use super::{PageError, PageResult};
use log::{debug, warn};

/// A source that can report its size and hand out a contiguous range.
///
/// Implementations may be fully materialized sequences or queries that count
/// and slice without loading the whole set.
pub trait PageSource {
    type Item;
    type Error: From<PageError>;

    /// Total number of items in the source right now.
    fn total_count(&self) -> Result<u64, Self::Error>;

    /// Up to `limit` items starting at `offset`, in source order.
    fn fetch_range(&self, offset: u64, limit: u64) -> Result<Vec<Self::Item>, Self::Error>;
}

impl<T: Clone> PageSource for [T] {
    type Item = T;
    type Error = PageError;

    fn total_count(&self) -> PageResult<u64> {
        Ok(self.len() as u64)
    }

    fn fetch_range(&self, offset: u64, limit: u64) -> PageResult<Vec<T>> {
        let len = self.len() as u64;
        let start = offset.min(len);
        let end = offset.saturating_add(limit).min(len);
        // Both bounds are clamped to `len`, which already fits in usize.
        Ok(self[start as usize..end as usize].to_vec())
    }
}

impl<T: Clone> PageSource for Vec<T> {
    type Item = T;
    type Error = PageError;

    fn total_count(&self) -> PageResult<u64> {
        self.as_slice().total_count()
    }

    fn fetch_range(&self, offset: u64, limit: u64) -> PageResult<Vec<T>> {
        self.as_slice().fetch_range(offset, limit)
    }
}

/// Returns page `page_number` of size `page_size` from `source`.
///
/// # Errors
/// - `InvalidArgument` (converted into the source error type) when either
///   argument is zero; the source is not touched in that case.
/// - Any error the source reports while counting or slicing.
pub fn paginate<S>(
    source: &S,
    page_number: u32,
    page_size: u32,
) -> Result<Page<S::Item>, S::Error>
where
    S: PageSource + ?Sized,
{
    let request = PageRequest::new(page_number, page_size)?;
    paginate_request(source, request)
}

/// Same as [`paginate`] for an already validated request.
///
/// # Errors
/// - `InvalidArgument` for `items` when the source returns more than
///   `page_size` items from `fetch_range`.
///
/// Count and slice are two separate reads; against a source mutated in
/// between, the page is only approximately consistent.
pub fn paginate_request<S>(source: &S, request: PageRequest) -> Result<Page<S::Item>, S::Error>
where
    S: PageSource + ?Sized,
{
    let total_count = source.total_count()?;
    let offset = request.offset();

    let items = if offset < total_count {
        source.fetch_range(offset, u64::from(request.page_size()))?
    } else {
        Vec::new()
    };

    let page = Page::fetched(items, total_count, request).inspect_err(|err| {
        warn!("event=paginate module=paging status=error error={err}");
    })?;
    debug!(
        "event=paginate module=paging status=ok page={} page_size={} total_count={} total_pages={} items={}",
        page.current_page(),
        page.page_size(),
        page.total_count(),
        page.total_pages(),
        page.len()
    );
    Ok(page)
}
