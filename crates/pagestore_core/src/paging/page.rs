use super::request::{total_pages, PageRequest};
use super::{PageError, PageResult};
use serde::{Deserialize, Serialize};

/// One bounded, ordered slice of a source plus its position in the whole.
///
/// A page owns its items and is immutable once built; later changes to the
/// source are not observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    items: Vec<T>,
    current_page: u32,
    page_size: u32,
    total_count: u64,
    total_pages: u64,
}

/// Position metadata a transport layer needs to build navigation links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub total_count: u64,
    pub page_size: u32,
    pub current_page: u32,
    pub total_pages: u64,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> Page<T> {
    /// Builds a page from an already extracted slice.
    ///
    /// `items` must be exactly the slice the coordinates describe: the
    /// `min(page_size, total_count - offset)` items starting at the page
    /// offset, or nothing for an empty source or a page past the end.
    ///
    /// # Errors
    /// - `InvalidArgument` when the page coordinates are invalid or the item
    ///   count does not match them.
    pub fn from_parts(
        items: Vec<T>,
        total_count: u64,
        page_number: u32,
        page_size: u32,
    ) -> PageResult<Self> {
        let request = PageRequest::new(page_number, page_size)?;
        let expected = total_count
            .saturating_sub(request.offset())
            .min(u64::from(page_size));
        if items.len() as u64 != expected {
            return Err(PageError::invalid(
                "items",
                format!(
                    "page {page_number} of size {page_size} over {total_count} items holds \
                     {expected} items, got {}",
                    items.len()
                ),
            ));
        }

        Ok(Self::new(items, total_count, request))
    }

    /// Builds a page from a freshly fetched range.
    ///
    /// Only the page-size bound is enforced here; a source mutated between
    /// its count and its fetch may legitimately return fewer items.
    pub(crate) fn fetched(
        items: Vec<T>,
        total_count: u64,
        request: PageRequest,
    ) -> PageResult<Self> {
        let page_size = request.page_size();
        if items.len() as u64 > u64::from(page_size) {
            return Err(PageError::invalid(
                "items",
                format!(
                    "source returned {} items for a page of size {page_size}",
                    items.len()
                ),
            ));
        }

        Ok(Self::new(items, total_count, request))
    }

    fn new(items: Vec<T>, total_count: u64, request: PageRequest) -> Self {
        Self {
            items,
            current_page: request.page_number(),
            page_size: request.page_size(),
            total_count,
            total_pages: total_pages(total_count, request.page_size()),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.current_page) < self.total_pages
    }

    /// Page number for a "previous" link, if one exists.
    pub fn previous_page(&self) -> Option<u32> {
        self.has_previous().then(|| self.current_page - 1)
    }

    /// Page number for a "next" link, if one exists.
    pub fn next_page(&self) -> Option<u32> {
        if self.has_next() {
            self.current_page.checked_add(1)
        } else {
            None
        }
    }

    pub fn metadata(&self) -> PageMetadata {
        PageMetadata {
            total_count: self.total_count,
            page_size: self.page_size,
            current_page: self.current_page,
            total_pages: self.total_pages,
            has_previous: self.has_previous(),
            has_next: self.has_next(),
        }
    }

    /// Maps every item while keeping position metadata.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
        }
    }

    /// Fallible [`Page::map`]; the first error aborts the mapping.
    pub fn try_map<U, E, F>(self, f: F) -> Result<Page<U>, E>
    where
        F: FnMut(T) -> Result<U, E>,
    {
        let items = self.items.into_iter().map(f).collect::<Result<Vec<_>, E>>()?;
        Ok(Page {
            items,
            current_page: self.current_page,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
        })
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
