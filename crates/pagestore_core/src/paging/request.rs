use super::{PageError, PageResult};
use serde::{Deserialize, Serialize};

/// Validated 1-based page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    page_number: u32,
    page_size: u32,
}

impl PageRequest {
    /// Builds a request from caller-supplied values.
    ///
    /// # Errors
    /// - `InvalidArgument` when `page_number` or `page_size` is zero.
    pub fn new(page_number: u32, page_size: u32) -> PageResult<Self> {
        if page_number == 0 {
            return Err(PageError::invalid("page_number", "must be at least 1"));
        }
        if page_size == 0 {
            return Err(PageError::invalid("page_size", "must be at least 1"));
        }

        Ok(Self {
            page_number,
            page_size,
        })
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of leading items skipped before this page starts.
    pub fn offset(&self) -> u64 {
        u64::from(self.page_number - 1) * u64::from(self.page_size)
    }
}

/// Returns `ceil(total_count / page_size)`, or 0 for an empty source.
///
/// `page_size` must be non-zero; [`PageRequest::new`] guarantees it for every
/// caller inside this crate.
pub fn total_pages(total_count: u64, page_size: u32) -> u64 {
    total_count.div_ceil(u64::from(page_size))
}

#[cfg(test)]
mod tests {
    use super::{total_pages, PageRequest};
    use crate::paging::PageError;

    #[test]
    fn zero_arguments_are_rejected() {
        assert!(matches!(
            PageRequest::new(0, 10),
            Err(PageError::InvalidArgument { name: "page_number", .. })
        ));
        assert!(matches!(
            PageRequest::new(1, 0),
            Err(PageError::InvalidArgument { name: "page_size", .. })
        ));
    }

    #[test]
    fn offset_does_not_overflow_for_large_pages() {
        let request = PageRequest::new(u32::MAX, u32::MAX).unwrap();
        assert_eq!(
            request.offset(),
            u64::from(u32::MAX - 1) * u64::from(u32::MAX)
        );
    }

    #[test]
    fn total_pages_is_exact_ceiling() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(23, 10), 3);
        assert_eq!(total_pages(u64::MAX, 1), u64::MAX);
        assert_eq!(total_pages(u64::MAX, 2), u64::MAX / 2 + 1);
    }
}
