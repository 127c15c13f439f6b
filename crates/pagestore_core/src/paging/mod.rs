//! Offset pagination over countable, sliceable sources.
//!
//! # Responsibility
//! - Validate page requests before any source is touched.
//! - Compute a bounded slice plus position metadata in one call.
//!
//! # Invariants
//! - Page size and page number are never clamped here; out-of-range pages are
//!   empty, invalid requests are errors.
//! - `total_pages` uses exact integer ceiling arithmetic.
//! - Paging never mutates the source.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod page;
mod request;
mod source;

pub use page::{Page, PageMetadata};
pub use request::{total_pages, PageRequest};
pub use source::{paginate, paginate_request, PageSource};

pub type PageResult<T> = Result<T, PageError>;

/// Paging argument errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    InvalidArgument { name: &'static str, reason: String },
}

impl PageError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

impl Display for PageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument { name, reason } => {
                write!(f, "invalid paging argument `{name}`: {reason}")
            }
        }
    }
}

impl Error for PageError {}
