//! Page slicing over an ordered sequence.

use serde::Serialize;

/// One page of an ordered sequence plus the size of the whole sequence.
///
/// Built on demand per query; never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    items: Vec<T>,
    total_count: usize,
    page: usize,
    page_size: usize,
}

impl<T: Clone> Page<T> {
    /// Slice `source` at 1-based `page` with `page_size` items per page.
    ///
    /// Missing values fall back to page 1 and `default_size`. Zero is clamped
    /// to 1 for both.
    pub fn new(
        source: &[T],
        page: Option<usize>,
        page_size: Option<usize>,
        default_size: usize,
    ) -> Self {
        let page = page.unwrap_or(1).max(1);
        let page_size = page_size.unwrap_or(default_size).max(1);

        let start = (page - 1).saturating_mul(page_size).min(source.len());
        let end = start.saturating_add(page_size).min(source.len());

        Self {
            items: source[start..end].to_vec(),
            total_count: source.len(),
            page,
            page_size,
        }
    }
}

impl<T> Page<T> {
    #[inline]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[inline]
    pub const fn total_count(&self) -> usize {
        self.total_count
    }

    /// Effective 1-based page number.
    #[inline]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Effective page size.
    #[inline]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages needed for the whole sequence.
    pub const fn page_count(&self) -> usize {
        self.total_count.div_ceil(self.page_size)
    }

    /// Whether this page holds fewer items than the whole sequence.
    pub fn is_partial(&self) -> bool {
        self.items.len() < self.total_count
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
