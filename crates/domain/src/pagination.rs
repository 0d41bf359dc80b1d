// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A one-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    page: u32,
    page_size: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
        }
    }
}

impl Page {
    /// Builds a page, defaulting to page 1 of 20.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPage` for page 0 or a size outside
    /// 1..=100.
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Result<Self, DomainError> {
        let defaults: Self = Self::default();
        let page: u32 = page.unwrap_or(defaults.page);
        let page_size: u32 = page_size.unwrap_or(defaults.page_size);

        if page == 0 {
            return Err(DomainError::InvalidPage {
                reason: String::from("page starts at 1"),
            });
        }
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(DomainError::InvalidPage {
                reason: format!("page_size must be between 1 and {MAX_PAGE_SIZE}"),
            });
        }
        Ok(Self { page, page_size })
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Slices an already filtered and ordered result set.
    #[must_use]
    pub fn slice<T>(&self, items: Vec<T>) -> Paged<T> {
        let total: usize = items.len();
        let size: usize = usize::try_from(self.page_size).unwrap_or(usize::MAX);
        let skip: usize = usize::try_from(self.page - 1)
            .unwrap_or(usize::MAX)
            .saturating_mul(size);

        Paged {
            items: items.into_iter().skip(skip).take(size).collect(),
            page: self.page,
            page_size: self.page_size,
            total,
        }
    }
}

/// One page of results plus the unpaged total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total: usize,
}

impl<T> Paged<T> {
    /// Converts the items while keeping paging metadata.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Paged<U> {
        Paged {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total: self.total,
        }
    }
}
