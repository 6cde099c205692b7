//! Paging context for the mentions listing.
//!
//! The page position lives in an explicit `Paging` value owned by the panel
//! and handed to the renderer and to the prev/next handlers.

use crate::config::DEFAULT_PAGE_SIZE;

/// Zero-based page index plus page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub rank: u64,
    pub size: u64,
}

/// Displayed `from – to of total` window for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub from: u64,
    pub to: u64,
    pub total: u64,
}

impl Default for Paging {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Paging {
    /// A size of zero falls back to the default page size.
    pub fn new(size: u64) -> Self {
        Self {
            rank: 0,
            size: if size == 0 { DEFAULT_PAGE_SIZE } else { size },
        }
    }

    pub fn at_rank(mut self, rank: u64) -> Self {
        self.rank = rank;
        self
    }

    pub fn from(&self) -> u64 {
        self.rank.saturating_mul(self.size)
    }

    pub fn range(&self, total: u64) -> PageRange {
        let from = self.from();
        PageRange {
            from,
            to: from.saturating_add(self.size).min(total),
            total,
        }
    }

    /// The "previous" control is inert while `from < size`.
    pub fn previous_disabled(&self, range: &PageRange) -> bool {
        range.from < self.size
    }

    pub fn next_disabled(&self, range: &PageRange) -> bool {
        range.total <= range.to
    }

    /// Step back one page. Returns whether the rank changed and a reload
    /// is due; a click on a disabled control is ignored.
    pub fn decrement(&mut self, range: &PageRange) -> bool {
        if self.previous_disabled(range) {
            return false;
        }
        self.rank = self.rank.saturating_sub(1);
        true
    }

    pub fn increment(&mut self, range: &PageRange) -> bool {
        if self.next_disabled(range) {
            return false;
        }
        self.rank += 1;
        true
    }

    pub fn query_string(&self) -> String {
        format!("page_rank={}&page_size={}", self.rank, self.size)
    }
}

/// Format a count with thousands separators, e.g. `12345` -> `12,345`.
pub fn add_commas(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
