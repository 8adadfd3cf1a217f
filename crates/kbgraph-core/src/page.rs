use serde::Serialize;

pub const DEFAULT_LIMIT: usize = 50;
pub const DEFAULT_CATALOG_LIMIT: usize = 500;

/// Offset/limit window applied after a result set is fully ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    pub offset: usize,
    pub limit: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Page {
    #[must_use]
    pub const fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }

    #[must_use]
    pub const fn first(limit: usize) -> Self {
        Self { offset: 0, limit }
    }

    /// An offset at or past the end yields an empty page, never an error.
    #[must_use]
    pub fn apply<T>(self, items: Vec<T>) -> Vec<T> {
        items.into_iter().skip(self.offset).take(self.limit).collect()
    }

    /// `LIMIT ? OFFSET ?` parameters for queries ordered in SQL.
    #[must_use]
    pub(crate) fn sql_bounds(self) -> (i64, i64) {
        (to_i64_saturating(self.limit), to_i64_saturating(self.offset))
    }
}

fn to_i64_saturating(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
