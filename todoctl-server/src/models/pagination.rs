//! Keyset pagination types
//!
//! Pages are addressed by the last id seen rather than a numeric offset,
//! so rows deleted or inserted ahead of the cursor never cause skips or
//! repeats across a traversal.

use serde::Deserialize;

use super::Todo;

/// Maximum items per page
pub const MAX_LIMIT: u32 = 100;

/// Keyset pagination parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Keyset {
    /// Items per page (at most 100), `None` for no limit
    pub limit: Option<u32>,
    /// Only rows with `id > after_id` are returned, `None` starts at the beginning
    pub after_id: Option<i64>,
}

impl Keyset {
    /// Create keyset parameters, capping `limit` at 100.
    ///
    /// A zero limit is kept and yields an empty page.
    pub fn new(limit: Option<u32>, after_id: Option<i64>) -> Self {
        Self {
            limit: limit.map(|l| l.min(MAX_LIMIT)),
            after_id,
        }
    }

    /// First page of `limit` items.
    pub fn first(limit: u32) -> Self {
        Self::new(Some(limit), None)
    }

    /// Page of `limit` items following `after_id`.
    pub fn after(after_id: i64, limit: u32) -> Self {
        Self::new(Some(limit), Some(after_id))
    }

    /// Cursor for the page following `page`.
    ///
    /// Returns `None` when the page came back short, empty or unlimited,
    /// meaning the traversal is complete.
    pub fn next_after(&self, page: &[Todo]) -> Option<Self> {
        let limit = self.limit?;
        if page.len() < limit as usize {
            return None;
        }
        page.last().map(|last| Self {
            limit: Some(limit),
            after_id: Some(last.id),
        })
    }

    /// LIMIT bind value; NULL means no limit in PostgreSQL.
    pub(crate) fn sql_limit(&self) -> Option<i64> {
        self.limit.map(i64::from)
    }

    /// Lower id bound. Ids start at 1, so 0 admits every row.
    pub(crate) fn sql_after_id(&self) -> i64 {
        self.after_id.unwrap_or(0)
    }
}

/// Query parameters for keyset pagination
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeysetParams {
    pub limit: Option<u32>,
    pub after_id: Option<i64>,
}

impl KeysetParams {
    /// `None` when no pagination parameter was supplied at all.
    pub fn into_keyset(self) -> Option<Keyset> {
        match (self.limit, self.after_id) {
            (None, None) => None,
            (limit, after_id) => Some(Keyset::new(limit, after_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todos(ids: &[i64]) -> Vec<Todo> {
        ids.iter()
            .map(|&id| Todo {
                id,
                title: format!("todo {id}"),
                completed: false,
            })
            .collect()
    }

    #[test]
    fn caps_limit() {
        assert_eq!(Keyset::first(999).limit, Some(100));
        assert_eq!(Keyset::first(100).limit, Some(100));
        assert_eq!(Keyset::first(25).limit, Some(25));
    }

    #[test]
    fn zero_limit_is_kept() {
        let page = Keyset::new(Some(0), Some(2));
        assert_eq!(page.limit, Some(0));
        assert_eq!(page.sql_limit(), Some(0));
        assert!(page.next_after(&[]).is_none());
    }

    #[test]
    fn missing_cursor_starts_before_first_id() {
        assert_eq!(Keyset::first(5).sql_after_id(), 0);
        assert_eq!(Keyset::after(7, 5).sql_after_id(), 7);
    }

    #[test]
    fn full_page_yields_cursor() {
        let page = Keyset::after(2, 2);
        let next = page.next_after(&todos(&[3, 4])).unwrap();
        assert_eq!(next, Keyset::after(4, 2));
    }

    #[test]
    fn short_page_ends_traversal() {
        assert!(Keyset::first(2).next_after(&todos(&[5])).is_none());
        assert!(Keyset::first(2).next_after(&[]).is_none());
    }

    #[test]
    fn unlimited_has_no_next() {
        let page = Keyset::new(None, Some(3));
        assert!(page.next_after(&todos(&[4, 5])).is_none());
        assert_eq!(page.sql_limit(), None);
    }

    #[test]
    fn params_without_fields_mean_no_pagination() {
        assert_eq!(KeysetParams::default().into_keyset(), None);

        let params = KeysetParams {
            limit: None,
            after_id: Some(7),
        };
        assert_eq!(params.into_keyset(), Some(Keyset::new(None, Some(7))));
    }
}
