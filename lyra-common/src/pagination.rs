//! Pagination arithmetic shared by the catalog API

/// Default rows per page when the client does not ask for a limit
pub const DEFAULT_LIMIT: i64 = 20;

/// Hard ceiling on rows per page
pub const MAX_LIMIT: i64 = 100;

/// Pagination metadata calculated from total results
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: i64,
    /// Rows per page after clamping
    pub limit: i64,
    /// Total number of matching rows
    pub total: i64,
    /// Total number of pages
    pub total_pages: i64,
    /// Offset for SQL LIMIT/OFFSET query
    pub offset: i64,
}

impl Pagination {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// Calculate pagination metadata from the total row count and the raw
/// page/limit the client requested.
///
/// Page is floor-clamped to 1 (a too-large page yields an empty data set
/// rather than an error, matching LIMIT/OFFSET behavior); limit is
/// clamped to [1, MAX_LIMIT] with DEFAULT_LIMIT when absent.
pub fn paginate(total: i64, page: Option<i64>, limit: Option<i64>) -> Pagination {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let page = page.unwrap_or(1).max(1);
    let total_pages = (total + limit - 1) / limit;
    let offset = (page - 1) * limit;

    Pagination {
        page,
        limit,
        total,
        total_pages,
        offset,
    }
}
