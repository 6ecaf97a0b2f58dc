use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// Raw `?page=&limit=` query string values.
///
/// Kept as strings so that garbage input falls back to defaults instead of
/// being rejected by the extractor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: if page < 1 { DEFAULT_PAGE } else { page },
            limit: if limit < 1 { DEFAULT_LIMIT } else { limit },
        }
    }

    /// Parse query parameters leniently: anything missing, unparsable or
    /// below 1 becomes the default.
    pub fn from_query(query: &PageQuery) -> Self {
        let page = parse_positive(query.page.as_deref()).unwrap_or(DEFAULT_PAGE);
        let limit = parse_positive(query.limit.as_deref()).unwrap_or(DEFAULT_LIMIT);
        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn meta(&self, total: i64) -> PaginationMeta {
        PaginationMeta {
            page: self.page,
            limit: self.limit,
            total,
            total_pages: total_pages(total, self.limit),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

fn parse_positive(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|value| *value >= 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        return 0;
    }
    total / limit + i64::from(total % limit != 0)
}
