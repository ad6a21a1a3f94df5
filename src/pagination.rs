use crate::config::PaginationConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

/// The resolved read window for a list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// 1-based page number, never below 1.
    pub page: u64,
    /// Page size. Clamped to the configured maximum on the upper bound only;
    /// a requested value below 1 passes through as-is and its meaning is left
    /// to the accessor.
    pub limit: i64,
    /// `(page - 1) * limit`, saturating at `i64::MAX` and never negative.
    pub skip: i64,
}

/// Resolve `page` and `limit` from the raw query parameters.
///
/// `page`: missing, non-numeric, or below 1 resolves to 1.
/// `limit`: missing or non-numeric resolves to the configured default, a
/// parsed value is capped at the configured maximum. There is no lower clamp.
#[must_use]
pub fn resolve_window(params: &HashMap<String, String>, config: &PaginationConfig) -> PageWindow {
    let page = params
        .get("page")
        .and_then(|raw| raw.parse::<u64>().ok())
        .filter(|page| *page >= 1)
        .unwrap_or(1);
    #[allow(clippy::cast_possible_wrap)]
    let limit = params
        .get("limit")
        .and_then(|raw| raw.parse::<i64>().ok())
        .map_or(config.default_limit as i64, |requested| {
            requested.min(config.max_limit as i64)
        });
    // Saturate rather than overflow on absurdly large page numbers; a skip
    // past the collection just yields an empty page.
    let skip = i64::try_from(page - 1)
        .unwrap_or(i64::MAX)
        .saturating_mul(limit.max(0));
    PageWindow { page, limit, skip }
}

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub total: u64,
    pub page: u64,
    pub limit: i64,
    pub total_pages: u64,
    pub has_next_page: bool,
}

impl PaginationMeta {
    /// Compute metadata for a window. `total_pages` is `ceil(total / limit)`;
    /// when the resolved limit is below 1 (the un-floored edge case) it is
    /// reported as 0 rather than dividing by a non-positive size.
    #[must_use]
    pub fn new(total: u64, window: PageWindow) -> Self {
        #[allow(clippy::cast_sign_loss)]
        let total_pages = if window.limit >= 1 {
            total.div_ceil(window.limit as u64)
        } else {
            0
        };
        Self {
            total,
            page: window.page,
            limit: window.limit,
            total_pages,
            has_next_page: window.page < total_pages,
        }
    }
}
