//! REST handlers.

pub mod assets;
pub mod audit;
pub mod auth;
pub mod health;
pub mod jobs;
pub mod roles;
pub mod tenants;
pub mod users;
pub mod workers;

use fieldops_core::repository::{PaginatedResult, Pagination};
use serde::{Deserialize, Serialize};

/// Query-string pagination parameters.
#[derive(Debug, Deserialize, Default)]
pub struct PageQuery {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl From<PageQuery> for Pagination {
    fn from(q: PageQuery) -> Self {
        let default = Pagination::default();
        Pagination {
            offset: q.offset.unwrap_or(default.offset),
            limit: q.limit.unwrap_or(default.limit),
        }
    }
}

/// Serializable list envelope for paginated endpoints.
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

impl<T> From<PaginatedResult<T>> for ListResponse<T> {
    fn from(page: PaginatedResult<T>) -> Self {
        Self {
            items: page.items,
            total: page.total,
            offset: page.offset,
            limit: page.limit,
        }
    }
}
