//! Query-string and path parameter parsing shared by the listing handlers.

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query};

use crate::domain::ValidationError;
use crate::envelope::{ApiResponse, Paging};
use crate::store::Page;

use super::error::{invalid, rejected};

pub(crate) type RawQuery = Result<Query<Vec<(String, String)>>, QueryRejection>;
pub(crate) type RawId = Result<Path<i64>, PathRejection>;

/// Decoded query parameters; a repeated key keeps its last value.
#[derive(Debug, Clone, Default)]
pub(crate) struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub(crate) fn extract(raw: RawQuery) -> Result<Self, ApiResponse> {
        match raw {
            Ok(Query(pairs)) => Ok(Self { pairs }),
            Err(rejection) => Err(rejected("query", rejection)),
        }
    }

    pub(crate) fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// `page` (>= 1, default 1) and `per_page` (1..=`max`, default
    /// `default_per_page`).
    pub(crate) fn paging(&self, default_per_page: u64, max: u64) -> Result<Pagination, ApiResponse> {
        let page = self.number("page", 1)?;
        if page < 1 {
            return Err(invalid(ValidationError::new("page", "must be at least 1")));
        }
        let per_page = self.number("per_page", default_per_page)?;
        if per_page < 1 || per_page > max {
            return Err(invalid(ValidationError::new(
                "per_page",
                format!("must be between 1 and {}", max),
            )));
        }
        Ok(Pagination { page, per_page })
    }

    fn number(&self, key: &str, default: u64) -> Result<u64, ApiResponse> {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| invalid(ValidationError::new(key, "must be a positive integer"))),
        }
    }
}

/// Validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Pagination {
    pub page: u64,
    pub per_page: u64,
}

impl Pagination {
    pub(crate) fn window(self) -> Page {
        Page::from_number(self.page, self.per_page)
    }

    pub(crate) fn paging(self, total: usize) -> Paging {
        Paging {
            total: total as u64,
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// Path id, required to be at least 1.
pub(crate) fn path_id(raw: RawId) -> Result<i64, ApiResponse> {
    match raw {
        Ok(Path(id)) if id >= 1 => Ok(id),
        Ok(Path(_)) => Err(invalid(ValidationError::new("id", "must be at least 1"))),
        Err(rejection) => Err(rejected("id", rejection)),
    }
}
