//! Uniform response envelope - pagination metadata, navigation links and
//! the success/error body shapes shared by every endpoint.
//!
//! These types stay framework-agnostic; the `http` feature adds the axum
//! `IntoResponse` impl for [`ApiResponse`].
//!
//! Success bodies look like
//!
//! ```json
//! { "data": [...], "meta": { "total": 3, "page": 2, "per_page": 1, "total_pages": 3 },
//!   "links": { "self": "...", "first": "...", "prev": "...", "next": "...", "last": "..." } }
//! ```
//!
//! and error bodies like `{ "error": "...", "message": "...", "details": "...", "status_code": 404 }`.
//! Absent fields are left out rather than written as `null`.

mod links;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use links::{page_links, RequestContext};

/// Pagination inputs for a listing response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// `meta` block of a paginated response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

/// `links` block of a paginated response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    #[serde(rename = "self")]
    pub self_link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SuccessBody {
    #[serde(default, skip_serializing_if = "is_absent")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<PageLinks>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub status_code: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Envelope {
    Success(SuccessBody),
    Error(ErrorBody),
}

/// A finished response: status, extra headers and the envelope body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Envelope,
}

impl ApiResponse {
    /// Body as a JSON value.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(&self.body).unwrap_or(Value::Null)
    }
}

fn is_absent(data: &Option<Value>) -> bool {
    matches!(data, None | Some(Value::Null))
}

/// Page count for `total` rows at `per_page` rows per page.
///
/// A zero `per_page` counts as a single page.
pub fn total_pages(total: u64, per_page: u64) -> u64 {
    if per_page > 0 {
        total.div_ceil(per_page)
    } else {
        1
    }
}

/// Build a success response.
///
/// `meta` is filled when `paging` is given; `links` additionally needs the
/// request the listing was served for.
pub fn success(
    data: Option<Value>,
    paging: Option<Paging>,
    request: Option<&RequestContext>,
    status: u16,
) -> ApiResponse {
    let mut body = SuccessBody {
        data,
        ..SuccessBody::default()
    };

    if let Some(paging) = paging {
        let pages = total_pages(paging.total, paging.per_page);
        body.meta = Some(PageMeta {
            total: paging.total,
            page: paging.page,
            per_page: paging.per_page,
            total_pages: pages,
        });
        body.links = request.map(|req| page_links(req, paging.page, pages, paging.per_page));
    }

    ApiResponse {
        status,
        headers: Vec::new(),
        body: Envelope::Success(body),
    }
}

/// Build an error response.
pub fn error(
    error: &str,
    message: &str,
    details: Option<&str>,
    status: u16,
    headers: Vec<(String, String)>,
) -> ApiResponse {
    ApiResponse {
        status,
        headers,
        body: Envelope::Error(ErrorBody {
            error: error.to_string(),
            message: message.to_string(),
            details: details.map(str::to_string),
            status_code: status,
        }),
    }
}
