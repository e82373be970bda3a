//! Navigation links for paginated listings.

use super::PageLinks;

/// The request a listing was served for: URL without query string plus the
/// query parameters in their original order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestContext {
    pub base_url: String,
    pub query: Vec<(String, String)>,
}

impl RequestContext {
    pub fn new(base_url: impl Into<String>, query: Vec<(String, String)>) -> Self {
        let mut ctx = Self {
            base_url: base_url.into(),
            query: Vec::with_capacity(query.len()),
        };
        for (key, value) in query {
            ctx.set(&key, value);
        }
        ctx
    }

    /// Split a full URL into base and query pairs. Values are kept verbatim.
    pub fn parse(url: &str) -> Self {
        let (base, query) = url.split_once('?').unwrap_or((url, ""));
        let pairs = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (key.to_string(), value.to_string())
            })
            .collect();
        Self::new(base, pairs)
    }

    /// Overwrite `key` in place, or append it when missing.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.query.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value,
            None => self.query.push((key.to_string(), value)),
        }
    }

    /// URL for `page` keeping every other parameter.
    pub fn page_url(&self, page: u64, per_page: u64) -> String {
        let mut ctx = self.clone();
        ctx.set("page", page.to_string());
        ctx.set("per_page", per_page.to_string());

        let query = ctx
            .query
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", ctx.base_url, query)
    }
}

/// Links for `page` out of `total_pages`.
///
/// `prev` only past the first page, `next` only before the last one,
/// `first`/`last` only when there is at least one page.
pub fn page_links(
    request: &RequestContext,
    page: u64,
    total_pages: u64,
    per_page: u64,
) -> PageLinks {
    let url = |n: u64| request.page_url(n, per_page);
    let has_pages = total_pages > 0;

    PageLinks {
        self_link: url(page),
        first: has_pages.then(|| url(1)),
        prev: (page > 1).then(|| url(page - 1)),
        next: (page < total_pages).then(|| url(page + 1)),
        last: has_pages.then(|| url(total_pages)),
    }
}
