use rocket::{
    http::Status,
    request::{self, FromRequest, Request},
};
use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Upper bound on `limit`; requests above it are clamped rather than
/// rejected, so a greedy client cannot make the server page an entire
/// collection into memory.
pub const MAX_PAGE_SIZE: usize = 100;

/// Pagination parameters, taken from the `page` and `limit` query
/// parameters. Both default when absent; `page=0` or `limit=0` is a bad
/// request.
pub struct PaginationRequest {
    page: usize,
    limit: usize,
}

impl PaginationRequest {
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// How many documents to skip to reach the requested page. Saturates
    /// rather than overflowing for absurd page numbers.
    pub fn skip(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit) as u64
    }

    /// Combine with the total matching count into response metadata.
    pub fn result(self, total: u64) -> PaginationResult {
        let limit = self.limit as u64;
        PaginationResult {
            total,
            page: self.page,
            pages: (total + limit - 1) / limit,
        }
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for PaginationRequest {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let page = match req.query_value::<usize>("page").unwrap_or(Ok(1)) {
            Ok(page) if page > 0 => page,
            _ => return request::Outcome::Failure((Status::BadRequest, ())),
        };
        let limit = match req
            .query_value::<usize>("limit")
            .unwrap_or(Ok(DEFAULT_PAGE_SIZE))
        {
            Ok(limit) if limit > 0 => limit.min(MAX_PAGE_SIZE),
            _ => return request::Outcome::Failure((Status::BadRequest, ())),
        };
        request::Outcome::Success(Self { page, limit })
    }
}

/// Pagination metadata, flattened into paginated responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationResult {
    pub total: u64,
    pub page: usize,
    pub pages: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_counts_previous_pages() {
        let pagination = PaginationRequest { page: 2, limit: 10 };
        assert_eq!(pagination.skip(), 10);
        assert_eq!(pagination.result(15).pages, 2);
    }

    #[test]
    fn first_page_skips_nothing() {
        let pagination = PaginationRequest { page: 1, limit: 10 };
        assert_eq!(pagination.skip(), 0);
    }

    #[test]
    fn exact_multiple_has_no_partial_page() {
        let pagination = PaginationRequest { page: 1, limit: 10 };
        assert_eq!(pagination.result(20).pages, 2);
    }

    #[test]
    fn huge_page_numbers_do_not_overflow() {
        let pagination = PaginationRequest {
            page: usize::MAX,
            limit: 100,
        };
        assert_eq!(pagination.skip(), usize::MAX as u64);
    }

    #[test]
    fn empty_collection_has_zero_pages() {
        let pagination = PaginationRequest { page: 1, limit: 10 };
        let result = pagination.result(0);
        assert_eq!(result.pages, 0);
        assert_eq!(result.total, 0);
    }
}
