use serde::Deserialize;

use crate::database::repository::Page;
use crate::error::ApiError;
use crate::types::Validator;

/// `?skip=&limit=` query parameters shared by every list endpoint.
///
/// There is no ceiling on `limit`; callers may ask for arbitrarily large
/// pages.
#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl Pagination {
    pub fn page(&self, default_limit: i64) -> Result<Page, ApiError> {
        let skip = self.skip.unwrap_or(0);
        let limit = self.limit.unwrap_or(default_limit);

        let mut v = Validator::new();
        if skip < 0 {
            v.fail("skip", "ensure this value is greater than or equal to 0");
        }
        if limit < 0 {
            v.fail("limit", "ensure this value is greater than or equal to 0");
        }
        v.finish()
            .map_err(|fields| ApiError::unprocessable_entity("Invalid pagination", fields))?;

        Ok(Page::new(skip, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page() {
        let page = Pagination::default().page(100).unwrap();
        assert_eq!(page, Page::new(0, 100));
    }

    #[test]
    fn large_limits_pass_through() {
        let p = Pagination { skip: Some(5), limit: Some(1_000_000) };
        assert_eq!(p.page(100).unwrap(), Page::new(5, 1_000_000));
    }

    #[test]
    fn negative_values_rejected() {
        let p = Pagination { skip: Some(-1), limit: None };
        assert!(p.page(100).is_err());
    }
}
