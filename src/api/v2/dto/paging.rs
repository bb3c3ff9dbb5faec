/*
 * Responsibility
 * - offset / limit の解決 (既定値・上限チェック)
 * - 一覧系レスポンスに付ける X-* ヘッダの組み立て
 *
 * Notes
 * - 範囲外は丸めずに 400 を返す
 */
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;

use crate::config::CatalogSettings;
use crate::error::AppError;

pub const X_TOTAL_COUNT: HeaderName = HeaderName::from_static("x-total-count");
pub const X_OFFSET: HeaderName = HeaderName::from_static("x-offset");
pub const X_LIMIT: HeaderName = HeaderName::from_static("x-limit");

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: i64,
    pub limit: i64,
}

impl Page {
    pub fn resolve(
        offset: Option<i64>,
        limit: Option<i64>,
        settings: &CatalogSettings,
    ) -> Result<Self, AppError> {
        let offset = offset.unwrap_or(0);
        if offset < 0 {
            return Err(AppError::bad_request(
                "INVALID_PAGING",
                "offset must be >= 0",
            ));
        }

        let limit = limit.unwrap_or(settings.default_page_size);
        if limit < 1 || limit > settings.max_page_size {
            return Err(AppError::bad_request(
                "INVALID_PAGING",
                format!("limit must be between 1 and {}", settings.max_page_size),
            ));
        }

        Ok(Self { offset, limit })
    }

    /// `X-Offset` / `X-Limit`
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(X_OFFSET, HeaderValue::from(self.offset));
        headers.insert(X_LIMIT, HeaderValue::from(self.limit));
        headers
    }
}

impl PageQuery {
    pub fn resolve(&self, settings: &CatalogSettings) -> Result<Page, AppError> {
        Page::resolve(self.offset, self.limit, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_come_from_settings() {
        let page = Page::resolve(None, None, &CatalogSettings::default()).unwrap();
        assert_eq!(page, Page { offset: 0, limit: 20 });
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let settings = CatalogSettings::default();
        assert!(Page::resolve(Some(-1), None, &settings).is_err());
        assert!(Page::resolve(None, Some(0), &settings).is_err());
        assert!(Page::resolve(None, Some(101), &settings).is_err());
        assert!(Page::resolve(Some(40), Some(100), &settings).is_ok());
    }

    #[test]
    fn headers_echo_resolved_values() {
        let headers = Page { offset: 40, limit: 10 }.headers();
        assert_eq!(headers.get("x-offset").unwrap(), "40");
        assert_eq!(headers.get("x-limit").unwrap(), "10");
    }
}
