use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};

use crate::services::auth::Identity;

/// Handler で Identity を受け取るための extractor
/// Gateway middleware が Identity を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 (ミドルウェア未設定のルートに付けた場合)
pub struct CurrentIdentity(pub Identity);

impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(CurrentIdentity)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
