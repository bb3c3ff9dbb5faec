//! Bearer gateway middleware: authenticate → Identity を extensions に入れる
//!
//! - 検証そのもの (extract / verify / validate) は `services::auth::Gateway` の責務
//! - ここは HTTP との接続だけ: 失敗時は challenge 付き 401、成功時は inner service へ
//! - token / secret はログに出さない (stage と reason のみ)

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::services::auth::{AuthError, Gateway};

/// 渡された Router 全体に Bearer gateway を掛ける。
///
/// 例：
/// ```ignore
/// let v2 = middleware::auth::access::apply(api::v2::routes(), gateway);
/// app = app.nest("/catalog/v2", v2);
/// ```
pub fn apply<S>(router: Router<S>, gateway: Arc<Gateway>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(gateway, access_middleware))
}

async fn access_middleware(
    State(gateway): State<Arc<Gateway>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let identity = match gateway.authenticate_headers(req.headers()) {
        Ok(identity) => identity,
        Err(err) => {
            log_rejection(&err, &req);
            return Err(AppError::Unauthorized(gateway.challenge().clone()));
        }
    };

    tracing::debug!(
        principal = identity.principal_name(),
        "request authenticated"
    );

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

fn log_rejection(err: &AuthError, req: &Request<Body>) {
    match err {
        // anonymous requests
        AuthError::MissingCredential => tracing::debug!(
            stage = %err.stage(),
            reason = %err,
            method = %req.method(),
            path = req.uri().path(),
            "request rejected"
        ),
        _ => tracing::warn!(
            stage = %err.stage(),
            reason = %err,
            method = %req.method(),
            path = req.uri().path(),
            "request rejected"
        ),
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::to_bytes,
        http::{StatusCode, header},
        routing::get,
    };
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::api::v2::extractors::CurrentIdentity;
    use crate::services::auth::policy::AuthPolicy;

    const SECRET: &[u8] = b"catalog-secret-2023";

    fn router() -> Router {
        let policy =
            AuthPolicy::new(SECRET.to_vec(), ["catalog:read", "catalog:write"], "Bearer").unwrap();
        let gateway = Arc::new(Gateway::new(policy));

        let inner = Router::new().route(
            "/whoami",
            get(|CurrentIdentity(identity): CurrentIdentity| async move {
                identity.principal_name().to_string()
            }),
        );
        apply(inner, gateway)
    }

    fn token(claims: Value) -> String {
        encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap()
    }

    fn request(authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/whoami");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn missing_header_gets_challenge() {
        let response = router().oneshot(request(None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            r#"Bearer realm="oauth2""#
        );
    }

    #[tokio::test]
    async fn valid_token_publishes_identity() {
        let bearer = format!(
            "Bearer {}",
            token(json!({"sub": "u1", "scope": "catalog:read"}))
        );
        let response = router().oneshot(request(Some(&bearer))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "u1");
    }

    #[tokio::test]
    async fn every_rejection_looks_the_same() {
        let wrong_scope = format!(
            "Bearer {}",
            token(json!({"sub": "u1", "scope": "inventory:write"}))
        );
        let no_subject = format!("Bearer {}", token(json!({"scope": "catalog:read"})));

        let mut bodies = Vec::new();
        for auth in [
            "Bearer ",
            "Basic dTE6cHc=",
            "Bearer not.a.jwt",
            wrong_scope.as_str(),
            no_subject.as_str(),
        ] {
            let response = router().oneshot(request(Some(auth))).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{auth}");
            assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
            bodies.push(body_text(response).await);
        }

        assert!(bodies.windows(2).all(|w| w[0] == w[1]));
    }
}
