/*
 * Responsibility
 * - /catalog/v2/products 系 handler (CRUD / 検索 / 価格帯)
 * - 入力チェックは DB アクセス前に行い 400 を返す
 * - 書き込みは Identity (principal) 付きでログに残す
 */
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
};

use crate::{
    api::v2::{
        dto::{
            paging::{Page, PageQuery, X_TOTAL_COUNT},
            products::{PriceRangeQuery, ProductRequest, ProductResponse, SearchQuery},
        },
        extractors::CurrentIdentity,
    },
    error::AppError,
    repos::product_repo::{self, ProductRow},
    state::AppState,
};

const X_SEARCH_TERM: HeaderName = HeaderName::from_static("x-search-term");
const X_MIN_PRICE: HeaderName = HeaderName::from_static("x-min-price");
const X_MAX_PRICE: HeaderName = HeaderName::from_static("x-max-price");

pub(crate) fn to_responses(rows: Vec<ProductRow>) -> Result<Vec<ProductResponse>, AppError> {
    rows.into_iter().map(ProductResponse::try_from).collect()
}

// Values that cannot be carried in a header are left off rather than sent blank.
fn insert_text(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(v) => {
            headers.insert(name, v);
        }
        Err(_) => tracing::debug!(header = %name, "header value omitted"),
    }
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<(HeaderMap, Json<Vec<ProductResponse>>), AppError> {
    let page = query.resolve(&state.catalog)?;

    let rows = product_repo::list(&state.db, page.limit, page.offset).await?;
    let total = product_repo::count(&state.db).await?;

    let mut headers = page.headers();
    headers.insert(X_TOTAL_COUNT, HeaderValue::from(total));

    Ok((headers, Json(to_responses(rows)?)))
}

pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<(HeaderMap, Json<Vec<ProductResponse>>), AppError> {
    let term = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::bad_request("VALIDATION_ERROR", "q is required"))?;
    let page = Page::resolve(query.offset, query.limit, &state.catalog)?;

    let rows = product_repo::search(&state.db, term, page.limit, page.offset).await?;

    let mut headers = page.headers();
    insert_text(&mut headers, X_SEARCH_TERM, term);

    Ok((headers, Json(to_responses(rows)?)))
}

pub async fn products_by_price(
    State(state): State<AppState>,
    Query(query): Query<PriceRangeQuery>,
) -> Result<(HeaderMap, Json<Vec<ProductResponse>>), AppError> {
    query.validate()?;
    let page = Page::resolve(query.offset, query.limit, &state.catalog)?;

    let rows = product_repo::list_by_price_range(
        &state.db,
        query.min_price,
        query.max_price,
        page.limit,
        page.offset,
    )
    .await?;

    let mut headers = page.headers();
    for (name, bound) in [(X_MIN_PRICE, query.min_price), (X_MAX_PRICE, query.max_price)] {
        match bound {
            Some(price) => insert_text(&mut headers, name, &price.to_string()),
            None => {
                headers.insert(name, HeaderValue::from_static("null"));
            }
        }
    }

    Ok((headers, Json(to_responses(rows)?)))
}

pub async fn create_product(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Json(req): Json<ProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    req.validate()?;

    let row = product_repo::create(&state.db, &req.as_input()).await?;
    tracing::info!(
        principal = identity.principal_name(),
        product_id = row.id,
        "product created"
    );

    Ok((StatusCode::CREATED, Json(row.try_into()?)))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> Result<Json<ProductResponse>, AppError> {
    let row = product_repo::get(&state.db, product_id)
        .await?
        .ok_or(AppError::not_found("product"))?;

    Ok(Json(row.try_into()?))
}

pub async fn update_product(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(product_id): Path<i64>,
    Json(req): Json<ProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    req.validate()?;

    let row = product_repo::update(&state.db, product_id, &req.as_input())
        .await?
        .ok_or(AppError::not_found("product"))?;
    tracing::info!(
        principal = identity.principal_name(),
        product_id,
        "product updated"
    );

    Ok(Json(row.try_into()?))
}

pub async fn delete_product(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(product_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !product_repo::delete(&state.db, product_id).await? {
        return Err(AppError::not_found("product"));
    }
    tracing::info!(
        principal = identity.principal_name(),
        product_id,
        "product deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}
