/*
 * Responsibility
 * - /catalog/v2/categories 系 handler (CRUD / root / children / 所属 products)
 * - parent 付け替え時の循環チェック
 * - 削除は FK CASCADE に任せる (子カテゴリ・所属 product も消える)
 */
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
};

use crate::{
    api::v2::{
        dto::{
            categories::{CategoryRequest, CategoryResponse},
            paging::{PageQuery, X_TOTAL_COUNT},
            products::ProductResponse,
        },
        extractors::CurrentIdentity,
        handlers::products::to_responses,
    },
    error::AppError,
    repos::{
        category_repo::{self, CategoryRow},
        error::RepoError,
        product_repo,
    },
    state::AppState,
};

const X_CATEGORY_ID: HeaderName = HeaderName::from_static("x-category-id");

fn category_responses(rows: Vec<CategoryRow>) -> Vec<CategoryResponse> {
    rows.into_iter().map(CategoryResponse::from).collect()
}

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<(HeaderMap, Json<Vec<CategoryResponse>>), AppError> {
    let rows = category_repo::list(&state.db).await?;
    let total = category_repo::count(&state.db).await?;

    let mut headers = HeaderMap::new();
    headers.insert(X_TOTAL_COUNT, HeaderValue::from(total));

    Ok((headers, Json(category_responses(rows))))
}

pub async fn list_root_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    let rows = category_repo::list_roots(&state.db).await?;
    Ok(Json(category_responses(rows)))
}

pub async fn list_child_categories(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    if !category_repo::exists(&state.db, category_id).await? {
        return Err(AppError::not_found("category"));
    }

    let rows = category_repo::list_children(&state.db, category_id).await?;
    Ok(Json(category_responses(rows)))
}

pub async fn list_category_products(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> Result<(HeaderMap, Json<Vec<ProductResponse>>), AppError> {
    let page = query.resolve(&state.catalog)?;

    if !category_repo::exists(&state.db, category_id).await? {
        return Err(AppError::not_found("category"));
    }

    let rows =
        product_repo::list_by_category(&state.db, category_id, page.limit, page.offset).await?;

    let mut headers = page.headers();
    headers.insert(X_CATEGORY_ID, HeaderValue::from(category_id));

    Ok((headers, Json(to_responses(rows)?)))
}

pub async fn create_category(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Json(req): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), AppError> {
    req.validate()?;

    let row = category_repo::create(&state.db, &req.as_input())
        .await
        .map_err(name_conflict)?;
    tracing::info!(
        principal = identity.principal_name(),
        category_id = row.id,
        "category created"
    );

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
) -> Result<Json<CategoryResponse>, AppError> {
    let row = category_repo::get(&state.db, category_id)
        .await?
        .ok_or(AppError::not_found("category"))?;

    Ok(Json(row.into()))
}

pub async fn update_category(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(category_id): Path<i64>,
    Json(req): Json<CategoryRequest>,
) -> Result<Json<CategoryResponse>, AppError> {
    req.validate()?;

    if let Some(parent_id) = req.parent_id
        && (parent_id == category_id
            || category_repo::is_in_subtree(&state.db, category_id, parent_id).await?)
    {
        return Err(AppError::bad_request(
            "INVALID_PARENT",
            "a category cannot be moved under itself or its descendants",
        ));
    }

    let row = category_repo::update(&state.db, category_id, &req.as_input())
        .await
        .map_err(name_conflict)?
        .ok_or(AppError::not_found("category"))?;
    tracing::info!(
        principal = identity.principal_name(),
        category_id,
        "category updated"
    );

    Ok(Json(row.into()))
}

pub async fn delete_category(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(category_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !category_repo::delete(&state.db, category_id).await? {
        return Err(AppError::not_found("category"));
    }
    tracing::info!(
        principal = identity.principal_name(),
        category_id,
        "category deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

// categories.name is the only unique column besides the key.
fn name_conflict(e: RepoError) -> AppError {
    match e {
        RepoError::Conflict => {
            AppError::conflict("DUPLICATE_NAME", "a category with this name already exists")
        }
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use axum::{body::to_bytes, response::IntoResponse};
    use serde_json::Value;

    use super::*;

    #[tokio::test]
    async fn duplicate_name_is_conflict() {
        let response = name_conflict(RepoError::Conflict).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "DUPLICATE_NAME");
    }

    #[test]
    fn other_repo_errors_keep_their_mapping() {
        let response = name_conflict(RepoError::InvalidReference).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
