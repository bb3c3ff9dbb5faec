/*
 * Responsibility
 * - products CRUD + 一覧系 (ページング / カテゴリ / 価格帯 / 検索)
 * - 並び順は一覧の種類ごとに固定 (id / price / name)
 * - category_id の FK (CASCADE) 前提で削除挙動を意識
 */
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;

#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub category_id: Option<i64>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct ProductInput<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub category_id: Option<i64>,
    pub status: &'a str,
}

/// Escape LIKE wildcards so the search term is matched literally.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

pub async fn list(db: &PgPool, limit: i64, offset: i64) -> Result<Vec<ProductRow>, RepoError> {
    let rows = sqlx::query_as::<_, ProductRow>(
        r#"
        SELECT
            id, name, description, price, stock_quantity, category_id, status,
            created_at, updated_at
        FROM products
        ORDER BY id ASC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn list_by_category(
    db: &PgPool,
    category_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<ProductRow>, RepoError> {
    let rows = sqlx::query_as::<_, ProductRow>(
        r#"
        SELECT
            id, name, description, price, stock_quantity, category_id, status,
            created_at, updated_at
        FROM products
        WHERE category_id = $1
        ORDER BY id ASC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(category_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

/// Inclusive bounds; either side may be open.
pub async fn list_by_price_range(
    db: &PgPool,
    min_price: Option<Decimal>,
    max_price: Option<Decimal>,
    limit: i64,
    offset: i64,
) -> Result<Vec<ProductRow>, RepoError> {
    let rows = sqlx::query_as::<_, ProductRow>(
        r#"
        SELECT
            id, name, description, price, stock_quantity, category_id, status,
            created_at, updated_at
        FROM products
        WHERE ($1::numeric IS NULL OR price >= $1)
          AND ($2::numeric IS NULL OR price <= $2)
        ORDER BY price ASC, id ASC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(min_price)
    .bind(max_price)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

/// Case-insensitive substring match over name and description.
pub async fn search(
    db: &PgPool,
    term: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<ProductRow>, RepoError> {
    let rows = sqlx::query_as::<_, ProductRow>(
        r#"
        SELECT
            id, name, description, price, stock_quantity, category_id, status,
            created_at, updated_at
        FROM products
        WHERE LOWER(name) LIKE $1 ESCAPE '\'
           OR LOWER(COALESCE(description, '')) LIKE $1 ESCAPE '\'
        ORDER BY name ASC, id ASC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(like_pattern(term))
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn count(db: &PgPool) -> Result<i64, RepoError> {
    let n: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM products"#)
        .fetch_one(db)
        .await?;

    Ok(n)
}

pub async fn get(db: &PgPool, id: i64) -> Result<Option<ProductRow>, RepoError> {
    let row = sqlx::query_as::<_, ProductRow>(
        r#"
        SELECT
            id, name, description, price, stock_quantity, category_id, status,
            created_at, updated_at
        FROM products
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn create(db: &PgPool, input: &ProductInput<'_>) -> Result<ProductRow, RepoError> {
    let row = sqlx::query_as::<_, ProductRow>(
        r#"
        INSERT INTO products (name, description, price, stock_quantity, category_id, status)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING
            id, name, description, price, stock_quantity, category_id, status,
            created_at, updated_at
        "#,
    )
    .bind(input.name)
    .bind(input.description)
    .bind(input.price)
    .bind(input.stock_quantity)
    .bind(input.category_id)
    .bind(input.status)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

/// Full replace. Returns `None` when the product does not exist.
pub async fn update(
    db: &PgPool,
    id: i64,
    input: &ProductInput<'_>,
) -> Result<Option<ProductRow>, RepoError> {
    let row = sqlx::query_as::<_, ProductRow>(
        r#"
        UPDATE products
        SET
            name = $2,
            description = $3,
            price = $4,
            stock_quantity = $5,
            category_id = $6,
            status = $7,
            updated_at = now()
        WHERE id = $1
        RETURNING
            id, name, description, price, stock_quantity, category_id, status,
            created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(input.name)
    .bind(input.description)
    .bind(input.price)
    .bind(input.stock_quantity)
    .bind(input.category_id)
    .bind(input.status)
    .fetch_optional(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn delete(db: &PgPool, id: i64) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM products
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}
