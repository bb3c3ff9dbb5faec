/*
 * Responsibility
 * - categories テーブル向け SQLx 操作
 * - 親子関係 (parent_id) の参照と循環チェック
 * - 一意制約 / FK 違反は RepoError::from_sqlx で意味付けして返す
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;

#[derive(Debug, Clone, FromRow)]
pub struct CategoryRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct CategoryInput<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub parent_id: Option<i64>,
}

pub async fn list(db: &PgPool) -> Result<Vec<CategoryRow>, RepoError> {
    let rows = sqlx::query_as::<_, CategoryRow>(
        r#"
        SELECT id, name, description, parent_id, created_at, updated_at
        FROM categories
        ORDER BY name ASC
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn list_roots(db: &PgPool) -> Result<Vec<CategoryRow>, RepoError> {
    let rows = sqlx::query_as::<_, CategoryRow>(
        r#"
        SELECT id, name, description, parent_id, created_at, updated_at
        FROM categories
        WHERE parent_id IS NULL
        ORDER BY name ASC
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn list_children(db: &PgPool, parent_id: i64) -> Result<Vec<CategoryRow>, RepoError> {
    let rows = sqlx::query_as::<_, CategoryRow>(
        r#"
        SELECT id, name, description, parent_id, created_at, updated_at
        FROM categories
        WHERE parent_id = $1
        ORDER BY name ASC
        "#,
    )
    .bind(parent_id)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn count(db: &PgPool) -> Result<i64, RepoError> {
    let n: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM categories"#)
        .fetch_one(db)
        .await?;

    Ok(n)
}

pub async fn get(db: &PgPool, id: i64) -> Result<Option<CategoryRow>, RepoError> {
    let row = sqlx::query_as::<_, CategoryRow>(
        r#"
        SELECT id, name, description, parent_id, created_at, updated_at
        FROM categories
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn exists(db: &PgPool, id: i64) -> Result<bool, RepoError> {
    let found: bool =
        sqlx::query_scalar(r#"SELECT EXISTS (SELECT 1 FROM categories WHERE id = $1)"#)
            .bind(id)
            .fetch_one(db)
            .await?;

    Ok(found)
}

pub async fn create(db: &PgPool, input: &CategoryInput<'_>) -> Result<CategoryRow, RepoError> {
    let row = sqlx::query_as::<_, CategoryRow>(
        r#"
        INSERT INTO categories (name, description, parent_id)
        VALUES ($1, $2, $3)
        RETURNING id, name, description, parent_id, created_at, updated_at
        "#,
    )
    .bind(input.name)
    .bind(input.description)
    .bind(input.parent_id)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

/// Full replace. Returns `None` when the category does not exist.
pub async fn update(
    db: &PgPool,
    id: i64,
    input: &CategoryInput<'_>,
) -> Result<Option<CategoryRow>, RepoError> {
    let row = sqlx::query_as::<_, CategoryRow>(
        r#"
        UPDATE categories
        SET
            name = $2,
            description = $3,
            parent_id = $4,
            updated_at = now()
        WHERE id = $1
        RETURNING id, name, description, parent_id, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(input.name)
    .bind(input.description)
    .bind(input.parent_id)
    .fetch_optional(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

/// Whether `candidate` is `ancestor` itself or one of its descendants.
/// Used to refuse re-parenting that would create a cycle.
pub async fn is_in_subtree(db: &PgPool, ancestor: i64, candidate: i64) -> Result<bool, RepoError> {
    let found: bool = sqlx::query_scalar(
        r#"
        WITH RECURSIVE subtree(id) AS (
            SELECT id FROM categories WHERE id = $1
            UNION
            SELECT c.id FROM categories c JOIN subtree s ON c.parent_id = s.id
        )
        SELECT EXISTS (SELECT 1 FROM subtree WHERE id = $2)
        "#,
    )
    .bind(ancestor)
    .bind(candidate)
    .fetch_one(db)
    .await?;

    Ok(found)
}

/// Children and products are removed by ON DELETE CASCADE.
pub async fn delete(db: &PgPool, id: i64) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM categories
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}
