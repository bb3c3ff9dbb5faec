/*
 * Responsibility
 * - 永続化層 (SQLx / Postgres) の公開
 * - handler からは repo 関数のみを呼び、SQL は repo に閉じ込める
 */
pub mod category_repo;
pub mod error;
pub mod product_repo;
