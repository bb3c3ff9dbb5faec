/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - db: PgPool, catalog: ページング設定
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 *
 * Notes
 * - Gateway は middleware 側の state として別に渡す (handler は Identity だけ見る)
 */
use sqlx::PgPool;

use crate::config::CatalogSettings;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub catalog: CatalogSettings,
}

impl AppState {
    pub fn new(db: PgPool, catalog: CatalogSettings) -> Self {
        Self { db, catalog }
    }
}
