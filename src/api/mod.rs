/*
 * Responsibility
 * - API のバージョン単位の公開 (v2) と、認証の外に置く /health
 */
pub mod health;
pub mod v2;
