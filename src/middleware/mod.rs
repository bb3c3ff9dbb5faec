/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth (Bearer gateway), cors, http (request id / limit / timeout / trace)
 */
pub mod auth;
pub mod cors;
pub mod http;
