/*
 * Responsibility
 * - v2 (catalog) の URL 構造を定義
 * - /products, /categories を route
 * - Gateway はこの Router 全体 (fallback 含む) に app 側で layer する
 */
use axum::{Router, routing::get};

use crate::error::AppError;
use crate::state::AppState;

use crate::api::v2::handlers::{
    categories::{
        create_category, delete_category, get_category, list_categories, list_category_products,
        list_child_categories, list_root_categories, update_category,
    },
    products::{
        create_product, delete_product, get_product, list_products, products_by_price,
        search_products, update_product,
    },
};

// Unknown paths under /catalog/v2 are answered behind the gateway as well.
async fn not_found() -> AppError {
    AppError::not_found("resource")
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/search", get(search_products))
        .route("/products/by-price", get(products_by_price))
        .route(
            "/products/{product_id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/root", get(list_root_categories))
        .route(
            "/categories/{category_id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
        .route(
            "/categories/{category_id}/children",
            get(list_child_categories),
        )
        .route(
            "/categories/{category_id}/products",
            get(list_category_products),
        )
        .fallback(not_found)
}
