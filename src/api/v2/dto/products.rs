/*
 * Responsibility
 * - Products の request/response DTO (camelCase)
 * - validate() で形式チェック (DB に行く前に 400 を返す)
 * - status は ACTIVE / INACTIVE / DISCONTINUED の 3 値
 */
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::repos::product_repo::{ProductInput, ProductRow};

pub const NAME_MAX_CHARS: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
    Discontinued,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
            Self::Discontinued => "DISCONTINUED",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl FromStr for ProductStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "INACTIVE" => Ok(Self::Inactive),
            "DISCONTINUED" => Ok(Self::Discontinued),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Body of POST and PUT (full replace).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub category_id: Option<i64>,
    #[serde(default)]
    pub status: ProductStatus,
}

impl ProductRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::bad_request("VALIDATION_ERROR", "name is required"));
        }
        if name.chars().count() > NAME_MAX_CHARS {
            return Err(AppError::bad_request(
                "VALIDATION_ERROR",
                format!("name must be <= {NAME_MAX_CHARS} chars"),
            ));
        }
        // NUMERIC(10,2)
        if self.price < Decimal::new(1, 2) || self.price > Decimal::new(99_999_999_99, 2) {
            return Err(AppError::bad_request(
                "VALIDATION_ERROR",
                "price must be between 0.01 and 99999999.99",
            ));
        }
        if self.price.normalize().scale() > 2 {
            return Err(AppError::bad_request(
                "VALIDATION_ERROR",
                "price must have at most 2 decimal places",
            ));
        }
        if self.stock_quantity < 0 {
            return Err(AppError::bad_request(
                "VALIDATION_ERROR",
                "stockQuantity must be >= 0",
            ));
        }

        Ok(())
    }

    pub fn as_input(&self) -> ProductInput<'_> {
        ProductInput {
            name: self.name.trim(),
            description: self.description.as_deref(),
            price: self.price,
            stock_quantity: self.stock_quantity,
            category_id: self.category_id,
            status: self.status.as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock_quantity: i32,
    pub category_id: Option<i64>,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for ProductResponse {
    type Error = AppError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<ProductStatus>().map_err(|err| {
            tracing::error!(product_id = row.id, status = %err.0, "unknown product status in db");
            AppError::Internal
        })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            stock_quantity: row.stock_quantity,
            category_id: row.category_id,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeQuery {
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl PriceRangeQuery {
    pub fn validate(&self) -> Result<(), AppError> {
        for bound in [self.min_price, self.max_price].into_iter().flatten() {
            if bound.is_sign_negative() {
                return Err(AppError::bad_request(
                    "VALIDATION_ERROR",
                    "price bounds must be >= 0",
                ));
            }
        }
        if let (Some(min), Some(max)) = (self.min_price, self.max_price)
            && min > max
        {
            return Err(AppError::bad_request(
                "VALIDATION_ERROR",
                "minPrice must be <= maxPrice",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn request(body: serde_json::Value) -> ProductRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn status_defaults_to_active_and_parses_upper_case() {
        let req = request(json!({"name": "Laptop", "price": 999.99, "stockQuantity": 3}));
        assert_eq!(req.status, ProductStatus::Active);
        assert!(req.validate().is_ok());

        assert_eq!("DISCONTINUED".parse(), Ok(ProductStatus::Discontinued));
        assert!("active".parse::<ProductStatus>().is_err());
    }

    #[test]
    fn price_and_stock_bounds_are_enforced() {
        let zero = request(json!({"name": "x", "price": 0, "stockQuantity": 0}));
        assert!(zero.validate().is_err());

        let fractional = request(json!({"name": "x", "price": "1.005", "stockQuantity": 0}));
        assert!(fractional.validate().is_err());

        let negative_stock = request(json!({"name": "x", "price": 1, "stockQuantity": -1}));
        assert!(negative_stock.validate().is_err());

        let trailing_zeros = request(json!({"name": "x", "price": "1.500", "stockQuantity": 0}));
        assert!(trailing_zeros.validate().is_ok());
    }

    #[test]
    fn blank_or_long_name_is_rejected() {
        let blank = request(json!({"name": "  ", "price": 1, "stockQuantity": 0}));
        assert!(blank.validate().is_err());

        let long = request(json!({"name": "a".repeat(256), "price": 1, "stockQuantity": 0}));
        assert!(long.validate().is_err());
    }

    #[test]
    fn price_range_requires_min_not_above_max() {
        let query = PriceRangeQuery {
            min_price: Some(Decimal::new(50, 0)),
            max_price: Some(Decimal::new(10, 0)),
            offset: None,
            limit: None,
        };
        assert!(query.validate().is_err());

        let open = PriceRangeQuery {
            min_price: None,
            max_price: Some(Decimal::new(10, 0)),
            offset: None,
            limit: None,
        };
        assert!(open.validate().is_ok());
    }

    #[test]
    fn response_uses_camel_case_and_numeric_price() {
        let now = Utc::now();
        let row = ProductRow {
            id: 7,
            name: "Laptop".into(),
            description: None,
            price: Decimal::new(99_999, 2),
            stock_quantity: 3,
            category_id: Some(1),
            status: "INACTIVE".into(),
            created_at: now,
            updated_at: now,
        };
        let value = serde_json::to_value(ProductResponse::try_from(row).unwrap()).unwrap();

        assert_eq!(value["price"], json!(999.99));
        assert_eq!(value["stockQuantity"], 3);
        assert_eq!(value["categoryId"], 1);
        assert_eq!(value["status"], "INACTIVE");
    }
}
