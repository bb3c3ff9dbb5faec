/*
 * Responsibility
 * - Categories の request/response DTO (camelCase)
 * - validate() で name の形式チェック
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::repos::category_repo::{CategoryInput, CategoryRow};

pub const NAME_MAX_CHARS: usize = 100;

/// Body of POST and PUT (full replace).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequest {
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<i64>,
}

impl CategoryRequest {
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
        Ok(())
    }

    pub fn as_input(&self) -> CategoryInput<'_> {
        CategoryInput {
            name: self.name.trim(),
            description: self.description.as_deref(),
            parent_id: self.parent_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for CategoryResponse {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            parent_id: row.parent_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn name_length_counts_chars_not_bytes() {
        let req: CategoryRequest =
            serde_json::from_value(json!({"name": "é".repeat(100), "parentId": 3})).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.as_input().parent_id, Some(3));

        let req: CategoryRequest =
            serde_json::from_value(json!({"name": "é".repeat(101)})).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn input_trims_name() {
        let req: CategoryRequest =
            serde_json::from_value(json!({"name": "  Books  ", "description": null})).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.as_input().name, "Books");
    }
}
