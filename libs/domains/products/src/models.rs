use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Stored inventory record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Assigned by the store
    pub id: i32,
    /// Unique across all products
    pub name: String,
    /// Zero is allowed after an update, negative never is
    #[validate(range(min = 0.0, code = "price", message = "price is invalid"))]
    pub price: f64,
    pub expiry: DateTime<Utc>,
    pub category_id: i32,
}

impl Product {
    /// Overwrite the fields present in `input`. The id never changes.
    pub fn apply_update(&mut self, input: UpdateProduct) {
        if let Some(name) = input.name {
            self.name = name;
        }
        if let Some(price) = input.price {
            self.price = price;
        }
        if let Some(expiry) = input.expiry {
            self.expiry = expiry;
        }
        if let Some(category_id) = input.category_id {
            self.category_id = category_id;
        }
    }
}

/// Create request body (draft)
///
/// Missing fields decode as zero values; a missing `expiry` is
/// [`zero_expiry`], `0001-01-01T00:00:00Z`.
/// Any `id` in the body is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default, rename_all = "camelCase")]
#[validate(schema(function = "validate_category"))]
pub struct NewProduct {
    #[validate(length(min = 1, code = "name", message = "name is missing"))]
    pub name: String,
    #[validate(range(exclusive_min = 0.0, code = "price", message = "price is missing or invalid"))]
    pub price: f64,
    #[serde(default = "zero_expiry")]
    pub expiry: DateTime<Utc>,
    pub category_id: i32,
}

impl Default for NewProduct {
    fn default() -> Self {
        Self {
            name: String::new(),
            price: 0.0,
            expiry: zero_expiry(),
            category_id: 0,
        }
    }
}

/// Zero timestamp for an unset expiry: midnight UTC, January 1st of year 1.
pub fn zero_expiry() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

fn validate_category(draft: &NewProduct) -> Result<(), ValidationError> {
    if draft.category_id == 0 {
        return Err(ValidationError::new("category").with_message("category is missing".into()));
    }
    Ok(())
}

/// Update request body; absent or `null` fields keep the stored value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub expiry: Option<DateTime<Utc>>,
    pub category_id: Option<i32>,
}

/// Body of successful create and update responses.
///
/// The key is `error` even on success; clients depend on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WriteAck {
    #[schema(example = "created successfully")]
    pub error: String,
}

impl WriteAck {
    pub fn created() -> Self {
        Self {
            error: "created successfully".to_string(),
        }
    }

    pub fn updated() -> Self {
        Self {
            error: "updated successfully".to_string(),
        }
    }
}

/// Body of every delete response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeleteAck {
    #[schema(example = "deleted successfully")]
    pub msg: String,
}

impl Default for DeleteAck {
    fn default() -> Self {
        Self {
            msg: "deleted successfully".to_string(),
        }
    }
}
