//! Product entity, DTOs and listing filter.
//!
//! JSON field names are camelCase to match the admin panel and storefront.

use senso_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: DbId,
    pub slug: String,
    pub name: String,
    pub category: String,
    pub image: String,
    pub description: String,
    pub active_ingredient: String,
    pub target_pests: Vec<String>,
    pub applicable_crops: Vec<String>,
    pub dosage: String,
    pub application_method: String,
    pub pack_sizes: Vec<String>,
    pub key_features: Vec<String>,
    pub benefits: Vec<String>,
    pub about_product: String,
    pub safety_information: Vec<String>,
    pub safety_note: String,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a product from the admin form.
///
/// Required text fields default to empty so a missing field surfaces as a
/// per-field validation message instead of a generic deserialization error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    /// Derived from `name` when absent or blank.
    pub slug: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub active_ingredient: String,
    #[serde(default)]
    pub target_pests: Vec<String>,
    #[serde(default)]
    pub applicable_crops: Vec<String>,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub application_method: String,
    #[serde(default)]
    pub pack_sizes: Vec<String>,
    #[serde(default)]
    pub key_features: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub about_product: String,
    #[serde(default)]
    pub safety_information: Vec<String>,
    /// Falls back to the standard label warning when `None`.
    pub safety_note: Option<String>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
}

/// DTO for partially updating a product. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    pub slug: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub active_ingredient: Option<String>,
    pub target_pests: Option<Vec<String>>,
    pub applicable_crops: Option<Vec<String>>,
    pub dosage: Option<String>,
    pub application_method: Option<String>,
    pub pack_sizes: Option<Vec<String>>,
    pub key_features: Option<Vec<String>>,
    pub benefits: Option<Vec<String>>,
    pub about_product: Option<String>,
    pub safety_information: Option<Vec<String>>,
    pub safety_note: Option<String>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
}

/// Filter for [`crate::repositories::ProductRepo::list`].
#[derive(Debug, Clone)]
pub struct ProductFilter {
    pub include_inactive: bool,
    pub category: Option<String>,
    pub featured_only: bool,
    /// Case-insensitive substring matched against name, slug, active
    /// ingredient and category.
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            include_inactive: false,
            category: None,
            featured_only: false,
            search: None,
            limit: senso_core::search::DEFAULT_LIST_LIMIT,
            offset: 0,
        }
    }
}

/// Number of products in one category.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

/// Catalog totals for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStats {
    pub total: i64,
    pub active: i64,
    pub featured: i64,
    pub by_category: Vec<CategoryCount>,
}
