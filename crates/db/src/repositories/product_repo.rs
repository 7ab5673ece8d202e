//! Repository for the `products` table.

use senso_core::product::DEFAULT_SAFETY_NOTE;
use senso_core::search::escape_like;
use senso_core::types::DbId;
use sqlx::PgPool;

use crate::models::product::{
    CategoryCount, CreateProduct, Product, ProductFilter, ProductStats, UpdateProduct,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, slug, name, category, image, description, active_ingredient, \
    target_pests, applicable_crops, dosage, application_method, pack_sizes, \
    key_features, benefits, about_product, safety_information, safety_note, \
    is_active, is_featured, created_at, updated_at";

/// Provides CRUD operations for products.
pub struct ProductRepo;

impl ProductRepo {
    /// Insert a new product under the given (already validated) slug.
    ///
    /// A `None` safety note stores [`DEFAULT_SAFETY_NOTE`].
    ///
    /// A duplicate slug fails with a unique violation on `uq_products_slug`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProduct,
        slug: &str,
    ) -> Result<Product, sqlx::Error> {
        let query = format!(
            "INSERT INTO products \
                (slug, name, category, image, description, active_ingredient, \
                 target_pests, applicable_crops, dosage, application_method, pack_sizes, \
                 key_features, benefits, about_product, safety_information, safety_note, \
                 is_active, is_featured) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, \
                 $16, COALESCE($17, true), COALESCE($18, false)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(slug)
            .bind(&input.name)
            .bind(&input.category)
            .bind(&input.image)
            .bind(&input.description)
            .bind(&input.active_ingredient)
            .bind(&input.target_pests)
            .bind(&input.applicable_crops)
            .bind(&input.dosage)
            .bind(&input.application_method)
            .bind(&input.pack_sizes)
            .bind(&input.key_features)
            .bind(&input.benefits)
            .bind(&input.about_product)
            .bind(&input.safety_information)
            .bind(input.safety_note.as_deref().unwrap_or(DEFAULT_SAFETY_NOTE))
            .bind(input.is_active)
            .bind(input.is_featured)
            .fetch_one(pool)
            .await
    }

    /// Find a product by its internal ID, regardless of visibility.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a product by slug. Hidden products are skipped unless
    /// `include_inactive` is set.
    pub async fn find_by_slug(
        pool: &PgPool,
        slug: &str,
        include_inactive: bool,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM products \
             WHERE slug = $1 AND ($2 OR is_active = true)"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(slug)
            .bind(include_inactive)
            .fetch_optional(pool)
            .await
    }

    /// List products matching `filter`, newest first.
    pub async fn list(pool: &PgPool, filter: &ProductFilter) -> Result<Vec<Product>, sqlx::Error> {
        let pattern = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", escape_like(s)));

        let query = format!(
            "SELECT {COLUMNS} FROM products \
             WHERE ($1 OR is_active = true) \
               AND ($2::TEXT IS NULL OR category = $2) \
               AND (NOT $3 OR is_featured = true) \
               AND ($4::TEXT IS NULL \
                    OR name ILIKE $4 OR slug ILIKE $4 \
                    OR active_ingredient ILIKE $4 OR category ILIKE $4) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(filter.include_inactive)
            .bind(filter.category.as_deref())
            .bind(filter.featured_only)
            .bind(pattern)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await
    }

    /// Active products in `category`, excluding `exclude_id`, newest first.
    pub async fn list_related(
        pool: &PgPool,
        category: &str,
        exclude_id: DbId,
        limit: i64,
    ) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM products \
             WHERE is_active = true AND category = $1 AND id <> $2 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $3"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(category)
            .bind(exclude_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Partially update a product. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "UPDATE products SET \
                slug = COALESCE($2, slug), \
                name = COALESCE($3, name), \
                category = COALESCE($4, category), \
                image = COALESCE($5, image), \
                description = COALESCE($6, description), \
                active_ingredient = COALESCE($7, active_ingredient), \
                target_pests = COALESCE($8, target_pests), \
                applicable_crops = COALESCE($9, applicable_crops), \
                dosage = COALESCE($10, dosage), \
                application_method = COALESCE($11, application_method), \
                pack_sizes = COALESCE($12, pack_sizes), \
                key_features = COALESCE($13, key_features), \
                benefits = COALESCE($14, benefits), \
                about_product = COALESCE($15, about_product), \
                safety_information = COALESCE($16, safety_information), \
                safety_note = COALESCE($17, safety_note), \
                is_active = COALESCE($18, is_active), \
                is_featured = COALESCE($19, is_featured) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(&input.slug)
            .bind(&input.name)
            .bind(&input.category)
            .bind(&input.image)
            .bind(&input.description)
            .bind(&input.active_ingredient)
            .bind(&input.target_pests)
            .bind(&input.applicable_crops)
            .bind(&input.dosage)
            .bind(&input.application_method)
            .bind(&input.pack_sizes)
            .bind(&input.key_features)
            .bind(&input.benefits)
            .bind(&input.about_product)
            .bind(&input.safety_information)
            .bind(&input.safety_note)
            .bind(input.is_active)
            .bind(input.is_featured)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a product. Returns `false` if nothing was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count products, optionally including hidden ones.
    pub async fn count(pool: &PgPool, include_inactive: bool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE ($1 OR is_active = true)")
            .bind(include_inactive)
            .fetch_one(pool)
            .await
    }

    /// Catalog totals across all products, hidden ones included.
    pub async fn stats(pool: &PgPool) -> Result<ProductStats, sqlx::Error> {
        let (total, active, featured): (i64, i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), \
                    COUNT(*) FILTER (WHERE is_active), \
                    COUNT(*) FILTER (WHERE is_featured) \
             FROM products",
        )
        .fetch_one(pool)
        .await?;

        let by_category = sqlx::query_as::<_, CategoryCount>(
            "SELECT category, COUNT(*) AS count FROM products \
             GROUP BY category ORDER BY category",
        )
        .fetch_all(pool)
        .await?;

        Ok(ProductStats {
            total,
            active,
            featured,
            by_category,
        })
    }
}
