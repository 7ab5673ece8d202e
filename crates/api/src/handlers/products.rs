//! Handlers for the `/products` resource.
//!
//! Reads are public but only see active products unless the caller holds an
//! admin token. Writes require the admin.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use senso_core::error::CoreError;
use senso_core::product::{
    clean_string_list, normalize_slug, parse_category_filter, resolve_slug, validate_category,
    validate_image_url, validate_name, validate_required, validate_slug, validate_string_list,
    DEFAULT_SAFETY_NOTE,
};
use senso_core::search::{
    clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, DEFAULT_RELATED_LIMIT, MAX_LIST_LIMIT,
    MAX_RELATED_LIMIT,
};
use senso_core::types::DbId;
use senso_db::models::product::{CreateProduct, Product, ProductFilter, UpdateProduct};
use senso_db::repositories::ProductRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{flag_enabled, ApiJson, ApiPath, ApiQuery};
use crate::middleware::auth::{AdminUser, MaybeAdmin};
use crate::response::DataResponse;
use crate::state::AppState;

const ENTITY: &str = "Product";

// ---------------------------------------------------------------------------
// Query parameter types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /products`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsParams {
    pub category: Option<String>,
    /// Switches the endpoint to a single-product lookup.
    pub slug: Option<String>,
    /// Only the literal `true` is honoured; other values are ignored.
    pub featured: Option<String>,
    pub include_inactive: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for `GET /products/{id}/related`.
#[derive(Debug, Default, Deserialize)]
pub struct RelatedParams {
    pub limit: Option<i64>,
}

// ---------------------------------------------------------------------------
// Input normalization
// ---------------------------------------------------------------------------

/// Labels used in "X is required" messages, keyed by the free-text field.
const DESCRIPTION: &str = "Description";
const ACTIVE_INGREDIENT: &str = "Active ingredient";
const DOSAGE: &str = "Dosage information";
const APPLICATION_METHOD: &str = "Application method";
const ABOUT_PRODUCT: &str = "About product information";

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

fn clean_list(label: &str, items: &mut Vec<String>) -> Result<(), CoreError> {
    *items = clean_string_list(std::mem::take(items));
    validate_string_list(label, items)
}

/// Trim and validate a create request in place, returning the slug to store.
fn prepare_create(input: &mut CreateProduct) -> Result<String, CoreError> {
    for field in [
        &mut input.name,
        &mut input.category,
        &mut input.image,
        &mut input.description,
        &mut input.active_ingredient,
        &mut input.dosage,
        &mut input.application_method,
        &mut input.about_product,
    ] {
        trim_in_place(field);
    }

    validate_name(&input.name)?;
    if input.category.is_empty() {
        return Err(CoreError::Validation("Category is required".into()));
    }
    validate_category(&input.category)?;
    validate_image_url(&input.image)?;
    validate_required(DESCRIPTION, &input.description)?;
    validate_required(ACTIVE_INGREDIENT, &input.active_ingredient)?;
    validate_required(DOSAGE, &input.dosage)?;
    validate_required(APPLICATION_METHOD, &input.application_method)?;
    validate_required(ABOUT_PRODUCT, &input.about_product)?;

    clean_list("Target pests", &mut input.target_pests)?;
    clean_list("Applicable crops", &mut input.applicable_crops)?;
    clean_list("Pack sizes", &mut input.pack_sizes)?;
    clean_list("Key features", &mut input.key_features)?;
    clean_list("Benefits", &mut input.benefits)?;
    clean_list("Safety information", &mut input.safety_information)?;

    input.safety_note = input
        .safety_note
        .take()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let slug = resolve_slug(input.slug.as_deref(), &input.name);
    validate_slug(&slug)?;
    Ok(slug)
}

fn prepare_optional(label: &str, value: &mut Option<String>) -> Result<(), CoreError> {
    if let Some(v) = value {
        trim_in_place(v);
        validate_required(label, v)?;
    }
    Ok(())
}

fn prepare_optional_list(label: &str, items: &mut Option<Vec<String>>) -> Result<(), CoreError> {
    match items {
        Some(items) => clean_list(label, items),
        None => Ok(()),
    }
}

/// Trim and validate a partial update in place.
///
/// A blank `slug` re-derives it from the new name, or from `current` when
/// the name is not changing. A blank `safetyNote` restores the default.
fn prepare_update(input: &mut UpdateProduct, current: &Product) -> Result<(), CoreError> {
    if let Some(name) = &mut input.name {
        trim_in_place(name);
        validate_name(name)?;
    }
    if let Some(category) = &mut input.category {
        trim_in_place(category);
        validate_category(category)?;
    }
    if let Some(image) = &mut input.image {
        trim_in_place(image);
        validate_image_url(image)?;
    }
    prepare_optional(DESCRIPTION, &mut input.description)?;
    prepare_optional(ACTIVE_INGREDIENT, &mut input.active_ingredient)?;
    prepare_optional(DOSAGE, &mut input.dosage)?;
    prepare_optional(APPLICATION_METHOD, &mut input.application_method)?;
    prepare_optional(ABOUT_PRODUCT, &mut input.about_product)?;

    prepare_optional_list("Target pests", &mut input.target_pests)?;
    prepare_optional_list("Applicable crops", &mut input.applicable_crops)?;
    prepare_optional_list("Pack sizes", &mut input.pack_sizes)?;
    prepare_optional_list("Key features", &mut input.key_features)?;
    prepare_optional_list("Benefits", &mut input.benefits)?;
    prepare_optional_list("Safety information", &mut input.safety_information)?;

    if let Some(note) = &mut input.safety_note {
        trim_in_place(note);
        if note.is_empty() {
            *note = DEFAULT_SAFETY_NOTE.to_string();
        }
    }

    if let Some(raw) = input.slug.take() {
        let name = input.name.as_deref().unwrap_or(&current.name);
        let slug = resolve_slug(Some(&raw), name);
        validate_slug(&slug)?;
        input.slug = Some(slug);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/products
///
/// With `slug`, returns that single active product. Otherwise lists products
/// newest first, filtered by category, featured flag and search text.
pub async fn list_products(
    admin: MaybeAdmin,
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListProductsParams>,
) -> AppResult<Response> {
    let include_inactive = flag_enabled(params.include_inactive.as_deref());
    if include_inactive && !admin.is_admin() {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Admin token required to list inactive products".into(),
        )));
    }

    if let Some(slug) = params
        .slug
        .as_deref()
        .map(normalize_slug)
        .filter(|s| !s.is_empty())
    {
        let product = ProductRepo::find_by_slug(&state.pool, &slug, false)
            .await?
            .ok_or(CoreError::NotFound {
                entity: ENTITY,
                key: slug,
            })?;
        return Ok(Json(DataResponse::new(product)).into_response());
    }

    let category = parse_category_filter(params.category.as_deref())?.map(str::to_string);
    let filter = ProductFilter {
        include_inactive,
        category,
        featured_only: flag_enabled(params.featured.as_deref()),
        search: params.search,
        limit: clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT),
        offset: clamp_offset(params.offset),
    };

    let products = ProductRepo::list(&state.pool, &filter).await?;
    tracing::debug!(
        count = products.len(),
        category = ?filter.category,
        featured_only = filter.featured_only,
        include_inactive,
        "Listed products",
    );
    Ok(Json(DataResponse::new(products)).into_response())
}

/// POST /api/products
pub async fn create_product(
    _admin: AdminUser,
    State(state): State<AppState>,
    ApiJson(mut input): ApiJson<CreateProduct>,
) -> AppResult<impl IntoResponse> {
    let slug = prepare_create(&mut input)?;

    let product = ProductRepo::create(&state.pool, &input, &slug).await?;

    tracing::info!(
        product_id = product.id,
        slug = %product.slug,
        category = %product.category,
        "Product created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse::new(product))))
}

/// GET /api/products/{id}
///
/// Inactive products are reported as missing unless the caller is the admin.
pub async fn get_product(
    admin: MaybeAdmin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<DataResponse<Product>>> {
    let product = ProductRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|p| p.is_active || admin.is_admin())
        .ok_or(CoreError::not_found_id(ENTITY, id))?;

    Ok(Json(DataResponse::new(product)))
}

/// PUT /api/products/{id}
///
/// Partial update: only fields present in the body change.
pub async fn update_product(
    _admin: AdminUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ApiJson(mut input): ApiJson<UpdateProduct>,
) -> AppResult<Json<DataResponse<Product>>> {
    let current = ProductRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::not_found_id(ENTITY, id))?;

    prepare_update(&mut input, &current)?;

    let product = ProductRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::not_found_id(ENTITY, id))?;

    tracing::info!(product_id = id, slug = %product.slug, "Product updated");

    Ok(Json(DataResponse::new(product)))
}

/// DELETE /api/products/{id}
pub async fn delete_product(
    _admin: AdminUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<StatusCode> {
    if !ProductRepo::delete(&state.pool, id).await? {
        return Err(CoreError::not_found_id(ENTITY, id).into());
    }

    tracing::info!(product_id = id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/products/{id}/related
///
/// Other active products in the same category as `id`.
pub async fn list_related(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ApiQuery(params): ApiQuery<RelatedParams>,
) -> AppResult<Json<DataResponse<Vec<Product>>>> {
    let product = ProductRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|p| p.is_active)
        .ok_or(CoreError::not_found_id(ENTITY, id))?;

    let limit = clamp_limit(params.limit, DEFAULT_RELATED_LIMIT, MAX_RELATED_LIMIT);
    let related = ProductRepo::list_related(&state.pool, &product.category, id, limit).await?;

    Ok(Json(DataResponse::new(related)))
}
