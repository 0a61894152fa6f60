use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    AuditEvent, AuditOutcome, IdPath, ValidatedJson,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse, ServiceUnavailableResponse,
    },
    extract_ip_from_headers, extract_user_agent,
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::entity;
use crate::error::{ProductError, ProductResult};
use crate::models::{
    ActionResponse, AdjustQuantity, Dashboard, InventoryReport, ProductInput, ProductSearch,
    ProductView, SeedOutcome,
};
use crate::repository::ProductRepository;
use crate::service::{InventoryService, to_views};

/// OpenAPI tag for report routes
pub const REPORTS_TAG: &str = "reports";
/// Mount point of the report routes under `/api`
pub const REPORTS_URL: &str = "/reports";

type SharedService<R> = Arc<InventoryService<R>>;

/// OpenAPI documentation for the product endpoints
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        delete_product,
        adjust_quantity,
        seed_inventory,
    ),
    components(
        schemas(ProductView, ProductInput, AdjustQuantity, ActionResponse),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            ConflictResponse,
            InternalServerErrorResponse,
            ServiceUnavailableResponse
        )
    ),
    tags(
        (name = entity::Model::TAG, description = "Product management endpoints")
    )
)]
pub struct ProductsApiDoc;

/// OpenAPI documentation for the report endpoints
#[derive(OpenApi)]
#[openapi(
    paths(dashboard, inventory_report, near_depletion, depleted),
    components(
        schemas(Dashboard, InventoryReport, ProductView),
        responses(InternalServerErrorResponse, ServiceUnavailableResponse)
    ),
    tags(
        (name = REPORTS_TAG, description = "Inventory valuation and stock reports")
    )
)]
pub struct ReportsApiDoc;

/// Product and report routes, mounted at their own prefixes
pub fn router<R: ProductRepository + 'static>(service: InventoryService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .nest(entity::Model::URL, products_router(shared_service.clone()))
        .nest(REPORTS_URL, reports_router(shared_service))
}

pub fn products_router<R: ProductRepository + 'static>(service: SharedService<R>) -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/seed", post(seed_inventory))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/{id}/quantity", post(adjust_quantity))
        .with_state(service)
}

pub fn reports_router<R: ProductRepository + 'static>(service: SharedService<R>) -> Router {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/inventory", get(inventory_report))
        .route("/near-depletion", get(near_depletion))
        .route("/depleted", get(depleted))
        .with_state(service)
}

fn audit(headers: &HeaderMap, action: &str, product_id: Option<i64>, details: serde_json::Value) {
    AuditEvent::new(
        action,
        product_id.map(|id| format!("product:{}", id)),
        AuditOutcome::Success,
    )
    .with_ip(extract_ip_from_headers(headers))
    .with_user_agent(extract_user_agent(headers))
    .with_details(details)
    .log();
}

/// List products, optionally filtered by a name substring
#[utoipa::path(
    get,
    path = "",
    tag = entity::Model::TAG,
    params(ProductSearch),
    responses(
        (status = 200, description = "List of products", body = Vec<ProductView>),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<SharedService<R>>,
    Query(query): Query<ProductSearch>,
) -> ProductResult<Json<Vec<ProductView>>> {
    let products = match query.search.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => service.search_by_name(term).await?,
        _ => service.list_all().await?,
    };
    Ok(Json(to_views(products)))
}

/// Add a product
#[utoipa::path(
    post,
    path = "",
    tag = entity::Model::TAG,
    request_body = ProductInput,
    responses(
        (status = 201, description = "Product added", body = ActionResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<SharedService<R>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<ProductInput>,
) -> ProductResult<impl IntoResponse> {
    // Advisory; the unique index on lower(name) is the backstop
    if service.name_exists(&input.name).await? {
        return Err(ProductError::DuplicateName(input.name));
    }

    let product = service.save(input.into_draft(None)).await?;

    audit(
        &headers,
        "product.create",
        Some(product.id),
        json!({ "name": product.name, "quantity": product.quantity }),
    );

    Ok((
        StatusCode::CREATED,
        Json(ActionResponse::success("Product added successfully").with_product(product)),
    ))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = entity::Model::TAG,
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = ProductView),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<SharedService<R>>,
    IdPath(id): IdPath,
) -> ProductResult<Json<ProductView>> {
    let product = service
        .get_by_id(id)
        .await?
        .ok_or(ProductError::NotFound(id))?;
    Ok(Json(product.into()))
}

/// Replace a product's name, price and quantity
#[utoipa::path(
    put,
    path = "/{id}",
    tag = entity::Model::TAG,
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    request_body = ProductInput,
    responses(
        (status = 200, description = "Product updated", body = ActionResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<SharedService<R>>,
    headers: HeaderMap,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<ProductInput>,
) -> ProductResult<Json<ActionResponse>> {
    let existing = service
        .get_by_id(id)
        .await?
        .ok_or(ProductError::NotFound(id))?;

    let renamed = existing.name.to_lowercase() != input.name.to_lowercase();
    if renamed && service.name_exists(&input.name).await? {
        return Err(ProductError::DuplicateName(input.name));
    }

    let product = service.update(input.into_draft(Some(id))).await?;

    audit(
        &headers,
        "product.update",
        Some(product.id),
        json!({ "previous_name": existing.name, "name": product.name }),
    );

    Ok(Json(
        ActionResponse::success("Product updated successfully").with_product(product),
    ))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = entity::Model::TAG,
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted", body = ActionResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<SharedService<R>>,
    headers: HeaderMap,
    IdPath(id): IdPath,
) -> ProductResult<Json<ActionResponse>> {
    let removed = service.delete(id).await?;

    audit(
        &headers,
        "product.delete",
        Some(id),
        json!({ "name": removed.name }),
    );

    Ok(Json(ActionResponse::success(format!(
        "Product '{}' deleted successfully",
        removed.name
    ))))
}

/// Set the quantity in stock
#[utoipa::path(
    post,
    path = "/{id}/quantity",
    tag = entity::Model::TAG,
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    request_body = AdjustQuantity,
    responses(
        (status = 200, description = "Quantity updated", body = ActionResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn adjust_quantity<R: ProductRepository>(
    State(service): State<SharedService<R>>,
    headers: HeaderMap,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<AdjustQuantity>,
) -> ProductResult<Json<ActionResponse>> {
    if !service.adjust_quantity(id, input.quantity).await? {
        return Err(ProductError::NotFound(id));
    }

    audit(
        &headers,
        "product.adjust_quantity",
        Some(id),
        json!({ "quantity": input.quantity }),
    );

    let mut response = ActionResponse::success("Quantity updated successfully");
    if let Some(product) = service.get_by_id(id).await? {
        response = response.with_product(product);
    }
    Ok(Json(response))
}

/// Load the starter catalogue into an empty inventory
#[utoipa::path(
    post,
    path = "/seed",
    tag = entity::Model::TAG,
    responses(
        (status = 201, description = "Starter products added", body = ActionResponse),
        (status = 200, description = "Inventory already loaded", body = ActionResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn seed_inventory<R: ProductRepository>(
    State(service): State<SharedService<R>>,
    headers: HeaderMap,
) -> ProductResult<impl IntoResponse> {
    match service.seed_initial_inventory().await? {
        SeedOutcome::Seeded(count) => {
            audit(&headers, "inventory.seed", None, json!({ "added": count }));
            Ok((
                StatusCode::CREATED,
                Json(ActionResponse::success(format!(
                    "Initial inventory loaded: {} products added",
                    count
                ))),
            ))
        }
        SeedOutcome::AlreadyLoaded => Ok((
            StatusCode::OK,
            Json(ActionResponse::warning("Initial inventory is already loaded")),
        )),
    }
}

/// Products, total value and the product closest to running out
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = REPORTS_TAG,
    responses(
        (status = 200, description = "Dashboard figures", body = Dashboard),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn dashboard<R: ProductRepository>(
    State(service): State<SharedService<R>>,
) -> ProductResult<Json<Dashboard>> {
    Ok(Json(service.dashboard().await?))
}

/// Full inventory report
#[utoipa::path(
    get,
    path = "/inventory",
    tag = REPORTS_TAG,
    responses(
        (status = 200, description = "Inventory report", body = InventoryReport),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn inventory_report<R: ProductRepository>(
    State(service): State<SharedService<R>>,
) -> ProductResult<Json<InventoryReport>> {
    Ok(Json(service.inventory_report().await?))
}

/// Products at or below 10% of their initial stock
#[utoipa::path(
    get,
    path = "/near-depletion",
    tag = REPORTS_TAG,
    responses(
        (status = 200, description = "Near-depletion products", body = Vec<ProductView>),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn near_depletion<R: ProductRepository>(
    State(service): State<SharedService<R>>,
) -> ProductResult<Json<Vec<ProductView>>> {
    Ok(Json(to_views(service.all_near_depletion().await?)))
}

/// Products with no stock left
#[utoipa::path(
    get,
    path = "/depleted",
    tag = REPORTS_TAG,
    responses(
        (status = 200, description = "Depleted products", body = Vec<ProductView>),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn depleted<R: ProductRepository>(
    State(service): State<SharedService<R>>,
) -> ProductResult<Json<Vec<ProductView>>> {
    Ok(Json(to_views(service.depleted().await?)))
}
