use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use axum_helpers::{
    ErrorResponse, JsonBody, JsonBodyRejection,
    errors::responses::{BadRequestResponse, InternalServerErrorResponse, NotFoundResponse},
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{ProductError, ProductResult};
use crate::models::{DeleteAck, NewProduct, Product, UpdateProduct, WriteAck};
use crate::query::{ProductQuery, QueryParams};
use crate::repository::ProductRepository;
use crate::service::ProductService;

const TAG: &str = "products";

/// OpenAPI documentation for the product routes
#[derive(OpenApi)]
#[openapi(
    paths(create_product, delete_product, list_products, update_product),
    components(
        schemas(Product, NewProduct, UpdateProduct, WriteAck, DeleteAck, ErrorResponse),
        responses(BadRequestResponse, NotFoundResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = TAG, description = "Inventory product endpoints")
    )
)]
pub struct ApiDoc;

/// Product routes, mounted at the server root
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/create", post(create_product))
        .route("/delete/{id}", delete(delete_product))
        .route("/get", get(list_products))
        .route("/update/{id}", put(update_product))
        .with_state(shared_service)
}

/// Path ids that are not integers never reach the store.
fn parse_id(raw: &str) -> Option<i32> {
    raw.trim().parse().ok()
}

/// Create a product
#[utoipa::path(
    post,
    path = "/create",
    tag = TAG,
    request_body = NewProduct,
    responses(
        (status = 201, description = "Product created", body = WriteAck),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    JsonBody(input): JsonBody<NewProduct>,
) -> ProductResult<impl IntoResponse> {
    service.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(WriteAck::created())))
}

/// Delete a product. Always answers 200, whether or not anything was removed.
#[utoipa::path(
    delete,
    path = "/delete/{id}",
    tag = TAG,
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Delete acknowledged", body = DeleteAck)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(raw_id): Path<String>,
) -> impl IntoResponse {
    match parse_id(&raw_id) {
        Some(id) => {
            if let Err(e) = service.delete_product(id).await {
                tracing::warn!(product_id = id, error = %e, "Delete failed");
            }
        }
        None => tracing::debug!(raw_id = %raw_id, "Ignoring delete of non-numeric id"),
    }

    (StatusCode::OK, Json(DeleteAck::default()))
}

/// List products, optionally filtered by category and sorted
#[utoipa::path(
    get,
    path = "/get",
    tag = TAG,
    params(
        ("categoryId" = Option<i32>, Query, description = "Only products in this category"),
        ("sort" = Option<String>, Query, description = "`price`, anything else sorts by expiry"),
        ("order" = Option<String>, Query, description = "Present means descending; the value is ignored")
    ),
    responses(
        (status = 200, description = "Matching products", body = Vec<Product>),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ProductResult<Json<Vec<Product>>> {
    let params: QueryParams = pairs.into_iter().collect();
    let products = service
        .list_products(ProductQuery::from_params(&params))
        .await?;
    Ok(Json(products))
}

/// Update some or all fields of a product
#[utoipa::path(
    put,
    path = "/update/{id}",
    tag = TAG,
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 201, description = "Product updated", body = WriteAck),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(raw_id): Path<String>,
    body: Result<JsonBody<UpdateProduct>, JsonBodyRejection>,
) -> ProductResult<impl IntoResponse> {
    let id = parse_id(&raw_id).ok_or(ProductError::NotFound(raw_id))?;

    // an unknown id outranks a bad body
    let input = match body {
        Ok(JsonBody(input)) => input,
        Err(rejection) => {
            service.get_product(id).await?;
            return Err(rejection.into());
        }
    };

    service.update_product(id, input).await?;
    Ok((StatusCode::CREATED, Json(WriteAck::updated())))
}
