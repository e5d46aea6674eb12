//! HTTP handlers for Products API

use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use axum_helpers::{ApiResponse, ErrorResponse, JsonBody, JsonBodyRejection};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::models::{
    CreateProduct, DeleteProduct, DeletedProduct, ProductResponse, ProductStatus, UpdateProduct,
};
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// Success messages, one per operation
pub mod messages {
    pub const CREATED: &str = "상품 생성에 성공했습니다.";
    pub const LISTED: &str = "상품 목록 조회에 성공했습니다.";
    pub const FETCHED: &str = "상품 상세 조회에 성공했습니다.";
    pub const UPDATED: &str = "상품 수정에 성공했습니다.";
    pub const DELETED: &str = "상품 삭제에 성공했습니다.";
}

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        delete_product,
    ),
    components(schemas(
        ProductResponse,
        ProductStatus,
        CreateProduct,
        UpdateProduct,
        DeleteProduct,
        DeletedProduct,
        ErrorResponse
    )),
    tags(
        (name = "Products", description = "Product catalog endpoints")
    )
)]
pub struct ApiDoc;

type JsonInput<T> = Result<JsonBody<T>, JsonBodyRejection>;

/// Create the products router with all HTTP endpoints
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product)
                .put(update_product)
                .patch(update_product)
                .delete(delete_product),
        )
        .with_state(shared_service)
}

/// List all products, newest first
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    responses(
        (status = 200, description = "All products", body = ApiResponse<Vec<ProductResponse>>),
        (status = 500, description = "Unexpected failure", body = ErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> ProductResult<ApiResponse<Vec<ProductResponse>>> {
    let products = service.list_products().await?;
    let data = products.into_iter().map(ProductResponse::from).collect();
    Ok(ApiResponse::ok(messages::LISTED, data))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<ProductResponse>),
        (status = 400, description = "Blank field or name already registered", body = ErrorResponse),
        (status = 500, description = "Unexpected failure", body = ErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    body: JsonInput<CreateProduct>,
) -> ProductResult<ApiResponse<ProductResponse>> {
    let JsonBody(input) = body?;
    let product = service.create_product(input).await?;
    Ok(ApiResponse::created(messages::CREATED, product.into()))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID (hex ObjectId)")
    ),
    responses(
        (status = 200, description = "Product found", body = ApiResponse<ProductResponse>),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Unexpected failure", body = ErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(id): Path<String>,
) -> ProductResult<ApiResponse<ProductResponse>> {
    let product = service.get_product(&id).await?;
    Ok(ApiResponse::ok(messages::FETCHED, product.into()))
}

/// Update a product (password required)
#[utoipa::path(
    method(put, patch),
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID (hex ObjectId)")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<ProductResponse>),
        (status = 400, description = "Blank password or invalid status", body = ErrorResponse),
        (status = 401, description = "Password mismatch", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Unexpected failure", body = ErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(id): Path<String>,
    body: JsonInput<UpdateProduct>,
) -> ProductResult<ApiResponse<ProductResponse>> {
    let JsonBody(input) = body?;
    let product = service.update_product(&id, input).await?;
    Ok(ApiResponse::ok(messages::UPDATED, product.into()))
}

/// Delete a product (password required)
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID (hex ObjectId)")
    ),
    request_body = DeleteProduct,
    responses(
        (status = 200, description = "Product deleted", body = ApiResponse<DeletedProduct>),
        (status = 400, description = "Blank password", body = ErrorResponse),
        (status = 401, description = "Password mismatch", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Unexpected failure", body = ErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(id): Path<String>,
    body: JsonInput<DeleteProduct>,
) -> ProductResult<ApiResponse<DeletedProduct>> {
    let JsonBody(input) = body?;
    let deleted_id = service.delete_product(&id, input).await?;
    Ok(ApiResponse::ok(messages::DELETED, deleted_id.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{messages as error_messages, ProductError};
    use crate::models::Product;
    use crate::repository::MockProductRepository;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use mongodb::bson::oid::ObjectId;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(repo: MockProductRepository) -> Router {
        Router::new().nest("/products", router(ProductService::new(repo)))
    }

    fn stored() -> Product {
        Product::new(
            "Laptop".to_string(),
            "14-inch".to_string(),
            "kim".to_string(),
            "pw-1234".to_string(),
        )
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let body = body.map_or_else(Body::empty, |b| Body::from(b.to_string()));
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(body)
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(!text.contains("pw-1234"), "password leaked: {text}");
        (status, serde_json::from_str(&text).unwrap())
    }

    #[tokio::test]
    async fn test_create_returns_201_envelope() {
        let mut repo = MockProductRepository::new();
        repo.expect_exists_by_name().returning(|_| Ok(false));
        repo.expect_insert().times(1).returning(|_| Ok(()));

        let (status, body) = send(
            app(repo),
            "POST",
            "/products",
            Some(json!({
                "name": "Laptop",
                "description": "14-inch",
                "manager": "kim",
                "password": "pw-1234"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], 201);
        assert_eq!(body["message"], messages::CREATED);
        assert_eq!(body["data"]["name"], "Laptop");
        assert_eq!(body["data"]["status"], "FOR_SALE");
        assert_eq!(body["data"]["productId"].as_str().unwrap().len(), 24);
        assert!(body["data"].get("password").is_none());
    }

    #[tokio::test]
    async fn test_create_with_empty_body_reports_blank_name() {
        let (status, body) = send(
            app(MockProductRepository::new()),
            "POST",
            "/products",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({ "status": 400, "message": error_messages::BLANK_NAME, "data": null })
        );
    }

    #[tokio::test]
    async fn test_create_missing_manager() {
        let (status, body) = send(
            app(MockProductRepository::new()),
            "POST",
            "/products",
            Some(json!({ "name": "Laptop", "description": "14-inch", "password": "x" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], error_messages::BLANK_MANAGER);
    }

    #[tokio::test]
    async fn test_create_duplicate_name() {
        let mut repo = MockProductRepository::new();
        repo.expect_exists_by_name().returning(|_| Ok(true));

        let (status, body) = send(
            app(repo),
            "POST",
            "/products",
            Some(json!({
                "name": "Laptop",
                "description": "14-inch",
                "manager": "kim",
                "password": "pw-1234"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], error_messages::ALREADY_REGISTERED);
    }

    #[tokio::test]
    async fn test_malformed_body_is_unexpected_error() {
        let response = app(MockProductRepository::new())
            .oneshot(
                Request::post("/products")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], error_messages::UNEXPECTED);
    }

    #[tokio::test]
    async fn test_list_empty_returns_empty_array() {
        let mut repo = MockProductRepository::new();
        repo.expect_list().returning(|| Ok(vec![]));

        let (status, body) = send(app(repo), "GET", "/products", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "status": 200, "message": messages::LISTED, "data": [] })
        );
    }

    #[tokio::test]
    async fn test_list_hides_passwords() {
        let mut repo = MockProductRepository::new();
        repo.expect_list().returning(|| Ok(vec![stored(), stored()]));

        let (status, body) = send(app(repo), "GET", "/products", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_store_failure_is_500() {
        let mut repo = MockProductRepository::new();
        repo.expect_list()
            .returning(|| Err(ProductError::Database("timeout".to_string())));

        let (status, body) = send(app(repo), "GET", "/products", None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], error_messages::UNEXPECTED);
        assert_eq!(body["data"], Value::Null);
    }

    #[tokio::test]
    async fn test_get_product() {
        let product = stored();
        let id = product.id.to_hex();
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(product.clone())));

        let (status, body) = send(app(repo), "GET", &format!("/products/{id}"), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], messages::FETCHED);
        assert_eq!(body["data"]["productId"], id);
    }

    #[tokio::test]
    async fn test_get_unknown_and_invalid_ids_are_404() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        let app = app(repo);

        for uri in [
            format!("/products/{}", ObjectId::new().to_hex()),
            "/products/123".to_string(),
        ] {
            let (status, body) = send(app.clone(), "GET", &uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body["message"], error_messages::NOT_FOUND);
        }
    }

    #[tokio::test]
    async fn test_update_via_put_and_patch() {
        let product = stored();
        let id = product.id.to_hex();
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(product.clone())));
        repo.expect_replace().times(2).returning(|_| Ok(true));
        let app = app(repo);

        for method in ["PUT", "PATCH"] {
            let (status, body) = send(
                app.clone(),
                method,
                &format!("/products/{id}"),
                Some(json!({ "password": "pw-1234", "status": "SOLD_OUT" })),
            )
            .await;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["message"], messages::UPDATED);
            assert_eq!(body["data"]["status"], "SOLD_OUT");
            assert_eq!(body["data"]["name"], "Laptop");
        }
    }

    #[tokio::test]
    async fn test_update_wrong_password_is_401() {
        let product = stored();
        let id = product.id.to_hex();
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(product.clone())));
        repo.expect_replace().never();

        let (status, body) = send(
            app(repo),
            "PUT",
            &format!("/products/{id}"),
            Some(json!({ "password": "guess", "name": "Tablet" })),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], error_messages::PASSWORD_MISMATCH);
    }

    #[tokio::test]
    async fn test_update_invalid_status_is_400() {
        let product = stored();
        let id = product.id.to_hex();
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(product.clone())));

        let (status, body) = send(
            app(repo),
            "PUT",
            &format!("/products/{id}"),
            Some(json!({ "password": "pw-1234", "status": "GONE" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], error_messages::INVALID_STATUS);
    }

    #[tokio::test]
    async fn test_update_empty_status_is_400() {
        let product = stored();
        let id = product.id.to_hex();
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(product.clone())));
        repo.expect_replace().never();

        let (status, body) = send(
            app(repo),
            "PUT",
            &format!("/products/{id}"),
            Some(json!({ "password": "pw-1234", "status": "" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({ "status": 400, "message": error_messages::INVALID_STATUS, "data": null })
        );
    }

    #[tokio::test]
    async fn test_delete_numeric_password_is_mismatch() {
        let product = stored();
        let id = product.id.to_hex();
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(product.clone())));
        repo.expect_delete().never();

        let (status, body) = send(
            app(repo),
            "DELETE",
            &format!("/products/{id}"),
            Some(json!({ "password": 1234 })),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], error_messages::PASSWORD_MISMATCH);
    }

    #[tokio::test]
    async fn test_delete_returns_product_id() {
        let product = stored();
        let id = product.id.to_hex();
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(product.clone())));
        repo.expect_delete().times(1).returning(|_| Ok(true));

        let (status, body) = send(
            app(repo),
            "DELETE",
            &format!("/products/{id}"),
            Some(json!({ "password": "pw-1234" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "status": 200, "message": messages::DELETED, "data": { "productId": id } })
        );
    }

    #[tokio::test]
    async fn test_delete_without_body_reports_blank_password() {
        let product = stored();
        let id = product.id.to_hex();
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(product.clone())));
        repo.expect_delete().never();

        let (status, body) = send(app(repo), "DELETE", &format!("/products/{id}"), None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], error_messages::BLANK_PASSWORD);
    }

    #[test]
    fn test_openapi_lists_product_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/{id}"));
        assert!(doc.paths.paths.contains_key(""));
    }
}
