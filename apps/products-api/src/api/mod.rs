//! API routes module

pub mod health;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Create all API routes
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/products", products::router(state))
        .merge(health::router(state.clone()))
}

/// Initialize database indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    products::init_indexes(state).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::unreachable_state;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_invalid_id_is_404_without_touching_store() {
        let app = routes(&unreachable_state().await);

        let (status, body) = get(app, "/products/not-an-id").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], 404);
        assert_eq!(body["message"], "상품이 존재하지 않습니다.");
        assert_eq!(body["data"], Value::Null);
    }

    #[tokio::test]
    async fn test_store_outage_is_500() {
        let app = routes(&unreachable_state().await);

        let (status, body) = get(app, "/products").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["message"],
            "예상치 못한 에러가 발생했습니다. 관리자에게 문의해 주세요."
        );
    }
}
