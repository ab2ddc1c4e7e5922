mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use frog::api::{create_router, AppState, SecurityConfig};
use frog::catalog::CatalogClient;
use frog::models::*;
use frog::optim::OptimizerClient;
use serde_json::json;

fn setup(catalog_url: &str, optimizer_url: &str, security: SecurityConfig) -> TestServer {
    let state = AppState::new(
        CatalogClient::new(catalog_url),
        OptimizerClient::new(optimizer_url),
    );
    TestServer::new(create_router(state, security)).expect("Failed to create test server")
}

mod health {
    use super::*;

    #[tokio::test]
    async fn reports_ok() {
        let dead = common::dead_url().await;
        let server = setup(&dead, &dead, SecurityConfig::disabled());

        let response = server.get("/api/v1/health").await;

        response.assert_status_ok();
        response.assert_json(&json!({ "status": "ok" }));
    }
}

mod library {
    use super::*;

    #[tokio::test]
    async fn returns_all_entries_sorted_by_title_without_query() {
        let catalog = common::spawn_catalog(common::sample_catalog()).await;
        let dead = common::dead_url().await;
        let server = setup(&catalog, &dead, SecurityConfig::disabled());

        let response = server.get("/api/v1/library").await;

        response.assert_status_ok();
        let entries: Vec<CatalogEntry> = response.json();
        let titles: Vec<_> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Debate", "Lecture", "Quiz A"]);
    }

    #[tokio::test]
    async fn filters_case_insensitively() {
        let catalog = common::spawn_catalog(common::sample_catalog()).await;
        let dead = common::dead_url().await;
        let server = setup(&catalog, &dead, SecurityConfig::disabled());

        let response = server
            .get("/api/v1/library")
            .add_query_param("q", "MATH")
            .await;

        response.assert_status_ok();
        let entries: Vec<CatalogEntry> = response.json();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Quiz A");
        assert_eq!(entries[0].parent_id.as_deref(), Some("act-17"));
    }

    #[tokio::test]
    async fn no_match_is_an_empty_list() {
        let catalog = common::spawn_catalog(common::sample_catalog()).await;
        let dead = common::dead_url().await;
        let server = setup(&catalog, &dead, SecurityConfig::disabled());

        let response = server
            .get("/api/v1/library")
            .add_query_param("q", "chemistry")
            .await;

        response.assert_status_ok();
        let entries: Vec<CatalogEntry> = response.json();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn catalog_failure_is_bad_gateway() {
        let catalog = common::spawn_failing_catalog(StatusCode::INTERNAL_SERVER_ERROR).await;
        let dead = common::dead_url().await;
        let server = setup(&catalog, &dead, SecurityConfig::disabled());

        let response = server.get("/api/v1/library").await;

        response.assert_status(StatusCode::BAD_GATEWAY);
        assert_eq!(response.text(), "Catalog unavailable");
    }
}

mod optimizer {
    use super::*;

    #[tokio::test]
    async fn recommend_forwards_envelope_and_passes_response_through() {
        let (optimizer, received) =
            common::spawn_optimizer(StatusCode::OK, r#"{"item":"q7"}"#).await;
        let dead = common::dead_url().await;
        let server = setup(&dead, &optimizer, SecurityConfig::disabled());

        let response = server
            .post("/api/v1/optim/recommend")
            .json(&json!({ "context": { "x": 1 } }))
            .await;

        response.assert_status_ok();
        let body: OptimResponse = response.json();
        assert_eq!(body.status_code, 200);
        assert_eq!(body.data, Some(json!({ "item": "q7" })));

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(
            received[0],
            json!({ "sessionId": "json", "requestType": "RECO", "context": { "x": 1 } })
        );
    }

    #[tokio::test]
    async fn report_forwards_item_and_score() {
        let (optimizer, received) = common::spawn_optimizer(StatusCode::OK, "ok").await;
        let dead = common::dead_url().await;
        let server = setup(&dead, &optimizer, SecurityConfig::disabled());

        let response = server
            .post("/api/v1/optim/report")
            .json(&json!({ "context": { "x": 1 }, "item": "q7", "score": 1 }))
            .await;

        response.assert_status_ok();
        let body: OptimResponse = response.json();
        assert_eq!(body.content, "ok");
        assert!(body.data.is_none());

        let received = received.lock().unwrap();
        assert_eq!(
            received[0],
            json!({
                "sessionId": "json",
                "requestType": "SCOR",
                "context": { "x": 1 },
                "item": "q7",
                "score": 1
            })
        );
    }

    #[tokio::test]
    async fn optimizer_error_is_bad_gateway() {
        let (optimizer, _) =
            common::spawn_optimizer(StatusCode::INTERNAL_SERVER_ERROR, "boom").await;
        let dead = common::dead_url().await;
        let server = setup(&dead, &optimizer, SecurityConfig::disabled());

        let response = server
            .post("/api/v1/optim/recommend")
            .json(&json!({ "context": {} }))
            .await;

        response.assert_status(StatusCode::BAD_GATEWAY);
        assert_eq!(response.text(), "Optimizer unavailable");
    }

    #[tokio::test]
    async fn unreachable_optimizer_is_bad_gateway() {
        let dead = common::dead_url().await;
        let server = setup(&dead, &dead, SecurityConfig::disabled());

        let response = server
            .post("/api/v1/optim/recommend")
            .json(&json!({ "context": {} }))
            .await;

        response.assert_status(StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn missing_context_is_rejected() {
        let dead = common::dead_url().await;
        let server = setup(&dead, &dead, SecurityConfig::disabled());

        let response = server
            .post("/api/v1/optim/report")
            .json(&json!({ "context": {} }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }
}

mod security {
    use super::*;

    #[tokio::test]
    async fn optimizer_requires_api_key_when_configured() {
        let (optimizer, received) = common::spawn_optimizer(StatusCode::OK, "{}").await;
        let dead = common::dead_url().await;
        let server = setup(
            &dead,
            &optimizer,
            SecurityConfig::disabled().with_api_key("secret"),
        );

        let response = server
            .post("/api/v1/optim/recommend")
            .json(&json!({ "context": {} }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        assert!(received.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn wrong_api_key_is_unauthorized() {
        let dead = common::dead_url().await;
        let server = setup(&dead, &dead, SecurityConfig::disabled().with_api_key("secret"));

        let response = server
            .post("/api/v1/optim/recommend")
            .authorization_bearer("guess")
            .json(&json!({ "context": {} }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_api_key_reaches_optimizer() {
        let (optimizer, received) = common::spawn_optimizer(StatusCode::OK, "{}").await;
        let dead = common::dead_url().await;
        let server = setup(
            &dead,
            &optimizer,
            SecurityConfig::disabled().with_api_key("secret"),
        );

        let response = server
            .post("/api/v1/optim/recommend")
            .authorization_bearer("secret")
            .json(&json!({ "context": {} }))
            .await;

        response.assert_status_ok();
        assert_eq!(received.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn health_stays_open_with_api_key() {
        let dead = common::dead_url().await;
        let server = setup(&dead, &dead, SecurityConfig::disabled().with_api_key("secret"));

        server.get("/api/v1/health").await.assert_status_ok();
    }

    #[tokio::test]
    async fn rate_limit_rejects_excess_requests() {
        let (optimizer, received) = common::spawn_optimizer(StatusCode::OK, "{}").await;
        let dead = common::dead_url().await;
        let server = setup(&dead, &optimizer, SecurityConfig::disabled().with_rate_limit(1));

        server
            .post("/api/v1/optim/recommend")
            .json(&json!({ "context": {} }))
            .await
            .assert_status_ok();

        let response = server
            .post("/api/v1/optim/recommend")
            .json(&json!({ "context": {} }))
            .await;

        response.assert_status(StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(received.lock().unwrap().len(), 1);
    }
}
