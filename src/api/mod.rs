//! HTTP surface of the service.
//!
//! [`build_router`] wires the public account routes and the token-protected
//! resource routes onto one axum [`Router`].

pub mod auth;
pub mod error;
pub mod handlers;
pub mod models;

use crate::config::StarterConfig;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use handlers::{accounts, bootstrap, deliveries, goals, iterations, needs, steps};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Connection pool
    pub db: DatabaseConnection,
    /// Needs and iteration seeded by the wizard
    pub starter: StarterConfig,
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_origin(AllowOrigin::predicate(|origin: &HeaderValue, _| {
            let origin = origin.to_str().unwrap_or("");
            origin.starts_with("http://localhost:") || origin.starts_with("http://127.0.0.1:")
        }))
}

/// Builds the application router.
pub fn build_router(state: Arc<AppState>, enable_cors: bool) -> Router {
    let public_router = Router::new()
        .route("/health/", get(accounts::health_check))
        .route("/auth/registration/", post(accounts::register))
        .route("/auth/login/", post(accounts::login))
        .with_state(Arc::clone(&state));

    let protected_router = Router::new()
        .route("/auth/logout/", post(accounts::logout))
        .route("/need/", get(needs::list_needs).post(needs::create_need))
        .route(
            "/need/:id/",
            get(needs::get_need)
                .put(needs::update_need)
                .delete(needs::delete_need),
        )
        .route("/goal/", get(goals::list_goals).post(goals::create_goal))
        .route(
            "/goal/:id/",
            get(goals::get_goal)
                .put(goals::update_goal)
                .delete(goals::delete_goal),
        )
        .route("/goal/need/:need/", get(goals::list_goals_by_need))
        .route("/step/", get(steps::list_steps).post(steps::create_step))
        .route(
            "/step/:id/",
            get(steps::get_step)
                .put(steps::update_step)
                .delete(steps::delete_step),
        )
        .route("/step/goal/:goal/", get(steps::list_steps_by_goal))
        .route(
            "/iteration/",
            get(iterations::list_iterations).post(iterations::create_iteration),
        )
        .route("/iteration/active/", get(iterations::active_iteration))
        .route(
            "/iteration/:id/",
            get(iterations::get_iteration)
                .put(iterations::update_iteration)
                .delete(iterations::delete_iteration),
        )
        .route(
            "/delivery/",
            get(deliveries::list_deliveries).post(deliveries::create_delivery),
        )
        .route(
            "/delivery/:id/",
            get(deliveries::get_delivery)
                .put(deliveries::update_delivery)
                .delete(deliveries::delete_delivery),
        )
        .route("/delivery/step/:step/", get(deliveries::list_deliveries_by_step))
        .route("/delivery/goal/:goal/", get(deliveries::list_deliveries_by_goal))
        .route(
            "/delivery/iteration/:iteration/",
            get(deliveries::list_deliveries_by_iteration),
        )
        .route("/wizard/", post(bootstrap::wizard))
        .route("/tutorial-setup/", post(bootstrap::tutorial_setup))
        .with_state(Arc::clone(&state))
        .layer(middleware::from_fn_with_state(state, auth::require_auth));

    let mut router = public_router
        .merge(protected_router)
        .layer(TraceLayer::new_for_http());
    if enable_cors {
        router = router.layer(cors_layer());
    }
    router
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{entities::Need, test_utils::*};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use sea_orm::{EntityTrait, PaginatorTrait};
    use serde_json::{Value, json};
    use tower::ServiceExt; // For oneshot()

    struct TestApp {
        router: Router,
        db: DatabaseConnection,
    }

    impl TestApp {
        async fn new() -> Self {
            let db = setup_test_db().await.unwrap();
            let state = Arc::new(AppState {
                db: db.clone(),
                starter: StarterConfig::default(),
            });
            Self {
                router: build_router(state, false),
                db,
            }
        }

        async fn user(&self, username: &str) -> (i64, String) {
            let user = create_test_user(&self.db, username).await.unwrap();
            let key = create_test_token(&self.db, user.id).await.unwrap();
            (user.id, key)
        }

        async fn send(
            &self,
            method: &str,
            uri: &str,
            key: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut request = Request::builder().method(method).uri(uri);
            if let Some(key) = key {
                request = request.header("Authorization", format!("Token {key}"));
            }
            let body = match body {
                Some(body) => {
                    request = request.header("Content-Type", "application/json");
                    Body::from(body.to_string())
                }
                None => Body::empty(),
            };

            let response = self
                .router
                .clone()
                .oneshot(request.body(body).unwrap())
                .await
                .unwrap();
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let value = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, value)
        }
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let app = TestApp::new().await;
        let (status, body) = app.send("GET", "/health/", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_protected_routes_require_token() {
        let app = TestApp::new().await;

        let (status, body) = app.send("GET", "/need/", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "NOT_AUTHENTICATED");

        let (status, _) = app.send("GET", "/need/", Some("not-a-key"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = app.send("POST", "/wizard/", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_register_login_logout() {
        let app = TestApp::new().await;
        let registration = json!({
            "username": "newNeed",
            "email": "aiaiai@gmail.com",
            "password1": "newneedDescription",
            "password2": "newneedDescription",
        });

        let (status, body) = app
            .send("POST", "/auth/registration/", None, Some(registration))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let key = body["key"].as_str().unwrap().to_string();
        assert_eq!(key.len(), 40);

        let login = json!({"username": "newNeed", "password": "newneedDescription"});
        let (status, body) = app
            .send("POST", "/auth/login/", None, Some(login.clone()))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["key"], key.as_str());

        let (status, _) = app.send("GET", "/need/", Some(&key), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = app.send("POST", "/auth/logout/", Some(&key), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = app.send("GET", "/need/", Some(&key), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_need_crud_and_ownership() {
        let app = TestApp::new().await;
        let (alice, alice_key) = app.user("alice").await;
        let (_, bob_key) = app.user("bob").await;

        let (status, created) = app
            .send(
                "POST",
                "/need/",
                Some(&alice_key),
                Some(json!({"name": "mind", "iconName": "far fa-heart", "iconColor": "bg-red-500"})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["user"], alice);
        assert_eq!(created["iconName"], "far fa-heart");
        assert_eq!(created["description"], "");
        let uri = format!("/need/{}/", created["id"]);

        let (status, body) = app.send("GET", &uri, Some(&bob_key), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "PERMISSION_DENIED");

        let (status, _) = app
            .send("PUT", &uri, Some(&bob_key), Some(json!({"name": "stolen"})))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = app.send("GET", &uri, Some(&alice_key), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "mind");

        let (status, body) = app.send("GET", "/need/", Some(&bob_key), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 0);

        let (status, _) = app.send("DELETE", &uri, Some(&bob_key), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, body) = app.send("DELETE", &uri, Some(&alice_key), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_null());

        let (status, _) = app.send("GET", &uri, Some(&alice_key), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_non_integer_ids_are_not_found() {
        let app = TestApp::new().await;
        let (_, key) = app.user("alice").await;

        for uri in [
            "/need/abc/",
            "/need/99999999999999999999/",
            "/goal/need/abc/",
            "/delivery/iteration/1.5/",
        ] {
            let (status, body) = app.send("GET", uri, Some(&key), None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body["code"], "NOT_FOUND", "{uri}");
            assert!(body["error"].is_string(), "{uri}");
        }

        let (status, body) = app.send("DELETE", "/step/x/", Some(&key), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_validation_errors_are_bad_request() {
        let app = TestApp::new().await;
        let (_, key) = app.user("alice").await;

        let (status, body) = app
            .send("POST", "/need/", Some(&key), Some(json!({"description": "x"})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["fields"]["name"][0], "This field is required.");

        let (status, body) = app
            .send("POST", "/goal/", Some(&key), Some(json!({"name": "g", "need": 404})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["fields"]["need"].is_array());

        let (status, _) = app
            .send("POST", "/goal/", Some(&key), Some(json!({"name": "g", "need": "abc"})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_goal_read_and_write_views() {
        let app = TestApp::new().await;
        let (alice, key) = app.user("alice").await;
        let need = create_test_need(&app.db, alice, "need1").await.unwrap();

        let (status, created) = app
            .send(
                "POST",
                "/goal/",
                Some(&key),
                Some(json!({"name": "a".repeat(50), "endDate": "2024-05-01", "need": need.id})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["need"], need.id);
        assert_eq!(created["endDate"], "2024-05-01");

        let (status, read) = app
            .send("GET", &format!("/goal/{}/", created["id"]), Some(&key), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(read["need"]["id"], need.id);
        assert_eq!(read["need"]["name"], "need1");

        let (status, listed) = app
            .send("GET", &format!("/goal/need/{}/", need.id), Some(&key), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_step_reports_percentage() {
        let app = TestApp::new().await;
        let (alice, key) = app.user("alice").await;
        let tree = create_test_tree(&app.db, alice).await.unwrap();
        let uri = format!("/step/{}/", tree.step.id);

        let (_, body) = app.send("GET", &uri, Some(&key), None).await;
        assert_eq!(body["percentageCompleted"], "0.0%");

        app.send(
            "PUT",
            &format!("/delivery/{}/", tree.delivery.id),
            Some(&key),
            Some(json!({"name": "done", "completed": true, "step": tree.step.id})),
        )
        .await;
        let (_, body) = app.send("GET", &uri, Some(&key), None).await;
        assert_eq!(body["percentageCompleted"], "100.0%");

        let (status, created) = app
            .send(
                "POST",
                "/step/",
                Some(&key),
                Some(json!({"name": "fresh", "goal": tree.goal.id})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["percentageCompleted"], "0%");
        assert_eq!(created["completed"], false);
    }

    #[tokio::test]
    async fn test_active_iteration_route() {
        let app = TestApp::new().await;
        let (_, key) = app.user("alice").await;

        let (status, body) = app.send("GET", "/iteration/active/", Some(&key), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NO_ACTIVE_ITERATION");

        let (status, created) = app
            .send("POST", "/iteration/", Some(&key), Some(json!({"number": 3})))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["completed"], false);

        let (status, body) = app.send("GET", "/iteration/active/", Some(&key), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], created["id"]);
    }

    #[tokio::test]
    async fn test_delivery_on_foreign_step_can_be_created() {
        let app = TestApp::new().await;
        let (bob, _) = app.user("bob").await;
        let (_, alice_key) = app.user("alice").await;
        let bobs = create_test_tree(&app.db, bob).await.unwrap();

        let (status, body) = app
            .send(
                "POST",
                "/delivery/",
                Some(&alice_key),
                Some(json!({"name": "x", "step": bobs.step.id})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body["iteration"].is_null());

        // It resolves to bob, so alice can neither see nor read it
        let (_, listed) = app.send("GET", "/delivery/", Some(&alice_key), None).await;
        assert_eq!(listed.as_array().unwrap().len(), 0);
        let (status, _) = app
            .send("GET", &format!("/delivery/{}/", body["id"]), Some(&alice_key), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_wizard_then_tutorial() {
        let app = TestApp::new().await;
        let (_, key) = app.user("alice").await;

        let (status, body) = app.send("POST", "/wizard/", Some(&key), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_null());
        assert_eq!(Need::find().count(&app.db).await.unwrap(), 5);

        let (status, _) = app.send("POST", "/tutorial-setup/", Some(&key), None).await;
        assert_eq!(status, StatusCode::OK);

        let (_, goals) = app.send("GET", "/goal/", Some(&key), None).await;
        assert_eq!(goals.as_array().unwrap().len(), 1);
        let (_, steps) = app.send("GET", "/step/", Some(&key), None).await;
        assert_eq!(steps.as_array().unwrap().len(), 4);
        let (_, deliveries) = app.send("GET", "/delivery/", Some(&key), None).await;
        assert_eq!(deliveries.as_array().unwrap().len(), 1);
    }
}
