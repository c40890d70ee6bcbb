//! HTTP routes.
//!
//! ```text
//! GET  /health
//! GET  /api/room-types/{room_type_id}/availability      public
//! POST /api/room-types/{room_type_id}/booking           bearer
//! GET  /api/bookings                                    bearer
//! GET  /api/bookings/{id}                               bearer, owner
//! POST /api/admin/room-types/{room_type_id}/inventories admin
//! GET  /api/admin/bookings                              admin
//! GET  /api/admin/bookings/{id}                         admin
//! PUT  /api/admin/bookings/{id}                         admin
//! ```

pub mod admin;
pub mod availability;
pub mod bookings;
pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::AppState;

/// Builds the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/room-types/{room_type_id}/availability",
            get(availability::check_availability),
        )
        .route("/api/room-types/{room_type_id}/booking", post(bookings::create_booking))
        .route("/api/bookings", get(bookings::list_own_bookings))
        .route("/api/bookings/{id}", get(bookings::get_own_booking))
        .route(
            "/api/admin/room-types/{room_type_id}/inventories",
            post(admin::set_inventory),
        )
        .route("/api/admin/bookings", get(admin::list_bookings))
        .route(
            "/api/admin/bookings/{id}",
            get(admin::get_booking).put(admin::update_booking_status),
        )
        .with_state(state)
}

// =============================================================================
// Router Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use chrono::NaiveDate;
    use roomledger_core::{ActorRole, FixedClock, NewRoomType};
    use roomledger_db::{Database, DbConfig};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct TestApp {
        router: Router,
        admin_token: String,
        alice_token: String,
        bob_token: String,
        room_type_id: i64,
    }

    impl TestApp {
        async fn new() -> Self {
            let db = Database::new(DbConfig::in_memory()).await.unwrap();
            let room_type = db
                .room_types()
                .insert(&NewRoomType {
                    hotel_id: 1,
                    name: "Garden View".to_string(),
                    capacity: 2,
                    base_price_cents: 15_000,
                    description: None,
                })
                .await
                .unwrap();

            let config = ApiConfig::default();
            let clock = Arc::new(FixedClock::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
            let state = AppState::new(db, &config, clock);

            let admin_token = state.jwt.issue_token(1, ActorRole::Admin).unwrap();
            let alice_token = state.jwt.issue_token(10, ActorRole::Guest).unwrap();
            let bob_token = state.jwt.issue_token(20, ActorRole::Guest).unwrap();

            TestApp {
                router: build_router(state),
                admin_token,
                alice_token,
                bob_token,
                room_type_id: room_type.id,
            }
        }

        async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
            }

            let request = match body {
                Some(json) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(serde_json::to_vec(&json).unwrap()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };

            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

            (status, value)
        }

        async fn stock(&self, day: &str, total_rooms: i64) {
            let (status, _) = self
                .send(
                    Method::POST,
                    &format!("/api/admin/room-types/{}/inventories", self.room_type_id),
                    Some(&self.admin_token),
                    Some(json!({ "date": day, "total_rooms": total_rooms })),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        async fn book(&self, token: &str, start: &str, end: &str) -> (StatusCode, Value) {
            self.send(
                Method::POST,
                &format!("/api/room-types/{}/booking", self.room_type_id),
                Some(token),
                Some(json!({ "start_date": start, "end_date": end, "guest_count": 2 })),
            )
            .await
        }
    }

    #[tokio::test]
    async fn test_health() {
        let app = TestApp::new().await;

        let response = app
            .router
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn test_end_to_end_booking() {
        let app = TestApp::new().await;
        for day in ["2024-06-01", "2024-06-02", "2024-06-03"] {
            app.stock(day, 10).await;
        }

        let (status, booking) = app.book(&app.alice_token, "2024-06-01", "2024-06-04").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(booking["total_price_cents"], 45_000);
        assert_eq!(booking["status"], "pending");

        let (status, availability) = app
            .send(
                Method::GET,
                &format!(
                    "/api/room-types/{}/availability?start_date=2024-06-01&end_date=2024-06-04",
                    app.room_type_id
                ),
                None,
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(availability["available"], true);
        assert_eq!(availability["nights"], 3);

        let id = booking["id"].as_i64().unwrap();
        let (status, detail) = app
            .send(Method::GET, &format!("/api/bookings/{}", id), Some(&app.alice_token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["room_type"]["name"], "Garden View");

        let (status, list) = app.send(Method::GET, "/api/bookings", Some(&app.alice_token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_auth_failures() {
        let app = TestApp::new().await;

        let (status, body) = app.send(Method::GET, "/api/bookings", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");

        let (status, _) = app.send(Method::GET, "/api/bookings", Some("not-a-jwt"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = app
            .send(Method::GET, "/api/admin/bookings", Some(&app.alice_token), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn test_foreign_booking_is_forbidden() {
        let app = TestApp::new().await;
        app.stock("2024-02-01", 1).await;

        let (_, booking) = app.book(&app.alice_token, "2024-02-01", "2024-02-02").await;
        let id = booking["id"].as_i64().unwrap();

        let (status, _) = app
            .send(Method::GET, &format!("/api/bookings/{}", id), Some(&app.bob_token), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app
            .send(Method::GET, "/api/bookings/9999", Some(&app.bob_token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_rejections_map_to_status_codes() {
        let app = TestApp::new().await;
        app.stock("2024-03-01", 1).await;

        let (status, _) = app.book(&app.alice_token, "2024-03-01", "2024-03-02").await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = app.book(&app.bob_token, "2024-03-01", "2024-03-02").await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "INSUFFICIENT_INVENTORY");

        let (status, body) = app.book(&app.bob_token, "2024-03-05", "2024-03-05").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, _) = app
            .send(
                Method::POST,
                "/api/room-types/999/booking",
                Some(&app.bob_token),
                Some(json!({ "start_date": "2024-03-01", "end_date": "2024-03-02", "guest_count": 1 })),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = app
            .send(
                Method::POST,
                &format!("/api/room-types/{}/booking", app.room_type_id),
                Some(&app.bob_token),
                Some(json!({ "start_date": "2024-03-01", "end_date": "2024-03-02" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_admin_booking_management() {
        let app = TestApp::new().await;
        app.stock("2024-04-01", 5).await;
        for _ in 0..3 {
            app.book(&app.alice_token, "2024-04-01", "2024-04-02").await;
        }

        let (status, page) = app
            .send(
                Method::GET,
                "/api/admin/bookings?status=pending&per_page=2",
                Some(&app.admin_token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["total"], 3);
        assert_eq!(page["data"].as_array().unwrap().len(), 2);

        let id = page["data"][0]["id"].as_i64().unwrap();
        let uri = format!("/api/admin/bookings/{}", id);

        let (status, booking) = app
            .send(Method::PUT, &uri, Some(&app.admin_token), Some(json!({ "status": "confirmed" })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(booking["status"], "confirmed");

        let (status, booking) = app.send(Method::GET, &uri, Some(&app.admin_token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(booking["status"], "confirmed");

        let (status, body) = app
            .send(Method::PUT, &uri, Some(&app.admin_token), Some(json!({ "status": "pending" })))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "INVALID_STATUS_TRANSITION");

        let (status, _) = app
            .send(Method::GET, "/api/admin/bookings?status=lost", Some(&app.admin_token), None)
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
