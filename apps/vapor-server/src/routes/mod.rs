//! # HTTP Routes
//!
//! ## Route Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Method  Path                       Handler                             │
//! │  ──────  ─────────────────────────  ──────────────────────────────────  │
//! │  POST    /bills                     bills::create_bill     201 / 400    │
//! │  GET     /bills?date=YYYY-MM-DD     bills::list_bills      200 / 400    │
//! │  GET     /reports?range=...         reports::get_report    200 / 400    │
//! │  GET     /health                    health::health         200 / 503    │
//! │                                                                         │
//! │  Every route is also served under /api (/api/bills, /api/reports, ...)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod bills;
pub mod health;
pub mod reports;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::SharedState;

/// Builds the application router with request tracing.
pub fn build_router(state: SharedState) -> Router {
    let routes = Router::new()
        .route("/bills", post(bills::create_bill).get(bills::list_bills))
        .route("/reports", get(reports::get_report))
        .route("/health", get(health::health));

    Router::new()
        .merge(routes.clone())
        .nest("/api", routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use chrono::{DateTime, Local};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use vapor_core::types::TaxRate;
    use vapor_core::{Category, Money, Product};
    use vapor_db::{Database, DbConfig};

    async fn setup() -> (Database, Router) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        for (id, name, price) in [("A", "Samosa", 15), ("B", "Vada Pav", 20)] {
            db.products()
                .insert(&Product {
                    id: id.to_string(),
                    name: name.to_string(),
                    category: Category::Snacks,
                    price: Money::from_major(price),
                    is_available: true,
                })
                .await
                .unwrap();
        }
        let app = build_router(AppState::new(db.clone()).shared());
        (db, app)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn bill_body(total: f64, items: &[(&str, i64, f64)]) -> String {
        json!({
            "paymentMethod": "CASH",
            "totalAmount": total,
            "items": items
                .iter()
                .map(|(id, qty, price)| json!({"productId": id, "quantity": qty, "price": price}))
                .collect::<Vec<_>>(),
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_create_bill_returns_created() {
        let (db, app) = setup().await;

        let (status, body) = send(
            &app,
            post_json("/bills", &bill_body(57.75, &[("A", 2, 15.0), ("B", 1, 25.0)])),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["paymentMethod"], "CASH");
        assert_eq!(body["totalAmount"], 57.75);
        assert_eq!(body["items"].as_array().unwrap().len(), 2);
        assert_eq!(body["items"][1]["productId"], "B");
        assert_eq!(body["items"][1]["price"], 25.0);
        assert!(body["items"][0].get("product").is_none());
        assert_eq!(db.bills().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_numeric_strings_are_accepted() {
        let (_db, app) = setup().await;

        let body = r#"{"paymentMethod":"G-PAY","totalAmount":"157.50000000000003",
            "items":[{"productId":"A","quantity":"3","price":"50"}]}"#;
        let (status, body) = send(&app, post_json("/api/bills", body)).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["paymentMethod"], "G-PAY");
        assert_eq!(body["totalAmount"], 157.5);
        assert_eq!(body["items"][0]["quantity"], 3);
    }

    #[tokio::test]
    async fn test_invalid_bills_are_rejected_without_writes() {
        let (db, app) = setup().await;

        let cases = [
            (r#"{"paymentMethod":"CASH","totalAmount":10,"items":[]}"#, Some("items")),
            (r#"{"paymentMethod":"CASH","totalAmount":10}"#, Some("items")),
            (
                r#"{"totalAmount":10,"items":[{"productId":"A","quantity":1,"price":10}]}"#,
                Some("paymentMethod"),
            ),
            (
                r#"{"paymentMethod":"BITCOIN","totalAmount":10,"items":[{"productId":"A","quantity":1,"price":10}]}"#,
                Some("paymentMethod"),
            ),
            (
                r#"{"paymentMethod":"UPI","totalAmount":10,"items":[{"productId":"A","quantity":0,"price":10}]}"#,
                Some("items[0].quantity"),
            ),
            (r#"{"paymentMethod":"CASH","totalAmount":10,"items":"A"}"#, None),
            ("not json", None),
        ];

        for (body, field) in cases {
            let (status, json) = send(&app, post_json("/bills", body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
            assert_eq!(json["code"], "VALIDATION_ERROR", "body: {body}");
            if let Some(field) = field {
                assert_eq!(json["field"], field, "body: {body}");
            }
        }

        assert_eq!(db.bills().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_enforced_totals() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let app = build_router(
            AppState::new(db.clone())
                .with_enforced_totals(TaxRate::from_bps(500))
                .shared(),
        );

        let (status, body) = send(&app, post_json("/bills", &bill_body(100.0, &[("A", 1, 100.0)]))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "totalAmount");
        assert_eq!(db.bills().count().await.unwrap(), 0);

        let (status, _) = send(&app, post_json("/bills", &bill_body(105.0, &[("A", 1, 100.0)]))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_overflowing_bill_is_rejected_when_totals_enforced() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let app = build_router(
            AppState::new(db.clone())
                .with_enforced_totals(TaxRate::from_bps(500))
                .shared(),
        );

        let body = r#"{"paymentMethod":"CASH","totalAmount":1,
            "items":[{"productId":"A","quantity":2,"price":"90000000000000000"}]}"#;
        let (status, json) = send(&app, post_json("/bills", body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["field"], "items");
        assert_eq!(db.bills().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_large_quantity_is_accepted() {
        let (db, app) = setup().await;

        let (status, body) = send(
            &app,
            post_json("/bills", &bill_body(15000.0, &[("A", 1000, 15.0)])),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["items"][0]["quantity"], 1000);
        assert_eq!(db.bills().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_report_overflow_is_an_error_not_a_panic() {
        let (_db, app) = setup().await;
        let body = r#"{"paymentMethod":"UPI","totalAmount":"90000000000000000",
            "items":[{"productId":"A","quantity":1,"price":15}]}"#;
        for _ in 0..2 {
            let (status, _) = send(&app, post_json("/bills", body)).await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, json) = send(&app, get_request("/reports?range=daily")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["code"], "INTERNAL");
    }

    #[tokio::test]
    async fn test_list_bills_for_today() {
        let (_db, app) = setup().await;
        send(&app, post_json("/bills", &bill_body(30.0, &[("A", 2, 15.0)]))).await;
        send(&app, post_json("/bills", &bill_body(20.0, &[("B", 1, 20.0)]))).await;

        let today = Local::now().date_naive().format("%Y-%m-%d");
        let (status, body) = send(&app, get_request(&format!("/bills?date={today}"))).await;

        assert_eq!(status, StatusCode::OK);
        let bills = body.as_array().unwrap();
        assert_eq!(bills.len(), 2);
        let created_at = |i: usize| {
            DateTime::parse_from_rfc3339(bills[i]["createdAt"].as_str().unwrap()).unwrap()
        };
        // newest first
        assert!(created_at(0) >= created_at(1));
        let names: Vec<_> = bills
            .iter()
            .map(|b| b["items"][0]["product"]["name"].as_str().unwrap().to_string())
            .collect();
        assert!(names.contains(&"Samosa".to_string()));
        assert!(names.contains(&"Vada Pav".to_string()));

        let (status, body) = send(&app, get_request("/api/bills?date=1999-01-01")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.as_array().unwrap().is_empty());

        let (_, all) = send(&app, get_request("/bills")).await;
        assert_eq!(all.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_bills_rejects_bad_date() {
        let (_db, app) = setup().await;

        for uri in ["/bills?date=2024-13-01", "/bills?date=15%2F03%2F2024"] {
            let (status, body) = send(&app, get_request(uri)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "uri: {uri}");
            assert_eq!(body["field"], "date");
        }
    }

    #[tokio::test]
    async fn test_report_summarizes_bills() {
        let (_db, app) = setup().await;
        send(&app, post_json("/bills", &bill_body(100.0, &[("A", 2, 15.0)]))).await;
        send(&app, post_json("/bills", &bill_body(50.0, &[("A", 1, 15.0), ("B", 5, 20.0)]))).await;

        let (status, body) = send(&app, get_request("/reports?range=weekly")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"]["totalSales"], 150.0);
        assert_eq!(body["summary"]["totalBills"], 2);
        assert_eq!(body["summary"]["topItem"]["name"], "Vada Pav");
        assert_eq!(body["summary"]["topItem"]["quantitySold"], 5);
        assert!(body["startDate"].is_string());
        assert!(body["endDate"].is_string());
    }

    #[tokio::test]
    async fn test_report_defaults_and_rejects_unknown_range() {
        let (_db, app) = setup().await;

        let (status, body) = send(&app, get_request("/api/reports")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"]["totalBills"], 0);
        assert_eq!(body["summary"]["totalSales"], 0.0);
        assert!(body["summary"]["topItem"].is_null());

        let (status, body) = send(&app, get_request("/reports?range=hourly")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "range");
    }

    #[tokio::test]
    async fn test_health() {
        let (db, app) = setup().await;

        let (status, body) = send(&app, get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        db.close().await;

        let (status, body) = send(&app, get_request("/api/health")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "unavailable");
    }
}
