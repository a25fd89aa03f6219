//! In-process HTTP tests over the in-memory record store

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use libraryadp_server::{
    api,
    clock::FixedClock,
    config::{AppConfig, StoreBackend},
    repository::MemoryStore,
    services::Services,
    AppState,
};

struct TestApp {
    router: Router,
    clock: FixedClock,
}

impl TestApp {
    fn new() -> Self {
        let mut config = AppConfig::default();
        config.database.backend = StoreBackend::Memory;

        let clock = FixedClock::new(Utc.with_ymd_and_hms(2025, 2, 3, 9, 0, 0).unwrap());
        let services = Services::new(
            Arc::new(MemoryStore::new()),
            config.lending.clone(),
            Arc::new(clock.clone()),
        );
        let state = AppState {
            config: Arc::new(config),
            services: Arc::new(services),
        };

        Self {
            router: api::create_router(state),
            clock,
        }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header("content-type", "application/json");
                Body::from(json.to_string())
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
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_book(&self, stock: i32) -> i64 {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/book",
                Some(json!({ "title": "Ali and Nino", "stock": stock, "authorIds": [1] })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"]["id"].as_i64().unwrap()
    }

    async fn create_student(&self, fin_code: &str) -> i64 {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/student",
                Some(json!({
                    "finCode": fin_code,
                    "firstName": "Nigar",
                    "lastName": "Huseynova",
                    "email": "nigar@example.com",
                    "phoneNumber": "+994701234567"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"]["id"].as_i64().unwrap()
    }

    async fn stock(&self, book_id: i64) -> i64 {
        let (_, body) = self.send(Method::GET, &format!("/api/v1/book/{}", book_id), None).await;
        body["data"]["stock"].as_i64().unwrap()
    }

    async fn trust_rate(&self, student_id: i64) -> i64 {
        let (_, body) = self
            .send(Method::GET, &format!("/api/v1/student/{}", student_id), None)
            .await;
        body["data"]["trustRate"].as_i64().unwrap()
    }

    async fn first_order_id(&self, student_id: i64) -> i64 {
        let (status, body) = self
            .send(
                Method::GET,
                &format!("/api/v1/order/get-by-student-id?studentId={}", student_id),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["data"][0]["id"].as_i64().unwrap()
    }
}

#[tokio::test]
async fn health_and_readiness() {
    let app = TestApp::new();

    let (status, body) = app.send(Method::GET, "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = app.send(Method::GET, "/api/v1/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn create_order_answers_201_with_empty_envelope() {
    let app = TestApp::new();
    let book = app.create_book(5).await;
    let student = app.create_student("FIN001").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/order",
            Some(json!({ "studentId": student, "bookId": book, "daysToReturn": 5 })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({
            "data": null,
            "message": "Order created successfully.",
            "status": 201,
            "success": true
        })
    );
    assert_eq!(app.stock(book).await, 4);

    let order_id = app.first_order_id(student).await;
    let (_, body) = app.send(Method::GET, &format!("/api/v1/order/{}", order_id), None).await;
    assert_eq!(body["data"]["bookId"], book);
    assert_eq!(body["data"]["returnTimestamp"], "2025-02-08T09:00:00Z");
}

#[tokio::test]
async fn out_of_stock_is_a_bad_request() {
    let app = TestApp::new();
    let book = app.create_book(0).await;
    let student = app.create_student("FIN001").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/order",
            Some(json!({ "studentId": student, "bookId": book, "daysToReturn": 3 })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "data": null,
            "message": "Book is out of stock.",
            "status": 400,
            "success": false
        })
    );
    assert_eq!(app.stock(book).await, 0);
}

#[tokio::test]
async fn missing_records_are_not_found() {
    let app = TestApp::new();
    let book = app.create_book(1).await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/order",
            Some(json!({ "studentId": 42, "bookId": book })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Student not found with id : 42");
    assert_eq!(body["status"], 404);

    let (status, body) = app
        .send(Method::POST, "/api/v1/order/9/return-order-book", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Order not found with id : 9");

    let (status, body) = app
        .send(Method::GET, "/api/v1/student/get-by-fin-code?finCode=ZZZ", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Student not found with fin code : ZZZ");
}

#[tokio::test]
async fn late_return_restocks_and_lowers_trust_rate() {
    let app = TestApp::new();
    let book = app.create_book(5).await;
    let student = app.create_student("FIN001").await;

    app.send(
        Method::POST,
        "/api/v1/order",
        Some(json!({ "studentId": student, "bookId": book, "daysToReturn": 7 })),
    )
    .await;
    let order_id = app.first_order_id(student).await;

    app.clock.set(Utc.with_ymd_and_hms(2025, 2, 3, 9, 0, 0).unwrap() + Duration::days(8));

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/v1/order/{}/return-order-book", order_id),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "data": null,
            "message": "Order deleted successfully.",
            "status": 200,
            "success": true
        })
    );
    assert_eq!(app.stock(book).await, 5);
    assert_eq!(app.trust_rate(student).await, 90);

    let (status, _) = app.send(Method::GET, &format!("/api/v1/order/{}", order_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn on_time_return_raises_trust_rate() {
    let app = TestApp::new();
    let book = app.create_book(1).await;
    let student = app.create_student("FIN001").await;

    app.send(
        Method::POST,
        "/api/v1/order",
        Some(json!({ "studentId": student, "bookId": book })),
    )
    .await;
    let order_id = app.first_order_id(student).await;

    let (status, _) = app
        .send(
            Method::POST,
            &format!("/api/v1/order/{}/return-order-book", order_id),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.stock(book).await, 1);
    assert_eq!(app.trust_rate(student).await, 110);
}

#[tokio::test]
async fn stock_endpoint_rejects_negative_values() {
    let app = TestApp::new();
    let book = app.create_book(3).await;

    let (status, body) = app
        .send(Method::PATCH, &format!("/api/v1/book/{}/update-stock?stock=-1", book), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Book is out of stock.");
    assert_eq!(app.stock(book).await, 3);

    let (status, body) = app
        .send(Method::PATCH, &format!("/api/v1/book/{}/update-stock?stock=8", book), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book stock updated successfully.");
    assert_eq!(app.stock(book).await, 8);
}

#[tokio::test]
async fn trust_rate_endpoint_sets_absolute_value() {
    let app = TestApp::new();
    let student = app.create_student("FIN001").await;

    let (status, body) = app
        .send(
            Method::PATCH,
            &format!("/api/v1/student/{}/update-trust-rate?trustRate=55", student),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Trust rate updated successfully.");
    assert_eq!(app.trust_rate(student).await, 55);
}

#[tokio::test]
async fn duplicate_fin_code_is_rejected() {
    let app = TestApp::new();
    app.create_student("FIN001").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/student",
            Some(json!({
                "finCode": "FIN001",
                "firstName": "Rauf",
                "lastName": "Aliyev",
                "email": "rauf@example.com",
                "phoneNumber": "+994509998877"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "A student with this fin code already exists.");
}

#[tokio::test]
async fn delete_order_leaves_stock_alone() {
    let app = TestApp::new();
    let book = app.create_book(2).await;
    let student = app.create_student("FIN001").await;

    app.send(
        Method::POST,
        "/api/v1/order",
        Some(json!({ "studentId": student, "bookId": book })),
    )
    .await;
    let order_id = app.first_order_id(student).await;

    let (status, body) = app
        .send(Method::DELETE, &format!("/api/v1/order/{}", order_id), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Order deleted successfully.");
    assert_eq!(app.stock(book).await, 1);
    assert_eq!(app.trust_rate(student).await, 100);
}

#[tokio::test]
async fn order_listing_is_paged() {
    let app = TestApp::new();
    let book = app.create_book(5).await;
    let student = app.create_student("FIN001").await;

    for _ in 0..3 {
        app.send(
            Method::POST,
            "/api/v1/order",
            Some(json!({ "studentId": student, "bookId": book })),
        )
        .await;
    }

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/v1/order/get-by-book-id?bookId={}&pageNumber=1&pageSize=2", book),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = app.send(Method::GET, "/api/v1/order", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
    assert_eq!(body["message"], "Orders retrieved successfully.");
}

#[tokio::test]
async fn update_order_answers_without_payload() {
    let app = TestApp::new();
    let book = app.create_book(2).await;
    let student = app.create_student("FIN001").await;

    app.send(
        Method::POST,
        "/api/v1/order",
        Some(json!({ "studentId": student, "bookId": book })),
    )
    .await;
    let order_id = app.first_order_id(student).await;

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/v1/order/{}", order_id),
            Some(json!({ "studentId": student, "bookId": book, "daysToReturn": 14 })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "data": null,
            "message": "Order updated successfully.",
            "status": 200,
            "success": true
        })
    );

    let (_, body) = app.send(Method::GET, &format!("/api/v1/order/{}", order_id), None).await;
    assert_eq!(body["data"]["returnTimestamp"], "2025-02-17T09:00:00Z");
}

#[tokio::test]
async fn malformed_order_body_is_a_bad_request_envelope() {
    let app = TestApp::new();

    let (status, body) = app
        .send(Method::POST, "/api/v1/order", Some(json!({ "bookId": 1 })))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["status"], 400);
    assert_eq!(body["data"], Value::Null);
    assert!(body["message"].as_str().unwrap().contains("studentId"));
}

#[tokio::test]
async fn malformed_query_and_path_are_bad_request_envelopes() {
    let app = TestApp::new();
    let book = app.create_book(3).await;

    let (status, body) = app
        .send(Method::PATCH, &format!("/api/v1/book/{}/update-stock?stock=abc", book), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["status"], 400);
    assert_eq!(app.stock(book).await, 3);

    let (status, body) = app.send(Method::GET, "/api/v1/order/not-a-number", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn huge_page_number_yields_an_empty_page() {
    let app = TestApp::new();
    let book = app.create_book(1).await;
    let student = app.create_student("FIN001").await;
    app.send(
        Method::POST,
        "/api/v1/order",
        Some(json!({ "studentId": student, "bookId": book })),
    )
    .await;

    let (status, body) = app
        .send(
            Method::GET,
            "/api/v1/order?pageNumber=9223372036854775807&pageSize=10",
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}
