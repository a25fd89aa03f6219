//! Live-server API tests
//!
//! These expect a server on localhost:8080 (either backend).

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Register a student with a fin code unique to this run
async fn create_student(client: &Client) -> i64 {
    let fin_code = format!("LIVE{}", chrono::Utc::now().timestamp_micros());

    let response = client
        .post(format!("{}/student", BASE_URL))
        .json(&json!({
            "finCode": fin_code,
            "firstName": "Live",
            "lastName": "Test",
            "email": "live@example.com",
            "phoneNumber": "+10000000000"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["data"]["id"].as_i64().expect("No student id in response")
}

async fn create_book(client: &Client, stock: i32) -> i64 {
    let response = client
        .post(format!("{}/book", BASE_URL))
        .json(&json!({ "title": "Live test book", "stock": stock }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["data"]["id"].as_i64().expect("No book id in response")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_borrow_and_return() {
    let client = Client::new();
    let book = create_book(&client, 1).await;
    let student = create_student(&client).await;

    let response = client
        .post(format!("{}/order", BASE_URL))
        .json(&json!({ "studentId": student, "bookId": book, "daysToReturn": 3 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let response = client
        .get(format!("{}/order/get-by-student-id?studentId={}", BASE_URL, student))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let order_id = body["data"][0]["id"].as_i64().expect("No order in response");

    let response = client
        .post(format!("{}/order/{}/return-order-book", BASE_URL, order_id))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let response = client
        .get(format!("{}/student/{}", BASE_URL, student))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["trustRate"], 110);
}

#[tokio::test]
#[ignore]
async fn test_out_of_stock() {
    let client = Client::new();
    let book = create_book(&client, 0).await;
    let student = create_student(&client).await;

    let response = client
        .post(format!("{}/order", BASE_URL))
        .json(&json!({ "studentId": student, "bookId": book }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Book is out of stock.");
}

#[tokio::test]
#[ignore]
async fn test_unknown_order() {
    let client = Client::new();

    let response = client
        .get(format!("{}/order/{}", BASE_URL, i64::MAX))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}
