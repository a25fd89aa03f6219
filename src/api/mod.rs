//! API handlers for the lending REST endpoints

pub mod books;
pub mod health;
pub mod openapi;
pub mod orders;
pub mod students;

use axum::{
    extract::{FromRequest, FromRequestParts},
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, AppState};

/// JSON body extractor whose rejections render as the response envelope
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Query string extractor whose rejections render as the response envelope
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// Path parameter extractor whose rejections render as the response envelope
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Orders
        .route("/order", get(orders::list_orders).post(orders::create_order))
        .route("/order/get-by-student-id", get(orders::list_orders_by_student))
        .route("/order/get-by-book-id", get(orders::list_orders_by_book))
        .route(
            "/order/:id",
            get(orders::get_order)
                .put(orders::update_order)
                .delete(orders::delete_order),
        )
        .route("/order/:id/return-order-book", post(orders::return_order_book))
        // Books
        .route("/book", get(books::list_books).post(books::create_book))
        .route("/book/:id", get(books::get_book).delete(books::delete_book))
        .route("/book/:id/update-stock", patch(books::update_stock))
        // Students
        .route("/student", get(students::list_students).post(students::create_student))
        .route("/student/get-by-fin-code", get(students::get_by_fin_code))
        .route(
            "/student/:id",
            get(students::get_student)
                .put(students::update_student)
                .delete(students::delete_student),
        )
        .route("/student/:id/update-trust-rate", patch(students::update_trust_rate))
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
