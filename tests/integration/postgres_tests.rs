//! Record store tests against a live PostgreSQL
//!
//! Run with `DATABASE_URL=postgres://... cargo test -- --ignored`.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use libraryadp_server::{
    clock::SystemClock,
    config::LendingConfig,
    models::{CreateBook, CreateStudent, OrderRequest, Page},
    repository::PgStore,
    services::Services,
    AppError,
};

async fn pg_services() -> Services {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(16)
        .connect(&url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    Services::new(
        Arc::new(PgStore::new(pool)),
        LendingConfig::default(),
        Arc::new(SystemClock),
    )
}

async fn seed(services: &Services, stock: i32) -> (i64, i64) {
    let book = services
        .books
        .create_book(&CreateBook {
            title: "Concurrency test book".to_string(),
            stock,
            category_id: None,
            author_ids: vec![],
        })
        .await
        .unwrap();

    let student = services
        .students
        .create_student(&CreateStudent {
            fin_code: format!("PG{}", chrono::Utc::now().timestamp_micros()),
            first_name: "Pg".to_string(),
            last_name: "Test".to_string(),
            email: "pg@example.com".to_string(),
            phone_number: "+10000000000".to_string(),
        })
        .await
        .unwrap();

    (book.id, student.id)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
#[ignore]
async fn concurrent_borrows_never_oversell() {
    let services = pg_services().await;
    let (book_id, student_id) = seed(&services, 3).await;

    let mut handles = Vec::new();
    for _ in 0..20 {
        let services = services.clone();
        handles.push(tokio::spawn(async move {
            services
                .orders
                .create_order(&OrderRequest {
                    student_id,
                    book_id,
                    days_to_return: None,
                })
                .await
        }));
    }

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(AppError::BookOutOfStock) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(created, 3);
    assert_eq!(services.books.get_book(book_id).await.unwrap().stock, 0);
    let orders = services
        .orders
        .list_orders_by_book(book_id, Page::new(0, 50))
        .await
        .unwrap();
    assert_eq!(orders.len(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
#[ignore]
async fn deleting_a_book_while_returning_does_not_deadlock() {
    let services = pg_services().await;
    let (book_id, student_id) = seed(&services, 6).await;

    for _ in 0..6 {
        services
            .orders
            .create_order(&OrderRequest {
                student_id,
                book_id,
                days_to_return: None,
            })
            .await
            .unwrap();
    }
    let orders = services
        .orders
        .list_orders_by_book(book_id, Page::new(0, 50))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for order in orders {
        let services = services.clone();
        handles.push(tokio::spawn(async move {
            services.orders.return_order_book(order.id).await.map(|_| ())
        }));
    }
    {
        let services = services.clone();
        handles.push(tokio::spawn(async move { services.books.delete_book(book_id).await }));
    }

    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) | Err(AppError::OrderNotFound(_)) | Err(AppError::BookNotFound(_)) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert!(matches!(
        services.books.get_book(book_id).await.unwrap_err(),
        AppError::BookNotFound(_)
    ));
}
