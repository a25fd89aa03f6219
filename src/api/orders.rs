//! Lending order endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use utoipa::IntoParams;

use super::{AppJson, AppPath, AppQuery};
use crate::{
    error::AppResult,
    models::{BaseResponse, Order, OrderRequest, PageQuery},
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct StudentIdQuery {
    pub student_id: i64,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BookIdQuery {
    pub book_id: i64,
}

/// Borrow a book
#[utoipa::path(
    post,
    path = "/order",
    tag = "orders",
    request_body = OrderRequest,
    responses(
        (status = 201, description = "Order created"),
        (status = 400, description = "Book is out of stock"),
        (status = 404, description = "Book or student not found")
    )
)]
pub async fn create_order(
    State(state): State<crate::AppState>,
    AppJson(request): AppJson<OrderRequest>,
) -> AppResult<(StatusCode, Json<BaseResponse<()>>)> {
    state.services.orders.create_order(&request).await?;

    Ok((
        StatusCode::CREATED,
        Json(BaseResponse::empty(StatusCode::CREATED, "Order created successfully.")),
    ))
}

/// List all orders
#[utoipa::path(
    get,
    path = "/order",
    tag = "orders",
    params(PageQuery),
    responses(
        (status = 200, description = "Orders page", body = Vec<Order>)
    )
)]
pub async fn list_orders(
    State(state): State<crate::AppState>,
    AppQuery(query): AppQuery<PageQuery>,
) -> AppResult<Json<BaseResponse<Vec<Order>>>> {
    let page = query.resolve(&state.config.lending);
    let orders = state.services.orders.list_orders(page).await?;
    Ok(Json(BaseResponse::ok(orders, "Orders retrieved successfully.")))
}

/// Get order by ID
#[utoipa::path(
    get,
    path = "/order/{id}",
    tag = "orders",
    params(("id" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order details", body = Order),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<BaseResponse<Order>>> {
    let order = state.services.orders.get_order(id).await?;
    Ok(Json(BaseResponse::ok(order, "Order retrieved successfully.")))
}

/// List a student's orders
#[utoipa::path(
    get,
    path = "/order/get-by-student-id",
    tag = "orders",
    params(StudentIdQuery, PageQuery),
    responses(
        (status = 200, description = "Orders page", body = Vec<Order>),
        (status = 404, description = "Student not found")
    )
)]
pub async fn list_orders_by_student(
    State(state): State<crate::AppState>,
    AppQuery(student): AppQuery<StudentIdQuery>,
    AppQuery(query): AppQuery<PageQuery>,
) -> AppResult<Json<BaseResponse<Vec<Order>>>> {
    let page = query.resolve(&state.config.lending);
    let orders = state
        .services
        .orders
        .list_orders_by_student(student.student_id, page)
        .await?;
    Ok(Json(BaseResponse::ok(orders, "Orders retrieved successfully.")))
}

/// List a book's orders
#[utoipa::path(
    get,
    path = "/order/get-by-book-id",
    tag = "orders",
    params(BookIdQuery, PageQuery),
    responses(
        (status = 200, description = "Orders page", body = Vec<Order>),
        (status = 404, description = "Book not found")
    )
)]
pub async fn list_orders_by_book(
    State(state): State<crate::AppState>,
    AppQuery(book): AppQuery<BookIdQuery>,
    AppQuery(query): AppQuery<PageQuery>,
) -> AppResult<Json<BaseResponse<Vec<Order>>>> {
    let page = query.resolve(&state.config.lending);
    let orders = state.services.orders.list_orders_by_book(book.book_id, page).await?;
    Ok(Json(BaseResponse::ok(orders, "Orders retrieved successfully.")))
}

/// Re-point an order or change its loan period
#[utoipa::path(
    put,
    path = "/order/{id}",
    tag = "orders",
    params(("id" = i64, Path, description = "Order ID")),
    request_body = OrderRequest,
    responses(
        (status = 200, description = "Order updated"),
        (status = 404, description = "Order, book or student not found")
    )
)]
pub async fn update_order(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(request): AppJson<OrderRequest>,
) -> AppResult<Json<BaseResponse<()>>> {
    state.services.orders.update_order(id, &request).await?;
    Ok(Json(BaseResponse::empty(StatusCode::OK, "Order updated successfully.")))
}

/// Delete an order without touching stock or trust rate
#[utoipa::path(
    delete,
    path = "/order/{id}",
    tag = "orders",
    params(("id" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order deleted")
    )
)]
pub async fn delete_order(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<BaseResponse<()>>> {
    state.services.orders.delete_order(id).await?;
    Ok(Json(BaseResponse::empty(StatusCode::OK, "Order deleted successfully.")))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/order/{id}/return-order-book",
    tag = "orders",
    params(("id" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Book returned, order closed"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn return_order_book(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<BaseResponse<()>>> {
    state.services.orders.return_order_book(id).await?;
    Ok(Json(BaseResponse::empty(StatusCode::OK, "Order deleted successfully.")))
}
