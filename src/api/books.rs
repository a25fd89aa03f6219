//! Book catalog endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use utoipa::IntoParams;

use super::{AppJson, AppPath, AppQuery};
use crate::{
    error::AppResult,
    models::{BaseResponse, Book, CreateBook, PageQuery},
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StockQuery {
    /// New absolute stock value
    pub stock: i32,
}

/// Create a book
#[utoipa::path(
    post,
    path = "/book",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AppJson(book): AppJson<CreateBook>,
) -> AppResult<(StatusCode, Json<BaseResponse<Book>>)> {
    let book = state.services.books.create_book(&book).await?;

    let mut body = BaseResponse::ok(book, "Book created successfully.");
    body.status = StatusCode::CREATED.as_u16();
    Ok((StatusCode::CREATED, Json(body)))
}

/// List books
#[utoipa::path(
    get,
    path = "/book",
    tag = "books",
    params(PageQuery),
    responses(
        (status = 200, description = "Books page", body = Vec<Book>)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    AppQuery(query): AppQuery<PageQuery>,
) -> AppResult<Json<BaseResponse<Vec<Book>>>> {
    let page = query.resolve(&state.config.lending);
    let books = state.services.books.list_books(page).await?;
    Ok(Json(BaseResponse::ok(books, "Books retrieved successfully.")))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/book/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<BaseResponse<Book>>> {
    let book = state.services.books.get_book(id).await?;
    Ok(Json(BaseResponse::ok(book, "Book retrieved successfully.")))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/book/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<BaseResponse<()>>> {
    state.services.books.delete_book(id).await?;
    Ok(Json(BaseResponse::empty(StatusCode::OK, "Book deleted successfully.")))
}

/// Set a book's available stock
#[utoipa::path(
    patch,
    path = "/book/{id}/update-stock",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID"), StockQuery),
    responses(
        (status = 200, description = "Stock updated"),
        (status = 400, description = "Negative stock"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_stock(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<i64>,
    AppQuery(query): AppQuery<StockQuery>,
) -> AppResult<Json<BaseResponse<()>>> {
    state.services.books.update_stock(id, query.stock).await?;
    Ok(Json(BaseResponse::empty(StatusCode::OK, "Book stock updated successfully.")))
}
