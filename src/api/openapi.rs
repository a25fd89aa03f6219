//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, orders, students};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LibraryADP API",
        version = "1.0.0",
        description = "Library lending REST API: books, students and lending orders",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Orders
        orders::create_order,
        orders::list_orders,
        orders::get_order,
        orders::list_orders_by_student,
        orders::list_orders_by_book,
        orders::update_order,
        orders::delete_order,
        orders::return_order_book,
        // Books
        books::create_book,
        books::list_books,
        books::get_book,
        books::delete_book,
        books::update_stock,
        // Students
        students::create_student,
        students::list_students,
        students::get_student,
        students::get_by_fin_code,
        students::update_student,
        students::delete_student,
        students::update_trust_rate,
    ),
    components(
        schemas(
            crate::models::Order,
            crate::models::OrderRequest,
            crate::models::Book,
            crate::models::CreateBook,
            crate::models::Student,
            crate::models::CreateStudent,
            crate::models::UpdateStudent,
            health::HealthResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "orders", description = "Lending orders"),
        (name = "books", description = "Book catalog and stock"),
        (name = "students", description = "Students and trust rates")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
