//! Student endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use utoipa::IntoParams;

use super::{AppJson, AppPath, AppQuery};
use crate::{
    error::AppResult,
    models::{BaseResponse, CreateStudent, PageQuery, Student, UpdateStudent},
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FinCodeQuery {
    pub fin_code: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TrustRateQuery {
    /// New absolute trust rate
    pub trust_rate: i32,
}

/// Register a student
#[utoipa::path(
    post,
    path = "/student",
    tag = "students",
    request_body = CreateStudent,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 400, description = "Invalid input or duplicate fin code")
    )
)]
pub async fn create_student(
    State(state): State<crate::AppState>,
    AppJson(student): AppJson<CreateStudent>,
) -> AppResult<(StatusCode, Json<BaseResponse<Student>>)> {
    let student = state.services.students.create_student(&student).await?;

    let mut body = BaseResponse::ok(student, "Student created successfully.");
    body.status = StatusCode::CREATED.as_u16();
    Ok((StatusCode::CREATED, Json(body)))
}

/// List students
#[utoipa::path(
    get,
    path = "/student",
    tag = "students",
    params(PageQuery),
    responses(
        (status = 200, description = "Students page", body = Vec<Student>)
    )
)]
pub async fn list_students(
    State(state): State<crate::AppState>,
    AppQuery(query): AppQuery<PageQuery>,
) -> AppResult<Json<BaseResponse<Vec<Student>>>> {
    let page = query.resolve(&state.config.lending);
    let students = state.services.students.list_students(page).await?;
    Ok(Json(BaseResponse::ok(students, "Students retrieved successfully.")))
}

/// Get student by ID
#[utoipa::path(
    get,
    path = "/student/{id}",
    tag = "students",
    params(("id" = i64, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student details", body = Student),
        (status = 404, description = "Student not found")
    )
)]
pub async fn get_student(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<BaseResponse<Student>>> {
    let student = state.services.students.get_student(id).await?;
    Ok(Json(BaseResponse::ok(student, "Student retrieved successfully.")))
}

/// Look a student up by fin code
#[utoipa::path(
    get,
    path = "/student/get-by-fin-code",
    tag = "students",
    params(FinCodeQuery),
    responses(
        (status = 200, description = "Student details", body = Student),
        (status = 404, description = "Student not found")
    )
)]
pub async fn get_by_fin_code(
    State(state): State<crate::AppState>,
    AppQuery(query): AppQuery<FinCodeQuery>,
) -> AppResult<Json<BaseResponse<Student>>> {
    let student = state.services.students.get_by_fin_code(&query.fin_code).await?;
    Ok(Json(BaseResponse::ok(student, "Student retrieved successfully.")))
}

/// Update a student's profile
#[utoipa::path(
    put,
    path = "/student/{id}",
    tag = "students",
    params(("id" = i64, Path, description = "Student ID")),
    request_body = UpdateStudent,
    responses(
        (status = 200, description = "Student updated", body = Student),
        (status = 404, description = "Student not found")
    )
)]
pub async fn update_student(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(update): AppJson<UpdateStudent>,
) -> AppResult<Json<BaseResponse<Student>>> {
    let student = state.services.students.update_student(id, &update).await?;
    Ok(Json(BaseResponse::ok(student, "Student updated successfully.")))
}

/// Delete a student
#[utoipa::path(
    delete,
    path = "/student/{id}",
    tag = "students",
    params(("id" = i64, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student deleted")
    )
)]
pub async fn delete_student(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<BaseResponse<()>>> {
    state.services.students.delete_student(id).await?;
    Ok(Json(BaseResponse::empty(StatusCode::OK, "Student deleted successfully.")))
}

/// Correct a student's trust rate
#[utoipa::path(
    patch,
    path = "/student/{id}/update-trust-rate",
    tag = "students",
    params(("id" = i64, Path, description = "Student ID"), TrustRateQuery),
    responses(
        (status = 200, description = "Trust rate updated"),
        (status = 404, description = "Student not found")
    )
)]
pub async fn update_trust_rate(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<i64>,
    AppQuery(query): AppQuery<TrustRateQuery>,
) -> AppResult<Json<BaseResponse<()>>> {
    state.services.students.update_trust_rate(id, query.trust_rate).await?;
    Ok(Json(BaseResponse::empty(StatusCode::OK, "Trust rate updated successfully.")))
}
