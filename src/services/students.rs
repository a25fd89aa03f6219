//! Student (borrower) service

use validator::Validate;

use crate::{
    config::LendingConfig,
    error::{AppError, AppResult},
    models::{CreateStudent, Page, Student, UpdateStudent},
    repository::Repository,
};

use super::trust::TrustScoreAdjuster;

#[derive(Clone)]
pub struct StudentsService {
    repository: Repository,
    trust: TrustScoreAdjuster,
    initial_trust_rate: i32,
}

impl StudentsService {
    pub fn new(repository: Repository, trust: TrustScoreAdjuster, lending: &LendingConfig) -> Self {
        Self {
            repository,
            trust,
            initial_trust_rate: lending.initial_trust_rate,
        }
    }

    /// Register a student with the configured starting trust rate
    pub async fn create_student(&self, student: &CreateStudent) -> AppResult<Student> {
        student.validate()?;

        if self.repository.exists_by_fin_code(&student.fin_code).await? {
            return Err(AppError::FinCodeAlreadyExists);
        }

        // The insert re-checks uniqueness for racing registrations
        let mut tx = self.repository.begin().await?;
        let student = tx
            .insert_student(student, self.trust.apply_policy(self.initial_trust_rate))
            .await?;
        tx.commit().await?;

        tracing::info!("Created new student with id: {}", student.id);
        Ok(student)
    }

    pub async fn get_student(&self, id: i64) -> AppResult<Student> {
        self.repository
            .find_student(id)
            .await?
            .ok_or(AppError::StudentNotFound(id))
    }

    pub async fn get_by_fin_code(&self, fin_code: &str) -> AppResult<Student> {
        self.repository
            .find_student_by_fin_code(fin_code)
            .await?
            .ok_or_else(|| AppError::StudentFinCodeNotFound(fin_code.to_string()))
    }

    pub async fn list_students(&self, page: Page) -> AppResult<Vec<Student>> {
        self.repository.list_students(page).await
    }

    /// Edit profile fields; the trust rate is left to the adjuster
    pub async fn update_student(&self, id: i64, update: &UpdateStudent) -> AppResult<Student> {
        update.validate()?;

        let mut tx = self.repository.begin().await?;
        let mut student = tx
            .lock_student(id)
            .await?
            .ok_or(AppError::StudentNotFound(id))?;

        update.apply_to(&mut student);
        tx.update_student(&student).await?;
        tx.commit().await?;

        tracing::info!("Updated student with id: {}", id);
        Ok(student)
    }

    /// Remove a student and their open orders
    pub async fn delete_student(&self, id: i64) -> AppResult<()> {
        let mut tx = self.repository.begin().await?;
        let removed = tx.delete_student(id).await?;
        tx.commit().await?;

        if removed {
            tracing::info!("Deleted student with id: {}", id);
        }
        Ok(())
    }

    pub async fn update_trust_rate(&self, id: i64, trust_rate: i32) -> AppResult<Student> {
        self.trust.set_trust_rate(id, trust_rate).await
    }
}
