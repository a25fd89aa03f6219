//! Trust score adjuster: the only writer of a student's trust rate

use crate::{
    config::TrustRateBounds,
    error::{AppError, AppResult},
    models::Student,
    repository::{Repository, StoreTx},
};

#[derive(Clone)]
pub struct TrustScoreAdjuster {
    repository: Repository,
    bounds: Option<TrustRateBounds>,
}

impl TrustScoreAdjuster {
    /// `bounds` is the single clamping policy for every trust rate write;
    /// `None` stores values as given.
    pub fn new(repository: Repository, bounds: Option<TrustRateBounds>) -> Self {
        Self { repository, bounds }
    }

    /// Value that will actually be stored for a requested trust rate
    pub fn apply_policy(&self, trust_rate: i32) -> i32 {
        match self.bounds {
            Some(bounds) => trust_rate.clamp(bounds.min, bounds.max),
            None => trust_rate,
        }
    }

    /// Set `student_id`'s trust rate to the absolute `new_trust_rate` inside `tx`
    pub async fn adjust_trust_rate(
        &self,
        tx: &mut dyn StoreTx,
        student_id: i64,
        new_trust_rate: i32,
    ) -> AppResult<Student> {
        let stored = self.apply_policy(new_trust_rate);

        let student = tx
            .write_trust_rate(student_id, stored)
            .await?
            .ok_or(AppError::StudentNotFound(student_id))?;

        tracing::info!("Updated trust rate for student with id: {}", student_id);
        Ok(student)
    }

    /// Administrative trust rate correction in its own transaction
    pub async fn set_trust_rate(&self, student_id: i64, new_trust_rate: i32) -> AppResult<Student> {
        let mut tx = self.repository.begin().await?;
        let student = self.adjust_trust_rate(tx.as_mut(), student_id, new_trust_rate).await?;
        tx.commit().await?;
        Ok(student)
    }
}
