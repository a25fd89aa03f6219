//! Business logic services

pub mod books;
pub mod inventory;
pub mod orders;
pub mod students;
pub mod trust;


use std::sync::Arc;

use crate::{clock::Clock, config::LendingConfig, error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BooksService,
    pub students: students::StudentsService,
    pub orders: orders::OrdersService,
    repository: Repository,
}

impl Services {
    /// Wire every service onto one store and one clock
    pub fn new(repository: Repository, lending: LendingConfig, clock: Arc<dyn Clock>) -> Self {
        let inventory = inventory::InventoryLedger::new(repository.clone());
        let trust = trust::TrustScoreAdjuster::new(repository.clone(), lending.trust_rate_bounds);

        Self {
            books: books::BooksService::new(repository.clone(), inventory.clone()),
            students: students::StudentsService::new(repository.clone(), trust.clone(), &lending),
            orders: orders::OrdersService::new(repository.clone(), inventory, trust, clock, lending),
            repository,
        }
    }

    /// Check that the record store answers
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
