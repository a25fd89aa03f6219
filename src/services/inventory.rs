//! Inventory ledger: the only writer of a book's available stock

use crate::{
    error::{AppError, AppResult},
    models::Book,
    repository::{Repository, StoreTx},
};

#[derive(Clone)]
pub struct InventoryLedger {
    repository: Repository,
}

impl InventoryLedger {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Set `book_id`'s stock to the absolute `new_stock` inside `tx`.
    ///
    /// Callers compute the value themselves; the ledger's one rule is that
    /// stock never goes below zero. A rejected value leaves the stored stock
    /// untouched.
    pub async fn adjust_stock(&self, tx: &mut dyn StoreTx, book_id: i64, new_stock: i32) -> AppResult<Book> {
        let book = tx
            .lock_book(book_id)
            .await?
            .ok_or(AppError::BookNotFound(book_id))?;

        if new_stock < 0 {
            tracing::warn!(
                "Rejected stock {} for book with id : {} (current {})",
                new_stock,
                book_id,
                book.stock
            );
            return Err(AppError::BookOutOfStock);
        }

        let book = tx
            .write_book_stock(book_id, new_stock)
            .await?
            .ok_or(AppError::BookNotFound(book_id))?;

        tracing::info!("Updated stock for book with id : {}", book_id);
        Ok(book)
    }

    /// Administrative stock correction in its own transaction
    pub async fn set_stock(&self, book_id: i64, new_stock: i32) -> AppResult<Book> {
        let mut tx = self.repository.begin().await?;
        let book = self.adjust_stock(tx.as_mut(), book_id, new_stock).await?;
        tx.commit().await?;
        Ok(book)
    }
}
