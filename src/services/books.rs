//! Book catalog service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{Book, CreateBook, Page},
    repository::Repository,
};

use super::inventory::InventoryLedger;

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
    ledger: InventoryLedger,
}

impl BooksService {
    pub fn new(repository: Repository, ledger: InventoryLedger) -> Self {
        Self { repository, ledger }
    }

    pub async fn create_book(&self, book: &CreateBook) -> AppResult<Book> {
        book.validate()?;

        let mut tx = self.repository.begin().await?;
        let book = tx.insert_book(book).await?;
        tx.commit().await?;

        tracing::info!("Created new book with id: {}", book.id);
        Ok(book)
    }

    pub async fn get_book(&self, id: i64) -> AppResult<Book> {
        self.repository
            .find_book(id)
            .await?
            .ok_or(AppError::BookNotFound(id))
    }

    pub async fn list_books(&self, page: Page) -> AppResult<Vec<Book>> {
        self.repository.list_books(page).await
    }

    /// Remove a book and its open orders
    pub async fn delete_book(&self, id: i64) -> AppResult<()> {
        let mut tx = self.repository.begin().await?;
        let removed = tx.delete_book(id).await?;
        tx.commit().await?;

        if removed {
            tracing::info!("Deleted book with id: {}", id);
        }
        Ok(())
    }

    /// Administrative stock correction through the inventory ledger
    pub async fn update_stock(&self, id: i64, stock: i32) -> AppResult<Book> {
        self.ledger.set_stock(id, stock).await
    }
}
