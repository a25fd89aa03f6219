//! Repository layer for database operations
//!
//! Services talk to storage through two ports. [`RecordStore`] serves plain
//! reads and opens transactions; [`StoreTx`] is one request-scoped
//! transaction. Locking reads on a `StoreTx` hold the row until commit or
//! drop, so a read-modify-write of a counter inside one transaction cannot
//! interleave with another. Dropping a `StoreTx` without calling
//! [`StoreTx::commit`] discards every write made through it.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{Book, CreateBook, CreateStudent, NewOrder, Order, Page, Student},
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Shared handle to whichever store backs the services
pub type Repository = Arc<dyn RecordStore>;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Open a transaction
    async fn begin(&self) -> AppResult<Box<dyn StoreTx>>;

    /// Check that the store answers
    async fn ping(&self) -> AppResult<()>;

    async fn find_book(&self, id: i64) -> AppResult<Option<Book>>;
    async fn list_books(&self, page: Page) -> AppResult<Vec<Book>>;

    async fn find_student(&self, id: i64) -> AppResult<Option<Student>>;
    async fn find_student_by_fin_code(&self, fin_code: &str) -> AppResult<Option<Student>>;
    async fn exists_by_fin_code(&self, fin_code: &str) -> AppResult<bool>;
    async fn list_students(&self, page: Page) -> AppResult<Vec<Student>>;

    async fn find_order(&self, id: i64) -> AppResult<Option<Order>>;
    async fn list_orders(&self, page: Page) -> AppResult<Vec<Order>>;
    async fn list_orders_by_book(&self, book_id: i64, page: Page) -> AppResult<Vec<Order>>;
    async fn list_orders_by_student(&self, student_id: i64, page: Page) -> AppResult<Vec<Order>>;
}

#[async_trait]
pub trait StoreTx: Send {
    async fn lock_book(&mut self, id: i64) -> AppResult<Option<Book>>;
    async fn lock_student(&mut self, id: i64) -> AppResult<Option<Student>>;
    async fn lock_order(&mut self, id: i64) -> AppResult<Option<Order>>;

    /// Set a book's stock; `None` when the book does not exist.
    /// Only the inventory ledger calls this.
    async fn write_book_stock(&mut self, id: i64, stock: i32) -> AppResult<Option<Book>>;
    /// Set a student's trust rate; `None` when the student does not exist.
    /// Only the trust score adjuster calls this.
    async fn write_trust_rate(&mut self, id: i64, trust_rate: i32) -> AppResult<Option<Student>>;

    async fn insert_order(&mut self, order: &NewOrder) -> AppResult<Order>;
    async fn update_order(&mut self, order: &Order) -> AppResult<()>;
    /// Returns whether a row was removed
    async fn delete_order(&mut self, id: i64) -> AppResult<bool>;

    async fn insert_book(&mut self, book: &CreateBook) -> AppResult<Book>;
    async fn delete_book(&mut self, id: i64) -> AppResult<bool>;

    /// Fails with `FinCodeAlreadyExists` on a duplicate fin code
    async fn insert_student(&mut self, student: &CreateStudent, trust_rate: i32) -> AppResult<Student>;
    /// Persist profile fields; the trust rate column is left alone
    async fn update_student(&mut self, student: &Student) -> AppResult<()>;
    async fn delete_student(&mut self, id: i64) -> AppResult<bool>;

    async fn commit(self: Box<Self>) -> AppResult<()>;
}
