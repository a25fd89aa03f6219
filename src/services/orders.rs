//! Lending order management: borrowing, revising and returning books
//!
//! Every mutating operation runs in one store transaction. The book and
//! student rows it reads are locked until commit, so concurrent borrows of
//! the same book are serialized and the stock computed from a read is still
//! the stock when it is written. Any failure drops the transaction and
//! nothing is persisted.

use std::sync::Arc;

use crate::{
    clock::Clock,
    config::LendingConfig,
    error::{AppError, AppResult},
    models::{order::due_date, NewOrder, Order, OrderRequest, Page},
    repository::Repository,
};

use super::{inventory::InventoryLedger, trust::TrustScoreAdjuster};

/// What a return did, for callers that want more than success
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnReceipt {
    /// The order as it was before deletion
    pub order: Order,
    pub late: bool,
    pub stock: i32,
    pub trust_rate: i32,
}

#[derive(Clone)]
pub struct OrdersService {
    repository: Repository,
    ledger: InventoryLedger,
    trust: TrustScoreAdjuster,
    clock: Arc<dyn Clock>,
    config: LendingConfig,
}

impl OrdersService {
    pub fn new(
        repository: Repository,
        ledger: InventoryLedger,
        trust: TrustScoreAdjuster,
        clock: Arc<dyn Clock>,
        config: LendingConfig,
    ) -> Self {
        Self {
            repository,
            ledger,
            trust,
            clock,
            config,
        }
    }

    fn loan_days(&self, days_to_return: Option<i64>) -> i64 {
        days_to_return
            .filter(|days| *days > 0)
            .unwrap_or(self.config.default_loan_days)
    }

    /// Borrow a book: take one copy out of stock and open an order
    pub async fn create_order(&self, request: &OrderRequest) -> AppResult<Order> {
        let mut tx = self.repository.begin().await?;

        let book = tx
            .lock_book(request.book_id)
            .await?
            .ok_or(AppError::BookNotFound(request.book_id))?;
        let student = tx
            .lock_student(request.student_id)
            .await?
            .ok_or(AppError::StudentNotFound(request.student_id))?;

        let order_timestamp = self.clock.now();
        let loan_days = self.loan_days(request.days_to_return);
        let return_timestamp = due_date(order_timestamp, loan_days)
            .ok_or_else(|| AppError::Validation(format!("daysToReturn {} is out of range", loan_days)))?;

        self.ledger
            .adjust_stock(tx.as_mut(), book.id, book.stock - 1)
            .await?;

        let order = tx
            .insert_order(&NewOrder {
                book_id: book.id,
                student_id: student.id,
                order_timestamp,
                return_timestamp,
            })
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Created new order for book: {}, student: {}",
            book.id,
            student.id
        );
        Ok(order)
    }

    /// Re-point an order and optionally recompute its due date from the
    /// original order timestamp. Stock is not moved between books.
    pub async fn update_order(&self, order_id: i64, request: &OrderRequest) -> AppResult<Order> {
        let mut tx = self.repository.begin().await?;

        let mut order = tx
            .lock_order(order_id)
            .await?
            .ok_or(AppError::OrderNotFound(order_id))?;
        let book = tx
            .lock_book(request.book_id)
            .await?
            .ok_or(AppError::BookNotFound(request.book_id))?;
        let student = tx
            .lock_student(request.student_id)
            .await?
            .ok_or(AppError::StudentNotFound(request.student_id))?;

        order.book_id = book.id;
        order.student_id = student.id;

        if let Some(days) = request.days_to_return.filter(|days| *days > 0) {
            order.return_timestamp = due_date(order.order_timestamp, days)
                .ok_or_else(|| AppError::Validation(format!("daysToReturn {} is out of range", days)))?;
        }

        tx.update_order(&order).await?;
        tx.commit().await?;

        tracing::info!("Updated order with id: {}", order_id);
        Ok(order)
    }

    /// Administrative removal. Stock and trust rate are left alone, and a
    /// missing order is not an error.
    pub async fn delete_order(&self, order_id: i64) -> AppResult<()> {
        let mut tx = self.repository.begin().await?;
        let removed = tx.delete_order(order_id).await?;
        tx.commit().await?;

        if removed {
            tracing::info!("Deleted order with id: {}", order_id);
        } else {
            tracing::debug!("Delete requested for absent order with id: {}", order_id);
        }
        Ok(())
    }

    /// Close an order on return: restock the book, reward or penalize the
    /// student's punctuality, then delete the order.
    pub async fn return_order_book(&self, order_id: i64) -> AppResult<ReturnReceipt> {
        let mut tx = self.repository.begin().await?;

        let order = tx
            .lock_order(order_id)
            .await?
            .ok_or(AppError::OrderNotFound(order_id))?;
        let book = tx
            .lock_book(order.book_id)
            .await?
            .ok_or(AppError::BookNotFound(order.book_id))?;

        let book = self
            .ledger
            .adjust_stock(tx.as_mut(), book.id, book.stock.saturating_add(1))
            .await?;

        let student = tx
            .lock_student(order.student_id)
            .await?
            .ok_or(AppError::StudentNotFound(order.student_id))?;

        let late = order.is_overdue_at(self.clock.now());
        let step = self.config.trust_rate_step;
        let new_trust_rate = if late {
            student.trust_rate.saturating_sub(step)
        } else {
            student.trust_rate.saturating_add(step)
        };

        let student = self
            .trust
            .adjust_trust_rate(tx.as_mut(), student.id, new_trust_rate)
            .await?;

        tx.delete_order(order.id).await?;
        tx.commit().await?;

        tracing::info!(
            order_id = order.id,
            book_id = book.id,
            student_id = student.id,
            late,
            trust_rate = student.trust_rate,
            "Returned order"
        );

        Ok(ReturnReceipt {
            order,
            late,
            stock: book.stock,
            trust_rate: student.trust_rate,
        })
    }

    pub async fn get_order(&self, order_id: i64) -> AppResult<Order> {
        let order = self
            .repository
            .find_order(order_id)
            .await?
            .ok_or(AppError::OrderNotFound(order_id))?;
        tracing::info!("Retrieved order with id: {}", order_id);
        Ok(order)
    }

    pub async fn list_orders(&self, page: Page) -> AppResult<Vec<Order>> {
        let orders = self.repository.list_orders(page).await?;
        tracing::info!("Retrieved all orders (page: {}, size: {})", page.number, page.size);
        Ok(orders)
    }

    pub async fn list_orders_by_book(&self, book_id: i64, page: Page) -> AppResult<Vec<Order>> {
        self.repository
            .find_book(book_id)
            .await?
            .ok_or(AppError::BookNotFound(book_id))?;

        let orders = self.repository.list_orders_by_book(book_id, page).await?;
        tracing::info!(
            "Retrieved orders by book with id: {} (page: {}, size: {})",
            book_id,
            page.number,
            page.size
        );
        Ok(orders)
    }

    pub async fn list_orders_by_student(&self, student_id: i64, page: Page) -> AppResult<Vec<Order>> {
        self.repository
            .find_student(student_id)
            .await?
            .ok_or(AppError::StudentNotFound(student_id))?;

        let orders = self.repository.list_orders_by_student(student_id, page).await?;
        tracing::info!(
            "Retrieved orders by student with id: {} (page: {}, size: {})",
            student_id,
            page.number,
            page.size
        );
        Ok(orders)
    }
}
