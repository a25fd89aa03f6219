//! In-memory record store.
//!
//! Intended for tests/dev. A transaction holds the single state lock from
//! `begin` until it is committed or dropped, so transactions run one at a
//! time. Writes go to a staged copy that replaces the shared state on commit.
//! Plain reads on the store wait for any open transaction, so a task must not
//! read through the store while it holds a transaction.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{RecordStore, StoreTx};
use crate::{
    error::{AppError, AppResult},
    models::{Book, CreateBook, CreateStudent, NewOrder, Order, Page, Student},
};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    books: BTreeMap<i64, Book>,
    students: BTreeMap<i64, Student>,
    orders: BTreeMap<i64, Order>,
    last_book_id: i64,
    last_student_id: i64,
    last_order_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

pub struct MemoryTx {
    guard: OwnedMutexGuard<MemoryState>,
    staged: MemoryState,
}

fn paginate<'a, T, I>(records: I, page: Page) -> Vec<T>
where
    T: Clone + 'a,
    I: Iterator<Item = &'a T>,
{
    records
        .skip(page.offset().max(0) as usize)
        .take(page.limit().max(0) as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn begin(&self) -> AppResult<Box<dyn StoreTx>> {
        let guard = self.state.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryTx { guard, staged }))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn find_book(&self, id: i64) -> AppResult<Option<Book>> {
        let state = self.state.lock().await;
        Ok(state.books.get(&id).cloned())
    }

    async fn list_books(&self, page: Page) -> AppResult<Vec<Book>> {
        let state = self.state.lock().await;
        Ok(paginate(state.books.values(), page))
    }

    async fn find_student(&self, id: i64) -> AppResult<Option<Student>> {
        let state = self.state.lock().await;
        Ok(state.students.get(&id).cloned())
    }

    async fn find_student_by_fin_code(&self, fin_code: &str) -> AppResult<Option<Student>> {
        let state = self.state.lock().await;
        Ok(state.students.values().find(|s| s.fin_code == fin_code).cloned())
    }

    async fn exists_by_fin_code(&self, fin_code: &str) -> AppResult<bool> {
        let state = self.state.lock().await;
        Ok(state.students.values().any(|s| s.fin_code == fin_code))
    }

    async fn list_students(&self, page: Page) -> AppResult<Vec<Student>> {
        let state = self.state.lock().await;
        Ok(paginate(state.students.values(), page))
    }

    async fn find_order(&self, id: i64) -> AppResult<Option<Order>> {
        let state = self.state.lock().await;
        Ok(state.orders.get(&id).cloned())
    }

    async fn list_orders(&self, page: Page) -> AppResult<Vec<Order>> {
        let state = self.state.lock().await;
        Ok(paginate(state.orders.values(), page))
    }

    async fn list_orders_by_book(&self, book_id: i64, page: Page) -> AppResult<Vec<Order>> {
        let state = self.state.lock().await;
        Ok(paginate(state.orders.values().filter(|o| o.book_id == book_id), page))
    }

    async fn list_orders_by_student(&self, student_id: i64, page: Page) -> AppResult<Vec<Order>> {
        let state = self.state.lock().await;
        Ok(paginate(state.orders.values().filter(|o| o.student_id == student_id), page))
    }
}

impl MemoryTx {
    fn check_references(&self, book_id: i64, student_id: i64) -> AppResult<()> {
        if !self.staged.books.contains_key(&book_id) {
            return Err(AppError::BookNotFound(book_id));
        }
        if !self.staged.students.contains_key(&student_id) {
            return Err(AppError::StudentNotFound(student_id));
        }
        Ok(())
    }
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn lock_book(&mut self, id: i64) -> AppResult<Option<Book>> {
        Ok(self.staged.books.get(&id).cloned())
    }

    async fn lock_student(&mut self, id: i64) -> AppResult<Option<Student>> {
        Ok(self.staged.students.get(&id).cloned())
    }

    async fn lock_order(&mut self, id: i64) -> AppResult<Option<Order>> {
        Ok(self.staged.orders.get(&id).cloned())
    }

    async fn write_book_stock(&mut self, id: i64, stock: i32) -> AppResult<Option<Book>> {
        if stock < 0 {
            return Err(AppError::Internal(format!("stock for book {} would become {}", id, stock)));
        }
        Ok(self.staged.books.get_mut(&id).map(|book| {
            book.stock = stock;
            book.clone()
        }))
    }

    async fn write_trust_rate(&mut self, id: i64, trust_rate: i32) -> AppResult<Option<Student>> {
        Ok(self.staged.students.get_mut(&id).map(|student| {
            student.trust_rate = trust_rate;
            student.clone()
        }))
    }

    async fn insert_order(&mut self, order: &NewOrder) -> AppResult<Order> {
        self.check_references(order.book_id, order.student_id)?;

        self.staged.last_order_id += 1;
        let order = Order {
            id: self.staged.last_order_id,
            book_id: order.book_id,
            student_id: order.student_id,
            order_timestamp: order.order_timestamp,
            return_timestamp: order.return_timestamp,
        };
        self.staged.orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn update_order(&mut self, order: &Order) -> AppResult<()> {
        self.check_references(order.book_id, order.student_id)?;

        match self.staged.orders.get_mut(&order.id) {
            Some(existing) => {
                *existing = order.clone();
                Ok(())
            }
            None => Err(AppError::OrderNotFound(order.id)),
        }
    }

    async fn delete_order(&mut self, id: i64) -> AppResult<bool> {
        Ok(self.staged.orders.remove(&id).is_some())
    }

    async fn insert_book(&mut self, book: &CreateBook) -> AppResult<Book> {
        self.staged.last_book_id += 1;
        let book = Book {
            id: self.staged.last_book_id,
            title: book.title.clone(),
            stock: book.stock,
            category_id: book.category_id,
            author_ids: book.author_ids.clone(),
        };
        self.staged.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn delete_book(&mut self, id: i64) -> AppResult<bool> {
        let removed = self.staged.books.remove(&id).is_some();
        if removed {
            self.staged.orders.retain(|_, o| o.book_id != id);
        }
        Ok(removed)
    }

    async fn insert_student(&mut self, student: &CreateStudent, trust_rate: i32) -> AppResult<Student> {
        if self.staged.students.values().any(|s| s.fin_code == student.fin_code) {
            return Err(AppError::FinCodeAlreadyExists);
        }

        self.staged.last_student_id += 1;
        let student = Student {
            id: self.staged.last_student_id,
            fin_code: student.fin_code.clone(),
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
            email: student.email.clone(),
            phone_number: student.phone_number.clone(),
            trust_rate,
        };
        self.staged.students.insert(student.id, student.clone());
        Ok(student)
    }

    async fn update_student(&mut self, student: &Student) -> AppResult<()> {
        match self.staged.students.get_mut(&student.id) {
            Some(existing) => {
                let trust_rate = existing.trust_rate;
                *existing = Student {
                    trust_rate,
                    ..student.clone()
                };
                Ok(())
            }
            None => Err(AppError::StudentNotFound(student.id)),
        }
    }

    async fn delete_student(&mut self, id: i64) -> AppResult<bool> {
        let removed = self.staged.students.remove(&id).is_some();
        if removed {
            self.staged.orders.retain(|_, o| o.student_id != id);
        }
        Ok(removed)
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MemoryTx { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }
}
