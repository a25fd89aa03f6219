//! PostgreSQL record store

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Transaction};

use super::{RecordStore, StoreTx};
use crate::{
    error::{AppError, AppResult},
    models::{Book, CreateBook, CreateStudent, NewOrder, Order, Page, Student},
};

const BOOK_COLUMNS: &str = "id, title, stock, category_id, author_ids";
const STUDENT_COLUMNS: &str = "id, fin_code, first_name, last_name, email, phone_number, trust_rate";
const ORDER_COLUMNS: &str = "id, book_id, student_id, order_timestamp, return_timestamp";

const FIN_CODE_CONSTRAINT: &str = "students_fin_code_key";

#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Transaction over a pooled connection; rolls back when dropped uncommitted
pub struct PgTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl RecordStore for PgStore {
    async fn begin(&self) -> AppResult<Box<dyn StoreTx>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTx { tx }))
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_book(&self, id: i64) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!("SELECT {} FROM books WHERE id = $1", BOOK_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn list_books(&self, page: Page) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books ORDER BY id LIMIT $1 OFFSET $2",
            BOOK_COLUMNS
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    async fn find_student(&self, id: i64) -> AppResult<Option<Student>> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {} FROM students WHERE id = $1",
            STUDENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(student)
    }

    async fn find_student_by_fin_code(&self, fin_code: &str) -> AppResult<Option<Student>> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {} FROM students WHERE fin_code = $1",
            STUDENT_COLUMNS
        ))
        .bind(fin_code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(student)
    }

    async fn exists_by_fin_code(&self, fin_code: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM students WHERE fin_code = $1)")
            .bind(fin_code)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn list_students(&self, page: Page) -> AppResult<Vec<Student>> {
        let students = sqlx::query_as::<_, Student>(&format!(
            "SELECT {} FROM students ORDER BY id LIMIT $1 OFFSET $2",
            STUDENT_COLUMNS
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        Ok(students)
    }

    async fn find_order(&self, id: i64) -> AppResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(order)
    }

    async fn list_orders(&self, page: Page) -> AppResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders ORDER BY id LIMIT $1 OFFSET $2",
            ORDER_COLUMNS
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    async fn list_orders_by_book(&self, book_id: i64, page: Page) -> AppResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders WHERE book_id = $1 ORDER BY id LIMIT $2 OFFSET $3",
            ORDER_COLUMNS
        ))
        .bind(book_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    async fn list_orders_by_student(&self, student_id: i64, page: Page) -> AppResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders WHERE student_id = $1 ORDER BY id LIMIT $2 OFFSET $3",
            ORDER_COLUMNS
        ))
        .bind(student_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }
}

#[async_trait]
impl StoreTx for PgTx {
    async fn lock_book(&mut self, id: i64) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE id = $1 FOR UPDATE",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(book)
    }

    async fn lock_student(&mut self, id: i64) -> AppResult<Option<Student>> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {} FROM students WHERE id = $1 FOR UPDATE",
            STUDENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(student)
    }

    async fn lock_order(&mut self, id: i64) -> AppResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders WHERE id = $1 FOR UPDATE",
            ORDER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(order)
    }

    async fn write_book_stock(&mut self, id: i64, stock: i32) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "UPDATE books SET stock = $2 WHERE id = $1 RETURNING {}",
            BOOK_COLUMNS
        ))
        .bind(id)
        .bind(stock)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(book)
    }

    async fn write_trust_rate(&mut self, id: i64, trust_rate: i32) -> AppResult<Option<Student>> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "UPDATE students SET trust_rate = $2 WHERE id = $1 RETURNING {}",
            STUDENT_COLUMNS
        ))
        .bind(id)
        .bind(trust_rate)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(student)
    }

    async fn insert_order(&mut self, order: &NewOrder) -> AppResult<Order> {
        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            INSERT INTO orders (book_id, student_id, order_timestamp, return_timestamp)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            ORDER_COLUMNS
        ))
        .bind(order.book_id)
        .bind(order.student_id)
        .bind(order.order_timestamp)
        .bind(order.return_timestamp)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(order)
    }

    async fn update_order(&mut self, order: &Order) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET book_id = $2, student_id = $3, order_timestamp = $4, return_timestamp = $5
            WHERE id = $1
            "#,
        )
        .bind(order.id)
        .bind(order.book_id)
        .bind(order.student_id)
        .bind(order.order_timestamp)
        .bind(order.return_timestamp)
        .execute(&mut *self.tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::OrderNotFound(order.id));
        }
        Ok(())
    }

    async fn delete_order(&mut self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_book(&mut self, book: &CreateBook) -> AppResult<Book> {
        let book = sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (title, stock, category_id, author_ids)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&book.title)
        .bind(book.stock)
        .bind(book.category_id)
        .bind(&book.author_ids)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(book)
    }

    async fn delete_book(&mut self, id: i64) -> AppResult<bool> {
        // Orders before the book, matching the order -> book -> student lock order
        sqlx::query("SELECT id FROM orders WHERE book_id = $1 ORDER BY id FOR UPDATE")
            .bind(id)
            .fetch_all(&mut *self.tx)
            .await?;

        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_student(&mut self, student: &CreateStudent, trust_rate: i32) -> AppResult<Student> {
        sqlx::query_as::<_, Student>(&format!(
            r#"
            INSERT INTO students (fin_code, first_name, last_name, email, phone_number, trust_rate)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            STUDENT_COLUMNS
        ))
        .bind(&student.fin_code)
        .bind(&student.first_name)
        .bind(&student.last_name)
        .bind(&student.email)
        .bind(&student.phone_number)
        .bind(trust_rate)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.constraint() == Some(FIN_CODE_CONSTRAINT) => {
                AppError::FinCodeAlreadyExists
            }
            other => AppError::Database(other),
        })
    }

    async fn update_student(&mut self, student: &Student) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE students
            SET first_name = $2, last_name = $3, email = $4, phone_number = $5
            WHERE id = $1
            "#,
        )
        .bind(student.id)
        .bind(&student.first_name)
        .bind(&student.last_name)
        .bind(&student.email)
        .bind(&student.phone_number)
        .execute(&mut *self.tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::StudentNotFound(student.id));
        }
        Ok(())
    }

    async fn delete_student(&mut self, id: i64) -> AppResult<bool> {
        sqlx::query("SELECT id FROM orders WHERE student_id = $1 ORDER BY id FOR UPDATE")
            .bind(id)
            .fetch_all(&mut *self.tx)
            .await?;

        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let PgTx { tx } = *self;
        tx.commit().await?;
        Ok(())
    }
}
