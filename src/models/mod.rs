//! Data models for the lending server

pub mod book;
pub mod order;
pub mod page;
pub mod response;
pub mod student;

// Re-export commonly used types
pub use book::{Book, CreateBook};
pub use order::{NewOrder, Order, OrderRequest};
pub use page::{Page, PageQuery};
pub use response::BaseResponse;
pub use student::{CreateStudent, Student, UpdateStudent};
